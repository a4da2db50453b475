use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::quiz::{
    candidates, can_start, QuestionType, QuizDirection, QuizSession, QuizSettings, QuizState,
    RecencyMode, SelectionMode, MIN_CANDIDATES, RECENT_COUNTS,
};
use crate::ui::layout::calculate_quiz_chunks;
use crate::vocabulary::Library;

#[derive(Debug, Default)]
pub struct QuizSetupView {
    pub settings: QuizSettings,
    pub category_cursor: usize,
}

#[derive(Debug, PartialEq)]
pub enum SetupEffect {
    None,
    /// Enough candidates; the caller generates questions and starts.
    Start,
}

pub fn handle_quiz_setup_input(
    view: &mut QuizSetupView,
    library: &Library,
    key: KeyEvent,
) -> SetupEffect {
    let all_categories = library.all_categories();
    match key.code {
        KeyCode::Char('d') => {
            view.settings.direction = match view.settings.direction {
                QuizDirection::SourceToTarget => QuizDirection::TargetToSource,
                QuizDirection::TargetToSource => QuizDirection::Mixed,
                QuizDirection::Mixed => QuizDirection::SourceToTarget,
            };
            SetupEffect::None
        }
        KeyCode::Char('m') => {
            view.settings.selection_mode = match view.settings.selection_mode {
                SelectionMode::ByCategory => SelectionMode::ByRecency,
                SelectionMode::ByRecency => SelectionMode::ByCategory,
            };
            SetupEffect::None
        }
        KeyCode::Up => {
            view.category_cursor = view.category_cursor.saturating_sub(1);
            SetupEffect::None
        }
        KeyCode::Down => {
            if view.category_cursor < all_categories.len().saturating_sub(1) {
                view.category_cursor += 1;
            }
            SetupEffect::None
        }
        KeyCode::Char(' ') => {
            if view.settings.selection_mode == SelectionMode::ByCategory
                && let Some(category) = all_categories.get(view.category_cursor)
            {
                let ids = &mut view.settings.selected_category_ids;
                if let Some(pos) = ids.iter().position(|id| id == &category.id) {
                    ids.remove(pos);
                } else {
                    ids.push(category.id.clone());
                }
            }
            SetupEffect::None
        }
        KeyCode::Char('r') => {
            let next = match view.settings.recency {
                RecencyMode::Count(current) => {
                    let position = RECENT_COUNTS.iter().position(|&c| c == current);
                    let next = position.map(|p| (p + 1) % RECENT_COUNTS.len()).unwrap_or(0);
                    RecencyMode::Count(RECENT_COUNTS[next])
                }
                RecencyMode::LastWeek => RecencyMode::Count(RECENT_COUNTS[0]),
            };
            view.settings.recency = next;
            SetupEffect::None
        }
        KeyCode::Char('w') => {
            view.settings.recency = RecencyMode::LastWeek;
            SetupEffect::None
        }
        KeyCode::Enter => {
            let count = candidates(&library.words, &view.settings, Utc::now()).len();
            if can_start(count) {
                SetupEffect::Start
            } else {
                SetupEffect::None
            }
        }
        _ => SetupEffect::None,
    }
}

pub fn draw_quiz_setup(f: &mut Frame, view: &QuizSetupView, library: &Library) {
    let layout = calculate_quiz_chunks(f.area());

    let header = Paragraph::new("Quiz setup")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let direction = match view.settings.direction {
        QuizDirection::SourceToTarget => "source → target",
        QuizDirection::TargetToSource => "target → source",
        QuizDirection::Mixed => "mixed",
    };
    let selection = match view.settings.selection_mode {
        SelectionMode::ByCategory => "by category",
        SelectionMode::ByRecency => "recently added",
    };
    let recency = match view.settings.recency {
        RecencyMode::Count(n) => format!("last {} words", n),
        RecencyMode::LastWeek => "last 7 days".to_string(),
    };

    let mut lines = vec![
        Line::from(format!("Direction (d): {}", direction)),
        Line::from(format!("Word selection (m): {}", selection)),
    ];
    match view.settings.selection_mode {
        SelectionMode::ByCategory => {
            lines.push(Line::from(
                "Categories (Space to toggle, empty = all words):",
            ));
            for (i, category) in library.all_categories().iter().enumerate() {
                let marker = if view
                    .settings
                    .selected_category_ids
                    .iter()
                    .any(|id| id == &category.id)
                {
                    "[x]"
                } else {
                    "[ ]"
                };
                let style = if i == view.category_cursor {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!("  {} {}", marker, category.name),
                    style,
                )));
            }
        }
        SelectionMode::ByRecency => {
            lines.push(Line::from(format!("Recency (r / w): {}", recency)));
        }
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Settings"));
    f.render_widget(body, layout.question_area);

    let count = candidates(&library.words, &view.settings, Utc::now()).len();
    let mut status_lines = vec![Line::from(format!("Selected words: {}", count))];
    if !can_start(count) {
        status_lines.push(Line::from(Span::styled(
            format!("At least {} words are needed to start.", MIN_CANDIDATES),
            Style::default().fg(Color::Red),
        )));
    }
    let status = Paragraph::new(status_lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, layout.options_area);

    let help = Paragraph::new(Line::from(vec![
        Span::styled("Enter", key_style()),
        Span::from(" Start  "),
        Span::styled("F1", key_style()),
        Span::from(" Library"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

#[derive(Debug, Default)]
pub struct QuizView {
    pub option_index: usize,
}

#[derive(Debug, PartialEq)]
pub enum QuizEffect {
    None,
    Abandon,
    Finished,
}

pub fn handle_quiz_input(
    view: &mut QuizView,
    session: &mut QuizSession,
    key: KeyEvent,
) -> QuizEffect {
    match key.code {
        KeyCode::Esc => QuizEffect::Abandon,
        KeyCode::Up => {
            if session.selected_answer().is_none() {
                view.option_index = view.option_index.saturating_sub(1);
            }
            QuizEffect::None
        }
        KeyCode::Down => {
            let count = session
                .current_question()
                .map(|q| q.options.len())
                .unwrap_or(0);
            if session.selected_answer().is_none() && view.option_index < count.saturating_sub(1) {
                view.option_index += 1;
            }
            QuizEffect::None
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            submit(view, session, index);
            QuizEffect::None
        }
        KeyCode::Enter => {
            if session.selected_answer().is_none() {
                submit(view, session, view.option_index);
                QuizEffect::None
            } else {
                session.advance();
                view.option_index = 0;
                if session.state() == QuizState::Finished {
                    QuizEffect::Finished
                } else {
                    QuizEffect::None
                }
            }
        }
        _ => QuizEffect::None,
    }
}

fn submit(view: &mut QuizView, session: &mut QuizSession, index: usize) {
    let choice = session
        .current_question()
        .and_then(|q| q.options.get(index).cloned());
    if let Some(choice) = choice {
        view.option_index = index;
        session.answer(&choice);
    }
}

pub fn draw_quiz(f: &mut Frame, view: &QuizView, session: &QuizSession) {
    let layout = calculate_quiz_chunks(f.area());

    let progress = format!(
        "Question {} / {}",
        session.current_index() + 1,
        session.total()
    );
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let Some(question) = session.current_question() else {
        return;
    };

    let prompt = match question.question_type {
        QuestionType::SourceToTarget => {
            format!("What is the translation of \"{}\"?", question.prompt())
        }
        QuestionType::TargetToSource => {
            format!("Which word translates to \"{}\"?", question.prompt())
        }
    };
    let question_widget = Paragraph::new(Text::from(prompt))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question_widget, layout.question_area);

    let mut lines = Vec::new();
    for (i, option) in question.options.iter().enumerate() {
        let style = match session.selected_answer() {
            None => {
                if i == view.option_index {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                }
            }
            Some(selected) => {
                if option.as_str() == question.correct_answer() {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else if option.as_str() == selected {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::DarkGray)
                }
            }
        };
        lines.push(Line::from(Span::styled(
            format!("{}. {}", i + 1, option),
            style,
        )));
    }
    if let Some(selected) = session.selected_answer() {
        lines.push(Line::from(""));
        if selected == question.correct_answer() {
            lines.push(Line::from(Span::styled(
                "Correct!",
                Style::default().fg(Color::Green),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("Incorrect. Correct answer: {}", question.correct_answer()),
                Style::default().fg(Color::Red),
            )));
        }
    }
    let options = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(options, layout.options_area);

    let help_text = if session.selected_answer().is_none() {
        vec![
            Span::styled("1-4", key_style()),
            Span::from(" Answer  "),
            Span::styled("↑/↓", key_style()),
            Span::from(" Select  "),
            Span::styled("Enter", key_style()),
            Span::from(" Submit  "),
            Span::styled("Esc", key_style()),
            Span::from(" Abandon"),
        ]
    } else {
        vec![
            Span::styled("Enter", key_style()),
            Span::from(" Next  "),
            Span::styled("Esc", key_style()),
            Span::from(" Abandon"),
        ]
    };
    let help = Paragraph::new(Line::from(help_text))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}
