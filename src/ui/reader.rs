use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::categories;
use crate::models::SavedText;
use crate::speech::HighlightSync;
use crate::tokenizer::{tokenize, TextSpan};
use crate::ui::layout::calculate_reader_chunks;
use crate::vocabulary::Library;

pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;
const RATE_STEP: f32 = 0.1;

#[derive(Debug, PartialEq)]
pub enum ReaderFocus {
    Title,
    Content,
    Text,
}

#[derive(Debug)]
pub struct ReaderView {
    pub focus: ReaderFocus,
    pub title: String,
    pub content: String,
    pub spans: Vec<TextSpan>,
    /// Index into `spans`; always sits on a word span when one exists.
    pub word_cursor: usize,
    pub rate: f32,
    pub loading: bool,
    pub sync: HighlightSync,
}

impl ReaderView {
    pub fn new(rate: f32) -> Self {
        Self {
            focus: ReaderFocus::Title,
            title: String::new(),
            content: String::new(),
            spans: Vec::new(),
            word_cursor: 0,
            rate: rate.clamp(MIN_RATE, MAX_RATE),
            loading: false,
            sync: HighlightSync::new(),
        }
    }

    pub fn open_text(&mut self, text: &SavedText) {
        self.title = text.title.clone();
        self.set_content(text.content.clone());
        self.focus = ReaderFocus::Text;
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.retokenize();
    }

    fn retokenize(&mut self) {
        self.spans = tokenize(&self.content);
        self.sync.cancel();
        self.word_cursor = self
            .spans
            .iter()
            .position(|s| s.is_word)
            .unwrap_or(0);
    }

    pub fn selected_word(&self) -> Option<&TextSpan> {
        self.spans.get(self.word_cursor).filter(|s| s.is_word)
    }

    fn move_word_cursor(&mut self, forward: bool) {
        let positions: Vec<usize> = self
            .spans
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_word)
            .map(|(i, _)| i)
            .collect();
        if positions.is_empty() {
            return;
        }
        let current = positions
            .iter()
            .position(|&i| i == self.word_cursor)
            .unwrap_or(0);
        let next = if forward {
            (current + 1).min(positions.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.word_cursor = positions[next];
    }
}

#[derive(Debug, PartialEq)]
pub enum ReaderEffect {
    None,
    /// Start speaking the whole text at the view's current rate.
    Speak,
    CancelSpeech,
    SaveText,
    /// Look up an unknown word picked from the text.
    AddWord(String),
}

pub fn handle_reader_input(
    view: &mut ReaderView,
    library: &Library,
    key: KeyEvent,
) -> ReaderEffect {
    if key.code == KeyCode::Tab {
        view.focus = match view.focus {
            ReaderFocus::Title => ReaderFocus::Content,
            ReaderFocus::Content => ReaderFocus::Text,
            ReaderFocus::Text => ReaderFocus::Title,
        };
        return ReaderEffect::None;
    }

    match view.focus {
        ReaderFocus::Title => match key.code {
            KeyCode::Char(c) => {
                view.title.push(c);
                ReaderEffect::None
            }
            KeyCode::Backspace => {
                view.title.pop();
                ReaderEffect::None
            }
            _ => ReaderEffect::None,
        },
        ReaderFocus::Content => match key.code {
            KeyCode::Char(c) => {
                view.content.push(c);
                view.retokenize();
                ReaderEffect::None
            }
            KeyCode::Enter => {
                view.content.push('\n');
                view.retokenize();
                ReaderEffect::None
            }
            KeyCode::Backspace => {
                view.content.pop();
                view.retokenize();
                ReaderEffect::None
            }
            _ => ReaderEffect::None,
        },
        ReaderFocus::Text => match key.code {
            KeyCode::Char('p') => {
                if view.sync.is_active() {
                    ReaderEffect::CancelSpeech
                } else if view.content.trim().is_empty() {
                    ReaderEffect::None
                } else {
                    ReaderEffect::Speak
                }
            }
            KeyCode::Char('s') => ReaderEffect::SaveText,
            KeyCode::Char('+') => {
                view.rate = (view.rate + RATE_STEP).min(MAX_RATE);
                ReaderEffect::None
            }
            KeyCode::Char('-') => {
                view.rate = (view.rate - RATE_STEP).max(MIN_RATE);
                ReaderEffect::None
            }
            KeyCode::Left => {
                view.move_word_cursor(false);
                ReaderEffect::None
            }
            KeyCode::Right => {
                view.move_word_cursor(true);
                ReaderEffect::None
            }
            KeyCode::Char('a') => match view.selected_word() {
                Some(span) if !view.loading => {
                    let word = span.text.clone();
                    if library.known_words().contains_key(&word.to_lowercase()) {
                        ReaderEffect::None
                    } else {
                        view.loading = true;
                        ReaderEffect::AddWord(word)
                    }
                }
                _ => ReaderEffect::None,
            },
            _ => ReaderEffect::None,
        },
    }
}

pub fn draw_reader(
    f: &mut Frame,
    view: &ReaderView,
    library: &Library,
    speech_available: bool,
    status: Option<&str>,
) {
    let layout = calculate_reader_chunks(f.area());

    let title_style = if view.focus == ReaderFocus::Title {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title = Paragraph::new(view.title.as_str())
        .style(title_style)
        .block(Block::default().borders(Borders::ALL).title("Title"));
    f.render_widget(title, layout.title_area);

    let saved = library.is_text_saved(&view.title, &view.content);
    let playback = if !speech_available {
        "speech unavailable".to_string()
    } else if view.sync.is_active() {
        "playing".to_string()
    } else {
        "stopped".to_string()
    };
    let mut controls = format!(
        "Playback: {}   Rate: {:.1}x   {}",
        playback,
        view.rate,
        if saved { "Saved" } else { "Not saved" }
    );
    if let Some(span) = view.selected_word() {
        let known = library.known_words();
        match known.get(&span.text.to_lowercase()) {
            Some(entry) => {
                controls.push_str(&format!("   {} = {}", span.text, entry.translation))
            }
            None => controls.push_str(&format!("   \"{}\" not in library (a to add)", span.text)),
        }
    }
    let controls = Paragraph::new(controls)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(controls, layout.controls_area);

    let content_style = if view.focus == ReaderFocus::Content {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let text = Paragraph::new(rendered_lines(view, library))
        .style(content_style)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Text"));
    f.render_widget(text, layout.text_area);

    let help_line = match status {
        Some(message) => Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        None => Line::from(vec![
            Span::styled("Tab", key_style()),
            Span::from(" Focus  "),
            Span::styled("p", key_style()),
            Span::from(" Play/Stop  "),
            Span::styled("+/-", key_style()),
            Span::from(" Rate  "),
            Span::styled("s", key_style()),
            Span::from(" Save  "),
            Span::styled("←/→", key_style()),
            Span::from(" Word  "),
            Span::styled("a", key_style()),
            Span::from(" Add"),
        ]),
    };
    let help = Paragraph::new(help_line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Lays the spans out as styled lines: speech highlight first, then
/// the word cursor, then known-word coloring by part-of-speech
/// category. Separator spans are split on newlines to produce line
/// breaks.
fn rendered_lines<'a>(view: &'a ReaderView, library: &Library) -> Vec<Line<'a>> {
    if view.spans.is_empty() {
        return vec![Line::from(Span::styled(
            "Type or open a text to read it here.",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let known = library.known_words();
    let highlighted = view.sync.highlighted();
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();

    for (i, span) in view.spans.iter().enumerate() {
        let style = if Some(i) == highlighted {
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else if span.is_word && i == view.word_cursor && view.focus == ReaderFocus::Text {
            Style::default().add_modifier(Modifier::REVERSED)
        } else if span.is_word {
            match known.get(&span.text.to_lowercase()) {
                Some(entry) => {
                    let color = entry
                        .category_ids
                        .iter()
                        .find_map(|id| categories::part_of_speech_color(id))
                        .unwrap_or(Color::Cyan);
                    Style::default().fg(color).add_modifier(Modifier::UNDERLINED)
                }
                None => Style::default(),
            }
        } else {
            Style::default()
        };

        if span.text.contains('\n') {
            let mut first = true;
            for piece in span.text.split('\n') {
                if !first {
                    lines.push(Line::from(std::mem::take(&mut current)));
                }
                if !piece.is_empty() {
                    current.push(Span::styled(piece, style));
                }
                first = false;
            }
        } else {
            current.push(Span::styled(span.text.as_str(), style));
        }
    }
    lines.push(Line::from(current));
    lines
}
