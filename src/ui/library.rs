use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use uuid::Uuid;

use crate::ai::WordDetails;
use crate::models::{Category, WordEntry};
use crate::ui::layout::calculate_library_chunks;
use crate::utils::truncate_to_width;
use crate::vocabulary::{initial_category_ids, Library};

/// Entries fetched from the AI, waiting for the user to confirm and
/// pick thematic categories.
#[derive(Debug)]
pub struct PendingWords {
    pub base_form: String,
    pub entries: Vec<WordDetails>,
    pub selected_category_ids: Vec<String>,
    pub category_cursor: usize,
}

/// Re-assigning categories for an existing word.
#[derive(Debug)]
pub struct CategoryEdit {
    pub word_id: Uuid,
    pub selected: Vec<String>,
    pub cursor: usize,
}

#[derive(Debug, PartialEq)]
pub enum LibraryFocus {
    Input,
    List,
}

#[derive(Debug)]
pub struct LibraryView {
    pub focus: LibraryFocus,
    pub input: String,
    pub list_index: usize,
    pub loading: bool,
    pub pending: Option<PendingWords>,
    pub category_edit: Option<CategoryEdit>,
}

impl Default for LibraryView {
    fn default() -> Self {
        Self {
            focus: LibraryFocus::Input,
            input: String::new(),
            list_index: 0,
            loading: false,
            pending: None,
            category_edit: None,
        }
    }
}

/// Side effects the main loop must carry out after a key was handled.
#[derive(Debug, PartialEq)]
pub enum LibraryEffect {
    None,
    FetchDetails(String),
    FetchExample {
        word_id: Uuid,
        word: String,
        existing: Vec<String>,
    },
    /// The library changed and snapshots must be re-saved.
    Save,
}

pub fn handle_library_input(
    view: &mut LibraryView,
    library: &mut Library,
    key: KeyEvent,
) -> LibraryEffect {
    if view.pending.is_some() {
        return handle_pending_input(view, library, key);
    }
    if view.category_edit.is_some() {
        return handle_category_edit_input(view, library, key);
    }

    match view.focus {
        LibraryFocus::Input => match key.code {
            KeyCode::Tab => {
                view.focus = LibraryFocus::List;
                LibraryEffect::None
            }
            KeyCode::Enter => {
                let word = view.input.trim().to_string();
                if word.is_empty() || view.loading {
                    LibraryEffect::None
                } else {
                    view.loading = true;
                    LibraryEffect::FetchDetails(word)
                }
            }
            KeyCode::Backspace => {
                view.input.pop();
                LibraryEffect::None
            }
            KeyCode::Char(c) => {
                view.input.push(c);
                LibraryEffect::None
            }
            _ => LibraryEffect::None,
        },
        LibraryFocus::List => match key.code {
            KeyCode::Tab => {
                view.focus = LibraryFocus::Input;
                LibraryEffect::None
            }
            KeyCode::Up => {
                view.list_index = view.list_index.saturating_sub(1);
                LibraryEffect::None
            }
            KeyCode::Down => {
                if view.list_index < library.words.len().saturating_sub(1) {
                    view.list_index += 1;
                }
                LibraryEffect::None
            }
            KeyCode::Char('d') => match selected_word(view, library) {
                Some(word) => {
                    let id = word.id;
                    library.delete_word(id);
                    view.list_index = view.list_index.min(library.words.len().saturating_sub(1));
                    LibraryEffect::Save
                }
                None => LibraryEffect::None,
            },
            KeyCode::Char('e') => match selected_word(view, library) {
                Some(word) if !view.loading => {
                    view.loading = true;
                    LibraryEffect::FetchExample {
                        word_id: word.id,
                        word: word.base_form.clone(),
                        existing: word.examples.iter().map(|e| e.source.clone()).collect(),
                    }
                }
                _ => LibraryEffect::None,
            },
            KeyCode::Char('c') => {
                if let Some(word) = selected_word(view, library) {
                    view.category_edit = Some(CategoryEdit {
                        word_id: word.id,
                        selected: word.category_ids.clone(),
                        cursor: 0,
                    });
                }
                LibraryEffect::None
            }
            _ => LibraryEffect::None,
        },
    }
}

fn selected_word<'a>(view: &LibraryView, library: &'a Library) -> Option<&'a WordEntry> {
    library.words.get(view.list_index)
}

fn handle_pending_input(
    view: &mut LibraryView,
    library: &mut Library,
    key: KeyEvent,
) -> LibraryEffect {
    let thematic_count = library.thematic.len();
    let Some(pending) = view.pending.as_mut() else {
        return LibraryEffect::None;
    };
    match key.code {
        KeyCode::Esc => {
            view.pending = None;
            LibraryEffect::None
        }
        KeyCode::Up => {
            pending.category_cursor = pending.category_cursor.saturating_sub(1);
            LibraryEffect::None
        }
        KeyCode::Down => {
            if pending.category_cursor < thematic_count.saturating_sub(1) {
                pending.category_cursor += 1;
            }
            LibraryEffect::None
        }
        KeyCode::Char(' ') => {
            if let Some(category) = library.thematic.get(pending.category_cursor) {
                toggle(&mut pending.selected_category_ids, &category.id);
            }
            LibraryEffect::None
        }
        KeyCode::Enter => {
            let pending = view.pending.take().unwrap();
            let entries = pending
                .entries
                .into_iter()
                .map(|details| {
                    let ids =
                        initial_category_ids(&details.part_of_speech, &pending.selected_category_ids);
                    WordEntry::from_details(&pending.base_form, details, ids)
                })
                .collect();
            library.add_words(entries);
            view.input.clear();
            LibraryEffect::Save
        }
        _ => LibraryEffect::None,
    }
}

fn handle_category_edit_input(
    view: &mut LibraryView,
    library: &mut Library,
    key: KeyEvent,
) -> LibraryEffect {
    let all = library.all_categories();
    let Some(edit) = view.category_edit.as_mut() else {
        return LibraryEffect::None;
    };
    match key.code {
        KeyCode::Esc => {
            view.category_edit = None;
            LibraryEffect::None
        }
        KeyCode::Up => {
            edit.cursor = edit.cursor.saturating_sub(1);
            LibraryEffect::None
        }
        KeyCode::Down => {
            if edit.cursor < all.len().saturating_sub(1) {
                edit.cursor += 1;
            }
            LibraryEffect::None
        }
        KeyCode::Char(' ') => {
            if let Some(category) = all.get(edit.cursor) {
                toggle(&mut edit.selected, &category.id);
            }
            LibraryEffect::None
        }
        KeyCode::Enter => {
            let edit = view.category_edit.take().unwrap();
            library.set_word_categories(edit.word_id, edit.selected);
            LibraryEffect::Save
        }
        _ => LibraryEffect::None,
    }
}

fn toggle(ids: &mut Vec<String>, id: &str) {
    if let Some(pos) = ids.iter().position(|existing| existing == id) {
        ids.remove(pos);
    } else {
        ids.push(id.to_string());
    }
}

pub fn draw_library(
    f: &mut Frame,
    view: &LibraryView,
    library: &Library,
    status: Option<&str>,
) {
    let layout = calculate_library_chunks(f.area());

    let header = Paragraph::new(format!("Glosor - {} words", library.words.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let input_title = if view.loading {
        "New word (fetching from AI...)"
    } else {
        "New word (Enter to look up)"
    };
    let input_style = if view.focus == LibraryFocus::Input {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(view.input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, layout.input_area);

    let width = layout.list_area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = library
        .words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let row = format!(
                "{} = {}  [{}]",
                word.display_form, word.translation, word.part_of_speech
            );
            let style = if i == view.list_index && view.focus == LibraryFocus::List {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(truncate_to_width(&row, width)).style(style)
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Words"));
    f.render_widget(list, layout.list_area);

    let help_line = match status {
        Some(message) => Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        None => Line::from(vec![
            Span::styled("Tab", key_style()),
            Span::from(" Focus  "),
            Span::styled("d", key_style()),
            Span::from(" Delete  "),
            Span::styled("e", key_style()),
            Span::from(" Example  "),
            Span::styled("c", key_style()),
            Span::from(" Categories  "),
            Span::styled("F2", key_style()),
            Span::from(" Reader  "),
            Span::styled("F4", key_style()),
            Span::from(" Quiz"),
        ]),
    };
    let help = Paragraph::new(help_line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);

    if let Some(pending) = &view.pending {
        draw_pending_popup(f, pending, &library.thematic);
    } else if let Some(edit) = &view.category_edit {
        draw_category_edit_popup(f, edit, &library.all_categories());
    }
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn centered_popup(f: &Frame) -> ratatui::layout::Rect {
    let area = f.area();
    let width = (area.width * 3 / 4).max(30).min(area.width);
    let height = (area.height * 3 / 4).max(10).min(area.height);
    ratatui::layout::Rect::new(
        (area.width - width) / 2,
        (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_pending_popup(f: &mut Frame, pending: &PendingWords, thematic: &[Category]) {
    let area = centered_popup(f);
    f.render_widget(Clear, area);

    let mut lines = vec![Line::from(Span::styled(
        format!("Found for \"{}\":", pending.base_form),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for entry in &pending.entries {
        lines.push(Line::from(format!(
            "  {} = {}  [{}]",
            entry.display_form, entry.translation, entry.part_of_speech
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Thematic categories (Space to toggle):"));
    for (i, category) in thematic.iter().enumerate() {
        let marker = if pending
            .selected_category_ids
            .iter()
            .any(|id| id == &category.id)
        {
            "[x]"
        } else {
            "[ ]"
        };
        let style = if i == pending.category_cursor {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", marker, category.name),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Enter to add, Esc to discard"));

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirm new words"),
    );
    f.render_widget(popup, area);
}

fn draw_category_edit_popup(f: &mut Frame, edit: &CategoryEdit, all: &[Category]) {
    let area = centered_popup(f);
    f.render_widget(Clear, area);

    let mut lines = vec![Line::from("Categories (Space to toggle):")];
    for (i, category) in all.iter().enumerate() {
        let marker = if edit.selected.iter().any(|id| id == &category.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let style = if i == edit.cursor {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", marker, category.name),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Enter to apply, Esc to cancel"));

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Edit categories"),
    );
    f.render_widget(popup, area);
}
