use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::SavedText;
use crate::utils::truncate_to_width;
use crate::vocabulary::Library;

#[derive(Debug, PartialEq)]
pub enum TextsMode {
    Browse,
    /// Typing a name for a new folder.
    NewFolder(String),
}

#[derive(Debug)]
pub struct TextsView {
    /// 0 selects "all texts"; folder n is at index n + 1.
    pub folder_index: usize,
    pub text_index: usize,
    pub mode: TextsMode,
}

impl Default for TextsView {
    fn default() -> Self {
        Self {
            folder_index: 0,
            text_index: 0,
            mode: TextsMode::Browse,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum TextsEffect {
    None,
    Open(SavedText),
    Save,
}

impl TextsView {
    fn selected_folder_id(&self, library: &Library) -> Option<String> {
        if self.folder_index == 0 {
            None
        } else {
            library
                .folders
                .get(self.folder_index - 1)
                .map(|f| f.id.clone())
        }
    }

    /// Texts visible under the current folder selection.
    pub fn visible_texts<'a>(&self, library: &'a Library) -> Vec<&'a SavedText> {
        match self.selected_folder_id(library) {
            None => library.texts.iter().collect(),
            Some(folder_id) => library
                .texts
                .iter()
                .filter(|t| t.folder_id.as_deref() == Some(folder_id.as_str()))
                .collect(),
        }
    }
}

pub fn handle_texts_input(
    view: &mut TextsView,
    library: &mut Library,
    key: KeyEvent,
) -> TextsEffect {
    if let TextsMode::NewFolder(name) = &mut view.mode {
        match key.code {
            KeyCode::Esc => {
                view.mode = TextsMode::Browse;
                return TextsEffect::None;
            }
            KeyCode::Enter => {
                let name = name.clone();
                view.mode = TextsMode::Browse;
                return match library.add_folder(&name) {
                    Ok(()) => TextsEffect::Save,
                    Err(_) => TextsEffect::None,
                };
            }
            KeyCode::Backspace => {
                name.pop();
                return TextsEffect::None;
            }
            KeyCode::Char(c) => {
                name.push(c);
                return TextsEffect::None;
            }
            _ => return TextsEffect::None,
        }
    }

    match key.code {
        KeyCode::Left => {
            view.folder_index = view.folder_index.saturating_sub(1);
            view.text_index = 0;
            TextsEffect::None
        }
        KeyCode::Right => {
            if view.folder_index < library.folders.len() {
                view.folder_index += 1;
            }
            view.text_index = 0;
            TextsEffect::None
        }
        KeyCode::Up => {
            view.text_index = view.text_index.saturating_sub(1);
            TextsEffect::None
        }
        KeyCode::Down => {
            let count = view.visible_texts(library).len();
            if view.text_index < count.saturating_sub(1) {
                view.text_index += 1;
            }
            TextsEffect::None
        }
        KeyCode::Enter => match view.visible_texts(library).get(view.text_index) {
            Some(text) => TextsEffect::Open((*text).clone()),
            None => TextsEffect::None,
        },
        KeyCode::Char('d') => {
            let id = view
                .visible_texts(library)
                .get(view.text_index)
                .map(|t| t.id.clone());
            match id {
                Some(id) => {
                    library.delete_text(&id);
                    let count = view.visible_texts(library).len();
                    view.text_index = view.text_index.min(count.saturating_sub(1));
                    TextsEffect::Save
                }
                None => TextsEffect::None,
            }
        }
        KeyCode::Char('m') => {
            let id = view
                .visible_texts(library)
                .get(view.text_index)
                .map(|t| t.id.clone());
            match id {
                Some(id) => {
                    library.move_text(&id, view.selected_folder_id(library));
                    TextsEffect::Save
                }
                None => TextsEffect::None,
            }
        }
        KeyCode::Char('n') => {
            view.mode = TextsMode::NewFolder(String::new());
            TextsEffect::None
        }
        KeyCode::Char('x') => match view.selected_folder_id(library) {
            Some(folder_id) => {
                library.delete_folder(&folder_id);
                view.folder_index = 0;
                TextsEffect::Save
            }
            None => TextsEffect::None,
        },
        _ => TextsEffect::None,
    }
}

pub fn draw_texts(f: &mut Frame, view: &TextsView, library: &Library, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new("Saved texts")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let mut folder_spans = Vec::new();
    let names: Vec<String> = std::iter::once("All".to_string())
        .chain(library.folders.iter().map(|f| f.name.clone()))
        .collect();
    for (i, name) in names.iter().enumerate() {
        let style = if i == view.folder_index {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        folder_spans.push(Span::styled(format!(" {} ", name), style));
    }
    let folders = Paragraph::new(Line::from(folder_spans))
        .block(Block::default().borders(Borders::ALL).title("Folders"));
    f.render_widget(folders, chunks[1]);

    let width = chunks[2].width.saturating_sub(2) as usize;
    let visible = view.visible_texts(library);
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let row = format!(
                "{} ({})",
                text.title,
                text.added_at.format("%Y-%m-%d")
            );
            let style = if i == view.text_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(truncate_to_width(&row, width)).style(style)
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Texts"));
    f.render_widget(list, chunks[2]);

    let help_line = if let TextsMode::NewFolder(name) = &view.mode {
        Line::from(format!("New folder name: {}_  (Enter to create, Esc to cancel)", name))
    } else if let Some(message) = status {
        Line::from(Span::styled(message, Style::default().fg(Color::Red)))
    } else {
        Line::from(vec![
            Span::styled("Enter", key_style()),
            Span::from(" Open  "),
            Span::styled("←/→", key_style()),
            Span::from(" Folder  "),
            Span::styled("m", key_style()),
            Span::from(" Move here  "),
            Span::styled("n", key_style()),
            Span::from(" New folder  "),
            Span::styled("x", key_style()),
            Span::from(" Delete folder  "),
            Span::styled("d", key_style()),
            Span::from(" Delete text"),
        ])
    };
    let help = Paragraph::new(help_line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn library_with_texts() -> Library {
        let mut library = Library::default();
        library.save_text("Första", "Det var en gång.").unwrap();
        library.save_text("Andra", "Slutet gott.").unwrap();
        library.add_folder("Sagor").unwrap();
        library
    }

    #[test]
    fn test_open_selected_text() {
        let mut view = TextsView::default();
        let mut library = library_with_texts();
        // Texts are prepended: index 0 is the latest.
        let effect = handle_texts_input(&mut view, &mut library, key(KeyCode::Enter));
        match effect {
            TextsEffect::Open(text) => assert_eq!(text.title, "Andra"),
            other => panic!("unexpected effect: {:?}", other),
        }
    }

    #[test]
    fn test_folder_filter_shows_only_its_texts() {
        let mut view = TextsView::default();
        let mut library = library_with_texts();
        let folder_id = library.folders[0].id.clone();
        let text_id = library.texts[1].id.clone();
        library.move_text(&text_id, Some(folder_id));

        handle_texts_input(&mut view, &mut library, key(KeyCode::Right));
        let visible = view.visible_texts(&library);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Första");
    }

    #[test]
    fn test_move_text_into_selected_folder() {
        let mut view = TextsView::default();
        let mut library = library_with_texts();

        handle_texts_input(&mut view, &mut library, key(KeyCode::Right));
        let effect = handle_texts_input(&mut view, &mut library, key(KeyCode::Char('m')));
        // Nothing visible in the empty folder yet, so no move happened.
        assert_eq!(effect, TextsEffect::None);

        handle_texts_input(&mut view, &mut library, key(KeyCode::Left));
        let effect = handle_texts_input(&mut view, &mut library, key(KeyCode::Char('m')));
        // "All" is selected: moving clears the folder assignment.
        assert_eq!(effect, TextsEffect::Save);
        assert_eq!(library.texts[0].folder_id, None);
    }

    #[test]
    fn test_new_folder_flow() {
        let mut view = TextsView::default();
        let mut library = library_with_texts();

        handle_texts_input(&mut view, &mut library, key(KeyCode::Char('n')));
        for c in "Dikter".chars() {
            handle_texts_input(&mut view, &mut library, key(KeyCode::Char(c)));
        }
        let effect = handle_texts_input(&mut view, &mut library, key(KeyCode::Enter));
        assert_eq!(effect, TextsEffect::Save);
        assert_eq!(view.mode, TextsMode::Browse);
        assert!(library.folders.iter().any(|f| f.name == "Dikter"));
    }

    #[test]
    fn test_duplicate_folder_from_input_is_rejected() {
        let mut view = TextsView::default();
        let mut library = library_with_texts();

        handle_texts_input(&mut view, &mut library, key(KeyCode::Char('n')));
        for c in "Sagor".chars() {
            handle_texts_input(&mut view, &mut library, key(KeyCode::Char(c)));
        }
        let effect = handle_texts_input(&mut view, &mut library, key(KeyCode::Enter));
        assert_eq!(effect, TextsEffect::None);
        assert_eq!(library.folders.len(), 1);
    }

    #[test]
    fn test_delete_text_clamps_selection() {
        let mut view = TextsView::default();
        let mut library = library_with_texts();
        view.text_index = 1;

        let effect = handle_texts_input(&mut view, &mut library, key(KeyCode::Char('d')));
        assert_eq!(effect, TextsEffect::Save);
        assert_eq!(library.texts.len(), 1);
        assert_eq!(view.text_index, 0);
    }

    #[test]
    fn test_delete_folder_via_key_keeps_texts() {
        let mut view = TextsView::default();
        let mut library = library_with_texts();

        handle_texts_input(&mut view, &mut library, key(KeyCode::Right));
        let effect = handle_texts_input(&mut view, &mut library, key(KeyCode::Char('x')));
        assert_eq!(effect, TextsEffect::Save);
        assert!(library.folders.is_empty());
        assert_eq!(library.texts.len(), 2);
        assert_eq!(view.folder_index, 0);
    }
}
