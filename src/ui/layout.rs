use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct LibraryLayout {
    pub header_area: Rect,
    pub input_area: Rect,
    pub list_area: Rect,
    pub help_area: Rect,
}

pub struct ReaderLayout {
    pub title_area: Rect,
    pub controls_area: Rect,
    pub text_area: Rect,
    pub help_area: Rect,
}

pub struct QuizLayout {
    pub header_area: Rect,
    pub question_area: Rect,
    pub options_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_library_chunks(area: Rect) -> LibraryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    LibraryLayout {
        header_area: chunks[0],
        input_area: chunks[1],
        list_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_reader_chunks(area: Rect) -> ReaderLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    ReaderLayout {
        title_area: chunks[0],
        controls_area: chunks[1],
        text_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        question_area: chunks[1],
        options_area: chunks[2],
        help_area: chunks[3],
    }
}
