pub mod layout;
mod library;
mod quiz;
mod reader;
mod summary;
mod texts;

pub use library::{
    draw_library, handle_library_input, CategoryEdit, LibraryEffect, LibraryFocus, LibraryView,
    PendingWords,
};
pub use quiz::{
    draw_quiz, draw_quiz_setup, handle_quiz_input, handle_quiz_setup_input, QuizEffect,
    QuizSetupView, QuizView, SetupEffect,
};
pub use reader::{draw_reader, handle_reader_input, ReaderEffect, ReaderFocus, ReaderView};
pub use summary::draw_summary;
pub use texts::{draw_texts, handle_texts_input, TextsEffect, TextsMode, TextsView};
