pub mod ai;
pub mod ai_worker;
pub mod categories;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod speech;
pub mod store;
pub mod tokenizer;
pub mod ui;
pub mod utils;
pub mod vocabulary;

// Re-exports for convenience
pub use ai::{parse_new_example, parse_word_details, ExamplePair, OpenRouterClient, WordDetails};
pub use error::{GlosorError, Result};
pub use models::{AiRequest, AiResponse, AppState, Category, Example, Folder, SavedText, WordEntry};
pub use quiz::{
    candidates, generate_questions, QuizDirection, QuizQuestion, QuizSession, QuizSettings,
    QuizState, MIN_CANDIDATES,
};
pub use speech::{HighlightSync, SpeechEngine, SpeechError, SpeechEvent, SpeechUpdate};
pub use tokenizer::{tokenize, TextSpan};
pub use vocabulary::Library;
