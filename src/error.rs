use thiserror::Error;

use crate::speech::SpeechError;

#[derive(Error, Debug)]
pub enum GlosorError {
    #[error("storage error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The AI service is unavailable. Please try again.")]
    AiUnavailable,

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("{0}")]
    Invalid(String),
}

impl GlosorError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GlosorError::Invalid(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GlosorError>;
