use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::{ExamplePair, WordDetails};

/// A single example sentence pair. Immutable once created; words hold
/// an append-only list of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub id: Uuid,
    pub source: String,
    pub translation: String,
}

impl Example {
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            translation: translation.into(),
        }
    }

    pub fn from_pair(pair: ExamplePair) -> Self {
        Self::new(pair.source, pair.translation)
    }
}

/// One vocabulary entry. `id` is unique; duplicate base forms are
/// allowed (the same word can be added as several parts of speech).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: Uuid,
    /// Bare form used for matching in texts.
    pub base_form: String,
    /// Form shown to the user, e.g. "bil (en)" or "dricka (att)".
    pub display_form: String,
    pub part_of_speech: String,
    pub translation: String,
    pub examples: Vec<Example>,
    pub category_ids: Vec<String>,
    pub added_at: DateTime<Utc>,
}

impl WordEntry {
    pub fn from_details(base_form: &str, details: WordDetails, category_ids: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            base_form: base_form.to_string(),
            display_form: details.display_form,
            part_of_speech: details.part_of_speech,
            translation: details.translation,
            examples: vec![Example::new(
                details.example_source,
                details.example_translation,
            )],
            category_ids,
            added_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedText {
    pub id: String,
    pub title: String,
    pub content: String,
    pub added_at: DateTime<Utc>,
    pub folder_id: Option<String>,
}

/// Requests handled by the AI worker thread.
#[derive(Debug)]
pub enum AiRequest {
    WordDetails {
        word: String,
    },
    NewExample {
        word_id: Uuid,
        word: String,
        existing: Vec<String>,
    },
}

/// Responses delivered back to the UI loop.
#[derive(Debug)]
pub enum AiResponse {
    WordDetails {
        word: String,
        entries: Vec<WordDetails>,
    },
    NewExample {
        word_id: Uuid,
        example: ExamplePair,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Library,
    Reader,
    Texts,
    QuizSetup,
    Quiz,
    QuizSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> WordDetails {
        WordDetails {
            display_form: "hund (en)".to_string(),
            part_of_speech: "noun".to_string(),
            translation: "собака".to_string(),
            example_source: "Min hund är snäll.".to_string(),
            example_translation: "Мій собака добрий.".to_string(),
        }
    }

    #[test]
    fn test_word_entry_from_details() {
        let entry = WordEntry::from_details("hund", details(), vec!["nouns".to_string()]);
        assert_eq!(entry.base_form, "hund");
        assert_eq!(entry.display_form, "hund (en)");
        assert_eq!(entry.translation, "собака");
        assert_eq!(entry.examples.len(), 1);
        assert_eq!(entry.category_ids, vec!["nouns".to_string()]);
    }

    #[test]
    fn test_word_entries_get_unique_ids() {
        let a = WordEntry::from_details("hund", details(), vec![]);
        let b = WordEntry::from_details("hund", details(), vec![]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_word_entry_snapshot_roundtrip() {
        let entry = WordEntry::from_details("hund", details(), vec!["nouns".to_string()]);
        let json = serde_json::to_string(&entry).unwrap();
        let back: WordEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
