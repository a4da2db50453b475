//! Built-in category data.
//!
//! Part-of-speech categories are fixed and carry a display color;
//! thematic categories are just a starting set the user can extend.

use ratatui::style::Color;

use crate::models::Category;

const PART_OF_SPEECH: &[(&str, &str)] = &[
    ("nouns", "Nouns"),
    ("verbs", "Verbs"),
    ("adjectives", "Adjectives"),
    ("adverbs", "Adverbs"),
    ("pronouns", "Pronouns"),
    ("prepositions", "Prepositions"),
    ("conjunctions", "Conjunctions"),
    ("numerals", "Numerals"),
];

const THEMATIC: &[(&str, &str)] = &[
    ("family-people", "Family & people"),
    ("food-drink", "Food & drink"),
    ("home", "Home"),
    ("work-school", "Work & school"),
    ("leisure-hobbies", "Leisure & hobbies"),
    ("nature-animals", "Nature & animals"),
    ("travel", "Travel"),
    ("clothes", "Clothes"),
    ("body-parts", "Body parts"),
    ("feelings-emotions", "Feelings & emotions"),
];

pub fn part_of_speech_categories() -> Vec<Category> {
    PART_OF_SPEECH
        .iter()
        .map(|(id, name)| Category {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn default_thematic_categories() -> Vec<Category> {
    THEMATIC
        .iter()
        .map(|(id, name)| Category {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn is_part_of_speech(id: &str) -> bool {
    PART_OF_SPEECH.iter().any(|(pos_id, _)| *pos_id == id)
}

/// Category id automatically assigned for an AI-reported part of
/// speech; unknown values get no automatic category.
pub fn category_for_part_of_speech(part_of_speech: &str) -> Option<&'static str> {
    match part_of_speech.trim().to_lowercase().as_str() {
        "noun" => Some("nouns"),
        "verb" => Some("verbs"),
        "adjective" => Some("adjectives"),
        "adverb" => Some("adverbs"),
        "pronoun" => Some("pronouns"),
        "preposition" => Some("prepositions"),
        "conjunction" => Some("conjunctions"),
        "numeral" => Some("numerals"),
        _ => None,
    }
}

/// Reader color for known words in a part-of-speech category.
pub fn part_of_speech_color(id: &str) -> Option<Color> {
    match id {
        "nouns" => Some(Color::Rgb(100, 116, 139)),
        "verbs" => Some(Color::Rgb(14, 165, 233)),
        "adjectives" => Some(Color::Rgb(245, 158, 11)),
        "adverbs" => Some(Color::Rgb(132, 204, 22)),
        "pronouns" => Some(Color::Rgb(139, 92, 246)),
        "prepositions" => Some(Color::Rgb(20, 184, 166)),
        "conjunctions" => Some(Color::Rgb(225, 29, 72)),
        "numerals" => Some(Color::Rgb(113, 113, 122)),
        _ => None,
    }
}
