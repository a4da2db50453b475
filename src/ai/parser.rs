use serde::{Deserialize, Serialize};

fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    // Models sometimes wrap the payload in prose; keep the outermost
    // JSON value.
    let array_start = cleaned.find('[');
    let object_start = cleaned.find('{');
    match (array_start, object_start) {
        (Some(a), Some(o)) if a < o => {
            if let Some(end) = cleaned.rfind(']') {
                cleaned = cleaned[a..=end].to_string();
            }
        }
        (_, Some(o)) => {
            if let Some(end) = cleaned.rfind('}') {
                cleaned = cleaned[o..=end].to_string();
            }
        }
        (Some(a), None) => {
            if let Some(end) = cleaned.rfind(']') {
                cleaned = cleaned[a..=end].to_string();
            }
        }
        (None, None) => {}
    }

    cleaned.trim().to_string()
}

/// One dictionary entry for a looked-up word. A single word can yield
/// several of these, one per part of speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDetails {
    pub display_form: String,
    pub part_of_speech: String,
    pub translation: String,
    pub example_source: String,
    pub example_translation: String,
}

/// A freshly generated example sentence pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub source: String,
    pub translation: String,
}

pub fn parse_word_details(response: &str) -> Result<Vec<WordDetails>, String> {
    let cleaned = clean_json_response(response);
    let entries: Vec<WordDetails> = serde_json::from_str(&cleaned).map_err(|e| {
        format!(
            "Failed to parse word details: {}\nRaw: {}\nCleaned: {}",
            e, response, cleaned
        )
    })?;

    if entries.is_empty() {
        return Err(format!("Word details response is empty. Raw: {}", response));
    }

    Ok(entries)
}

pub fn parse_new_example(response: &str) -> Result<ExamplePair, String> {
    let cleaned = clean_json_response(response);
    serde_json::from_str(&cleaned).map_err(|e| {
        format!(
            "Failed to parse example: {}\nRaw: {}\nCleaned: {}",
            e, response, cleaned
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_json_response_simple() {
        let json = r#"{"source":"Hunden sover."}"#;
        let cleaned = clean_json_response(json);
        assert_eq!(cleaned, r#"{"source":"Hunden sover."}"#);
    }

    #[test]
    fn test_clean_json_response_markdown() {
        let json = r#"```json
{"source": "Hunden sover.", "translation": "Собака спить."}
```"#;
        let cleaned = clean_json_response(json);
        assert_eq!(
            cleaned,
            r#"{"source": "Hunden sover.", "translation": "Собака спить."}"#
        );
    }

    #[test]
    fn test_clean_json_response_with_text() {
        let json = r#"Here's your response: {"source": "Hej!"} thanks"#;
        let cleaned = clean_json_response(json);
        assert_eq!(cleaned, r#"{"source": "Hej!"}"#);
    }

    #[test]
    fn test_clean_json_array_with_text() {
        let json = r#"The entries are: [{"a": 1}, {"a": 2}] as requested"#;
        let cleaned = clean_json_response(json);
        assert_eq!(cleaned, r#"[{"a": 1}, {"a": 2}]"#);
    }

    #[test]
    fn test_parse_word_details_array() {
        let json = r#"[
            {
                "display_form": "dricka (att)",
                "part_of_speech": "verb",
                "translation": "пити",
                "example_source": "Jag vill dricka vatten.",
                "example_translation": "Я хочу пити воду."
            },
            {
                "display_form": "dricka (en)",
                "part_of_speech": "noun",
                "translation": "напій",
                "example_source": "En kall dricka är gott.",
                "example_translation": "Холодний напій смачний."
            }
        ]"#;

        let entries = parse_word_details(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].part_of_speech, "verb");
        assert_eq!(entries[1].display_form, "dricka (en)");
    }

    #[test]
    fn test_parse_word_details_rejects_empty_array() {
        assert!(parse_word_details("[]").is_err());
    }

    #[test]
    fn test_parse_word_details_rejects_non_array() {
        assert!(parse_word_details(r#"{"display_form": "hund"}"#).is_err());
        assert!(parse_word_details("not json at all").is_err());
    }

    #[test]
    fn test_parse_new_example() {
        let json = r#"```json
{
    "source": "Hunden springer i parken.",
    "translation": "Собака бігає в парку."
}
```"#;
        let pair = parse_new_example(json).unwrap();
        assert_eq!(pair.source, "Hunden springer i parken.");
        assert_eq!(pair.translation, "Собака бігає в парку.");
    }

    #[test]
    fn test_parse_new_example_missing_field_fails() {
        assert!(parse_new_example(r#"{"source": "Hej"}"#).is_err());
    }
}
