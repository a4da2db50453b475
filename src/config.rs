//! Application configuration.
//!
//! Values resolve with priority config.toml > environment > default.
//! The OpenRouter API key is read from the environment by the client
//! library itself.

use std::path::PathBuf;

use serde::Deserialize;

use crate::store;

#[derive(Debug, Deserialize)]
struct FileConfig {
    database: Option<DatabaseConfig>,
    languages: Option<LanguagesConfig>,
    speech: Option<SpeechConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LanguagesConfig {
    source: Option<String>,
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpeechConfig {
    language_tag: Option<String>,
    rate: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// Language being learned, used in AI prompts.
    pub source_language: String,
    /// Language translations are given in.
    pub target_language: String,
    /// BCP 47 tag handed to the speech engine.
    pub speech_language: String,
    pub playback_rate: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: store::default_db_path(),
            source_language: "Swedish".to_string(),
            target_language: "Ukrainian".to_string(),
            speech_language: "sv-SE".to_string(),
            playback_rate: 1.0,
        }
    }
}

pub fn load() -> Config {
    // .env is optional; ignore a missing file.
    let _ = dotenvy::dotenv();

    let mut config = Config::default();

    if let Ok(contents) = std::fs::read_to_string("config.toml")
        && let Ok(file) = toml::from_str::<FileConfig>(&contents)
    {
        if let Some(path) = file.database.and_then(|d| d.path) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(languages) = file.languages {
            if let Some(source) = languages.source {
                config.source_language = source;
            }
            if let Some(target) = languages.target {
                config.target_language = target;
            }
        }
        if let Some(speech) = file.speech {
            if let Some(tag) = speech.language_tag {
                config.speech_language = tag;
            }
            if let Some(rate) = speech.rate {
                config.playback_rate = rate.clamp(0.5, 2.0);
            }
        }
    }

    if let Ok(path) = std::env::var("GLOSOR_DB_PATH") {
        config.database_path = PathBuf::from(path);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source_language, "Swedish");
        assert_eq!(config.target_language, "Ukrainian");
        assert_eq!(config.speech_language, "sv-SE");
        assert_eq!(config.playback_rate, 1.0);
    }

    #[test]
    fn test_file_config_parses_partial_sections() {
        let file: FileConfig = toml::from_str(
            r#"
[languages]
source = "Norwegian"

[speech]
rate = 1.5
"#,
        )
        .unwrap();
        assert_eq!(file.languages.as_ref().unwrap().source.as_deref(), Some("Norwegian"));
        assert!(file.languages.unwrap().target.is_none());
        assert_eq!(file.speech.unwrap().rate, Some(1.5));
        assert!(file.database.is_none());
    }
}
