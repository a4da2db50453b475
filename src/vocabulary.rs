//! The user's word collection plus the surrounding library records
//! (thematic categories, folders, saved texts) and the CRUD rules that
//! go with them.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::categories;
use crate::error::{GlosorError, Result};
use crate::models::{Category, Example, Folder, SavedText, WordEntry};

#[derive(Debug, Default, Clone)]
pub struct Library {
    pub words: Vec<WordEntry>,
    pub thematic: Vec<Category>,
    pub folders: Vec<Folder>,
    pub texts: Vec<SavedText>,
}

impl Library {
    pub fn new(
        words: Vec<WordEntry>,
        thematic: Vec<Category>,
        folders: Vec<Folder>,
        texts: Vec<SavedText>,
    ) -> Self {
        Self {
            words,
            thematic,
            folders,
            texts,
        }
    }

    /// Newest words first, matching how entries are listed.
    pub fn add_words(&mut self, entries: Vec<WordEntry>) {
        for entry in entries.into_iter().rev() {
            self.words.insert(0, entry);
        }
    }

    pub fn delete_word(&mut self, id: Uuid) {
        self.words.retain(|word| word.id != id);
    }

    pub fn word(&self, id: Uuid) -> Option<&WordEntry> {
        self.words.iter().find(|word| word.id == id)
    }

    pub fn set_word_categories(&mut self, id: Uuid, category_ids: Vec<String>) {
        if let Some(word) = self.words.iter_mut().find(|word| word.id == id) {
            word.category_ids = category_ids;
        }
    }

    pub fn append_example(&mut self, id: Uuid, example: Example) {
        if let Some(word) = self.words.iter_mut().find(|word| word.id == id) {
            word.examples.push(example);
        }
    }

    /// Case-insensitive base-form lookup for the reader. When the same
    /// base form was added more than once, the earliest entry in the
    /// list wins.
    pub fn known_words(&self) -> HashMap<String, &WordEntry> {
        let mut map = HashMap::new();
        for word in &self.words {
            map.entry(word.base_form.to_lowercase()).or_insert(word);
        }
        map
    }

    /// Built-in part-of-speech categories followed by the thematic
    /// ones.
    pub fn all_categories(&self) -> Vec<Category> {
        let mut all = categories::part_of_speech_categories();
        all.extend(self.thematic.iter().cloned());
        all
    }

    pub fn add_thematic_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GlosorError::invalid("Category name cannot be empty."));
        }
        if self
            .all_categories()
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
        {
            return Err(GlosorError::invalid(format!(
                "A category named \"{}\" already exists.",
                name
            )));
        }
        self.thematic.push(Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn rename_thematic_category(&mut self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GlosorError::invalid("Category name cannot be empty."));
        }
        match self.thematic.iter_mut().find(|c| c.id == id) {
            Some(category) => {
                category.name = name.to_string();
                Ok(())
            }
            None => Err(GlosorError::invalid("No such category.")),
        }
    }

    pub fn add_folder(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty()
            || self
                .folders
                .iter()
                .any(|f| f.name.eq_ignore_ascii_case(name))
        {
            return Err(GlosorError::invalid(
                "A folder with this name already exists, or the name is empty.",
            ));
        }
        self.folders.push(Folder {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    /// Removes the folder; its texts move to uncategorized.
    pub fn delete_folder(&mut self, id: &str) {
        for text in &mut self.texts {
            if text.folder_id.as_deref() == Some(id) {
                text.folder_id = None;
            }
        }
        self.folders.retain(|folder| folder.id != id);
    }

    pub fn save_text(&mut self, title: &str, content: &str) -> Result<()> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(GlosorError::invalid(
                "A text needs both a title and content before it can be saved.",
            ));
        }
        if self
            .texts
            .iter()
            .any(|t| t.title == title && t.content == content)
        {
            return Err(GlosorError::invalid(
                "A text with this title and content already exists.",
            ));
        }
        self.texts.insert(
            0,
            SavedText {
                id: Uuid::new_v4().to_string(),
                title: title.to_string(),
                content: content.to_string(),
                added_at: Utc::now(),
                folder_id: None,
            },
        );
        Ok(())
    }

    pub fn is_text_saved(&self, title: &str, content: &str) -> bool {
        let title = title.trim();
        let content = content.trim();
        !content.is_empty()
            && self
                .texts
                .iter()
                .any(|t| t.title == title && t.content == content)
    }

    pub fn delete_text(&mut self, id: &str) {
        self.texts.retain(|text| text.id != id);
    }

    pub fn move_text(&mut self, id: &str, folder_id: Option<String>) {
        if let Some(text) = self.texts.iter_mut().find(|text| text.id == id) {
            text.folder_id = folder_id;
        }
    }
}

/// Categories for a freshly confirmed word: the user's ticked thematic
/// categories merged with the automatic part-of-speech category.
pub fn initial_category_ids(part_of_speech: &str, selected: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = selected.to_vec();
    if let Some(auto) = categories::category_for_part_of_speech(part_of_speech)
        && !ids.iter().any(|id| id == auto)
    {
        ids.push(auto.to_string());
    }
    ids
}
