//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its mutable draft.
//! - Project notes into list summaries that never leak locked content.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `updated_at >= created_at`.
//! - A locked note's summary carries neither its title nor its content.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier (SQLite `INTEGER PRIMARY KEY`).
pub type NoteId = i64;

/// Title shown in lists for locked notes.
pub const LOCKED_TITLE: &str = "Locked Note";
/// Preview shown in lists for locked notes.
pub const LOCKED_PREVIEW: &str = "This note is PIN-protected";
/// Title shown in lists for notes with an empty title.
pub const UNTITLED_TITLE: &str = "Untitled";
/// Number of content characters kept in list previews.
pub const PREVIEW_CHARS: usize = 80;

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// When set, content must stay hidden until the PIN gate approves.
    pub is_locked: bool,
    /// Ordered, duplicates allowed.
    pub tags: Vec<String>,
    /// Unix epoch milliseconds, set once at creation.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every write.
    pub updated_at: i64,
}

impl Note {
    /// Returns the mutable fields of this note as a draft.
    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            is_locked: self.is_locked,
            tags: self.tags.clone(),
        }
    }

    /// Builds the list projection for this note.
    pub fn summary(&self) -> NoteSummary {
        let (display_title, preview) = if self.is_locked {
            (LOCKED_TITLE.to_string(), LOCKED_PREVIEW.to_string())
        } else {
            let title = if self.title.is_empty() {
                UNTITLED_TITLE.to_string()
            } else {
                self.title.clone()
            };
            (title, self.content.chars().take(PREVIEW_CHARS).collect())
        };

        NoteSummary {
            id: self.id,
            display_title,
            preview,
            is_locked: self.is_locked,
            tags: self.tags.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Mutable note fields used for create/update and autosave snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub is_locked: bool,
    pub tags: Vec<String>,
}

impl NoteDraft {
    /// Creates an unlocked, untagged draft.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            is_locked: false,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn locked(mut self, is_locked: bool) -> Self {
        self.is_locked = is_locked;
        self
    }
}

/// List row projection. Locked notes are masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: NoteId,
    pub display_title: String,
    pub preview: String,
    pub is_locked: bool,
    pub tags: Vec<String>,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::{Note, LOCKED_PREVIEW, LOCKED_TITLE, UNTITLED_TITLE};

    fn note(title: &str, content: &str, is_locked: bool) -> Note {
        Note {
            id: 7,
            title: title.to_string(),
            content: content.to_string(),
            is_locked,
            tags: vec!["Work".to_string()],
            created_at: 1_000,
            updated_at: 2_000,
        }
    }

    #[test]
    fn locked_summary_hides_title_and_content() {
        let summary = note("Bank", "account 1234", true).summary();
        assert_eq!(summary.display_title, LOCKED_TITLE);
        assert_eq!(summary.preview, LOCKED_PREVIEW);
        assert!(!summary.preview.contains("1234"));
    }

    #[test]
    fn summary_falls_back_to_untitled_and_truncates_preview() {
        let long = "x".repeat(200);
        let summary = note("", &long, false).summary();
        assert_eq!(summary.display_title, UNTITLED_TITLE);
        assert_eq!(summary.preview.chars().count(), 80);
    }

    #[test]
    fn note_serializes_with_camel_case_field_names() {
        let value = serde_json::to_value(note("a", "b", false)).unwrap();
        assert_eq!(value["isLocked"], false);
        assert_eq!(value["createdAt"], 1_000);
        assert_eq!(value["updatedAt"], 2_000);
    }
}
