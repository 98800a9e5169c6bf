//! Note editor session.
//!
//! # Responsibility
//! - Hold the latest title/content/tags/lock snapshot of one note.
//! - Debounce text edits through [`Autosave`] and write the newest snapshot.
//! - Save tag, lock, template and replace edits immediately.
//!
//! # Invariants
//! - The first successful save of a new note creates it; every later save
//!   updates that same id.
//! - A write always carries the newest snapshot, so a stale edit can never
//!   overwrite a newer one.
//! - A failed save keeps the snapshot and surfaces [`SAVE_FAILED_MESSAGE`].

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::service::autosave::Autosave;
use crate::service::note_store::NoteStore;
use crate::template::NoteTemplate;
use crate::text::{self, FormatStyle, MatchSpan, SnippetKind};
use log::{debug, warn};
use std::time::{Duration, Instant};

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save";

#[derive(Debug)]
pub struct EditorSession {
    note_id: Option<NoteId>,
    snapshot: NoteDraft,
    autosave: Autosave<()>,
    save_error: Option<&'static str>,
}

impl EditorSession {
    /// Session for a note that does not exist yet.
    pub fn new_note(delay: Duration) -> Self {
        Self {
            note_id: None,
            snapshot: NoteDraft::new("", ""),
            autosave: Autosave::new(delay),
            save_error: None,
        }
    }

    /// Session over an existing note.
    pub fn open(note: &Note, delay: Duration) -> Self {
        Self {
            note_id: Some(note.id),
            snapshot: note.to_draft(),
            autosave: Autosave::new(delay),
            save_error: None,
        }
    }

    pub fn note_id(&self) -> Option<NoteId> {
        self.note_id
    }

    pub fn snapshot(&self) -> &NoteDraft {
        &self.snapshot
    }

    pub fn save_error(&self) -> Option<&'static str> {
        self.save_error
    }

    pub fn has_pending_write(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn word_count(&self) -> usize {
        text::word_count(&self.snapshot.content)
    }

    pub fn char_count(&self) -> usize {
        text::char_count(&self.snapshot.content)
    }

    pub fn reading_minutes(&self) -> usize {
        text::estimate_reading_minutes(&self.snapshot.content)
    }

    pub fn edit_title(&mut self, title: impl Into<String>, now: Instant) {
        self.snapshot.title = title.into();
        self.autosave.on_edit((), now);
    }

    pub fn edit_content(&mut self, content: impl Into<String>, now: Instant) {
        self.snapshot.content = content.into();
        self.autosave.on_edit((), now);
    }

    /// Applies a toolbar style to the selection and returns the new cursor.
    pub fn format_selection(
        &mut self,
        start: usize,
        end: usize,
        style: FormatStyle,
        now: Instant,
    ) -> usize {
        let edit = text::format_selection(&self.snapshot.content, start, end, style);
        self.edit_content(edit.text, now);
        edit.cursor
    }

    /// Inserts a snippet at `cursor` and returns the new cursor.
    pub fn insert_snippet(&mut self, cursor: usize, kind: SnippetKind, now: Instant) -> usize {
        let edit = text::insert_snippet(&self.snapshot.content, cursor, kind);
        self.edit_content(edit.text, now);
        edit.cursor
    }

    pub fn find(&self, term: &str) -> Vec<MatchSpan> {
        text::find_all(&self.snapshot.content, term)
    }

    /// Replaces the first match and saves immediately.
    ///
    /// Returns `false` when nothing matched or the save failed.
    pub fn replace_first(&mut self, store: &mut NoteStore, term: &str, replacement: &str) -> bool {
        let updated = text::replace_first(&self.snapshot.content, term, replacement);
        self.replace_content(store, updated)
    }

    /// Replaces every match and saves immediately.
    pub fn replace_all(&mut self, store: &mut NoteStore, term: &str, replacement: &str) -> bool {
        let updated = text::replace_all(&self.snapshot.content, term, replacement);
        self.replace_content(store, updated)
    }

    fn replace_content(&mut self, store: &mut NoteStore, updated: String) -> bool {
        if updated == self.snapshot.content {
            return false;
        }
        self.snapshot.content = updated;
        self.save_now(store)
    }

    /// Replaces title and content with the template and saves immediately.
    pub fn apply_template(&mut self, store: &mut NoteStore, template: &NoteTemplate) -> bool {
        self.snapshot.title = template.name.to_string();
        self.snapshot.content = template.content.to_string();
        self.save_now(store)
    }

    pub fn set_tags(&mut self, store: &mut NoteStore, tags: Vec<String>) -> bool {
        self.snapshot.tags = tags;
        self.save_now(store)
    }

    pub fn set_locked(&mut self, store: &mut NoteStore, locked: bool) -> bool {
        self.snapshot.is_locked = locked;
        self.save_now(store)
    }

    /// Writes the snapshot when the autosave deadline has passed.
    ///
    /// Returns `true` when a write happened and succeeded.
    pub fn poll(&mut self, store: &mut NoteStore, now: Instant) -> bool {
        match self.autosave.due(now) {
            Some(()) => self.persist(store),
            None => false,
        }
    }

    /// Writes any pending edit right away, e.g. when leaving the editor.
    pub fn flush(&mut self, store: &mut NoteStore) -> bool {
        match self.autosave.flush() {
            Some(()) => self.persist(store),
            None => false,
        }
    }

    /// Saves the current state and creates an unlocked `"(Copy)"` of it.
    pub fn duplicate(&mut self, store: &mut NoteStore) -> Option<NoteId> {
        self.flush(store);
        let draft = crate::service::note_store::copy_draft(&self.snapshot);
        store.create(&draft)
    }

    fn save_now(&mut self, store: &mut NoteStore) -> bool {
        self.autosave.cancel();
        self.persist(store)
    }

    fn persist(&mut self, store: &mut NoteStore) -> bool {
        let saved = match self.note_id {
            Some(id) => store.update(id, &self.snapshot),
            None => match store.create(&self.snapshot) {
                Some(id) => {
                    self.note_id = Some(id);
                    true
                }
                None => false,
            },
        };
        if saved {
            self.save_error = None;
            debug!(
                "event=editor_save module=editor status=ok note_id={}",
                self.note_id.unwrap_or_default()
            );
        } else {
            self.save_error = Some(SAVE_FAILED_MESSAGE);
            warn!("event=editor_save module=editor status=error");
        }
        saved
    }
}
