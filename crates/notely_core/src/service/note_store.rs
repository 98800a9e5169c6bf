//! Note store facade.
//!
//! # Responsibility
//! - Own the single SQLite connection for the process.
//! - Expose CRUD/search use-cases that never fail loudly: every error is
//!   logged and turned into an empty / `None` / `false` result.
//!
//! # Invariants
//! - Any operation called before `initialize()` initializes lazily first.
//! - `update` on a missing id reports success; callers treat updates as
//!   idempotent by id.
//! - `delete` on a missing id reports success.

use crate::config::CoreConfig;
use crate::db::migrations::reset_schema;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoResult, SqliteNoteRepository};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::path::PathBuf;

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Owned handle over the local note database.
#[derive(Debug)]
pub struct NoteStore {
    location: StoreLocation,
    conn: Option<Connection>,
}

impl NoteStore {
    /// Creates an unopened store backed by a database file.
    pub fn open_path(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            conn: None,
        }
    }

    /// Creates an unopened in-memory store.
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            conn: None,
        }
    }

    /// Creates an unopened store at the configured database path.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::open_path(config.db_path.clone())
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn is_initialized(&self) -> bool {
        self.conn.is_some()
    }

    /// Opens the database and brings the schema up to date.
    ///
    /// Safe to call repeatedly; later calls are no-ops once open.
    pub fn initialize(&mut self) -> bool {
        if self.conn.is_some() {
            return true;
        }
        let opened: DbResult<Connection> = match &self.location {
            StoreLocation::File(path) => open_db(path),
            StoreLocation::Memory => open_db_in_memory(),
        };
        match opened {
            Ok(conn) => {
                self.conn = Some(conn);
                info!("event=store_init module=store status=ok");
                true
            }
            Err(err) => {
                error!("event=store_init module=store status=error error={err}");
                false
            }
        }
    }

    /// Borrow of the open connection, initializing lazily.
    pub fn connection(&mut self) -> Option<&Connection> {
        if !self.initialize() {
            return None;
        }
        self.conn.as_ref()
    }

    /// All notes, newest update first.
    pub fn get_all(&mut self) -> Vec<Note> {
        self.with_repo("get_all", Vec::new(), |repo| repo.list_notes())
    }

    /// One note, or `None` when absent or on error.
    pub fn get_by_id(&mut self, id: NoteId) -> Option<Note> {
        self.with_repo("get_by_id", None, |repo| repo.get_note(id))
    }

    /// Inserts a note and returns its id.
    pub fn create(&mut self, draft: &NoteDraft) -> Option<NoteId> {
        self.with_repo("create", None, |repo| repo.create_note(draft).map(Some))
    }

    /// Overwrites every mutable field of note `id`.
    pub fn update(&mut self, id: NoteId, draft: &NoteDraft) -> bool {
        self.with_repo("update", false, |repo| {
            if !repo.update_note(id, draft)? {
                debug!("event=note_update module=store status=ok matched=0 note_id={id}");
            }
            Ok(true)
        })
    }

    /// Hard-deletes note `id`.
    pub fn delete(&mut self, id: NoteId) -> bool {
        self.with_repo("delete", false, |repo| {
            if !repo.delete_note(id)? {
                debug!("event=note_delete module=store status=ok matched=0 note_id={id}");
            }
            Ok(true)
        })
    }

    /// Notes whose title or content contains `query`, ignoring case.
    ///
    /// Callers send an empty query to `get_all` instead.
    pub fn search(&mut self, query: &str) -> Vec<Note> {
        self.with_repo("search", Vec::new(), |repo| repo.search_notes(query))
    }

    /// Creates an unlocked copy titled `"{title} (Copy)"`.
    pub fn duplicate(&mut self, id: NoteId) -> Option<NoteId> {
        let source = self.get_by_id(id)?;
        self.create(&copy_draft(&source.to_draft()))
    }

    /// Rewrites only the lock flag of note `id`.
    ///
    /// Returns `false` when the note does not exist.
    pub fn set_locked(&mut self, id: NoteId, locked: bool) -> bool {
        let Some(note) = self.get_by_id(id) else {
            warn!("event=note_lock module=store status=error reason=not_found note_id={id}");
            return false;
        };
        let draft = note.to_draft().locked(locked);
        self.update(id, &draft)
    }

    /// Distinct tags in use, sorted case-insensitively.
    pub fn list_tags(&mut self) -> Vec<String> {
        self.with_repo("list_tags", Vec::new(), |repo| repo.list_tags())
    }

    /// Drops every note and recreates the schema.
    pub fn reset(&mut self) -> bool {
        if !self.initialize() {
            return false;
        }
        let Some(conn) = self.conn.as_mut() else {
            return false;
        };
        match reset_schema(conn) {
            Ok(()) => {
                warn!("event=store_reset module=store status=ok");
                true
            }
            Err(err) => {
                error!("event=store_reset module=store status=error error={err}");
                false
            }
        }
    }

    fn with_repo<T>(
        &mut self,
        operation: &'static str,
        fallback: T,
        f: impl FnOnce(&SqliteNoteRepository<'_>) -> RepoResult<T>,
    ) -> T {
        if !self.initialize() {
            error!("event=store_{operation} module=store status=error reason=store_unavailable");
            return fallback;
        }
        let Some(conn) = self.conn.as_ref() else {
            return fallback;
        };
        let result = SqliteNoteRepository::try_new(conn).and_then(|repo| f(&repo));
        match result {
            Ok(value) => value,
            Err(err) => {
                error!("event=store_{operation} module=store status=error error={err}");
                fallback
            }
        }
    }
}

/// Draft for a duplicate: `"(Copy)"` title suffix, same body and tags,
/// always unlocked.
pub fn copy_draft(source: &NoteDraft) -> NoteDraft {
    NoteDraft {
        title: format!("{} (Copy)", source.title),
        content: source.content.clone(),
        is_locked: false,
        tags: source.tags.clone(),
    }
}
