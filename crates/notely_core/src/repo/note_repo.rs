//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and substring search over the `notes` table.
//! - Own the JSON encode/decode boundary for the `tags` column.
//!
//! # Invariants
//! - Lists are ordered by `updatedAt DESC, id DESC`.
//! - `isLocked` reads as `true` only for the stored value 1.
//! - `tags` always decodes to a vector; bad JSON decodes to empty.
//! - Writes never move `updatedAt` below `createdAt`.

use crate::db::DbError;
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::text::find::contains_ignore_case;
use log::warn;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    isLocked,
    tags,
    createdAt,
    updatedAt
FROM notes";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "isLocked",
    "tags",
    "createdAt",
    "updatedAt",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column missing: {table}.{column}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Inserts a note with `createdAt = updatedAt = now` and returns its id.
    fn create_note(&self, draft: &NoteDraft) -> RepoResult<NoteId>;
    /// Overwrites all mutable fields. Returns whether a row matched.
    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<bool>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists every note, newest update first.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Lists notes whose title or content contains `query`, ignoring case.
    fn search_notes(&self, query: &str) -> RepoResult<Vec<Note>>;
    /// Hard-deletes one note. Returns whether a row matched.
    fn delete_note(&self, id: NoteId) -> RepoResult<bool>;
    /// Distinct tags across all notes, sorted case-insensitively.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the connection
    ///   was not migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, draft: &NoteDraft) -> RepoResult<NoteId> {
        let now = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO notes (title, content, isLocked, tags, createdAt, updatedAt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
            params![
                draft.title.as_str(),
                draft.content.as_str(),
                bool_to_int(draft.is_locked),
                encode_tags(&draft.tags),
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?1,
                content = ?2,
                isLocked = ?3,
                tags = ?4,
                updatedAt = MAX(?5, COALESCE(updatedAt, 0), COALESCE(createdAt, 0))
             WHERE id = ?6;",
            params![
                draft.title.as_str(),
                draft.content.as_str(),
                bool_to_int(draft.is_locked),
                encode_tags(&draft.tags),
                now_epoch_ms(),
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY updatedAt DESC, id DESC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    // SQLite LIKE/lower() only fold ASCII, so matching happens in Rust to
    // keep search consistent with the editor's find.
    fn search_notes(&self, query: &str) -> RepoResult<Vec<Note>> {
        let notes = self.list_notes()?;
        Ok(notes
            .into_iter()
            .filter(|note| {
                contains_ignore_case(&note.title, query) || contains_ignore_case(&note.content, query)
            })
            .collect())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT tags FROM notes;")?;
        let mut rows = stmt.query([])?;
        // Keyed by lowercase so "Work" and "work" collapse to the first seen.
        let mut unique: BTreeMap<String, String> = BTreeMap::new();
        while let Some(row) = rows.next()? {
            for tag in decode_tags_value(row.get_ref(0)?) {
                let trimmed = tag.trim();
                if trimmed.is_empty() {
                    continue;
                }
                unique
                    .entry(trimmed.to_lowercase())
                    .or_insert_with(|| trimmed.to_string());
            }
        }
        Ok(unique.into_values().collect())
    }
}

/// Serializes tags for the `tags` column.
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Deserializes the `tags` column.
///
/// Absent, empty, or malformed input (including JSON that is not an array of
/// strings) yields an empty vector.
pub fn decode_tags(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(tags) => tags,
        Err(err) => {
            warn!("event=tags_decode module=repo status=repaired error={err}");
            Vec::new()
        }
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let created_at = coerce_timestamp(row.get_ref("createdAt")?).unwrap_or(0);
    let updated_at = coerce_timestamp(row.get_ref("updatedAt")?).unwrap_or(created_at);
    Ok(Note {
        id: row.get("id")?,
        title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
        content: row.get::<_, Option<String>>("content")?.unwrap_or_default(),
        is_locked: coerce_lock_flag(row.get_ref("isLocked")?),
        tags: decode_tags_value(row.get_ref("tags")?),
        created_at,
        updated_at: updated_at.max(created_at),
    })
}

fn coerce_lock_flag(value: ValueRef<'_>) -> bool {
    match value {
        ValueRef::Integer(flag) => flag == 1,
        ValueRef::Real(flag) => flag == 1.0,
        ValueRef::Text(raw) => std::str::from_utf8(raw)
            .map(|text| text.trim() == "1")
            .unwrap_or(false),
        ValueRef::Null | ValueRef::Blob(_) => false,
    }
}

// Rows written by older builds may hold NULL, real or text timestamps.
fn coerce_timestamp(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(ms) => Some(ms),
        ValueRef::Real(ms) if ms.is_finite() => Some(ms as i64),
        ValueRef::Text(raw) => std::str::from_utf8(raw)
            .ok()
            .and_then(|text| text.trim().parse::<i64>().ok()),
        _ => None,
    }
}

fn decode_tags_value(value: ValueRef<'_>) -> Vec<String> {
    match value {
        ValueRef::Text(raw) => match std::str::from_utf8(raw) {
            Ok(text) => decode_tags(Some(text)),
            Err(_) => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }
    for &column in REQUIRED_COLUMNS {
        if !crate::db::migrations::table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{coerce_timestamp, decode_tags, encode_tags};
    use rusqlite::types::ValueRef;

    #[test]
    fn tags_codec_keeps_order_and_duplicates() {
        let tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(decode_tags(Some(&encode_tags(&tags))), tags);
    }

    #[test]
    fn malformed_tags_decode_to_empty() {
        assert!(decode_tags(None).is_empty());
        assert!(decode_tags(Some("")).is_empty());
        assert!(decode_tags(Some("not json")).is_empty());
        assert!(decode_tags(Some("{\"a\":1}")).is_empty());
        assert!(decode_tags(Some("[1, 2]")).is_empty());
    }

    #[test]
    fn timestamps_coerce_from_legacy_storage_classes() {
        assert_eq!(coerce_timestamp(ValueRef::Integer(42)), Some(42));
        assert_eq!(coerce_timestamp(ValueRef::Real(42.9)), Some(42));
        assert_eq!(coerce_timestamp(ValueRef::Text(b" 17 ")), Some(17));
        assert_eq!(coerce_timestamp(ValueRef::Text(b"yesterday")), None);
        assert_eq!(coerce_timestamp(ValueRef::Null), None);
    }
}
