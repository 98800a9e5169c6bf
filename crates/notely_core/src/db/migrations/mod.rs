//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//! - Repair databases written by older app builds (missing `tags` column,
//!   out-of-range `isLocked` values) on every open.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Repairs are idempotent and safe to run on every open.

use crate::db::{DbError, DbResult};
use log::{debug, info, warn};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_notes.sql"),
}];

const TAGS_COLUMN_DDL: &str = "ALTER TABLE notes ADD COLUMN tags TEXT DEFAULT '[]';";

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations and the legacy-data repairs.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version < latest {
        let tx = conn.transaction()?;
        for migration in MIGRATIONS {
            if migration.version <= current_version {
                continue;
            }

            tx.execute_batch(migration.sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        }
        tx.commit()?;
    }

    ensure_tags_column(conn);
    repair_lock_flags(conn)?;
    Ok(())
}

/// Drops the notes table and recreates the current schema.
///
/// All notes are lost. Used by the "reset database" maintenance action.
pub fn reset_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch("DROP TABLE IF EXISTS notes; PRAGMA user_version = 0;")?;
    tx.commit()?;
    apply_migrations(conn)
}

/// Returns whether `table` currently has a column named `column`.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

// Tables created before tagging shipped lack the column. A failure here must
// not make the table unusable, so it is logged instead of returned.
fn ensure_tags_column(conn: &Connection) {
    match table_has_column(conn, "notes", "tags") {
        Ok(true) => return,
        Ok(false) => {}
        Err(err) => {
            warn!("event=db_migrate module=db status=warn step=tags_column error={err}");
            return;
        }
    }

    match conn.execute_batch(TAGS_COLUMN_DDL) {
        Ok(()) => info!("event=db_migrate module=db status=ok step=tags_column action=added"),
        Err(err) if is_duplicate_column(&err) => {
            debug!("event=db_migrate module=db status=ok step=tags_column action=exists");
        }
        Err(err) => {
            warn!("event=db_migrate module=db status=warn step=tags_column error={err}");
        }
    }
}

fn repair_lock_flags(conn: &Connection) -> DbResult<()> {
    let repaired = conn
        .execute(
            "UPDATE notes
             SET isLocked = 0
             WHERE isLocked IS NULL
                OR (isLocked != 0 AND isLocked != 1);",
            [],
        )
        .map_err(|source| DbError::Repair {
            step: "lock_flags",
            source,
        })?;
    if repaired > 0 {
        warn!("event=db_migrate module=db status=ok step=lock_flags repaired_rows={repaired}");
    }
    Ok(())
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            message.to_lowercase().contains("duplicate column name")
        }
        _ => false,
    }
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
