//! Core domain logic for Notely.
//! Storage, text editing transforms, PIN gate and export live here; the
//! FFI and CLI crates are thin shells over this crate.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod security;
pub mod service;
pub mod template;
pub mod text;

pub use config::CoreConfig;
pub use export::{ExportAdapter, ExportFormat, ExportOutcome, NoShareSurface, ShareSurface};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::note::{Note, NoteDraft, NoteId, NoteSummary};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use security::pin::PinGate;
pub use security::secret_store::{KeyringSecretStore, MemorySecretStore, SecretStore};
pub use service::editor_session::EditorSession;
pub use service::note_store::NoteStore;
pub use template::{find_template, NoteTemplate, TEMPLATES};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
