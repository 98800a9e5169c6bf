//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note, text, PIN and export use-cases to Dart via FRB.
//! - Translate core sentinels into small response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - All calls share one process-wide note store opened from
//!   `NOTELY_DB_PATH` (or the temp-dir default) on first use.
//! - Locked note content only crosses the boundary through `note_unlock`.

use notely_core::model::tag::{add_custom_tag, toggle_tag, PRESET_TAGS};
use notely_core::security::pin::is_valid_pin;
use notely_core::security::pin_flow::INCORRECT_PIN;
use notely_core::service::note_access::{
    list_summaries, lock_note, open_note, remove_lock, unlock_note, LockOutcome, NoteAccess,
    UnlockOutcome,
};
use notely_core::service::editor_session::SAVE_FAILED_MESSAGE;
use notely_core::text::{self, FormatStyle, SnippetKind};
use notely_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, CoreConfig,
    ExportAdapter, ExportFormat, KeyringSecretStore, NoShareSurface, Note, NoteDraft, NoteStore,
    PinGate, TEMPLATES,
};
use std::sync::{Mutex, OnceLock, PoisonError};

const KEYRING_SERVICE: &str = "notely";

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();
static STORE: OnceLock<Mutex<NoteStore>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the notes list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    pub id: i64,
    /// `Locked Note` / `Untitled` substituted as needed.
    pub display_title: String,
    pub preview: String,
    pub is_locked: bool,
    pub tags: Vec<String>,
    pub updated_at: i64,
    /// `Just now`, `5m ago`, ... or a short date.
    pub updated_label: String,
}

/// Full note payload for the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub is_locked: bool,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Response for opening or unlocking a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteOpenResponse {
    /// Present only when the content may be shown.
    pub note: Option<NoteDetail>,
    /// The note exists but needs the PIN.
    pub locked: bool,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Id of the created or touched note, when there is one.
    pub note_id: Option<i64>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: Option<i64>) -> Self {
        Self {
            ok: true,
            note_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Text plus cursor after a toolbar action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditResponse {
    pub ok: bool,
    pub text: String,
    pub cursor: u32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMatch {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub words: u32,
    pub chars: u32,
    pub reading_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateItem {
    pub name: String,
    pub icon: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPresetItem {
    pub name: String,
    pub color: String,
}

/// Lists notes, newest first; a blank `query` lists everything.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(query: String) -> Vec<NoteListItem> {
    let now = notely_core::repo::note_repo::now_epoch_ms();
    with_store(|store| list_summaries(store, &query))
        .into_iter()
        .map(|summary| NoteListItem {
            id: summary.id,
            updated_label: text::relative_time_label(summary.updated_at, now),
            display_title: summary.display_title,
            preview: summary.preview,
            is_locked: summary.is_locked,
            tags: summary.tags,
            updated_at: summary.updated_at,
        })
        .collect()
}

/// Opens a note; locked notes come back without content.
#[flutter_rust_bridge::frb(sync)]
pub fn note_open(id: i64) -> NoteOpenResponse {
    match with_store(|store| open_note(store, id)) {
        NoteAccess::Open(note) => NoteOpenResponse {
            note: Some(to_detail(note)),
            locked: false,
            message: String::new(),
        },
        NoteAccess::Locked(_) => NoteOpenResponse {
            note: None,
            locked: true,
            message: "Note is locked.".to_string(),
        },
        NoteAccess::Missing => note_not_found(),
    }
}

/// Reveals a locked note for this viewing when `pin` verifies.
#[flutter_rust_bridge::frb(sync)]
pub fn note_unlock(id: i64, pin: String) -> NoteOpenResponse {
    let gate = pin_gate();
    match with_store(|store| unlock_note(store, &gate, id, &pin)) {
        UnlockOutcome::Revealed(note) => NoteOpenResponse {
            note: Some(to_detail(note)),
            locked: false,
            message: String::new(),
        },
        UnlockOutcome::IncorrectPin => NoteOpenResponse {
            note: None,
            locked: true,
            message: INCORRECT_PIN.to_string(),
        },
        UnlockOutcome::Missing => note_not_found(),
        UnlockOutcome::Failed => NoteOpenResponse {
            note: None,
            locked: true,
            message: SAVE_FAILED_MESSAGE.to_string(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_create(
    title: String,
    content: String,
    is_locked: bool,
    tags: Vec<String>,
) -> NoteActionResponse {
    let draft = NoteDraft::new(title, content)
        .locked(is_locked)
        .with_tags(tags);
    match with_store(|store| store.create(&draft)) {
        Some(id) => NoteActionResponse::success("Note created.", Some(id)),
        None => NoteActionResponse::failure(SAVE_FAILED_MESSAGE),
    }
}

/// Overwrites a note; unknown ids still report success.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update(
    id: i64,
    title: String,
    content: String,
    is_locked: bool,
    tags: Vec<String>,
) -> NoteActionResponse {
    let draft = NoteDraft::new(title, content)
        .locked(is_locked)
        .with_tags(tags);
    if with_store(|store| store.update(id, &draft)) {
        NoteActionResponse::success("Note saved.", Some(id))
    } else {
        NoteActionResponse::failure(SAVE_FAILED_MESSAGE)
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(id: i64) -> NoteActionResponse {
    if with_store(|store| store.delete(id)) {
        NoteActionResponse::success("Note deleted.", Some(id))
    } else {
        NoteActionResponse::failure("Failed to delete note")
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_duplicate(id: i64) -> NoteActionResponse {
    match with_store(|store| store.duplicate(id)) {
        Some(copy_id) => NoteActionResponse::success("Note duplicated.", Some(copy_id)),
        None => NoteActionResponse::failure("Failed to duplicate note"),
    }
}

/// Locks a note (PIN must be configured) or removes its lock (PIN must
/// verify).
#[flutter_rust_bridge::frb(sync)]
pub fn note_set_locked(id: i64, locked: bool, pin: Option<String>) -> NoteActionResponse {
    let gate = pin_gate();
    if locked {
        return match with_store(|store| lock_note(store, &gate, id)) {
            LockOutcome::Locked => NoteActionResponse::success("Note locked.", Some(id)),
            LockOutcome::PinRequired => NoteActionResponse::failure("Set a PIN first"),
            LockOutcome::Failed => NoteActionResponse::failure("Failed to lock note"),
        };
    }

    let pin = pin.unwrap_or_default();
    remove_lock_response(id, with_store(|store| remove_lock(store, &gate, id, &pin)))
}

fn remove_lock_response(id: i64, outcome: UnlockOutcome) -> NoteActionResponse {
    match outcome {
        UnlockOutcome::Revealed(_) => NoteActionResponse::success("Note unlocked.", Some(id)),
        UnlockOutcome::IncorrectPin => NoteActionResponse::failure(INCORRECT_PIN),
        UnlockOutcome::Missing => NoteActionResponse::failure("Note not found"),
        UnlockOutcome::Failed => NoteActionResponse::failure(SAVE_FAILED_MESSAGE),
    }
}

/// Distinct tags in use across all notes.
#[flutter_rust_bridge::frb(sync)]
pub fn tags_list() -> Vec<String> {
    with_store(|store| store.list_tags())
}

#[flutter_rust_bridge::frb(sync)]
pub fn tag_presets() -> Vec<TagPresetItem> {
    PRESET_TAGS
        .iter()
        .map(|tag| TagPresetItem {
            name: tag.name.to_string(),
            color: tag.color.to_string(),
        })
        .collect()
}

/// Adds `name` when absent, removes it when present.
#[flutter_rust_bridge::frb(sync)]
pub fn tag_toggle(tags: Vec<String>, name: String) -> Vec<String> {
    let mut tags = tags;
    toggle_tag(&mut tags, &name);
    tags
}

/// Appends a trimmed custom tag unless blank or already present.
#[flutter_rust_bridge::frb(sync)]
pub fn tag_add_custom(tags: Vec<String>, raw: String) -> Vec<String> {
    let mut tags = tags;
    add_custom_tag(&mut tags, &raw);
    tags
}

#[flutter_rust_bridge::frb(sync)]
pub fn templates_list() -> Vec<TemplateItem> {
    TEMPLATES
        .iter()
        .map(|template| TemplateItem {
            name: template.name.to_string(),
            icon: template.icon.to_string(),
            content: template.content.to_string(),
        })
        .collect()
}

/// Wraps a selection in `bold|italic|strikethrough` delimiters.
#[flutter_rust_bridge::frb(sync)]
pub fn text_format(text: String, start: u32, end: u32, style: String) -> TextEditResponse {
    let Some(style) = FormatStyle::from_name(&style) else {
        return text_edit_failure(text, start, format!("unknown style `{style}`"));
    };
    let edit = text::format_selection(&text, start as usize, end as usize, style);
    text_edit_success(edit)
}

/// Inserts a `h1|h2|bullet|numbered|checkbox|code|divider|date|time` snippet.
#[flutter_rust_bridge::frb(sync)]
pub fn text_insert_snippet(text: String, cursor: u32, kind: String) -> TextEditResponse {
    let Some(kind) = SnippetKind::from_name(&kind) else {
        return text_edit_failure(text, cursor, format!("unknown snippet `{kind}`"));
    };
    let edit = text::insert_snippet(&text, cursor as usize, kind);
    text_edit_success(edit)
}

/// Case-insensitive, non-overlapping matches as character ranges.
#[flutter_rust_bridge::frb(sync)]
pub fn text_find(text: String, term: String) -> Vec<TextMatch> {
    text::find_all(&text, &term)
        .into_iter()
        .map(|span| TextMatch {
            start: to_u32(span.start),
            end: to_u32(span.end),
        })
        .collect()
}

#[flutter_rust_bridge::frb(sync)]
pub fn text_replace(text: String, term: String, replacement: String, all: bool) -> String {
    if all {
        text::replace_all(&text, &term, &replacement)
    } else {
        text::replace_first(&text, &term, &replacement)
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn text_stats(text: String) -> TextStats {
    TextStats {
        words: to_u32(text::word_count(&text)),
        chars: to_u32(text::char_count(&text)),
        reading_minutes: to_u32(text::estimate_reading_minutes(&text)),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn pin_is_configured() -> bool {
    pin_gate().is_pin_configured()
}

/// Stores a new 4-digit PIN; other shapes are refused before the keystore
/// is touched.
#[flutter_rust_bridge::frb(sync)]
pub fn pin_set(pin: String) -> bool {
    if !is_valid_pin(&pin) {
        return false;
    }
    pin_gate().set_pin(&pin)
}

#[flutter_rust_bridge::frb(sync)]
pub fn pin_verify(pin: String) -> bool {
    pin_gate().verify_pin(&pin)
}

#[flutter_rust_bridge::frb(sync)]
pub fn pin_clear() -> bool {
    pin_gate().clear_pin()
}

/// Writes `title`/`content` as `txt|md|html` into the export directory.
#[flutter_rust_bridge::frb(sync)]
pub fn note_export(title: String, content: String, format: String) -> NoteActionResponse {
    let Some(format) = ExportFormat::from_name(&format) else {
        return NoteActionResponse::failure(format!("unknown export format `{format}`"));
    };
    let adapter = ExportAdapter::new(config().export_dir.clone(), NoShareSurface);
    let outcome = adapter.export(&title, &content, format);
    if outcome.is_success() {
        NoteActionResponse::success(outcome.message(), None)
    } else {
        NoteActionResponse::failure(outcome.message())
    }
}

/// Deletes every note and recreates the schema.
#[flutter_rust_bridge::frb(sync)]
pub fn db_reset() -> NoteActionResponse {
    if with_store(|store| store.reset()) {
        NoteActionResponse::success("Database reset.", None)
    } else {
        NoteActionResponse::failure("Failed to reset database")
    }
}

fn config() -> &'static CoreConfig {
    CONFIG.get_or_init(CoreConfig::from_env)
}

fn with_store<T>(f: impl FnOnce(&mut NoteStore) -> T) -> T {
    let store = STORE.get_or_init(|| Mutex::new(NoteStore::from_config(config())));
    let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

fn pin_gate() -> PinGate<KeyringSecretStore> {
    PinGate::new(KeyringSecretStore::new(KEYRING_SERVICE))
}

fn note_not_found() -> NoteOpenResponse {
    NoteOpenResponse {
        note: None,
        locked: false,
        message: "Note not found.".to_string(),
    }
}

fn to_detail(note: Note) -> NoteDetail {
    NoteDetail {
        id: note.id,
        title: note.title,
        content: note.content,
        is_locked: note.is_locked,
        tags: note.tags,
        created_at: note.created_at,
        updated_at: note.updated_at,
    }
}

fn text_edit_success(edit: text::TextEdit) -> TextEditResponse {
    TextEditResponse {
        ok: true,
        text: edit.text,
        cursor: to_u32(edit.cursor),
        message: String::new(),
    }
}

fn text_edit_failure(text: String, cursor: u32, message: String) -> TextEditResponse {
    TextEditResponse {
        ok: false,
        text,
        cursor,
        message,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, note_create, note_delete, note_duplicate, note_export,
        note_open, note_update, notes_list, pin_set, tag_add_custom, tag_toggle, templates_list,
        remove_lock_response, text_find, text_format, text_insert_snippet, text_replace,
        text_stats, TextMatch, SAVE_FAILED_MESSAGE,
    };
    use notely_core::service::note_access::UnlockOutcome;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    static TEST_DIR: OnceLock<TempDir> = OnceLock::new();

    // Every test in this process shares the store opened from these paths.
    fn setup() {
        TEST_DIR.get_or_init(|| {
            let dir = tempfile::Builder::new()
                .prefix("notely-ffi")
                .tempdir()
                .expect("create ffi test dir");
            std::env::set_var("NOTELY_DB_PATH", dir.path().join("notely.db"));
            std::env::set_var("NOTELY_EXPORT_DIR", dir.path().join("exports"));
            dir
        });
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn note_lifecycle_through_envelopes() {
        setup();
        let token = unique_token("ffi-note");
        let created = note_create(token.clone(), "body".to_string(), false, vec![]);
        assert!(created.ok, "{}", created.message);
        let id = created.note_id.unwrap();

        let listed = notes_list(token.to_uppercase());
        assert!(listed.iter().any(|item| item.id == id));
        assert_eq!(listed[0].updated_label, "Just now");

        let saved = note_update(id, token.clone(), "edited".to_string(), false, vec![]);
        assert!(saved.ok);
        let opened = note_open(id);
        assert_eq!(opened.note.unwrap().content, "edited");

        let copy = note_duplicate(id);
        assert!(copy.ok);
        assert_ne!(copy.note_id, Some(id));

        assert!(note_delete(id).ok);
        assert!(note_open(id).note.is_none());
    }

    #[test]
    fn locked_notes_open_without_content() {
        setup();
        let created = note_create("secret".to_string(), "hidden".to_string(), true, vec![]);
        let opened = note_open(created.note_id.unwrap());
        assert!(opened.locked);
        assert!(opened.note.is_none());
    }

    #[test]
    fn text_calls_follow_core_rules() {
        let edit = text_format("hello".to_string(), 0, 0, "italic".to_string());
        assert_eq!(edit.text, "**hello");
        assert_eq!(edit.cursor, 1);
        assert!(!text_format("x".to_string(), 0, 1, "underline".to_string()).ok);

        let edit = text_insert_snippet("abc".to_string(), 3, "bullet".to_string());
        assert_eq!(edit.text, "abc\n- ");
        assert!(!text_insert_snippet(String::new(), 0, "quote".to_string()).ok);

        assert_eq!(
            text_find("aaaa".to_string(), "aa".to_string()),
            vec![TextMatch { start: 0, end: 2 }, TextMatch { start: 2, end: 4 }]
        );
        assert_eq!(
            text_replace("a.a".to_string(), ".".to_string(), "$0".to_string(), true),
            "a$0a"
        );
        let stats = text_stats("one two three".to_string());
        assert_eq!((stats.words, stats.chars, stats.reading_minutes), (3, 13, 1));
    }

    #[test]
    fn tag_and_template_helpers() {
        let tags = tag_toggle(vec!["Work".to_string()], "Work".to_string());
        assert!(tags.is_empty());
        let tags = tag_add_custom(tags, "  trip ".to_string());
        assert_eq!(tags, vec!["trip".to_string()]);
        assert_eq!(templates_list().len(), 6);
    }

    #[test]
    fn lock_removal_write_failure_is_a_save_failure() {
        let failed = remove_lock_response(7, UnlockOutcome::Failed);
        assert!(!failed.ok);
        assert_eq!(failed.message, SAVE_FAILED_MESSAGE);

        let missing = remove_lock_response(7, UnlockOutcome::Missing);
        assert_eq!(missing.message, "Note not found");
    }

    #[test]
    fn malformed_pin_is_refused_without_keystore() {
        assert!(!pin_set("12a4".to_string()));
        assert!(!pin_set("12345".to_string()));
    }

    #[test]
    fn export_writes_file_and_rejects_unknown_format() {
        setup();
        let response = note_export("Trip".to_string(), "# Day 1".to_string(), "md".to_string());
        assert!(response.ok, "{}", response.message);
        assert!(response.message.contains("Trip.md"));
        assert!(!note_export("Trip".to_string(), String::new(), "pdf".to_string()).ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
