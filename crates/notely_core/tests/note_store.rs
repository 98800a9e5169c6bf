use notely_core::service::note_store::StoreLocation;
use notely_core::{NoteDraft, NoteStore};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn operations_initialize_lazily() {
    let mut store = NoteStore::in_memory();
    assert!(!store.is_initialized());
    assert!(store.get_all().is_empty());
    assert!(store.is_initialized());
    assert!(store.initialize());
    assert_eq!(store.location(), &StoreLocation::Memory);
}

#[test]
fn create_then_get_returns_same_fields() {
    let mut store = NoteStore::in_memory();
    let draft = NoteDraft::new("Groceries", "milk\neggs").with_tags(tags(&["Personal", "Ideas"]));
    let id = store.create(&draft).unwrap();

    let note = store.get_by_id(id).unwrap();
    assert_eq!(note.title, "Groceries");
    assert_eq!(note.content, "milk\neggs");
    assert!(!note.is_locked);
    assert_eq!(note.tags, tags(&["Personal", "Ideas"]));
    assert_eq!(note.created_at, note.updated_at);
}

#[test]
fn update_rewrites_fields_and_keeps_created_at() {
    let mut store = NoteStore::in_memory();
    let id = store.create(&NoteDraft::new("a", "b")).unwrap();
    let before = store.get_by_id(id).unwrap();

    let changed = NoteDraft::new("A", "B").locked(true).with_tags(tags(&["Work"]));
    assert!(store.update(id, &changed));

    let after = store.get_by_id(id).unwrap();
    assert_eq!(after.to_draft(), changed);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
    assert!(after.updated_at >= after.created_at);
}

#[test]
fn update_never_moves_updated_at_backwards() {
    let mut store = NoteStore::in_memory();
    let id = store.create(&NoteDraft::new("skewed", "")).unwrap();
    let future = notely_core::repo::note_repo::now_epoch_ms() + 86_400_000;
    store
        .connection()
        .unwrap()
        .execute(
            "UPDATE notes SET updatedAt = ?1 WHERE id = ?2;",
            rusqlite::params![future, id],
        )
        .unwrap();

    assert!(store.update(id, &NoteDraft::new("edited", "")));
    let after = store.get_by_id(id).unwrap();
    assert_eq!(after.title, "edited");
    assert!(after.updated_at >= future);
}

#[test]
fn update_and_delete_of_missing_id_report_success_without_rows() {
    let mut store = NoteStore::in_memory();
    assert!(store.update(404, &NoteDraft::new("ghost", "")));
    assert!(store.delete(404));
    assert!(store.get_all().is_empty());
    assert_eq!(store.get_by_id(404), None);
}

#[test]
fn list_is_ordered_by_most_recent_update() {
    let mut store = NoteStore::in_memory();
    let first = store.create(&NoteDraft::new("first", "")).unwrap();
    let second = store.create(&NoteDraft::new("second", "")).unwrap();

    let ids: Vec<_> = store.get_all().iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![second, first]);

    std::thread::sleep(std::time::Duration::from_millis(5));
    assert!(store.update(first, &NoteDraft::new("first edited", "")));
    let ids: Vec<_> = store.get_all().iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn search_matches_title_or_content_ignoring_case() {
    let mut store = NoteStore::in_memory();
    let title_hit = store.create(&NoteDraft::new("Rust Tips", "")).unwrap();
    let body_hit = store.create(&NoteDraft::new("misc", "learning RUST daily")).unwrap();
    store.create(&NoteDraft::new("other", "nothing here")).unwrap();
    let unicode_hit = store.create(&NoteDraft::new("ÉTÉ", "summer")).unwrap();

    let mut ids: Vec<_> = store.search("rust").iter().map(|note| note.id).collect();
    ids.sort();
    assert_eq!(ids, vec![title_hit, body_hit]);

    let ids: Vec<_> = store.search("été").iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![unicode_hit]);
    assert!(store.search("zebra").is_empty());
}

#[test]
fn search_treats_like_wildcards_literally() {
    let mut store = NoteStore::in_memory();
    store.create(&NoteDraft::new("100% done", "")).unwrap();
    store.create(&NoteDraft::new("halfway", "")).unwrap();

    assert_eq!(store.search("%").len(), 1);
    assert!(store.search("_a_").is_empty());
}

#[test]
fn delete_removes_note() {
    let mut store = NoteStore::in_memory();
    let id = store.create(&NoteDraft::new("bye", "")).unwrap();
    assert!(store.delete(id));
    assert_eq!(store.get_by_id(id), None);
}

#[test]
fn duplicate_copies_unlocked_with_suffix() {
    let mut store = NoteStore::in_memory();
    let id = store
        .create(
            &NoteDraft::new("Plan", "steps")
                .locked(true)
                .with_tags(tags(&["Work"])),
        )
        .unwrap();

    let copy_id = store.duplicate(id).unwrap();
    assert_ne!(copy_id, id);
    let copy = store.get_by_id(copy_id).unwrap();
    assert_eq!(copy.title, "Plan (Copy)");
    assert_eq!(copy.content, "steps");
    assert!(!copy.is_locked);
    assert_eq!(copy.tags, tags(&["Work"]));

    assert_eq!(store.duplicate(9_999), None);
}

#[test]
fn set_locked_touches_only_the_flag() {
    let mut store = NoteStore::in_memory();
    let id = store.create(&NoteDraft::new("t", "c")).unwrap();
    assert!(store.set_locked(id, true));

    let note = store.get_by_id(id).unwrap();
    assert!(note.is_locked);
    assert_eq!((note.title.as_str(), note.content.as_str()), ("t", "c"));
    assert!(!store.set_locked(9_999, true));
}

#[test]
fn list_tags_is_distinct_and_sorted() {
    let mut store = NoteStore::in_memory();
    store
        .create(&NoteDraft::new("a", "").with_tags(tags(&["work", "Ideas"])))
        .unwrap();
    store
        .create(&NoteDraft::new("b", "").with_tags(tags(&["Work", "Urgent", " "])))
        .unwrap();

    assert_eq!(store.list_tags(), tags(&["Ideas", "Urgent", "work"]));
}

#[test]
fn reset_drops_all_notes() {
    let mut store = NoteStore::in_memory();
    store.create(&NoteDraft::new("a", "")).unwrap();
    assert!(store.reset());
    assert!(store.get_all().is_empty());
    assert!(store.create(&NoteDraft::new("fresh", "")).is_some());
}

#[test]
fn file_store_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notely.db");

    let id = {
        let mut store = NoteStore::open_path(&path);
        store.create(&NoteDraft::new("durable", "yes")).unwrap()
    };

    let mut reopened = NoteStore::open_path(&path);
    assert_eq!(reopened.get_by_id(id).unwrap().title, "durable");
}

#[test]
fn unopenable_path_yields_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let mut store = NoteStore::open_path(blocker.join("notely.db"));

    assert!(!store.initialize());
    assert!(store.get_all().is_empty());
    assert_eq!(store.create(&NoteDraft::new("x", "")), None);
    assert!(!store.update(1, &NoteDraft::new("x", "")));
    assert!(!store.delete(1));
    assert!(store.list_tags().is_empty());
}
