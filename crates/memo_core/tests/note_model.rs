use memo_core::{Folder, FsNoteStore, MemoConfig, NoteId, NoteInfo, NoteList, NoteStore};

#[test]
fn note_info_serialization_uses_expected_fields() {
    let info = NoteInfo {
        id: NoteId::new(Folder::Archive, "1700000000000.txt"),
        preview: "first line second line".to_string(),
        last_modified: "2023-11-14 22:13:20".to_string(),
        updated_at: 1_700_000_000_000,
    };

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["id"]["folder"], "archive");
    assert_eq!(json["id"]["file_name"], "1700000000000.txt");
    assert_eq!(json["preview"], "first line second line");
    assert_eq!(json["last_modified"], "2023-11-14 22:13:20");
    assert_eq!(json["updated_at"], 1_700_000_000_000_i64);

    let decoded: NoteInfo = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, info);
}

#[test]
fn blank_info_has_no_derived_metadata() {
    let info = NoteInfo::blank(NoteId::new(Folder::Active, "1.txt"));
    assert!(info.preview.is_empty());
    assert!(info.last_modified.is_empty());
    assert_eq!(info.updated_at, 0);
}

#[test]
fn list_load_reads_one_folder_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsNoteStore::open(&MemoConfig::with_root(dir.path().join(".memo")));
    let active_id = store.create().unwrap();
    let archived_id = store.move_note(&store.create().unwrap()).unwrap();

    let active = NoteList::load(&store, Folder::Active).unwrap();
    let archive = NoteList::load(&store, Folder::Archive).unwrap();

    assert_eq!(active.folder(), Folder::Active);
    assert_eq!(active.len(), 1);
    assert_eq!(active.first_id(), Some(&active_id));
    assert_eq!(archive.position(&archived_id), Some(0));
}

#[test]
fn repeated_sorts_are_idempotent_for_equal_timestamps() {
    let mut list = NoteList::new(Folder::Active);
    for (name, updated_at) in [("a", 7), ("b", 7), ("c", 7), ("d", 8)] {
        list.push_back(NoteInfo {
            id: NoteId::new(Folder::Active, name),
            preview: String::new(),
            last_modified: String::new(),
            updated_at,
        });
    }

    list.sort_by_recency();
    let first_pass = list.clone();
    list.sort_by_recency();
    list.sort_by_recency();

    assert_eq!(list, first_pass);
    let names = list
        .iter()
        .map(|entry| entry.id.file_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["d", "a", "b", "c"]);
}

#[test]
fn insert_at_front_and_remove_at_keep_order() {
    let mut list = NoteList::new(Folder::Active);
    list.push_back(NoteInfo::blank(NoteId::new(Folder::Active, "old")));
    list.insert_at_front(NoteInfo::blank(NoteId::new(Folder::Active, "new")));

    assert_eq!(list.first_id().unwrap().file_name, "new");
    let removed = list.remove_at(0).unwrap();
    assert_eq!(removed.id.file_name, "new");
    assert_eq!(list.len(), 1);
}
