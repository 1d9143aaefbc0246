use jotter::{
    decode_notes, encode_notes, FixedClock, JotError, KeyValueStore, MemoryStore, Note,
    NoteIdentity, NoteStore, RestoreResult, Tab, BACKUP_KEY, NOTES_KEY, UNTITLED,
};

fn new_store() -> NoteStore<MemoryStore, FixedClock> {
    let clock = FixedClock::sequence((1..=50).map(|i| format!("10:00:{:02}", i)));
    NoteStore::new(MemoryStore::new(), clock)
}

/// Saves `count` separate notes titled "Note 0", "Note 1", ...
fn seeded_store(count: usize) -> NoteStore<MemoryStore, FixedClock> {
    let mut store = new_store();
    for i in 0..count {
        store.clear().unwrap();
        store
            .save(&format!("Note {}", i), &format!("body {}", i))
            .unwrap();
    }
    store.clear().unwrap();
    store
}

fn titles<'a>(notes: impl Iterator<Item = &'a Note>) -> Vec<&'a str> {
    notes.map(|note| note.title.as_str()).collect()
}

fn reload(store: NoteStore<MemoryStore, FixedClock>) -> NoteStore<MemoryStore, FixedClock> {
    NoteStore::open(store.into_storage(), FixedClock::new("later")).unwrap()
}

#[test]
fn save_with_blank_title_appends_untitled_note() {
    let mut store = new_store();

    let outcome = store.save("", "Hello").unwrap();

    assert_eq!(outcome.index, 0);
    assert_eq!(outcome.timestamp, "10:00:01");
    assert_eq!(store.notes().len(), 1);
    let note = &store.notes()[0];
    assert_eq!(note.title, UNTITLED);
    assert_eq!(note.content, "Hello");
    assert!(!note.pinned);
    assert!(!note.deleted);
    assert_eq!(store.backup_content(), "Hello");
}

#[test]
fn save_grows_only_without_selection() {
    let mut store = new_store();

    store.save("a", "1").unwrap();
    assert_eq!(store.notes().len(), 1);
    store.save("a", "2").unwrap();
    store.save("a", "3").unwrap();
    assert_eq!(store.notes().len(), 1);

    store.clear().unwrap();
    store.save("b", "1").unwrap();
    assert_eq!(store.notes().len(), 2);
    assert_eq!(store.selection(), Some(1));
}

#[test]
fn save_over_pinned_note_keeps_pin() {
    let mut store = new_store();
    store.save("Pinned", "v1").unwrap();
    store.set_pinned(Some(0), true).unwrap();

    store.save("Pinned", "v2").unwrap();

    let note = &store.notes()[0];
    assert_eq!(note.content, "v2");
    assert!(note.pinned);
    assert!(!note.deleted);
}

#[test]
fn save_over_trashed_note_keeps_it_in_trash() {
    let mut store = new_store();
    store.save("Gone", "v1").unwrap();
    store.soft_delete(Some(0)).unwrap();

    store.save("Gone", "v2").unwrap();

    assert!(store.notes()[0].deleted);
    assert_eq!(store.query(Tab::Trash, "").count(), 1);
}

#[test]
fn pin_and_delete_are_idempotent() {
    let mut once = seeded_store(2);
    once.set_pinned(Some(1), true).unwrap();
    once.soft_delete(Some(0)).unwrap();

    let mut twice = seeded_store(2);
    twice.set_pinned(Some(1), true).unwrap();
    twice.set_pinned(Some(1), true).unwrap();
    twice.soft_delete(Some(0)).unwrap();
    twice.soft_delete(Some(0)).unwrap();

    assert_eq!(once.notes(), twice.notes());
}

#[test]
fn pin_without_selection_is_invalid() {
    let mut store = seeded_store(1);

    match store.set_pinned(store.selection(), true) {
        Err(JotError::InvalidSelection { index: None }) => {}
        other => panic!("expected InvalidSelection, got {:?}", other),
    }
    assert!(matches!(
        store.soft_delete(Some(1)),
        Err(JotError::InvalidSelection { index: Some(1) })
    ));
    assert!(matches!(
        store.toggle_pinned(None),
        Err(JotError::InvalidSelection { index: None })
    ));
    assert!(!store.notes()[0].pinned);
}

#[test]
fn tabs_partition_notes() {
    let mut store = seeded_store(4);
    store.set_pinned(Some(1), true).unwrap();
    store.set_pinned(Some(2), true).unwrap();
    store.soft_delete(Some(2)).unwrap();
    store.soft_delete(Some(3)).unwrap();

    assert_eq!(titles(store.query(Tab::All, "")), vec!["Note 0", "Note 1"]);
    assert_eq!(titles(store.query(Tab::Pinned, "")), vec!["Note 1"]);
    assert_eq!(titles(store.query(Tab::Trash, "")), vec!["Note 2", "Note 3"]);

    for note in store.notes() {
        let in_all = store.query(Tab::All, "").any(|n| n == note);
        let in_pinned = store.query(Tab::Pinned, "").any(|n| n == note);
        let in_trash = store.query(Tab::Trash, "").any(|n| n == note);

        assert_eq!(in_all, !note.deleted);
        assert_eq!(in_pinned, note.pinned && !note.deleted);
        assert_eq!(in_trash, note.deleted);
    }
}

#[test]
fn pinned_tab_keeps_insertion_order() {
    let mut store = seeded_store(3);
    store.set_pinned(Some(2), true).unwrap();
    store.set_pinned(Some(0), true).unwrap();

    assert_eq!(titles(store.query(Tab::Pinned, "")), vec!["Note 0", "Note 2"]);
}

#[test]
fn search_matches_title_or_content_ignoring_case() {
    let mut store = new_store();
    store.save("Groceries", "milk, eggs").unwrap();
    store.clear().unwrap();
    store.save("Ideas", "Buy MILK frother").unwrap();
    store.clear().unwrap();
    store.save("Work", "standup").unwrap();

    assert_eq!(titles(store.query(Tab::All, "Milk")), vec!["Groceries", "Ideas"]);
    assert_eq!(titles(store.query(Tab::All, "GROC")), vec!["Groceries"]);
    assert_eq!(store.query(Tab::All, "").count(), 3);
}

#[test]
fn search_with_no_hits_is_empty() {
    let mut store = seeded_store(3);
    store.set_pinned(Some(0), true).unwrap();

    assert_eq!(store.query(Tab::Pinned, "zzz").count(), 0);
}

#[test]
fn indexed_query_reports_positions() {
    let mut store = seeded_store(3);
    store.soft_delete(Some(1)).unwrap();

    let indices: Vec<usize> = store.query_indexed(Tab::All, "").map(|(i, _)| i).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn delete_then_restore_round_trip() {
    let mut store = seeded_store(3);
    let before = store.notes()[2].clone();

    store.soft_delete(Some(2)).unwrap();
    assert!(!store.query(Tab::All, "").any(|n| n.title == "Note 2"));
    assert!(store.query(Tab::Trash, "").any(|n| n.title == "Note 2"));

    let identity = NoteIdentity::new(before.title.clone(), before.timestamp.clone());
    assert_eq!(store.restore(&identity).unwrap(), RestoreResult::Restored(2));

    assert_eq!(store.notes()[2], before);
    assert!(store.query(Tab::All, "").any(|n| n.title == "Note 2"));
}

#[test]
fn restore_unknown_identity_changes_nothing() {
    let mut store = seeded_store(2);
    store.soft_delete(Some(0)).unwrap();
    let before = store.notes().to_vec();

    let result = store
        .restore(&NoteIdentity::new("Note 0", "not a time"))
        .unwrap();

    assert_eq!(result, RestoreResult::NotFound);
    assert_eq!(store.notes(), before.as_slice());
}

#[test]
fn restore_acts_on_first_identity_match() {
    let clock = FixedClock::new("12:00:00");
    let mut store = NoteStore::new(MemoryStore::new(), clock);
    store.save("Twin", "first").unwrap();
    store.clear().unwrap();
    store.save("Twin", "second").unwrap();
    store.soft_delete(Some(0)).unwrap();
    store.soft_delete(Some(1)).unwrap();

    let identity = NoteIdentity::new("Twin", "12:00:00");
    assert_eq!(store.restore(&identity).unwrap(), RestoreResult::Restored(0));
    assert!(!store.notes()[0].deleted);
    assert!(store.notes()[1].deleted);
}

#[test]
fn every_mutation_is_persisted() {
    let mut store = new_store();
    store.save("a", "1").unwrap();
    store.set_pinned(Some(0), true).unwrap();
    store.clear().unwrap();
    store.save("b", "2").unwrap();
    store.soft_delete(Some(1)).unwrap();

    let expected = store.notes().to_vec();
    let reloaded = reload(store);
    assert_eq!(reloaded.notes(), expected.as_slice());
    assert_eq!(reloaded.backup_content(), "2");
    assert_eq!(reloaded.selection(), None);
}

#[test]
fn clear_removes_backup_but_keeps_notes() {
    let mut store = new_store();
    store.save("a", "draft").unwrap();

    store.clear().unwrap();

    assert_eq!(store.selection(), None);
    assert_eq!(store.notes().len(), 1);
    let storage = store.into_storage();
    assert_eq!(storage.get(BACKUP_KEY).unwrap(), None);
    assert!(storage.get(NOTES_KEY).unwrap().is_some());
}

#[test]
fn load_of_empty_storage_is_empty() {
    let store = NoteStore::open(MemoryStore::new(), FixedClock::new("t")).unwrap();
    assert!(store.notes().is_empty());
    assert_eq!(store.backup_content(), "");
    assert_eq!(store.restore_backup(), None);
}

#[test]
fn load_of_malformed_notes_resets_to_empty() {
    let mut storage = MemoryStore::new();
    storage.set(NOTES_KEY, "{\"oops\": true").unwrap();
    storage.set(BACKUP_KEY, "still here").unwrap();

    let mut store = NoteStore::open(storage, FixedClock::new("t")).unwrap();
    assert!(store.notes().is_empty());
    assert_eq!(store.backup_content(), "still here");

    // The next save overwrites the bad blob with a valid one
    store.save("fresh", "start").unwrap();
    let storage = store.into_storage();
    let raw = storage.get(NOTES_KEY).unwrap();
    assert_eq!(decode_notes(raw.as_deref()).len(), 1);
}

#[test]
fn encoded_notes_load_back_identically() {
    let samples = vec![
        vec![],
        vec![Note::new("", String::new(), "t".to_string())],
        vec![
            Note {
                title: "Ünïcode ✓".to_string(),
                content: "line one\nline \"two\"\t".to_string(),
                timestamp: "9:41:00 AM".to_string(),
                pinned: true,
                deleted: false,
            },
            Note {
                title: "Trashed".to_string(),
                content: String::new(),
                timestamp: "9:42:00 AM".to_string(),
                pinned: true,
                deleted: true,
            },
        ],
    ];

    for notes in samples {
        let mut storage = MemoryStore::new();
        storage.set(NOTES_KEY, &encode_notes(&notes).unwrap()).unwrap();

        let store = NoteStore::open(storage, FixedClock::new("t")).unwrap();
        assert_eq!(store.notes(), notes.as_slice());
    }
}

#[test]
fn reads_records_without_flags() {
    let mut storage = MemoryStore::new();
    storage
        .set(
            NOTES_KEY,
            r#"[{"title":"Old","content":"from before pins","timestamp":"8:00:00"}]"#,
        )
        .unwrap();

    let store = NoteStore::open(storage, FixedClock::new("t")).unwrap();
    assert_eq!(store.query(Tab::All, "").count(), 1);
    assert!(!store.notes()[0].pinned);
}

#[test]
fn select_then_save_updates_that_note() {
    let mut store = seeded_store(3);

    let index = store.select(&store.notes()[1].identity()).unwrap();
    assert_eq!(index, 1);
    assert_eq!(store.current().map(|n| n.title.as_str()), Some("Note 1"));

    store.save("Note 1", "rewritten").unwrap();
    assert_eq!(store.notes().len(), 3);
    assert_eq!(store.notes()[1].content, "rewritten");
}

#[test]
fn select_latest_picks_newest_note() {
    let mut store = seeded_store(3);
    assert_eq!(store.select_latest(), Some(2));
    assert_eq!(store.current().map(|n| n.title.as_str()), Some("Note 2"));
}
