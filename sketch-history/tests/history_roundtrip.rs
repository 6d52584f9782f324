use sketch_core::{Canvas, Color32};
use sketch_history::{FileStore, HistoryState, HistoryStore, KeyValueStore, Notes, HISTORY_KEY, NOTES_KEY};

#[test]
fn history_roundtrip_through_file_store() {
    let dir = std::env::temp_dir().join(format!("sketch-history-{}", uuid::Uuid::new_v4()));
    let mut store = FileStore::open(&dir).unwrap();

    let mut canvas = Canvas::new(32, 48, Color32::TRANSPARENT);
    let mut hs = HistoryStore::initialize(&mut canvas, Color32::WHITE, HISTORY_KEY, &mut store).unwrap();
    assert_eq!(hs.state(), HistoryState::Seeded);

    canvas.set_pixel(3, 3, Color32::BLACK);
    hs.record_stroke(&canvas, &mut store).unwrap();
    canvas.set_pixel(4, 4, Color32::BLACK);
    hs.record_stroke(&canvas, &mut store).unwrap();
    let drawn = canvas.clone();

    let mut notes = Notes::load(NOTES_KEY, &store);
    notes.set("hello", &mut store);

    // a new session over the same directory picks up where we left off
    let mut store2 = FileStore::open(&dir).unwrap();
    let mut canvas2 = Canvas::new(32, 48, Color32::TRANSPARENT);
    let mut hs2 = HistoryStore::initialize(&mut canvas2, Color32::WHITE, HISTORY_KEY, &mut store2).unwrap();

    assert_eq!(hs2.history(), hs.history());
    assert_eq!(hs2.state(), HistoryState::Populated(3));
    assert_eq!(canvas2, drawn);
    assert_eq!(Notes::load(NOTES_KEY, &store2).text(), "hello");

    assert!(hs2.undo(&mut canvas2, &mut store2).unwrap());
    assert_eq!(canvas2.scan_black().count, 1);

    let raw = store2.get(HISTORY_KEY).unwrap().unwrap();
    let entries: Vec<Vec<u8>> = serde_json::from_str(&raw).unwrap();
    assert_eq!(entries.len(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn snapshot_from_different_surface_size_is_discarded() {
    let dir = std::env::temp_dir().join(format!("sketch-history-{}", uuid::Uuid::new_v4()));
    let mut store = FileStore::open(&dir).unwrap();

    let mut small = Canvas::new(8, 8, Color32::BLACK);
    let mut hs = HistoryStore::initialize(&mut small, Color32::BLACK, HISTORY_KEY, &mut store).unwrap();
    hs.record_stroke(&small, &mut store).unwrap();

    let mut large = Canvas::new(16, 16, Color32::TRANSPARENT);
    let hs2 = HistoryStore::initialize(&mut large, Color32::WHITE, HISTORY_KEY, &mut store).unwrap();
    assert_eq!(hs2.len(), 1);
    assert_eq!(large.scan_black().count, 0);
    assert!(large.pixels().iter().all(|p| *p == Color32::WHITE));

    std::fs::remove_dir_all(&dir).unwrap();
}
