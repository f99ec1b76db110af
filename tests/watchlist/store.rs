use std::sync::Arc;

use sm_terminal::{
    JsonFileStore, KeyValueStore, MemoryStore, Sentiment, WATCHLIST_KEY, WatchlistStore,
};

use crate::common::item;

#[test]
fn adding_the_same_item_twice_keeps_one_entry_on_top_with_the_new_tag() {
    let store = Arc::new(MemoryStore::new());
    let mut list = WatchlistStore::open(store).unwrap();

    list.add(item("a", "RELIANCE", None), Sentiment::Bullish).unwrap();
    list.add(item("b", "TCS", None), Sentiment::Neutral).unwrap();
    list.add(item("a", "RELIANCE", None), Sentiment::Bearish).unwrap();

    assert_eq!(list.len(), 2);
    let first = &list.entries()[0];
    assert_eq!(first.id(), "a");
    assert_eq!(first.tag, Sentiment::Bearish);
    assert_eq!(list.entries()[1].id(), "b");
}

#[test]
fn remove_reports_whether_anything_was_removed() {
    let store = Arc::new(MemoryStore::new());
    let mut list = WatchlistStore::open(store.clone()).unwrap();
    list.add(item("a", "RELIANCE", None), Sentiment::Bullish).unwrap();

    assert!(list.remove("a").unwrap());
    assert!(!list.remove("a").unwrap());
    assert!(list.is_empty());
    assert_eq!(store.get(WATCHLIST_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn entries_survive_reopening_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("terminal.json");

    {
        let store = Arc::new(JsonFileStore::new(&path));
        let mut list = WatchlistStore::open(store).unwrap();
        list.add(item("a", "RELIANCE", Some("2026-01-10T17:36:00Z")), Sentiment::Bullish)
            .unwrap();
        list.add(item("b", "TCS", None), Sentiment::Bearish).unwrap();
        list.remove("a").unwrap();
        list.add(item("c", "INFY", None), Sentiment::Neutral).unwrap();
    }

    let reopened = WatchlistStore::open(Arc::new(JsonFileStore::new(&path))).unwrap();
    let ids: Vec<&str> = reopened.entries().iter().map(|e| e.id()).collect();
    assert_eq!(ids, ["c", "b"]);
    assert_eq!(reopened.get("b").unwrap().tag, Sentiment::Bearish);
    assert_eq!(reopened.get("b").unwrap().item.symbol, "TCS");
}

#[test]
fn two_handles_on_one_file_see_each_others_writes_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wl.json");

    let mut one = WatchlistStore::open(Arc::new(JsonFileStore::new(&path))).unwrap();
    let mut two = WatchlistStore::open(Arc::new(JsonFileStore::new(&path))).unwrap();

    one.add(item("a", "RELIANCE", None), Sentiment::Bullish).unwrap();
    assert!(two.is_empty());
    two.reload().unwrap();
    assert!(two.contains("a"));
}

#[test]
fn corrupt_document_reads_as_empty_list() {
    let store = Arc::new(MemoryStore::new());
    store.set(WATCHLIST_KEY, "{not json").unwrap();

    let mut list = WatchlistStore::open(store.clone()).unwrap();
    assert!(list.is_empty());

    list.add(item("a", "RELIANCE", None), Sentiment::Neutral).unwrap();
    let again = WatchlistStore::open(store).unwrap();
    assert_eq!(again.len(), 1);
}

#[test]
fn separate_keys_hold_separate_lists() {
    let store = Arc::new(MemoryStore::new());
    let mut a = WatchlistStore::open_with_key(store.clone(), "wl_alice").unwrap();
    let b = WatchlistStore::open_with_key(store, "wl_bob").unwrap();

    a.add(item("x", "SBIN", None), Sentiment::Bullish).unwrap();
    assert_eq!(a.len(), 1);
    assert!(b.is_empty());

    a.clear().unwrap();
    assert!(a.is_empty());
}
