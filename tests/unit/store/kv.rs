use super::*;

#[test]
fn memory_store_set_get_remove() {
    let mut store = MemoryStore::new();
    assert_eq!(store.get(BACKGROUND_KEY).unwrap(), None);
    assert!(store.set(BACKGROUND_KEY, "data:image/png;base64,AA==", 100).unwrap());
    assert_eq!(
        store.get(BACKGROUND_KEY).unwrap().as_deref(),
        Some("data:image/png;base64,AA==")
    );
    store.remove(BACKGROUND_KEY).unwrap();
    assert_eq!(store.get(BACKGROUND_KEY).unwrap(), None);
}

#[test]
fn size_limit_is_exclusive() {
    let mut store = MemoryStore::new();
    assert!(store.set("k", "abcd", 5).unwrap());
    assert!(!store.set("k", "abcde", 5).unwrap());
    assert_eq!(store.get("k").unwrap().as_deref(), Some("abcd"));
}

#[test]
fn dir_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = DirStore::open(dir.path().join("kv")).unwrap();
        assert!(store.set(BACKGROUND_KEY, "hello", BACKGROUND_MAX_CHARS).unwrap());
    }
    let mut store = DirStore::open(dir.path().join("kv")).unwrap();
    assert_eq!(store.get(BACKGROUND_KEY).unwrap().as_deref(), Some("hello"));
    store.remove(BACKGROUND_KEY).unwrap();
    store.remove(BACKGROUND_KEY).unwrap();
    assert_eq!(store.get(BACKGROUND_KEY).unwrap(), None);
}

#[test]
fn dir_store_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirStore::open(dir.path()).unwrap();
    for key in ["", "../escape", "a/b", ".hidden"] {
        let err = store.set(key, "x", 10).unwrap_err();
        assert!(err.to_string().contains("validation error"), "{key}: {err}");
    }
}

#[test]
fn dir_store_skips_oversized_values() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirStore::open(dir.path()).unwrap();
    assert!(!store.set("big", "xxxxxxxxxx", 10).unwrap());
    assert!(!dir.path().join("big").exists());
}
