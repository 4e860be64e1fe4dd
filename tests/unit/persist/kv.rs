use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_kv").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn memory_store_round_trips() {
    let mut kv = MemoryStore::new();
    assert_eq!(kv.get("a").unwrap(), None);
    kv.put("a", b"1").unwrap();
    kv.put("b", b"2").unwrap();
    kv.put("a", b"3").unwrap();
    assert_eq!(kv.get("a").unwrap(), Some(b"3".to_vec()));
    assert_eq!(kv.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    kv.remove("a").unwrap();
    kv.remove("missing").unwrap();
    assert_eq!(kv.keys().unwrap(), vec!["b".to_string()]);
}

#[test]
fn dir_store_round_trips() {
    let root = scratch("round_trip");
    let mut kv = DirStore::open(&root).unwrap();
    assert!(root.is_dir());
    kv.put("frame0", b"png").unwrap();
    kv.put("frame_count", b"1").unwrap();
    assert_eq!(kv.get("frame0").unwrap(), Some(b"png".to_vec()));
    assert_eq!(
        kv.keys().unwrap(),
        vec!["frame0".to_string(), "frame_count".to_string()]
    );
    kv.remove("frame0").unwrap();
    assert_eq!(kv.get("frame0").unwrap(), None);
    kv.remove("frame0").unwrap();
}

#[test]
fn dir_store_rejects_path_like_keys() {
    let mut kv = DirStore::open(scratch("bad_keys")).unwrap();
    for key in ["", "../escape", "a/b", ".hidden"] {
        assert!(matches!(
            kv.put(key, b"x"),
            Err(FlipbookError::Validation(_))
        ));
    }
}
