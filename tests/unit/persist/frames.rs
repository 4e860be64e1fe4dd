use super::*;
use crate::foundation::core::{Canvas, Rgba8};
use crate::persist::kv::MemoryStore;

fn frames(n: usize) -> Vec<FrameBuffer> {
    let canvas = Canvas::new(5, 3).unwrap();
    (0..n)
        .map(|i| {
            let mut f = FrameBuffer::new(canvas, Rgba8::WHITE);
            f.put_pixel(i as u32 % 5, 1, Rgba8::opaque(i as u8 * 10, 0, 255));
            f
        })
        .collect()
}

#[test]
fn frame_keys_parse_back() {
    assert_eq!(frame_key(7), "frame7");
    assert_eq!(frame_key_index("frame7"), Some(7));
    assert_eq!(frame_key_index(FRAME_COUNT_KEY), None);
    assert_eq!(frame_key_index("other"), None);
}

#[test]
fn save_then_restore_is_pixel_identical() {
    let original = frames(4);
    let mut kv = MemoryStore::new();
    save_snapshot(&mut kv, &Snapshot::from_frames(original.clone())).unwrap();
    assert_eq!(kv.get(FRAME_COUNT_KEY).unwrap(), Some(b"4".to_vec()));
    let restored = restore_frames(&kv, 32).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn shorter_save_removes_stale_frames() {
    let mut kv = MemoryStore::new();
    save_snapshot(&mut kv, &Snapshot::from_frames(frames(3))).unwrap();
    save_snapshot(&mut kv, &Snapshot::from_frames(frames(1))).unwrap();
    assert_eq!(
        kv.keys().unwrap(),
        vec![frame_key(0), FRAME_COUNT_KEY.to_string()]
    );
}

#[test]
fn restore_caps_and_skips_missing_entries() {
    let mut kv = MemoryStore::new();
    save_snapshot(&mut kv, &Snapshot::from_frames(frames(5))).unwrap();
    assert_eq!(restore_frames(&kv, 2).unwrap().len(), 2);

    kv.remove(&frame_key(1)).unwrap();
    let restored = restore_frames(&kv, 32).unwrap();
    assert_eq!(restored.len(), 4);
    assert_eq!(restored[1], frames(5)[2]);
}

#[test]
fn empty_store_restores_nothing() {
    let kv = MemoryStore::new();
    assert!(restore_frames(&kv, 32).unwrap().is_empty());
}

#[test]
fn corrupt_payloads_are_serde_errors() {
    let mut kv = MemoryStore::new();
    kv.put(FRAME_COUNT_KEY, b"not json").unwrap();
    assert!(matches!(
        restore_frames(&kv, 32),
        Err(FlipbookError::Serde(_))
    ));

    kv.put(FRAME_COUNT_KEY, b"1").unwrap();
    kv.put(&frame_key(0), b"not a png").unwrap();
    assert!(matches!(
        restore_frames(&kv, 32),
        Err(FlipbookError::Serde(_))
    ));
}
