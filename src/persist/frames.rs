use std::io::Cursor;

use rayon::prelude::*;

use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::frames::buffer::FrameBuffer;
use crate::frames::store::Snapshot;
use crate::persist::kv::KeyValueStore;

/// Key holding the number of persisted frames (a JSON integer).
pub const FRAME_COUNT_KEY: &str = "frame_count";

/// Key of the PNG-encoded frame at `idx`.
pub fn frame_key(idx: usize) -> String {
    format!("frame{idx}")
}

/// Parse a [`frame_key`] back to its index.
fn frame_key_index(key: &str) -> Option<usize> {
    key.strip_prefix("frame")?.parse().ok()
}

/// PNG-encode one frame.
pub fn encode_frame_png(frame: &FrameBuffer) -> FlipbookResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    frame
        .to_image()
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| FlipbookError::serde(format!("encode frame png: {e}")))?;
    Ok(out.into_inner())
}

/// Decode a PNG (or any format `image` recognizes) into a frame.
pub fn decode_frame_png(bytes: &[u8]) -> FlipbookResult<FrameBuffer> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| FlipbookError::serde(format!("decode frame image: {e}")))?;
    FrameBuffer::from_image(img.to_rgba8())
}

/// Persist every frame of `snapshot` plus the frame count.
///
/// Entries left over from a longer, earlier save are removed.
#[tracing::instrument(skip_all, fields(frames = snapshot.len()))]
pub fn save_snapshot<S: KeyValueStore + ?Sized>(
    kv: &mut S,
    snapshot: &Snapshot,
) -> FlipbookResult<()> {
    let frames: Vec<&FrameBuffer> = snapshot.iter().collect();
    let encoded = frames
        .par_iter()
        .map(|f| encode_frame_png(f))
        .collect::<FlipbookResult<Vec<_>>>()?;

    for (i, png) in encoded.iter().enumerate() {
        kv.put(&frame_key(i), png)?;
    }
    let count = serde_json::to_vec(&snapshot.len())
        .map_err(|e| FlipbookError::serde(format!("encode frame count: {e}")))?;
    kv.put(FRAME_COUNT_KEY, &count)?;

    for key in kv.keys()? {
        if frame_key_index(&key).is_some_and(|i| i >= snapshot.len()) {
            kv.remove(&key)?;
        }
    }
    tracing::info!("project saved");
    Ok(())
}

/// Load up to `max_frames` persisted frames in order.
///
/// A missing count means an empty project. Missing frame entries are skipped.
#[tracing::instrument(skip(kv))]
pub fn restore_frames<S: KeyValueStore + ?Sized>(
    kv: &S,
    max_frames: usize,
) -> FlipbookResult<Vec<FrameBuffer>> {
    let count: usize = match kv.get(FRAME_COUNT_KEY)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| FlipbookError::serde(format!("decode frame count: {e}")))?,
        None => return Ok(Vec::new()),
    };
    if count > max_frames {
        tracing::warn!(count, max_frames, "persisted project exceeds capacity; truncating");
    }

    let mut blobs = Vec::new();
    for i in 0..count.min(max_frames) {
        match kv.get(&frame_key(i))? {
            Some(bytes) => blobs.push(bytes),
            None => tracing::warn!(idx = i, "persisted frame missing; skipped"),
        }
    }

    blobs
        .par_iter()
        .map(|b| decode_frame_png(b))
        .collect::<FlipbookResult<Vec<_>>>()
}

#[cfg(test)]
#[path = "../../tests/unit/persist/frames.rs"]
mod tests;
