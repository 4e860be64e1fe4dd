use std::sync::Arc;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{Boundary, FlipbookError, FlipbookResult};
use crate::frames::buffer::FrameBuffer;

/// Ordered, capacity-bounded sequence of frames plus a cursor.
///
/// Invariants:
/// - `len() <= max_frames()`
/// - `current_index() < len()` whenever the store is non-empty
/// - every frame has the store's canvas size
///
/// Frames are shared copy-on-write with [`Snapshot`]s: editing a frame that a snapshot still
/// references clones it first, so snapshots never observe later edits.
#[derive(Clone, Debug)]
pub struct FrameStore {
    frames: Vec<Arc<FrameBuffer>>,
    current: usize,
    canvas: Option<Canvas>,
    max_frames: usize,
    background: Rgba8,
}

impl FrameStore {
    /// Empty store. Frames appear once the surface size is known ([`FrameStore::set_canvas`]).
    pub fn new(max_frames: usize, background: Rgba8) -> Self {
        Self {
            frames: Vec::new(),
            current: 0,
            canvas: None,
            max_frames: max_frames.max(1),
            background,
        }
    }

    /// Store pre-populated from restored frames.
    ///
    /// All frames must share one size. Frames beyond `max_frames` are dropped and the cursor
    /// starts on the last kept frame.
    pub fn from_frames(
        frames: Vec<FrameBuffer>,
        max_frames: usize,
        background: Rgba8,
    ) -> FlipbookResult<Self> {
        let mut store = Self::new(max_frames, background);
        let Some(first) = frames.first() else {
            return Ok(store);
        };
        let canvas = first.canvas();
        if let Some(bad) = frames.iter().position(|f| f.canvas() != canvas) {
            return Err(FlipbookError::validation(format!(
                "restored frame {bad} is {}x{}, expected {}x{}",
                frames[bad].width(),
                frames[bad].height(),
                canvas.width,
                canvas.height
            )));
        }
        if frames.len() > store.max_frames {
            tracing::warn!(
                restored = frames.len(),
                max = store.max_frames,
                "dropping restored frames beyond capacity"
            );
        }

        store.canvas = Some(canvas);
        store.frames = frames
            .into_iter()
            .take(store.max_frames)
            .map(Arc::new)
            .collect();
        store.current = store.frames.len() - 1;
        Ok(store)
    }

    /// Record the drawing-surface size and eagerly create the first frame if the store is empty.
    ///
    /// Once frames exist their size is fixed; a different `canvas` is then rejected.
    pub fn set_canvas(&mut self, canvas: Canvas) -> FlipbookResult<()> {
        Canvas::new(canvas.width, canvas.height)?;
        match self.canvas {
            Some(existing) if !self.frames.is_empty() && existing != canvas => {
                Err(FlipbookError::validation(format!(
                    "frames are {}x{}; cannot resize to {}x{}",
                    existing.width, existing.height, canvas.width, canvas.height
                )))
            }
            _ => {
                self.canvas = Some(canvas);
                if self.frames.is_empty() {
                    self.push_blank();
                }
                Ok(())
            }
        }
    }

    /// Size every frame has, once known.
    pub fn canvas(&self) -> Option<Canvas> {
        self.canvas
    }

    /// Capacity bound.
    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// Fill colour of new and cleared frames.
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` before the first frame exists (or after [`FrameStore::reset_all`]).
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Cursor position; meaningful only when non-empty.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Frame at `idx`.
    pub fn frame(&self, idx: usize) -> Option<&FrameBuffer> {
        self.frames.get(idx).map(Arc::as_ref)
    }

    /// Frame under the cursor.
    pub fn current_frame(&self) -> Option<&FrameBuffer> {
        self.frame(self.current)
    }

    /// Frame just before the cursor (onion-skin source).
    pub fn previous_frame(&self) -> Option<&FrameBuffer> {
        self.current.checked_sub(1).and_then(|i| self.frame(i))
    }

    /// Mutable access to the frame under the cursor, unsharing it from any snapshot.
    pub fn current_frame_mut(&mut self) -> Option<&mut FrameBuffer> {
        self.frames.get_mut(self.current).map(Arc::make_mut)
    }

    /// Append a background-filled frame at the end and move the cursor onto it.
    ///
    /// At capacity this is a no-op reported as [`FlipbookError::CapacityExceeded`].
    pub fn new_frame(&mut self) -> FlipbookResult<usize> {
        if self.canvas.is_none() {
            return Err(FlipbookError::validation(
                "surface size is not known yet; no frame can be created",
            ));
        }
        if self.frames.len() >= self.max_frames {
            return Err(FlipbookError::CapacityExceeded {
                max: self.max_frames,
            });
        }
        Ok(self.push_blank())
    }

    /// [`FrameStore::new_frame`], then copy the preceding frame's pixels into the new one.
    pub fn duplicate_frame(&mut self) -> FlipbookResult<usize> {
        let idx = self.new_frame()?;
        if let Some(prev) = idx.checked_sub(1) {
            // Same canvas by construction.
            self.frames[idx] = Arc::clone(&self.frames[prev]);
        }
        Ok(idx)
    }

    /// Move the cursor forward. At the last frame this is reported as
    /// [`Boundary::End`] and nothing changes.
    pub fn next_frame(&mut self) -> FlipbookResult<usize> {
        if self.current + 1 >= self.frames.len() {
            return Err(FlipbookError::BoundaryReached(Boundary::End));
        }
        self.current += 1;
        Ok(self.current)
    }

    /// Move the cursor back. At index 0 this is reported as [`Boundary::Start`].
    pub fn prev_frame(&mut self) -> FlipbookResult<usize> {
        if self.frames.is_empty() || self.current == 0 {
            return Err(FlipbookError::BoundaryReached(Boundary::Start));
        }
        self.current -= 1;
        Ok(self.current)
    }

    /// Jump the cursor; out-of-range indices are rejected.
    pub fn set_current_index(&mut self, idx: usize) -> FlipbookResult<()> {
        if idx >= self.frames.len() {
            return Err(FlipbookError::validation(format!(
                "frame index {idx} out of range (len {})",
                self.frames.len()
            )));
        }
        self.current = idx;
        Ok(())
    }

    /// Clear the current frame to the background. Length and cursor are unchanged.
    pub fn reset_current(&mut self) {
        let bg = self.background;
        if let Some(f) = self.current_frame_mut() {
            f.fill(bg);
        }
    }

    /// Drop every frame and the cursor. The canvas size is remembered so the surface can
    /// re-create the first frame.
    pub fn reset_all(&mut self) {
        self.frames.clear();
        self.current = 0;
    }

    /// Frozen, ordered view of the frames as they are now.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frames: self.frames.clone(),
        }
    }

    fn push_blank(&mut self) -> usize {
        let canvas = self.canvas.unwrap_or(Canvas {
            width: 1,
            height: 1,
        });
        self.frames
            .push(Arc::new(FrameBuffer::new(canvas, self.background)));
        self.current = self.frames.len() - 1;
        self.current
    }
}

/// Immutable, ordered copy of a [`FrameStore`]'s frames at one point in time.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    frames: Vec<Arc<FrameBuffer>>,
}

impl Snapshot {
    /// Build a snapshot from loose frames (tests, external producers).
    pub fn from_frames(frames: impl IntoIterator<Item = FrameBuffer>) -> Self {
        Self {
            frames: frames.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when there is nothing to play or export.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `idx`.
    pub fn get(&self, idx: usize) -> Option<&FrameBuffer> {
        self.frames.get(idx).map(Arc::as_ref)
    }

    /// Frames in temporal order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FrameBuffer> + '_ {
        self.frames.iter().map(Arc::as_ref)
    }

    /// Size of the first frame.
    pub fn canvas(&self) -> Option<Canvas> {
        self.frames.first().map(|f| f.canvas())
    }

    /// Clone the frames out of the snapshot.
    pub fn to_frames(&self) -> Vec<FrameBuffer> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/store.rs"]
mod tests;
