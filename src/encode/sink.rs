use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::FlipbookResult;
use crate::frames::buffer::FrameBuffer;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels (already normalized).
    pub width: u32,
    /// Output height in pixels (already normalized, even).
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming frames in temporal order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, every
/// frame has the size announced in `begin`, and `end` is called once after the last frame.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FlipbookResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameBuffer) -> FlipbookResult<()>;
    /// Called once after the last frame is pushed; flushes the container trailer.
    fn end(&mut self) -> FlipbookResult<()>;
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameBuffer)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in order.
    pub fn frames(&self) -> &[(FrameIndex, FrameBuffer)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FlipbookResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameBuffer) -> FlipbookResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FlipbookResult<()> {
        self.finished = true;
        Ok(())
    }
}
