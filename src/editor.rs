use crate::foundation::config::EditorConfig;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::FlipbookResult;
use crate::frames::buffer::FrameBuffer;
use crate::frames::store::{FrameStore, Snapshot};
use crate::playback::controller::{
    PlaybackController, PlaybackCursor, PlaybackEvent, PlaybackMode, PlaybackPlan,
};

/// Outcome of an editing operation that was not refused with a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditStatus {
    /// The store was changed (or navigated).
    Applied,
    /// Playback is running; the operation was ignored.
    SkippedWhilePlaying,
}

/// The drawing surface: a frame store, the playback state machine over it, and the pen state.
///
/// All mutation happens through `&mut self`, so tick delivery and editing are serialized by
/// the borrow checker. While playing, every editing operation is a no-op.
#[derive(Clone, Debug)]
pub struct Editor {
    config: EditorConfig,
    store: FrameStore,
    playback: PlaybackController,
    paint_color: Rgba8,
    onion_skin: bool,
}

impl Editor {
    /// Empty project; the first frame appears with [`Editor::set_canvas`].
    pub fn new(config: EditorConfig) -> FlipbookResult<Self> {
        config.validate()?;
        let store = FrameStore::new(config.max_frames, config.background);
        Ok(Self::from_parts(config, store))
    }

    /// Project restored from previously saved frames; the cursor starts on the last frame.
    pub fn with_frames(config: EditorConfig, frames: Vec<FrameBuffer>) -> FlipbookResult<Self> {
        config.validate()?;
        let store = FrameStore::from_frames(frames, config.max_frames, config.background)?;
        Ok(Self::from_parts(config, store))
    }

    fn from_parts(config: EditorConfig, store: FrameStore) -> Self {
        Self {
            playback: PlaybackController::new(config.fps),
            onion_skin: config.onion_skin,
            paint_color: Rgba8::BLACK,
            store,
            config,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Read-only access to the frames.
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Read-only access to the playback state machine.
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Editing or playing.
    pub fn mode(&self) -> PlaybackMode {
        self.playback.mode()
    }

    fn editing(&self, op: &'static str) -> bool {
        if self.playback.is_playing() {
            tracing::debug!(op, "ignored while playing");
            return false;
        }
        true
    }

    /// The drawing surface now knows its size; creates the first frame when needed.
    pub fn set_canvas(&mut self, canvas: Canvas) -> FlipbookResult<()> {
        self.store.set_canvas(canvas)
    }

    /// Append a blank frame at the end of the sequence and select it.
    pub fn add_frame(&mut self) -> FlipbookResult<EditStatus> {
        if !self.editing("add_frame") {
            return Ok(EditStatus::SkippedWhilePlaying);
        }
        let idx = self.store.new_frame()?;
        tracing::debug!(idx, len = self.store.len(), "frame added");
        Ok(EditStatus::Applied)
    }

    /// Append a copy of the last frame at the end of the sequence and select it.
    pub fn duplicate_frame(&mut self) -> FlipbookResult<EditStatus> {
        if !self.editing("duplicate_frame") {
            return Ok(EditStatus::SkippedWhilePlaying);
        }
        let idx = self.store.duplicate_frame()?;
        tracing::debug!(idx, len = self.store.len(), "frame duplicated");
        Ok(EditStatus::Applied)
    }

    /// Clear the selected frame to the background.
    pub fn reset_current(&mut self) -> EditStatus {
        if !self.editing("reset_current") {
            return EditStatus::SkippedWhilePlaying;
        }
        self.store.reset_current();
        EditStatus::Applied
    }

    /// Select the next frame.
    pub fn next_frame(&mut self) -> FlipbookResult<EditStatus> {
        if !self.editing("next_frame") {
            return Ok(EditStatus::SkippedWhilePlaying);
        }
        self.store.next_frame()?;
        Ok(EditStatus::Applied)
    }

    /// Select the previous frame.
    pub fn prev_frame(&mut self) -> FlipbookResult<EditStatus> {
        if !self.editing("prev_frame") {
            return Ok(EditStatus::SkippedWhilePlaying);
        }
        self.store.prev_frame()?;
        Ok(EditStatus::Applied)
    }

    /// The frame strokes are rasterized into. `None` while playing or before the first frame.
    pub fn current_frame_mut(&mut self) -> Option<&mut FrameBuffer> {
        if !self.editing("current_frame_mut") {
            return None;
        }
        self.store.current_frame_mut()
    }

    /// Ink colour for the drawing collaborator.
    pub fn set_paint_color(&mut self, color: Rgba8) {
        self.paint_color = color;
    }

    /// Current ink colour.
    pub fn paint_color(&self) -> Rgba8 {
        self.paint_color
    }

    /// Flip the onion-skin overlay and return the new state.
    pub fn toggle_onion_skin(&mut self) -> bool {
        self.onion_skin = !self.onion_skin;
        tracing::debug!(on = self.onion_skin, "onion skin toggled");
        self.onion_skin
    }

    /// Whether the previous frame is overlaid while editing.
    pub fn onion_skin(&self) -> bool {
        self.onion_skin
    }

    /// Start a run. `None` if already playing or there is nothing to play.
    pub fn start_playback(&mut self) -> Option<PlaybackPlan> {
        if self.store.is_empty() {
            return None;
        }
        self.playback.start(self.store.len())
    }

    /// Deliver one timer event.
    ///
    /// A tick returns the cursor to render. A finish returns the cursor of the frame editing
    /// resumes on (the last one). Stale events outside a run return `None`.
    pub fn handle(&mut self, event: PlaybackEvent) -> Option<PlaybackCursor> {
        match event {
            PlaybackEvent::Tick => self.playback.tick(self.store.len()),
            PlaybackEvent::Finish => self
                .playback
                .finish()
                .then(|| self.resume_on_last_frame()),
        }
    }

    /// Stop a run early; editing resumes on the last frame as if it had finished.
    pub fn cancel_playback(&mut self) -> Option<PlaybackCursor> {
        self.playback
            .cancel()
            .then(|| self.resume_on_last_frame())
    }

    fn resume_on_last_frame(&mut self) -> PlaybackCursor {
        let last = self.store.len().saturating_sub(1);
        match self.store.set_current_index(last) {
            Ok(()) => PlaybackCursor::Frame(last),
            Err(_) => PlaybackCursor::Background,
        }
    }

    /// Restart the project: every frame is discarded, a run in flight is abandoned, and the first
    /// frame is re-created if the surface size is known.
    pub fn reset_all(&mut self) -> FlipbookResult<()> {
        self.playback.cancel();
        self.store.reset_all();
        if let Some(canvas) = self.store.canvas() {
            self.store.set_canvas(canvas)?;
        }
        tracing::debug!("project reset");
        Ok(())
    }

    /// Frozen view of the frames for export and persistence.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// What the surface shows right now. `None` before the first frame exists.
    pub fn render(&self) -> Option<FrameBuffer> {
        crate::render::compose::compose_view(self)
    }
}

#[cfg(test)]
#[path = "../tests/unit/editor/editor.rs"]
mod tests;
