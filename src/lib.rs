//! Flipbook is the core of a frame-based doodle animation editor.
//!
//! A project is an ordered, capacity-bounded list of equally sized RGBA rasters. The editor
//! draws into the current frame, plays the frames back on a fixed tick schedule and exports
//! them as an MP4 (through the system `ffmpeg`) or an animated GIF.
//!
//! # Pipeline overview
//!
//! 1. **Edit**: [`Editor`] owns a [`FrameStore`] and the pen state; frames are added,
//!    duplicated, navigated and cleared through it.
//! 2. **Play**: [`PlaybackController`] turns the frame count into a [`PlaybackPlan`] of ticks and
//!    one finish; [`run_playback`] delivers it against a [`Clock`].
//! 3. **Show**: [`compose_view`] produces the raster the surface displays (with onion skin).
//! 4. **Export**: [`export`] streams a frozen [`Snapshot`] into a [`FrameSink`].
//! 5. **Persist**: [`save_snapshot`] / [`restore_frames`] over any [`KeyValueStore`].
//!
//! Frames are copy-on-write: a [`Snapshot`] shares buffers with the store, and later edits
//! never reach an export already in progress.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod editor;
mod encode;
mod foundation;
mod frames;
mod persist;
mod playback;
mod render;

/// Collision-avoiding export file names.
pub mod naming;
/// Colour palette and the picker that reports selections.
pub mod palette;

pub use editor::{EditStatus, Editor};
pub use encode::export::{
    ExportFormat, ExportOpts, ExportReport, export, export_to_sink, normalized_size,
};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::gif::{GifSink, GifSinkOpts};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::config::{DEFAULT_MAX_FRAMES, DEFAULT_ONION_ALPHA, EditorConfig};
pub use foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
pub use foundation::error::{Boundary, FlipbookError, FlipbookResult};
pub use frames::buffer::FrameBuffer;
pub use frames::store::{FrameStore, Snapshot};
pub use persist::frames::{
    FRAME_COUNT_KEY, decode_frame_png, encode_frame_png, frame_key, restore_frames, save_snapshot,
};
pub use persist::kv::{DirStore, KeyValueStore, MemoryStore};
pub use playback::controller::{
    PlaybackController, PlaybackCursor, PlaybackEvent, PlaybackMode, PlaybackPlan,
};
pub use playback::driver::{
    Clock, ManualClock, PlaybackReport, PlaybackStep, SystemClock, run_playback,
};
pub use render::compose::compose_view;
