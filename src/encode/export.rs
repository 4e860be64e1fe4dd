use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::frames::store::Snapshot;

/// Container written by [`export`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// H.264 MP4 through the system `ffmpeg`.
    Mp4,
    /// Looping animated GIF, pure Rust.
    Gif,
}

impl ExportFormat {
    /// Guess from the destination extension; anything other than `.gif` is MP4.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gif") => Self::Gif,
            _ => Self::Mp4,
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Gif => "gif",
        }
    }
}

/// Options for [`export`].
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Destination file.
    pub out_path: PathBuf,
    /// Frame rate of the output.
    pub fps: Fps,
    /// Container; `None` picks from the extension.
    pub format: Option<ExportFormat>,
    /// Replace an existing file.
    pub overwrite: bool,
    /// Colour translucent pixels are flattened onto (MP4).
    pub background: Rgba8,
}

impl ExportOpts {
    /// Defaults for writing `out_path` at `fps`.
    pub fn new(out_path: impl Into<PathBuf>, fps: Fps) -> Self {
        Self {
            out_path: out_path.into(),
            fps,
            format: None,
            overwrite: true,
            background: Rgba8::WHITE,
        }
    }

    /// Effective container.
    pub fn resolved_format(&self) -> ExportFormat {
        self.format
            .unwrap_or_else(|| ExportFormat::from_path(&self.out_path))
    }
}

/// What an export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    /// Frames written.
    pub frames: usize,
    /// Size every frame was encoded at.
    pub encoded: Canvas,
    /// Size of the source frames.
    pub source: Canvas,
    /// Destination, when written to a file.
    pub out_path: Option<PathBuf>,
}

/// Size frames are encoded at: an odd trailing row (and column) is trimmed, never padded.
///
/// Fails when trimming leaves nothing, i.e. a 1-pixel-high or 1-pixel-wide frame.
pub fn normalized_size(source: Canvas) -> FlipbookResult<Canvas> {
    let width = source.width - source.width % 2;
    let height = source.height - source.height % 2;
    if width == 0 || height == 0 {
        return Err(FlipbookError::encoding(format!(
            "{}x{} frames are too small to encode at even dimensions",
            source.width, source.height
        )));
    }
    Ok(Canvas { width, height })
}

/// Stream `snapshot` into `sink` at `fps`, normalizing every frame to even dimensions.
///
/// An empty snapshot is an error and the sink is never started.
pub fn export_to_sink(
    snapshot: &Snapshot,
    fps: Fps,
    sink: &mut dyn FrameSink,
) -> FlipbookResult<ExportReport> {
    let fps = Fps::new(fps.num, fps.den).map_err(as_encoding)?;
    let source = snapshot
        .canvas()
        .ok_or_else(|| FlipbookError::encoding("nothing to export: the project has no frames"))?;
    let encoded = normalized_size(source)?;
    if encoded != source {
        tracing::debug!(
            from = ?source,
            to = ?encoded,
            "trimming frames to even dimensions"
        );
    }

    sink.begin(SinkConfig {
        width: encoded.width,
        height: encoded.height,
        fps,
    })?;
    for (i, frame) in snapshot.iter().enumerate() {
        if frame.canvas() != source {
            return Err(FlipbookError::encoding(format!(
                "frame {i} is {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                source.width,
                source.height
            )));
        }
        let normalized = frame
            .cropped(encoded.width, encoded.height)
            .map_err(as_encoding)?;
        sink.push_frame(FrameIndex(i as u64), &normalized)?;
    }
    sink.end()?;

    Ok(ExportReport {
        frames: snapshot.len(),
        encoded,
        source,
        out_path: None,
    })
}

/// Encode `snapshot` into a video file.
///
/// Failures are reported as [`FlipbookError::Storage`] (destination could not be prepared) or
/// [`FlipbookError::Encoding`] (everything else, including unclassified failures). A partially
/// written file is removed before the error is returned.
#[tracing::instrument(skip(snapshot, opts), fields(out = %opts.out_path.display(), frames = snapshot.len()))]
pub fn export(snapshot: &Snapshot, opts: &ExportOpts) -> FlipbookResult<ExportReport> {
    if snapshot.is_empty() {
        return Err(FlipbookError::encoding(
            "nothing to export: the project has no frames",
        ));
    }
    let before = std::fs::metadata(&opts.out_path).and_then(|m| m.modified()).ok();
    if opts.out_path.exists() && !opts.overwrite {
        return Err(FlipbookError::storage(format!(
            "output file '{}' already exists",
            opts.out_path.display()
        )));
    }

    let format = opts.resolved_format();
    let result = match format {
        ExportFormat::Mp4 => {
            let mut sink = FfmpegSink::new(FfmpegSinkOpts {
                out_path: opts.out_path.clone(),
                overwrite: opts.overwrite,
                bg: opts.background,
            });
            export_to_sink(snapshot, opts.fps, &mut sink)
        }
        ExportFormat::Gif => {
            let mut sink = GifSink::new(GifSinkOpts {
                out_path: opts.out_path.clone(),
                overwrite: opts.overwrite,
            });
            export_to_sink(snapshot, opts.fps, &mut sink)
        }
    };

    match result {
        Ok(mut report) => {
            report.out_path = Some(opts.out_path.clone());
            tracing::info!(
                frames = report.frames,
                width = report.encoded.width,
                height = report.encoded.height,
                format = format.extension(),
                "export finished"
            );
            Ok(report)
        }
        Err(err) => {
            let err = classify(err);
            if written_since(&opts.out_path, before) {
                match std::fs::remove_file(&opts.out_path) {
                    Ok(()) => tracing::warn!("removed partially written export"),
                    Err(e) => tracing::warn!(error = %e, "could not remove partial export"),
                }
            }
            tracing::warn!(error = %err, "export failed");
            Err(err)
        }
    }
}

/// `true` when `path` exists and was created or modified after `before` was sampled.
fn written_since(path: &Path, before: Option<SystemTime>) -> bool {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(now) => before.is_none_or(|b| now != b),
        Err(_) => path.exists() && before.is_none(),
    }
}

/// Collapse everything that is not a storage failure into an encoding failure.
fn classify(err: FlipbookError) -> FlipbookError {
    match err {
        FlipbookError::Storage(_) | FlipbookError::Encoding(_) => err,
        other => as_encoding(other),
    }
}

fn as_encoding(err: FlipbookError) -> FlipbookError {
    match err {
        FlipbookError::Encoding(_) => err,
        other => FlipbookError::encoding(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
