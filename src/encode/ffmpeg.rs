use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, Rgba8};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::frames::buffer::FrameBuffer;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Colour translucent pixels are flattened onto.
    pub bg: Rgba8,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg: Rgba8::WHITE,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
///
/// Output is H.264 in an MP4 container with yuv420p chroma, which only accepts even frame
/// dimensions.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
}

/// A spawned `ffmpeg` process and the stream it reads frames from.
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<String>>,
    cfg: SinkConfig,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
        }
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg(if self.opts.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
            .arg("-s")
            .arg(format!("{}x{}", cfg.width, cfg.height))
            // Before `-i`, so it is the input rate of the raw stream.
            .arg("-r")
            .arg(format!("{}/{}", cfg.fps.num, cfg.fps.den))
            .args(["-i", "pipe:0", "-an"])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg(&self.opts.out_path);
        cmd
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> FlipbookResult<()> {
        Fps::new(cfg.fps.num, cfg.fps.den)?;
        if cfg.width == 0 || cfg.height == 0 {
            return Err(FlipbookError::encoding("mp4 frames must not be empty"));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(FlipbookError::encoding(format!(
                "yuv420p needs even dimensions, got {}x{}",
                cfg.width, cfg.height
            )));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(FlipbookError::storage(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(FlipbookError::encoding(
                "mp4 export needs ffmpeg, which was not found on PATH",
            ));
        }

        let mut child = self
            .command(&cfg)
            .spawn()
            .map_err(|e| FlipbookError::encoding(format!("spawn ffmpeg: {e}")))?;
        let stdin = child.stdin.take();
        // Drained concurrently; a full stderr pipe stalls ffmpeg.
        let stderr = child.stderr.take().map(|err| {
            std::thread::spawn(move || std::io::read_to_string(err).unwrap_or_default())
        });

        tracing::debug!(
            pid = child.id(),
            width = cfg.width,
            height = cfg.height,
            out = %self.opts.out_path.display(),
            "ffmpeg started"
        );
        self.encoder = Some(Encoder {
            child,
            stdin,
            stderr,
            cfg,
            last_idx: None,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameBuffer) -> FlipbookResult<()> {
        let enc = self
            .encoder
            .as_mut()
            .ok_or_else(|| FlipbookError::encoding("ffmpeg sink not started"))?;
        if enc.last_idx.is_some_and(|last| idx <= last) {
            return Err(FlipbookError::encoding(format!(
                "frame {} arrived out of order",
                idx.0
            )));
        }
        if frame.width() != enc.cfg.width || frame.height() != enc.cfg.height {
            return Err(FlipbookError::encoding(format!(
                "frame {} is {}x{}, stream is {}x{}",
                idx.0,
                frame.width(),
                frame.height(),
                enc.cfg.width,
                enc.cfg.height
            )));
        }
        enc.last_idx = Some(idx);

        let opaque = flatten_onto(frame, self.opts.bg)?;
        let stdin = enc
            .stdin
            .as_mut()
            .ok_or_else(|| FlipbookError::encoding("ffmpeg stdin is closed"))?;
        stdin
            .write_all(opaque.as_bytes())
            .map_err(|e| FlipbookError::encoding(format!("write frame {} to ffmpeg: {e}", idx.0)))
    }

    fn end(&mut self) -> FlipbookResult<()> {
        let mut enc = self
            .encoder
            .take()
            .ok_or_else(|| FlipbookError::encoding("ffmpeg sink not started"))?;
        // EOF on stdin tells ffmpeg to finish the file.
        drop(enc.stdin.take());
        let status = enc
            .child
            .wait()
            .map_err(|e| FlipbookError::encoding(format!("wait for ffmpeg: {e}")))?;
        let log = enc
            .stderr
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(FlipbookError::encoding(format!(
                "ffmpeg failed ({status}): {}",
                log.trim()
            )))
        }
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if self.child.try_wait().ok().flatten().is_none() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Composite `frame` onto an opaque `bg`, giving the fully opaque raster ffmpeg is fed.
fn flatten_onto(frame: &FrameBuffer, bg: Rgba8) -> FlipbookResult<FrameBuffer> {
    let mut out = FrameBuffer::new(frame.canvas(), Rgba8 { a: 255, ..bg });
    out.blend_over(frame, 255)?;
    Ok(out)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> FlipbookResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                FlipbookError::storage(format!(
                    "failed to create output directory '{}': {e}",
                    parent.display()
                ))
            }),
        _ => Ok(()),
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
