use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::frames::buffer::FrameBuffer;

/// Last byte of every complete GIF stream.
const GIF_TRAILER: u8 = 0x3B;

/// Options for [`GifSink`].
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Output GIF file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl GifSinkOpts {
    /// Create options for outputting a GIF to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Looping animated GIF written with the `image` crate; needs no external tools.
///
/// The destination is created in `begin`; frames are collected and the whole stream is encoded
/// and written in `end`, so every I/O failure (trailer included) is reported.
pub struct GifSink {
    opts: GifSinkOpts,
    file: Option<File>,
    cfg: Option<SinkConfig>,
    delay: Option<Delay>,
    frames: Vec<Frame>,
}

impl GifSink {
    /// Create a sink writing to `opts.out_path`.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            file: None,
            cfg: None,
            delay: None,
            frames: Vec::new(),
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> FlipbookResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(FlipbookError::encoding("gif sink width/height must be non-zero"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(FlipbookError::encoding(format!(
                "gif frames are limited to 65535x65535, got {}x{}",
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
        let file = File::create(&self.opts.out_path).map_err(|e| {
            FlipbookError::storage(format!(
                "failed to create '{}': {e}",
                self.opts.out_path.display()
            ))
        })?;

        let interval = cfg.fps.tick_interval();
        let delay_ms = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
        self.delay = Some(Delay::from_numer_denom_ms(delay_ms, 1));
        self.file = Some(file);
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameBuffer) -> FlipbookResult<()> {
        let (Some(cfg), Some(delay)) = (self.cfg.as_ref(), self.delay) else {
            return Err(FlipbookError::encoding("gif sink not started"));
        };
        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(FlipbookError::encoding(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        self.frames
            .push(Frame::from_parts(frame.to_image(), 0, 0, delay));
        Ok(())
    }

    fn end(&mut self) -> FlipbookResult<()> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| FlipbookError::encoding("gif sink not started"))?;
        self.cfg = None;
        let written = write_gif(std::mem::take(&mut self.frames), &mut file)?;
        tracing::debug!(bytes = written, out = %self.opts.out_path.display(), "gif written");
        Ok(())
    }
}

/// Encode `frames` as a looping GIF and write the complete stream to `out`.
///
/// Encoder failures are [`FlipbookError::Encoding`]; failures writing `out` are
/// [`FlipbookError::Storage`]. Returns the number of bytes written.
fn write_gif<W: Write>(frames: Vec<Frame>, out: &mut W) -> FlipbookResult<usize> {
    let mut bytes = Vec::new();
    {
        // The trailer is emitted when the encoder drops; into memory that cannot fail.
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| FlipbookError::encoding(format!("gif repeat: {e}")))?;
        encoder
            .encode_frames(frames)
            .map_err(|e| FlipbookError::encoding(format!("gif frame: {e}")))?;
    }
    if bytes.last() != Some(&GIF_TRAILER) {
        return Err(FlipbookError::encoding("gif encoder did not finish the stream"));
    }

    out.write_all(&bytes)
        .and_then(|()| out.flush())
        .map_err(|e| FlipbookError::storage(format!("write gif: {e}")))?;
    Ok(bytes.len())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
