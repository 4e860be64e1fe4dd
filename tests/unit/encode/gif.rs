use std::io;

use super::*;
use crate::foundation::core::{Canvas, Fps, Rgba8};

/// Accepts `limit` bytes, then fails like a full disk.
struct LimitedWriter {
    limit: usize,
    written: Vec<u8>,
}

impl Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit - self.written.len();
        if room == 0 {
            return Err(io::Error::other("file size limit exceeded"));
        }
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn frames(n: usize, w: u32, h: u32) -> Vec<Frame> {
    let canvas = Canvas::new(w, h).unwrap();
    let delay = Delay::from_numer_denom_ms(250, 1);
    (0..n)
        .map(|i| {
            let fb = FrameBuffer::new(canvas, Rgba8::opaque(i as u8 * 40, 0, 0));
            Frame::from_parts(fb.to_image(), 0, 0, delay)
        })
        .collect()
}

#[test]
fn complete_stream_ends_with_trailer() {
    let mut out = Vec::new();
    let n = write_gif(frames(3, 8, 6), &mut out).unwrap();
    assert_eq!(n, out.len());
    assert!(out.starts_with(b"GIF89a"));
    assert_eq!(out.last(), Some(&GIF_TRAILER));
}

#[test]
fn failed_final_write_is_a_storage_error() {
    let mut full = Vec::new();
    let total = write_gif(frames(3, 258, 16), &mut full).unwrap();

    // Room for everything except the trailer byte.
    let mut out = LimitedWriter {
        limit: total - 1,
        written: Vec::new(),
    };
    let err = write_gif(frames(3, 258, 16), &mut out).unwrap_err();
    assert!(matches!(err, FlipbookError::Storage(_)));
    assert_ne!(out.written.last(), Some(&GIF_TRAILER));
}

#[test]
fn end_without_begin_is_an_error() {
    let mut sink = GifSink::new(GifSinkOpts::new("target/unit_gif/never.gif"));
    let fb = FrameBuffer::new(Canvas::new(2, 2).unwrap(), Rgba8::WHITE);
    assert!(sink.push_frame(FrameIndex(0), &fb).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn sink_writes_a_finished_file() {
    let out = PathBuf::from("target").join("unit_gif").join("two.gif");
    let mut sink = GifSink::new(GifSinkOpts::new(&out));
    sink.begin(SinkConfig {
        width: 4,
        height: 4,
        fps: Fps::default(),
    })
    .unwrap();
    let fb = FrameBuffer::new(Canvas::new(4, 4).unwrap(), Rgba8::BLUE);
    sink.push_frame(FrameIndex(0), &fb).unwrap();
    sink.push_frame(FrameIndex(1), &fb).unwrap();
    sink.end().unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes.last(), Some(&GIF_TRAILER));
}
