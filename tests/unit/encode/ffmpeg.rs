use super::*;

use crate::foundation::core::Canvas;

fn one_pixel(color: Rgba8) -> FrameBuffer {
    FrameBuffer::new(Canvas::new(1, 1).unwrap(), color)
}

#[test]
fn flatten_opaque_is_identity() {
    let px = Rgba8::opaque(1, 2, 3);
    let out = flatten_onto(&one_pixel(px), Rgba8::WHITE).unwrap();
    assert_eq!(out.pixel(0, 0), Some(px));
}

#[test]
fn flatten_transparent_returns_background() {
    let clear = Rgba8 { r: 0, g: 0, b: 0, a: 0 };
    let out = flatten_onto(&one_pixel(clear), Rgba8::opaque(10, 20, 30)).unwrap();
    assert_eq!(out.pixel(0, 0), Some(Rgba8::opaque(10, 20, 30)));
}

#[test]
fn flatten_half_alpha_mixes_and_is_opaque() {
    let half_black = Rgba8 { r: 0, g: 0, b: 0, a: 128 };
    // A translucent background still yields opaque output.
    let bg = Rgba8 { a: 0, ..Rgba8::WHITE };
    let px = flatten_onto(&one_pixel(half_black), bg)
        .unwrap()
        .pixel(0, 0)
        .unwrap();
    assert_eq!(px.a, 255);
    assert_eq!((px.r, px.g, px.b), (127, 127, 127));
}

#[test]
fn begin_rejects_odd_dimensions_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/odd.mp4"));
    let err = sink
        .begin(SinkConfig {
            width: 4,
            height: 5,
            fps: Fps::default(),
        })
        .unwrap_err();
    assert!(matches!(err, FlipbookError::Encoding(_)));
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/never.mp4"));
    let frame = FrameBuffer::new(Canvas::new(2, 2).unwrap(), Rgba8::WHITE);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    ensure_parent_dir(Path::new("video.mp4")).unwrap();
    ensure_parent_dir(Path::new("target/unit_ffmpeg/nested/a.mp4")).unwrap();
    assert!(Path::new("target/unit_ffmpeg/nested").is_dir());
}
