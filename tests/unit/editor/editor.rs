use super::*;
use crate::foundation::error::FlipbookError;

fn editor() -> Editor {
    let mut ed = Editor::new(EditorConfig::default()).unwrap();
    ed.set_canvas(Canvas::new(6, 5).unwrap()).unwrap();
    ed
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = EditorConfig {
        max_frames: 0,
        ..EditorConfig::default()
    };
    assert!(Editor::new(cfg).is_err());
}

#[test]
fn editing_is_ignored_while_playing() {
    let mut ed = editor();
    ed.add_frame().unwrap();
    ed.start_playback().unwrap();

    assert_eq!(ed.add_frame().unwrap(), EditStatus::SkippedWhilePlaying);
    assert_eq!(ed.duplicate_frame().unwrap(), EditStatus::SkippedWhilePlaying);
    assert_eq!(ed.next_frame().unwrap(), EditStatus::SkippedWhilePlaying);
    assert_eq!(ed.prev_frame().unwrap(), EditStatus::SkippedWhilePlaying);
    assert_eq!(ed.reset_current(), EditStatus::SkippedWhilePlaying);
    assert!(ed.current_frame_mut().is_none());
    assert_eq!(ed.store().len(), 2);
    assert!(ed.start_playback().is_none());
}

#[test]
fn finish_selects_last_frame() {
    let mut ed = editor();
    ed.add_frame().unwrap();
    ed.add_frame().unwrap();
    ed.prev_frame().unwrap();
    ed.prev_frame().unwrap();
    ed.start_playback().unwrap();
    assert_eq!(ed.handle(PlaybackEvent::Tick), Some(PlaybackCursor::Frame(0)));
    assert_eq!(
        ed.handle(PlaybackEvent::Finish),
        Some(PlaybackCursor::Frame(2))
    );
    assert_eq!(ed.store().current_index(), 2);
    assert_eq!(ed.handle(PlaybackEvent::Finish), None);
    assert_eq!(ed.handle(PlaybackEvent::Tick), None);
}

#[test]
fn notices_surface_as_errors() {
    let mut ed = editor();
    assert!(matches!(
        ed.prev_frame(),
        Err(FlipbookError::BoundaryReached(_))
    ));
    assert!(matches!(
        ed.next_frame(),
        Err(FlipbookError::BoundaryReached(_))
    ));
}

#[test]
fn paint_color_and_onion_toggle() {
    let mut ed = editor();
    assert_eq!(ed.paint_color(), Rgba8::BLACK);
    ed.set_paint_color(Rgba8::RED);
    assert_eq!(ed.paint_color(), Rgba8::RED);
    assert!(ed.onion_skin());
    assert!(!ed.toggle_onion_skin());
    assert!(ed.toggle_onion_skin());
}

#[test]
fn reset_all_starts_over_with_one_blank_frame() {
    let mut ed = editor();
    ed.current_frame_mut().unwrap().put_pixel(0, 0, Rgba8::RED);
    ed.add_frame().unwrap();
    ed.start_playback().unwrap();
    ed.reset_all().unwrap();
    assert_eq!(ed.mode(), PlaybackMode::Editing);
    assert_eq!(ed.store().len(), 1);
    assert_eq!(
        ed.store().current_frame().unwrap().pixel(0, 0),
        Some(Rgba8::WHITE)
    );
}

#[test]
fn restored_editor_resumes_on_last_frame() {
    let canvas = Canvas::new(2, 2).unwrap();
    let frames = vec![
        FrameBuffer::new(canvas, Rgba8::RED),
        FrameBuffer::new(canvas, Rgba8::BLUE),
    ];
    let ed = Editor::with_frames(EditorConfig::default(), frames).unwrap();
    assert_eq!(ed.store().current_index(), 1);
    assert_eq!(ed.snapshot().len(), 2);
}
