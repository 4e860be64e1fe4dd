use super::*;
use crate::foundation::config::EditorConfig;
use crate::foundation::core::{Canvas, Rgba8};
use crate::playback::controller::PlaybackEvent;

fn two_frame_editor() -> Editor {
    let mut ed = Editor::new(EditorConfig::default()).unwrap();
    ed.set_canvas(Canvas::new(2, 2).unwrap()).unwrap();
    ed.current_frame_mut().unwrap().fill(Rgba8::BLACK);
    ed.add_frame().unwrap();
    ed
}

#[test]
fn nothing_to_show_before_first_frame() {
    let ed = Editor::new(EditorConfig::default()).unwrap();
    assert!(compose_view(&ed).is_none());
}

#[test]
fn onion_skin_tints_current_frame() {
    let mut ed = two_frame_editor();
    let view = compose_view(&ed).unwrap();
    assert_eq!(view.pixel(0, 0), Some(Rgba8::opaque(230, 230, 230)));

    ed.toggle_onion_skin();
    let view = compose_view(&ed).unwrap();
    assert_eq!(view.pixel(0, 0), Some(Rgba8::WHITE));
}

#[test]
fn first_frame_has_no_overlay() {
    let mut ed = two_frame_editor();
    ed.prev_frame().unwrap();
    let view = compose_view(&ed).unwrap();
    assert_eq!(view.pixel(1, 1), Some(Rgba8::BLACK));
}

#[test]
fn playback_shows_pointer_frame_then_background() {
    let mut ed = two_frame_editor();
    ed.start_playback().unwrap();
    assert_eq!(compose_view(&ed).unwrap().pixel(0, 0), Some(Rgba8::WHITE));
    ed.handle(PlaybackEvent::Tick);
    assert_eq!(compose_view(&ed).unwrap().pixel(0, 0), Some(Rgba8::BLACK));
    ed.handle(PlaybackEvent::Tick);
    assert_eq!(compose_view(&ed).unwrap().pixel(0, 0), Some(Rgba8::WHITE));
    ed.handle(PlaybackEvent::Tick);
    assert_eq!(compose_view(&ed).unwrap().pixel(0, 0), Some(Rgba8::WHITE));
}
