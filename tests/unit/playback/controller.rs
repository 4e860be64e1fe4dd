use super::*;

fn controller() -> PlaybackController {
    PlaybackController::new(Fps::default())
}

#[test]
fn starts_in_editing_mode() {
    let c = controller();
    assert_eq!(c.mode(), PlaybackMode::Editing);
    assert_eq!(c.pointer(), None);
}

#[test]
fn plan_has_one_tick_more_than_frames() {
    let mut c = controller();
    let plan = c.start(5).unwrap();
    assert_eq!(plan.total_ticks, 6);
    assert_eq!(plan.interval, Duration::from_millis(250));
    assert_eq!(plan.duration(), Duration::from_millis(1500));
    assert_eq!(c.mode(), PlaybackMode::Playing);
}

#[test]
fn start_while_playing_is_a_no_op() {
    let mut c = controller();
    c.start(2).unwrap();
    c.tick(2);
    assert!(c.start(2).is_none());
    assert_eq!(c.pointer(), Some(0));
}

#[test]
fn events_end_with_exactly_one_finish() {
    let plan = PlaybackPlan {
        total_ticks: 4,
        interval: Duration::from_millis(10),
    };
    let events: Vec<_> = plan.events().collect();
    assert_eq!(events.len(), 5);
    assert!(events[..4].iter().all(|e| *e == PlaybackEvent::Tick));
    assert_eq!(events[4], PlaybackEvent::Finish);
}

#[test]
fn ticks_walk_frames_then_fall_back_to_background() {
    let mut c = controller();
    let plan = c.start(3).unwrap();
    let cursors: Vec<_> = (0..plan.total_ticks).filter_map(|_| c.tick(3)).collect();
    assert_eq!(
        cursors,
        vec![
            PlaybackCursor::Frame(0),
            PlaybackCursor::Frame(1),
            PlaybackCursor::Frame(2),
            PlaybackCursor::Background,
        ]
    );
    // Late, jittered tick still never indexes out of bounds.
    assert_eq!(c.tick(3), Some(PlaybackCursor::Background));
}

#[test]
fn finish_returns_to_editing_exactly_once() {
    let mut c = controller();
    c.start(1).unwrap();
    assert!(c.finish());
    assert_eq!(c.mode(), PlaybackMode::Editing);
    assert!(!c.finish());
    assert_eq!(c.tick(1), None);
}

#[test]
fn cancel_ends_the_run() {
    let mut c = controller();
    c.start(4).unwrap();
    c.tick(4);
    assert!(c.cancel());
    assert!(!c.is_playing());
    assert!(!c.cancel());
    assert_eq!(c.ticks_delivered(), 0);
}
