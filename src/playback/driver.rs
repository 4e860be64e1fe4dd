use std::ops::ControlFlow;
use std::time::Duration;

use crate::editor::Editor;
use crate::playback::controller::{PlaybackCursor, PlaybackEvent};

/// Time source for [`run_playback`].
pub trait Clock {
    /// Block (or pretend to) for `d`.
    fn sleep(&mut self, d: Duration);
}

/// Real time: sleeps the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Virtual time for tests and instant previews: records sleeps without blocking.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Fresh clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all sleeps.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Every sleep in call order.
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }
}

impl Clock for ManualClock {
    fn sleep(&mut self, d: Duration) {
        self.elapsed += d;
        self.sleeps.push(d);
    }
}

/// One delivered event, handed to the `on_step` observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackStep {
    /// The event that was delivered.
    pub event: PlaybackEvent,
    /// 1-based tick number; for `Finish` the number of ticks delivered before it.
    pub tick: u32,
    /// What the surface shows after the event.
    pub cursor: PlaybackCursor,
    /// Time since the run started.
    pub at: Duration,
}

/// Summary of a [`run_playback`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Ticks delivered.
    pub ticks: u32,
    /// `true` when `on_step` stopped the run early.
    pub cancelled: bool,
    /// Time spent according to the clock.
    pub elapsed: Duration,
}

/// Start playback on `editor` and deliver its whole schedule serially.
///
/// The first tick fires immediately, later ticks every `interval`, and the finish one interval
/// after the last tick. `on_step` sees the editor after each event; returning
/// `ControlFlow::Break` cancels the run, which then resumes editing on the last frame.
///
/// Returns `None` when playback could not start (already playing, or no frames).
pub fn run_playback<C, F>(
    editor: &mut Editor,
    clock: &mut C,
    mut on_step: F,
) -> Option<PlaybackReport>
where
    C: Clock + ?Sized,
    F: FnMut(&Editor, PlaybackStep) -> ControlFlow<()>,
{
    let plan = editor.start_playback()?;
    let mut at = Duration::ZERO;
    let mut ticks = 0u32;

    for event in plan.events() {
        if event == PlaybackEvent::Finish || ticks > 0 {
            clock.sleep(plan.interval);
            at += plan.interval;
        }
        if event == PlaybackEvent::Tick {
            ticks += 1;
        }
        let Some(cursor) = editor.handle(event) else {
            continue;
        };
        let step = PlaybackStep {
            event,
            tick: ticks,
            cursor,
            at,
        };
        if on_step(editor, step).is_break() && event == PlaybackEvent::Tick {
            editor.cancel_playback();
            tracing::debug!(ticks, "playback stopped by observer");
            return Some(PlaybackReport {
                ticks,
                cancelled: true,
                elapsed: at,
            });
        }
    }

    Some(PlaybackReport {
        ticks,
        cancelled: false,
        elapsed: at,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/playback/driver.rs"]
mod tests;
