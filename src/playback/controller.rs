use std::time::Duration;

use crate::foundation::core::Fps;

/// Whether the surface is being edited or is flipping through frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Editing operations are accepted.
    Editing,
    /// A playback run is in flight; editing operations are no-ops.
    Playing,
}

/// Timer-delivered input to the playback state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Advance the virtual pointer by one.
    Tick,
    /// Playback ran its full duration.
    Finish,
}

/// What a tick asks the renderer to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackCursor {
    /// The frame at this index.
    Frame(usize),
    /// The pointer ran past the last frame: show the background, never index out of bounds.
    Background,
}

/// Fixed schedule computed when playback starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackPlan {
    /// Number of ticks delivered before `Finish`: frame count + 1.
    pub total_ticks: u32,
    /// Spacing between ticks.
    pub interval: Duration,
}

impl PlaybackPlan {
    /// Total run time, `total_ticks * interval`.
    pub fn duration(self) -> Duration {
        self.interval * self.total_ticks
    }

    /// The full event sequence: `total_ticks` ticks, then exactly one finish.
    pub fn events(self) -> impl Iterator<Item = PlaybackEvent> {
        std::iter::repeat_n(PlaybackEvent::Tick, self.total_ticks as usize)
            .chain(std::iter::once(PlaybackEvent::Finish))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Editing,
    Playing {
        // `None` is the "before the first frame" position the run starts from.
        pointer: Option<usize>,
        ticks: u32,
        total_ticks: u32,
    },
}

/// Flip-book state machine `Editing -> Playing -> Editing`.
///
/// Tick and finish events are the only mutators of the playback pointer; the frame store is
/// only ever read. The tick count is `frame_count + 1`: the pointer starts one step before the
/// first frame and moves once per tick, and the last frame has to be reached before the final
/// tick.
#[derive(Clone, Debug)]
pub struct PlaybackController {
    state: State,
    interval: Duration,
}

impl PlaybackController {
    /// Controller ticking at `fps`.
    pub fn new(fps: Fps) -> Self {
        Self {
            state: State::Editing,
            interval: fps.tick_interval(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> PlaybackMode {
        match self.state {
            State::Editing => PlaybackMode::Editing,
            State::Playing { .. } => PlaybackMode::Playing,
        }
    }

    /// `true` while a run is in flight.
    pub fn is_playing(&self) -> bool {
        self.mode() == PlaybackMode::Playing
    }

    /// Virtual pointer while playing; `None` before the first tick or while editing.
    pub fn pointer(&self) -> Option<usize> {
        match self.state {
            State::Playing { pointer, .. } => pointer,
            State::Editing => None,
        }
    }

    /// Ticks delivered so far in the current run.
    pub fn ticks_delivered(&self) -> u32 {
        match self.state {
            State::Playing { ticks, .. } => ticks,
            State::Editing => 0,
        }
    }

    /// Begin a run over `frame_count` frames. Returns `None` (no-op) if already playing.
    pub fn start(&mut self, frame_count: usize) -> Option<PlaybackPlan> {
        if self.is_playing() {
            return None;
        }
        let total_ticks = u32::try_from(frame_count)
            .unwrap_or(u32::MAX - 1)
            .saturating_add(1);
        self.state = State::Playing {
            pointer: None,
            ticks: 0,
            total_ticks,
        };
        tracing::debug!(frame_count, total_ticks, "playback started");
        Some(PlaybackPlan {
            total_ticks,
            interval: self.interval,
        })
    }

    /// Advance the pointer. Returns what to render, or `None` for a stale tick while editing.
    pub fn tick(&mut self, frame_count: usize) -> Option<PlaybackCursor> {
        let State::Playing {
            pointer,
            ticks,
            total_ticks,
        } = &mut self.state
        else {
            return None;
        };
        let next = pointer.map_or(0, |p| p + 1);
        *pointer = Some(next);
        *ticks += 1;
        if *ticks > *total_ticks {
            tracing::warn!(ticks = *ticks, total_ticks = *total_ticks, "tick past schedule");
        }
        Some(if next < frame_count {
            PlaybackCursor::Frame(next)
        } else {
            PlaybackCursor::Background
        })
    }

    /// End the run. Returns `true` if a run was actually ended; a second finish is ignored.
    pub fn finish(&mut self) -> bool {
        match self.state {
            State::Playing {
                ticks, total_ticks, ..
            } => {
                tracing::debug!(ticks, total_ticks, "playback finished");
                self.state = State::Editing;
                true
            }
            State::Editing => false,
        }
    }

    /// Stop a run early. Behaves like [`PlaybackController::finish`]; any ticks still in flight
    /// are then ignored.
    pub fn cancel(&mut self) -> bool {
        if self.is_playing() {
            tracing::debug!(ticks = self.ticks_delivered(), "playback cancelled");
        }
        self.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
