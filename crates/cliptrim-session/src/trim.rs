//! Trim window maintenance.
//!
//! After every operation `0 <= in_point < out_point <= duration`, except for
//! the degenerate `0 == 0` window of media with no known duration.

use crate::state::PlaybackState;
use tracing::debug;

/// What playback should do when the engine reports end of file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EofOutcome {
    /// Jump back to the window start; keep playing if `resume`.
    Loop { seek_to: f64, resume: bool },
    /// Whole file selected: stop at the end.
    PauseAtEnd,
}

/// Enforces the trim invariant on a [`PlaybackState`].
#[derive(Debug, Clone, Copy)]
pub struct TrimManager {
    min_clip: f64,
}

impl TrimManager {
    pub fn new(min_clip_seconds: f64) -> Self {
        debug_assert!(min_clip_seconds > 0.0);
        let min_clip = if min_clip_seconds.is_finite() && min_clip_seconds > 0.0 {
            min_clip_seconds
        } else {
            1.0
        };
        Self { min_clip }
    }

    pub fn min_clip(&self) -> f64 {
        self.min_clip
    }

    /// Apply a new media duration. An unset out point (0) snaps to the end.
    pub fn set_duration(&self, state: &mut PlaybackState, duration: f64) {
        if !duration.is_finite() || duration < 0.0 {
            return;
        }
        state.duration = duration;
        if state.out_point == 0.0 {
            state.out_point = duration;
        }
        state.current_time = state.current_time.clamp(0.0, duration);
        self.reclamp(state);
    }

    /// Move the window start, pushing the end out (or pulling the start back)
    /// to keep at least `min_clip` between them where the media allows.
    pub fn set_in_point(&self, state: &mut PlaybackState, time: f64) {
        if !time.is_finite() {
            return;
        }
        self.reclamp(state);
        let d = state.duration;
        state.in_point = time.clamp(0.0, d);
        if state.in_point >= state.out_point {
            state.out_point = (state.in_point + self.min_clip).min(d);
        }
        if state.in_point >= state.out_point {
            state.in_point = (state.out_point - self.min_clip).max(0.0);
        }
        debug!(in_point = state.in_point, out_point = state.out_point, "In point set");
    }

    /// Move the window end; mirror image of [`TrimManager::set_in_point`].
    pub fn set_out_point(&self, state: &mut PlaybackState, time: f64) {
        if !time.is_finite() {
            return;
        }
        self.reclamp(state);
        let d = state.duration;
        state.out_point = time.clamp(0.0, d);
        if state.in_point >= state.out_point {
            state.in_point = (state.out_point - self.min_clip).max(0.0);
        }
        if state.in_point >= state.out_point {
            state.out_point = (state.in_point + self.min_clip).min(d);
        }
        debug!(in_point = state.in_point, out_point = state.out_point, "Out point set");
    }

    /// Set both ends at once.
    pub fn set_range(&self, state: &mut PlaybackState, start: f64, end: f64) {
        self.set_out_point(state, end);
        self.set_in_point(state, start);
    }

    pub fn clear_in_point(&self, state: &mut PlaybackState) {
        self.reclamp(state);
        state.in_point = 0.0;
        self.reclamp(state);
    }

    pub fn clear_out_point(&self, state: &mut PlaybackState) {
        self.reclamp(state);
        state.out_point = state.duration;
        self.reclamp(state);
    }

    /// Decide the end-of-file behaviour for the current window.
    pub fn on_eof(&self, state: &PlaybackState) -> EofOutcome {
        if state.in_point > 0.0 || state.out_point < state.duration {
            EofOutcome::Loop {
                seek_to: state.in_point,
                resume: state.is_playing,
            }
        } else {
            EofOutcome::PauseAtEnd
        }
    }

    /// Clamp both points into `[0, duration]` and restore `in < out`.
    pub fn reclamp(&self, state: &mut PlaybackState) {
        let d = state.duration.max(0.0);
        state.in_point = state.in_point.clamp(0.0, d);
        state.out_point = state.out_point.clamp(0.0, d);
        if state.in_point >= state.out_point {
            state.out_point = (state.in_point + self.min_clip).min(d);
            if state.in_point >= state.out_point {
                state.in_point = (state.out_point - self.min_clip).max(0.0);
            }
        }
    }
}

impl Default for TrimManager {
    fn default() -> Self {
        Self::new(1.0)
    }
}
