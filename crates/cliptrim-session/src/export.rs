//! Export lifecycle: `Idle -> Running -> {Completed, Cancelled} -> Idle`.
//!
//! Every run gets a fresh [`RunId`]. Progress, completion and failure
//! reports carry the id of the run they belong to; reports for any other run
//! (for example ticks that arrive after a cancel) are discarded.

use crate::error::ActionError;
use crate::state::ExportState;
use cliptrim_media::{ExportFormat, Quality};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Generation tag of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Drives [`ExportState`] transitions.
#[derive(Debug)]
pub struct ExportOrchestrator {
    next_run: u64,
    active: Option<RunId>,
    ended_at: Option<Instant>,
    settle: Duration,
}

impl ExportOrchestrator {
    pub fn new(settle: Duration) -> Self {
        Self {
            next_run: 1,
            active: None,
            ended_at: None,
            settle,
        }
    }

    /// The run currently allowed to report progress.
    pub fn active_run(&self) -> Option<RunId> {
        self.active
    }

    /// Enter `Running(0)`. Callers check the file and trim window first.
    pub fn start(
        &mut self,
        state: &mut ExportState,
        format: ExportFormat,
        quality: Quality,
    ) -> Result<RunId, ActionError> {
        if state.is_running() {
            return Err(ActionError::ExportAlreadyRunning);
        }
        let run = RunId(self.next_run);
        self.next_run += 1;
        self.active = Some(run);
        self.ended_at = None;
        *state = ExportState::Running {
            progress: 0.0,
            format,
            quality,
        };
        info!(%run, %format, quality = quality.get(), "Export started");
        Ok(run)
    }

    /// Record progress for `run`. Returns whether the state changed.
    pub fn apply_progress(
        &mut self,
        state: &mut ExportState,
        run: RunId,
        percent: f64,
        now: Instant,
    ) -> bool {
        let ExportState::Running { progress, .. } = state else {
            debug!(%run, percent, "Progress after export ended, dropped");
            return false;
        };
        if self.active != Some(run) {
            debug!(%run, active = ?self.active, "Progress from stale run, dropped");
            return false;
        }
        if percent.is_nan() {
            return false;
        }

        let next = percent.clamp(0.0, 100.0).max(*progress);
        if next >= 100.0 {
            self.complete(state, run, now);
            return true;
        }
        if next == *progress {
            return false;
        }
        *progress = next;
        true
    }

    /// Abort the running export; goes straight to `Idle`.
    pub fn cancel(&mut self, state: &mut ExportState) -> Result<RunId, ActionError> {
        let (true, Some(run)) = (state.is_running(), self.active) else {
            return Err(ActionError::NotExporting);
        };
        self.active = None;
        self.ended_at = None;
        *state = ExportState::Idle;
        info!(%run, "Export cancelled");
        Ok(run)
    }

    /// The encoder finished `run`; completes even if the last tick was short of 100.
    pub fn finish(&mut self, state: &mut ExportState, run: RunId, now: Instant) -> bool {
        if !state.is_running() || self.active != Some(run) {
            debug!(%run, "Completion for inactive run, dropped");
            return false;
        }
        self.complete(state, run, now);
        true
    }

    /// The encoder gave up on `run`.
    pub fn fail(&mut self, state: &mut ExportState, run: RunId, reason: &str, now: Instant) -> bool {
        if !state.is_running() || self.active != Some(run) {
            debug!(%run, reason, "Failure for inactive run, dropped");
            return false;
        }
        warn!(%run, reason, "Export failed");
        self.active = None;
        self.ended_at = Some(now);
        *state = ExportState::Cancelled;
        true
    }

    /// Settle a finished export back to `Idle` once it has been visible long enough.
    pub fn tick(&mut self, state: &mut ExportState, now: Instant) -> bool {
        if !state.is_settling() {
            return false;
        }
        let Some(ended) = self.ended_at else {
            *state = ExportState::Idle;
            return true;
        };
        if now.saturating_duration_since(ended) < self.settle {
            return false;
        }
        self.ended_at = None;
        *state = ExportState::Idle;
        true
    }

    /// Forget any run, e.g. when the file changes.
    pub fn reset(&mut self) {
        self.active = None;
        self.ended_at = None;
    }

    fn complete(&mut self, state: &mut ExportState, run: RunId, now: Instant) {
        info!(%run, "Export completed");
        self.active = None;
        self.ended_at = Some(now);
        *state = ExportState::Completed;
    }
}

impl Default for ExportOrchestrator {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
