//! The playback model.

use cliptrim_core::{
    format_frame_display, format_playback_overlay, format_time_display, seconds_to_frame, Fps,
};
use cliptrim_media::{ExportFormat, Quality};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Preferred export format and quality. Survives file loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPrefs {
    pub format: ExportFormat,
    pub quality: Quality,
}

/// Export lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Running {
        /// Percent complete, 0-100.
        progress: f64,
        format: ExportFormat,
        quality: Quality,
    },
    Cancelled,
    Completed,
}

impl ExportState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Percent complete as shown to the user.
    pub fn progress(&self) -> f64 {
        match self {
            Self::Running { progress, .. } => *progress,
            Self::Completed => 100.0,
            Self::Idle | Self::Cancelled => 0.0,
        }
    }

    /// Whether the export has ended and is waiting to settle back to idle.
    pub fn is_settling(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Everything the UI renders about the current file and transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub file_path: Option<PathBuf>,
    /// Display name of the loaded file.
    pub file_name: Option<String>,
    /// Seconds; 0 until the engine reports it.
    pub duration: f64,
    pub fps: Fps,
    /// Playhead in seconds, within `[0, duration]`.
    pub current_time: f64,
    pub is_playing: bool,
    /// Linear volume in `[0, 1]`.
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
    /// Trim window start, `0 <= in_point < out_point <= duration`.
    pub in_point: f64,
    pub out_point: f64,
    pub is_fullscreen: bool,
    pub show_controls: bool,
    pub export: ExportState,
    pub export_prefs: ExportPrefs,
    /// Bumped whenever anything above changes.
    pub revision: u64,
}

impl PlaybackState {
    pub fn new(fps: Fps, export_prefs: ExportPrefs) -> Self {
        Self {
            file_path: None,
            file_name: None,
            duration: 0.0,
            fps,
            current_time: 0.0,
            is_playing: false,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            in_point: 0.0,
            out_point: 0.0,
            is_fullscreen: false,
            show_controls: true,
            export: ExportState::Idle,
            export_prefs,
            revision: 0,
        }
    }

    /// Back to defaults, keeping export preferences and the revision counter.
    pub fn reset(&mut self, fps: Fps) {
        let prefs = self.export_prefs;
        let revision = self.revision;
        *self = Self::new(fps, prefs);
        self.revision = revision;
    }

    pub fn has_file(&self) -> bool {
        self.file_path.is_some()
    }

    /// Length of the trim window in seconds.
    pub fn trim_window_seconds(&self) -> f64 {
        (self.out_point - self.in_point).max(0.0)
    }

    /// Whether the trim window excludes part of the media.
    pub fn is_trim_active(&self) -> bool {
        self.duration > 0.0 && (self.in_point > 0.0 || self.out_point < self.duration)
    }

    /// `HH:MM:SS / HH:MM:SS` transport readout.
    pub fn time_readout(&self) -> String {
        format_time_display(self.current_time, self.duration)
    }

    /// Transport readout with the SMPTE timecode of the playhead.
    pub fn overlay_readout(&self) -> String {
        format_playback_overlay(self.current_time, self.duration, self.fps)
    }

    /// Frame counter readout used while stepping.
    pub fn frame_readout(&self) -> String {
        format_frame_display(
            seconds_to_frame(self.current_time, self.fps),
            seconds_to_frame(self.duration, self.fps),
            self.fps,
        )
    }

    /// Same as `self == other`, ignoring the revision counter.
    pub(crate) fn same_content(&self, other: &Self) -> bool {
        let mut a = self.clone();
        a.revision = other.revision;
        a == *other
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(Fps::NTSC, ExportPrefs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_prefs() {
        let prefs = ExportPrefs {
            format: ExportFormat::Webm,
            quality: Quality::new(30),
        };
        let mut state = PlaybackState::new(Fps::NTSC, prefs);
        state.file_path = Some("a.mp4".into());
        state.duration = 12.0;
        state.revision = 9;

        state.reset(Fps::FPS_25);
        assert!(!state.has_file());
        assert_eq!(state.duration, 0.0);
        assert_eq!(state.fps, Fps::FPS_25);
        assert_eq!(state.export_prefs, prefs);
        assert_eq!(state.revision, 9);
    }

    #[test]
    fn test_trim_helpers() {
        let mut state = PlaybackState::default();
        state.duration = 30.0;
        state.in_point = 0.0;
        state.out_point = 30.0;
        assert!(!state.is_trim_active());
        assert_eq!(state.trim_window_seconds(), 30.0);

        state.in_point = 10.0;
        assert!(state.is_trim_active());
        assert_eq!(state.trim_window_seconds(), 20.0);
    }

    #[test]
    fn test_readouts() {
        let mut state = PlaybackState::new(Fps::FPS_25, ExportPrefs::default());
        state.duration = 90.0;
        state.current_time = 62.5;
        assert_eq!(state.time_readout(), "00:01:02 / 00:01:30");
        assert_eq!(state.overlay_readout(), "00:01:02 / 00:01:30 (00:01:02:12)");

        state.current_time = 62.0;
        assert_eq!(state.frame_readout(), "Frame: 1550/2250 - 00:01:02:00 - 00:01:02");
    }

    #[test]
    fn test_export_progress_view() {
        assert_eq!(ExportState::Idle.progress(), 0.0);
        assert_eq!(ExportState::Completed.progress(), 100.0);
        let running = ExportState::Running {
            progress: 45.0,
            format: ExportFormat::Mp4,
            quality: Quality::default(),
        };
        assert!(running.is_running());
        assert_eq!(running.progress(), 45.0);
    }
}
