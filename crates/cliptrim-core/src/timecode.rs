//! Timecode conversion between seconds, frame counts and SMPTE text.
//!
//! Every function here is total: malformed input degrades to zero instead of
//! failing, since the values usually come straight from text fields.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static SMPTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}:\d{2}$").expect("valid SMPTE pattern"));
static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})\.(\d{1,3})$").expect("valid decimal pattern")
});
static WHOLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})$").expect("valid whole pattern"));

/// Frames per second, always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fps(f64);

impl Fps {
    /// NTSC video rate, used until the media reports its own.
    pub const NTSC: Self = Self(29.97);
    pub const FPS_24: Self = Self(24.0);
    pub const FPS_25: Self = Self(25.0);
    pub const FPS_30: Self = Self(30.0);
    pub const FPS_60: Self = Self(60.0);

    /// Create a frame rate.
    ///
    /// A non-positive or non-finite rate is a programming error; release
    /// builds fall back to [`Fps::NTSC`].
    pub fn new(rate: f64) -> Self {
        debug_assert!(rate.is_finite() && rate > 0.0, "invalid frame rate {rate}");
        Self::sanitized(rate)
    }

    /// Create a frame rate from untrusted input (probe output, config files).
    pub fn sanitized(rate: f64) -> Self {
        if rate.is_finite() && rate > 0.0 {
            Self(rate)
        } else {
            Self::NTSC
        }
    }

    /// Frames per second as f64.
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Duration of a single frame in seconds.
    #[inline]
    pub fn frame_duration(self) -> f64 {
        1.0 / self.0
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self::NTSC
    }
}

impl TryFrom<f64> for Fps {
    type Error = String;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        if rate.is_finite() && rate > 0.0 {
            Ok(Self(rate))
        } else {
            Err(format!("frame rate must be positive, got {rate}"))
        }
    }
}

impl From<Fps> for f64 {
    fn from(fps: Fps) -> Self {
        fps.0
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.0 - self.0.round()).abs() < 0.001 {
            write!(f, "{} fps", self.0.round() as u32)
        } else {
            write!(f, "{:.2} fps", self.0)
        }
    }
}

/// Split non-negative seconds into whole hours, minutes and seconds.
fn hms(seconds: f64) -> (u64, u64, u64) {
    let h = (seconds / 3600.0).floor() as u64;
    let m = ((seconds % 3600.0) / 60.0).floor() as u64;
    let s = (seconds % 60.0).floor() as u64;
    (h, m, s)
}

/// Whole seconds in `h:m:s`, or `None` if the fields overflow.
fn checked_hms_seconds(h: u64, m: u64, s: u64) -> Option<u64> {
    h.checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(s)
}

fn is_valid_time(seconds: f64) -> bool {
    seconds.is_finite() && seconds >= 0.0
}

/// Format seconds as `HH:MM:SS`.
pub fn format_time(seconds: f64) -> String {
    if !is_valid_time(seconds) {
        return "00:00:00".to_string();
    }
    let (h, m, s) = hms(seconds);
    format!("{h:02}:{m:02}:{s:02}")
}

/// Format seconds as `HH:MM:SS.mmm`.
pub fn format_time_with_ms(seconds: f64) -> String {
    if !is_valid_time(seconds) {
        return "00:00:00.000".to_string();
    }
    let ms = ((seconds % 1.0) * 1000.0).floor() as u64;
    format!("{}.{ms:03}", format_time(seconds))
}

/// Format a `current / total` transport readout.
pub fn format_time_display(current: f64, total: f64) -> String {
    format!("{} / {}", format_time(current), format_time(total))
}

/// Overlay readout: `HH:MM:SS / HH:MM:SS (HH:MM:SS:FF)`.
pub fn format_playback_overlay(current: f64, duration: f64, fps: Fps) -> String {
    format!(
        "{} ({})",
        format_time_display(current, duration),
        seconds_to_timecode(current, fps)
    )
}

/// Convert seconds to SMPTE timecode (`HH:MM:SS:FF`).
///
/// The frame field is the floor of the fractional second times the rate.
pub fn seconds_to_timecode(seconds: f64, fps: Fps) -> String {
    if !is_valid_time(seconds) {
        return "00:00:00:00".to_string();
    }
    let (h, m, s) = hms(seconds);
    let frames = ((seconds % 1.0) * fps.get()).floor() as u64;
    format!("{h:02}:{m:02}:{s:02}:{frames:02}")
}

/// Convert SMPTE timecode (`HH:MM:SS:FF`) to seconds.
///
/// Anything other than four numeric fields yields 0, as do fields too large
/// to add up.
pub fn timecode_to_seconds(text: &str, fps: Fps) -> f64 {
    let fields: Vec<&str> = text.trim().split(':').collect();
    if fields.len() != 4 {
        return 0.0;
    }
    let mut values = [0u64; 4];
    for (slot, field) in values.iter_mut().zip(&fields) {
        match field.parse::<u64>() {
            Ok(v) => *slot = v,
            Err(_) => return 0.0,
        }
    }
    let [h, m, s, f] = values;
    match checked_hms_seconds(h, m, s) {
        Some(whole) => whole as f64 + f as f64 / fps.get(),
        None => 0.0,
    }
}

/// Frame index containing the given time.
pub fn seconds_to_frame(seconds: f64, fps: Fps) -> u64 {
    if !is_valid_time(seconds) {
        return 0;
    }
    (seconds * fps.get()).floor() as u64
}

/// Start time of the given frame index.
pub fn frame_to_seconds(frame: u64, fps: Fps) -> f64 {
    frame as f64 / fps.get()
}

/// Frame counter readout: `Frame: n/total - HH:MM:SS:FF - HH:MM:SS`.
pub fn format_frame_display(frame: u64, total_frames: u64, fps: Fps) -> String {
    let current = frame_to_seconds(frame, fps);
    format!(
        "Frame: {frame}/{total_frames} - {} - {}",
        seconds_to_timecode(current, fps),
        format_time(current)
    )
}

/// Parse user-entered time text.
///
/// Accepts `HH:MM:SS:FF`, `HH:MM:SS.mmm`, `HH:MM:SS`, or a plain number of
/// seconds. Anything else yields 0.
pub fn parse_timecode(text: &str, fps: Fps) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    if SMPTE_RE.is_match(text) {
        return timecode_to_seconds(text, fps);
    }

    if let Some(caps) = DECIMAL_RE.captures(text) {
        let field = |i: usize| caps[i].parse::<u64>().unwrap_or(0);
        let (h, m, s, ms) = (field(1), field(2), field(3), field(4));
        return checked_hms_seconds(h, m, s).map_or(0.0, |whole| whole as f64 + ms as f64 / 1000.0);
    }

    if let Some(caps) = WHOLE_RE.captures(text) {
        let field = |i: usize| caps[i].parse::<u64>().unwrap_or(0);
        return checked_hms_seconds(field(1), field(2), field(3)).map_or(0.0, |whole| whole as f64);
    }

    match text.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => seconds,
        _ => 0.0,
    }
}

/// Percentage of `duration` reached at `current`.
pub fn progress_percent(current: f64, duration: f64) -> f64 {
    if current.is_nan() || duration.is_nan() || duration <= 0.0 {
        return 0.0;
    }
    current / duration * 100.0
}

/// Time in seconds at `percent` of `duration`.
pub fn percent_to_seconds(percent: f64, duration: f64) -> f64 {
    if percent.is_nan() || duration.is_nan() {
        return 0.0;
    }
    percent / 100.0 * duration
}
