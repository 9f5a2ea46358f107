//! Parser for encoder progress lines (`... time=HH:MM:SS.ms ...`).

use regex::Regex;
use std::sync::LazyLock;

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time=(\d+):(\d+):(\d+\.\d+)").expect("valid progress regex")
});

/// Encoded position in seconds carried by a progress line, if any.
pub fn parse_progress_time(line: &str) -> Option<f64> {
    let caps = TIME_RE.captures(line)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Completed fraction `min(1, seconds / total)` for a progress line.
///
/// Lines without a timestamp, or a non-positive total, yield 0.
pub fn parse_progress(line: &str, total_seconds: f64) -> f64 {
    if total_seconds.is_nan() || total_seconds <= 0.0 {
        return 0.0;
    }
    parse_progress_time(line)
        .map(|t| (t / total_seconds).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}
