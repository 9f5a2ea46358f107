//! ClipTrim Core - Foundation types for trimming and exporting video
//!
//! This crate provides the fundamental types used throughout ClipTrim:
//! - Timecode conversion (seconds, frame counts, SMPTE text)
//! - The frame rate newtype guarding against non-positive rates
//! - The shared error type

pub mod error;
pub mod timecode;

pub use error::{CliptrimError, Result};
pub use timecode::{
    format_frame_display, format_playback_overlay, format_time, format_time_display,
    format_time_with_ms, frame_to_seconds, parse_timecode, percent_to_seconds, progress_percent,
    seconds_to_frame, seconds_to_timecode, timecode_to_seconds, Fps,
};
