//! ClipTrim Media - FFmpeg integration for trimming and export
//!
//! This crate handles:
//! - Export format and quality presets
//! - Output file naming
//! - Media file probing through ffprobe
//! - Trim encoding through ffmpeg, with textual progress reporting

pub mod encoder;
pub mod format;
pub mod naming;
pub mod probe;
pub mod progress;

pub use encoder::{encoder_available, ExportCancel, TrimJob};
pub use format::{estimate_size_mb, format_size, ExportFormat, Quality};
pub use naming::{display_file_name, is_video_file, suggest_output_filename};
pub use probe::{aspect_ratio, MediaProbe};
pub use progress::{parse_progress, parse_progress_time};
