//! File naming helpers for loaded media and export targets.

use crate::format::ExportFormat;
use cliptrim_core::format_time;
use std::path::Path;

const MAX_DISPLAY_LEN: usize = 40;
const TRUNCATED_STEM_LEN: usize = 37;

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "webm", "wmv", "flv", "mpg", "mpeg", "m4v", "3gp", "ts",
];

/// Whether the path has a recognised video extension.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// File name for display, shortened to `stem[..37] + "..." + .ext` when
/// longer than 40 characters.
pub fn display_file_name(path: &Path) -> String {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return String::new();
    };
    if name.chars().count() <= MAX_DISPLAY_LEN {
        return name;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name.as_str(), ""),
    };
    let short: String = stem.chars().take(TRUNCATED_STEM_LEN).collect();
    format!("{short}...{ext}")
}

/// Default output name for an export of `[in_point, out_point]`.
///
/// `clip.mov` trimmed to 0:10-0:20 as mp4 becomes
/// `clip_00-00-10_to_00-00-20.mp4`; an untrimmed export becomes
/// `clip_edited.mp4`.
pub fn suggest_output_filename(
    input: &Path,
    in_point: f64,
    out_point: f64,
    format: ExportFormat,
) -> String {
    let ext = format.extension();
    let Some(stem) = input.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
        return format!("output.{ext}");
    };

    if in_point > 0.0 || out_point > 0.0 {
        let from = format_time(in_point).replace(':', "-");
        let to = format_time(out_point).replace(':', "-");
        format!("{stem}_{from}_to_{to}.{ext}")
    } else {
        format!("{stem}_edited.{ext}")
    }
}
