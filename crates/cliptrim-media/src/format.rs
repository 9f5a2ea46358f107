//! Export container formats and quality presets.

use cliptrim_core::CliptrimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Mp4,
    Webm,
    Mov,
    Mkv,
    Avi,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [Self::Mp4, Self::Webm, Self::Mov, Self::Mkv, Self::Avi];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mov => "mov",
            Self::Mkv => "mkv",
            Self::Avi => "avi",
        }
    }

    /// Human-readable name for pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Mp4 => "MP4 (H.264)",
            Self::Webm => "WebM (VP9)",
            Self::Mov => "MOV (QuickTime)",
            Self::Mkv => "MKV (Matroska)",
            Self::Avi => "AVI",
        }
    }

    /// Typical video bitrate at nominal quality, in kbps.
    pub fn base_bitrate_kbps(self) -> u32 {
        match self {
            Self::Mp4 => 3000,
            Self::Webm => 2000,
            Self::Mov => 4000,
            Self::Mkv => 3500,
            Self::Avi => 5000,
        }
    }

    /// FFmpeg video encoder name.
    pub fn video_encoder(self) -> &'static str {
        match self {
            Self::Mp4 | Self::Mov | Self::Mkv => "libx264",
            Self::Webm => "libvpx-vp9",
            Self::Avi => "mpeg4",
        }
    }

    /// FFmpeg audio encoder name.
    pub fn audio_encoder(self) -> &'static str {
        match self {
            Self::Mp4 | Self::Mov | Self::Mkv => "aac",
            Self::Webm => "libopus",
            Self::Avi => "libmp3lame",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CliptrimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == s)
            .ok_or_else(|| CliptrimError::InvalidParameter(format!("Unknown export format: {s}")))
    }
}

/// Export quality on a 1-100 scale (higher = better).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: Quality = Quality(1);
    pub const MAX: Quality = Quality(100);

    /// Out-of-range values are clamped into 1..=100.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0..=19 => "Low",
            20..=39 => "Medium",
            40..=59 => "High",
            60..=79 => "Very High",
            _ => "Maximum",
        }
    }

    /// Bitrate multiplier, from 0.2 at the bottom of the scale to 1.5 at the top.
    pub fn bitrate_factor(self) -> f64 {
        0.2 + (self.0 as f64 / 100.0) * 1.3
    }

    /// Constant rate factor for x264/VP9 (40 at quality 1 down to 16 at 100).
    pub fn crf(self) -> u32 {
        let span = (self.0 - 1) as f64 / 99.0;
        40 - (span * 24.0).round() as u32
    }

    /// `-q:v` scale for the MPEG-4 encoder (31 at quality 1 down to 2 at 100).
    pub fn qscale(self) -> u32 {
        let span = (self.0 - 1) as f64 / 99.0;
        31 - (span * 29.0).round() as u32
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

/// Rough output size in megabytes for `seconds` of material.
pub fn estimate_size_mb(format: ExportFormat, quality: Quality, seconds: f64) -> f64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0.0;
    }
    let kbps = format.base_bitrate_kbps() as f64 * quality.bitrate_factor();
    kbps * seconds / 8000.0
}

/// "12.3 MB" below a gigabyte, "1.25 GB" above.
pub fn format_size(mb: f64) -> String {
    if mb < 1000.0 {
        format!("{mb:.1} MB")
    } else {
        format!("{:.2} GB", mb / 1000.0)
    }
}
