//! Media file probing to get metadata without a full decode.

use cliptrim_core::{format_time, CliptrimError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Information about a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: PathBuf,
    /// Duration in seconds (0 when the container does not report one)
    pub duration: f64,
    /// Frame rate of the first video stream
    pub fps: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    /// Container format
    pub format: String,
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

impl MediaProbe {
    /// Probe a media file with `ffprobe`.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CliptrimError::NotFound(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let ffprobe = which::which("ffprobe")
            .map_err(|e| CliptrimError::NotFound(format!("ffprobe not found: {e}")))?;

        let output = Command::new(ffprobe)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliptrimError::Probe(format!(
                "ffprobe failed for {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        Self::from_json(path, &json)
    }

    /// Build a probe result from ffprobe's JSON output.
    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        let parsed: ProbeOutput = serde_json::from_str(json)?;

        let video = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"));
        let audio = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("audio"));

        let duration = parsed
            .format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(0.0);

        let fps = video.and_then(|v| {
            v.avg_frame_rate
                .as_deref()
                .and_then(parse_frame_rate)
                .or_else(|| v.r_frame_rate.as_deref().and_then(parse_frame_rate))
        });

        let probe = Self {
            path: path.to_path_buf(),
            duration,
            fps,
            width: video.and_then(|v| v.width),
            height: video.and_then(|v| v.height),
            video_codec: video.and_then(|v| v.codec_name.clone()),
            audio_codec: audio.and_then(|a| a.codec_name.clone()),
            format: parsed
                .format
                .and_then(|f| f.format_name)
                .unwrap_or_default(),
        };
        debug!(path = %path.display(), duration = probe.duration, fps = ?probe.fps, "Probed media");
        Ok(probe)
    }

    /// Check if the file has video.
    pub fn has_video(&self) -> bool {
        self.video_codec.is_some()
    }

    /// Check if the file has audio.
    pub fn has_audio(&self) -> bool {
        self.audio_codec.is_some()
    }

    /// One-line description, e.g. `1920x1080 (16:9) | mov (h264) | 29.97 fps | 00:00:30`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let (Some(w), Some(h)) = (self.width, self.height) {
            parts.push(format!("{w}x{h} ({})", aspect_ratio(w, h)));
        }
        let container = self
            .format
            .split(',')
            .next()
            .filter(|c| !c.is_empty())
            .unwrap_or("unknown");
        match &self.video_codec {
            Some(codec) => parts.push(format!("{container} ({codec})")),
            None => parts.push(container.to_string()),
        }
        if let Some(fps) = self.fps {
            parts.push(format!("{fps:.2} fps"));
        }
        parts.push(format_time(self.duration));
        parts.join(" | ")
    }
}

/// Display aspect ratio. Near-matches of 16:9, 4:3 and 21:9 snap to those
/// names; missing dimensions report 16:9.
pub fn aspect_ratio(width: u32, height: u32) -> String {
    if width == 0 || height == 0 {
        return "16:9".to_string();
    }
    let divisor = gcd(width, height);
    let (w, h) = (width / divisor, height / divisor);
    let ratio = f64::from(w) / f64::from(h);
    for (name, target) in [("16:9", 16.0 / 9.0), ("4:3", 4.0 / 3.0), ("21:9", 21.0 / 9.0)] {
        if (ratio - target).abs() < 0.01 {
            return name.to_string();
        }
    }
    format!("{w}:{h}")
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Parse "30000/1001" or "25" into frames per second. Zero rates are rejected.
fn parse_frame_rate(text: &str) -> Option<f64> {
    let rate = match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => text.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}
