//! Trim export through the ffmpeg sidecar process.
//!
//! The encoder reports progress as `time=HH:MM:SS.ms` text lines so callers
//! can feed them through the same parser they use for any ffmpeg log, and
//! honours an [`ExportCancel`] handle between events.

use crate::format::{ExportFormat, Quality};
use cliptrim_core::{format_time_with_ms, CliptrimError, Result};
use ffmpeg_sidecar::command::{ffmpeg_is_installed, FfmpegCommand};
use ffmpeg_sidecar::event::FfmpegEvent;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether an ffmpeg binary can be launched.
pub fn encoder_available() -> bool {
    ffmpeg_is_installed()
}

/// One trim/transcode job: `[in_point, out_point]` of `input` into `output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Window start in seconds.
    pub in_point: f64,
    /// Window end in seconds.
    pub out_point: f64,
    pub format: ExportFormat,
    pub quality: Quality,
}

impl TrimJob {
    /// Create a job. The window must be non-empty.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        in_point: f64,
        out_point: f64,
        format: ExportFormat,
        quality: Quality,
    ) -> Result<Self> {
        if !(in_point.is_finite() && out_point.is_finite()) || in_point < 0.0 || in_point >= out_point
        {
            return Err(CliptrimError::InvalidParameter(format!(
                "Empty trim window: {in_point}..{out_point}"
            )));
        }
        Ok(Self {
            input: input.into(),
            output: output.into(),
            in_point,
            out_point,
            format,
            quality,
        })
    }

    /// Length of the exported window in seconds.
    pub fn duration(&self) -> f64 {
        self.out_point - self.in_point
    }

    /// Build the FFmpeg command arguments.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-ss".into(),
            format_time_with_ms(self.in_point),
            "-i".into(),
            self.input.to_string_lossy().into_owned(),
            "-t".into(),
            format!("{:.3}", self.duration()),
        ];

        // Video codec
        args.extend(["-c:v".into(), self.format.video_encoder().into()]);

        // Quality settings
        match self.format {
            ExportFormat::Avi => {
                args.extend(["-q:v".into(), self.quality.qscale().to_string()]);
            }
            ExportFormat::Webm => {
                args.extend([
                    "-crf".into(),
                    self.quality.crf().to_string(),
                    "-b:v".into(),
                    "0".into(),
                ]);
            }
            ExportFormat::Mp4 | ExportFormat::Mov | ExportFormat::Mkv => {
                args.extend([
                    "-crf".into(),
                    self.quality.crf().to_string(),
                    "-preset".into(),
                    "medium".into(),
                    "-pix_fmt".into(),
                    "yuv420p".into(),
                ]);
            }
        }

        // Audio codec
        args.extend(["-c:a".into(), self.format.audio_encoder().into()]);

        // Output
        args.push(self.output.to_string_lossy().into_owned());

        args
    }

    /// Run the export.
    ///
    /// * `on_line` – called with a `time=HH:MM:SS.ms` line for every progress update.
    /// * `cancel` – checked on every encoder event; if cancelled, ffmpeg is killed
    ///   and `CliptrimError::Cancelled` is returned.
    pub fn run(&self, mut on_line: impl FnMut(&str), cancel: &ExportCancel) -> Result<()> {
        let args = self.ffmpeg_args();
        info!(
            input = %self.input.display(),
            output = %self.output.display(),
            format = %self.format,
            quality = self.quality.get(),
            "Starting trim export"
        );

        let mut child = FfmpegCommand::new()
            .args(&args)
            .spawn()
            .map_err(|e| CliptrimError::Encoder(format!("Failed to spawn ffmpeg: {e}")))?;

        let events = child
            .iter()
            .map_err(|e| CliptrimError::Encoder(format!("Failed to read ffmpeg output: {e}")))?;

        let mut last_error: Option<String> = None;
        for event in events {
            if cancel.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                info!("Export cancelled");
                return Err(CliptrimError::Cancelled);
            }

            match event {
                FfmpegEvent::Progress(progress) => {
                    on_line(&format!("time={}", progress.time));
                }
                FfmpegEvent::Error(message) => {
                    debug!(%message, "ffmpeg error line");
                    last_error = Some(message);
                }
                FfmpegEvent::Done => break,
                _ => {}
            }
        }

        let status = child
            .wait()
            .map_err(|e| CliptrimError::Encoder(format!("Failed to wait for ffmpeg: {e}")))?;

        if cancel.is_cancelled() {
            return Err(CliptrimError::Cancelled);
        }
        if !status.success() {
            let reason = last_error.unwrap_or_else(|| format!("ffmpeg exited with status: {status}"));
            warn!(%reason, "Export failed");
            return Err(CliptrimError::Encoder(reason));
        }

        info!(output = %self.output.display(), "Export finished");
        Ok(())
    }
}

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone)]
pub struct ExportCancel(Arc<AtomicBool>);

impl ExportCancel {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ExportCancel {
    fn default() -> Self {
        Self::new()
    }
}
