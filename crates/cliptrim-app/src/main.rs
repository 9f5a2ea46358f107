//! ClipTrim - trim a video to an in/out window and export it
//!
//! Headless front end: probes the file, drives a playback session without a
//! playback engine, and hands the export to ffmpeg on a worker thread.

mod cli;
mod encode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cliptrim_core::{format_time, parse_timecode};
use cliptrim_media::{
    encoder_available, estimate_size_mb, format_size, is_video_file, suggest_output_filename,
    MediaProbe,
};
use cliptrim_session::{Action, ExportState, PlayerContext, SessionConfig};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::Args;
use crate::encode::FfmpegLauncher;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("ClipTrim starting...");

    let config = SessionConfig::load_or_default(args.config.as_deref());
    run(&args, config)
}

fn run(args: &Args, config: SessionConfig) -> Result<()> {
    let input = &args.input;
    if !is_video_file(input) {
        warn!(path = %input.display(), "Unrecognised video extension, trying anyway");
    }
    if !encoder_available() {
        bail!("ffmpeg was not found on PATH");
    }

    let probe = MediaProbe::probe(input)
        .with_context(|| format!("Failed to probe {}", input.display()))?;
    info!(media = %probe.summary(), "Probed input");
    if probe.duration <= 0.0 {
        bail!("{} reports no duration", input.display());
    }

    let fps = probe.fps.unwrap_or(config.default_fps);
    let mut ctx = PlayerContext::new(config);
    ctx.dispatch(Action::LoadFile(input.clone()))?;
    ctx.dispatch(Action::MediaInfo {
        duration: probe.duration,
        fps,
    })?;

    let fps = ctx.state().fps;
    let start = args
        .in_point
        .as_deref()
        .map(|t| parse_timecode(t, fps))
        .unwrap_or(0.0);
    let end = args
        .out_point
        .as_deref()
        .map(|t| parse_timecode(t, fps))
        .unwrap_or(probe.duration);
    ctx.dispatch(Action::SetTrimRange(start, end))?;

    let state = ctx.state();
    let (in_point, out_point) = (state.in_point, state.out_point);
    let format = args.format.unwrap_or(state.export_prefs.format);
    let quality = args.quality().unwrap_or(state.export_prefs.quality);

    let output = match &args.output {
        Some(path) => path.clone(),
        None => input.with_file_name(suggest_output_filename(input, in_point, out_point, format)),
    };

    let window = out_point - in_point;
    info!(
        input = %input.display(),
        output = %output.display(),
        window = %format!("{} - {}", format_time(in_point), format_time(out_point)),
        %format,
        quality = %quality,
        estimate = %format_size(estimate_size_mb(format, quality, window)),
        "Exporting"
    );

    ctx.set_export_launcher(Box::new(FfmpegLauncher::new(output.clone())));
    ctx.start_export(format, quality)?;

    while !ctx.run_until(|s| !s.export.is_running(), PROGRESS_INTERVAL) {
        info!(progress = %format!("{:.0}%", ctx.state().export.progress()), "Encoding");
    }

    let outcome = ctx.state().export;
    // Let the finished export settle back to idle before tearing down.
    ctx.run_until(|s| s.export == ExportState::Idle, Duration::from_secs(5));
    ctx.shutdown();

    match outcome {
        ExportState::Completed => {
            info!(output = %output.display(), "Done");
            Ok(())
        }
        _ => bail!("Export of {} failed", input.display()),
    }
}
