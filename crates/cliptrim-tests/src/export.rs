//! Integration tests for the export pipeline.
//!
//! Drives cliptrim-session's export state machine with a launcher that
//! behaves like the ffmpeg worker: it runs on its own thread and reports
//! cliptrim-media progress lines through the mailbox.

use cliptrim_media::{
    estimate_size_mb, suggest_output_filename, ExportCancel, ExportFormat, Quality, TrimJob,
};
use cliptrim_session::{
    Action, ExportLauncher, ExportRequest, ExportState, Mailbox, PlayerContext, SessionConfig,
};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

// ── Helpers ────────────────────────────────────────────────────

/// Emits `time=` lines for each second of the window, then finishes (or fails).
/// Waits for a go signal between lines so tests control the pacing.
struct ScriptedEncoder {
    step: mpsc::Receiver<()>,
    fail_with: Option<String>,
}

impl ExportLauncher for ScriptedEncoder {
    fn launch(&mut self, request: ExportRequest, mailbox: Mailbox) -> ExportCancel {
        let cancel = ExportCancel::new();
        let worker_cancel = cancel.clone();
        let (tx, rx) = mpsc::channel();
        // Move the pacing channel into the worker; later launches get a dead one.
        let step = std::mem::replace(&mut self.step, rx);
        drop(tx);
        let fail_with = self.fail_with.clone();

        thread::spawn(move || {
            let seconds = (request.out_point - request.in_point).ceil() as u64;
            // A failing encoder gives up halfway through.
            let lines = if fail_with.is_some() { seconds / 2 } else { seconds };
            for s in 1..=lines {
                if step.recv().is_err() || worker_cancel.is_cancelled() {
                    return;
                }
                let line = format!("frame={} time=00:00:{:02}.00 speed=1x", s * 25, s);
                let _ = mailbox.export_progress(request.run, line);
            }
            if worker_cancel.is_cancelled() {
                return;
            }
            match fail_with {
                Some(reason) => {
                    let _ = mailbox.export_failed(request.run, reason);
                }
                None => {
                    let _ = mailbox.export_finished(request.run);
                }
            }
        });
        cancel
    }
}

fn fast_config() -> SessionConfig {
    SessionConfig {
        export_settle_ms: 30,
        tick_interval_ms: 5,
        ..SessionConfig::default()
    }
}

fn context(fail_with: Option<&str>) -> (PlayerContext, mpsc::Sender<()>) {
    let mut ctx = PlayerContext::new(fast_config());
    let (go, step) = mpsc::channel();
    ctx.set_export_launcher(Box::new(ScriptedEncoder {
        step,
        fail_with: fail_with.map(str::to_string),
    }));
    ctx.dispatch(Action::LoadFile("/media/talk.mp4".into())).unwrap();
    ctx.dispatch(Action::MediaInfo {
        duration: 60.0,
        fps: 30.0,
    })
    .unwrap();
    ctx.dispatch(Action::SetTrimRange(20.0, 30.0)).unwrap();
    (ctx, go)
}

fn wait_for_progress(ctx: &mut PlayerContext, percent: f64) {
    assert!(
        ctx.run_until(
            |s| s.export.progress() >= percent,
            Duration::from_secs(5)
        ),
        "progress never reached {percent}"
    );
}

// ── Lifecycle ──────────────────────────────────────────────────

#[test]
fn export_runs_to_completion_and_settles() {
    let (mut ctx, go) = context(None);
    ctx.start_export(ExportFormat::Mp4, Quality::new(70)).unwrap();

    for expected in [10.0, 20.0, 30.0] {
        go.send(()).unwrap();
        wait_for_progress(&mut ctx, expected);
        assert!(ctx.state().export.is_running());
    }
    for _ in 3..10 {
        go.send(()).unwrap();
    }

    assert!(ctx.run_until(
        |s| s.export == ExportState::Completed,
        Duration::from_secs(5)
    ));
    assert!(ctx.run_until(
        |s| s.export == ExportState::Idle,
        Duration::from_secs(5)
    ));
}

#[test]
fn second_start_while_running_is_rejected() {
    let (mut ctx, go) = context(None);
    let run = ctx.start_export(ExportFormat::Mp4, Quality::new(70)).unwrap();
    go.send(()).unwrap();
    wait_for_progress(&mut ctx, 10.0);

    ctx.mailbox()
        .send(Action::StartExport {
            format: ExportFormat::Webm,
            quality: Quality::new(5),
        })
        .unwrap();
    ctx.pump();

    assert_eq!(ctx.store().active_run(), Some(run));
    assert_eq!(
        ctx.state().export,
        ExportState::Running {
            progress: 10.0,
            format: ExportFormat::Mp4,
            quality: Quality::new(70),
        }
    );
}

#[test]
fn cancel_mid_export_drops_late_progress() {
    let (mut ctx, go) = context(None);
    ctx.start_export(ExportFormat::Mp4, Quality::default()).unwrap();
    for _ in 0..4 {
        go.send(()).unwrap();
    }
    wait_for_progress(&mut ctx, 40.0);

    ctx.dispatch(Action::CancelExport).unwrap();
    assert_eq!(ctx.state().export, ExportState::Idle);

    // Anything the worker still emits belongs to a dead run.
    for _ in 0..6 {
        let _ = go.send(());
    }
    assert!(!ctx.run_until(
        |s| s.export.progress() > 0.0,
        Duration::from_millis(200)
    ));
    assert_eq!(ctx.state().export, ExportState::Idle);
}

#[test]
fn encoder_failure_shows_cancelled_then_idle() {
    let (mut ctx, go) = context(Some("No space left on device"));
    ctx.start_export(ExportFormat::Mkv, Quality::default()).unwrap();
    for _ in 0..10 {
        let _ = go.send(());
    }

    assert!(ctx.run_until(
        |s| s.export == ExportState::Cancelled,
        Duration::from_secs(5)
    ));
    assert!(ctx.run_until(
        |s| s.export == ExportState::Idle,
        Duration::from_secs(5)
    ));
}

// ── Encoder job from session state ─────────────────────────────

#[test]
fn trim_job_matches_session_window() {
    let (ctx, _go) = context(None);
    let state = ctx.state();
    let output = suggest_output_filename(
        Path::new("/media/talk.mp4"),
        state.in_point,
        state.out_point,
        ExportFormat::Webm,
    );
    assert_eq!(output, "talk_00-00-20_to_00-00-30.webm");

    let job = TrimJob::new(
        "/media/talk.mp4",
        Path::new("/media").join(&output),
        state.in_point,
        state.out_point,
        ExportFormat::Webm,
        state.export_prefs.quality,
    )
    .unwrap();
    let args = job.ffmpeg_args();
    assert!(args.windows(2).any(|w| w == ["-ss", "00:00:20.000"]));
    assert!(args.windows(2).any(|w| w == ["-t", "10.000"]));

    let mb = estimate_size_mb(ExportFormat::Webm, state.export_prefs.quality, job.duration());
    assert!(mb > 0.0);
}
