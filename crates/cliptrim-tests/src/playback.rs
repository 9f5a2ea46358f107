//! Integration tests for playback state sync.
//!
//! Exercises cliptrim-engine property events flowing through the
//! cliptrim-session mailbox from a separate "engine callback" thread.

use cliptrim_core::{seconds_to_timecode, Fps};
use cliptrim_engine::{EngineCall, Property, PropertyValue, RecordingEngine};
use cliptrim_session::{Action, ActionError, PlayerContext, SessionConfig};
use std::thread;

// ── Helpers ────────────────────────────────────────────────────

fn context_with_engine() -> (PlayerContext, cliptrim_engine::CallLog) {
    let mut ctx = PlayerContext::new(SessionConfig::default());
    let engine = RecordingEngine::new(42);
    let log = engine.log();
    ctx.attach_engine(Box::new(engine)).unwrap();
    (ctx, log)
}

/// Engine notifications in the order a player emits them after `loadfile`.
fn emit_file_loaded(ctx: &PlayerContext, name: &str, duration: f64) -> thread::JoinHandle<()> {
    let mailbox = ctx.mailbox();
    let name = name.to_string();
    thread::spawn(move || {
        mailbox
            .engine_property("filename", PropertyValue::from(name))
            .unwrap();
        mailbox.engine_property("duration", duration.into()).unwrap();
        mailbox.engine_property("pause", true.into()).unwrap();
        mailbox.engine_property("volume", 100.0.into()).unwrap();
        mailbox.engine_property("time-pos", 0.0.into()).unwrap();
    })
}

// ── Engine registration ────────────────────────────────────────

#[test]
fn engine_registration_observes_properties_and_loads_pending_file() {
    let mut ctx = PlayerContext::new(SessionConfig::default());
    ctx.dispatch(Action::LoadFile("/media/interview.mp4".into()))
        .unwrap();

    let engine = RecordingEngine::new(1);
    let log = engine.log();
    assert_eq!(ctx.attach_engine(Box::new(engine)), Ok(true));

    let calls = log.calls();
    for property in Property::OBSERVED {
        assert!(calls.contains(&EngineCall::Observe(property)));
    }
    assert_eq!(
        calls.last(),
        Some(&EngineCall::Command(
            "loadfile".into(),
            vec!["/media/interview.mp4".into()]
        ))
    );

    // Same instance again is a no-op.
    assert_eq!(ctx.attach_engine(Box::new(RecordingEngine::new(1))), Ok(false));
}

// ── Property sync ──────────────────────────────────────────────

#[test]
fn engine_events_from_another_thread_populate_state() {
    let (mut ctx, _log) = context_with_engine();
    ctx.dispatch(Action::LoadFile("/media/interview.mp4".into()))
        .unwrap();

    emit_file_loaded(&ctx, "interview.mp4", 95.5).join().unwrap();
    ctx.pump();

    let state = ctx.state();
    assert_eq!(state.file_name.as_deref(), Some("interview.mp4"));
    assert_eq!(state.duration, 95.5);
    assert_eq!((state.in_point, state.out_point), (0.0, 95.5));
    assert!(!state.is_playing);
    assert_eq!(state.volume, 1.0);
}

#[test]
fn optimistic_updates_are_corrected_by_engine() {
    let (mut ctx, log) = context_with_engine();
    ctx.dispatch(Action::LoadFile("/media/a.mp4".into())).unwrap();
    emit_file_loaded(&ctx, "a.mp4", 60.0).join().unwrap();
    ctx.pump();

    ctx.dispatch(Action::Seek(30.0)).unwrap();
    assert_eq!(ctx.state().current_time, 30.0);
    assert_eq!(log.last_set(Property::TimePos), Some(30.0.into()));

    // The engine lands on the nearest keyframe instead.
    ctx.mailbox().engine_property("time-pos", 29.6.into()).unwrap();
    ctx.pump();
    assert_eq!(ctx.state().current_time, 29.6);
}

#[test]
fn malformed_engine_values_are_ignored() {
    let (mut ctx, _log) = context_with_engine();
    ctx.dispatch(Action::LoadFile("/media/a.mp4".into())).unwrap();
    emit_file_loaded(&ctx, "a.mp4", 60.0).join().unwrap();
    ctx.pump();
    let before = ctx.state().clone();

    let mailbox = ctx.mailbox();
    mailbox.engine_property("volume", f64::NAN.into()).unwrap();
    mailbox.engine_property("duration", PropertyValue::None).unwrap();
    mailbox.engine_property("time-pos", "soon".into()).unwrap();
    mailbox.engine_property("filename", "".into()).unwrap();
    mailbox.engine_property("eof-reached", false.into()).unwrap();
    mailbox.engine_property("chapter-list", 3.0.into()).unwrap();
    assert_eq!(ctx.pump(), 6);

    assert_eq!(ctx.state(), &before);
}

#[test]
fn transport_without_engine_is_refused_but_trim_works() {
    let mut ctx = PlayerContext::new(SessionConfig::default());
    ctx.dispatch(Action::LoadFile("/media/a.mp4".into())).unwrap();
    ctx.dispatch(Action::MediaInfo {
        duration: 40.0,
        fps: 24.0,
    })
    .unwrap();

    assert_eq!(ctx.dispatch(Action::Play), Err(ActionError::EngineNotReady));
    assert_eq!(
        ctx.dispatch(Action::SetVolume(0.2)),
        Err(ActionError::EngineNotReady)
    );
    ctx.dispatch(Action::SetInPoint(12.0)).unwrap();
    ctx.dispatch(Action::SetOutPoint(18.5)).unwrap();

    let state = ctx.state();
    assert_eq!((state.in_point, state.out_point), (12.0, 18.5));
    assert_eq!(seconds_to_timecode(state.out_point, Fps::FPS_24), "00:00:18:12");
}

// ── End of file ────────────────────────────────────────────────

#[test]
fn eof_inside_trim_window_loops_playback() {
    let (mut ctx, log) = context_with_engine();
    ctx.dispatch(Action::LoadFile("/media/a.mp4".into())).unwrap();
    emit_file_loaded(&ctx, "a.mp4", 30.0).join().unwrap();
    ctx.pump();

    ctx.dispatch(Action::SetTrimRange(10.0, 20.0)).unwrap();
    ctx.dispatch(Action::Play).unwrap();
    log.clear();

    ctx.mailbox().engine_property("eof-reached", true.into()).unwrap();
    ctx.pump();

    assert_eq!(ctx.state().current_time, 10.0);
    assert!(ctx.state().is_playing);
    assert_eq!(log.last_set(Property::TimePos), Some(10.0.into()));
    assert_eq!(log.last_set(Property::Pause), Some(false.into()));
}

#[test]
fn eof_inside_trim_window_while_paused_only_rewinds() {
    let (mut ctx, log) = context_with_engine();
    ctx.dispatch(Action::LoadFile("/media/a.mp4".into())).unwrap();
    emit_file_loaded(&ctx, "a.mp4", 30.0).join().unwrap();
    ctx.pump();

    ctx.dispatch(Action::SetTrimRange(10.0, 20.0)).unwrap();
    log.clear();

    ctx.mailbox().engine_property("eof-reached", true.into()).unwrap();
    ctx.pump();

    assert_eq!(ctx.state().current_time, 10.0);
    assert!(!ctx.state().is_playing);
    assert_eq!(log.last_set(Property::Pause), None);
    assert_eq!(log.calls(), vec![EngineCall::Set(Property::TimePos, 10.0.into())]);
}

#[test]
fn eof_with_whole_file_selected_pauses() {
    let (mut ctx, log) = context_with_engine();
    ctx.dispatch(Action::LoadFile("/media/a.mp4".into())).unwrap();
    emit_file_loaded(&ctx, "a.mp4", 30.0).join().unwrap();
    ctx.pump();
    ctx.dispatch(Action::Play).unwrap();

    ctx.mailbox().engine_property("eof-reached", true.into()).unwrap();
    ctx.pump();

    assert!(!ctx.state().is_playing);
    assert_eq!(log.last_set(Property::Pause), Some(true.into()));
}

#[test]
fn unload_resets_but_keeps_export_preferences() {
    let (mut ctx, log) = context_with_engine();
    ctx.dispatch(Action::LoadFile("/media/a.mp4".into())).unwrap();
    emit_file_loaded(&ctx, "a.mp4", 30.0).join().unwrap();
    ctx.pump();
    ctx.start_export(
        cliptrim_media::ExportFormat::Mov,
        cliptrim_media::Quality::new(33),
    )
    .unwrap();
    log.clear();

    ctx.dispatch(Action::UnloadFile).unwrap();
    let state = ctx.state();
    assert!(!state.has_file());
    assert_eq!(state.duration, 0.0);
    assert!(!state.export.is_running());
    assert_eq!(state.export_prefs.format, cliptrim_media::ExportFormat::Mov);
    assert_eq!(state.export_prefs.quality.get(), 33);
    assert_eq!(log.calls(), vec![EngineCall::Command("stop".into(), vec![])]);
}
