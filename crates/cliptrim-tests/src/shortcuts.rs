//! Integration tests for keyboard control and timecode entry.
//!
//! Keys go through the cliptrim-session keymap; unmapped keys must reach
//! the engine through cliptrim-engine's keypress forwarding.

use cliptrim_core::{parse_timecode, Fps};
use cliptrim_engine::{EngineCall, KeyEvent, Modifiers, Property, RecordingEngine};
use cliptrim_session::{Action, PlayerContext, SessionConfig};
use proptest::prelude::*;

fn ready_context(duration: f64) -> (PlayerContext, cliptrim_engine::CallLog) {
    let mut ctx = PlayerContext::new(SessionConfig::default());
    let engine = RecordingEngine::new(9);
    let log = engine.log();
    ctx.attach_engine(Box::new(engine)).unwrap();
    ctx.dispatch(Action::LoadFile("/media/a.mp4".into())).unwrap();
    ctx.dispatch(Action::MediaInfo { duration, fps: 25.0 }).unwrap();
    log.clear();
    (ctx, log)
}

#[test]
fn marking_in_and_out_with_keys() {
    let (mut ctx, _log) = ready_context(60.0);

    ctx.dispatch(Action::Seek(12.0)).unwrap();
    ctx.handle_key(&KeyEvent::plain("i")).unwrap();
    ctx.dispatch(Action::Seek(21.0)).unwrap();
    ctx.handle_key(&KeyEvent::plain("o")).unwrap();

    assert_eq!((ctx.state().in_point, ctx.state().out_point), (12.0, 21.0));
}

#[test]
fn shift_arrows_skip_and_plain_arrows_step() {
    let (mut ctx, log) = ready_context(60.0);
    ctx.dispatch(Action::Seek(30.0)).unwrap();

    ctx.handle_key(&KeyEvent::new(Modifiers::SHIFT, "ArrowRight"))
        .unwrap();
    assert_eq!(ctx.state().current_time, 40.0);
    assert_eq!(log.last_set(Property::TimePos), Some(40.0.into()));

    ctx.handle_key(&KeyEvent::plain("ArrowLeft")).unwrap();
    assert!((ctx.state().current_time - 39.96).abs() < 1e-9);
    assert_eq!(
        log.calls().last(),
        Some(&EngineCall::Command("frame-back-step".into(), vec![]))
    );
}

#[test]
fn space_toggles_and_unknown_keys_reach_engine() {
    let (mut ctx, log) = ready_context(60.0);

    ctx.handle_key(&KeyEvent::plain(" ")).unwrap();
    assert!(ctx.state().is_playing);

    let key = KeyEvent::plain("s");
    ctx.handle_key(&key).unwrap();
    assert_eq!(log.calls().last(), Some(&EngineCall::Keypress(key)));
}

#[test]
fn typed_timecodes_set_trim_points() {
    let (mut ctx, _log) = ready_context(120.0);
    let fps = ctx.state().fps;
    assert_eq!(fps, Fps::FPS_25);

    ctx.dispatch(Action::SetInPoint(parse_timecode("00:00:10:12", fps)))
        .unwrap();
    ctx.dispatch(Action::SetOutPoint(parse_timecode("00:01:05.250", fps)))
        .unwrap();

    assert!((ctx.state().in_point - 10.48).abs() < 1e-9);
    assert!((ctx.state().out_point - 65.25).abs() < 1e-9);
}

proptest! {
    #[test]
    fn any_key_sequence_keeps_state_valid(keys in prop::collection::vec(
        prop::sample::select(vec!["i", "o", "j", "l", "k", "m", "f", "ArrowLeft", "ArrowRight", "x"]),
        1..30,
    ), shifted in any::<bool>()) {
        let (mut ctx, _log) = ready_context(45.0);
        for key in keys {
            let mods = if shifted { Modifiers::SHIFT } else { Modifiers::NONE };
            let _ = ctx.handle_key(&KeyEvent::new(mods, key));
            let s = ctx.state();
            prop_assert!(s.current_time >= 0.0 && s.current_time <= s.duration);
            prop_assert!(s.in_point >= 0.0 && s.in_point < s.out_point && s.out_point <= s.duration);
        }
    }
}
