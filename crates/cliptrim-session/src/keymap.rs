//! Keyboard shortcuts for the player.

use crate::state::PlaybackState;
use crate::store::Action;
use cliptrim_engine::KeyEvent;

/// Map a key press to an action. Keys without a shortcut, and any chord with
/// ctrl/alt/cmd held, go to the engine unchanged.
pub fn action_for_key(key: &KeyEvent, state: &PlaybackState, skip_seconds: f64) -> Action {
    let mods = key.modifiers;
    if mods.ctrl || mods.alt || mods.command {
        return Action::ForwardKey(key.clone());
    }

    match key.normalized_key().as_str() {
        " " | "space" | "k" => Action::TogglePlayPause,
        "arrowleft" | "left" if mods.shift => Action::SkipBy(-skip_seconds),
        "arrowright" | "right" if mods.shift => Action::SkipBy(skip_seconds),
        "arrowleft" | "left" | "j" => Action::StepBackward,
        "arrowright" | "right" | "l" => Action::StepForward,
        "i" => Action::SetInPoint(state.current_time),
        "o" => Action::SetOutPoint(state.current_time),
        "f" => Action::ToggleFullscreen,
        "m" => Action::ToggleMute,
        _ => Action::ForwardKey(key.clone()),
    }
}
