//! Keyboard events forwarded to the engine.

use serde::{Deserialize, Serialize};

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: bool, // ⌘ on macOS
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        command: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
        command: false,
    };
}

/// A key press (modifier + key name, e.g. "ArrowLeft", " ", "k").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    pub modifiers: Modifiers,
    pub key: String,
}

impl KeyEvent {
    pub fn new(modifiers: Modifiers, key: impl Into<String>) -> Self {
        Self {
            modifiers,
            key: key.into(),
        }
    }

    /// Unmodified key press.
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(Modifiers::NONE, key)
    }

    /// Lower-cased key name for shortcut matching.
    pub fn normalized_key(&self) -> String {
        self.key.to_lowercase()
    }
}
