//! ClipTrim Engine - bridge to the external playback engine
//!
//! The engine decodes and renders media on its own; ClipTrim only talks to it
//! through commands and observed property notifications.
//!
//! Architecture:
//! - `Property` / `PropertyValue`: wire names and loosely-typed values
//! - `EngineHandle`: the contract an engine implementation fulfils
//! - `EngineBridge`: issues commands, applies default options
//! - `EngineEvent`: property notifications normalized into typed events

pub mod bridge;
pub mod error;
pub mod event;
pub mod key;
pub mod property;
pub mod recording;

pub use bridge::{EngineBridge, EngineCommand, EngineHandle, EngineOptions, StepDirection};
pub use error::{BridgeError, EngineError};
pub use event::EngineEvent;
pub use key::{KeyEvent, Modifiers};
pub use property::{Property, PropertyValue};
pub use recording::{CallLog, EngineCall, RecordingEngine};
