//! Error types for the engine bridge.

use crate::property::Property;
use thiserror::Error;

/// Failure reported by an engine implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur when issuing commands through the bridge.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// No engine handle has been registered yet.
    #[error("Playback engine not ready")]
    EngineNotReady,

    /// The property is observe-only.
    #[error("Property {0} cannot be set")]
    Unsettable(Property),

    /// The engine rejected the command.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}
