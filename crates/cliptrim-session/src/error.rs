//! Rejections returned at the action boundary.

use cliptrim_engine::BridgeError;
use thiserror::Error;

/// Why an action was not applied. State is unchanged in every case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Playback engine not ready")]
    EngineNotReady,

    #[error("No file loaded")]
    NoFileLoaded,

    #[error("Trim window is empty")]
    EmptyTrimWindow,

    #[error("An export is already running")]
    ExportAlreadyRunning,

    #[error("No export is running")]
    NotExporting,

    #[error("Session mailbox closed")]
    MailboxClosed,

    #[error(transparent)]
    Engine(#[from] BridgeError),
}
