//! ClipTrim Session - the authoritative playback model
//!
//! One [`PlaybackState`] owned by a [`Store`], mutated only through
//! [`Action`]s and engine property events. A [`PlayerContext`] serializes
//! every producer (UI, engine callbacks, encoder worker) through a mailbox
//! so all mutations happen on a single consumer in arrival order.

pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod keymap;
pub mod state;
pub mod store;
pub mod trim;

pub use config::SessionConfig;
pub use context::{ExportLauncher, ExportRequest, Mailbox, Message, PlayerContext};
pub use error::ActionError;
pub use export::{ExportOrchestrator, RunId};
pub use keymap::action_for_key;
pub use state::{ExportPrefs, ExportState, PlaybackState};
pub use store::{Action, Store};
pub use trim::{EofOutcome, TrimManager};
