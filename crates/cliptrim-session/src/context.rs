//! Single-consumer message loop around the [`Store`].
//!
//! UI code, the engine callback thread and the encoder worker all hold a
//! cloneable [`Mailbox`]. The [`PlayerContext`] owning the store drains it in
//! arrival order, so every mutation happens on one thread.

use crate::config::SessionConfig;
use crate::error::ActionError;
use crate::export::RunId;
use crate::keymap::action_for_key;
use crate::state::PlaybackState;
use crate::store::{Action, Store};
use cliptrim_engine::{EngineHandle, KeyEvent, PropertyValue};
use cliptrim_media::{ExportCancel, ExportFormat, Quality};
use crossbeam_channel::{after, select, tick, unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Everything that can mutate the session.
#[derive(Debug, Clone)]
pub enum Message {
    Action(Action),
    /// A property notification from the engine.
    Engine { name: String, value: PropertyValue },
    ExportProgress { run: RunId, line: String },
    ExportFinished { run: RunId },
    ExportFailed { run: RunId, reason: String },
    /// Advance timers.
    Tick,
}

/// Sending half of the session queue.
#[derive(Debug, Clone)]
pub struct Mailbox {
    tx: Sender<Message>,
}

impl Mailbox {
    pub fn post(&self, message: Message) -> Result<(), ActionError> {
        self.tx.send(message).map_err(|_| ActionError::MailboxClosed)
    }

    pub fn send(&self, action: Action) -> Result<(), ActionError> {
        self.post(Message::Action(action))
    }

    pub fn engine_property(&self, name: impl Into<String>, value: PropertyValue) -> Result<(), ActionError> {
        self.post(Message::Engine {
            name: name.into(),
            value,
        })
    }

    pub fn export_progress(&self, run: RunId, line: impl Into<String>) -> Result<(), ActionError> {
        self.post(Message::ExportProgress {
            run,
            line: line.into(),
        })
    }

    pub fn export_finished(&self, run: RunId) -> Result<(), ActionError> {
        self.post(Message::ExportFinished { run })
    }

    pub fn export_failed(&self, run: RunId, reason: impl Into<String>) -> Result<(), ActionError> {
        self.post(Message::ExportFailed {
            run,
            reason: reason.into(),
        })
    }
}

/// What an encoder needs to run one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub run: RunId,
    pub input: PathBuf,
    pub in_point: f64,
    pub out_point: f64,
    pub format: ExportFormat,
    pub quality: Quality,
}

/// Starts the actual encoder when an export begins.
///
/// The launcher reports back through the mailbox (`export_progress`,
/// `export_finished`, `export_failed`) tagged with the request's run id, and
/// returns a handle the context trips on cancel.
pub trait ExportLauncher: Send {
    fn launch(&mut self, request: ExportRequest, mailbox: Mailbox) -> ExportCancel;
}

/// Owns the store and the receiving half of the mailbox.
pub struct PlayerContext {
    store: Store,
    rx: Receiver<Message>,
    mailbox: Mailbox,
    launcher: Option<Box<dyn ExportLauncher>>,
    running: Option<(RunId, ExportCancel)>,
}

impl PlayerContext {
    pub fn new(config: SessionConfig) -> Self {
        let (tx, rx) = unbounded();
        Self {
            store: Store::new(config),
            rx,
            mailbox: Mailbox { tx },
            launcher: None,
            running: None,
        }
    }

    pub fn mailbox(&self) -> Mailbox {
        self.mailbox.clone()
    }

    pub fn state(&self) -> &PlaybackState {
        self.store.state()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn set_export_launcher(&mut self, launcher: Box<dyn ExportLauncher>) {
        self.launcher = Some(launcher);
    }

    pub fn attach_engine(&mut self, handle: Box<dyn EngineHandle>) -> Result<bool, ActionError> {
        self.store.attach_engine(handle)
    }

    /// Apply an action immediately, on the owning thread.
    pub fn dispatch(&mut self, action: Action) -> Result<(), ActionError> {
        match action {
            Action::StartExport { format, quality } => self.start_export(format, quality).map(|_| ()),
            Action::CancelExport => self.cancel_export(),
            action @ (Action::LoadFile(_) | Action::UnloadFile) => {
                // The store abandons the run; the encoder must stop with it.
                self.stop_encoder();
                self.store.dispatch(action)
            }
            action => self.store.dispatch(action),
        }
    }

    /// Map a key press through the shortcut table and apply it.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<(), ActionError> {
        let skip = self.store.config().skip_seconds;
        let action = action_for_key(key, self.store.state(), skip);
        self.dispatch(action)
    }

    /// Start an export of the trim window and hand it to the launcher, if any.
    pub fn start_export(&mut self, format: ExportFormat, quality: Quality) -> Result<RunId, ActionError> {
        let run = self.store.start_export(format, quality)?;
        let state = self.store.state();
        let request = ExportRequest {
            run,
            input: state.file_path.clone().unwrap_or_default(),
            in_point: state.in_point,
            out_point: state.out_point,
            format,
            quality,
        };
        if let Some(launcher) = self.launcher.as_mut() {
            let cancel = launcher.launch(request, self.mailbox.clone());
            if let Some((stale, previous)) = self.running.replace((run, cancel)) {
                debug!(run = %stale, "Stopping encoder of an abandoned run");
                previous.cancel();
            }
        }
        Ok(run)
    }

    fn cancel_export(&mut self) -> Result<(), ActionError> {
        self.store.dispatch(Action::CancelExport)?;
        self.stop_encoder();
        Ok(())
    }

    fn stop_encoder(&mut self) {
        if let Some((run, cancel)) = self.running.take() {
            debug!(%run, "Signalling encoder to stop");
            cancel.cancel();
        }
    }

    /// Apply one message.
    pub fn handle(&mut self, message: Message, now: Instant) {
        match message {
            Message::Action(action) => {
                if let Err(e) = self.dispatch(action) {
                    debug!(error = %e, "Action rejected");
                }
            }
            Message::Engine { name, value } => {
                self.store.apply_property(&name, &value);
            }
            Message::ExportProgress { run, line } => {
                self.store.apply_export_line(run, &line, now);
            }
            Message::ExportFinished { run } => {
                self.store.finish_export(run, now);
                self.release(run);
            }
            Message::ExportFailed { run, reason } => {
                self.store.fail_export(run, &reason, now);
                self.release(run);
            }
            Message::Tick => {
                self.store.tick(now);
            }
        }
    }

    fn release(&mut self, run: RunId) {
        if self.running.as_ref().is_some_and(|(active, _)| *active == run) {
            self.running = None;
        }
    }

    /// Drain queued messages, then advance timers. Returns how many messages
    /// were applied.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message, Instant::now());
            count += 1;
        }
        self.store.tick(Instant::now());
        count
    }

    /// Process messages until `done` holds or `timeout` elapses. Returns
    /// whether `done` held.
    pub fn run_until(&mut self, mut done: impl FnMut(&PlaybackState) -> bool, timeout: Duration) -> bool {
        let rx = self.rx.clone();
        let ticker = tick(self.store.config().tick_interval());
        let deadline = after(timeout);
        loop {
            if done(self.store.state()) {
                return true;
            }
            select! {
                recv(rx) -> message => {
                    if let Ok(message) = message {
                        self.handle(message, Instant::now());
                    }
                }
                recv(ticker) -> _ => {
                    self.store.tick(Instant::now());
                }
                recv(deadline) -> _ => {
                    return done(self.store.state());
                }
            }
        }
    }

    /// Cancel any running export, then stop and drop the engine.
    pub fn shutdown(&mut self) {
        if self.store.state().export.is_running() {
            let _ = self.cancel_export();
        }
        self.stop_encoder();
        self.store.detach_engine();
        info!("Session shut down");
    }
}
