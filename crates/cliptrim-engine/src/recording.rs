//! In-memory engine that records every call it receives.
//!
//! Used by tests and by the headless CLI, where no real playback surface
//! exists but the session still needs a registered engine.

use crate::bridge::EngineHandle;
use crate::error::EngineError;
use crate::key::KeyEvent;
use crate::property::{Property, PropertyValue};
use parking_lot::Mutex;
use std::sync::Arc;

/// One call received by a [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Observe(Property),
    Set(Property, PropertyValue),
    Command(String, Vec<String>),
    Keypress(KeyEvent),
}

#[derive(Default)]
struct LogInner {
    calls: Vec<EngineCall>,
    fail_next: Option<String>,
}

/// Shared view of a recording engine's call log.
#[derive(Clone, Default)]
pub struct CallLog {
    inner: Arc<Mutex<LogInner>>,
}

impl CallLog {
    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().calls.clear();
    }

    /// Make the next call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.inner.lock().fail_next = Some(message.into());
    }

    /// Last property write for `property`, if any.
    pub fn last_set(&self, property: Property) -> Option<PropertyValue> {
        self.inner.lock().calls.iter().rev().find_map(|c| match c {
            EngineCall::Set(p, v) if *p == property => Some(v.clone()),
            _ => None,
        })
    }

    fn record(&self, call: EngineCall) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        if let Some(message) = inner.fail_next.take() {
            return Err(EngineError::new(message));
        }
        inner.calls.push(call);
        Ok(())
    }
}

/// Engine implementation that only records calls.
pub struct RecordingEngine {
    id: u64,
    log: CallLog,
}

impl RecordingEngine {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            log: CallLog::default(),
        }
    }

    /// Handle on the call log that stays valid after the engine is boxed.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl EngineHandle for RecordingEngine {
    fn instance_id(&self) -> u64 {
        self.id
    }

    fn observe(&mut self, property: Property) -> Result<(), EngineError> {
        self.log.record(EngineCall::Observe(property))
    }

    fn set_property(&mut self, property: Property, value: PropertyValue) -> Result<(), EngineError> {
        self.log.record(EngineCall::Set(property, value))
    }

    fn command(&mut self, name: &str, args: &[String]) -> Result<(), EngineError> {
        self.log
            .record(EngineCall::Command(name.to_string(), args.to_vec()))
    }

    fn keypress(&mut self, key: &KeyEvent) -> Result<(), EngineError> {
        self.log.record(EngineCall::Keypress(key.clone()))
    }
}
