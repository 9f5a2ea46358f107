//! Command side of the engine bridge.

use crate::error::{BridgeError, EngineError};
use crate::key::KeyEvent;
use crate::property::{Property, PropertyValue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Contract of an external playback engine.
///
/// Implementations push property notifications back on their own; the
/// bridge only drives the engine.
pub trait EngineHandle: Send {
    /// Identity of the underlying engine instance. Re-registering the same
    /// instance is a no-op.
    fn instance_id(&self) -> u64;

    /// Ask the engine to push notifications for a property.
    fn observe(&mut self, property: Property) -> Result<(), EngineError>;

    fn set_property(&mut self, property: Property, value: PropertyValue) -> Result<(), EngineError>;

    /// Run a raw engine command such as `loadfile` or `frame-step`.
    fn command(&mut self, name: &str, args: &[String]) -> Result<(), EngineError>;

    /// Forward a key press to the engine's own input handling.
    fn keypress(&mut self, key: &KeyEvent) -> Result<(), EngineError>;
}

/// Options applied to every engine on registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Hardware decoding mode.
    pub hwdec: String,
    /// On-screen display verbosity (0 = off).
    pub osd_level: i64,
    /// Show fractional seconds in the OSD.
    pub osd_fractions: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hwdec: "auto".to_string(),
            osd_level: 0,
            osd_fractions: true,
        }
    }
}

/// Direction of a single-frame step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// A command issued through the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Load(PathBuf),
    Stop,
    SetProperty(Property, PropertyValue),
    FrameStep(StepDirection),
    Keypress(KeyEvent),
}

/// Owns the registered engine handle and routes commands to it.
pub struct EngineBridge {
    engine: Option<Box<dyn EngineHandle>>,
    options: EngineOptions,
}

impl EngineBridge {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            engine: None,
            options,
        }
    }

    /// Register an engine. Observes every notified property and applies
    /// the default options.
    ///
    /// Returns `Ok(false)` when the same instance is already registered.
    pub fn initialize(&mut self, mut handle: Box<dyn EngineHandle>) -> Result<bool, BridgeError> {
        let id = handle.instance_id();
        if self.engine.as_ref().map(|e| e.instance_id()) == Some(id) {
            debug!(instance = id, "Engine already registered");
            return Ok(false);
        }

        for property in Property::OBSERVED {
            handle.observe(property)?;
        }
        handle.set_property(Property::Hwdec, self.options.hwdec.as_str().into())?;
        handle.set_property(Property::OsdLevel, self.options.osd_level.into())?;
        handle.set_property(Property::OsdFractions, self.options.osd_fractions.into())?;

        info!(
            instance = id,
            hwdec = %self.options.hwdec,
            "Engine registered"
        );
        self.engine = Some(handle);
        Ok(true)
    }

    /// Drop the registered engine, if any.
    pub fn detach(&mut self) {
        if self.engine.take().is_some() {
            info!("Engine detached");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Issue a command to the engine.
    pub fn issue(&mut self, command: EngineCommand) -> Result<(), BridgeError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(BridgeError::EngineNotReady);
        };

        let result = match &command {
            EngineCommand::Load(path) => {
                engine.command("loadfile", &[path.to_string_lossy().into_owned()])
            }
            EngineCommand::Stop => engine.command("stop", &[]),
            EngineCommand::SetProperty(property, value) => {
                if !property.is_settable() {
                    return Err(BridgeError::Unsettable(*property));
                }
                engine.set_property(*property, value.clone())
            }
            EngineCommand::FrameStep(StepDirection::Forward) => engine.command("frame-step", &[]),
            EngineCommand::FrameStep(StepDirection::Backward) => {
                engine.command("frame-back-step", &[])
            }
            EngineCommand::Keypress(key) => engine.keypress(key),
        };

        if let Err(e) = &result {
            warn!(command = ?command, error = %e, "Engine rejected command");
        }
        result.map_err(BridgeError::from)
    }

    /// Shorthand for [`EngineCommand::SetProperty`].
    pub fn set(&mut self, property: Property, value: impl Into<PropertyValue>) -> Result<(), BridgeError> {
        self.issue(EngineCommand::SetProperty(property, value.into()))
    }
}

impl Default for EngineBridge {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{EngineCall, RecordingEngine};

    #[test]
    fn test_not_ready_without_engine() {
        let mut bridge = EngineBridge::default();
        assert!(!bridge.is_ready());
        assert_eq!(bridge.issue(EngineCommand::Stop), Err(BridgeError::EngineNotReady));
        assert_eq!(bridge.set(Property::Pause, true), Err(BridgeError::EngineNotReady));
    }

    #[test]
    fn test_initialize_observes_and_applies_options() {
        let engine = RecordingEngine::new(1);
        let log = engine.log();
        let mut bridge = EngineBridge::default();

        assert_eq!(bridge.initialize(Box::new(engine)), Ok(true));
        assert!(bridge.is_ready());

        let calls = log.calls();
        let observed: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Observe(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(observed, Property::OBSERVED.to_vec());
        assert!(calls.contains(&EngineCall::Set(Property::Hwdec, "auto".into())));
        assert!(calls.contains(&EngineCall::Set(Property::OsdLevel, 0i64.into())));
        assert!(calls.contains(&EngineCall::Set(Property::OsdFractions, true.into())));
    }

    #[test]
    fn test_initialize_is_idempotent_per_instance() {
        let first = RecordingEngine::new(7);
        let log = first.log();
        let mut bridge = EngineBridge::default();
        bridge.initialize(Box::new(first)).unwrap();
        let count = log.calls().len();

        assert_eq!(bridge.initialize(Box::new(RecordingEngine::new(7))), Ok(false));
        assert_eq!(log.calls().len(), count);

        assert_eq!(bridge.initialize(Box::new(RecordingEngine::new(8))), Ok(true));
    }

    #[test]
    fn test_commands_map_to_engine_calls() {
        let engine = RecordingEngine::new(1);
        let log = engine.log();
        let mut bridge = EngineBridge::default();
        bridge.initialize(Box::new(engine)).unwrap();
        log.clear();

        bridge.issue(EngineCommand::Load(PathBuf::from("/media/a.mp4"))).unwrap();
        bridge.issue(EngineCommand::FrameStep(StepDirection::Forward)).unwrap();
        bridge.issue(EngineCommand::FrameStep(StepDirection::Backward)).unwrap();
        bridge.issue(EngineCommand::Stop).unwrap();

        assert_eq!(
            log.calls(),
            vec![
                EngineCall::Command("loadfile".into(), vec!["/media/a.mp4".into()]),
                EngineCall::Command("frame-step".into(), vec![]),
                EngineCall::Command("frame-back-step".into(), vec![]),
                EngineCall::Command("stop".into(), vec![]),
            ]
        );
    }

    #[test]
    fn test_observe_only_properties_rejected() {
        let mut bridge = EngineBridge::default();
        bridge.initialize(Box::new(RecordingEngine::new(1))).unwrap();
        assert_eq!(
            bridge.set(Property::Duration, 3.0),
            Err(BridgeError::Unsettable(Property::Duration))
        );
    }

    #[test]
    fn test_engine_failure_propagates() {
        let engine = RecordingEngine::new(1);
        let log = engine.log();
        let mut bridge = EngineBridge::default();
        bridge.initialize(Box::new(engine)).unwrap();

        log.fail_next("file not found");
        assert_eq!(
            bridge.issue(EngineCommand::Load(PathBuf::from("missing.mp4"))),
            Err(BridgeError::Engine(EngineError::new("file not found")))
        );
        assert!(bridge.issue(EngineCommand::Stop).is_ok());
    }

    #[test]
    fn test_detach() {
        let mut bridge = EngineBridge::default();
        bridge.initialize(Box::new(RecordingEngine::new(1))).unwrap();
        bridge.detach();
        assert!(!bridge.is_ready());
    }
}
