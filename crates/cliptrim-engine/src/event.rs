//! Property notifications normalized into typed events.

use crate::property::{Property, PropertyValue};

/// A property change pushed by the engine, after domain checks.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback position in seconds.
    TimePos(f64),
    /// Media duration in seconds.
    Duration(f64),
    /// Pause state as reported by the engine.
    Pause(bool),
    /// Playback hit the end of the file.
    EofReached,
    /// Name of the loaded file.
    Filename(String),
    /// Volume on the engine's 0-100 scale.
    Volume(f64),
    Mute(bool),
    /// Playback speed multiplier.
    Speed(f64),
}

impl EngineEvent {
    /// Map a raw notification to an event.
    ///
    /// Values outside a property's domain (NaN, null, wrong type) and
    /// unobserved properties are dropped.
    pub fn from_property(name: &str, value: &PropertyValue) -> Option<Self> {
        let property: Property = name.parse().ok()?;
        Self::from_typed(property, value)
    }

    /// Same as [`EngineEvent::from_property`] for an already-parsed name.
    pub fn from_typed(property: Property, value: &PropertyValue) -> Option<Self> {
        match property {
            Property::TimePos => value.as_finite().map(Self::TimePos),
            Property::Duration => value.as_finite().map(Self::Duration),
            Property::Pause => Some(Self::Pause(value.truthy())),
            Property::EofReached => value.truthy().then_some(Self::EofReached),
            Property::Filename => value.as_text().map(|s| Self::Filename(s.to_string())),
            Property::Volume => value.as_finite().map(Self::Volume),
            Property::Mute => Some(Self::Mute(value.truthy())),
            Property::Speed => value.as_finite().map(Self::Speed),
            Property::Hwdec | Property::OsdLevel | Property::OsdFractions => None,
        }
    }

    /// The property this event came from.
    pub fn property(&self) -> Property {
        match self {
            Self::TimePos(_) => Property::TimePos,
            Self::Duration(_) => Property::Duration,
            Self::Pause(_) => Property::Pause,
            Self::EofReached => Property::EofReached,
            Self::Filename(_) => Property::Filename,
            Self::Volume(_) => Property::Volume,
            Self::Mute(_) => Property::Mute,
            Self::Speed(_) => Property::Speed,
        }
    }
}
