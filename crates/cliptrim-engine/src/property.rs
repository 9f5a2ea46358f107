//! Engine property names and values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named engine property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    TimePos,
    Duration,
    Pause,
    EofReached,
    Filename,
    Volume,
    Mute,
    Speed,
    Hwdec,
    OsdLevel,
    OsdFractions,
}

impl Property {
    /// Properties the engine must push notifications for.
    pub const OBSERVED: [Property; 8] = [
        Property::TimePos,
        Property::Duration,
        Property::Pause,
        Property::EofReached,
        Property::Filename,
        Property::Volume,
        Property::Mute,
        Property::Speed,
    ];

    /// Wire name used by the engine.
    pub fn name(self) -> &'static str {
        match self {
            Self::TimePos => "time-pos",
            Self::Duration => "duration",
            Self::Pause => "pause",
            Self::EofReached => "eof-reached",
            Self::Filename => "filename",
            Self::Volume => "volume",
            Self::Mute => "mute",
            Self::Speed => "speed",
            Self::Hwdec => "hwdec",
            Self::OsdLevel => "osd-level",
            Self::OsdFractions => "osd-fractions",
        }
    }

    /// Whether ClipTrim may write this property.
    pub fn is_settable(self) -> bool {
        !matches!(self, Self::Duration | Self::EofReached | Self::Filename)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "time-pos" => Self::TimePos,
            "duration" => Self::Duration,
            "pause" => Self::Pause,
            "eof-reached" => Self::EofReached,
            "filename" => Self::Filename,
            "volume" => Self::Volume,
            "mute" => Self::Mute,
            "speed" => Self::Speed,
            "hwdec" => Self::Hwdec,
            "osd-level" => Self::OsdLevel,
            "osd-fractions" => Self::OsdFractions,
            _ => return Err(()),
        })
    }
}

/// A loosely-typed property value as delivered by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    None,
    Flag(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    /// Finite numeric payload, if any.
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Non-empty text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Loose boolean reading: zero, NaN, empty text and `None` are false.
    pub fn truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Flag(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}
