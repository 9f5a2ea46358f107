//! Session configuration loaded from `config.json`.

use crate::state::ExportPrefs;
use cliptrim_core::{CliptrimError, Fps, Result};
use cliptrim_engine::EngineOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Tunables for a playback session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frame rate assumed until the media reports its own.
    pub default_fps: f64,
    /// Minimum width of the trim window in seconds.
    pub min_clip_seconds: f64,
    /// How long a completed or failed export stays visible before going idle.
    pub export_settle_ms: u64,
    /// Period of the settle timer in the blocking loop.
    pub tick_interval_ms: u64,
    /// Distance of a shift+arrow skip.
    pub skip_seconds: f64,
    pub min_playback_rate: f64,
    pub max_playback_rate: f64,
    /// Options applied to every engine on registration.
    pub engine: EngineOptions,
    /// Initial export format and quality.
    pub export: ExportPrefs,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_fps: Fps::NTSC.get(),
            min_clip_seconds: 1.0,
            export_settle_ms: 1000,
            tick_interval_ms: 100,
            skip_seconds: 10.0,
            min_playback_rate: 0.25,
            max_playback_rate: 2.0,
            engine: EngineOptions::default(),
            export: ExportPrefs::default(),
        }
    }
}

impl SessionConfig {
    /// Read a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded session config");
        Ok(config)
    }

    /// `<config dir>/cliptrim/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cliptrim").join("config.json"))
    }

    /// Load `path` (or the default location), falling back to defaults when
    /// the file is missing or invalid.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_clip_seconds.is_finite() && self.min_clip_seconds > 0.0) {
            return Err(CliptrimError::Config(format!(
                "min_clip_seconds must be positive, got {}",
                self.min_clip_seconds
            )));
        }
        if !(self.min_playback_rate > 0.0 && self.min_playback_rate <= self.max_playback_rate) {
            return Err(CliptrimError::Config(format!(
                "invalid playback rate range {}..{}",
                self.min_playback_rate, self.max_playback_rate
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(CliptrimError::Config("tick_interval_ms must be non-zero".into()));
        }
        Ok(())
    }

    pub fn fps(&self) -> Fps {
        Fps::sanitized(self.default_fps)
    }

    pub fn export_settle(&self) -> Duration {
        Duration::from_millis(self.export_settle_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
