//! The single mutation path for [`PlaybackState`].
//!
//! Transport actions are capability-gated on the engine: without one they are
//! refused with [`ActionError::EngineNotReady`]. With one, state is updated
//! optimistically and the matching command is sent fire-and-forget; later
//! property events from the engine correct any drift.

use crate::config::SessionConfig;
use crate::error::ActionError;
use crate::export::{ExportOrchestrator, RunId};
use crate::state::PlaybackState;
use crate::trim::{EofOutcome, TrimManager};
use cliptrim_core::{percent_to_seconds, Fps};
use cliptrim_engine::{
    EngineBridge, EngineCommand, EngineEvent, EngineHandle, KeyEvent, Property, PropertyValue,
    StepDirection,
};
use cliptrim_media::{display_file_name, parse_progress, ExportFormat, Quality};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// A user intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadFile(PathBuf),
    UnloadFile,
    /// Metadata from a media probe.
    MediaInfo { duration: f64, fps: f64 },
    Play,
    Pause,
    TogglePlayPause,
    Seek(f64),
    SeekToPercent(f64),
    /// Relative seek in seconds.
    SkipBy(f64),
    StepForward,
    StepBackward,
    SetVolume(f64),
    ToggleMute,
    SetPlaybackRate(f64),
    SetInPoint(f64),
    SetOutPoint(f64),
    SetTrimRange(f64, f64),
    ClearInPoint,
    ClearOutPoint,
    ToggleFullscreen,
    SetShowControls(bool),
    StartExport { format: ExportFormat, quality: Quality },
    CancelExport,
    ForwardKey(KeyEvent),
}

impl Action {
    /// Whether the action needs a registered engine.
    pub fn requires_engine(&self) -> bool {
        matches!(
            self,
            Self::Play
                | Self::Pause
                | Self::TogglePlayPause
                | Self::Seek(_)
                | Self::SeekToPercent(_)
                | Self::SkipBy(_)
                | Self::StepForward
                | Self::StepBackward
                | Self::SetVolume(_)
                | Self::ToggleMute
                | Self::SetPlaybackRate(_)
                | Self::ForwardKey(_)
        )
    }
}

/// Owns the playback state, the engine bridge and the export run.
pub struct Store {
    state: PlaybackState,
    config: SessionConfig,
    bridge: EngineBridge,
    trim: TrimManager,
    export: ExportOrchestrator,
}

impl Store {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            state: PlaybackState::new(config.fps(), config.export),
            bridge: EngineBridge::new(config.engine.clone()),
            trim: TrimManager::new(config.min_clip_seconds),
            export: ExportOrchestrator::new(config.export_settle()),
            config,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_engine_ready(&self) -> bool {
        self.bridge.is_ready()
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.export.active_run()
    }

    /// Register the playback engine. A file selected before the engine
    /// existed is loaded into it now.
    pub fn attach_engine(&mut self, handle: Box<dyn EngineHandle>) -> Result<bool, ActionError> {
        let attached = self.bridge.initialize(handle)?;
        if attached {
            if let Some(path) = self.state.file_path.clone() {
                let _ = self.bridge.issue(EngineCommand::Load(path));
            }
        }
        Ok(attached)
    }

    /// Stop and drop the engine.
    pub fn detach_engine(&mut self) {
        if self.bridge.is_ready() {
            let _ = self.bridge.issue(EngineCommand::Stop);
        }
        self.bridge.detach();
    }

    /// Apply a user action.
    pub fn dispatch(&mut self, action: Action) -> Result<(), ActionError> {
        if action.requires_engine() && !self.bridge.is_ready() {
            debug!(?action, "Dropped action, engine not ready");
            return Err(ActionError::EngineNotReady);
        }
        self.mutate(|store| store.apply(action))
    }

    /// Start exporting the trim window. Stores the format and quality as the
    /// new export preference.
    pub fn start_export(&mut self, format: ExportFormat, quality: Quality) -> Result<RunId, ActionError> {
        self.mutate(|store| store.begin_export(format, quality))
    }

    /// Apply a property notification pushed by the engine.
    pub fn apply_property(&mut self, name: &str, value: &PropertyValue) -> bool {
        match EngineEvent::from_property(name, value) {
            Some(event) => self.apply_engine_event(event),
            None => {
                debug!(name, ?value, "Dropped engine property");
                false
            }
        }
    }

    /// Apply a normalized engine event. Returns whether state changed.
    pub fn apply_engine_event(&mut self, event: EngineEvent) -> bool {
        let revision = self.state.revision;
        self.mutate(|store| store.apply_event(event));
        self.state.revision != revision
    }

    /// Feed one encoder progress line for `run`.
    pub fn apply_export_line(&mut self, run: RunId, line: &str, now: Instant) -> bool {
        let fraction = parse_progress(line, self.state.trim_window_seconds());
        if fraction <= 0.0 {
            return false;
        }
        self.apply_export_progress(run, fraction * 100.0, now)
    }

    pub fn apply_export_progress(&mut self, run: RunId, percent: f64, now: Instant) -> bool {
        self.mutate(|store| {
            store
                .export
                .apply_progress(&mut store.state.export, run, percent, now)
        })
    }

    pub fn finish_export(&mut self, run: RunId, now: Instant) -> bool {
        self.mutate(|store| store.export.finish(&mut store.state.export, run, now))
    }

    pub fn fail_export(&mut self, run: RunId, reason: &str, now: Instant) -> bool {
        self.mutate(|store| store.export.fail(&mut store.state.export, run, reason, now))
    }

    /// Advance time-based transitions.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.mutate(|store| store.export.tick(&mut store.state.export, now))
    }

    /// Run `f`, bumping the revision if it changed anything.
    fn mutate<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let before = self.state.clone();
        let result = f(self);
        if !self.state.same_content(&before) {
            self.state.revision = before.revision + 1;
        }
        result
    }

    fn send(&mut self, command: EngineCommand) {
        // Failures are logged by the bridge; state is not rolled back.
        let _ = self.bridge.issue(command);
    }

    fn set(&mut self, property: Property, value: impl Into<PropertyValue>) {
        self.send(EngineCommand::SetProperty(property, value.into()));
    }

    fn apply(&mut self, action: Action) -> Result<(), ActionError> {
        match action {
            Action::LoadFile(path) => self.load_file(path),
            Action::UnloadFile => self.unload_file(),
            Action::MediaInfo { duration, fps } => {
                if fps.is_finite() && fps > 0.0 {
                    self.state.fps = Fps::new(fps);
                }
                self.trim.set_duration(&mut self.state, duration);
            }
            Action::Play => {
                if !self.state.has_file() {
                    return Err(ActionError::NoFileLoaded);
                }
                self.state.is_playing = true;
                self.set(Property::Pause, false);
            }
            Action::Pause => {
                self.state.is_playing = false;
                self.set(Property::Pause, true);
            }
            Action::TogglePlayPause => {
                let next = if self.state.is_playing {
                    Action::Pause
                } else {
                    Action::Play
                };
                return self.apply(next);
            }
            Action::Seek(time) => self.seek(time),
            Action::SeekToPercent(percent) => {
                if percent.is_finite() {
                    self.seek(percent_to_seconds(percent, self.state.duration));
                }
            }
            Action::SkipBy(delta) => {
                if delta.is_finite() {
                    self.seek(self.state.current_time + delta);
                }
            }
            Action::StepForward => self.step(StepDirection::Forward),
            Action::StepBackward => self.step(StepDirection::Backward),
            Action::SetVolume(volume) => {
                if volume.is_finite() {
                    let volume = volume.clamp(0.0, 1.0);
                    self.state.volume = volume;
                    self.state.muted = volume == 0.0;
                    self.set(Property::Volume, volume * 100.0);
                    self.set(Property::Mute, self.state.muted);
                }
            }
            Action::ToggleMute => {
                self.state.muted = !self.state.muted;
                self.set(Property::Mute, self.state.muted);
            }
            Action::SetPlaybackRate(rate) => {
                if rate.is_finite() {
                    let rate = rate.clamp(self.config.min_playback_rate, self.config.max_playback_rate);
                    self.state.playback_rate = rate;
                    self.set(Property::Speed, rate);
                }
            }
            Action::SetInPoint(time) => self.trim.set_in_point(&mut self.state, time),
            Action::SetOutPoint(time) => self.trim.set_out_point(&mut self.state, time),
            Action::SetTrimRange(start, end) => self.trim.set_range(&mut self.state, start, end),
            Action::ClearInPoint => self.trim.clear_in_point(&mut self.state),
            Action::ClearOutPoint => self.trim.clear_out_point(&mut self.state),
            Action::ToggleFullscreen => self.state.is_fullscreen = !self.state.is_fullscreen,
            Action::SetShowControls(show) => self.state.show_controls = show,
            Action::StartExport { format, quality } => {
                self.begin_export(format, quality)?;
            }
            Action::CancelExport => {
                self.export.cancel(&mut self.state.export)?;
            }
            Action::ForwardKey(key) => self.send(EngineCommand::Keypress(key)),
        }
        Ok(())
    }

    fn load_file(&mut self, path: PathBuf) {
        self.export.reset();
        self.state.reset(self.config.fps());
        self.state.file_name = Some(display_file_name(&path));
        self.state.file_path = Some(path.clone());
        info!(path = %path.display(), "File loaded");
        if self.bridge.is_ready() {
            self.send(EngineCommand::Load(path));
        }
    }

    fn unload_file(&mut self) {
        if self.bridge.is_ready() {
            self.send(EngineCommand::Stop);
        }
        self.export.reset();
        self.state.reset(self.config.fps());
        info!("File unloaded");
    }

    fn seek(&mut self, time: f64) {
        if !time.is_finite() {
            return;
        }
        let time = time.clamp(0.0, self.state.duration);
        self.state.current_time = time;
        self.set(Property::TimePos, time);
    }

    fn step(&mut self, direction: StepDirection) {
        let frame = self.state.fps.frame_duration();
        let target = match direction {
            StepDirection::Forward => self.state.current_time + frame,
            StepDirection::Backward => self.state.current_time - frame,
        };
        // The engine pauses on a frame step.
        self.state.is_playing = false;
        self.state.current_time = target.clamp(0.0, self.state.duration);
        debug!(readout = %self.state.frame_readout(), "Frame step");
        self.send(EngineCommand::FrameStep(direction));
    }

    fn begin_export(&mut self, format: ExportFormat, quality: Quality) -> Result<RunId, ActionError> {
        if !self.state.has_file() {
            return Err(ActionError::NoFileLoaded);
        }
        if self.state.export.is_running() {
            return Err(ActionError::ExportAlreadyRunning);
        }
        if self.state.in_point >= self.state.out_point {
            return Err(ActionError::EmptyTrimWindow);
        }
        let run = self.export.start(&mut self.state.export, format, quality)?;
        self.state.export_prefs.format = format;
        self.state.export_prefs.quality = quality;
        Ok(run)
    }

    fn apply_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TimePos(time) => {
                self.state.current_time = time.clamp(0.0, self.state.duration);
            }
            EngineEvent::Duration(duration) => self.trim.set_duration(&mut self.state, duration),
            EngineEvent::Pause(paused) => self.state.is_playing = !paused,
            EngineEvent::EofReached => self.end_of_file(),
            EngineEvent::Filename(name) => self.state.file_name = Some(name),
            EngineEvent::Volume(volume) => self.state.volume = (volume / 100.0).clamp(0.0, 1.0),
            EngineEvent::Mute(muted) => self.state.muted = muted,
            EngineEvent::Speed(rate) => {
                if rate > 0.0 {
                    self.state.playback_rate = rate;
                }
            }
        }
    }

    fn end_of_file(&mut self) {
        match self.trim.on_eof(&self.state) {
            EofOutcome::Loop { seek_to, resume } => {
                debug!(seek_to, resume, "End of file, looping trim window");
                self.state.current_time = seek_to;
                self.set(Property::TimePos, seek_to);
                if resume {
                    self.state.is_playing = true;
                    self.set(Property::Pause, false);
                }
            }
            EofOutcome::PauseAtEnd => {
                debug!("End of file, pausing");
                self.state.is_playing = false;
                self.set(Property::Pause, true);
            }
        }
    }
}
