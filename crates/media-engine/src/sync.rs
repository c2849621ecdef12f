// crates/media-engine/src/sync.rs
//! Playback synchronizer
//!
//! Derives the player's view of playback purely from adapter events and
//! sampling. Transport requests never touch this state directly.

use crate::adapter::{AudioEvent, AudioHandle};
use crate::state::{PlaybackError, SyncState};

/// Follow-up the owner of the synchronizer must perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    None,
    /// The episode ended and a next one exists
    Advance,
}

#[derive(Debug, Clone)]
pub struct PlaybackSynchronizer {
    state: SyncState,
    position: f64,
    duration: Option<f64>,
    is_playing: bool,
    polling: bool,
    error: Option<PlaybackError>,
}

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self {
            state: SyncState::Idle,
            position: 0.0,
            duration: None,
            is_playing: false,
            polling: false,
            error: None,
        }
    }

    /// Idle -> Loading, when a handle has just been opened
    pub fn begin_loading(&mut self) {
        if self.state == SyncState::Idle {
            self.state = SyncState::Loading;
        }
    }

    /// Applies one adapter event
    ///
    /// `has_next` tells whether an ended episode should advance.
    pub fn apply(
        &mut self,
        event: &AudioEvent,
        handle: &dyn AudioHandle,
        has_next: bool,
    ) -> SyncAction {
        match event {
            AudioEvent::Loaded => {
                self.duration = valid_duration(handle.duration()).or(self.duration);
                if self.state == SyncState::Loading {
                    self.state = SyncState::Paused;
                }
            }
            AudioEvent::Play => {
                if self.state == SyncState::Ended {
                    return SyncAction::None;
                }
                self.is_playing = true;
                self.state = SyncState::Playing;
                self.error = None;
                self.polling = true;
                self.sample(handle);
            }
            AudioEvent::Pause => {
                self.is_playing = false;
                if self.state == SyncState::Playing {
                    self.state = SyncState::Paused;
                }
                self.sample(handle);
            }
            AudioEvent::Stop => {
                self.is_playing = false;
                self.position = 0.0;
                if matches!(self.state, SyncState::Playing | SyncState::Paused) {
                    self.state = SyncState::Paused;
                }
            }
            AudioEvent::Ended => {
                self.is_playing = false;
                self.polling = false;
                if has_next {
                    self.state = SyncState::Ended;
                    return SyncAction::Advance;
                }
                self.position = 0.0;
                self.state = SyncState::Paused;
            }
            AudioEvent::Seeked => self.sample(handle),
            AudioEvent::LoadError(detail) => {
                log::warn!("Episode failed to load: {}", detail);
                self.fail(PlaybackError::Load(detail.clone()));
            }
            AudioEvent::PlayError(detail) => {
                log::warn!("Episode failed to play: {}", detail);
                self.fail(PlaybackError::Play(detail.clone()));
            }
        }
        SyncAction::None
    }

    /// Samples the handle once per frame while polling
    ///
    /// Returns whether polling continues. The loop stops on the first frame
    /// the handle reports it is no longer playing.
    pub fn on_frame(&mut self, handle: &dyn AudioHandle) -> bool {
        if !self.polling {
            return false;
        }

        self.sample(handle);
        if !handle.is_playing() {
            log::debug!("Handle stopped playing, polling halted");
            self.polling = false;
        }
        self.polling
    }

    /// Seeks within the known duration
    ///
    /// Returns the applied position, or `None` when the duration is unknown
    /// or `seconds` is not a number.
    pub fn seek(&mut self, handle: &mut dyn AudioHandle, seconds: f64) -> Option<f64> {
        let duration = self.known_duration(handle)?;
        if seconds.is_nan() {
            return None;
        }

        let target = seconds.clamp(0.0, duration);
        let applied = handle.seek(target);
        self.position = applied.clamp(0.0, duration);
        Some(self.position)
    }

    /// Seeks to `fraction` of the known duration, clamping the fraction
    pub fn seek_to_fraction(&mut self, handle: &mut dyn AudioHandle, fraction: f64) -> Option<f64> {
        if fraction.is_nan() {
            return None;
        }
        let duration = self.known_duration(handle)?;
        self.seek(handle, fraction.clamp(0.0, 1.0) * duration)
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn error(&self) -> Option<&PlaybackError> {
        self.error.as_ref()
    }

    /// Position over duration, 0 while the duration is unknown
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.position / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    fn known_duration(&mut self, handle: &dyn AudioHandle) -> Option<f64> {
        if let Some(duration) = valid_duration(handle.duration()) {
            self.duration = Some(duration);
        }
        self.duration
    }

    fn sample(&mut self, handle: &dyn AudioHandle) {
        if let Some(duration) = valid_duration(handle.duration()) {
            self.duration = Some(duration);
        }

        let position = handle.position();
        let position = if position.is_finite() { position.max(0.0) } else { 0.0 };
        self.position = match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
    }

    fn fail(&mut self, error: PlaybackError) {
        self.state = SyncState::Error;
        self.is_playing = false;
        self.polling = false;
        self.error = Some(error);
    }
}

impl Default for PlaybackSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}
