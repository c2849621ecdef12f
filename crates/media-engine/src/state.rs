//! Player state exposed to front ends

use std::fmt;
use vinylcast_core::{format_clock, Duration};

/// Lifecycle of the current episode's playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Error,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncState::Idle => "idle",
            SyncState::Loading => "loading",
            SyncState::Playing => "playing",
            SyncState::Paused => "paused",
            SyncState::Ended => "ended",
            SyncState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Non-fatal playback failure carried in player state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    Load(String),
    Play(String),
}

impl PlaybackError {
    pub fn detail(&self) -> &str {
        match self {
            PlaybackError::Load(detail) | PlaybackError::Play(detail) => detail,
        }
    }
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::Load(detail) => write!(f, "could not load episode: {}", detail),
            PlaybackError::Play(detail) => write!(f, "could not start playback: {}", detail),
        }
    }
}

/// Everything a front end needs to draw the turntable
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub index: usize,
    pub episode_id: u32,
    pub title: String,
    pub state: SyncState,
    /// Seconds
    pub position: f64,
    /// Seconds, once the engine has reported it
    pub duration: Option<f64>,
    /// Catalog length, shown until the engine reports the real one
    pub nominal_duration: Duration,
    /// In `[0, 1]`
    pub progress: f64,
    pub is_playing: bool,
    pub sleeve_visible: bool,
    pub disk_swapping: bool,
    pub vinyl_spinning: bool,
    pub has_previous: bool,
    pub has_next: bool,
    pub error: Option<PlaybackError>,
}

impl PlayerSnapshot {
    /// Engine duration when known, otherwise the catalog's
    pub fn display_duration(&self) -> String {
        match self.duration {
            Some(seconds) if seconds > 0.0 => format_clock(seconds),
            _ => self.nominal_duration.as_clock(),
        }
    }

    pub fn progress_percentage(&self) -> f32 {
        (self.progress * 100.0) as f32
    }

    /// One-line status, as printed by the CLI
    pub fn status_line(&self) -> String {
        let indicator = if self.vinyl_spinning {
            "(@)"
        } else if self.disk_swapping {
            "(~)"
        } else {
            "( )"
        };

        let mut line = format!(
            "{} [{}] {} {}/{} {:>5.1}% {}",
            indicator,
            self.index + 1,
            self.title,
            format_clock(self.position),
            self.display_duration(),
            self.progress_percentage(),
            self.state
        );

        if let Some(error) = &self.error {
            line.push_str(&format!(" ({})", error));
        }
        line
    }
}
