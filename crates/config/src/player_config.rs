//! Turntable configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turntable timing and behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// How long the sleeve stays up after a selection, in milliseconds
    pub sleeve_reveal_ms: u64,

    /// How long the disk-swap animation runs, in milliseconds
    pub disk_swap_ms: u64,

    /// Position polling interval while playing
    pub frame_interval_ms: u64,

    /// Load the next episode when one ends
    pub auto_advance: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sleeve_reveal_ms: 2500,
            disk_swap_ms: 1200,
            frame_interval_ms: 16,
            auto_advance: true,
        }
    }
}

impl PlayerConfig {
    pub fn sleeve_reveal(&self) -> Duration {
        Duration::from_millis(self.sleeve_reveal_ms)
    }

    pub fn disk_swap(&self) -> Duration {
        Duration::from_millis(self.disk_swap_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl ConfigSection for PlayerConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::in_range(self.sleeve_reveal_ms, 0, 10_000, "player.sleeve_reveal_ms"),
            Validator::in_range(self.disk_swap_ms, 0, 10_000, "player.disk_swap_ms"),
            Validator::in_range(self.frame_interval_ms, 8, 1000, "player.frame_interval_ms"),
        ];

        // the sleeve covers the whole swap
        if self.disk_swap_ms > self.sleeve_reveal_ms {
            results.push(Err(ValidationError::with_value(
                "player.disk_swap_ms",
                format!("must not exceed sleeve_reveal_ms ({})", self.sleeve_reveal_ms),
                self.disk_swap_ms,
            )));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.sleeve_reveal_ms = other.sleeve_reveal_ms;
        self.disk_swap_ms = other.disk_swap_ms;
        self.frame_interval_ms = other.frame_interval_ms;
        self.auto_advance = other.auto_advance;
    }

    fn section_name(&self) -> &'static str {
        "player"
    }
}
