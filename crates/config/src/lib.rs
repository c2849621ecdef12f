//! VinylCast configuration
//!
//! One TOML file with a section per concern. Each section implements
//! [`ConfigSection`] so it validates and merges itself.
//!
//! - **Graceful degradation**: a file with invalid values still loads, with warnings
//! - **Atomic writes**: config files are never left half-written
//! - **Environment overrides**: `VINYLCAST_<SECTION>_<FIELD>` wins over the file
//!
//! # Example
//!
//! ```rust,no_run
//! use vinylcast_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//!
//! println!("Disk swap: {} ms", config.player.disk_swap_ms);
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

pub mod app_config;
mod assistant_config;
mod community_config;
mod player_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use assistant_config::AssistantConfig;
pub use community_config::CommunityConfig;
pub use player_config::PlayerConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    pub app: AppConfig,
    pub player: PlayerConfig,
    pub assistant: AssistantConfig,
    pub community: CommunityConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section, returning all errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.player.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.assistant.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.community.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merges this config with another, preferring values from `other`
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.player.merge(other.player);
        self.assistant.merge(other.assistant);
        self.community.merge(other.community);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            player: PlayerConfig::default(),
            assistant: AssistantConfig::default(),
            community: CommunityConfig::default(),
        }
    }
}
