//! Configuration manager - main API for config operations

use crate::persistence::{join_errors, ConfigPersistence};
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::str::FromStr;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "VINYLCAST";

/// Loads, saves and validates the config file
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the platform config directory
    ///
    /// - Linux: `~/.config/vinylcast/`
    /// - macOS: `~/Library/Application Support/vinylcast/`
    /// - Windows: `%APPDATA%\vinylcast\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::with_directory(config_dir)
    }

    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        let config_path = config_dir.join("config.toml");
        let persistence = ConfigPersistence::new(config_path);

        Ok(Self {
            persistence,
            config_dir,
        })
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "vinylcast")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Loads the file; a missing file yields defaults
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Validates and saves atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, applies `update_fn` and saves the result
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes a default config file if none exists
    ///
    /// Returns Ok(true) if a new file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.save(&Config::default())?;
        log::info!("Generated default config at {}", self.config_path().display());
        Ok(true)
    }

    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Returns every validation problem in the current file
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the file, then applies `VINYLCAST_<SECTION>_<FIELD>` overrides
    ///
    /// Example: `VINYLCAST_PLAYER_DISK_SWAP_MS=800`. Values that fail to
    /// parse are ignored with a warning. The merged result must validate;
    /// this is the config the player runs with.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config);

        if let Err(errors) = config.validate() {
            log::error!("Config is invalid after env overrides: {:?}", errors);
            return Err(ConfigError::ValidationError(join_errors(&errors)));
        }

        Ok(config)
    }
}

fn apply_env_overrides(config: &mut Config) {
    override_from_env::<LogLevel>("APP_LOG_LEVEL", &mut config.app.log_level);
    if let Some(path) = env_value("APP_CATALOG_PATH") {
        config.app.catalog_path = Some(PathBuf::from(path));
    }
    if let Some(path) = env_value("APP_MEDIA_ROOT") {
        config.app.media_root = Some(PathBuf::from(path));
    }

    let player = &mut config.player;
    override_from_env("PLAYER_SLEEVE_REVEAL_MS", &mut player.sleeve_reveal_ms);
    override_from_env("PLAYER_DISK_SWAP_MS", &mut player.disk_swap_ms);
    override_from_env("PLAYER_FRAME_INTERVAL_MS", &mut player.frame_interval_ms);
    override_from_env("PLAYER_AUTO_ADVANCE", &mut player.auto_advance);

    let assistant = &mut config.assistant;
    override_from_env("ASSISTANT_BASE_URL", &mut assistant.base_url);
    override_from_env("ASSISTANT_MODEL", &mut assistant.model);
    override_from_env(
        "ASSISTANT_MIN_REQUEST_INTERVAL_MS",
        &mut assistant.min_request_interval_ms,
    );
    override_from_env(
        "ASSISTANT_REQUEST_TIMEOUT_SECS",
        &mut assistant.request_timeout_secs,
    );

    let community = &mut config.community;
    override_from_env("COMMUNITY_DATABASE_URL", &mut community.database_url);
    override_from_env("COMMUNITY_COLLECTION", &mut community.collection);
    override_from_env("COMMUNITY_FEED_LIMIT", &mut community.feed_limit);
    override_from_env(
        "COMMUNITY_REFRESH_INTERVAL_SECS",
        &mut community.refresh_interval_secs,
    );
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(format!("{}_{}", ENV_PREFIX, key)).ok()
}

fn override_from_env<T: FromStr>(key: &str, field: &mut T) {
    if let Some(raw) = env_value(key) {
        match raw.parse::<T>() {
            Ok(value) => {
                log::debug!("Config override from {}_{}", ENV_PREFIX, key);
                *field = value;
            }
            Err(_) => log::warn!(
                "Ignoring {}_{}={:?}: not a valid value",
                ENV_PREFIX,
                key,
                raw
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // tests in this module share the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn setup_test_manager() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())
            .expect("Failed to create manager");
        (temp_dir, manager)
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let (_temp_dir, manager) = setup_test_manager();
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_load_or_default_with_corrupt_file() {
        let (_temp_dir, manager) = setup_test_manager();
        std::fs::write(manager.config_path(), "[player\n").unwrap();
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_update() {
        let (_temp_dir, manager) = setup_test_manager();
        manager.save(&Config::default()).expect("Should save");

        manager
            .update(|config| config.community.feed_limit = 25)
            .expect("Should update");

        let loaded = manager.load().expect("Should load");
        assert_eq!(loaded.community.feed_limit, 25);
    }

    #[test]
    fn test_initialize_once() {
        let (_temp_dir, manager) = setup_test_manager();

        assert!(manager.initialize().expect("Should initialize"));
        assert!(manager.config_path().exists());
        assert!(!manager.initialize().expect("Should initialize"));
    }

    #[test]
    fn test_reset() {
        let (_temp_dir, manager) = setup_test_manager();

        let mut config = Config::default();
        config.player.auto_advance = false;
        manager.save(&config).expect("Should save");

        manager.reset().expect("Should reset");
        assert_eq!(manager.load().expect("Should load"), Config::default());
    }

    #[test]
    fn test_validate_reports_file_problems() {
        let (_temp_dir, manager) = setup_test_manager();
        std::fs::write(manager.config_path(), "[assistant]\ntop_k = 0\n").unwrap();

        let errors = manager.validate().expect("Should validate");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("assistant.top_k"));
    }

    #[test]
    fn test_env_overrides() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (_temp_dir, manager) = setup_test_manager();

        std::env::set_var("VINYLCAST_PLAYER_DISK_SWAP_MS", "700");
        std::env::set_var("VINYLCAST_COMMUNITY_FEED_LIMIT", "not-a-number");
        std::env::set_var("VINYLCAST_APP_LOG_LEVEL", "debug");

        let config = manager
            .load_with_env_overrides()
            .expect("Should load with overrides");

        std::env::remove_var("VINYLCAST_PLAYER_DISK_SWAP_MS");
        std::env::remove_var("VINYLCAST_COMMUNITY_FEED_LIMIT");
        std::env::remove_var("VINYLCAST_APP_LOG_LEVEL");

        assert_eq!(config.player.disk_swap_ms, 700);
        assert_eq!(config.community.feed_limit, 50);
        assert_eq!(config.app.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_out_of_range_env_override_is_an_error() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (_temp_dir, manager) = setup_test_manager();

        for (key, value, field) in [
            ("VINYLCAST_PLAYER_FRAME_INTERVAL_MS", "0", "player.frame_interval_ms"),
            (
                "VINYLCAST_COMMUNITY_REFRESH_INTERVAL_SECS",
                "0",
                "community.refresh_interval_secs",
            ),
            (
                "VINYLCAST_ASSISTANT_MIN_REQUEST_INTERVAL_MS",
                "0",
                "assistant.min_request_interval_ms",
            ),
        ] {
            std::env::set_var(key, value);
            let result = manager.load_with_env_overrides();
            std::env::remove_var(key);

            match result {
                Err(ConfigError::ValidationError(reason)) => {
                    assert!(reason.contains(field), "{}: {}", key, reason)
                }
                other => panic!("{}={} should be rejected, got {:?}", key, value, other),
            }
        }

        assert!(manager.load_with_env_overrides().is_ok());
    }

    #[test]
    fn test_invalid_file_is_an_error_with_overrides() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (_temp_dir, manager) = setup_test_manager();
        std::fs::write(manager.config_path(), "[player]\nframe_interval_ms = 0\n").unwrap();

        // plain load still degrades gracefully
        assert_eq!(manager.load().unwrap().player.frame_interval_ms, 0);
        assert!(matches!(
            manager.load_with_env_overrides(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_file_path() {
        let (_temp_dir, manager) = setup_test_manager();
        assert!(manager.config_path().ends_with("config.toml"));
    }
}
