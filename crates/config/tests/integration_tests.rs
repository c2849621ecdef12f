//! Integration tests for the configuration system

use vinylcast_config::{Config, ConfigError, ConfigManager, ConfigSection, PlayerConfig, CONFIG_VERSION};
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    assert!(manager.initialize()?);

    let config = manager.load()?;
    assert_eq!(config.version, CONFIG_VERSION);

    let mut modified = config.clone();
    modified.player.sleeve_reveal_ms = 3000;
    modified.community.database_url = "https://vinylcast-demo.firebaseio.com".to_string();
    manager.save(&modified)?;

    let reloaded = manager.load()?;
    assert_eq!(reloaded, modified);

    manager.reset()?;
    assert_eq!(manager.load()?, Config::default());

    Ok(())
}

#[test]
fn test_saved_file_is_readable_toml() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.initialize()?;

    let text = std::fs::read_to_string(manager.config_path())?;
    assert!(text.contains("[player]"));
    assert!(text.contains("disk_swap_ms = 1200"));
    assert!(text.contains("[assistant]"));
    assert!(text.contains("[community]"));
    assert!(!text.contains("catalog_path"));

    Ok(())
}

#[test]
fn test_invalid_config_never_written() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;

    let mut invalid = Config::default();
    invalid.player.disk_swap_ms = invalid.player.sleeve_reveal_ms + 1;
    assert!(matches!(
        manager.save(&invalid),
        Err(ConfigError::ValidationError(_))
    ));

    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_section_names() {
    let config = Config::default();
    assert_eq!(config.app.section_name(), "app");
    assert_eq!(config.player.section_name(), "player");
    assert_eq!(config.assistant.section_name(), "assistant");
    assert_eq!(config.community.section_name(), "community");
}

#[test]
fn test_player_durations() {
    let player = PlayerConfig {
        frame_interval_ms: 33,
        ..Default::default()
    };
    assert_eq!(player.frame_interval().as_millis(), 33);
}
