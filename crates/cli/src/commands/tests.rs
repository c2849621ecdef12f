use super::*;
use crate::build_cli;
use tempfile::TempDir;

fn sub_matches(args: &[&str]) -> ArgMatches {
    let matches = build_cli().try_get_matches_from(args).unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    sub.clone()
}

fn setup_manager() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, manager)
}

#[test]
fn test_config_init_then_validate() {
    let (_temp, manager) = setup_manager();

    config(&manager, &sub_matches(&["vinylcast", "config", "init"])).unwrap();
    assert!(manager.config_path().exists());

    config(&manager, &sub_matches(&["vinylcast", "config", "validate"])).unwrap();
}

#[test]
fn test_config_validate_reports_problems() {
    let (_temp, manager) = setup_manager();
    std::fs::write(
        manager.config_path(),
        "[player]\nsleeve_reveal_ms = 1000\ndisk_swap_ms = 2000\n",
    )
    .unwrap();

    let result = config(&manager, &sub_matches(&["vinylcast", "config", "validate"]));
    assert!(result.is_err());
}

#[test]
fn test_config_show_with_missing_file() {
    let (_temp, manager) = setup_manager();
    config(&manager, &sub_matches(&["vinylcast", "config", "show"])).unwrap();
    assert!(!manager.config_path().exists());
}

#[test]
fn test_list_episodes_and_timeline() {
    let config = Config::default();
    list_episodes(&config).unwrap();

    show_timeline(&config, &sub_matches(&["vinylcast", "timeline"])).unwrap();
    show_timeline(
        &config,
        &sub_matches(&["vinylcast", "timeline", "--category", "economy"]),
    )
    .unwrap();
}

#[tokio::test]
async fn test_qna_requires_database_url() {
    let config = Config::default();
    let result = qna(&config, &sub_matches(&["vinylcast", "qna", "list"])).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_ask_requires_api_key() {
    let mut config = Config::default();
    config.assistant.api_key_env = "VINYLCAST_TEST_NO_SUCH_KEY".to_string();
    let result = ask(&config, &sub_matches(&["vinylcast", "ask", "WTO", "2007?"])).await;
    assert!(result.is_err());
}
