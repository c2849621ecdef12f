// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use vinylcast_config::{Config, ConfigManager};

mod commands;
mod content;
mod player;
mod quiz;
mod setup;

fn build_cli() -> Command {
    Command::new("vinylcast")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turntable podcast player on Vietnam's 2006-2015 economic history")
        .arg(
            Arg::new("config_dir")
                .short('c')
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .global(true),
        )
        .subcommand(Command::new("episodes").about("List the episodes on the shelf"))
        .subcommand(
            Command::new("play")
                .about("Put a record on the turntable")
                .arg(
                    Arg::new("index")
                        .short('i')
                        .long("index")
                        .value_name("N")
                        .help("Episode number to start with (1-based)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("simulate")
                        .long("simulate")
                        .help("Run on a virtual clock instead of the audio device")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("autoplay")
                        .long("autoplay")
                        .help("Start playing as soon as the record is loaded")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("timeline")
                .about("Show the historical timeline")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("CATEGORY")
                        .help("Only show events of one category")
                        .value_parser(["economy", "social", "policy", "integration"]),
                ),
        )
        .subcommand(Command::new("quiz").about("Take the multiple-choice quiz"))
        .subcommand(
            Command::new("ask")
                .about("Ask the AI assistant a question")
                .arg(
                    Arg::new("question")
                        .required(true)
                        .num_args(1..)
                        .value_name("QUESTION")
                        .help("Question about Vietnam 2006-2015"),
                ),
        )
        .subcommand(
            Command::new("qna")
                .about("Community questions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("post")
                        .about("Post a question to the community board")
                        .arg(
                            Arg::new("name")
                                .short('n')
                                .long("name")
                                .required(true)
                                .value_name("NAME"),
                        )
                        .arg(
                            Arg::new("question")
                                .short('q')
                                .long("question")
                                .required(true)
                                .value_name("QUESTION"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("Show the latest community questions")
                        .arg(
                            Arg::new("follow")
                                .short('f')
                                .long("follow")
                                .help("Keep refreshing until interrupted")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand_required(true)
                .subcommand(Command::new("init").about("Write a default config file"))
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("validate").about("Check the config file")),
        )
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    let manager = match matches.get_one::<String>("config_dir") {
        Some(dir) => ConfigManager::with_directory(PathBuf::from(dir)),
        None => ConfigManager::new(),
    };
    manager.context("Failed to locate the configuration directory")
}

fn init_logging(config: &Config) {
    let default_filter = config.app.log_level.to_string();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let manager = config_manager(&matches)?;

    if let Some(("config", sub_matches)) = matches.subcommand() {
        init_logging(&manager.load_or_default());
        return commands::config(&manager, sub_matches);
    }

    let config = manager
        .load_with_env_overrides()
        .context("Failed to load configuration")?;
    init_logging(&config);

    match matches.subcommand() {
        Some(("episodes", _)) => commands::list_episodes(&config),
        Some(("play", sub_matches)) => player::play(&config, sub_matches).await,
        Some(("timeline", sub_matches)) => commands::show_timeline(&config, sub_matches),
        Some(("quiz", _)) => quiz::take_quiz(&config),
        Some(("ask", sub_matches)) => commands::ask(&config, sub_matches).await,
        Some(("qna", sub_matches)) => commands::qna(&config, sub_matches).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
