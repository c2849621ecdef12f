// FILE: crates/cli/src/commands.rs

use crate::{content, setup};
use anyhow::{Context, Result};
use clap::ArgMatches;
use console::style;
use vinylcast_config::{Config, ConfigManager};
use vinylcast_core::{Category, CommunityQuestion, Timestamp, TimelineEvent};

/// List the episodes on the shelf
pub fn list_episodes(config: &Config) -> Result<()> {
    let catalog = content::episodes(config.app.catalog_path.as_deref())?;

    println!("\n{} Episodes", style(catalog.len()).bold().cyan());
    println!("{}", "=".repeat(80));

    for (index, episode) in catalog.iter().enumerate() {
        println!(
            "{:>3}. {} ({} min, {})",
            index + 1,
            style(&episode.title).bold(),
            episode.duration / 60,
            episode.release_date
        );
        if !episode.description.is_empty() {
            println!("     {}", episode.description);
        }
    }

    Ok(())
}

/// Show the historical timeline
pub fn show_timeline(config: &Config, matches: &ArgMatches) -> Result<()> {
    let timeline = content::timeline(config.app.catalog_path.as_deref())?;
    let category = matches
        .get_one::<String>("category")
        .map(|c| c.parse::<Category>())
        .transpose()
        .context("Invalid category")?;

    let events: Vec<&TimelineEvent> = match category {
        Some(category) => timeline.by_category(category).collect(),
        None => timeline.iter().collect(),
    };

    if events.is_empty() {
        println!("No timeline events found.");
        return Ok(());
    }

    for event in events {
        print_event(event);
    }

    Ok(())
}

fn print_event(event: &TimelineEvent) {
    println!(
        "\n{} {} [{}]",
        style(&event.year).bold().yellow(),
        style(&event.title).bold(),
        event.category
    );
    println!("  {}", event.description);
    println!("  {}", style(&event.details).dim());
    for source in &event.sources {
        println!("  - {} <{}>", source.title, source.url);
    }
}

/// Ask the assistant one question
pub async fn ask(config: &Config, matches: &ArgMatches) -> Result<()> {
    let question = matches
        .get_many::<String>("question")
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    let assistant = setup::assistant(&config.assistant)?;

    println!("{} {}", style("?").cyan().bold(), question);
    let answer = assistant.ask_for_display(&question).await;
    println!("\n{}", answer);

    Ok(())
}

/// Community board subcommands
pub async fn qna(config: &Config, matches: &ArgMatches) -> Result<()> {
    let mut board = setup::qna_board(&config.community)?;

    match matches.subcommand() {
        Some(("post", sub_matches)) => {
            let name = sub_matches
                .get_one::<String>("name")
                .ok_or_else(|| anyhow::anyhow!("Name is required"))?;
            let question = sub_matches
                .get_one::<String>("question")
                .ok_or_else(|| anyhow::anyhow!("Question is required"))?;

            match board.submit(name, question).await {
                Ok(stored) => {
                    println!("{} Question posted!", style("✓").green().bold());
                    print_question(&stored, Timestamp::now());
                }
                Err(e) => {
                    log::warn!("Question not posted: {}", e);
                    println!("{} {}", style("✗").red().bold(), e.user_message());
                }
            }
            Ok(())
        }
        Some(("list", sub_matches)) => {
            if sub_matches.get_flag("follow") {
                return follow_feed(&board, config).await;
            }

            match board.refresh().await {
                Ok(feed) => print_feed(feed),
                Err(e) => println!("{} {}", style("✗").red().bold(), e.user_message()),
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn follow_feed(board: &vinylcast_network::QnaBoard, config: &Config) -> Result<()> {
    let (mut feed, task) = board.watch(config.community.refresh_interval());

    loop {
        tokio::select! {
            changed = feed.changed() => {
                if changed.is_err() {
                    break;
                }
                let questions = feed.borrow_and_update().clone();
                print_feed(&questions);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    drop(feed);
    task.await.context("Question feed watcher failed")?;
    Ok(())
}

fn print_feed(questions: &[CommunityQuestion]) {
    if questions.is_empty() {
        println!("No questions yet. Be the first to ask!");
        return;
    }

    let now = Timestamp::now();
    println!("\n{} Questions", style(questions.len()).bold().cyan());
    println!("{}", "=".repeat(80));
    for question in questions {
        print_question(question, now);
    }
}

fn print_question(question: &CommunityQuestion, now: Timestamp) {
    println!(
        "({}) {} {}",
        question.initial(),
        style(&question.name).bold(),
        style(question.timestamp.relative_to(now)).dim()
    );
    println!("    {}", question.question);
}

/// `config init|show|validate`
pub fn config(manager: &ConfigManager, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("init", _)) => {
            let created = manager
                .initialize()
                .context("Failed to write default config")?;
            if created {
                println!(
                    "{} Config written to {}",
                    style("✓").green().bold(),
                    manager.config_path().display()
                );
            } else {
                println!(
                    "Config already exists at {}",
                    manager.config_path().display()
                );
            }
            Ok(())
        }
        Some(("show", _)) => {
            let config = manager
                .load_with_env_overrides()
                .context("Failed to load configuration")?;
            println!("# {}", manager.config_path().display());
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to render configuration")?
            );
            Ok(())
        }
        Some(("validate", _)) => {
            let errors = manager.validate().context("Failed to load configuration")?;
            if errors.is_empty() {
                println!("{} Configuration is valid", style("✓").green().bold());
                Ok(())
            } else {
                for error in &errors {
                    println!("{} {}", style("✗").red().bold(), error);
                }
                anyhow::bail!("{} configuration problem(s) found", errors.len())
            }
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests;
