// FILE: crates/cli/src/player.rs
//! `play`: drives a turntable from stdin and prints its state

use crate::{content, setup};
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use console::style;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use vinylcast_config::Config;
use vinylcast_media_engine::{
    AudioBackend, DeviceBackend, PlayerCommand, PlayerSnapshot, SimulatedBackend, SyncState,
    Turntable,
};

const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// A line typed at the player prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Player(PlayerCommand),
    Help,
    Quit,
}

/// `p` toggles, `n`/`b` skip, `s 40` seeks to 40 %, a number selects
pub fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?;

    let input = match word {
        "p" | "play" | "pause" => Input::Player(PlayerCommand::TogglePlay),
        "n" | "next" => Input::Player(PlayerCommand::Next),
        "b" | "prev" | "previous" => Input::Player(PlayerCommand::Previous),
        "s" | "seek" => {
            let percent: f64 = parts.next()?.trim_end_matches('%').parse().ok()?;
            Input::Player(PlayerCommand::SeekToFraction(percent / 100.0))
        }
        "h" | "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        other => {
            let number: usize = other.parse().ok()?;
            Input::Player(PlayerCommand::Select(number.checked_sub(1)?))
        }
    };

    Some(input)
}

fn print_help() {
    println!("  p        play / pause");
    println!("  n, b     next / previous episode");
    println!("  s <0-100> seek to a percentage");
    println!("  <N>      put episode N on the turntable");
    println!("  q        quit");
}

/// Decides which snapshots are worth a line of output
#[derive(Debug, Default)]
pub struct StatusPrinter {
    last: Option<(usize, SyncState, bool, bool)>,
}

impl StatusPrinter {
    /// True when the episode, state or transition flags changed
    pub fn is_notable(&mut self, snapshot: &PlayerSnapshot) -> bool {
        let key = (
            snapshot.index,
            snapshot.state,
            snapshot.sleeve_visible,
            snapshot.disk_swapping,
        );
        if self.last == Some(key) {
            return false;
        }
        self.last = Some(key);
        true
    }
}

fn print_status(snapshot: &PlayerSnapshot) {
    let line = snapshot.status_line();
    match snapshot.state {
        SyncState::Error => println!("{}", style(line).red()),
        SyncState::Playing => println!("{}", style(line).green()),
        _ => println!("{}", line),
    }
}

pub async fn play(config: &Config, matches: &ArgMatches) -> Result<()> {
    let catalog = content::episodes(config.app.catalog_path.as_deref())?;

    let number = matches.get_one::<usize>("index").copied().unwrap_or(1);
    let Some(start) = number.checked_sub(1).filter(|&i| catalog.contains_index(i)) else {
        bail!("Episode {} does not exist (1-{})", number, catalog.len());
    };

    let backend: Box<dyn AudioBackend> = if matches.get_flag("simulate") {
        Box::new(SimulatedBackend::from_catalog(&catalog))
    } else {
        Box::new(DeviceBackend::new(config.app.media_root.clone()))
    };
    log::info!("Using {} audio backend", backend.name());

    let turntable = Turntable::with_start(
        catalog.clone(),
        backend,
        setup::turntable_settings(&config.player),
        start,
    )
    .context("Failed to select episode")?;

    let (commands, command_rx) = mpsc::channel(16);
    let (snapshot_tx, mut snapshots) = watch::channel(turntable.snapshot());
    let driver = tokio::spawn(turntable.run(command_rx, snapshot_tx));

    if matches.get_flag("autoplay") {
        commands.send(PlayerCommand::TogglePlay).await?;
    }

    println!("{}", style("VinylCast turntable").bold().cyan());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut printer = StatusPrinter::default();
    let mut ticker = tokio::time::interval(STATUS_INTERVAL);

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match parse_input(&line) {
                    Some(Input::Player(command)) => commands.send(command).await?,
                    Some(Input::Help) => print_help(),
                    Some(Input::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => println!("Unknown command, type h for help"),
                },
                None => stdin_open = false,
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if printer.is_notable(&snapshot) {
                    print_status(&snapshot);
                }
            }
            _ = ticker.tick() => {
                let snapshot = snapshots.borrow().clone();
                if snapshot.is_playing {
                    print_status(&snapshot);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // the driver may already be gone if it stopped on its own
    let _ = commands.send(PlayerCommand::Shutdown).await;
    driver.await.context("Turntable task failed")?;
    Ok(())
}
