#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Path Defence headlessly.

mod autopilot;
mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use path_defence_core::{GameConfig, TowerKind};
use path_defence_system_pathfinding::BreadthFirst;
use path_defence_world::create_game_with;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

/// Plays the level with a scripted builder and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "path-defence", version)]
struct Cli {
    /// Seed recorded in the game state.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated milliseconds advanced per step.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    dt_ms: u64,

    /// Tower kind the autopilot builds.
    #[arg(long, value_enum, default_value_t = TowerChoice::Arrow)]
    tower: TowerChoice,

    /// TOML file overriding the default level configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of simulation steps before giving up.
    #[arg(long, default_value_t = 100_000)]
    max_steps: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TowerChoice {
    Arrow,
    Slow,
    Splash,
}

impl From<TowerChoice> for TowerKind {
    fn from(choice: TowerChoice) -> Self {
        match choice {
            TowerChoice::Arrow => TowerKind::Arrow,
            TowerChoice::Slow => TowerKind::Slow,
            TowerChoice::Splash => TowerKind::Splash,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let game_config = match &cli.config {
        Some(path) => config::load(path)?,
        None => GameConfig::default(),
    };
    let state = create_game_with(&game_config, cli.seed, &BreadthFirst::new())
        .context("failed to create game")?;

    let kind = TowerKind::from(cli.tower);
    info!(?kind, dt_ms = cli.dt_ms, max_steps = cli.max_steps, "autopilot starting");
    let summary = Autopilot::new(kind, Duration::from_millis(cli.dt_ms), cli.max_steps).run(&state);

    info!(
        phase = ?summary.phase,
        steps = summary.steps,
        "run finished"
    );
    println!("phase:  {:?}", summary.phase);
    println!("wave:   {}/{}", summary.wave + 1, summary.wave_count);
    println!("lives:  {}", summary.lives);
    println!("gold:   {}", summary.gold);
    println!("score:  {}", summary.score);
    println!("towers: {}", summary.towers);

    Ok(())
}
