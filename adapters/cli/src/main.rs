#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Card Defence skirmish.

mod skirmish;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use card_defence_catalog::Catalog;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::skirmish::SkirmishPlan;

/// Runs a scripted skirmish against three stock towers and logs a summary.
#[derive(Debug, Parser)]
#[command(name = "card-defence", version)]
struct Args {
    /// Catalog TOML file. The built-in tables are used when omitted.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 1200)]
    ticks: u32,
    /// Length of one tick in milliseconds.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
    /// Seed for chance rolls.
    #[arg(long, default_value_t = 0x42f0_e1eb_d4a5_3c21)]
    seed: u64,
    /// Clock speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Ammunition slots per tower.
    #[arg(long, default_value_t = 3)]
    slots: usize,
    /// Comma-separated enemy types, spawned in order.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "rat,snail,hedgehog,fox,turtle,boar,lion"
    )]
    enemies: Vec<String>,
    /// Ticks between consecutive spawns.
    #[arg(long, default_value_t = 40)]
    spawn_every: u32,
}

/// Entry point for the Card Defence command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    ensure!(args.tick_ms > 0, "--tick-ms must be positive");

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))?,
        None => Catalog::default(),
    };
    tracing::info!(
        enemies = catalog.enemy_ids().count(),
        bullets = catalog.bullet_ids().count(),
        "catalog ready"
    );

    let plan = SkirmishPlan {
        ticks: args.ticks,
        tick: Duration::from_millis(args.tick_ms),
        seed: args.seed,
        clock_speed: args.speed,
        slot_count: args.slots,
        enemies: args.enemies,
        spawn_every: args.spawn_every,
    };
    skirmish::run(catalog, &plan).log();
    Ok(())
}
