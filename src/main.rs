//! Headless runner for the single-lift simulator. Loads a published
//! configuration file, builds the configured controller and engine, and
//! drives the tick loop for a fixed number of ticks.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use liftsim::modules::controller_functions::controller::make_controller;
use liftsim::modules::engine_functions::engine::LiftEngine;
use liftsim::modules::sim_config::SimConfig;

/// Discrete-tick single-lift simulator.
#[derive(Parser)]
#[command(name = "liftsim", version, about)]
struct Cli {
    /// Path to the published JSON configuration
    #[arg(long)]
    config: PathBuf,

    /// Number of ticks to run
    #[arg(long, default_value_t = 25)]
    ticks: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.ticks == 0 {
        bail!("--ticks must be greater than zero");
    }

    let config = SimConfig::from_file(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    let controller = make_controller(config.controller_strategy);
    let mut engine = LiftEngine::builder(config.min_floor, config.max_floor)
        .controller(controller)
        .travel_ticks_per_floor(config.travel_ticks_per_floor)
        .door_transition_ticks(config.door_transition_ticks)
        .door_dwell_ticks(config.door_dwell_ticks)
        .door_reopen_window_ticks(config.door_reopen_window_ticks)
        .home_floor(config.home_floor)
        .idle_timeout_ticks(config.idle_timeout_ticks)
        .idle_parking_mode(config.idle_parking_mode)
        .build()
        .context("engine construction failed")?;

    println!(
        "liftsim: {} strategy, floors {}..{}, {} ticks",
        config.controller_strategy.as_str(),
        config.min_floor,
        config.max_floor,
        cli.ticks
    );

    for _ in 0..cli.ticks {
        engine.tick();
        debug!(state = ?engine.current_state(), "tick complete");
    }

    let state = engine.current_state();
    println!(
        "simulation finished after {} ticks at floor {} ({})",
        engine.current_tick(),
        state.floor,
        state.status
    );
    Ok(())
}
