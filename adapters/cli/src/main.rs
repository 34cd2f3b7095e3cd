#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a scripted Skirmish fight.

mod scenario;
mod session;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::session::Session;

/// Runs a scripted skirmish and prints what happened.
#[derive(Debug, Parser)]
#[command(name = "skirmish", version, about, long_about = None)]
struct Cli {
    /// Scenario describing the arena, actors, objects and volleys.
    #[arg(long, default_value = "data/skirmish.toml")]
    scenario: PathBuf,
    /// Class manifest with object, bullet, particle and gun classes.
    #[arg(long, default_value = "data/classes.toml")]
    classes: PathBuf,
    /// Overrides the number of ticks declared by the scenario.
    #[arg(long)]
    ticks: Option<u32>,
    /// Seed for the gore random source.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Writes the drained event queue to this file as bincode.
    #[arg(long)]
    record: Option<PathBuf>,
}

/// Entry point for the Skirmish command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let classes = scenario::load_classes(&cli.classes)?;
    let scenario = scenario::load_scenario(&cli.scenario)?;
    let ticks = cli.ticks.unwrap_or(scenario.ticks);
    log::info!(
        "running {} for {ticks} ticks with seed {}",
        cli.scenario.display(),
        cli.seed
    );

    let mut session = Session::new(scenario, classes, cli.seed)?;
    let summary = session.run(ticks);
    print!("{summary}");

    if let Some(path) = &cli.record {
        let bytes = bincode::serialize(session.events()).context("encode event log")?;
        fs::write(path, bytes).with_context(|| format!("write event log {}", path.display()))?;
        log::info!(
            "recorded {} events to {}",
            session.events().len(),
            path.display()
        );
    }

    session.shutdown();
    Ok(())
}
