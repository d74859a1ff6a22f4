//! GOAP demo driver.
//!
//! Loads a scenario, then runs the planner once per tick against the
//! scenario's goals until its opponent is defeated or the tick budget is
//! spent. Set `RUST_LOG=debug` (or pass `--verbose`) to see every ranking.

mod config;
mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{Builtin, ScenarioConfig};
use simulation::Simulation;

/// Run a discontentment-based GOAP agent
#[derive(Parser)]
#[command(name = "goap-demo")]
#[command(about = "Run a goal-oriented action planning agent", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file (.toml or .json)
    #[arg(short, long, conflicts_with = "builtin")]
    scenario: Option<PathBuf>,

    /// Bundled scenario to run when no file is given
    #[arg(short, long, value_enum, default_value = "categorized")]
    builtin: Builtin,

    /// Override the scenario's tick budget
    #[arg(long)]
    max_ticks: Option<u32>,

    /// Override the lookahead depth
    #[arg(short, long)]
    depth: Option<usize>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Log every ranking
    #[arg(short, long)]
    verbose: bool,
}

/// Build the log filter from `RUST_LOG` directives.
///
/// The `info` (or `debug` with `--verbose`) default only applies when the
/// directives are empty.
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, &rust_log))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.scenario {
        Some(path) => ScenarioConfig::from_path(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => ScenarioConfig::builtin(cli.builtin).context("loading bundled scenario")?,
    };

    config.apply_env_overrides();
    if let Some(max_ticks) = cli.max_ticks {
        config.max_ticks = max_ticks;
    }
    if let Some(depth) = cli.depth {
        config.set_depth(depth);
    }

    tracing::info!(scenario = %config.name, planner = ?config.planner, "Starting simulation");

    let mut simulation = Simulation::from_config(config).context("invalid scenario")?;
    let report = simulation.run();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("---------------------------");
    println!("Scenario: {}", report.scenario);
    println!("Ticks: {}", report.ticks);
    if let Some(health) = report.opponent_health {
        println!(
            "Opponent health: {} ({})",
            health,
            if report.opponent_defeated {
                "defeated"
            } else {
                "standing"
            }
        );
    }
    println!("Discontentment: {}", report.final_discontent);
    println!("Final goals: {}", report.final_goals);
    println!(
        "Last plan: {} (cost {})",
        report.last_chain.join(" -> "),
        report.last_cost
    );
    println!("---------------------------");

    Ok(())
}
