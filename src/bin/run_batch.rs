//! Run a batch of scenarios from CSV and write a summary CSV
//!
//! Scenarios are simulated in parallel; the summary keeps the input order.

use anyhow::Result;
use clap::Parser;
use payoff_engine::report::{write_batch_summary, write_to_path};
use payoff_engine::scenario::load_scenarios;
use payoff_engine::{EngineConfig, PayoffEngine};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Run payoff comparisons for every scenario in a CSV file")]
struct Cli {
    /// Scenario CSV with a camelCase header row
    input: PathBuf,

    /// Summary CSV to write
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,

    /// Engine config JSON file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)?,
        None => EngineConfig::default(),
    };

    println!("Loading scenarios from {}...", cli.input.display());
    let scenarios = load_scenarios(&cli.input)?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let engine = PayoffEngine::new(config);
    let run_start = Instant::now();
    let outcomes = engine.run_batch(&scenarios);
    println!("Simulations complete in {:?}", run_start.elapsed());

    let ids: Vec<_> = scenarios.iter().map(|s| s.scenario_id.clone()).collect();
    write_to_path(&cli.output, |file| write_batch_summary(file, &ids, &outcomes))?;
    println!("Summary written to {}", cli.output.display());

    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    println!("\nBatch Summary:");
    println!("  Scenarios: {}", outcomes.len());
    println!("  Succeeded: {}", outcomes.len() - failed);
    println!("  Failed:    {}", failed);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
