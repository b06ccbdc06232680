//! Run FIRE projections for every scenario in a CSV file
//!
//! Input columns match the JSON field names of a FIRE projection input
//! (currentBalance, annualContribution, ...). One output row is written per
//! input row, in the same order.

use anyhow::Context;
use clap::Parser;
use formula_engine::validator::RawProjectionInput;
use formula_engine::{EngineError, ScenarioRunner};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Batch FIRE projections from CSV")]
struct Args {
    /// CSV of scenarios
    input: PathBuf,

    /// Where to write results
    #[arg(long, default_value = "fire_batch_output.csv")]
    output: PathBuf,

    /// Load formula tables from this directory
    #[arg(long)]
    tables_dir: Option<PathBuf>,
}

/// Flattened result row for CSV output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputRow {
    scenario: usize,
    status: String,
    target_balance: Option<f64>,
    years_to_target: Option<u32>,
    target_age: Option<u32>,
    has_reached_target: Option<bool>,
    annual_passive_income: Option<f64>,
    inflation_adjusted_target: Option<f64>,
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let runner = match &args.tables_dir {
        Some(dir) => ScenarioRunner::from_csv_path(dir)?,
        None => ScenarioRunner::new(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let inputs: Vec<RawProjectionInput> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| format!("reading {}", args.input.display()))?;
    println!("Loaded {} scenarios in {:?}", inputs.len(), start.elapsed());

    let proj_start = Instant::now();
    let results = runner.run_fire_batch(&inputs);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut failures = 0;
    for (scenario, result) in results.into_iter().enumerate() {
        let row = match result {
            Ok(r) => OutputRow {
                scenario: scenario + 1,
                status: r.status.label().to_string(),
                target_balance: Some(r.target_balance),
                years_to_target: Some(r.years_to_target),
                target_age: Some(r.target_age),
                has_reached_target: Some(r.has_reached_target),
                annual_passive_income: Some(r.annual_passive_income),
                inflation_adjusted_target: Some(r.inflation_adjusted_target),
                error: None,
            },
            Err(err) => {
                failures += 1;
                if let EngineError::Config(_) = err {
                    log::warn!("scenario {}: {}", scenario + 1, err);
                }
                let status = if err.is_validation() { "Invalid input" } else { "Unavailable" };
                OutputRow {
                    scenario: scenario + 1,
                    status: status.to_string(),
                    target_balance: None,
                    years_to_target: None,
                    target_age: None,
                    has_reached_target: None,
                    annual_passive_income: None,
                    inflation_adjusted_target: None,
                    error: Some(err.user_message()),
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("{} scenarios failed", failures);
    println!("Output written to {}", args.output.display());
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
