//! Formula Engine CLI
//!
//! Runs one calculator and prints its result as JSON

use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use formula_engine::validator::{
    RawGpoInput, RawMatchInput, RawProjectionInput, RawTspProjectionInput, RawWepInput,
};
use formula_engine::{Assumptions, EngineError, PlanVariant, ScenarioRunner};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "formula-engine", version, about = "Retirement calculator formulas")]
struct Cli {
    /// Load formula tables from this directory instead of the built-in tables
    #[arg(long, global = true)]
    tables_dir: Option<PathBuf>,

    /// Plan year for limits and bend points (defaults to the current year,
    /// or the latest year the tables publish limits for)
    #[arg(long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Years until savings reach the FIRE number
    Fire {
        #[arg(long)]
        balance: f64,
        #[arg(long)]
        contribution: f64,
        #[arg(long, default_value_t = 7.0, allow_negative_numbers = true)]
        return_pct: f64,
        #[arg(long, default_value_t = 3.0, allow_negative_numbers = true)]
        inflation_pct: f64,
        #[arg(long)]
        age: f64,
        #[arg(long)]
        expense: f64,
        #[arg(long, default_value_t = 4.0)]
        withdrawal_pct: f64,
        /// Stop projecting after this many years (at most 100)
        #[arg(long)]
        ceiling_years: Option<u32>,
        /// Include the year-by-year balance table
        #[arg(long)]
        trace: bool,
    },
    /// Windfall Elimination Provision reduction
    Wep {
        #[arg(long)]
        years: f64,
        #[arg(long)]
        pension: f64,
    },
    /// Government Pension Offset on a spousal or survivor benefit
    Gpo {
        #[arg(long)]
        spousal_benefit: f64,
        #[arg(long)]
        pension: f64,
    },
    /// Employer automatic and matching contributions
    TspMatch {
        #[arg(long)]
        contribution_pct: f64,
        #[arg(long)]
        salary: f64,
        #[arg(long)]
        age: Option<f64>,
        #[arg(long, default_value = "tsp")]
        plan: PlanVariant,
    },
    /// Plan balance at retirement
    TspProject {
        #[arg(long)]
        balance: f64,
        #[arg(long)]
        salary: f64,
        #[arg(long)]
        contribution_pct: f64,
        #[arg(long, default_value_t = 6.0, allow_negative_numbers = true)]
        return_pct: f64,
        #[arg(long)]
        age: f64,
        #[arg(long)]
        retirement_age: f64,
        #[arg(long, default_value = "tsp")]
        plan: PlanVariant,
        #[arg(long)]
        trace: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<Result<(), EngineError>> {
    let runner = match &cli.tables_dir {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading formula tables from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };
    let year = cli
        .year
        .unwrap_or_else(|| runner.tables().default_plan_year(chrono::Local::now().year()));
    info!("plan year {}", year);

    let outcome = match cli.command {
        Command::Fire {
            balance,
            contribution,
            return_pct,
            inflation_pct,
            age,
            expense,
            withdrawal_pct,
            ceiling_years,
            trace,
        } => {
            let runner = runner.with_assumptions(Assumptions {
                ceiling_years,
                detailed_output: trace,
                ..Assumptions::default()
            });
            let raw = RawProjectionInput {
                current_balance: balance,
                annual_contribution: contribution,
                expected_annual_return_pct: return_pct,
                inflation_pct,
                current_age: age,
                target_annual_expense: expense,
                withdrawal_rate_pct: withdrawal_pct,
            };
            runner.fire(&raw).map(|r| print_json(&r))
        }
        Command::Wep { years, pension } => {
            let raw = RawWepInput {
                years_of_substantial_earnings: years,
                non_covered_monthly_pension: pension,
            };
            runner.wep(&raw, year).map(|r| print_json(&r))
        }
        Command::Gpo {
            spousal_benefit,
            pension,
        } => {
            let raw = RawGpoInput {
                spousal_monthly_benefit: spousal_benefit,
                non_covered_monthly_pension: pension,
            };
            runner.gpo(&raw).map(|r| print_json(&r))
        }
        Command::TspMatch {
            contribution_pct,
            salary,
            age,
            plan,
        } => {
            let raw = RawMatchInput {
                contribution_pct,
                salary,
                age,
            };
            runner.tsp_match(&raw, plan, year).map(|r| print_json(&r))
        }
        Command::TspProject {
            balance,
            salary,
            contribution_pct,
            return_pct,
            age,
            retirement_age,
            plan,
            trace,
        } => {
            let runner = runner.with_assumptions(Assumptions {
                detailed_output: trace,
                ..Assumptions::default()
            });
            let raw = RawTspProjectionInput {
                current_balance: balance,
                salary,
                contribution_pct,
                expected_annual_return_pct: return_pct,
                current_age: age,
                retirement_age,
            };
            runner.tsp_projection(&raw, plan, year).map(|r| print_json(&r))
        }
    };

    match outcome {
        Ok(printed) => {
            printed?;
            Ok(Ok(()))
        }
        Err(err) => Ok(Err(err)),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            warn!("{}", err);
            eprintln!("{}", err.user_message());
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
