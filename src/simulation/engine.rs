//! Year-by-year compound growth simulator

use super::state::GrowthState;
use super::trace::{GrowthOutcome, Termination, YearRow};
use log::debug;

/// Hard upper bound on simulated years
pub const HARD_CEILING_YEARS: u32 = 100;

/// Configuration for a simulation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Iteration ceiling; values above `HARD_CEILING_YEARS` are lowered to it
    pub ceiling_years: u32,

    /// Whether to record one row per simulated year
    pub detailed_output: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ceiling_years: HARD_CEILING_YEARS,
            detailed_output: false,
        }
    }
}

impl SimulationConfig {
    pub fn effective_ceiling(&self) -> u32 {
        self.ceiling_years.min(HARD_CEILING_YEARS)
    }
}

/// Growth simulator. Deterministic and free of side effects
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthSimulator {
    config: SimulationConfig,
}

impl GrowthSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Project forward until the balance meets `target` or the ceiling is hit.
    ///
    /// `return_rate` is a fraction (0.07 for 7%). A balance already at or
    /// above the target returns zero years without iterating.
    pub fn years_to_target(
        &self,
        starting_balance: f64,
        annual_contribution: f64,
        return_rate: f64,
        target: f64,
        starting_age: u32,
    ) -> GrowthOutcome {
        let ceiling = self.config.effective_ceiling();
        let mut state = GrowthState::new(starting_balance, starting_age);
        let mut rows = Vec::new();

        if state.balance >= target {
            return self.finish(state, rows, Termination::AlreadyAtTarget);
        }

        while state.balance < target && state.year < ceiling {
            let row = state.advance_year(return_rate, annual_contribution);
            self.record(&mut rows, row);
        }

        let termination = if state.balance >= target {
            Termination::ReachedTarget
        } else {
            debug!(
                "target {:.2} not reached within {} years (balance {:.2})",
                target, ceiling, state.balance
            );
            Termination::Ceiling
        };
        self.finish(state, rows, termination)
    }

    /// Project forward a fixed number of years (lowered to the ceiling)
    pub fn project_years(
        &self,
        starting_balance: f64,
        annual_contribution: f64,
        return_rate: f64,
        years: u32,
        starting_age: u32,
    ) -> GrowthOutcome {
        self.project_years_with(starting_balance, return_rate, years, starting_age, |_| {
            annual_contribution
        })
    }

    /// Fixed-horizon projection where each year's contribution depends on
    /// the age attained at the start of that year
    pub fn project_years_with(
        &self,
        starting_balance: f64,
        return_rate: f64,
        years: u32,
        starting_age: u32,
        contribution_at_age: impl Fn(u32) -> f64,
    ) -> GrowthOutcome {
        let horizon = years.min(self.config.effective_ceiling());
        let mut state = GrowthState::new(starting_balance, starting_age);
        let mut rows = Vec::new();

        for _ in 0..horizon {
            let contribution = contribution_at_age(state.age);
            let row = state.advance_year(return_rate, contribution);
            self.record(&mut rows, row);
        }

        let termination = if horizon < years {
            Termination::Ceiling
        } else {
            Termination::HorizonComplete
        };
        self.finish(state, rows, termination)
    }

    fn record(&self, rows: &mut Vec<YearRow>, row: YearRow) {
        if self.config.detailed_output {
            rows.push(row);
        }
    }

    fn finish(&self, state: GrowthState, rows: Vec<YearRow>, termination: Termination) -> GrowthOutcome {
        GrowthOutcome {
            years: state.year,
            final_balance: state.balance,
            termination,
            total_contributions: state.total_contributions,
            total_growth: state.total_growth,
            rows,
        }
    }
}
