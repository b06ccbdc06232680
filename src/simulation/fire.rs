//! FIRE-number figures built on the growth simulator

use super::engine::GrowthSimulator;
use super::trace::GrowthOutcome;
use crate::validator::ProjectionInput;

/// Savings target whose withdrawal rate covers the annual expense:
/// `expense * 100 / withdrawal_rate_pct` (25x at 4%).
pub fn fire_number(annual_expense: f64, withdrawal_rate_pct: f64) -> f64 {
    annual_expense * 100.0 / withdrawal_rate_pct
}

/// Grow a target by inflation over whole years, closed form
pub fn inflation_adjusted(target: f64, inflation_pct: f64, years: u32) -> f64 {
    target * (1.0 + inflation_pct / 100.0).powi(years as i32)
}

/// Everything a FIRE projection produces before formatting
#[derive(Debug, Clone, PartialEq)]
pub struct FireFigures {
    pub target: f64,
    pub inflation_adjusted_target: f64,
    pub annual_passive_income: f64,
    pub monthly_passive_income: f64,
    pub outcome: GrowthOutcome,
}

/// Run the simulator against the FIRE number for a validated input.
///
/// Inflation is applied once the number of years is known rather than
/// accumulated inside the loop, so the two rates never compound together.
pub fn evaluate_fire(input: &ProjectionInput, simulator: &GrowthSimulator) -> FireFigures {
    let target = fire_number(input.target_annual_expense, input.withdrawal_rate_pct);
    let outcome = simulator.years_to_target(
        input.current_balance,
        input.annual_contribution,
        input.expected_annual_return_pct / 100.0,
        target,
        input.current_age,
    );

    let inflation_adjusted_target = inflation_adjusted(target, input.inflation_pct, outcome.years);
    let annual_passive_income = outcome.final_balance * input.withdrawal_rate_pct / 100.0;

    FireFigures {
        target,
        inflation_adjusted_target,
        annual_passive_income,
        monthly_passive_income: annual_passive_income / 12.0,
        outcome,
    }
}
