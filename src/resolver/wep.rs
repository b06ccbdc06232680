//! Windfall Elimination Provision reduction

use super::tiered::{resolve_linear, Segment};
use crate::tables::WepParameters;

/// Intermediate and final values of one WEP computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WepComputation {
    /// Factor applied to the first bend point (percent)
    pub resolved_factor_pct: f64,
    /// Reduction produced by the factor alone
    pub formula_reduction: f64,
    /// Half of the non-covered pension
    pub pension_cap: f64,
    /// Final monthly reduction after the pension cap
    pub monthly_reduction: f64,
    pub capped_by_pension: bool,
    /// Enough years of substantial earnings that no reduction applies
    pub fully_eliminated: bool,
}

/// Compute the monthly WEP reduction.
///
/// The reduction is `(full - factor)% * first bend point`, and can never be
/// more than half of the non-covered pension. The cap is applied last,
/// whichever branch produced the formula amount.
pub fn wep_reduction(
    years_of_substantial_earnings: u32,
    non_covered_monthly_pension: f64,
    params: &WepParameters<'_>,
) -> WepComputation {
    let resolution = resolve_linear(params.factors, years_of_substantial_earnings as f64);
    let full_factor = params.factors.full_factor();

    let formula_reduction = (full_factor - resolution.factor_pct) / 100.0 * params.first_bend_point;
    let pension_cap = 0.5 * non_covered_monthly_pension;
    let monthly_reduction = formula_reduction.min(pension_cap);

    WepComputation {
        resolved_factor_pct: resolution.factor_pct,
        formula_reduction,
        pension_cap,
        monthly_reduction,
        capped_by_pension: pension_cap < formula_reduction,
        fully_eliminated: resolution.segment == Segment::AtOrAboveLast,
    }
}
