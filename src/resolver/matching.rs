//! Employer match for TSP and 401(k) contributions

use super::tiered::{walk_brackets, BracketShare};
use crate::tables::{ContributionLimits, MatchSchedule};
use crate::validator::MatchInput;

/// Employee and employer amounts for one plan year
#[derive(Debug, Clone, PartialEq)]
pub struct MatchComputation {
    pub brackets: Vec<BracketShare>,
    pub automatic_pct: f64,
    pub matched_pct: f64,
    /// Employee deferral after the 402(g) (+ catch-up) limit
    pub employee_amount: f64,
    pub employee_capped: bool,
    pub automatic_amount: f64,
    pub matched_amount: f64,
    pub total_employer_amount: f64,
    /// Employer total was reduced to stay within the annual additions limit
    pub capped_by_limit: bool,
}

/// Sum the automatic contribution and every bracket the employee reaches,
/// then cap the employer total at the room left under the annual additions limit.
pub fn employer_match(
    input: &MatchInput,
    schedule: &MatchSchedule,
    limits: &ContributionLimits,
) -> MatchComputation {
    let brackets = walk_brackets(schedule.tiers(), input.contribution_pct);
    let matched_pct: f64 = brackets.iter().map(|b| b.matched_pct).sum();
    let automatic_pct = schedule.automatic_pct();

    let requested_deferral = input.salary * input.contribution_pct / 100.0;
    let deferral_limit = limits.deferral_limit(input.age);
    let employee_amount = requested_deferral.min(deferral_limit);

    let automatic_uncapped = input.salary * automatic_pct / 100.0;
    let matched_uncapped = input.salary * matched_pct / 100.0;

    // Employer dollars fill the remaining room, automatic first
    let room = (limits.annual_additions_limit - employee_amount).max(0.0);
    let automatic_amount = automatic_uncapped.min(room);
    let matched_amount = matched_uncapped.min(room - automatic_amount);
    let total_employer_amount = automatic_amount + matched_amount;

    MatchComputation {
        brackets,
        automatic_pct,
        matched_pct,
        employee_amount,
        employee_capped: requested_deferral > deferral_limit,
        automatic_amount,
        matched_amount,
        total_employer_amount,
        capped_by_limit: automatic_uncapped + matched_uncapped > room,
    }
}
