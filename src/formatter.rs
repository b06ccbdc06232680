//! Result DTOs handed to the presentation layer
//!
//! Pure assembly from computation structs. Values are not rounded here;
//! currency formatting belongs to the caller.

use crate::resolver::{BracketShare, GpoComputation, MatchComputation, WepComputation};
use crate::simulation::{FireFigures, GrowthOutcome, Termination, YearRow};
use crate::validator::{ClampedField, ProjectionInput, TspProjectionInput};
use serde::Serialize;

/// Where a projection landed relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionStatus {
    AlreadyThere,
    Reached,
    BeyondHorizon,
}

impl ProjectionStatus {
    fn from_termination(termination: Termination) -> Self {
        match termination {
            Termination::AlreadyAtTarget => ProjectionStatus::AlreadyThere,
            Termination::ReachedTarget | Termination::HorizonComplete => ProjectionStatus::Reached,
            Termination::Ceiling => ProjectionStatus::BeyondHorizon,
        }
    }

    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            ProjectionStatus::AlreadyThere => "Target already reached",
            ProjectionStatus::Reached => "Target reached",
            ProjectionStatus::BeyondHorizon => "Beyond projectable horizon",
        }
    }
}

/// FIRE projection result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub target_balance: f64,
    pub years_to_target: u32,
    pub target_age: u32,
    pub has_reached_target: bool,
    pub monthly_passive_income: f64,
    pub annual_passive_income: f64,
    pub inflation_adjusted_target: f64,
    pub projected_balance: f64,
    pub status: ProjectionStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<ClampedField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub yearly: Vec<YearRow>,
}

/// WEP reduction result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WepReductionResult {
    pub monthly_reduction: f64,
    pub fully_eliminated: bool,
    pub resolved_factor_pct: f64,
    pub formula_reduction: f64,
    pub capped_by_pension: bool,
    pub plan_year: i32,
}

/// GPO offset result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpoOffsetResult {
    pub monthly_offset: f64,
    pub reduced_monthly_benefit: f64,
    pub fully_offset: bool,
}

/// One match bracket as shown in a breakdown table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBracket {
    pub tier: usize,
    pub covered_pct: f64,
    pub match_ratio: f64,
    pub matched_pct: f64,
}

impl From<&BracketShare> for MatchBracket {
    fn from(share: &BracketShare) -> Self {
        Self {
            tier: share.tier,
            covered_pct: share.covered_pct,
            match_ratio: share.match_ratio,
            matched_pct: share.matched_pct,
        }
    }
}

/// Employer match result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub automatic_amount: f64,
    pub matched_amount: f64,
    pub total_employer_amount: f64,
    pub capped_by_limit: bool,
    pub total_employer_pct: f64,
    pub employee_amount: f64,
    pub employee_capped: bool,
    pub plan_year: i32,
    pub brackets: Vec<MatchBracket>,
}

/// TSP balance projection result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TspProjectionResult {
    pub years_to_retirement: u32,
    pub retirement_age: u32,
    pub balance_at_retirement: f64,
    pub annual_employee_amount: f64,
    pub annual_employer_amount: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub status: ProjectionStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<ClampedField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub yearly: Vec<YearRow>,
}

pub fn format_projection(input: &ProjectionInput, figures: FireFigures) -> ProjectionResult {
    let outcome = figures.outcome;
    ProjectionResult {
        target_balance: figures.target,
        years_to_target: outcome.years,
        target_age: input.current_age + outcome.years,
        has_reached_target: outcome.reached_target(),
        monthly_passive_income: figures.monthly_passive_income,
        annual_passive_income: figures.annual_passive_income,
        inflation_adjusted_target: figures.inflation_adjusted_target,
        projected_balance: outcome.final_balance,
        status: ProjectionStatus::from_termination(outcome.termination),
        adjustments: input.clamped.clone(),
        yearly: outcome.rows,
    }
}

pub fn format_wep(wep: &WepComputation, plan_year: i32) -> WepReductionResult {
    WepReductionResult {
        monthly_reduction: wep.monthly_reduction,
        fully_eliminated: wep.fully_eliminated,
        resolved_factor_pct: wep.resolved_factor_pct,
        formula_reduction: wep.formula_reduction,
        capped_by_pension: wep.capped_by_pension,
        plan_year,
    }
}

pub fn format_gpo(gpo: &GpoComputation) -> GpoOffsetResult {
    GpoOffsetResult {
        monthly_offset: gpo.applied_offset,
        reduced_monthly_benefit: gpo.reduced_benefit,
        fully_offset: gpo.fully_offset,
    }
}

pub fn format_match(computed: &MatchComputation, plan_year: i32) -> MatchResult {
    MatchResult {
        automatic_amount: computed.automatic_amount,
        matched_amount: computed.matched_amount,
        total_employer_amount: computed.total_employer_amount,
        capped_by_limit: computed.capped_by_limit,
        total_employer_pct: computed.automatic_pct + computed.matched_pct,
        employee_amount: computed.employee_amount,
        employee_capped: computed.employee_capped,
        plan_year,
        brackets: computed.brackets.iter().map(MatchBracket::from).collect(),
    }
}

pub fn format_tsp_projection(
    input: &TspProjectionInput,
    contributions: &MatchComputation,
    outcome: GrowthOutcome,
) -> TspProjectionResult {
    TspProjectionResult {
        years_to_retirement: outcome.years,
        retirement_age: input.current_age + outcome.years,
        balance_at_retirement: outcome.final_balance,
        annual_employee_amount: contributions.employee_amount,
        annual_employer_amount: contributions.total_employer_amount,
        total_contributions: outcome.total_contributions,
        total_growth: outcome.total_growth,
        status: ProjectionStatus::from_termination(outcome.termination),
        adjustments: input.clamped.clone(),
        yearly: outcome.rows,
    }
}
