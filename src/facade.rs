//! One entry point per calculator
//!
//! Each function validates its raw input, runs the simulator or resolver, and
//! formats the result. Expected domain outcomes such as non-convergence or a
//! cap being hit are part of the returned result; only invalid input and
//! broken configuration come back as `Err`.

use crate::error::{ConfigError, EngineResult};
use crate::formatter::{
    format_gpo, format_match, format_projection, format_tsp_projection, format_wep,
    GpoOffsetResult, MatchResult, ProjectionResult, TspProjectionResult, WepReductionResult,
};
use crate::resolver::{employer_match, gpo_offset, wep_reduction};
use crate::simulation::{evaluate_fire, GrowthSimulator, SimulationConfig, HARD_CEILING_YEARS};
use crate::tables::{ContributionLimits, MatchSchedule, WepParameters, GPO_OFFSET_FRACTION};
use crate::validator::{
    validate_gpo, validate_match, validate_projection, validate_tsp_projection, validate_wep,
    ClampPolicy, MatchInput, RawGpoInput, RawMatchInput, RawProjectionInput,
    RawTspProjectionInput, RawWepInput,
};
use log::debug;

/// Caller-supplied assumptions for projections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assumptions {
    /// Iteration ceiling; `None` uses the hard ceiling of 100 years
    pub ceiling_years: Option<u32>,
    /// Include one row per simulated year in the result
    pub detailed_output: bool,
    pub policy: ClampPolicy,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            ceiling_years: None,
            detailed_output: false,
            policy: ClampPolicy::default(),
        }
    }
}

impl Assumptions {
    /// Clamp policy, checked before any input is normalized with it
    fn policy(&self) -> Result<&ClampPolicy, ConfigError> {
        self.policy.validate()?;
        Ok(&self.policy)
    }

    fn simulator(&self) -> GrowthSimulator {
        GrowthSimulator::new(SimulationConfig {
            ceiling_years: self.ceiling_years.unwrap_or(HARD_CEILING_YEARS),
            detailed_output: self.detailed_output,
        })
    }
}

/// Years until savings reach the FIRE number
pub fn project_fire_number(
    raw: &RawProjectionInput,
    assumptions: &Assumptions,
) -> EngineResult<ProjectionResult> {
    let input = validate_projection(raw, assumptions.policy()?)?;
    let figures = evaluate_fire(&input, &assumptions.simulator());
    debug!(
        "fire projection: target {:.2}, {} years, reached={}",
        figures.target,
        figures.outcome.years,
        figures.outcome.reached_target()
    );
    Ok(format_projection(&input, figures))
}

/// Monthly WEP reduction for one plan year's parameters
pub fn compute_wep_reduction(
    raw: &RawWepInput,
    params: &WepParameters<'_>,
    assumptions: &Assumptions,
) -> EngineResult<WepReductionResult> {
    let input = validate_wep(raw, assumptions.policy()?)?;
    let wep = wep_reduction(
        input.years_of_substantial_earnings,
        input.non_covered_monthly_pension,
        params,
    );
    Ok(format_wep(&wep, params.year))
}

/// Spousal or survivor benefit after the Government Pension Offset
pub fn compute_gpo_offset(
    raw: &RawGpoInput,
    assumptions: &Assumptions,
) -> EngineResult<GpoOffsetResult> {
    let input = validate_gpo(raw, assumptions.policy()?)?;
    let gpo = gpo_offset(
        input.spousal_monthly_benefit,
        input.non_covered_monthly_pension,
        GPO_OFFSET_FRACTION,
    );
    Ok(format_gpo(&gpo))
}

/// Employer automatic and matching contributions for one plan year
pub fn compute_tsp_match(
    raw: &RawMatchInput,
    schedule: &MatchSchedule,
    limits: &ContributionLimits,
    assumptions: &Assumptions,
) -> EngineResult<MatchResult> {
    let input = validate_match(raw, assumptions.policy()?)?;
    let computed = employer_match(&input, schedule, limits);
    Ok(format_match(&computed, limits.year))
}

/// TSP balance at retirement at this year's match and limits.
///
/// The deferral limit follows the age attained each year, so catch-up
/// contributions start once the contributor reaches `CATCH_UP_AGE`.
pub fn project_tsp_balance(
    raw: &RawTspProjectionInput,
    schedule: &MatchSchedule,
    limits: &ContributionLimits,
    assumptions: &Assumptions,
) -> EngineResult<TspProjectionResult> {
    let input = validate_tsp_projection(raw, assumptions.policy()?)?;
    let contributions = employer_match(&input.contribution, schedule, limits);

    let outcome = assumptions.simulator().project_years_with(
        input.current_balance,
        input.expected_annual_return_pct / 100.0,
        input.retirement_age - input.current_age,
        input.current_age,
        |age| {
            let year = employer_match(
                &MatchInput {
                    age: Some(age),
                    ..input.contribution
                },
                schedule,
                limits,
            );
            year.employee_amount + year.total_employer_amount
        },
    );
    Ok(format_tsp_projection(&input, &contributions, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::formatter::ProjectionStatus;
    use crate::tables::{BendPointTable, FormulaTables, MatchTier, PlanVariant};
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn scenario_one() -> RawProjectionInput {
        RawProjectionInput {
            current_balance: 200_000.0,
            annual_contribution: 30_000.0,
            expected_annual_return_pct: 7.0,
            inflation_pct: 3.0,
            current_age: 30.0,
            target_annual_expense: 60_000.0,
            withdrawal_rate_pct: 4.0,
        }
    }

    /// Year-by-year reference table for the same recurrence
    fn reference_years(start: f64, contribution: f64, rate: f64, target: f64) -> u32 {
        let table: Vec<f64> = (0..=100u32)
            .scan(start, |balance, year| {
                if year > 0 {
                    *balance = *balance * (1.0 + rate) + contribution;
                }
                Some(*balance)
            })
            .collect();
        table
            .iter()
            .position(|&b| b >= target)
            .map(|y| y as u32)
            .unwrap_or(100)
    }

    #[test]
    fn test_scenario_one_fire_number() {
        let result = project_fire_number(&scenario_one(), &Assumptions::default()).unwrap();
        assert_eq!(result.target_balance, 1_500_000.0);
        assert!(result.has_reached_target);
        assert_eq!(
            result.years_to_target,
            reference_years(200_000.0, 30_000.0, 0.07, 1_500_000.0)
        );
        assert_eq!(result.target_age, 30 + result.years_to_target);
        assert_relative_eq!(
            result.inflation_adjusted_target,
            1_500_000.0 * 1.03f64.powi(result.years_to_target as i32),
            max_relative = 1e-12
        );
        assert!(result.annual_passive_income >= 60_000.0);
    }

    #[test]
    fn test_ceiling_law() {
        let mut raw = scenario_one();
        raw.annual_contribution = 0.0;
        raw.expected_annual_return_pct = 0.0;

        let result = project_fire_number(&raw, &Assumptions::default()).unwrap();
        assert_eq!(result.years_to_target, 100);
        assert!(!result.has_reached_target);
        assert_eq!(result.status, ProjectionStatus::BeyondHorizon);
    }

    #[test]
    fn test_custom_ceiling() {
        let mut raw = scenario_one();
        raw.annual_contribution = 0.0;
        raw.expected_annual_return_pct = 0.0;
        let assumptions = Assumptions {
            ceiling_years: Some(50),
            ..Default::default()
        };
        let result = project_fire_number(&raw, &assumptions).unwrap();
        assert_eq!(result.years_to_target, 50);
        assert!(!result.has_reached_target);
    }

    #[test]
    fn test_already_there() {
        let mut raw = scenario_one();
        raw.current_balance = 1_500_000.0;
        let result = project_fire_number(&raw, &Assumptions::default()).unwrap();
        assert_eq!(result.years_to_target, 0);
        assert!(result.has_reached_target);
        assert_eq!(result.inflation_adjusted_target, result.target_balance);
    }

    #[test]
    fn test_invalid_input_returns_field_errors() {
        let mut raw = scenario_one();
        raw.target_annual_expense = -10.0;
        match project_fire_number(&raw, &Assumptions::default()) {
            Err(EngineError::Validation(errors)) => {
                assert_eq!(errors.fields(), vec!["targetAnnualExpense"])
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_scenario_two_tsp_match() {
        let limits = FormulaTables::published().limits_for(2024).unwrap();
        let schedule = MatchSchedule::new(
            PlanVariant::Tsp,
            1.0,
            vec![MatchTier::new(3.0, 1.0), MatchTier::new(5.0, 0.5)],
        )
        .unwrap();
        let raw = RawMatchInput {
            contribution_pct: 5.0,
            salary: 100_000.0,
            age: None,
        };
        let result = compute_tsp_match(&raw, &schedule, limits, &Assumptions::default()).unwrap();
        assert_eq!(result.total_employer_pct, 5.0);
        assert_eq!(result.total_employer_amount, 5_000.0);
        assert_eq!(result.automatic_amount, 1_000.0);
        assert_eq!(result.matched_amount, 4_000.0);
        assert!(!result.capped_by_limit);
        assert_eq!(result.plan_year, 2024);
    }

    #[test]
    fn test_scenario_three_wep() {
        let table = BendPointTable::wep_standard();
        let params = WepParameters {
            year: 2024,
            factors: &table,
            first_bend_point: 1174.0,
        };
        let raw = RawWepInput {
            years_of_substantial_earnings: 22.0,
            non_covered_monthly_pension: 2_500.0,
        };
        let result = compute_wep_reduction(&raw, &params, &Assumptions::default()).unwrap();
        assert_eq!(result.resolved_factor_pct, 50.0);
        assert!(!result.fully_eliminated);
    }

    #[test]
    fn test_wep_boundaries_through_facade() {
        let tables = FormulaTables::published();
        let params = tables.wep_parameters(2024).unwrap();
        let reduce = |years: f64| {
            compute_wep_reduction(
                &RawWepInput {
                    years_of_substantial_earnings: years,
                    non_covered_monthly_pension: 5_000.0,
                },
                &params,
                &Assumptions::default(),
            )
            .unwrap()
        };
        assert_eq!(reduce(30.0).monthly_reduction, 0.0);
        assert!(reduce(30.0).fully_eliminated);
        assert_relative_eq!(reduce(20.0).monthly_reduction, 0.5 * 1174.0);
        assert_relative_eq!(
            reduce(25.0).monthly_reduction,
            (reduce(20.0).monthly_reduction + reduce(30.0).monthly_reduction) / 2.0
        );
    }

    #[test]
    fn test_gpo_through_facade() {
        let raw = RawGpoInput {
            spousal_monthly_benefit: 1_200.0,
            non_covered_monthly_pension: 1_500.0,
        };
        let result = compute_gpo_offset(&raw, &Assumptions::default()).unwrap();
        assert_relative_eq!(result.monthly_offset, 1_000.0);
        assert_relative_eq!(result.reduced_monthly_benefit, 200.0);
        assert!(!result.fully_offset);
    }

    #[test]
    fn test_tsp_projection() {
        let tables = FormulaTables::published();
        let schedule = tables.match_schedule(PlanVariant::Tsp).unwrap();
        let limits = tables.limits_for(2025).unwrap();
        let raw = RawTspProjectionInput {
            current_balance: 50_000.0,
            salary: 80_000.0,
            contribution_pct: 5.0,
            expected_annual_return_pct: 0.0,
            current_age: 40.0,
            retirement_age: 60.0,
        };
        let assumptions = Assumptions {
            detailed_output: true,
            ..Default::default()
        };
        let result = project_tsp_balance(&raw, schedule, limits, &assumptions).unwrap();

        // 4,000 employee + 4,000 employer per year, no growth
        assert_eq!(result.years_to_retirement, 20);
        assert_eq!(result.retirement_age, 60);
        assert_eq!(result.annual_employee_amount, 4_000.0);
        assert_eq!(result.annual_employer_amount, 4_000.0);
        assert_relative_eq!(result.balance_at_retirement, 50_000.0 + 20.0 * 8_000.0);
        assert_eq!(result.yearly.len(), 20);
        assert_eq!(result.status, ProjectionStatus::Reached);
    }

    #[test]
    fn test_tsp_projection_starts_catch_up_at_fifty() {
        let tables = FormulaTables::published();
        let schedule = tables.match_schedule(PlanVariant::Tsp).unwrap();
        let limits = tables.limits_for(2025).unwrap();
        let raw = RawTspProjectionInput {
            current_balance: 0.0,
            salary: 200_000.0,
            contribution_pct: 20.0,
            expected_annual_return_pct: 0.0,
            current_age: 45.0,
            retirement_age: 65.0,
        };
        let assumptions = Assumptions {
            detailed_output: true,
            ..Default::default()
        };
        let result = project_tsp_balance(&raw, schedule, limits, &assumptions).unwrap();

        // 10,000 employer every year; deferral 23,500 until 50, then 31,000
        assert_eq!(result.annual_employee_amount, 23_500.0);
        assert_eq!(result.yearly[4].contribution, 33_500.0);
        assert_eq!(result.yearly[5].contribution, 41_000.0);
        assert_relative_eq!(result.total_contributions, 5.0 * 33_500.0 + 15.0 * 41_000.0);
        assert_relative_eq!(result.balance_at_retirement, 782_500.0);
    }

    #[test]
    fn test_inverted_policy_is_config_error() {
        let assumptions = Assumptions {
            policy: ClampPolicy {
                min_rate_pct: 20.0,
                max_rate_pct: -20.0,
                ..ClampPolicy::default()
            },
            ..Default::default()
        };
        let err = project_fire_number(&scenario_one(), &assumptions).unwrap_err();
        assert!(!err.is_validation());
        assert_eq!(err.user_message(), "This calculation is currently unavailable.");
    }

    #[test]
    fn test_policy_max_age_applies_to_match() {
        let limits = FormulaTables::published().limits_for(2025).unwrap();
        let schedule = MatchSchedule::tsp();
        let raw = RawMatchInput {
            contribution_pct: 5.0,
            salary: 100_000.0,
            age: Some(70.0),
        };
        let assumptions = Assumptions {
            policy: ClampPolicy {
                max_age: 65,
                ..ClampPolicy::default()
            },
            ..Default::default()
        };
        assert!(compute_tsp_match(&raw, &schedule, limits, &Assumptions::default()).is_ok());
        match compute_tsp_match(&raw, &schedule, limits, &assumptions) {
            Err(EngineError::Validation(errors)) => assert_eq!(errors.fields(), vec!["age"]),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_fire_projection_is_idempotent(
            balance in 0u32..3_000_000,
            contribution in 0u32..120_000,
            return_bp in -2500i32..2500,
            inflation_bp in -500i32..1000,
            expense in 0u32..250_000,
            withdrawal_bp in 100u32..1000
        ) {
            let raw = RawProjectionInput {
                current_balance: balance as f64,
                annual_contribution: contribution as f64,
                expected_annual_return_pct: return_bp as f64 / 100.0,
                inflation_pct: inflation_bp as f64 / 100.0,
                current_age: 35.0,
                target_annual_expense: expense as f64,
                withdrawal_rate_pct: withdrawal_bp as f64 / 100.0,
            };
            let first = project_fire_number(&raw, &Assumptions::default()).unwrap();
            let second = project_fire_number(&raw, &Assumptions::default()).unwrap();
            prop_assert_eq!(first.years_to_target, second.years_to_target);
            prop_assert_eq!(first.projected_balance.to_bits(), second.projected_balance.to_bits());
            prop_assert_eq!(
                first.inflation_adjusted_target.to_bits(),
                second.inflation_adjusted_target.to_bits()
            );
        }

        #[test]
        fn prop_wep_is_idempotent(years in 0u32..45, pension in 0u32..6_000) {
            let params = FormulaTables::published().wep_parameters(2024).unwrap();
            let raw = RawWepInput {
                years_of_substantial_earnings: years as f64,
                non_covered_monthly_pension: pension as f64,
            };
            let first = compute_wep_reduction(&raw, &params, &Assumptions::default()).unwrap();
            let second = compute_wep_reduction(&raw, &params, &Assumptions::default()).unwrap();
            prop_assert_eq!(first.monthly_reduction.to_bits(), second.monthly_reduction.to_bits());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_match_is_idempotent(
            contribution_bp in 0u32..10_000,
            salary in 0u32..400_000,
            age in 18u32..80
        ) {
            let tables = FormulaTables::published();
            let schedule = tables.match_schedule(PlanVariant::Tsp).unwrap();
            let limits = tables.limits_for(2025).unwrap();
            let raw = RawMatchInput {
                contribution_pct: contribution_bp as f64 / 100.0,
                salary: salary as f64,
                age: Some(age as f64),
            };
            let first = compute_tsp_match(&raw, schedule, limits, &Assumptions::default()).unwrap();
            let second = compute_tsp_match(&raw, schedule, limits, &Assumptions::default()).unwrap();
            prop_assert_eq!(
                first.total_employer_amount.to_bits(),
                second.total_employer_amount.to_bits()
            );
            prop_assert_eq!(first.employee_amount.to_bits(), second.employee_amount.to_bits());
        }

        #[test]
        fn prop_tsp_projection_is_idempotent(
            balance in 0u32..2_000_000,
            salary in 0u32..300_000,
            contribution_bp in 0u32..3_000,
            return_bp in -1000i32..1500,
            age in 20u32..60,
            horizon in 0u32..30
        ) {
            let tables = FormulaTables::published();
            let schedule = tables.match_schedule(PlanVariant::Tsp).unwrap();
            let limits = tables.limits_for(2025).unwrap();
            let raw = RawTspProjectionInput {
                current_balance: balance as f64,
                salary: salary as f64,
                contribution_pct: contribution_bp as f64 / 100.0,
                expected_annual_return_pct: return_bp as f64 / 100.0,
                current_age: age as f64,
                retirement_age: (age + horizon) as f64,
            };
            let first = project_tsp_balance(&raw, schedule, limits, &Assumptions::default()).unwrap();
            let second = project_tsp_balance(&raw, schedule, limits, &Assumptions::default()).unwrap();
            prop_assert_eq!(
                first.balance_at_retirement.to_bits(),
                second.balance_at_retirement.to_bits()
            );
            prop_assert_eq!(first.years_to_retirement, second.years_to_retirement);
        }

        #[test]
        fn prop_wep_cap_law(years in 0u32..40, pension in 0u32..3_000) {
            let tables = FormulaTables::published();
            let params = tables.wep_parameters(2024).unwrap();
            let raw = RawWepInput {
                years_of_substantial_earnings: years as f64,
                non_covered_monthly_pension: pension as f64,
            };
            let result = compute_wep_reduction(&raw, &params, &Assumptions::default()).unwrap();
            let cap = 0.5 * pension as f64;
            prop_assert!(result.monthly_reduction <= cap);
            if result.formula_reduction > cap {
                prop_assert_eq!(result.monthly_reduction, cap);
                prop_assert!(result.capped_by_pension);
            }
        }
    }
}
