//! Input validation and normalization
//!
//! Raw numbers from the presentation layer are checked field by field. Hard
//! violations (non-finite, negative money, rates outside their legal range)
//! are collected into a `ValidationErrors` list. Soft violations are clamped
//! into the bounds of an explicit `ClampPolicy` and reported back as
//! `ClampedField`s. A caller either gets a fully normalized input or the
//! complete list of field errors, never a mix.

use crate::error::{ConfigError, FieldError, FieldErrorKind, ValidationErrors};
use log::debug;
use serde::{Deserialize, Serialize};

/// Every bound the validator enforces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampPolicy {
    /// Return and inflation rates are clamped into this range (percent)
    pub min_rate_pct: f64,
    pub max_rate_pct: f64,
    /// Withdrawal rate slider range (percent); values in (0, 100] outside it are clamped
    pub min_withdrawal_rate_pct: f64,
    pub max_withdrawal_rate_pct: f64,
    /// Ages above this are rejected
    pub max_age: u32,
}

impl Default for ClampPolicy {
    fn default() -> Self {
        Self {
            min_rate_pct: -20.0,
            max_rate_pct: 20.0,
            min_withdrawal_rate_pct: 1.0,
            max_withdrawal_rate_pct: 10.0,
            max_age: 120,
        }
    }
}

impl ClampPolicy {
    /// Reject ranges that are empty or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("rate", self.min_rate_pct, self.max_rate_pct)?;
        check_range(
            "withdrawal rate",
            self.min_withdrawal_rate_pct,
            self.max_withdrawal_rate_pct,
        )?;
        if !(0.0 < self.min_withdrawal_rate_pct && self.max_withdrawal_rate_pct <= 100.0) {
            return Err(ConfigError::InvalidPolicy {
                field: "withdrawal rate",
                min: self.min_withdrawal_rate_pct,
                max: self.max_withdrawal_rate_pct,
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidPolicy { field, min, max })
    }
}

/// A field whose value was moved into policy bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampedField {
    pub field: &'static str,
    pub original: f64,
    pub clamped: f64,
}

/// FIRE projection input as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProjectionInput {
    pub current_balance: f64,
    pub annual_contribution: f64,
    pub expected_annual_return_pct: f64,
    pub inflation_pct: f64,
    pub current_age: f64,
    pub target_annual_expense: f64,
    pub withdrawal_rate_pct: f64,
}

/// Normalized FIRE projection input
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    pub current_balance: f64,
    pub annual_contribution: f64,
    pub expected_annual_return_pct: f64,
    pub inflation_pct: f64,
    pub current_age: u32,
    pub target_annual_expense: f64,
    pub withdrawal_rate_pct: f64,
    pub clamped: Vec<ClampedField>,
}

/// WEP input as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWepInput {
    pub years_of_substantial_earnings: f64,
    pub non_covered_monthly_pension: f64,
}

/// Normalized WEP input; partial years do not count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WepInput {
    pub years_of_substantial_earnings: u32,
    pub non_covered_monthly_pension: f64,
}

/// GPO input as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGpoInput {
    pub spousal_monthly_benefit: f64,
    pub non_covered_monthly_pension: f64,
}

/// Normalized GPO input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpoInput {
    pub spousal_monthly_benefit: f64,
    pub non_covered_monthly_pension: f64,
}

/// Match input as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchInput {
    pub contribution_pct: f64,
    pub salary: f64,
    #[serde(default)]
    pub age: Option<f64>,
}

/// Normalized match input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchInput {
    pub contribution_pct: f64,
    pub salary: f64,
    pub age: Option<u32>,
}

/// TSP balance projection input as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTspProjectionInput {
    pub current_balance: f64,
    pub salary: f64,
    pub contribution_pct: f64,
    pub expected_annual_return_pct: f64,
    pub current_age: f64,
    pub retirement_age: f64,
}

/// Normalized TSP balance projection input
#[derive(Debug, Clone, PartialEq)]
pub struct TspProjectionInput {
    pub current_balance: f64,
    pub contribution: MatchInput,
    pub expected_annual_return_pct: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    pub clamped: Vec<ClampedField>,
}

/// Accumulates field errors and clamps while checking one input
struct FieldChecks<'p> {
    policy: &'p ClampPolicy,
    errors: Vec<FieldError>,
    clamped: Vec<ClampedField>,
}

impl<'p> FieldChecks<'p> {
    fn new(policy: &'p ClampPolicy) -> Self {
        Self {
            policy,
            errors: Vec::new(),
            clamped: Vec::new(),
        }
    }

    fn fail(&mut self, field: &'static str, kind: FieldErrorKind) {
        self.errors.push(FieldError::new(field, kind));
    }

    fn finite(&mut self, field: &'static str, value: f64) -> Option<f64> {
        if value.is_finite() {
            Some(value)
        } else {
            self.fail(field, FieldErrorKind::NotFinite);
            None
        }
    }

    /// Finite and not negative
    fn money(&mut self, field: &'static str, value: f64) -> f64 {
        match self.finite(field, value) {
            Some(v) if v < 0.0 => {
                self.fail(field, FieldErrorKind::Negative);
                0.0
            }
            Some(v) => v,
            None => 0.0,
        }
    }

    fn clamp_into(&mut self, field: &'static str, value: f64, min: f64, max: f64) -> f64 {
        // max then min, so an unchecked policy never panics
        let clamped = value.max(min).min(max);
        if clamped != value {
            debug!("clamped {} from {} to {}", field, value, clamped);
            self.clamped.push(ClampedField {
                field,
                original: value,
                clamped,
            });
        }
        clamped
    }

    /// Any finite rate, clamped into the simulation range
    fn rate(&mut self, field: &'static str, value: f64) -> f64 {
        match self.finite(field, value) {
            Some(v) => self.clamp_into(field, v, self.policy.min_rate_pct, self.policy.max_rate_pct),
            None => 0.0,
        }
    }

    /// Rate in (0, 100], then clamped into the slider range
    fn withdrawal_rate(&mut self, field: &'static str, value: f64) -> f64 {
        match self.finite(field, value) {
            Some(v) if v <= 0.0 => {
                self.fail(field, FieldErrorKind::NotPositive);
                0.0
            }
            Some(v) if v > 100.0 => {
                self.fail(field, FieldErrorKind::OutOfRange { min: 0.0, max: 100.0 });
                0.0
            }
            Some(v) => self.clamp_into(
                field,
                v,
                self.policy.min_withdrawal_rate_pct,
                self.policy.max_withdrawal_rate_pct,
            ),
            None => 0.0,
        }
    }

    /// Percentage in [0, 100]
    fn percent(&mut self, field: &'static str, value: f64) -> f64 {
        match self.finite(field, value) {
            Some(v) if !(0.0..=100.0).contains(&v) => {
                self.fail(field, FieldErrorKind::OutOfRange { min: 0.0, max: 100.0 });
                0.0
            }
            Some(v) => v,
            None => 0.0,
        }
    }

    /// Whole years of age, 0..=max_age
    fn age(&mut self, field: &'static str, value: f64) -> u32 {
        let max = self.policy.max_age;
        match self.finite(field, value) {
            Some(v) if v < 0.0 || v > max as f64 => {
                self.fail(field, FieldErrorKind::OutOfRange { min: 0.0, max: max as f64 });
                0
            }
            Some(v) => v.floor() as u32,
            None => 0,
        }
    }

    /// Non-negative count of whole years
    fn whole_years(&mut self, field: &'static str, value: f64) -> u32 {
        match self.finite(field, value) {
            Some(v) if v < 0.0 => {
                self.fail(field, FieldErrorKind::Negative);
                0
            }
            Some(v) => v.floor().min(u32::MAX as f64) as u32,
            None => 0,
        }
    }

    fn finish<T>(self, build: impl FnOnce(Vec<ClampedField>) -> T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(build(self.clamped))
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Validate and normalize a FIRE projection input
pub fn validate_projection(
    raw: &RawProjectionInput,
    policy: &ClampPolicy,
) -> Result<ProjectionInput, ValidationErrors> {
    let mut checks = FieldChecks::new(policy);
    let current_balance = checks.money("currentBalance", raw.current_balance);
    let annual_contribution = checks.money("annualContribution", raw.annual_contribution);
    let expected_annual_return_pct = checks.rate("expectedAnnualReturnPct", raw.expected_annual_return_pct);
    let inflation_pct = checks.rate("inflationPct", raw.inflation_pct);
    let current_age = checks.age("currentAge", raw.current_age);
    let target_annual_expense = checks.money("targetAnnualExpense", raw.target_annual_expense);
    let withdrawal_rate_pct = checks.withdrawal_rate("withdrawalRatePct", raw.withdrawal_rate_pct);

    checks.finish(|clamped| ProjectionInput {
        current_balance,
        annual_contribution,
        expected_annual_return_pct,
        inflation_pct,
        current_age,
        target_annual_expense,
        withdrawal_rate_pct,
        clamped,
    })
}

/// Validate and normalize a WEP input
pub fn validate_wep(raw: &RawWepInput, policy: &ClampPolicy) -> Result<WepInput, ValidationErrors> {
    let mut checks = FieldChecks::new(policy);
    let years = checks.whole_years("yearsOfSubstantialEarnings", raw.years_of_substantial_earnings);
    let pension = checks.money("nonCoveredMonthlyPension", raw.non_covered_monthly_pension);

    checks.finish(|_| WepInput {
        years_of_substantial_earnings: years,
        non_covered_monthly_pension: pension,
    })
}

/// Validate and normalize a GPO input
pub fn validate_gpo(raw: &RawGpoInput, policy: &ClampPolicy) -> Result<GpoInput, ValidationErrors> {
    let mut checks = FieldChecks::new(policy);
    let spousal = checks.money("spousalMonthlyBenefit", raw.spousal_monthly_benefit);
    let pension = checks.money("nonCoveredMonthlyPension", raw.non_covered_monthly_pension);

    checks.finish(|_| GpoInput {
        spousal_monthly_benefit: spousal,
        non_covered_monthly_pension: pension,
    })
}

/// Validate and normalize a match input
pub fn validate_match(raw: &RawMatchInput, policy: &ClampPolicy) -> Result<MatchInput, ValidationErrors> {
    let mut checks = FieldChecks::new(policy);
    let contribution_pct = checks.percent("contributionPct", raw.contribution_pct);
    let salary = checks.money("salary", raw.salary);
    let age = raw.age.map(|age| checks.age("age", age));

    checks.finish(|_| MatchInput {
        contribution_pct,
        salary,
        age,
    })
}

/// Validate and normalize a TSP balance projection input
pub fn validate_tsp_projection(
    raw: &RawTspProjectionInput,
    policy: &ClampPolicy,
) -> Result<TspProjectionInput, ValidationErrors> {
    let mut checks = FieldChecks::new(policy);
    let current_balance = checks.money("currentBalance", raw.current_balance);
    let salary = checks.money("salary", raw.salary);
    let contribution_pct = checks.percent("contributionPct", raw.contribution_pct);
    let expected_annual_return_pct = checks.rate("expectedAnnualReturnPct", raw.expected_annual_return_pct);
    let current_age = checks.age("currentAge", raw.current_age);
    let retirement_age = checks.age("retirementAge", raw.retirement_age);

    if checks.errors.is_empty() && retirement_age < current_age {
        checks.fail(
            "retirementAge",
            FieldErrorKind::OutOfRange {
                min: current_age as f64,
                max: policy.max_age as f64,
            },
        );
    }

    checks.finish(|clamped| TspProjectionInput {
        current_balance,
        contribution: MatchInput {
            contribution_pct,
            salary,
            age: Some(current_age),
        },
        expected_annual_return_pct,
        current_age,
        retirement_age,
        clamped,
    })
}
