//! Employer match schedules for TSP and 401(k) plans

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which employer schedule a contributor is enrolled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanVariant {
    /// FERS Thrift Savings Plan
    Tsp,
    /// Common private-sector 401(k): half of the first 6%
    #[serde(rename = "generic_401k")]
    Generic401k,
}

impl PlanVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanVariant::Tsp => "tsp",
            PlanVariant::Generic401k => "generic_401k",
        }
    }
}

impl fmt::Display for PlanVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tsp" => Ok(PlanVariant::Tsp),
            "generic_401k" | "401k" => Ok(PlanVariant::Generic401k),
            other => Err(format!("Unknown plan variant: {}", other)),
        }
    }
}

/// One bracket of a match schedule.
///
/// `contribution_pct_up_to` is the cumulative upper edge of the bracket, so a
/// schedule of 3 then 5 means "the first 3%" and "the next 2%".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchTier {
    pub contribution_pct_up_to: f64,
    pub match_ratio: f64,
}

impl MatchTier {
    pub const fn new(contribution_pct_up_to: f64, match_ratio: f64) -> Self {
        Self {
            contribution_pct_up_to,
            match_ratio,
        }
    }
}

/// Match tiers plus the flat automatic contribution
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSchedule {
    variant: PlanVariant,
    automatic_pct: f64,
    tiers: Vec<MatchTier>,
}

impl MatchSchedule {
    const TABLE: &'static str = "match tier";

    /// Build a schedule, failing fast on empty, unsorted, or nonsensical tiers
    pub fn new(
        variant: PlanVariant,
        automatic_pct: f64,
        tiers: Vec<MatchTier>,
    ) -> Result<Self, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::EmptyTable { table: Self::TABLE });
        }
        if !automatic_pct.is_finite() || !(0.0..=100.0).contains(&automatic_pct) {
            return Err(ConfigError::InvalidValue {
                table: Self::TABLE,
                row: 0,
                value: automatic_pct,
            });
        }

        let mut previous = 0.0;
        for (row, tier) in tiers.iter().enumerate() {
            let upper = tier.contribution_pct_up_to;
            if !upper.is_finite() || upper > 100.0 {
                return Err(ConfigError::InvalidValue {
                    table: Self::TABLE,
                    row,
                    value: upper,
                });
            }
            if upper <= previous {
                return Err(ConfigError::UnsortedTable {
                    table: Self::TABLE,
                    row,
                    previous,
                    current: upper,
                });
            }
            if !tier.match_ratio.is_finite() || tier.match_ratio < 0.0 {
                return Err(ConfigError::InvalidValue {
                    table: Self::TABLE,
                    row,
                    value: tier.match_ratio,
                });
            }
            previous = upper;
        }

        Ok(Self {
            variant,
            automatic_pct,
            tiers,
        })
    }

    /// FERS TSP: 1% automatic, first 3% matched dollar for dollar, next 2% at 50 cents
    pub fn tsp() -> Self {
        Self {
            variant: PlanVariant::Tsp,
            automatic_pct: 1.0,
            tiers: vec![MatchTier::new(3.0, 1.0), MatchTier::new(5.0, 0.5)],
        }
    }

    /// 50% match on the first 6%, no automatic contribution
    pub fn generic_401k() -> Self {
        Self {
            variant: PlanVariant::Generic401k,
            automatic_pct: 0.0,
            tiers: vec![MatchTier::new(6.0, 0.5)],
        }
    }

    pub fn variant(&self) -> PlanVariant {
        self.variant
    }

    pub fn automatic_pct(&self) -> f64 {
        self.automatic_pct
    }

    pub fn tiers(&self) -> &[MatchTier] {
        &self.tiers
    }

    /// Highest employer percentage the schedule can produce
    pub fn max_employer_pct(&self) -> f64 {
        let mut lower = 0.0;
        let mut matched = 0.0;
        for tier in &self.tiers {
            matched += (tier.contribution_pct_up_to - lower) * tier.match_ratio;
            lower = tier.contribution_pct_up_to;
        }
        self.automatic_pct + matched
    }
}
