//! Annual contribution limits by plan year

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Age at which catch-up contributions become available
pub const CATCH_UP_AGE: u32 = 50;

/// IRS limits for one plan year (annual dollars)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionLimits {
    pub year: i32,
    /// Elective deferral limit (402(g))
    pub regular_limit: f64,
    /// Additional deferral allowed from age 50
    pub catch_up_limit: f64,
    /// Combined employee + employer limit (415(c))
    pub annual_additions_limit: f64,
}

impl ContributionLimits {
    /// Employee deferral ceiling for a contributor of the given age
    pub fn deferral_limit(&self, age: Option<u32>) -> f64 {
        match age {
            Some(age) if age >= CATCH_UP_AGE => self.regular_limit + self.catch_up_limit,
            _ => self.regular_limit,
        }
    }
}

/// Contribution limits keyed by plan year
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionLimitTable {
    entries: Vec<ContributionLimits>,
}

impl ContributionLimitTable {
    const TABLE: &'static str = "contribution limits";

    pub fn new(entries: Vec<ContributionLimits>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyTable { table: Self::TABLE });
        }
        for (row, entry) in entries.iter().enumerate() {
            for value in [
                entry.regular_limit,
                entry.catch_up_limit,
                entry.annual_additions_limit,
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        table: Self::TABLE,
                        row,
                        value,
                    });
                }
            }
        }
        for (row, pair) in entries.windows(2).enumerate() {
            if pair[1].year <= pair[0].year {
                return Err(ConfigError::UnsortedTable {
                    table: Self::TABLE,
                    row: row + 1,
                    previous: pair[0].year as f64,
                    current: pair[1].year as f64,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Published limits for 2022 through 2026
    pub fn published() -> Self {
        Self {
            entries: vec![
                limits(2022, 20_500.0, 6_500.0, 61_000.0),
                limits(2023, 22_500.0, 7_500.0, 66_000.0),
                limits(2024, 23_000.0, 7_500.0, 69_000.0),
                limits(2025, 23_500.0, 7_500.0, 70_000.0),
                limits(2026, 24_500.0, 8_000.0, 72_000.0),
            ],
        }
    }

    /// Limits for exactly this plan year.
    ///
    /// Limits change every year, so a missing year is a deployment defect
    /// rather than something to fill from a neighbouring year.
    pub fn for_year(&self, year: i32) -> Result<&ContributionLimits, ConfigError> {
        self.entries
            .iter()
            .find(|e| e.year == year)
            .ok_or(ConfigError::MissingPlanYear {
                table: Self::TABLE,
                year,
            })
    }

    pub fn entries(&self) -> &[ContributionLimits] {
        &self.entries
    }

    /// Most recent plan year on file
    pub fn latest_year(&self) -> i32 {
        self.entries[self.entries.len() - 1].year
    }
}

fn limits(year: i32, regular: f64, catch_up: f64, additions: f64) -> ContributionLimits {
    ContributionLimits {
        year,
        regular_limit: regular,
        catch_up_limit: catch_up,
        annual_additions_limit: additions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_year() {
        let table = ContributionLimitTable::published();
        let l = table.for_year(2024).unwrap();
        assert_eq!(l.regular_limit, 23_000.0);
        assert_eq!(l.catch_up_limit, 7_500.0);
        assert_eq!(table.latest_year(), 2026);
    }

    #[test]
    fn test_missing_year_fails() {
        let table = ContributionLimitTable::published();
        let err = table.for_year(2019).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingPlanYear {
                table: "contribution limits",
                year: 2019
            }
        );
    }

    #[test]
    fn test_catch_up_applies_from_fifty() {
        let table = ContributionLimitTable::published();
        let l = table.for_year(2025).unwrap();
        assert_eq!(l.deferral_limit(None), 23_500.0);
        assert_eq!(l.deferral_limit(Some(49)), 23_500.0);
        assert_eq!(l.deferral_limit(Some(50)), 31_000.0);
    }

    #[test]
    fn test_unsorted_years_rejected() {
        let entries = vec![
            limits(2024, 23_000.0, 7_500.0, 69_000.0),
            limits(2023, 22_500.0, 7_500.0, 66_000.0),
        ];
        assert!(matches!(
            ContributionLimitTable::new(entries),
            Err(ConfigError::UnsortedTable { row: 1, .. })
        ));
    }

    #[test]
    fn test_published_table_is_valid() {
        let published = ContributionLimitTable::published();
        let rebuilt = ContributionLimitTable::new(published.entries().to_vec()).unwrap();
        assert_eq!(rebuilt, published);
    }
}
