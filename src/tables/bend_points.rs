//! Bend-point tables for the Windfall Elimination Provision
//!
//! The WEP factor schedule maps years of substantial earnings to the
//! percentage applied to the first PIA bend point. The dollar amount of that
//! bend point changes every year and is kept separately, keyed by the year it
//! takes effect.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// One threshold row of a bend-point table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendPointRow {
    /// Service value at which this factor applies
    pub threshold_years: f64,
    /// Factor in percent (0..=100)
    pub factor_pct: f64,
}

impl BendPointRow {
    pub const fn new(threshold_years: f64, factor_pct: f64) -> Self {
        Self {
            threshold_years,
            factor_pct,
        }
    }
}

/// Ordered bend-point rows, validated on construction.
///
/// Thresholds are strictly increasing and every factor moves toward the
/// final row's factor, which is the unreduced (full) value.
#[derive(Debug, Clone, PartialEq)]
pub struct BendPointTable {
    name: &'static str,
    rows: Vec<BendPointRow>,
}

impl BendPointTable {
    /// Build a table, failing fast on empty or unsorted rows
    pub fn new(name: &'static str, rows: Vec<BendPointRow>) -> Result<Self, ConfigError> {
        let first = rows.first().ok_or(ConfigError::EmptyTable { table: name })?;
        let last = rows.last().unwrap_or(first);
        let direction = last.factor_pct - first.factor_pct;

        for (row, entry) in rows.iter().enumerate() {
            if !entry.threshold_years.is_finite() {
                return Err(ConfigError::InvalidValue {
                    table: name,
                    row,
                    value: entry.threshold_years,
                });
            }
            if !entry.factor_pct.is_finite() || !(0.0..=100.0).contains(&entry.factor_pct) {
                return Err(ConfigError::FactorOutOfRange {
                    table: name,
                    row,
                    value: entry.factor_pct,
                });
            }
        }

        for (row, pair) in rows.windows(2).enumerate() {
            let (prev, curr) = (pair[0], pair[1]);
            if curr.threshold_years <= prev.threshold_years {
                return Err(ConfigError::UnsortedTable {
                    table: name,
                    row: row + 1,
                    previous: prev.threshold_years,
                    current: curr.threshold_years,
                });
            }
            let step = curr.factor_pct - prev.factor_pct;
            if step * direction < 0.0 {
                return Err(ConfigError::NonMonotonicFactors {
                    table: name,
                    row: row + 1,
                });
            }
        }

        Ok(Self { name, rows })
    }

    /// Standard WEP schedule: 40% at 20 or fewer years, rising 5 points per
    /// year to 90% at 30 or more years.
    pub fn wep_standard() -> Self {
        Self {
            name: "WEP factor",
            rows: vec![BendPointRow::new(20.0, 40.0), BendPointRow::new(30.0, 90.0)],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rows(&self) -> &[BendPointRow] {
        &self.rows
    }

    /// Factor at or below the first threshold
    pub fn base_factor(&self) -> f64 {
        self.rows[0].factor_pct
    }

    /// Unreduced factor at or beyond the last threshold
    pub fn full_factor(&self) -> f64 {
        self.rows[self.rows.len() - 1].factor_pct
    }
}

/// Dollar amount of the first PIA bend point, effective from a given year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WepBendAmount {
    pub effective_year: i32,
    pub first_bend_point: f64,
}

/// Published first bend points (monthly dollars)
pub fn published_wep_bend_amounts() -> Vec<WepBendAmount> {
    vec![
        WepBendAmount { effective_year: 2022, first_bend_point: 1024.0 },
        WepBendAmount { effective_year: 2023, first_bend_point: 1115.0 },
        WepBendAmount { effective_year: 2024, first_bend_point: 1174.0 },
        WepBendAmount { effective_year: 2025, first_bend_point: 1226.0 },
    ]
}

/// Check bend amounts are sorted by year and non-negative
pub(crate) fn validate_bend_amounts(amounts: &[WepBendAmount]) -> Result<(), ConfigError> {
    const TABLE: &str = "WEP bend amount";
    if amounts.is_empty() {
        return Err(ConfigError::EmptyTable { table: TABLE });
    }
    for (row, amount) in amounts.iter().enumerate() {
        if !amount.first_bend_point.is_finite() || amount.first_bend_point < 0.0 {
            return Err(ConfigError::InvalidValue {
                table: TABLE,
                row,
                value: amount.first_bend_point,
            });
        }
    }
    for (row, pair) in amounts.windows(2).enumerate() {
        if pair[1].effective_year <= pair[0].effective_year {
            return Err(ConfigError::UnsortedTable {
                table: TABLE,
                row: row + 1,
                previous: pair[0].effective_year as f64,
                current: pair[1].effective_year as f64,
            });
        }
    }
    Ok(())
}

/// WEP inputs for one plan year: the factor schedule plus that year's bend point
#[derive(Debug, Clone, Copy)]
pub struct WepParameters<'a> {
    pub year: i32,
    pub factors: &'a BendPointTable,
    pub first_bend_point: f64,
}
