//! Versioned, read-only formula tables
//!
//! Every statutory constant the calculators share lives here: WEP bend
//! points, match schedules, and contribution limits. Tables are validated
//! once when built and only ever borrowed afterwards.

mod bend_points;
mod limits;
mod match_tiers;
pub mod loader;

pub use bend_points::{published_wep_bend_amounts, BendPointRow, BendPointTable, WepBendAmount, WepParameters};
pub use limits::{ContributionLimitTable, ContributionLimits, CATCH_UP_AGE};
pub use loader::LoadedTables;
pub use match_tiers::{MatchSchedule, MatchTier, PlanVariant};

use crate::error::{ConfigError, TableLoadError};
use log::{debug, warn};
use std::path::Path;
use std::sync::OnceLock;

/// Fraction of a non-covered pension that offsets spousal/survivor benefits
pub const GPO_OFFSET_FRACTION: f64 = 2.0 / 3.0;

static PUBLISHED: OnceLock<FormulaTables> = OnceLock::new();

/// Container for all formula tables
#[derive(Debug, Clone)]
pub struct FormulaTables {
    pub wep_factors: BendPointTable,
    wep_bend_amounts: Vec<WepBendAmount>,
    match_schedules: Vec<MatchSchedule>,
    pub limits: ContributionLimitTable,
}

impl FormulaTables {
    /// Published tables, built once and shared for the life of the process
    pub fn published() -> &'static FormulaTables {
        PUBLISHED.get_or_init(Self::published_owned)
    }

    /// Owned copy of the published tables
    pub fn published_owned() -> Self {
        Self {
            wep_factors: BendPointTable::wep_standard(),
            wep_bend_amounts: published_wep_bend_amounts(),
            match_schedules: vec![MatchSchedule::tsp(), MatchSchedule::generic_401k()],
            limits: ContributionLimitTable::published(),
        }
    }

    /// Load tables from CSV files in the default location (data/tables/)
    pub fn from_csv() -> Result<Self, TableLoadError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_TABLES_PATH))
    }

    /// Load tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, TableLoadError> {
        let loaded = LoadedTables::load_from(path)?;
        let tables = Self::from_loaded(loaded).map_err(|err| {
            warn!("rejecting formula tables in {}: {}", path.display(), err);
            err
        })?;
        debug!(
            "loaded formula tables from {} ({} limit years, {} match schedules)",
            path.display(),
            tables.limits.entries().len(),
            tables.match_schedules.len()
        );
        Ok(tables)
    }

    /// Validate raw loaded rows into usable tables
    pub fn from_loaded(loaded: LoadedTables) -> Result<Self, ConfigError> {
        let wep_factors = BendPointTable::new("WEP factor", loaded.bend_points)?;
        bend_points::validate_bend_amounts(&loaded.wep_bend_amounts)?;

        let mut match_schedules = Vec::with_capacity(loaded.match_schedules.len());
        for schedule in loaded.match_schedules {
            let automatic = schedule.automatic_pcts.first().copied().unwrap_or(0.0);
            if schedule.automatic_pcts.iter().any(|&pct| pct != automatic) {
                return Err(ConfigError::ConflictingAutomatic {
                    variant: schedule.variant.to_string(),
                });
            }
            match_schedules.push(MatchSchedule::new(schedule.variant, automatic, schedule.tiers)?);
        }

        Ok(Self {
            wep_factors,
            wep_bend_amounts: loaded.wep_bend_amounts,
            match_schedules,
            limits: ContributionLimitTable::new(loaded.contribution_limits)?,
        })
    }

    /// WEP factor schedule together with the bend point in effect for `year`
    pub fn wep_parameters(&self, year: i32) -> Result<WepParameters<'_>, ConfigError> {
        let amount = self
            .wep_bend_amounts
            .iter()
            .rev()
            .find(|a| a.effective_year <= year)
            .ok_or(ConfigError::NoEffectiveEntry {
                table: "WEP bend amount",
                year,
            })?;
        Ok(WepParameters {
            year,
            factors: &self.wep_factors,
            first_bend_point: amount.first_bend_point,
        })
    }

    pub fn match_schedule(&self, variant: PlanVariant) -> Result<&MatchSchedule, ConfigError> {
        self.match_schedules
            .iter()
            .find(|s| s.variant() == variant)
            .ok_or_else(|| ConfigError::MissingVariant {
                variant: variant.to_string(),
            })
    }

    pub fn limits_for(&self, year: i32) -> Result<&ContributionLimits, ConfigError> {
        self.limits.for_year(year)
    }

    /// Plan year to use when none is given: `current`, held back to the
    /// newest year with published limits
    pub fn default_plan_year(&self, current: i32) -> i32 {
        let latest = self.limits.latest_year();
        if current > latest {
            warn!("no contribution limits published for {}, using {}", current, latest);
        }
        current.min(latest)
    }

    pub fn wep_bend_amounts(&self) -> &[WepBendAmount] {
        &self.wep_bend_amounts
    }
}
