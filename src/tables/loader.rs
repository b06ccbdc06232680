//! CSV-based formula table loader
//!
//! Loads versioned formula tables from CSV files in data/tables/

use super::bend_points::{BendPointRow, WepBendAmount};
use super::limits::ContributionLimits;
use super::match_tiers::{MatchTier, PlanVariant};
use crate::error::TableLoadError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// Default path to the tables directory
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

pub const BEND_POINTS_FILE: &str = "bend_points.csv";
pub const WEP_BEND_AMOUNTS_FILE: &str = "wep_bend_amounts.csv";
pub const MATCH_TIERS_FILE: &str = "match_tiers.csv";
pub const CONTRIBUTION_LIMITS_FILE: &str = "contribution_limits.csv";

fn read_rows<T: DeserializeOwned>(dir: &Path, file_name: &str) -> Result<Vec<T>, TableLoadError> {
    let path = dir.join(file_name);
    let file = File::open(&path).map_err(|source| TableLoadError::Io {
        path: path.clone(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|source| TableLoadError::Csv {
            path: path.clone(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load WEP factor rows (threshold_years, factor_pct)
pub fn load_bend_points(path: &Path) -> Result<Vec<BendPointRow>, TableLoadError> {
    read_rows(path, BEND_POINTS_FILE)
}

/// Load first bend point amounts by effective year
pub fn load_wep_bend_amounts(path: &Path) -> Result<Vec<WepBendAmount>, TableLoadError> {
    read_rows(path, WEP_BEND_AMOUNTS_FILE)
}

/// Load contribution limits by plan year
pub fn load_contribution_limits(path: &Path) -> Result<Vec<ContributionLimits>, TableLoadError> {
    read_rows(path, CONTRIBUTION_LIMITS_FILE)
}

#[derive(Debug, Deserialize)]
struct MatchTierRow {
    variant: String,
    automatic_pct: f64,
    contribution_pct_up_to: f64,
    match_ratio: f64,
}

/// Match tiers grouped by plan variant, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSchedule {
    pub variant: PlanVariant,
    pub automatic_pcts: Vec<f64>,
    pub tiers: Vec<MatchTier>,
}

/// Load match tiers; rows for one variant may not be interleaved with another
pub fn load_match_tiers(path: &Path) -> Result<Vec<LoadedSchedule>, TableLoadError> {
    let rows: Vec<MatchTierRow> = read_rows(path, MATCH_TIERS_FILE)?;

    let mut schedules: Vec<LoadedSchedule> = Vec::new();
    for row in rows {
        let variant: PlanVariant = row.variant.parse().map_err(|message| TableLoadError::Parse {
            path: path.join(MATCH_TIERS_FILE),
            message,
        })?;
        let tier = MatchTier::new(row.contribution_pct_up_to, row.match_ratio);

        match schedules.last_mut() {
            Some(current) if current.variant == variant => {
                current.automatic_pcts.push(row.automatic_pct);
                current.tiers.push(tier);
            }
            _ => {
                if schedules.iter().any(|s| s.variant == variant) {
                    return Err(TableLoadError::Parse {
                        path: path.join(MATCH_TIERS_FILE),
                        message: format!("rows for {} are not contiguous", variant),
                    });
                }
                schedules.push(LoadedSchedule {
                    variant,
                    automatic_pcts: vec![row.automatic_pct],
                    tiers: vec![tier],
                });
            }
        }
    }
    Ok(schedules)
}

/// Raw table contents read from one directory
pub struct LoadedTables {
    pub bend_points: Vec<BendPointRow>,
    pub wep_bend_amounts: Vec<WepBendAmount>,
    pub match_schedules: Vec<LoadedSchedule>,
    pub contribution_limits: Vec<ContributionLimits>,
}

impl LoadedTables {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, TableLoadError> {
        Self::load_from(Path::new(DEFAULT_TABLES_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self, TableLoadError> {
        Ok(Self {
            bend_points: load_bend_points(path)?,
            wep_bend_amounts: load_wep_bend_amounts(path)?,
            match_schedules: load_match_tiers(path)?,
            contribution_limits: load_contribution_limits(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("formula_engine_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_default_tables() {
        let result = LoadedTables::load_default();
        assert!(result.is_ok(), "Failed to load tables: {:?}", result.err());

        let tables = result.unwrap();
        assert_eq!(tables.bend_points.len(), 2);
        assert_eq!(tables.bend_points[0], BendPointRow::new(20.0, 40.0));
        assert!(tables.wep_bend_amounts.len() >= 4);
        assert_eq!(tables.match_schedules.len(), 2);
        assert_eq!(tables.match_schedules[0].variant, PlanVariant::Tsp);
        assert_eq!(tables.match_schedules[0].tiers.len(), 2);
        assert!(tables.contribution_limits.iter().any(|l| l.year == 2024));
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let err = LoadedTables::load_from(Path::new("does/not/exist")).err().unwrap();
        match err {
            TableLoadError::Io { path, .. } => assert!(path.ends_with(BEND_POINTS_FILE)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let dir = scratch_dir("unknown_variant");
        fs::write(
            dir.join(MATCH_TIERS_FILE),
            "variant,automatic_pct,contribution_pct_up_to,match_ratio\nfers_plus,1,3,1.0\n",
        )
        .unwrap();
        let err = load_match_tiers(&dir).unwrap_err();
        assert!(matches!(err, TableLoadError::Parse { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_interleaved_variants_rejected() {
        let dir = scratch_dir("interleaved");
        fs::write(
            dir.join(MATCH_TIERS_FILE),
            "variant,automatic_pct,contribution_pct_up_to,match_ratio\n\
             tsp,1,3,1.0\n\
             generic_401k,0,6,0.5\n\
             tsp,1,5,0.5\n",
        )
        .unwrap();
        let err = load_match_tiers(&dir).unwrap_err();
        assert!(err.to_string().contains("not contiguous"));
        fs::remove_dir_all(&dir).ok();
    }
}
