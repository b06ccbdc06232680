//! Output structures for growth simulations

use serde::{Deserialize, Serialize};

/// One simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRow {
    pub year: u32,
    /// Age at the end of the year
    pub age: u32,
    pub bop_balance: f64,
    pub growth: f64,
    pub contribution: f64,
    pub eop_balance: f64,
}

/// How a simulation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Balance already met the target; no years simulated
    AlreadyAtTarget,
    /// Balance reached the target within the horizon
    ReachedTarget,
    /// Iteration ceiling hit before the target
    Ceiling,
    /// Fixed horizon completed
    HorizonComplete,
}

/// Complete simulation result
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthOutcome {
    /// Years simulated (never above the ceiling)
    pub years: u32,
    pub final_balance: f64,
    pub termination: Termination,
    pub total_contributions: f64,
    pub total_growth: f64,
    /// Yearly rows, only when detailed output was requested
    pub rows: Vec<YearRow>,
}

impl GrowthOutcome {
    /// Target met, either at entry or during the simulation
    pub fn reached_target(&self) -> bool {
        matches!(
            self.termination,
            Termination::AlreadyAtTarget | Termination::ReachedTarget
        )
    }

    pub fn hit_ceiling(&self) -> bool {
        self.termination == Termination::Ceiling
    }
}
