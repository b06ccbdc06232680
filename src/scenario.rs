//! Scenario runner for efficient batch calculations
//!
//! Holds one set of formula tables and assumptions, resolves plan-year and
//! plan-variant lookups, and runs many projections in parallel.

use crate::error::{EngineResult, TableLoadError};
use crate::facade::{
    compute_gpo_offset, compute_tsp_match, compute_wep_reduction, project_fire_number,
    project_tsp_balance, Assumptions,
};
use crate::formatter::{GpoOffsetResult, MatchResult, ProjectionResult, TspProjectionResult, WepReductionResult};
use crate::tables::{FormulaTables, PlanVariant};
use crate::validator::{RawGpoInput, RawMatchInput, RawProjectionInput, RawTspProjectionInput, RawWepInput};
use rayon::prelude::*;

/// Pre-loaded runner for batch calculations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// let results = runner.run_fire_batch(&inputs);
/// let wep = runner.wep(&raw_wep, 2024)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    tables: FormulaTables,
    assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with the published in-memory tables
    pub fn new() -> Self {
        Self::with_tables(FormulaTables::published().clone())
    }

    /// Create runner by loading tables from CSV files
    pub fn from_csv() -> Result<Self, TableLoadError> {
        Ok(Self::with_tables(FormulaTables::from_csv()?))
    }

    /// Create runner from a specific tables directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, TableLoadError> {
        Ok(Self::with_tables(FormulaTables::from_csv_path(path)?))
    }

    /// Create runner with pre-built tables
    pub fn with_tables(tables: FormulaTables) -> Self {
        Self {
            tables,
            assumptions: Assumptions::default(),
        }
    }

    pub fn with_assumptions(mut self, assumptions: Assumptions) -> Self {
        self.assumptions = assumptions;
        self
    }

    pub fn tables(&self) -> &FormulaTables {
        &self.tables
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn fire(&self, raw: &RawProjectionInput) -> EngineResult<ProjectionResult> {
        project_fire_number(raw, &self.assumptions)
    }

    /// Run many FIRE projections in parallel; results keep input order
    pub fn run_fire_batch(&self, inputs: &[RawProjectionInput]) -> Vec<EngineResult<ProjectionResult>> {
        inputs
            .par_iter()
            .map(|raw| project_fire_number(raw, &self.assumptions))
            .collect()
    }

    pub fn wep(&self, raw: &RawWepInput, plan_year: i32) -> EngineResult<WepReductionResult> {
        let params = self.tables.wep_parameters(plan_year)?;
        compute_wep_reduction(raw, &params, &self.assumptions)
    }

    pub fn gpo(&self, raw: &RawGpoInput) -> EngineResult<GpoOffsetResult> {
        compute_gpo_offset(raw, &self.assumptions)
    }

    pub fn tsp_match(
        &self,
        raw: &RawMatchInput,
        variant: PlanVariant,
        plan_year: i32,
    ) -> EngineResult<MatchResult> {
        let schedule = self.tables.match_schedule(variant)?;
        let limits = self.tables.limits_for(plan_year)?;
        compute_tsp_match(raw, schedule, limits, &self.assumptions)
    }

    pub fn tsp_projection(
        &self,
        raw: &RawTspProjectionInput,
        variant: PlanVariant,
        plan_year: i32,
    ) -> EngineResult<TspProjectionResult> {
        let schedule = self.tables.match_schedule(variant)?;
        let limits = self.tables.limits_for(plan_year)?;
        project_tsp_balance(raw, schedule, limits, &self.assumptions)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
