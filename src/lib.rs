//! Formula Engine - Tiered financial formulas behind retirement calculators
//!
//! This library provides:
//! - FIRE-number projection with a bounded compound-growth simulator
//! - TSP/401(k) employer match with contribution limits by plan year
//! - WEP benefit reduction and GPO offset from bend-point tables
//! - Versioned, read-only formula tables (in-memory or CSV)
//! - Batch evaluation of many scenarios in parallel

pub mod error;
pub mod facade;
pub mod formatter;
pub mod resolver;
pub mod scenario;
pub mod simulation;
pub mod tables;
pub mod validator;

// Re-export commonly used types
pub use error::{ConfigError, EngineError, EngineResult, ValidationErrors};
pub use facade::{
    compute_gpo_offset, compute_tsp_match, compute_wep_reduction, project_fire_number,
    project_tsp_balance, Assumptions,
};
pub use formatter::{GpoOffsetResult, MatchResult, ProjectionResult, TspProjectionResult, WepReductionResult};
pub use scenario::ScenarioRunner;
pub use tables::{FormulaTables, PlanVariant};
