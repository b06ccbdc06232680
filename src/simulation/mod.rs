//! Growth simulation for FIRE and TSP projections

mod engine;
mod fire;
mod state;
mod trace;

pub use fire::{evaluate_fire, fire_number, inflation_adjusted, FireFigures};
pub use engine::{GrowthSimulator, SimulationConfig, HARD_CEILING_YEARS};
pub use state::GrowthState;
pub use trace::{GrowthOutcome, Termination, YearRow};
