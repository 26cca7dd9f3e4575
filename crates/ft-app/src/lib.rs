//! Shared application service layer for flowtime.
//!
//! Wraps the flow models and the inverse solver behind services used by the
//! CLI: forward evaluation, inverse solve with caller-driven retries, model
//! selection, parallel diameter sweeps and scenario batch runs.

pub mod error;
pub mod report;
pub mod run_service;
pub mod scenario_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use run_service::{SweepRow, forward, select, solve, solve_with_retries, sweep};
pub use scenario_service::{
    AnalysisOutcome, AnalysisReport, ScenarioReport, load_scenario, run_scenario,
    scenario_max_retries, scenario_model, scenario_solver_config, scenario_state,
};
