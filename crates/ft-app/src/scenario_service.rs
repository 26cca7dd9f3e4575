//! Scenario loading and batch execution.

use ft_components::{FlowState, Process, ThermoRegime};
use ft_project::schema::{AnalysisKind, ModelDef, ProcessDef, RegimeDef, Scenario};
use ft_solver::{Diagnostic, ForwardEvaluation, ModelChoice, SolverConfig, SolverResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::run_service::{self, SweepRow};

/// Retries used when a scenario does not set `solver.max_retries`.
pub const DEFAULT_MAX_RETRIES: u32 = 0;

/// Load and validate a scenario file (YAML, or JSON by extension).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    Ok(ft_project::load(path)?)
}

/// SI flow state described by a scenario.
pub fn scenario_state(scenario: &Scenario) -> AppResult<FlowState> {
    ft_project::validate_scenario(scenario)?;
    let process = match scenario.process {
        ProcessDef::Blowdown {
            p_final_pa,
            p_back_pa,
        } => Process::Blowdown {
            p_final_pa,
            p_back_pa,
        },
        ProcessDef::Filling {
            p_supply_pa,
            p_target_pa,
        } => Process::Filling {
            p_supply_pa,
            p_target_pa,
        },
    };
    let state = FlowState {
        volume_m3: scenario.vessel.volume_m3,
        p_initial_pa: scenario.vessel.p_initial_pa,
        process,
        temperature_k: scenario.vessel.temperature_k,
        length_m: scenario.restriction.length_m,
        gas: ft_project::resolve_gas(&scenario.gas)?,
        cd: scenario.restriction.cd,
        epsilon: scenario.epsilon,
        regime: match scenario.regime {
            RegimeDef::Isothermal => ThermoRegime::Isothermal,
            RegimeDef::Adiabatic => ThermoRegime::Adiabatic,
        },
    };
    state.validate()?;
    Ok(state)
}

pub fn scenario_model(scenario: &Scenario) -> ModelChoice {
    match scenario.model {
        ModelDef::Auto => ModelChoice::Auto,
        ModelDef::Orifice => ModelChoice::Orifice,
        ModelDef::Capillary => ModelChoice::Capillary,
    }
}

/// Solver defaults with the scenario's overrides applied.
pub fn scenario_solver_config(scenario: &Scenario) -> SolverConfig {
    let mut config = SolverConfig::default();
    if let Some(o) = &scenario.solver {
        if let Some(v) = o.max_iters {
            config.max_iters = v;
        }
        if let Some(v) = o.max_expansions {
            config.max_expansions = v;
        }
        if let Some(v) = o.residual_tol {
            config.residual_tol = v;
        }
        if let Some(v) = o.accept_tol_blowdown {
            config.accept_tol_blowdown = v;
        }
        if let Some(v) = o.accept_tol_filling {
            config.accept_tol_filling = v;
        }
    }
    config
}

pub fn scenario_max_retries(scenario: &Scenario) -> u32 {
    scenario
        .solver
        .as_ref()
        .and_then(|o| o.max_retries)
        .unwrap_or(DEFAULT_MAX_RETRIES)
}

/// Outcome of one scenario analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Forward(ForwardEvaluation),
    Inverse(Box<SolverResult>),
    /// Inverse solve that failed; the diagnostic is kept for display
    InverseFailed {
        error: String,
        diagnostic: Box<Diagnostic>,
    },
    Sweep { rows: Vec<SweepRow> },
}

impl AnalysisOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, AnalysisOutcome::InverseFailed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: String,
    pub outcome: AnalysisOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub model: ModelChoice,
    pub state: FlowState,
    pub analyses: Vec<AnalysisReport>,
}

impl ScenarioReport {
    pub fn failures(&self) -> usize {
        self.analyses
            .iter()
            .filter(|a| a.outcome.is_failure())
            .count()
    }
}

/// Run every analysis in `scenario`.
///
/// Inverse failures are recorded in the report rather than aborting the run;
/// invalid input still fails the whole scenario.
pub fn run_scenario(scenario: &Scenario) -> AppResult<ScenarioReport> {
    let state = scenario_state(scenario)?;
    let choice = scenario_model(scenario);
    let config = scenario_solver_config(scenario);
    let max_retries = scenario_max_retries(scenario);
    info!(name = %scenario.name, analyses = scenario.analyses.len(), "running scenario");

    let mut analyses = Vec::with_capacity(scenario.analyses.len());
    for analysis in &scenario.analyses {
        let outcome = match analysis.kind {
            AnalysisKind::Forward { diameter_m } => AnalysisOutcome::Forward(
                run_service::forward(&state, diameter_m, choice, &config)?,
            ),
            AnalysisKind::Inverse { target_time_s } => {
                match run_service::solve(&state, target_time_s, choice, &config, max_retries) {
                    Ok(result) => AnalysisOutcome::Inverse(Box::new(result)),
                    Err(AppError::Solver(err)) => {
                        warn!(id = %analysis.id, error = %err, "inverse analysis failed");
                        AnalysisOutcome::InverseFailed {
                            error: err.to_string(),
                            diagnostic: Box::new(err.into_diagnostic()),
                        }
                    }
                    Err(other) => return Err(other),
                }
            }
            AnalysisKind::Sweep {
                d_min_m,
                d_max_m,
                points,
            } => AnalysisOutcome::Sweep {
                rows: run_service::sweep(&state, d_min_m, d_max_m, points, choice, &config)?,
            },
        };
        analyses.push(AnalysisReport {
            id: analysis.id.clone(),
            outcome,
        });
    }

    Ok(ScenarioReport {
        name: scenario.name.clone(),
        model: choice,
        state,
        analyses,
    })
}
