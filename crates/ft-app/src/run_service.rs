//! Forward, inverse, selection and sweep services.

use ft_components::{FlowState, ModelKind};
use ft_core::{RestrictionGeometry, logspace};
use ft_solver::{
    ForwardEvaluation, ModelChoice, RetryContext, Selection, SolveOptions,
    SolverConfig, SolverError, SolverResult, Verdict, solve_area_from_time,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Time for one diameter.
pub fn forward(
    state: &FlowState,
    diameter_m: f64,
    choice: ModelChoice,
    config: &SolverConfig,
) -> AppResult<ForwardEvaluation> {
    let geometry = RestrictionGeometry::from_diameter(diameter_m)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let eval = ft_solver::forward_time(state, &geometry, choice, config)?;
    info!(
        diameter_m,
        verdict = %eval.verdict,
        time_s = eval.primary.time_s,
        "forward evaluation"
    );
    Ok(eval)
}

/// Model selection for an optional candidate diameter.
pub fn select(
    state: &FlowState,
    diameter_m: Option<f64>,
    choice: ModelChoice,
) -> AppResult<Selection> {
    Ok(ft_solver::select_model(state, diameter_m, choice.forced())?)
}

/// Caller-driven retry loop around the inverse solver.
///
/// Retryable failures are re-attempted up to `max_retries` times with a
/// doubled expansion factor; the last error is returned otherwise.
pub fn solve_with_retries(
    state: &FlowState,
    target_time_s: f64,
    options: &SolveOptions,
    max_retries: u32,
) -> Result<SolverResult, SolverError> {
    let mut retry = options.retry.clone();
    loop {
        let attempt = SolveOptions {
            retry: retry.clone(),
            ..options.clone()
        };
        match solve_area_from_time(state, target_time_s, &attempt) {
            Ok(result) => return Ok(result),
            Err(err) if err.kind().is_retryable() && retry.attempt < max_retries => {
                warn!(
                    attempt = retry.attempt,
                    reason = %err.diagnostic().reason,
                    "retrying with a wider bracket"
                );
                retry = retry.next(&err);
            }
            Err(err) => return Err(err),
        }
    }
}

/// Inverse solve with the scenario's retry budget.
pub fn solve(
    state: &FlowState,
    target_time_s: f64,
    choice: ModelChoice,
    config: &SolverConfig,
    max_retries: u32,
) -> AppResult<SolverResult> {
    let options = SolveOptions {
        model: choice,
        config: *config,
        retry: RetryContext::default(),
    };
    let result = solve_with_retries(state, target_time_s, &options, max_retries)?;
    info!(
        target_time_s,
        diameter_m = result.diameter_m,
        model = %result.forward.model,
        "inverse solve"
    );
    Ok(result)
}

/// One row of a diameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub diameter_m: f64,
    pub area_m2: f64,
    pub model: ModelKind,
    pub verdict: Verdict,
    pub time_s: f64,
    pub reynolds: f64,
    pub l_over_d: f64,
    pub choked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<&ForwardEvaluation> for SweepRow {
    fn from(eval: &ForwardEvaluation) -> Self {
        let r = &eval.primary;
        Self {
            diameter_m: r.diameter_m,
            area_m2: r.area_m2,
            model: r.model,
            verdict: eval.verdict,
            time_s: r.time_s,
            reynolds: r.regime.reynolds,
            l_over_d: r.regime.l_over_d,
            choked: r.regime.choked,
            warnings: r.warnings.clone(),
        }
    }
}

/// Forward times at `points` log-spaced diameters, evaluated in parallel.
pub fn sweep(
    state: &FlowState,
    d_min_m: f64,
    d_max_m: f64,
    points: usize,
    choice: ModelChoice,
    config: &SolverConfig,
) -> AppResult<Vec<SweepRow>> {
    if !(d_min_m > 0.0 && d_max_m > d_min_m && d_max_m.is_finite()) {
        return Err(AppError::InvalidInput(format!(
            "sweep needs 0 < d_min < d_max, got [{d_min_m}, {d_max_m}]"
        )));
    }
    if points < 2 {
        return Err(AppError::InvalidInput(
            "sweep needs at least 2 points".to_string(),
        ));
    }
    state.validate()?;

    let rows = logspace(d_min_m, d_max_m, points)
        .into_par_iter()
        .map(|d| {
            let geometry = RestrictionGeometry::from_diameter(d)
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
            let eval = ft_solver::forward_time(state, &geometry, choice, config)?;
            Ok(SweepRow::from(&eval))
        })
        .collect::<AppResult<Vec<_>>>()?;
    info!(points, d_min_m, d_max_m, "sweep complete");
    Ok(rows)
}
