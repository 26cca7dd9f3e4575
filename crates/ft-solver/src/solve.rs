//! Inverse solve: restriction area from a target elapsed time.
//!
//! Initialize → Bracket → Expand (0..max_expansions) → Bisect → Validate.
//! Bisection runs on the geometric midpoint so that areas spanning many
//! decades are searched evenly. Every exit path builds a `Diagnostic`.

use crate::bracket::{Bracket, Endpoint, expanded_areas, initial_areas, upper_area_cap};
use crate::config::SolverConfig;
use crate::diagnostic::{Diagnostic, DiagnosticBuilder, Reason};
use crate::error::{ErrorKind, SolverError};
use crate::retry::RetryContext;
use crate::selector::{FORCED_RATIONALE, ModelChoice, select_model};
use ft_components::{FlowModel, FlowState, ForwardResult, ModelKind};
use ft_core::{diameter_from_area, relative_difference};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Per-call solve options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveOptions {
    pub model: ModelChoice,
    pub config: SolverConfig,
    /// Context threaded from a failed earlier attempt
    pub retry: RetryContext,
}

impl SolveOptions {
    pub fn with_model(model: ModelChoice) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }
}

/// Successful inverse solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    pub area_m2: f64,
    pub diameter_m: f64,
    /// Relative time residual at the solution
    pub residual: f64,
    pub iterations: usize,
    /// Forward evaluation at the solution
    pub forward: ForwardResult,
    pub diagnostic: Diagnostic,
}

impl SolverResult {
    pub fn achieved_time_s(&self) -> f64 {
        self.forward.time_s
    }
}

/// Solve for the area whose forward time equals `target_time_s`.
///
/// With `ModelChoice::Auto` a first pass uses the orifice model; the selector
/// is then re-run at the solved diameter and, if it picks the capillary, the
/// solve is repeated with that model. If the orifice pass itself fails, a
/// capillary solve is tried and kept when the selector confirms it.
pub fn solve_area_from_time(
    state: &FlowState,
    target_time_s: f64,
    options: &SolveOptions,
) -> Result<SolverResult, SolverError> {
    if let Some(model) = options.model.forced() {
        return solve_with_model(
            state,
            target_time_s,
            model.model(),
            FORCED_RATIONALE,
            &options.config,
            &options.retry,
        );
    }

    let first = select_model(state, None, None).map_err(|e| {
        invalid_input(
            state,
            target_time_s,
            ModelKind::Orifice,
            &options.retry,
            e.to_string(),
        )
    })?;
    let first_pass = match solve_with_model(
        state,
        target_time_s,
        first.model.model(),
        &first.rationale,
        &options.config,
        &options.retry,
    ) {
        Ok(result) => result,
        Err(err) if err.kind() == ErrorKind::InvalidInput => return Err(err),
        Err(err) => return capillary_fallback(state, target_time_s, options, &first.rationale, err),
    };

    let reselect = select_model(state, Some(first_pass.diameter_m), None).map_err(|e| {
        invalid_input(state, target_time_s, first.model, &options.retry, e.to_string())
    })?;
    if reselect.model == first.model {
        let mut result = first_pass;
        result.diagnostic.rationale = format!("{}; confirmed {}", first.rationale, reselect.rationale);
        return Ok(result);
    }

    info!(
        from = %first.model,
        to = %reselect.model,
        "re-solving with re-selected model"
    );
    let rationale = format!(
        "{}; first pass gave D = {:.3e} m, re-selected {}",
        first.rationale, first_pass.diameter_m, reselect.rationale
    );
    solve_with_model(
        state,
        target_time_s,
        reselect.model.model(),
        &rationale,
        &options.config,
        &options.retry,
    )
}

/// The orifice pass failed; a capillary root is kept only if the selector
/// agrees with it at the solved diameter, otherwise the orifice error stands.
fn capillary_fallback(
    state: &FlowState,
    target_time_s: f64,
    options: &SolveOptions,
    first_rationale: &str,
    orifice_err: SolverError,
) -> Result<SolverResult, SolverError> {
    let reason = orifice_err.diagnostic().reason;
    info!(%reason, "orifice pass failed, trying capillary");
    let rationale = format!("{first_rationale}; orifice pass failed ({reason}), trying capillary");
    let Ok(mut result) = solve_with_model(
        state,
        target_time_s,
        ModelKind::Capillary.model(),
        &rationale,
        &options.config,
        &options.retry,
    ) else {
        return Err(orifice_err);
    };

    match select_model(state, Some(result.diameter_m), None) {
        Ok(check) if check.model == ModelKind::Capillary => {
            result.diagnostic.rationale = format!("{rationale}; confirmed {}", check.rationale);
            Ok(result)
        }
        _ => Err(orifice_err),
    }
}

fn invalid_input(
    state: &FlowState,
    target_time_s: f64,
    model: ModelKind,
    retry: &RetryContext,
    detail: String,
) -> SolverError {
    let mut builder = DiagnosticBuilder::new(state, model, "", target_time_s, retry);
    builder.detail(detail);
    SolverError::new(ErrorKind::InvalidInput, builder.build(Reason::InvalidInput))
}

/// Solve with one fixed model.
///
/// This is the bracketing root-finder proper; it never retries on failure.
pub fn solve_with_model(
    state: &FlowState,
    target_time_s: f64,
    model: &dyn FlowModel,
    rationale: &str,
    config: &SolverConfig,
    retry: &RetryContext,
) -> Result<SolverResult, SolverError> {
    let mut diag = DiagnosticBuilder::new(state, model.kind(), rationale, target_time_s, retry);
    let fail = |diag: &DiagnosticBuilder, kind: ErrorKind| {
        let d = diag.build(kind.reason());
        warn!(reason = %d.reason, model = %d.model, "solve failed");
        SolverError::new(kind, d)
    };

    // Initialize
    if !target_time_s.is_finite() || target_time_s <= 0.0 {
        diag.detail(format!("target time must be finite and positive, got {target_time_s}"));
        return Err(fail(&diag, ErrorKind::InvalidInput));
    }
    if let Err(msg) = config.validate() {
        diag.detail(msg);
        return Err(fail(&diag, ErrorKind::InvalidInput));
    }
    if !retry.expansion_factor.is_finite() || retry.expansion_factor < 1.0 {
        diag.detail(format!(
            "expansion factor must be finite and at least 1, got {}",
            retry.expansion_factor
        ));
        return Err(fail(&diag, ErrorKind::InvalidInput));
    }
    if let Err(e) = state.validate() {
        diag.detail(e.to_string());
        return Err(fail(&diag, ErrorKind::InvalidInput));
    }

    let evaluate = |area_m2: f64| -> Result<ForwardResult, String> {
        model
            .forward_time_for_area(state, area_m2)
            .map_err(|e| e.to_string())
    };
    let endpoint = |area_m2: f64| -> Result<Endpoint, String> {
        evaluate(area_m2).map(|r| Endpoint {
            area_m2,
            time_s: r.time_s,
        })
    };

    // Bracket / Expand
    let factor = retry.expansion_factor;
    let (mut lo_m2, mut hi_m2) = initial_areas(state, config, factor);
    let mut expansions = 0;
    let bracket = loop {
        let (lo, hi) = match (endpoint(lo_m2), endpoint(hi_m2)) {
            (Ok(lo), Ok(hi)) => (lo, hi),
            (Err(e), _) | (_, Err(e)) => {
                diag.detail(e);
                return Err(fail(&diag, ErrorKind::InvalidInput));
            }
        };
        let bracket = Bracket::new(lo, hi);
        diag.bracket(bracket.snapshot()).expansions(expansions);
        debug!(
            expansions,
            area_lo = lo.area_m2,
            area_hi = hi.area_m2,
            time_lo = lo.time_s,
            time_hi = hi.time_s,
            target = target_time_s,
            "bracket"
        );
        if lo.time_s.is_nan() || hi.time_s.is_nan() {
            diag.detail("forward time is NaN at a bracket endpoint");
            return Err(fail(&diag, ErrorKind::NonFiniteResult));
        }
        if bracket.contains(target_time_s) {
            break bracket;
        }
        if expansions >= config.max_expansions {
            diag.detail(format!(
                "target {target_time_s} s outside [{}, {}] s after {expansions} expansions",
                hi.time_s, lo.time_s
            ));
            return Err(fail(&diag, ErrorKind::BracketExhausted));
        }
        expansions += 1;
        let cap = upper_area_cap(state, config, factor, expansions);
        (lo_m2, hi_m2) = expanded_areas(lo_m2, hi_m2, cap, config);
    };
    let searched = bracket;

    // Bisect
    let residual_of = |t: f64| relative_difference(t, target_time_s, target_time_s, config.time_floor_s);
    let mut bracket = bracket;
    let mut iterations = 0;
    let candidate = loop {
        if iterations >= config.max_iters {
            diag.iterations(iterations).final_bracket(bracket.snapshot());
            diag.detail(format!(
                "no convergence after {iterations} iterations (ln width {:.3e})",
                bracket.log_width()
            ));
            return Err(fail(&diag, ErrorKind::NonConvergent));
        }
        let mid_m2 = bracket.midpoint();
        let mid = match endpoint(mid_m2) {
            Ok(mid) => mid,
            Err(e) => {
                diag.iterations(iterations).final_bracket(bracket.snapshot());
                diag.detail(e);
                return Err(fail(&diag, ErrorKind::InvalidInput));
            }
        };
        iterations += 1;
        if mid.time_s.is_nan() {
            diag.iterations(iterations).final_bracket(bracket.snapshot());
            diag.detail(format!("forward time is NaN at A = {mid_m2:e} m²"));
            return Err(fail(&diag, ErrorKind::NonFiniteResult));
        }
        let residual = residual_of(mid.time_s);
        trace!(iterations, area = mid_m2, time = mid.time_s, residual, "bisect");
        if residual <= config.residual_tol {
            break mid_m2;
        }
        bracket = bracket.step(mid, target_time_s);
        if bracket.log_width() <= config.log_width_tol {
            break mid_m2;
        }
    };
    diag.iterations(iterations).final_bracket(bracket.snapshot());

    // Validate: boundary
    let near = |a: f64, b: f64| relative_difference(a, b, b, f64::MIN_POSITIVE) <= config.bound_rel_tol;
    if near(candidate, searched.lo().area_m2) || near(candidate, searched.hi().area_m2) {
        diag.detail(format!(
            "candidate A = {candidate:e} m² coincides with a searched endpoint [{:e}, {:e}] m²",
            searched.lo().area_m2,
            searched.hi().area_m2
        ));
        return Err(fail(&diag, ErrorKind::BoundaryHit));
    }

    // Validate: residual
    let forward = match evaluate(candidate) {
        Ok(r) => r,
        Err(e) => {
            diag.detail(e);
            return Err(fail(&diag, ErrorKind::InvalidInput));
        }
    };
    let residual = residual_of(forward.time_s);
    diag.candidate(candidate, forward.time_s, residual)
        .regime(&forward.regime)
        .warnings(&forward.warnings);
    if !forward.time_s.is_finite() {
        diag.detail(format!("forward time {} at A = {candidate:e} m²", forward.time_s));
        return Err(fail(&diag, ErrorKind::NonFiniteResult));
    }
    let accept = config.accept_tol(&state.process);
    if residual > accept {
        diag.detail(format!(
            "residual {residual:.3e} exceeds {accept}: t = {} s vs target {target_time_s} s, bracket [{:e}, {:e}] m²",
            forward.time_s,
            searched.lo().area_m2,
            searched.hi().area_m2
        ));
        return Err(fail(&diag, ErrorKind::ResidualRejected));
    }

    let diameter_m = diameter_from_area(candidate);
    info!(
        model = %model.kind(),
        area = candidate,
        diameter = diameter_m,
        iterations,
        expansions,
        residual,
        "solve converged"
    );
    Ok(SolverResult {
        area_m2: candidate,
        diameter_m,
        residual,
        iterations,
        forward,
        diagnostic: diag.build(Reason::Converged),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_components::{OrificeModel, Process, ThermoRegime};
    use ft_fluids::Gas;

    fn state() -> FlowState {
        FlowState {
            volume_m3: 2e-7,
            p_initial_pa: 1.2e6,
            process: Process::Blowdown {
                p_final_pa: 1e3,
                p_back_pa: None,
            },
            temperature_k: 288.15,
            length_m: 0.002,
            gas: Gas::Air.properties(),
            cd: 0.62,
            epsilon: 0.01,
            regime: ThermoRegime::Isothermal,
        }
    }

    fn solve_orifice(target: f64, config: &SolverConfig) -> Result<SolverResult, SolverError> {
        solve_with_model(
            &state(),
            target,
            &OrificeModel,
            "test",
            config,
            &RetryContext::default(),
        )
    }

    #[test]
    fn recovers_reference_diameter() {
        let a = ft_core::area_from_diameter(9e-6);
        let t = OrificeModel.forward_time_for_area(&state(), a).unwrap().time_s;
        let res = solve_orifice(t, &SolverConfig::default()).unwrap();
        assert!((res.diameter_m / 9e-6 - 1.0).abs() < 1e-3, "D = {}", res.diameter_m);
        assert!(res.residual <= 1e-6);
        assert_eq!(res.diagnostic.reason, Reason::Converged);
        assert_eq!(res.diagnostic.expansions, 0);
        assert!(res.diagnostic.choking.unwrap().choked);
    }

    #[test]
    fn rejects_non_positive_target() {
        for target in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = solve_orifice(target, &SolverConfig::default()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
            assert!(err.diagnostic().initial_bracket.is_none());
        }
    }

    #[test]
    fn rejects_invalid_state_with_named_field() {
        let bad = FlowState {
            temperature_k: -1.0,
            ..state()
        };
        let err = solve_with_model(
            &bad,
            100.0,
            &OrificeModel,
            "test",
            &SolverConfig::default(),
            &RetryContext::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn unreachable_target_exhausts_bracket() {
        let err = solve_orifice(1e15, &SolverConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BracketExhausted);
        let d = err.diagnostic();
        assert_eq!(d.reason.as_str(), "target time out of bracket");
        assert_eq!(d.expansions, 4);
        assert_eq!(d.bracket_history.len(), 5);
        let fb = d.final_bracket.unwrap();
        assert!(fb.time_lo_s < 1e15);
    }

    #[test]
    fn iteration_cap_is_non_convergent() {
        let cfg = SolverConfig {
            max_iters: 3,
            ..Default::default()
        };
        let err = solve_orifice(180.0, &cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonConvergent);
        assert_eq!(err.diagnostic().iterations, 3);
    }

    #[test]
    fn auto_switches_to_capillary_for_long_channel() {
        let res = solve_area_from_time(&state(), 3600.0, &SolveOptions::default()).unwrap();
        assert_eq!(res.forward.model, ModelKind::Capillary);
        assert!(res.diagnostic.rationale.contains("re-selected"));
    }

    #[test]
    fn auto_tries_capillary_when_orifice_pass_is_exhausted() {
        // Beyond the orifice bracket but a ~1.1 µm capillary root
        let res = solve_area_from_time(&state(), 1e9, &SolveOptions::default()).unwrap();
        assert_eq!(res.forward.model, ModelKind::Capillary);
        assert!(res.diameter_m > 1.0e-6 && res.diameter_m < 1.25e-6, "D = {}", res.diameter_m);
        let rationale = &res.diagnostic.rationale;
        assert!(rationale.contains("orifice pass failed (target time out of bracket)"), "{rationale}");
        assert!(rationale.contains("confirmed"), "{rationale}");
    }

    #[test]
    fn auto_keeps_orifice_error_when_no_model_brackets() {
        let err = solve_area_from_time(&state(), 1e25, &SolveOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BracketExhausted);
        assert_eq!(err.diagnostic().model, ModelKind::Orifice);
    }

    #[test]
    fn forced_model_is_kept() {
        let opts = SolveOptions::with_model(ModelChoice::Orifice);
        let res = solve_area_from_time(&state(), 3600.0, &opts).unwrap();
        assert_eq!(res.forward.model, ModelKind::Orifice);
        assert_eq!(res.diagnostic.rationale, FORCED_RATIONALE);
    }
}
