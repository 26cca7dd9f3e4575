//! Integration tests for the area-from-time root-finder.

use ft_components::{
    CapillaryModel, FlowModel, FlowResult, FlowState, ForwardResult, ModelKind, OrificeModel,
    Process, ThermoRegime,
};
use ft_core::RestrictionGeometry;
use ft_fluids::Gas;
use ft_solver::bracket::initial_areas;
use ft_solver::{
    ErrorKind, ModelChoice, Reason, RetryContext, SolveOptions, SolverConfig, solve_area_from_time,
    solve_with_model,
};
use proptest::prelude::*;

fn blowdown() -> FlowState {
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

fn filling() -> FlowState {
    FlowState {
        p_initial_pa: 101_325.0,
        process: Process::Filling {
            p_supply_pa: 1e6,
            p_target_pa: 8e5,
        },
        ..blowdown()
    }
}

fn solve(
    state: &FlowState,
    model: &dyn FlowModel,
    target: f64,
    retry: &RetryContext,
) -> Result<ft_solver::SolverResult, ft_solver::SolverError> {
    solve_with_model(state, target, model, "test", &SolverConfig::default(), retry)
}

/// Orifice time everywhere except a strip of areas where it jumps.
struct Tampered<F: Fn(f64, f64) -> f64 + Send + Sync> {
    time: F,
}

impl<F: Fn(f64, f64) -> f64 + Send + Sync> FlowModel for Tampered<F> {
    fn kind(&self) -> ModelKind {
        ModelKind::Orifice
    }

    fn forward_time(
        &self,
        state: &FlowState,
        geometry: &RestrictionGeometry,
    ) -> FlowResult<ForwardResult> {
        let base = OrificeModel.forward_time(state, geometry)?;
        let time_s = (self.time)(geometry.area_m2(), base.time_s);
        Ok(ForwardResult { time_s, ..base })
    }
}

#[test]
fn critical_ratio_three_significant_figures() {
    let r_star = Gas::Air.properties().critical_pressure_ratio();
    assert_eq!(format!("{r_star:.3}"), "0.528");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn blowdown_round_trip_within_five_percent(exp in -11.0_f64..-8.0_f64) {
        let area = 10f64.powf(exp);
        for model in [&OrificeModel as &dyn FlowModel, &CapillaryModel] {
            let t = model.forward_time_for_area(&blowdown(), area).unwrap().time_s;
            let res = solve(&blowdown(), model, t, &RetryContext::default()).unwrap();
            prop_assert!((res.area_m2 / area - 1.0).abs() <= 0.05, "{} vs {}", res.area_m2, area);
        }
    }

    #[test]
    fn filling_round_trip_within_ten_percent(exp in -11.0_f64..-8.0_f64) {
        let area = 10f64.powf(exp);
        for model in [&OrificeModel as &dyn FlowModel, &CapillaryModel] {
            let t = model.forward_time_for_area(&filling(), area).unwrap().time_s;
            let res = solve(&filling(), model, t, &RetryContext::default()).unwrap();
            prop_assert!((res.area_m2 / area - 1.0).abs() <= 0.10, "{} vs {}", res.area_m2, area);
        }
    }
}

#[test]
fn adiabatic_round_trip() {
    let state = FlowState {
        regime: ThermoRegime::Adiabatic,
        ..blowdown()
    };
    let area = 3e-10;
    let t = OrificeModel.forward_time_for_area(&state, area).unwrap().time_s;
    let res = solve(&state, &OrificeModel, t, &RetryContext::default()).unwrap();
    assert!((res.area_m2 / area - 1.0).abs() < 1e-3);
}

#[test]
fn too_short_target_exhausts_bracket() {
    let err = solve(&blowdown(), &OrificeModel, 1e-12, &RetryContext::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BracketExhausted);
    let d = err.diagnostic();
    assert_eq!(d.reason, Reason::OutOfBracket);
    let fb = d.final_bracket.unwrap();
    assert!(fb.time_hi_s > 1e-12);
    assert!(fb.area_hi_m2 > d.initial_bracket.unwrap().area_hi_m2);
}

#[test]
fn endpoint_root_is_a_boundary_hit() {
    let state = blowdown();
    let (_, hi) = initial_areas(&state, &SolverConfig::default(), 1.0);
    // Nearly flat up to the upper end, then a drop exactly at it.
    let model = Tampered {
        time: move |a: f64, _t: f64| {
            if a >= hi {
                1.0
            } else {
                1000.0 * (1e-12 / a).powf(1e-3)
            }
        },
    };
    let err = solve(&state, &model, 500.0, &RetryContext::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BoundaryHit);
    assert_eq!(
        err.diagnostic().reason.as_str(),
        "hit bracket bound (no interior root)"
    );
}

#[test]
fn interior_jump_is_rejected_by_residual_check() {
    let model = Tampered {
        time: |a: f64, _t: f64| {
            if a >= 1e-9 {
                (1e-9 / a).powf(1e-3)
            } else {
                1000.0 * (1e-12 / a).powf(1e-3)
            }
        },
    };
    let err = solve(&blowdown(), &model, 500.0, &RetryContext::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResidualRejected);
    let d = err.diagnostic();
    assert!(d.residual.unwrap() > 0.05);
    assert!(d.achieved_time_s.is_some());
    assert!((d.candidate_area_m2.unwrap() / 1e-9 - 1.0).abs() < 1e-6);
}

#[test]
fn nan_forward_time_is_non_finite_result() {
    let model = Tampered {
        time: |a: f64, t: f64| if a > 1e-10 && a < 1e-6 { f64::NAN } else { t },
    };
    let err = solve(&blowdown(), &model, 1.0, &RetryContext::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NonFiniteResult);
}

#[test]
fn infinite_time_at_small_area_still_brackets() {
    // Overflow below 1e-10 m², t = 1 s at 1e-8 m²
    let model = Tampered {
        time: |a: f64, _t: f64| if a < 1e-10 { f64::INFINITY } else { 1e-8 / a },
    };
    let res = solve(&blowdown(), &model, 1.0, &RetryContext::default()).unwrap();
    assert!((res.area_m2 / 1e-8 - 1.0).abs() < 1e-3, "{}", res.area_m2);
    assert_eq!(res.diagnostic.reason, Reason::Converged);
    assert!(res.diagnostic.initial_bracket.unwrap().time_lo_s.is_infinite());
}

#[test]
fn retry_widens_bracket_and_threads_history() {
    let state = blowdown();
    let t16 = OrificeModel.forward_time_for_area(&state, 1e-16).unwrap().time_s;
    let target = 1.5 * t16;

    let first = RetryContext::default();
    let err = solve(&state, &OrificeModel, target, &first).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BracketExhausted);
    assert!(err.kind().is_retryable());

    let second = first.next(&err);
    assert_eq!(second.attempt, 1);
    assert_eq!(second.expansion_factor, 2.0);
    assert_eq!(second.history.len(), 1);
    assert_eq!(second.history[0].reason, Reason::OutOfBracket);

    let res = solve(&state, &OrificeModel, target, &second).unwrap();
    let d = &res.diagnostic;
    assert_eq!(d.attempt, 1);
    assert_eq!(d.retry_history, second.history);
    assert!((d.initial_bracket.unwrap().area_lo_m2 - 5e-13).abs() < 1e-25);
}

#[test]
fn auto_inverse_reports_both_passes() {
    let res = solve_area_from_time(&blowdown(), 3600.0, &SolveOptions::default()).unwrap();
    assert_eq!(res.forward.model, ModelKind::Capillary);
    let rationale = &res.diagnostic.rationale;
    assert!(rationale.contains("defaulting to orifice"), "{rationale}");
    assert!(rationale.contains("re-selected"), "{rationale}");
}

#[test]
fn short_orifice_stays_orifice_in_auto() {
    let state = FlowState {
        length_m: 1e-6,
        ..blowdown()
    };
    let res = solve_area_from_time(&state, 180.0, &SolveOptions::default()).unwrap();
    assert_eq!(res.forward.model, ModelKind::Orifice);
    assert!(res.diagnostic.rationale.contains("confirmed"));
}

#[test]
fn forced_capillary_round_trip() {
    let opts = SolveOptions::with_model(ModelChoice::Capillary);
    let res = solve_area_from_time(&blowdown(), 3600.0, &opts).unwrap();
    assert_eq!(res.diagnostic.model, ModelKind::Capillary);
    assert!((res.achieved_time_s() / 3600.0 - 1.0).abs() <= 1e-6);
}

#[test]
fn diagnostic_serializes_with_reason_string() {
    let err = solve(&blowdown(), &OrificeModel, 1e15, &RetryContext::default()).unwrap_err();
    let json = serde_json::to_string(err.diagnostic()).unwrap();
    assert!(json.contains("\"reason\":\"target time out of bracket\""));
    assert!(json.contains("\"bracket_history\""));
}
