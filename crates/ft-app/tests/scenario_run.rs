//! Scenario batch runs through the ft-app service layer.

use ft_app::report::render_scenario;
use ft_app::{AnalysisOutcome, ScenarioReport, load_scenario, run_scenario};
use ft_components::ModelKind;
use ft_project::Scenario;
use std::path::PathBuf;

fn scenario_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("scenarios");
    path.push(name);
    path
}

fn outcome<'a>(report: &'a ScenarioReport, id: &str) -> &'a AnalysisOutcome {
    &report
        .analyses
        .iter()
        .find(|a| a.id == id)
        .unwrap_or_else(|| panic!("analysis {id} missing"))
        .outcome
}

const UNREACHABLE: &str = r#"
version: 1
name: unreachable target
vessel:
  volume_m3: 2.0e-7
  p_initial_pa: 1.2e6
  temperature_k: 288.15
process:
  type: blowdown
  p_final_pa: 1000.0
restriction:
  length_m: 0.002
gas:
  kind: preset
  key: air
model: orifice
solver:
  max_retries: 1
analyses:
  - id: forever
    type: inverse
    target_time_s: 1.0e15
  - id: d9um
    type: forward
    diameter_m: 9.0e-6
"#;

#[test]
fn reference_blowdown_runs_every_analysis() {
    let scenario = load_scenario(&scenario_path("reference_blowdown.yaml")).unwrap();
    let report = run_scenario(&scenario).unwrap();

    assert_eq!(report.analyses.len(), 4);
    assert_eq!(report.failures(), 0);

    let t9 = match outcome(&report, "d9um") {
        AnalysisOutcome::Forward(eval) => {
            assert_eq!(eval.primary.model, ModelKind::Orifice);
            eval.primary.time_s
        }
        other => panic!("expected forward outcome, got {other:?}"),
    };
    assert!(t9 > 150.0 && t9 < 230.0, "t(9 µm) = {t9}");

    match outcome(&report, "d5um") {
        AnalysisOutcome::Forward(eval) => {
            // t·A is constant for a fixed state
            let expected = t9 * (9.0f64 / 5.0).powi(2);
            let rel = (eval.primary.time_s - expected).abs() / expected;
            assert!(rel < 1e-6, "rel = {rel}");
        }
        other => panic!("expected forward outcome, got {other:?}"),
    }

    match outcome(&report, "three_minutes") {
        AnalysisOutcome::Inverse(result) => {
            let expected_um = 9.0 * (t9 / 180.0).sqrt();
            let d_um = result.diameter_m * 1e6;
            assert!((d_um - expected_um).abs() / expected_um < 0.03, "D = {d_um} µm");
            assert!((result.achieved_time_s() - 180.0).abs() / 180.0 < 0.05);
        }
        other => panic!("expected inverse outcome, got {other:?}"),
    }

    match outcome(&report, "micro_sweep") {
        AnalysisOutcome::Sweep { rows } => {
            assert_eq!(rows.len(), 21);
            assert!(
                rows.windows(2).all(|w| w[1].time_s < w[0].time_s),
                "sweep times must fall with diameter"
            );
        }
        other => panic!("expected sweep outcome, got {other:?}"),
    }

    let text = render_scenario(&report, false);
    assert!(text.contains("[three_minutes]"));
    assert!(text.contains("µm"));
}

#[test]
fn capillary_filling_scenario_runs() {
    let scenario = load_scenario(&scenario_path("capillary_filling.yaml")).unwrap();
    let report = run_scenario(&scenario).unwrap();
    assert_eq!(report.analyses.len(), 2);
    assert!(matches!(
        outcome(&report, "d50um"),
        AnalysisOutcome::Forward(_)
    ));
}

#[test]
fn inverse_failure_is_recorded_not_fatal() {
    let scenario: Scenario = serde_yaml::from_str(UNREACHABLE).unwrap();
    let report = run_scenario(&scenario).unwrap();

    assert_eq!(report.failures(), 1);
    match outcome(&report, "forever") {
        AnalysisOutcome::InverseFailed { error, diagnostic } => {
            assert!(error.contains("target time out of bracket"), "{error}");
            assert_eq!(diagnostic.attempt, 1);
            assert_eq!(diagnostic.retry_history.len(), 1);
            assert!(diagnostic.initial_bracket.is_some());
        }
        other => panic!("expected failure outcome, got {other:?}"),
    }
    assert!(matches!(
        outcome(&report, "d9um"),
        AnalysisOutcome::Forward(_)
    ));

    // Failure diagnostics are rendered even without --diagnostics
    let text = render_scenario(&report, false);
    assert!(text.contains("FAILED"));
    assert!(text.contains("diagnostic: target time out of bracket"));
}

#[test]
fn report_serializes_with_tagged_outcomes() {
    let scenario: Scenario = serde_yaml::from_str(UNREACHABLE).unwrap();
    let report = run_scenario(&scenario).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["analyses"][0]["outcome"]["type"], "inverse_failed");
    assert_eq!(json["analyses"][1]["outcome"]["type"], "forward");

    let back: ScenarioReport = serde_json::from_value(json).unwrap();
    assert_eq!(back.failures(), 1);
}
