//! Plain-text rendering of results and diagnostics.

use ft_components::{FlowState, ForwardResult, Process};
use ft_core::display::{in_bar, in_micrometers, in_minutes};
use ft_core::{m, pa, s};
use ft_solver::{BracketSnapshot, Diagnostic, ForwardEvaluation, Selection, SolverResult};
use std::fmt::Write;

use crate::run_service::SweepRow;
use crate::scenario_service::{AnalysisOutcome, ScenarioReport};

fn um(d_m: f64) -> f64 {
    in_micrometers(m(d_m))
}

fn time_text(t_s: f64) -> String {
    if !t_s.is_finite() {
        format!("{t_s} s")
    } else if t_s >= 120.0 {
        format!("{t_s:.3} s ({:.2} min)", in_minutes(s(t_s)))
    } else {
        format!("{t_s:.4} s")
    }
}

fn bracket_text(b: &BracketSnapshot) -> String {
    format!(
        "A in [{:.4e}, {:.4e}] m², t in [{}, {}]",
        b.area_lo_m2,
        b.area_hi_m2,
        time_text(b.time_hi_s),
        time_text(b.time_lo_s)
    )
}

pub fn render_state(state: &FlowState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  vessel: V = {:.4e} m³, P1 = {:.4} bar, T = {:.2} K",
        state.volume_m3,
        in_bar(pa(state.p_initial_pa)),
        state.temperature_k
    );
    match state.process {
        Process::Blowdown {
            p_final_pa,
            p_back_pa,
        } => {
            let _ = write!(out, "  blowdown to {:.4} bar", in_bar(pa(p_final_pa)));
            if let Some(pb) = p_back_pa {
                let _ = write!(out, " into {:.4} bar", in_bar(pa(pb)));
            }
            let _ = writeln!(out);
        }
        Process::Filling {
            p_supply_pa,
            p_target_pa,
        } => {
            let _ = writeln!(
                out,
                "  filling to {:.4} bar from a {:.4} bar supply",
                in_bar(pa(p_target_pa)),
                in_bar(pa(p_supply_pa))
            );
        }
    }
    let _ = writeln!(
        out,
        "  restriction: L = {:.4e} m, Cd = {}, eps = {}, {:?}",
        state.length_m, state.cd, state.epsilon, state.regime
    );
    let _ = writeln!(
        out,
        "  gas: R = {} J/(kg·K), gamma = {}, mu = {:.3e} Pa·s",
        state.gas.r_specific, state.gas.gamma, state.gas.viscosity
    );
    out
}

pub fn render_forward_result(r: &ForwardResult) -> String {
    let mut out = String::new();
    let g = &r.regime;
    let _ = writeln!(
        out,
        "  {}: D = {:.3} µm, t = {}",
        r.model,
        um(r.diameter_m),
        time_text(r.time_s)
    );
    let _ = writeln!(
        out,
        "    Re = {:.1}, L/D = {:.1}, r* = {:.4}, r0 = {:.4}, choked at start: {}",
        g.reynolds, g.l_over_d, g.critical_ratio, g.initial_ratio, g.choked
    );
    if let Some(mach) = g.mach {
        let _ = writeln!(out, "    throat Mach at start: {mach:.3}");
    }
    if let Some(p_tr) = g.transition_pressure_pa {
        let _ = writeln!(
            out,
            "    transition at {:.4} bar; choked {} + subsonic {}",
            in_bar(pa(p_tr)),
            time_text(g.choked_time_s),
            time_text(g.subsonic_time_s)
        );
    }
    for w in &r.warnings {
        let _ = writeln!(out, "    warning: {w}");
    }
    out
}

pub fn render_forward(eval: &ForwardEvaluation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "verdict: {} ({})", eval.verdict, eval.selection.rationale);
    out.push_str(&render_forward_result(&eval.primary));
    if let Some(other) = &eval.secondary {
        out.push_str(&render_forward_result(other));
    }
    if let Some(diff) = eval.relative_difference {
        let _ = writeln!(out, "  relative difference: {:.2} %", diff * 100.0);
    }
    out
}

pub fn render_selection(sel: &Selection) -> String {
    format!("model: {}\nrationale: {}\n", sel.model, sel.rationale)
}

pub fn render_diagnostic(d: &Diagnostic) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "diagnostic: {}", d.reason);
    if let Some(detail) = &d.detail {
        let _ = writeln!(out, "  detail: {detail}");
    }
    let _ = writeln!(out, "  model: {} ({})", d.model, d.rationale);
    let _ = writeln!(out, "  target: {}", time_text(d.target_time_s));
    if let Some(t) = d.achieved_time_s {
        let _ = writeln!(out, "  achieved: {}", time_text(t));
    }
    if let Some(a) = d.candidate_area_m2 {
        let _ = writeln!(out, "  candidate area: {a:.6e} m²");
    }
    if let Some(r) = d.residual {
        let _ = writeln!(out, "  residual: {r:.3e}");
    }
    if let Some(b) = &d.initial_bracket {
        let _ = writeln!(out, "  initial bracket: {}", bracket_text(b));
    }
    if let Some(b) = &d.final_bracket {
        let _ = writeln!(out, "  final bracket: {}", bracket_text(b));
    }
    let _ = writeln!(
        out,
        "  expansions: {}, iterations: {}",
        d.expansions, d.iterations
    );
    if let Some(c) = &d.choking {
        let _ = writeln!(
            out,
            "  choking: r* = {:.4}, ratio = {:.4}, choked = {}",
            c.critical_ratio, c.instantaneous_ratio, c.choked
        );
    }
    if d.attempt > 0 {
        let _ = writeln!(
            out,
            "  attempt {} (expansion factor {})",
            d.attempt, d.expansion_factor
        );
        for prior in &d.retry_history {
            let _ = writeln!(
                out,
                "    attempt {}: {} (factor {})",
                prior.attempt, prior.reason, prior.expansion_factor
            );
        }
    }
    for w in &d.warnings {
        let _ = writeln!(out, "  warning: {w}");
    }
    let _ = write!(out, "  input:\n{}", render_state(&d.input));
    out
}

/// Solver result; the diagnostic is included only when `diagnostics` is set.
pub fn render_solve(result: &SolverResult, diagnostics: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "D = {:.4} µm (A = {:.6e} m²), t = {}, residual {:.2e}, {} iterations",
        um(result.diameter_m),
        result.area_m2,
        time_text(result.achieved_time_s()),
        result.residual,
        result.iterations
    );
    out.push_str(&render_forward_result(&result.forward));
    if diagnostics {
        out.push_str(&render_diagnostic(&result.diagnostic));
    }
    out
}

pub fn render_sweep(rows: &[SweepRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>12}  {:>14}  {:>10}  {:>10}  {:>10}  {:>7}",
        "D [µm]", "t [s]", "model", "Re", "L/D", "choked"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>12.4}  {:>14.6e}  {:>10}  {:>10.1}  {:>10.1}  {:>7}",
            um(row.diameter_m),
            row.time_s,
            row.verdict.to_string(),
            row.reynolds,
            row.l_over_d,
            row.choked
        );
    }
    out
}

pub fn render_scenario(report: &ScenarioReport, diagnostics: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "scenario: {} (model: {})", report.name, report.model);
    out.push_str(&render_state(&report.state));
    for analysis in &report.analyses {
        let _ = writeln!(out, "\n[{}]", analysis.id);
        match &analysis.outcome {
            AnalysisOutcome::Forward(eval) => out.push_str(&render_forward(eval)),
            AnalysisOutcome::Inverse(result) => out.push_str(&render_solve(result, diagnostics)),
            AnalysisOutcome::InverseFailed { error, diagnostic } => {
                let _ = writeln!(out, "FAILED: {error}");
                out.push_str(&render_diagnostic(diagnostic));
            }
            AnalysisOutcome::Sweep { rows } => out.push_str(&render_sweep(rows)),
        }
    }
    out
}
