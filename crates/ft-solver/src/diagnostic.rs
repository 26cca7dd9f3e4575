//! Structured report of one inverse solve attempt.
//!
//! A `Diagnostic` is produced for every call, successful or not, and carries
//! enough of the input and the search trajectory to reproduce it.

use crate::retry::{AttemptRecord, RetryContext};
use ft_components::{FlowState, ModelKind, RegimeDiagnostics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-checkable outcome tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "converged")]
    Converged,
    #[serde(rename = "target time out of bracket")]
    OutOfBracket,
    #[serde(rename = "hit bracket bound (no interior root)")]
    BoundaryHit,
    #[serde(rename = "result rejected by residual check")]
    ResidualRejected,
    #[serde(rename = "max iterations exhausted")]
    MaxIterations,
    #[serde(rename = "non-finite forward result")]
    NonFinite,
    #[serde(rename = "invalid input")]
    InvalidInput,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Converged => "converged",
            Reason::OutOfBracket => "target time out of bracket",
            Reason::BoundaryHit => "hit bracket bound (no interior root)",
            Reason::ResidualRejected => "result rejected by residual check",
            Reason::MaxIterations => "max iterations exhausted",
            Reason::NonFinite => "non-finite forward result",
            Reason::InvalidInput => "invalid input",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bracket endpoints with their forward times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracketSnapshot {
    pub area_lo_m2: f64,
    pub area_hi_m2: f64,
    /// Forward time at `area_lo_m2` (s); the longer of the two
    pub time_lo_s: f64,
    /// Forward time at `area_hi_m2` (s)
    pub time_hi_s: f64,
}

/// Choking state of the restriction at the candidate area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChokingState {
    pub critical_ratio: f64,
    pub choked: bool,
    /// Downstream/upstream pressure ratio at the initial state
    pub instantaneous_ratio: f64,
}

impl From<&RegimeDiagnostics> for ChokingState {
    fn from(regime: &RegimeDiagnostics) -> Self {
        Self {
            critical_ratio: regime.critical_ratio,
            choked: regime.choked,
            instantaneous_ratio: regime.initial_ratio,
        }
    }
}

/// Record of one solve attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// SI input snapshot
    pub input: FlowState,
    pub model: ModelKind,
    /// Why `model` was used
    pub rationale: String,
    pub target_time_s: f64,
    /// Forward time at the candidate, when one was reached
    pub achieved_time_s: Option<f64>,
    pub candidate_area_m2: Option<f64>,
    /// Relative residual |t − t_target| / max(t_target, floor) at the candidate
    pub residual: Option<f64>,
    pub initial_bracket: Option<BracketSnapshot>,
    /// Bracket at termination
    pub final_bracket: Option<BracketSnapshot>,
    /// Every bracket tried during expansion, in order
    pub bracket_history: Vec<BracketSnapshot>,
    pub expansions: usize,
    pub iterations: usize,
    pub choking: Option<ChokingState>,
    pub reason: Reason,
    /// Free-form detail for the failure
    pub detail: Option<String>,
    /// Forward-model validity warnings at the candidate
    pub warnings: Vec<String>,
    /// Zero for the first attempt
    pub attempt: u32,
    pub expansion_factor: f64,
    /// Earlier attempts threaded through the retry context
    pub retry_history: Vec<AttemptRecord>,
}

impl Diagnostic {
    /// One-line description for error display.
    pub fn summary(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{}: {}", self.reason, detail),
            None => self.reason.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.reason == Reason::Converged
    }
}

/// Accumulates a `Diagnostic` while the solver runs.
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    diag: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(
        input: &FlowState,
        model: ModelKind,
        rationale: impl Into<String>,
        target_time_s: f64,
        retry: &RetryContext,
    ) -> Self {
        Self {
            diag: Diagnostic {
                input: input.clone(),
                model,
                rationale: rationale.into(),
                target_time_s,
                achieved_time_s: None,
                candidate_area_m2: None,
                residual: None,
                initial_bracket: None,
                final_bracket: None,
                bracket_history: Vec::new(),
                expansions: 0,
                iterations: 0,
                choking: None,
                reason: Reason::InvalidInput,
                detail: None,
                warnings: Vec::new(),
                attempt: retry.attempt,
                expansion_factor: retry.expansion_factor,
                retry_history: retry.history.clone(),
            },
        }
    }

    /// Record a bracket; the first one recorded is the initial bracket.
    pub fn bracket(&mut self, snapshot: BracketSnapshot) -> &mut Self {
        if self.diag.initial_bracket.is_none() {
            self.diag.initial_bracket = Some(snapshot);
        }
        self.diag.bracket_history.push(snapshot);
        self.diag.final_bracket = Some(snapshot);
        self
    }

    /// Update the bracket at termination without adding to the history.
    pub fn final_bracket(&mut self, snapshot: BracketSnapshot) -> &mut Self {
        self.diag.final_bracket = Some(snapshot);
        self
    }

    pub fn expansions(&mut self, n: usize) -> &mut Self {
        self.diag.expansions = n;
        self
    }

    pub fn iterations(&mut self, n: usize) -> &mut Self {
        self.diag.iterations = n;
        self
    }

    pub fn candidate(&mut self, area_m2: f64, time_s: f64, residual: f64) -> &mut Self {
        self.diag.candidate_area_m2 = Some(area_m2);
        self.diag.achieved_time_s = Some(time_s);
        self.diag.residual = Some(residual);
        self
    }

    pub fn regime(&mut self, regime: &RegimeDiagnostics) -> &mut Self {
        self.diag.choking = Some(ChokingState::from(regime));
        self
    }

    pub fn warnings(&mut self, warnings: &[String]) -> &mut Self {
        self.diag.warnings = warnings.to_vec();
        self
    }

    pub fn detail(&mut self, detail: impl Into<String>) -> &mut Self {
        self.diag.detail = Some(detail.into());
        self
    }

    pub fn build(&self, reason: Reason) -> Diagnostic {
        let mut diag = self.diag.clone();
        diag.reason = reason;
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_components::{Process, ThermoRegime};
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

    fn snapshot(lo: f64, hi: f64) -> BracketSnapshot {
        BracketSnapshot {
            area_lo_m2: lo,
            area_hi_m2: hi,
            time_lo_s: 1.0 / lo,
            time_hi_s: 1.0 / hi,
        }
    }

    #[test]
    fn first_bracket_is_initial_last_is_final() {
        let mut b = DiagnosticBuilder::new(
            &state(),
            ModelKind::Orifice,
            "test",
            100.0,
            &RetryContext::default(),
        );
        b.bracket(snapshot(1e-12, 1e-4)).bracket(snapshot(1e-13, 4e-4));
        let diag = b.build(Reason::OutOfBracket);
        assert_eq!(diag.initial_bracket, Some(snapshot(1e-12, 1e-4)));
        assert_eq!(diag.final_bracket, Some(snapshot(1e-13, 4e-4)));
        assert_eq!(diag.bracket_history.len(), 2);
        assert!(!diag.is_success());
    }

    #[test]
    fn reason_serializes_as_machine_string() {
        let json = serde_json::to_string(&Reason::BoundaryHit).unwrap();
        assert_eq!(json, "\"hit bracket bound (no interior root)\"");
        assert_eq!(Reason::OutOfBracket.as_str(), "target time out of bracket");
        let back: Reason = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Reason::BoundaryHit);
    }

    #[test]
    fn summary_includes_detail() {
        let mut b = DiagnosticBuilder::new(
            &state(),
            ModelKind::Orifice,
            "test",
            100.0,
            &RetryContext::default(),
        );
        b.detail("target time must be positive");
        let diag = b.build(Reason::InvalidInput);
        assert_eq!(diag.summary(), "invalid input: target time must be positive");
    }
}
