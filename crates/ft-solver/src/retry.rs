//! Caller-driven retry context.
//!
//! The solver never loops across failures. A caller that wants another attempt
//! derives the next context from the failed one, which widens the initial
//! bracket and threads the earlier outcome into the new diagnostic.

use crate::diagnostic::{BracketSnapshot, Reason};
use crate::error::SolverError;
use serde::{Deserialize, Serialize};

/// Outcome of one earlier attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub expansion_factor: f64,
    pub reason: Reason,
    pub final_bracket: Option<BracketSnapshot>,
    pub residual: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryContext {
    /// Zero for the first attempt
    pub attempt: u32,
    /// Multiplier applied to both sides of the initial bracket (≥ 1)
    pub expansion_factor: f64,
    pub history: Vec<AttemptRecord>,
}

impl Default for RetryContext {
    fn default() -> Self {
        Self {
            attempt: 0,
            expansion_factor: 1.0,
            history: Vec::new(),
        }
    }
}

impl RetryContext {
    /// Context for the attempt following `failure`: factor doubled, failure recorded.
    pub fn next(&self, failure: &SolverError) -> RetryContext {
        let diag = failure.diagnostic();
        let mut history = self.history.clone();
        history.push(AttemptRecord {
            attempt: self.attempt,
            expansion_factor: self.expansion_factor,
            reason: diag.reason,
            final_bracket: diag.final_bracket,
            residual: diag.residual,
        });
        RetryContext {
            attempt: self.attempt + 1,
            expansion_factor: self.expansion_factor * 2.0,
            history,
        }
    }
}
