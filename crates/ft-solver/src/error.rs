//! Error types for the inverse solver.
//!
//! Every variant carries the full `Diagnostic` of the failed attempt.

use crate::diagnostic::{Diagnostic, Reason};
use thiserror::Error;

/// Failure category of a solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    BracketExhausted,
    BoundaryHit,
    ResidualRejected,
    NonConvergent,
    NonFiniteResult,
}

impl ErrorKind {
    pub fn reason(&self) -> Reason {
        match self {
            ErrorKind::InvalidInput => Reason::InvalidInput,
            ErrorKind::BracketExhausted => Reason::OutOfBracket,
            ErrorKind::BoundaryHit => Reason::BoundaryHit,
            ErrorKind::ResidualRejected => Reason::ResidualRejected,
            ErrorKind::NonConvergent => Reason::MaxIterations,
            ErrorKind::NonFiniteResult => Reason::NonFinite,
        }
    }

    /// Whether widening the bracket on a retry can change the outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::BracketExhausted | ErrorKind::BoundaryHit | ErrorKind::NonConvergent
        )
    }
}

/// Errors that can occur while solving for a restriction area.
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    #[error("{}", .0.summary())]
    InvalidInput(Box<Diagnostic>),

    #[error("{}", .0.summary())]
    BracketExhausted(Box<Diagnostic>),

    #[error("{}", .0.summary())]
    BoundaryHit(Box<Diagnostic>),

    #[error("{}", .0.summary())]
    ResidualRejected(Box<Diagnostic>),

    #[error("{}", .0.summary())]
    NonConvergent(Box<Diagnostic>),

    #[error("{}", .0.summary())]
    NonFiniteResult(Box<Diagnostic>),
}

impl SolverError {
    pub fn new(kind: ErrorKind, diagnostic: Diagnostic) -> Self {
        let diag = Box::new(diagnostic);
        match kind {
            ErrorKind::InvalidInput => SolverError::InvalidInput(diag),
            ErrorKind::BracketExhausted => SolverError::BracketExhausted(diag),
            ErrorKind::BoundaryHit => SolverError::BoundaryHit(diag),
            ErrorKind::ResidualRejected => SolverError::ResidualRejected(diag),
            ErrorKind::NonConvergent => SolverError::NonConvergent(diag),
            ErrorKind::NonFiniteResult => SolverError::NonFiniteResult(diag),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SolverError::InvalidInput(_) => ErrorKind::InvalidInput,
            SolverError::BracketExhausted(_) => ErrorKind::BracketExhausted,
            SolverError::BoundaryHit(_) => ErrorKind::BoundaryHit,
            SolverError::ResidualRejected(_) => ErrorKind::ResidualRejected,
            SolverError::NonConvergent(_) => ErrorKind::NonConvergent,
            SolverError::NonFiniteResult(_) => ErrorKind::NonFiniteResult,
        }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            SolverError::InvalidInput(d)
            | SolverError::BracketExhausted(d)
            | SolverError::BoundaryHit(d)
            | SolverError::ResidualRejected(d)
            | SolverError::NonConvergent(d)
            | SolverError::NonFiniteResult(d) => d,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            SolverError::InvalidInput(d)
            | SolverError::BracketExhausted(d)
            | SolverError::BoundaryHit(d)
            | SolverError::ResidualRejected(d)
            | SolverError::NonConvergent(d)
            | SolverError::NonFiniteResult(d) => *d,
        }
    }
}
