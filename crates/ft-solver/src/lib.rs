//! Inverse solver and model selection for vessel flow times.
//!
//! Given a target blowdown or filling time this crate recovers the restriction
//! area with a log-space bracketing bisection over a `FlowModel`. It also hosts
//! the orifice/capillary selector and the model-agnostic forward evaluation.
//!
//! Solves are synchronous and side-effect free; independent solves may run in
//! parallel. Retrying a failed solve is up to the caller via `RetryContext`.

pub mod bracket;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod forward;
pub mod retry;
pub mod selector;
pub mod solve;

pub use bracket::{Bracket, Endpoint};
pub use config::SolverConfig;
pub use diagnostic::{BracketSnapshot, ChokingState, Diagnostic, DiagnosticBuilder, Reason};
pub use error::{ErrorKind, SolverError};
pub use forward::{ForwardEvaluation, forward_time};
pub use retry::{AttemptRecord, RetryContext};
pub use selector::{ModelChoice, Selection, Verdict, select_model};
pub use solve::{SolveOptions, SolverResult, solve_area_from_time, solve_with_model};
