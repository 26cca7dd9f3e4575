//! Error types for flow model evaluation.

use ft_core::CoreError;
use ft_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while evaluating a restriction flow model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// A required SI field is missing, non-finite or out of physical range.
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

pub type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        FlowError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            FlowError::InvalidInput { field, .. } => field,
        }
    }
}

impl From<CoreError> for FlowError {
    fn from(e: CoreError) -> Self {
        let field = e.field();
        FlowError::InvalidInput {
            field,
            reason: e.to_string(),
        }
    }
}

impl From<FluidError> for FlowError {
    fn from(e: FluidError) -> Self {
        match e {
            FluidError::NonPhysical { what, .. } => FlowError::InvalidInput {
                field: what,
                reason: e.to_string(),
            },
            FluidError::UnknownGas { .. } => FlowError::InvalidInput {
                field: "gas",
                reason: e.to_string(),
            },
        }
    }
}
