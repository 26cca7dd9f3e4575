//! Gas property errors.

use ft_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while building or querying gas properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative gas constant, gamma <= 1, ...).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Gas name not present in the preset catalog.
    #[error("Unknown gas: {name}")]
    UnknownGas { name: String },
}

impl From<CoreError> for FluidError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, value } | CoreError::NonPositive { what, value } => {
                FluidError::NonPhysical { what, value }
            }
        }
    }
}
