//! Error types for the ft-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates.
///
/// Solver failures keep their full `SolverError` so callers can always show
/// the diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Flow model error: {0}")]
    Flow(String),

    #[error("Solver error: {0}")]
    Solver(#[from] ft_solver::SolverError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ft-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Diagnostic of a solver failure, if this is one.
    pub fn diagnostic(&self) -> Option<&ft_solver::Diagnostic> {
        match self {
            AppError::Solver(e) => Some(e.diagnostic()),
            _ => None,
        }
    }
}

// Conversions from backend error types
impl From<ft_project::ProjectError> for AppError {
    fn from(err: ft_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<ft_project::ValidationError> for AppError {
    fn from(err: ft_project::ValidationError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<ft_components::FlowError> for AppError {
    fn from(err: ft_components::FlowError) -> Self {
        AppError::Flow(err.to_string())
    }
}

impl From<ft_fluids::FluidError> for AppError {
    fn from(err: ft_fluids::FluidError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
