use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Non-positive value for {what}: {value}")]
    NonPositive { what: &'static str, value: f64 },
}

impl CoreError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            CoreError::NonFinite { what, .. } | CoreError::NonPositive { what, .. } => what,
        }
    }
}
