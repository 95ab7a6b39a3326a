//! Error types for model construction and conversion.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building, converting or composing linear models.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Matrix shapes are mutually inconsistent.
    #[error("Dimension mismatch for {what}: expected {expected:?}, found {found:?}")]
    Dimension {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Malformed coefficients or a degenerate composition.
    #[error("Invalid model: {what}")]
    InvalidModel { what: String },

    /// Numerical breakdown during state-space <-> transfer-function conversion.
    #[error("Singular system during {what} (order {order})")]
    Singular { what: &'static str, order: usize },
}

impl ModelError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        ModelError::InvalidModel { what: what.into() }
    }
}

impl From<sc_core::CoreError> for ModelError {
    fn from(e: sc_core::CoreError) -> Self {
        ModelError::InvalidModel {
            what: e.to_string(),
        }
    }
}
