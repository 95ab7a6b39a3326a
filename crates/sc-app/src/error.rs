//! Error types for the sc-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the library crates
/// and gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario file error: {0}")]
    ScenarioFile(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Comparison error: {0}")]
    Compare(String),

    #[error("Scenario '{name}' failed: {reason}")]
    ScenarioFailed { name: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<sc_model::ModelError> for AppError {
    fn from(err: sc_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<sc_sim::SimError> for AppError {
    fn from(err: sc_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<sc_compare::CompareError> for AppError {
    fn from(err: sc_compare::CompareError) -> Self {
        AppError::Compare(err.to_string())
    }
}

impl From<sc_core::CoreError> for AppError {
    fn from(err: sc_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
