//! Error types for simulation operations.

use sc_core::CoreError;
use sc_model::ModelError;
use thiserror::Error;

/// Errors encountered while computing a step response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Time grid needs at least 2 points, got {len}")]
    EmptyGrid { len: usize },

    #[error("Invalid time grid at index {index}: {what}")]
    InvalidGrid { what: &'static str, index: usize },

    #[error("Invalid simulation options: {what}")]
    InvalidOptions { what: &'static str },

    #[error("Integration diverged at t = {time} s (magnitude {magnitude:e} exceeds bound {bound:e})")]
    Diverged {
        time: f64,
        magnitude: f64,
        bound: f64,
    },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Trajectory error: {0}")]
    Trajectory(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
