//! sc-compare: recorded trajectories, error metrics and comparison charts.

pub mod chart;
pub mod compare;
pub mod loader;

pub use chart::{ChartPanel, render_chart};
pub use compare::{Comparison, compare};
pub use loader::{ColumnSelector, load_trajectory, write_trajectory};

pub type CompareResult<T> = Result<T, CompareError>;

#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Column {column} not found in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Cannot parse {value:?} as a number in {path}, row {row}")]
    Parse {
        path: String,
        row: usize,
        value: String,
    },

    #[error("Invalid trajectory in {path}: {source}")]
    Trajectory {
        path: String,
        #[source]
        source: sc_core::CoreError,
    },

    #[error("Need at least 2 overlapping samples to compare, got {count}")]
    InsufficientOverlap { count: usize },

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
