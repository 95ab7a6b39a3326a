//! Shared application service layer for stepcheck.
//!
//! Loads scenario files, builds the described models, simulates their step
//! responses and compares them against recorded trajectories. The CLI is a
//! thin layer over this crate.

pub mod builtin;
pub mod error;
pub mod run_service;
pub mod scenario;

pub use builtin::builtin_scenarios;
pub use error::{AppError, AppResult};
pub use run_service::{RunOptions, RunReport, ScenarioOutcome, ScenarioStatus, run_scenarios};
pub use scenario::{BlockDef, LoopKind, ScenarioDef, ScenarioFile, load_scenarios, parse_scenarios};
