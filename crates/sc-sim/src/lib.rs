//! Step-response simulation for linear models.
//!
//! Provides:
//! - Exact zero-order-hold propagation through the matrix exponential (default)
//! - Fixed-step RK4 and forward Euler integrators behind the [`TransientModel`] trait
//! - Divergence detection against a configurable state/output bound
//! - Step-response metrics (rise time, settling time, overshoot)
//!
//! Each call to [`simulate`] starts from a zero state and holds no state
//! afterwards, so independent calls can run on separate threads.

pub mod error;
pub mod integrator;
pub mod model;
pub mod propagation;
pub mod sim;
pub mod step_info;

pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::{StepDriven, TransientModel};
pub use propagation::ZohPropagator;
pub use sim::{IntegratorType, SimOptions, simulate, simulate_with};
pub use step_info::{DEFAULT_SETTLING_BAND, StepInfo};
