//! Linear time-invariant model primitives for stepcheck.
//!
//! A [`LinearModel`] is a single-input single-output LTI system held either as
//! state-space matrices or as transfer-function coefficients. The two forms
//! convert into each other:
//!
//! - transfer function -> state space: controllable canonical realization
//! - state space -> transfer function: `C (sI - A)^-1 B + D` via Faddeev-LeVerrier
//!
//! The [`algebra`] module composes models (series, parallel, feedback) at the
//! transfer-function level and always returns a freshly owned model.
//! The [`blocks`] module builds the common controller and plant shapes
//! (PID, first-order lag, RL circuit) as models.

pub mod algebra;
pub mod blocks;
pub mod error;
pub mod model;
pub mod poly;
pub mod state_space;
pub mod transfer_function;

pub use algebra::{FeedbackSign, feedback, gain, parallel, series, unity_feedback};
pub use blocks::{FirstOrderLag, PidController, RlCircuit};
pub use error::{ModelError, ModelResult};
pub use model::LinearModel;
pub use poly::Poly;
pub use state_space::StateSpaceModel;
pub use transfer_function::TransferFunctionModel;
