//! sc-core: shared foundation for stepcheck.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - trajectory (time-stamped scalar samples shared by simulator and comparator)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod trajectory;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use trajectory::Trajectory;
