//! seidr-core: shared foundation for the SEIDR workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers + time grids)
//! - error (shared error types)
//! - timing (opt-in wall-clock timers)

pub mod error;
pub mod numeric;
pub mod timing;

pub use error::CoreError;
pub use numeric::*;
