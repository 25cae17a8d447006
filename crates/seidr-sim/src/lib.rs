//! Generic initial-value-problem integration.
//!
//! Provides:
//! - `OdeSystem` trait for pluggable derivative functions
//! - Fixed-step RK4 and forward Euler integrators
//! - `solve`, which samples the solution on a caller-supplied time grid
//! - `FnSystem`, a closure adapter for ad hoc systems

pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::{FnSystem, OdeSystem, array_add, array_scale};
pub use sim::{IntegratorType, SimProgress, SimRecord, SolveOptions, solve, solve_with_progress};
