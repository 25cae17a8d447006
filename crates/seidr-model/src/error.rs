//! Error types for model construction and recomputation.

use seidr_core::{CoreError, Real};
use seidr_sim::SimError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] CoreError),

    #[error(
        "Inconsistent initial conditions: E0+I0+D0+R0 = {occupied} exceeds total population {total_population}"
    )]
    InconsistentInitialConditions {
        occupied: Real,
        total_population: Real,
    },

    #[error("Invalid time grid: {what}")]
    InvalidGrid { what: &'static str },

    #[error("Invalid sweep: {what}")]
    InvalidSweep { what: &'static str },

    #[error("Integration failed: {0}")]
    Sim(#[from] SimError),
}

pub type ModelResult<T> = Result<T, ModelError>;
