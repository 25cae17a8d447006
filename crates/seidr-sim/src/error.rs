//! Error types for integration.

use thiserror::Error;

/// Errors encountered while integrating an ODE system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid time grid at index {index}: {what}")]
    InvalidGrid { index: usize, what: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;
