//! Error types for the seidr-app service layer.

use std::path::PathBuf;

/// Unified error for every front end; backend errors are carried as text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<seidr_project::ProjectError> for AppError {
    fn from(err: seidr_project::ProjectError) -> Self {
        match err {
            seidr_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            seidr_project::ProjectError::Model(e) => AppError::from(e),
            other => AppError::Scenario(other.to_string()),
        }
    }
}

impl From<seidr_model::ModelError> for AppError {
    fn from(err: seidr_model::ModelError) -> Self {
        match err {
            seidr_model::ModelError::Sim(e) => AppError::from(e),
            other => AppError::Model(other.to_string()),
        }
    }
}

impl From<seidr_sim::SimError> for AppError {
    fn from(err: seidr_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<seidr_results::ResultsError> for AppError {
    fn from(err: seidr_results::ResultsError) -> Self {
        match err {
            seidr_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
