//! Shared application service layer for seidr.
//!
//! Front ends go through this crate for scenario loading, cached runs,
//! sweeps and stored results.

pub mod error;
pub mod progress;
pub mod run_service;
pub mod scenario_service;
pub mod sweep_service;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run, ensure_run_with_progress,
    list_runs, load_run, run_uncached,
};
pub use scenario_service::{ScenarioSummary, load_scenario, summarize};
pub use sweep_service::run_scenario_sweep;
