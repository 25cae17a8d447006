//! Parameter sweeps over a scenario.

use seidr_core::timing::Timer;
use seidr_model::{SweepDefinition, SweepPoint, run_sweep};
use seidr_project::ScenarioFile;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Sweep `scenario` with `sweep`, or with the scenario's own sweep block
/// when `sweep` is `None`.
pub fn run_scenario_sweep(
    scenario: &ScenarioFile,
    sweep: Option<&SweepDefinition>,
) -> AppResult<Vec<SweepPoint>> {
    let definition = sweep.or(scenario.sweep.as_ref()).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "scenario '{}' has no sweep and none was given",
            scenario.name
        ))
    })?;

    let model = scenario.build_model()?;
    let timer = Timer::start("sweep");
    let points = run_sweep(&model, definition)?;
    timer.stop_and_log();

    info!(
        scenario = %scenario.name,
        parameter = %definition.parameter,
        points = points.len(),
        "sweep completed"
    );
    Ok(points)
}
