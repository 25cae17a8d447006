//! Scenario loading and introspection.

use seidr_core::Real;
use seidr_model::DerivedRates;
use seidr_project::{ProjectError, ScenarioFile};
use std::path::Path;

use crate::error::{AppError, AppResult};

/// What a front end shows after validating a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub description: Option<String>,
    pub days: u32,
    pub points: usize,
    pub susceptible0: Real,
    pub rates: DerivedRates,
    pub has_sweep: bool,
}

/// Load, migrate and validate a scenario file (YAML or JSON).
pub fn load_scenario(path: &Path) -> AppResult<ScenarioFile> {
    seidr_project::load_scenario(path).map_err(|e| match e {
        ProjectError::Io(source) => AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Build the scenario's model, which performs the domain checks a file
/// cannot express (positive periods, S0 >= 0), and describe it.
pub fn summarize(scenario: &ScenarioFile) -> AppResult<ScenarioSummary> {
    let model = scenario.build_model()?;
    Ok(ScenarioSummary {
        name: scenario.name.clone(),
        description: scenario.description.clone(),
        days: model.days(),
        points: model.time_grid().len(),
        susceptible0: model.susceptible0(),
        rates: *model.rates(),
        has_sweep: scenario.sweep.is_some(),
    })
}
