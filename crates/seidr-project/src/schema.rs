//! Scenario schema definitions.

use seidr_model::{
    EpidemicModel, EpidemicParameters, InitialConditions, ModelResult, POINTS_PER_DAY,
    ParameterOverrides, Scenario, SweepDefinition,
};
use seidr_sim::SolveOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioFile {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub days: u32,
    #[serde(default = "default_points_per_day")]
    pub points_per_day: usize,
    pub parameters: EpidemicParameters,
    pub initial: InitialConditions,
    #[serde(default)]
    pub solver: SolveOptions,
    #[serde(default, skip_serializing_if = "ParameterOverrides::is_empty")]
    pub overrides: ParameterOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepDefinition>,
}

fn default_points_per_day() -> usize {
    POINTS_PER_DAY
}

impl ScenarioFile {
    /// Scenario file equivalent of a built-in scenario.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: scenario.name.to_string(),
            description: None,
            days: scenario.days,
            points_per_day: POINTS_PER_DAY,
            parameters: scenario.parameters,
            initial: scenario.initial,
            solver: SolveOptions::default(),
            overrides: ParameterOverrides::default(),
            sweep: None,
        }
    }

    /// Model for this scenario with the scenario's own overrides already
    /// applied to its inputs.
    pub fn build_model(&self) -> ModelResult<EpidemicModel> {
        let mut model = EpidemicModel::with_resolution(
            self.parameters,
            self.initial,
            self.days,
            self.points_per_day,
        )?
        .with_solve_options(self.solver.clone());
        model.apply_overrides(&self.overrides)?;
        Ok(model)
    }
}
