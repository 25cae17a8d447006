//! Named outbreak scenarios used by demos and regression tests.

use crate::epidemic::EpidemicModel;
use crate::error::ModelResult;
use crate::params::{EpidemicParameters, InitialConditions};

/// A complete set of construction inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scenario {
    pub name: &'static str,
    pub parameters: EpidemicParameters,
    pub initial: InitialConditions,
    pub days: u32,
}

impl Scenario {
    pub fn build(&self) -> ModelResult<EpidemicModel> {
        EpidemicModel::new(self.parameters, self.initial, self.days)
    }
}

/// Early COVID-19 outbreak in Lombardy, spring 2020.
pub const LOMBARDIA: Scenario = Scenario {
    name: "Lombardia",
    parameters: EpidemicParameters {
        incubation_period: 3.0,
        infectious_period: 8.0,
        total_population: 10_000_000.0,
        fatality_rate: 0.006,
        basic_reproduction_number: 5.72,
        avg_life_expectancy: 82.8,
    },
    initial: InitialConditions {
        exposed: 20_000.0,
        infectious: 1.0,
        dead: 0.0,
        recovered: 0.0,
    },
    days: 80,
};
