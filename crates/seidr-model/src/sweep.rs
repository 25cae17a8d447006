//! Parameter sweeps over one overridable value.
//!
//! Each point is an independent [`EpidemicModel::evaluate`] call, so points
//! run in parallel and the model itself is never modified.

use crate::epidemic::EpidemicModel;
use crate::error::{ModelError, ModelResult};
use crate::params::ParameterOverrides;
use crate::trajectory::TrajectorySummary;
use rayon::prelude::*;
use seidr_core::{Real, Tolerances, linspace, nearly_equal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// The value a sweep varies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    IncubationPeriod,
    InfectiousPeriod,
    InitialExposed,
    BasicReproductionNumber,
}

impl SweepParameter {
    pub fn overrides_for(self, value: Real) -> ParameterOverrides {
        let none = ParameterOverrides::none();
        match self {
            SweepParameter::IncubationPeriod => none.with_incubation_period(value),
            SweepParameter::InfectiousPeriod => none.with_infectious_period(value),
            SweepParameter::InitialExposed => none.with_initial_exposed(value),
            SweepParameter::BasicReproductionNumber => none.with_basic_reproduction_number(value),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SweepParameter::IncubationPeriod => "incubation_period",
            SweepParameter::InfectiousPeriod => "infectious_period",
            SweepParameter::InitialExposed => "initial_exposed",
            SweepParameter::BasicReproductionNumber => "basic_reproduction_number",
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepParameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "incubation_period" | "incubation" => Ok(SweepParameter::IncubationPeriod),
            "infectious_period" | "infectious" => Ok(SweepParameter::InfectiousPeriod),
            "initial_exposed" | "e0" => Ok(SweepParameter::InitialExposed),
            "basic_reproduction_number" | "r0" | "rep_0" => {
                Ok(SweepParameter::BasicReproductionNumber)
            }
            other => Err(format!("unknown sweep parameter: {other}")),
        }
    }
}

/// Linearly spaced values of one parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub parameter: SweepParameter,
    pub start: Real,
    pub end: Real,
    pub num_points: usize,
}

impl SweepDefinition {
    pub fn validate(&self) -> ModelResult<()> {
        if self.num_points < 2 {
            return Err(ModelError::InvalidSweep {
                what: "sweep must have at least 2 points",
            });
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(ModelError::InvalidSweep {
                what: "sweep bounds must be finite",
            });
        }
        if nearly_equal(self.start, self.end, Tolerances::default()) {
            return Err(ModelError::InvalidSweep {
                what: "start and end values must be different",
            });
        }
        Ok(())
    }

    /// All sweep values; the last equals `end` exactly.
    pub fn generate_points(&self) -> Vec<Real> {
        linspace(self.start, self.end, self.num_points)
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep {} from {} to {} ({} points)",
            self.parameter, self.start, self.end, self.num_points
        )
    }
}

/// One evaluated sweep value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub value: Real,
    pub summary: TrajectorySummary,
}

/// Evaluate `model` at every value of `sweep`, in sweep order.
///
/// Fails on the first value that is not a valid override (for example a
/// negative period).
pub fn run_sweep(model: &EpidemicModel, sweep: &SweepDefinition) -> ModelResult<Vec<SweepPoint>> {
    sweep.validate()?;
    info!(%sweep, "running sweep");
    sweep
        .generate_points()
        .into_par_iter()
        .map(|value| -> ModelResult<SweepPoint> {
            let trajectory = model.evaluate(&sweep.parameter.overrides_for(value))?;
            Ok(SweepPoint {
                value,
                summary: trajectory.summary(),
            })
        })
        .collect()
}
