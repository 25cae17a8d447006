//! Clinical parameters, initial conditions and derived rates.
//!
//! Parameters are stored as the clinical quantities a user supplies
//! (periods in days, reproduction number, ...). Rates are always derived
//! from them, never stored independently, so an update can never leave a
//! rate out of sync with the quantity it came from.

use crate::compartment::StateVector;
use crate::error::{ModelError, ModelResult};
use seidr_core::{Real, ensure_non_negative, ensure_positive};
use serde::{Deserialize, Serialize};

/// Epidemiological inputs of the SEIDR model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpidemicParameters {
    /// Mean time spent in E (days)
    pub incubation_period: Real,
    /// Mean time spent in I (days)
    pub infectious_period: Real,
    /// N0, held constant in the force of infection
    pub total_population: Real,
    /// alpha: disease-induced death rate applied to I (1/day)
    pub fatality_rate: Real,
    /// REP_0
    pub basic_reproduction_number: Real,
    /// Reciprocal of the natural birth/death rate u
    pub avg_life_expectancy: Real,
}

impl EpidemicParameters {
    pub fn validate(&self) -> ModelResult<()> {
        ensure_positive(self.incubation_period, "incubation_period")?;
        ensure_positive(self.infectious_period, "infectious_period")?;
        ensure_positive(self.total_population, "total_population")?;
        ensure_non_negative(self.fatality_rate, "fatality_rate")?;
        ensure_non_negative(self.basic_reproduction_number, "basic_reproduction_number")?;
        ensure_positive(self.avg_life_expectancy, "avg_life_expectancy")?;
        Ok(())
    }

    pub fn derived_rates(&self) -> DerivedRates {
        DerivedRates::from_parameters(self)
    }
}

/// Initial headcounts of every compartment except S, which is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub exposed: Real,
    pub infectious: Real,
    #[serde(default)]
    pub dead: Real,
    #[serde(default)]
    pub recovered: Real,
}

impl InitialConditions {
    pub fn validate(&self) -> ModelResult<()> {
        ensure_non_negative(self.exposed, "initial exposed")?;
        ensure_non_negative(self.infectious, "initial infectious")?;
        ensure_non_negative(self.dead, "initial dead")?;
        ensure_non_negative(self.recovered, "initial recovered")?;
        Ok(())
    }

    /// E0 + I0 + D0 + R0
    pub fn occupied(&self) -> Real {
        self.exposed + self.infectious + self.recovered + self.dead
    }
}

/// Rates derived from [`EpidemicParameters`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedRates {
    /// 1 / incubation_period
    pub epsilon: Real,
    /// 1 / infectious_period
    pub gamma: Real,
    /// (gamma + alpha) * REP_0
    pub beta: Real,
    pub alpha: Real,
    /// 1 / avg_life_expectancy
    pub u: Real,
    /// L = u * N0
    pub birth_rate: Real,
    pub total_population: Real,
}

impl DerivedRates {
    pub fn from_parameters(p: &EpidemicParameters) -> Self {
        let epsilon = 1.0 / p.incubation_period;
        let gamma = 1.0 / p.infectious_period;
        let u = 1.0 / p.avg_life_expectancy;
        Self {
            epsilon,
            gamma,
            beta: (gamma + p.fatality_rate) * p.basic_reproduction_number,
            alpha: p.fatality_rate,
            u,
            birth_rate: u * p.total_population,
            total_population: p.total_population,
        }
    }
}

/// Values that may be replaced between two trajectory computations.
///
/// Absent fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incubation_period: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infectious_period: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_exposed: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_reproduction_number: Option<Real>,
}

impl ParameterOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    /// Overrides that restate every overridable value of `inputs`.
    pub fn explicit(inputs: &ModelInputs) -> Self {
        Self {
            incubation_period: Some(inputs.parameters.incubation_period),
            infectious_period: Some(inputs.parameters.infectious_period),
            initial_exposed: Some(inputs.initial.exposed),
            basic_reproduction_number: Some(inputs.parameters.basic_reproduction_number),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_incubation_period(mut self, days: Real) -> Self {
        self.incubation_period = Some(days);
        self
    }

    pub fn with_infectious_period(mut self, days: Real) -> Self {
        self.infectious_period = Some(days);
        self
    }

    pub fn with_initial_exposed(mut self, exposed: Real) -> Self {
        self.initial_exposed = Some(exposed);
        self
    }

    pub fn with_basic_reproduction_number(mut self, rep0: Real) -> Self {
        self.basic_reproduction_number = Some(rep0);
        self
    }
}

/// Everything a trajectory computation depends on besides the time grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelInputs {
    pub parameters: EpidemicParameters,
    pub initial: InitialConditions,
}

impl ModelInputs {
    /// Validated inputs. Rejects non-positive periods, population or life
    /// expectancy, negative counts, and initial counts exceeding N0.
    pub fn new(parameters: EpidemicParameters, initial: InitialConditions) -> ModelResult<Self> {
        let inputs = Self {
            parameters,
            initial,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn validate(&self) -> ModelResult<()> {
        self.parameters.validate()?;
        self.initial.validate()?;
        let occupied = self.initial.occupied();
        if occupied > self.parameters.total_population {
            return Err(ModelError::InconsistentInitialConditions {
                occupied,
                total_population: self.parameters.total_population,
            });
        }
        Ok(())
    }

    /// S0 = N0 - (E0 + I0 + D0 + R0)
    pub fn susceptible0(&self) -> Real {
        self.parameters.total_population - self.initial.occupied()
    }

    pub fn initial_state(&self) -> StateVector {
        [
            self.susceptible0(),
            self.initial.exposed,
            self.initial.infectious,
            self.initial.dead,
            self.initial.recovered,
        ]
    }

    pub fn derived_rates(&self) -> DerivedRates {
        self.parameters.derived_rates()
    }

    /// Pure state transition: the inputs that result from applying
    /// `overrides`, validated as a whole. `self` is left untouched.
    pub fn apply(&self, overrides: &ParameterOverrides) -> ModelResult<Self> {
        let mut next = *self;
        if let Some(v) = overrides.incubation_period {
            next.parameters.incubation_period = v;
        }
        if let Some(v) = overrides.infectious_period {
            next.parameters.infectious_period = v;
        }
        if let Some(v) = overrides.initial_exposed {
            next.initial.exposed = v;
        }
        if let Some(v) = overrides.basic_reproduction_number {
            next.parameters.basic_reproduction_number = v;
        }
        next.validate()?;
        Ok(next)
    }
}
