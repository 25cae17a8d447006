//! Scenario validation logic.
//!
//! File-level checks only: structure, counts and finiteness. Epidemiological
//! consistency (positive periods, S0 >= 0) is enforced when the model is
//! built.

use crate::schema::ScenarioFile;
use seidr_core::Real;
use seidr_model::MAX_GRID_POINTS;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing value: {field}")]
    Missing { field: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &ScenarioFile) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "name".to_string(),
        });
    }

    if scenario.days == 0 {
        return Err(invalid("days", scenario.days, "must be at least 1"));
    }
    if scenario.points_per_day < 2 {
        return Err(invalid(
            "points_per_day",
            scenario.points_per_day,
            "must be at least 2",
        ));
    }
    let fits = (scenario.days as usize)
        .checked_mul(scenario.points_per_day)
        .is_some_and(|n| n <= MAX_GRID_POINTS);
    if !fits {
        return Err(invalid(
            "points_per_day",
            scenario.points_per_day,
            "days * points_per_day exceeds the grid size limit",
        ));
    }
    if scenario.solver.substeps == 0 {
        return Err(invalid(
            "solver.substeps",
            scenario.solver.substeps,
            "must be at least 1",
        ));
    }

    let p = &scenario.parameters;
    let i = &scenario.initial;
    let o = &scenario.overrides;
    let numbers = [
        ("parameters.incubation_period", Some(p.incubation_period)),
        ("parameters.infectious_period", Some(p.infectious_period)),
        ("parameters.total_population", Some(p.total_population)),
        ("parameters.fatality_rate", Some(p.fatality_rate)),
        (
            "parameters.basic_reproduction_number",
            Some(p.basic_reproduction_number),
        ),
        ("parameters.avg_life_expectancy", Some(p.avg_life_expectancy)),
        ("initial.exposed", Some(i.exposed)),
        ("initial.infectious", Some(i.infectious)),
        ("initial.dead", Some(i.dead)),
        ("initial.recovered", Some(i.recovered)),
        ("overrides.incubation_period", o.incubation_period),
        ("overrides.infectious_period", o.infectious_period),
        ("overrides.initial_exposed", o.initial_exposed),
        (
            "overrides.basic_reproduction_number",
            o.basic_reproduction_number,
        ),
    ];
    for (field, value) in numbers {
        if let Some(v) = value {
            ensure_finite(field, v)?;
        }
    }

    if let Some(sweep) = &scenario.sweep
        && let Err(e) = sweep.validate()
    {
        return Err(ValidationError::InvalidValue {
            field: "sweep".to_string(),
            value: sweep.to_string(),
            reason: e.to_string(),
        });
    }

    Ok(())
}

fn ensure_finite(field: &str, value: Real) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
