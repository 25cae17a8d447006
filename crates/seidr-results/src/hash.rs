//! Content-based hashing for run IDs.

use seidr_model::ParameterOverrides;
use seidr_project::ScenarioFile;
use sha2::{Digest, Sha256};

/// Hex SHA-256 over the scenario name, everything that determines a
/// trajectory (grid, parameters, initial conditions, solver, overrides) and
/// the solver version.
///
/// The name keeps runs of distinct scenarios sharing a directory apart,
/// since runs are listed per scenario name. The description and the sweep
/// block are ignored.
pub fn compute_run_id(
    scenario: &ScenarioFile,
    overrides: &ParameterOverrides,
    solver_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let inputs = (
        &scenario.name,
        scenario.days,
        scenario.points_per_day,
        &scenario.parameters,
        &scenario.initial,
        &scenario.solver,
        &scenario.overrides,
    );
    let inputs_json = serde_json::to_string(&inputs).unwrap_or_default();
    hasher.update(inputs_json.as_bytes());

    let overrides_json = serde_json::to_string(overrides).unwrap_or_default();
    hasher.update(overrides_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
