//! Schema migration framework.

use crate::ProjectError;
use crate::schema::ScenarioFile;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut scenario: ScenarioFile) -> Result<ScenarioFile, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: ScenarioFile) -> Result<ScenarioFile, ProjectError> {
    match scenario.version {
        0 => migrate_v0_to_v1(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files predate `points_per_day`; they were always sampled at
/// the default resolution, which serde already fills in.
fn migrate_v0_to_v1(mut scenario: ScenarioFile) -> Result<ScenarioFile, ProjectError> {
    scenario.version = 1;
    Ok(scenario)
}
