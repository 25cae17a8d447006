//! Result data types.

use seidr_model::{ParameterOverrides, StateVector, Trajectory, TrajectorySummary};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub days: u32,
    pub points: usize,
    pub solver_version: String,
    #[serde(default, skip_serializing_if = "ParameterOverrides::is_empty")]
    pub overrides: ParameterOverrides,
    pub summary: TrajectorySummary,
}

/// Current UTC time in the manifest timestamp format.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// One grid point of a stored trajectory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRecord {
    pub time_days: f64,
    pub susceptible: f64,
    pub exposed: f64,
    pub infectious: f64,
    pub dead: f64,
    pub recovered: f64,
}

impl TimeseriesRecord {
    pub fn state(&self) -> StateVector {
        [
            self.susceptible,
            self.exposed,
            self.infectious,
            self.dead,
            self.recovered,
        ]
    }
}

pub fn records_from_trajectory(trajectory: &Trajectory) -> Vec<TimeseriesRecord> {
    (0..trajectory.len())
        .filter_map(|i| {
            let [s, e, inf, d, r] = trajectory.state_at(i)?;
            Some(TimeseriesRecord {
                time_days: trajectory.time[i],
                susceptible: s,
                exposed: e,
                infectious: inf,
                dead: d,
                recovered: r,
            })
        })
        .collect()
}

pub fn trajectory_from_records(records: &[TimeseriesRecord]) -> Trajectory {
    let time = records.iter().map(|r| r.time_days).collect();
    let states: Vec<StateVector> = records.iter().map(TimeseriesRecord::state).collect();
    Trajectory::from_states(time, &states)
}
