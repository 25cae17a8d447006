//! CSV export of trajectories.

use crate::ResultsResult;
use seidr_model::{Compartment, Trajectory};
use std::io::Write;
use std::path::Path;

/// Write one row per grid point under the header `time_days,S,E,I,D,R`.
pub fn write_csv<W: Write>(writer: W, trajectory: &Trajectory) -> ResultsResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["time_days"];
    header.extend(Compartment::ALL.iter().map(|c| c.symbol()));
    csv.write_record(&header)?;

    for (i, t) in trajectory.time.iter().enumerate() {
        let Some(state) = trajectory.state_at(i) else {
            break;
        };
        let mut row = Vec::with_capacity(1 + state.len());
        row.push(t.to_string());
        row.extend(state.iter().map(|v| v.to_string()));
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, trajectory: &Trajectory) -> ResultsResult<()> {
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), trajectory)
}
