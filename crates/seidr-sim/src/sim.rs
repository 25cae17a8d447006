//! Grid-sampled solves and result recording.

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::OdeSystem;
use seidr_core::Real;
use seidr_core::timing::{Timer, solve_timing};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Integrator selection for a solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, 4 rhs calls per step).
    #[default]
    #[serde(rename = "rk4")]
    RK4,
    /// Forward Euler (1st-order, 1 rhs call per step).
    ForwardEuler,
}

impl IntegratorType {
    pub fn order(self) -> u32 {
        match self {
            IntegratorType::RK4 => RK4.order(),
            IntegratorType::ForwardEuler => ForwardEuler.order(),
        }
    }
}

/// Options for grid-sampled solves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Integrator type (default: RK4)
    #[serde(default)]
    pub integrator: IntegratorType,
    /// Fixed internal steps taken between two consecutive grid points
    #[serde(default = "default_substeps")]
    pub substeps: usize,
}

fn default_substeps() -> usize {
    1
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorType::default(),
            substeps: default_substeps(),
        }
    }
}

impl SolveOptions {
    pub fn with_substeps(substeps: usize) -> Self {
        Self {
            substeps,
            ..Self::default()
        }
    }
}

/// Progress snapshot emitted after each grid interval.
#[derive(Clone, Debug)]
pub struct SimProgress {
    /// Number of grid intervals completed
    pub interval: usize,
    /// Total number of grid intervals
    pub intervals: usize,
    /// Time reached
    pub t: Real,
    pub elapsed_wall_s: f64,
}

impl SimProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.intervals == 0 {
            1.0
        } else {
            self.interval as f64 / self.intervals as f64
        }
    }
}

/// Record of solve results, one state per requested time.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points, as requested
    pub t: Vec<Real>,
    /// State snapshots aligned with `t`
    pub x: Vec<S>,
}

impl<S> SimRecord<S> {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Integrate `system` from `y0` at `times[0]` and return the state at every
/// requested time.
///
/// `times` must be non-empty, finite and strictly increasing. The first
/// recorded state is `y0` itself. Each grid interval is split into
/// `options.substeps` equal fixed steps.
pub fn solve<M: OdeSystem>(
    system: &M,
    y0: M::State,
    times: &[Real],
    options: &SolveOptions,
) -> SimResult<SimRecord<M::State>> {
    solve_with_progress(system, y0, times, options, None)
}

/// Same as [`solve`], invoking `progress` after every grid interval.
pub fn solve_with_progress<M: OdeSystem>(
    system: &M,
    y0: M::State,
    times: &[Real],
    options: &SolveOptions,
    mut progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<SimRecord<M::State>> {
    validate_grid(times)?;
    if options.substeps == 0 {
        return Err(SimError::InvalidArg {
            what: "substeps must be positive",
        });
    }

    let timer = Timer::start("solve");
    let wall_start = Instant::now();
    let intervals = times.len() - 1;
    debug!(
        points = times.len(),
        substeps = options.substeps,
        integrator = ?options.integrator,
        order = options.integrator.order(),
        "starting solve"
    );

    let mut x_record = Vec::with_capacity(times.len());
    x_record.push(y0.clone());

    let mut x = y0;
    let mut reported_non_finite = false;
    for (i, window) in times.windows(2).enumerate() {
        let (t_start, t_end) = (window[0], window[1]);
        let dt = (t_end - t_start) / options.substeps as Real;
        let mut t = t_start;
        for _ in 0..options.substeps {
            // Integrate one step using selected integrator
            x = match options.integrator {
                IntegratorType::RK4 => RK4.step(system, t, &x, dt)?,
                IntegratorType::ForwardEuler => ForwardEuler.step(system, t, &x, dt)?,
            };
            t += dt;
        }

        if !reported_non_finite && !system.is_finite(&x) {
            warn!(t = t_end, "solution became non-finite; continuing");
            reported_non_finite = true;
        }
        x_record.push(x.clone());

        if let Some(cb) = progress.as_deref_mut() {
            cb(SimProgress {
                interval: i + 1,
                intervals,
                t: t_end,
                elapsed_wall_s: wall_start.elapsed().as_secs_f64(),
            });
        }
    }

    solve_timing::SOLVE_CALLS.record(wall_start.elapsed().as_secs_f64());
    timer.stop_and_log();

    Ok(SimRecord {
        t: times.to_vec(),
        x: x_record,
    })
}

fn validate_grid(times: &[Real]) -> SimResult<()> {
    if times.is_empty() {
        return Err(SimError::InvalidArg {
            what: "time grid must not be empty",
        });
    }
    for (index, t) in times.iter().enumerate() {
        if !t.is_finite() {
            return Err(SimError::InvalidGrid {
                index,
                what: "non-finite time",
            });
        }
    }
    for (index, window) in times.windows(2).enumerate() {
        if window[1] <= window[0] {
            return Err(SimError::InvalidGrid {
                index: index + 1,
                what: "times must be strictly increasing",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FnSystem;

    fn decay() -> FnSystem<impl Fn(&[Real; 1], Real) -> [Real; 1], 1> {
        FnSystem::new(|y: &[Real; 1], _t| [-y[0]])
    }

    #[test]
    fn solve_options_defaults() {
        let opts = SolveOptions::default();
        assert_eq!(opts.integrator, IntegratorType::RK4);
        assert_eq!(opts.substeps, 1);
    }

    #[test]
    fn first_state_is_initial_condition() {
        let record = solve(&decay(), [2.5], &[0.0, 0.1, 0.2], &SolveOptions::default()).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.x[0], [2.5]);
        assert_eq!(record.t, vec![0.0, 0.1, 0.2]);
    }

    #[test]
    fn single_point_grid_returns_initial_state() {
        let record = solve(&decay(), [1.0], &[3.0], &SolveOptions::default()).unwrap();
        assert_eq!(record.x, vec![[1.0]]);
    }

    #[test]
    fn rejects_empty_grid() {
        let err = solve(&decay(), [1.0], &[], &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidArg { .. }));
    }

    #[test]
    fn rejects_non_increasing_grid() {
        let err = solve(&decay(), [1.0], &[0.0, 1.0, 1.0], &SolveOptions::default()).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidGrid {
                index: 2,
                what: "times must be strictly increasing"
            }
        );
    }

    #[test]
    fn rejects_nan_in_grid() {
        let err = solve(&decay(), [1.0], &[0.0, Real::NAN], &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidGrid { index: 1, .. }));
    }

    #[test]
    fn rejects_zero_substeps() {
        let opts = SolveOptions::with_substeps(0);
        assert!(solve(&decay(), [1.0], &[0.0, 1.0], &opts).is_err());
    }

    #[test]
    fn non_finite_values_propagate() {
        let blowup = FnSystem::new(|y: &[Real; 1], _t| [y[0] * y[0]]);
        let times: Vec<Real> = (0..50).map(|i| i as Real * 0.1).collect();
        let record = solve(&blowup, [100.0], &times, &SolveOptions::default()).unwrap();
        assert!(!record.x.last().unwrap()[0].is_finite());
    }

    #[test]
    fn progress_reports_every_interval() {
        let mut seen = Vec::new();
        let mut cb = |p: SimProgress| seen.push((p.interval, p.fraction_complete()));
        solve_with_progress(
            &decay(),
            [1.0],
            &[0.0, 0.5, 1.0, 1.5, 2.0],
            &SolveOptions::default(),
            Some(&mut cb),
        )
        .unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3], (4, 1.0));
    }

    #[test]
    fn integrator_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&IntegratorType::RK4).unwrap(),
            "\"rk4\""
        );
        assert_eq!(
            serde_json::to_string(&IntegratorType::ForwardEuler).unwrap(),
            "\"forward_euler\""
        );
        let opts: SolveOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, SolveOptions::default());
    }
}
