//! `EpidemicModel`: current inputs, derived rates and the fixed time grid.

use crate::compartment::StateVector;
use crate::error::{ModelError, ModelResult};
use crate::params::{
    DerivedRates, EpidemicParameters, InitialConditions, ModelInputs, ParameterOverrides,
};
use crate::system::SeidrSystem;
use crate::trajectory::Trajectory;
use seidr_core::{Real, linspace};
use seidr_sim::{SimProgress, SolveOptions, solve_with_progress};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Grid points per simulated day (nominal step 0.01 day).
pub const POINTS_PER_DAY: usize = 100;

/// Upper bound on `days * points_per_day`.
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Owns the current [`ModelInputs`] and the time grid, and integrates the
/// SEIDR system on demand.
///
/// The grid is built once at construction and never changes. Recomputing
/// with overrides replaces the stored inputs and rates as a unit.
#[derive(Clone, Debug)]
pub struct EpidemicModel {
    inputs: ModelInputs,
    rates: DerivedRates,
    days: u32,
    points_per_day: usize,
    time_grid: Vec<Real>,
    solve_options: SolveOptions,
}

impl EpidemicModel {
    /// Model over `[0, days]` sampled at [`POINTS_PER_DAY`] points per day.
    pub fn new(
        parameters: EpidemicParameters,
        initial: InitialConditions,
        days: u32,
    ) -> ModelResult<Self> {
        Self::with_resolution(parameters, initial, days, POINTS_PER_DAY)
    }

    /// Model over `[0, days]` with `days * points_per_day` grid points,
    /// both endpoints included. The product may not exceed
    /// [`MAX_GRID_POINTS`].
    pub fn with_resolution(
        parameters: EpidemicParameters,
        initial: InitialConditions,
        days: u32,
        points_per_day: usize,
    ) -> ModelResult<Self> {
        if days == 0 {
            return Err(ModelError::InvalidGrid {
                what: "days must be at least 1",
            });
        }
        if points_per_day < 2 {
            return Err(ModelError::InvalidGrid {
                what: "points_per_day must be at least 2",
            });
        }

        let points = (days as usize)
            .checked_mul(points_per_day)
            .filter(|&n| n <= MAX_GRID_POINTS)
            .ok_or(ModelError::InvalidGrid {
                what: "days * points_per_day exceeds the grid size limit",
            })?;

        let inputs = ModelInputs::new(parameters, initial)?;
        let rates = inputs.derived_rates();
        let time_grid = linspace(0.0, Real::from(days), points);
        debug!(?rates, s0 = inputs.susceptible0(), points = time_grid.len(), "model constructed");

        Ok(Self {
            inputs,
            rates,
            days,
            points_per_day,
            time_grid,
            solve_options: SolveOptions::default(),
        })
    }

    pub fn with_solve_options(mut self, options: SolveOptions) -> Self {
        self.solve_options = options;
        self
    }

    pub fn time_grid(&self) -> &[Real] {
        &self.time_grid
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn points_per_day(&self) -> usize {
        self.points_per_day
    }

    pub fn solve_options(&self) -> &SolveOptions {
        &self.solve_options
    }

    pub fn inputs(&self) -> &ModelInputs {
        &self.inputs
    }

    pub fn parameters(&self) -> &EpidemicParameters {
        &self.inputs.parameters
    }

    pub fn initial(&self) -> &InitialConditions {
        &self.inputs.initial
    }

    pub fn rates(&self) -> &DerivedRates {
        &self.rates
    }

    pub fn susceptible0(&self) -> Real {
        self.inputs.susceptible0()
    }

    pub fn initial_state(&self) -> StateVector {
        self.inputs.initial_state()
    }

    /// Trajectory for the current inputs with `overrides` applied, without
    /// changing the model.
    pub fn evaluate(&self, overrides: &ParameterOverrides) -> ModelResult<Trajectory> {
        let inputs = self.inputs.apply(overrides)?;
        self.integrate(&inputs, inputs.derived_rates(), None)
    }

    /// Replace the stored inputs with `overrides` applied, recomputing the
    /// derived rates. Nothing changes if the result is invalid.
    pub fn apply_overrides(&mut self, overrides: &ParameterOverrides) -> ModelResult<()> {
        let inputs = self.inputs.apply(overrides)?;
        if !overrides.is_empty() {
            debug!(?overrides, "applying parameter overrides");
        }
        self.inputs = inputs;
        self.rates = inputs.derived_rates();
        Ok(())
    }

    /// Apply `overrides` to the stored inputs, then integrate.
    ///
    /// Invalid overrides are rejected before anything is stored. With no
    /// overrides the result equals that of restating every current value.
    pub fn compute_trajectory(&mut self, overrides: &ParameterOverrides) -> ModelResult<Trajectory> {
        self.compute_trajectory_with_progress(overrides, None)
    }

    /// Same as [`compute_trajectory`](Self::compute_trajectory), reporting
    /// integration progress after every grid interval.
    pub fn compute_trajectory_with_progress(
        &mut self,
        overrides: &ParameterOverrides,
        progress: Option<&mut dyn FnMut(SimProgress)>,
    ) -> ModelResult<Trajectory> {
        self.apply_overrides(overrides)?;
        self.integrate(&self.inputs, self.rates, progress)
    }

    fn integrate(
        &self,
        inputs: &ModelInputs,
        rates: DerivedRates,
        progress: Option<&mut dyn FnMut(SimProgress)>,
    ) -> ModelResult<Trajectory> {
        let system = SeidrSystem::new(rates);
        let record = solve_with_progress(
            &system,
            inputs.initial_state(),
            &self.time_grid,
            &self.solve_options,
            progress,
        )?;
        let trajectory = Trajectory::from_record(record);
        if !trajectory.all_finite() {
            warn!(
                beta = rates.beta,
                "trajectory contains non-finite values"
            );
        }
        Ok(trajectory)
    }
}

/// An [`EpidemicModel`] shared between callers.
///
/// `recompute` holds the lock across the whole "apply overrides, integrate"
/// unit, so concurrent callers never observe half-applied inputs.
#[derive(Clone, Debug)]
pub struct SharedEpidemicModel {
    inner: Arc<Mutex<EpidemicModel>>,
}

impl SharedEpidemicModel {
    pub fn new(model: EpidemicModel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(model)),
        }
    }

    pub fn recompute(&self, overrides: &ParameterOverrides) -> ModelResult<Trajectory> {
        // Inputs are replaced wholesale, so a poisoned lock still guards a
        // consistent model.
        let mut model = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        model.compute_trajectory(overrides)
    }

    /// Copy of the current model state.
    pub fn snapshot(&self) -> EpidemicModel {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::LOMBARDIA;

    #[test]
    fn grid_has_points_per_day_times_days() {
        let model = LOMBARDIA.build().unwrap();
        assert_eq!(model.time_grid().len(), 8000);
        assert_eq!(model.time_grid()[0], 0.0);
        assert_eq!(*model.time_grid().last().unwrap(), 80.0);
    }

    #[test]
    fn rejects_zero_days() {
        let err = EpidemicModel::new(LOMBARDIA.parameters, LOMBARDIA.initial, 0).unwrap_err();
        assert!(matches!(err, ModelError::InvalidGrid { .. }));
    }

    #[test]
    fn rejects_coarse_resolution() {
        let err =
            EpidemicModel::with_resolution(LOMBARDIA.parameters, LOMBARDIA.initial, 5, 1)
                .unwrap_err();
        assert!(matches!(err, ModelError::InvalidGrid { .. }));
    }

    #[test]
    fn rejects_grid_larger_than_the_limit() {
        let err = EpidemicModel::with_resolution(
            LOMBARDIA.parameters,
            LOMBARDIA.initial,
            LOMBARDIA.days,
            usize::MAX / 2,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidGrid { .. }));

        let err = EpidemicModel::with_resolution(
            LOMBARDIA.parameters,
            LOMBARDIA.initial,
            1,
            MAX_GRID_POINTS + 1,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidGrid { .. }));
    }

    #[test]
    fn construction_computes_s0_and_rates() {
        let model = LOMBARDIA.build().unwrap();
        assert_eq!(model.susceptible0(), 9_979_999.0);
        assert!((model.rates().beta - 0.131 * 5.72).abs() < 1e-12);
        assert_eq!(model.initial_state(), [9_979_999.0, 20_000.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn compute_trajectory_stores_overrides() {
        let mut model = EpidemicModel::new(LOMBARDIA.parameters, LOMBARDIA.initial, 5).unwrap();
        let overrides = ParameterOverrides::none()
            .with_incubation_period(5.0)
            .with_basic_reproduction_number(2.0);
        let trajectory = model.compute_trajectory(&overrides).unwrap();

        assert_eq!(trajectory.len(), 500);
        assert_eq!(model.parameters().incubation_period, 5.0);
        assert!((model.rates().epsilon - 0.2).abs() < 1e-15);
        assert!((model.rates().beta - 0.131 * 2.0).abs() < 1e-12);
        assert_eq!(model.time_grid().len(), 500);
    }

    #[test]
    fn failed_override_leaves_model_untouched() {
        let mut model = EpidemicModel::new(LOMBARDIA.parameters, LOMBARDIA.initial, 5).unwrap();
        let before = *model.inputs();
        let bad = ParameterOverrides::none().with_infectious_period(0.0);
        assert!(model.compute_trajectory(&bad).is_err());
        assert_eq!(*model.inputs(), before);
    }

    #[test]
    fn apply_overrides_updates_rates_without_integrating() {
        let mut model = EpidemicModel::new(LOMBARDIA.parameters, LOMBARDIA.initial, 5).unwrap();
        model
            .apply_overrides(&ParameterOverrides::none().with_infectious_period(4.0))
            .unwrap();
        assert_eq!(model.rates().gamma, 0.25);
        assert!((model.rates().beta - 0.256 * 5.72).abs() < 1e-12);
    }

    #[test]
    fn progress_reaches_the_end_of_the_grid() {
        let mut model = EpidemicModel::new(LOMBARDIA.parameters, LOMBARDIA.initial, 2).unwrap();
        let mut calls = 0;
        let mut last = 0.0;
        let mut cb = |p: SimProgress| {
            calls += 1;
            last = p.fraction_complete();
        };
        model
            .compute_trajectory_with_progress(&ParameterOverrides::none(), Some(&mut cb))
            .unwrap();
        assert_eq!(calls, 199);
        assert!((last - 1.0).abs() < 1e-12);
    }

    #[test]
    fn evaluate_does_not_mutate() {
        let model = EpidemicModel::new(LOMBARDIA.parameters, LOMBARDIA.initial, 5).unwrap();
        let t = model
            .evaluate(&ParameterOverrides::none().with_basic_reproduction_number(0.0))
            .unwrap();
        assert_eq!(t.len(), 500);
        assert_eq!(model.parameters().basic_reproduction_number, 5.72);
    }

    #[test]
    fn shared_model_recomputes_under_lock() {
        let shared = SharedEpidemicModel::new(
            EpidemicModel::new(LOMBARDIA.parameters, LOMBARDIA.initial, 2).unwrap(),
        );
        let other = shared.clone();
        let handle = std::thread::spawn(move || {
            other
                .recompute(&ParameterOverrides::none().with_initial_exposed(1000.0))
                .unwrap()
                .len()
        });
        assert_eq!(handle.join().unwrap(), 200);
        assert_eq!(shared.snapshot().initial().exposed, 1000.0);
    }
}
