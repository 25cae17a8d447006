//! SEIDR compartmental epidemic model.
//!
//! Provides:
//! - Clinical parameters, derived rates and the override state transition
//! - The SEIDR derivative function as a `seidr_sim::OdeSystem`
//! - `EpidemicModel`, which owns the time grid and recomputes trajectories
//! - Trajectory summaries, named scenarios and parallel parameter sweeps

pub mod compartment;
pub mod epidemic;
pub mod error;
pub mod params;
pub mod scenarios;
pub mod sweep;
pub mod system;
pub mod trajectory;

// Re-exports for public API
pub use compartment::{COMPARTMENT_COUNT, Compartment, StateVector};
pub use epidemic::{EpidemicModel, MAX_GRID_POINTS, POINTS_PER_DAY, SharedEpidemicModel};
pub use error::{ModelError, ModelResult};
pub use params::{
    DerivedRates, EpidemicParameters, InitialConditions, ModelInputs, ParameterOverrides,
};
pub use scenarios::{LOMBARDIA, Scenario};
pub use sweep::{SweepDefinition, SweepParameter, SweepPoint, run_sweep};
pub use system::SeidrSystem;
pub use trajectory::{Peak, Trajectory, TrajectorySummary};
