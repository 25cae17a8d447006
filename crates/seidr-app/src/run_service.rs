//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use seidr_model::{ParameterOverrides, Trajectory};
use seidr_project::ScenarioFile;
use seidr_results::{
    RunManifest, RunStore, records_from_trajectory, timestamp_now, trajectory_from_records,
};
use seidr_sim::SimProgress;
use tracing::info;

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};
use crate::scenario_service;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to execute a run of a scenario file.
pub struct RunRequest<'a> {
    pub scenario_path: &'a Path,
    /// Applied on top of the scenario's own overrides
    pub overrides: ParameterOverrides,
    pub options: RunOptions,
}

#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub load_scenario_time_s: f64,
    pub solve_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub trajectory: Trajectory,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_stage(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run, streaming stage and integration progress.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_stage(&mut progress_cb, RunStage::LoadingScenario, started, "Loading scenario");
    let scenario = scenario_service::load_scenario(request.scenario_path)?;
    timing.load_scenario_time_s = started.elapsed().as_secs_f64();

    emit_stage(&mut progress_cb, RunStage::CheckingCache, started, "Checking run cache");
    let run_id = seidr_results::compute_run_id(
        &scenario,
        &request.overrides,
        &request.options.solver_version,
    );
    let store = RunStore::for_scenario(request.scenario_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_stage(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
        );
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        let trajectory = trajectory_from_records(&store.load_timeseries(&run_id)?);
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();

        info!(%run_id, scenario = %scenario.name, "loaded cached run");
        emit_stage(&mut progress_cb, RunStage::Completed, started, "Loaded cached run");

        return Ok(RunResponse {
            run_id,
            manifest,
            trajectory,
            loaded_from_cache: true,
            timing,
        });
    }

    let mut model = scenario.build_model()?;
    emit_stage(&mut progress_cb, RunStage::Integrating, started, "Integrating");
    let solve_started = Instant::now();
    let trajectory = match progress_cb.as_deref_mut() {
        Some(cb) => {
            let mut on_interval = |p: SimProgress| {
                cb(RunProgressEvent {
                    stage: RunStage::Integrating,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: None,
                    fraction_complete: Some(p.fraction_complete()),
                })
            };
            model.compute_trajectory_with_progress(&request.overrides, Some(&mut on_interval))?
        }
        None => model.compute_trajectory(&request.overrides)?,
    };
    timing.solve_time_s = solve_started.elapsed().as_secs_f64();

    emit_stage(&mut progress_cb, RunStage::SavingResults, started, "Saving results");
    let save_started = Instant::now();
    let manifest = RunManifest {
        run_id: run_id.clone(),
        scenario_name: scenario.name.clone(),
        timestamp: timestamp_now(),
        days: scenario.days,
        points: trajectory.len(),
        solver_version: request.options.solver_version.clone(),
        overrides: request.overrides,
        summary: trajectory.summary(),
    };
    store.save_run(&manifest, &records_from_trajectory(&trajectory))?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    info!(
        %run_id,
        scenario = %scenario.name,
        solve_time_s = timing.solve_time_s,
        "run completed"
    );
    emit_stage(&mut progress_cb, RunStage::Completed, started, "Run completed");

    Ok(RunResponse {
        run_id,
        manifest,
        trajectory,
        loaded_from_cache: false,
        timing,
    })
}

/// Compute a trajectory for an in-memory scenario without touching any store.
pub fn run_uncached(
    scenario: &ScenarioFile,
    overrides: &ParameterOverrides,
) -> AppResult<Trajectory> {
    let mut model = scenario.build_model()?;
    let trajectory = model.compute_trajectory(overrides)?;
    info!(scenario = %scenario.name, points = trajectory.len(), "run completed");
    Ok(trajectory)
}

/// Stored runs of a scenario, most recent first.
pub fn list_runs(scenario_path: &Path) -> AppResult<Vec<RunManifest>> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let store = RunStore::for_scenario(scenario_path)?;

    let mut runs = store.list_runs(&scenario.name)?;
    runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(runs)
}

/// Load a specific run.
pub fn load_run(scenario_path: &Path, run_id: &str) -> AppResult<(RunManifest, Trajectory)> {
    let store = RunStore::for_scenario(scenario_path)?;

    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;

    Ok((manifest, trajectory_from_records(&records)))
}
