use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use seidr_model::{EpidemicModel, LOMBARDIA, ParameterOverrides};
use seidr_project::ScenarioFile;
use seidr_results::{
    ResultsError, RunManifest, RunStore, compute_run_id, records_from_trajectory,
    timestamp_now, trajectory_from_records, write_csv_file,
};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}_{}", prefix, std::process::id(), nanos));
    dir
}

fn short_run() -> (ScenarioFile, seidr_model::Trajectory) {
    let mut scenario = ScenarioFile::from_scenario(&LOMBARDIA);
    scenario.days = 5;
    scenario.points_per_day = 10;
    let trajectory = EpidemicModel::with_resolution(
        scenario.parameters,
        scenario.initial,
        scenario.days,
        scenario.points_per_day,
    )
    .unwrap()
    .evaluate(&ParameterOverrides::none())
    .unwrap();
    (scenario, trajectory)
}

fn manifest_for(scenario: &ScenarioFile, trajectory: &seidr_model::Trajectory) -> RunManifest {
    RunManifest {
        run_id: compute_run_id(scenario, &ParameterOverrides::none(), "0.1.0"),
        scenario_name: scenario.name.clone(),
        timestamp: timestamp_now(),
        days: scenario.days,
        points: trajectory.len(),
        solver_version: "0.1.0".to_string(),
        overrides: ParameterOverrides::none(),
        summary: trajectory.summary(),
    }
}

#[test]
fn save_list_load_roundtrip() {
    let scenario_dir = unique_temp_dir("seidr_results_scenario");
    fs::create_dir_all(&scenario_dir).expect("failed to create temp scenario dir");
    let scenario_path = scenario_dir.join("scenario.yaml");

    let store = RunStore::for_scenario(&scenario_path).expect("failed to create run store");
    assert!(store.root_dir().ends_with(".seidr/runs"));

    let (scenario, trajectory) = short_run();
    let manifest = manifest_for(&scenario, &trajectory);
    assert!(!store.has_run(&manifest.run_id));

    store
        .save_run(&manifest, &records_from_trajectory(&trajectory))
        .expect("failed to save run");
    assert!(store.has_run(&manifest.run_id));

    let runs = store.list_runs("Lombardia").expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0], manifest);
    assert!(store.list_runs("Elsewhere").unwrap().is_empty());

    let loaded = store
        .load_timeseries(&manifest.run_id)
        .expect("failed to load records");
    assert_eq!(loaded.len(), 50);
    assert_eq!(trajectory_from_records(&loaded), trajectory);

    store.delete_run(&manifest.run_id).unwrap();
    assert!(!store.has_run(&manifest.run_id));
    assert!(matches!(
        store.load_manifest(&manifest.run_id),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn csv_export_has_one_row_per_grid_point() {
    let dir = unique_temp_dir("seidr_results_csv");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("lombardia.csv");

    let (_, trajectory) = short_run();
    write_csv_file(&path, &trajectory).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("time_days,S,E,I,D,R"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), trajectory.len());
    assert!(rows[0].starts_with("0,9979999,20000,1,0,0"));
    assert!(rows.last().unwrap().starts_with("5,"));
}

#[test]
fn missing_run_is_reported() {
    let store = RunStore::new(unique_temp_dir("seidr_results_empty")).unwrap();
    assert!(matches!(
        store.load_timeseries("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert!(store.list_runs("Lombardia").unwrap().is_empty());
    store.delete_run("nope").unwrap();
}

#[test]
fn run_without_manifest_is_absent() {
    let store = RunStore::new(unique_temp_dir("seidr_results_partial")).unwrap();
    let (scenario, trajectory) = short_run();
    let manifest = manifest_for(&scenario, &trajectory);
    store
        .save_run(&manifest, &records_from_trajectory(&trajectory))
        .unwrap();

    // Interrupted save: time series written, manifest missing
    fs::remove_file(store.root_dir().join(&manifest.run_id).join("manifest.json")).unwrap();

    assert!(!store.has_run(&manifest.run_id));
    assert!(store.list_runs(&scenario.name).unwrap().is_empty());
    assert!(matches!(
        store.load_manifest(&manifest.run_id),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert_eq!(store.load_timeseries(&manifest.run_id).unwrap().len(), trajectory.len());
}

#[test]
fn run_ids_must_be_plain_names() {
    let store = RunStore::new(unique_temp_dir("seidr_results_ids")).unwrap();
    for id in ["", "..", "../escape", "a/b", "a\\b"] {
        assert!(!store.has_run(id), "{id:?}");
        assert!(
            matches!(store.load_manifest(id), Err(ResultsError::InvalidPath { .. })),
            "{id:?}"
        );
        assert!(store.delete_run(id).is_err(), "{id:?}");
    }
}
