use seidr_model::{LOMBARDIA, SweepParameter};
use std::path::Path;

fn scenarios_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios")
}

#[test]
fn bundled_scenarios_load_and_build() {
    for name in ["lombardia.yaml", "lombardia_r0_sweep.yaml"] {
        let path = scenarios_dir().join(name);
        let scenario = seidr_project::load_scenario(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        scenario
            .build_model()
            .unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
    }
}

#[test]
fn lombardia_file_matches_builtin() {
    let scenario = seidr_project::load_yaml(&scenarios_dir().join("lombardia.yaml")).unwrap();
    assert_eq!(scenario.parameters, LOMBARDIA.parameters);
    assert_eq!(scenario.initial, LOMBARDIA.initial);
    assert_eq!(scenario.days, LOMBARDIA.days);

    let model = scenario.build_model().unwrap();
    assert_eq!(model.time_grid().len(), 8000);
}

#[test]
fn sweep_scenario_carries_its_sweep() {
    let scenario =
        seidr_project::load_yaml(&scenarios_dir().join("lombardia_r0_sweep.yaml")).unwrap();
    let sweep = scenario.sweep.unwrap();
    assert_eq!(sweep.parameter, SweepParameter::BasicReproductionNumber);
    assert_eq!(sweep.generate_points().len(), 11);
}
