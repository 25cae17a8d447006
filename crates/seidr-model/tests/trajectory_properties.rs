//! Integration test: structural properties of SEIDR trajectories.
//!
//! - disease-free equilibrium stays put
//! - REP_0 = 0 removes the S -> E flow whatever E0/I0 are
//! - D is non-decreasing and starts at D0
//! - the first state is (S0, E0, I0, D0, R0)
//! - halving the step barely moves the solution
//! - an empty recompute equals restating every value explicitly
//! - a stiff incubation rate yields non-finite values, not an error

use proptest::prelude::*;
use seidr_model::{
    Compartment, EpidemicModel, EpidemicParameters, InitialConditions, LOMBARDIA,
    ParameterOverrides,
};
use seidr_core::relative_difference;
use seidr_sim::SolveOptions;

fn model_with(initial: InitialConditions, days: u32) -> EpidemicModel {
    EpidemicModel::new(LOMBARDIA.parameters, initial, days).unwrap()
}

#[test]
fn unstable_step_propagates_non_finite_values() {
    // epsilon * dt = 1e4 is far outside RK4's stability region
    let mut model = model_with(LOMBARDIA.initial, 2);
    let trajectory = model
        .compute_trajectory(&ParameterOverrides::none().with_incubation_period(1e-6))
        .unwrap();

    assert_eq!(trajectory.len(), 200);
    assert!(!trajectory.all_finite());
    assert!(!trajectory.summary().all_finite);
    assert_eq!(trajectory.state_at(0), Some(model.initial_state()));
}

#[test]
fn disease_free_equilibrium_is_stationary() {
    let mut model = model_with(InitialConditions::default(), 30);
    let trajectory = model.compute_trajectory(&ParameterOverrides::none()).unwrap();
    let n0 = LOMBARDIA.parameters.total_population;

    for c in [
        Compartment::Exposed,
        Compartment::Infectious,
        Compartment::Dead,
        Compartment::Recovered,
    ] {
        assert!(trajectory.series(c).iter().all(|&v| v == 0.0), "{c}");
    }
    for &s in trajectory.series(Compartment::Susceptible) {
        assert!((s - n0).abs() / n0 < 1e-12);
    }
}

#[test]
fn zero_reproduction_number_reduces_to_vital_dynamics() {
    let mut model = LOMBARDIA.build().unwrap();
    let trajectory = model
        .compute_trajectory(&ParameterOverrides::none().with_basic_reproduction_number(0.0))
        .unwrap();
    assert_eq!(model.rates().beta, 0.0);

    // Without infection S' = L - u S, so S(t) = N0 - (N0 - S0) exp(-u t)
    let n0 = LOMBARDIA.parameters.total_population;
    let u = model.rates().u;
    let s0 = model.susceptible0();
    let susceptible = trajectory.series(Compartment::Susceptible);
    for (t, &s) in trajectory.time.iter().zip(susceptible) {
        let exact = n0 - (n0 - s0) * (-u * t).exp();
        assert!((s - exact).abs() / exact < 1e-9, "t={t}");
    }
    for w in susceptible.windows(2) {
        assert!(w[1] >= w[0]);
        assert!(w[1] <= n0);
    }

    // E only drains: E' = -(u + epsilon) E
    for w in trajectory.series(Compartment::Exposed).windows(2) {
        assert!(w[1] < w[0]);
    }
}

#[test]
fn first_state_matches_initial_conditions() {
    let initial = InitialConditions {
        exposed: 150.0,
        infectious: 12.0,
        dead: 3.0,
        recovered: 40.0,
    };
    let trajectory = model_with(initial, 3)
        .evaluate(&ParameterOverrides::none())
        .unwrap();
    let n0 = LOMBARDIA.parameters.total_population;
    assert_eq!(
        trajectory.state_at(0),
        Some([n0 - 205.0, 150.0, 12.0, 3.0, 40.0])
    );
}

#[test]
fn halving_the_step_changes_little() {
    let base = LOMBARDIA.build().unwrap();
    let fine = base.clone().with_solve_options(SolveOptions::with_substeps(2));

    let coarse_t = base.evaluate(&ParameterOverrides::none()).unwrap();
    let fine_t = fine.evaluate(&ParameterOverrides::none()).unwrap();
    assert_eq!(coarse_t.time, fine_t.time);

    for index in [1000, 3089, 4000, 7999] {
        let a = coarse_t.state_at(index).unwrap();
        let b = fine_t.state_at(index).unwrap();
        for k in 0..5 {
            let rel = relative_difference(a[k], b[k]);
            assert!(rel < 1e-4, "index {index} component {k}: rel {rel:e}");
        }
    }
}

#[test]
fn empty_recompute_equals_explicit_recompute() {
    let mut model = LOMBARDIA.build().unwrap();
    model
        .compute_trajectory(
            &ParameterOverrides::none()
                .with_incubation_period(4.5)
                .with_initial_exposed(5_000.0),
        )
        .unwrap();

    let restated = ParameterOverrides::explicit(model.inputs());
    let implicit = model.compute_trajectory(&ParameterOverrides::none()).unwrap();
    let explicit = model.compute_trajectory(&restated).unwrap();
    assert_eq!(implicit, explicit);
}

#[test]
fn recompute_is_fresh_each_time() {
    let mut model = LOMBARDIA.build().unwrap();
    let first = model
        .compute_trajectory(&ParameterOverrides::none().with_basic_reproduction_number(2.0))
        .unwrap();
    let second = model
        .compute_trajectory(&ParameterOverrides::none().with_basic_reproduction_number(8.0))
        .unwrap();
    let back = model
        .compute_trajectory(&ParameterOverrides::none().with_basic_reproduction_number(2.0))
        .unwrap();

    assert_eq!(first.len(), second.len());
    assert_ne!(first, second);
    assert_eq!(first, back);
}

#[test]
fn negative_s0_is_rejected() {
    let initial = InitialConditions {
        exposed: 6_000_000.0,
        infectious: 5_000_000.0,
        dead: 0.0,
        recovered: 0.0,
    };
    assert!(EpidemicModel::new(LOMBARDIA.parameters, initial, 10).is_err());
}

fn arb_case() -> impl Strategy<Value = (EpidemicParameters, InitialConditions)> {
    (
        (1.0_f64..14.0, 2.0_f64..25.0, 1e3_f64..1e8, 0.0_f64..0.05),
        (0.0_f64..15.0, 20.0_f64..100.0),
        (0.0_f64..0.05, 0.0_f64..0.05, 0.0_f64..0.05, 0.0_f64..0.05),
    )
        .prop_map(|((inc, inf, n0, alpha), (rep0, life), (fe, fi, fd, fr))| {
            (
                EpidemicParameters {
                    incubation_period: inc,
                    infectious_period: inf,
                    total_population: n0,
                    fatality_rate: alpha,
                    basic_reproduction_number: rep0,
                    avg_life_expectancy: life,
                },
                InitialConditions {
                    exposed: fe * n0,
                    infectious: fi * n0,
                    dead: fd * n0,
                    recovered: fr * n0,
                },
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn dead_never_decreases((params, initial) in arb_case(), days in 1u32..20) {
        let trajectory = EpidemicModel::new(params, initial, days)
            .unwrap()
            .evaluate(&ParameterOverrides::none())
            .unwrap();

        let dead = trajectory.series(Compartment::Dead);
        prop_assert_eq!(dead[0], initial.dead);
        for w in dead.windows(2) {
            prop_assert!(w[1] >= w[0]);
        }
        prop_assert!(trajectory.all_finite());
        prop_assert!(trajectory.is_non_negative(1e-6 * params.total_population));
    }
}
