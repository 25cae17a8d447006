//! Compartment trajectories and their summaries.

use crate::compartment::{COMPARTMENT_COUNT, Compartment, StateVector};
use seidr_core::Real;
use seidr_sim::SimRecord;
use serde::{Deserialize, Serialize};

/// Time grid plus one sequence per compartment, index-aligned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Days since the start of the outbreak
    pub time: Vec<Real>,
    pub susceptible: Vec<Real>,
    pub exposed: Vec<Real>,
    pub infectious: Vec<Real>,
    pub dead: Vec<Real>,
    pub recovered: Vec<Real>,
}

/// Maximum of one compartment over the trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub index: usize,
    pub time: Real,
    pub value: Real,
}

/// Headline numbers of a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub points: usize,
    pub horizon_days: Real,
    pub peak_infectious: Real,
    pub peak_infectious_day: Real,
    pub final_susceptible: Real,
    pub final_exposed: Real,
    pub final_infectious: Real,
    pub final_dead: Real,
    pub final_recovered: Real,
    pub all_finite: bool,
}

impl Trajectory {
    /// Build from time points and states in `(S, E, I, D, R)` order.
    pub fn from_states(time: Vec<Real>, states: &[StateVector]) -> Self {
        let column = |c: Compartment| states.iter().map(|x| x[c.index()]).collect::<Vec<_>>();
        Self {
            susceptible: column(Compartment::Susceptible),
            exposed: column(Compartment::Exposed),
            infectious: column(Compartment::Infectious),
            dead: column(Compartment::Dead),
            recovered: column(Compartment::Recovered),
            time,
        }
    }

    pub fn from_record(record: SimRecord<StateVector>) -> Self {
        Self::from_states(record.t, &record.x)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn series(&self, compartment: Compartment) -> &[Real] {
        match compartment {
            Compartment::Susceptible => &self.susceptible,
            Compartment::Exposed => &self.exposed,
            Compartment::Infectious => &self.infectious,
            Compartment::Dead => &self.dead,
            Compartment::Recovered => &self.recovered,
        }
    }

    /// The five sequences in `(S, E, I, D, R)` order.
    pub fn compartments(&self) -> [&[Real]; COMPARTMENT_COUNT] {
        Compartment::ALL.map(|c| self.series(c))
    }

    pub fn state_at(&self, index: usize) -> Option<StateVector> {
        if index >= self.len() {
            return None;
        }
        Some(Compartment::ALL.map(|c| self.series(c)[index]))
    }

    pub fn final_state(&self) -> Option<StateVector> {
        self.len().checked_sub(1).and_then(|i| self.state_at(i))
    }

    /// S + E + I + R at `index`.
    pub fn living_population(&self, index: usize) -> Option<Real> {
        self.state_at(index).map(|x| {
            Compartment::ALL
                .iter()
                .filter(|c| c.is_living())
                .map(|c| x[c.index()])
                .sum()
        })
    }

    /// First occurrence of the largest finite value of `compartment`.
    pub fn peak(&self, compartment: Compartment) -> Option<Peak> {
        self.series(compartment)
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .fold(None, |best: Option<(usize, Real)>, (i, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
            .map(|(index, value)| Peak {
                index,
                time: self.time[index],
                value,
            })
    }

    pub fn all_finite(&self) -> bool {
        Compartment::ALL
            .iter()
            .all(|&c| self.series(c).iter().all(|v| v.is_finite()))
    }

    /// Every value at least `-tolerance`.
    pub fn is_non_negative(&self, tolerance: Real) -> bool {
        Compartment::ALL
            .iter()
            .all(|&c| self.series(c).iter().all(|&v| v >= -tolerance))
    }

    pub fn summary(&self) -> TrajectorySummary {
        let last = self.final_state().unwrap_or([Real::NAN; COMPARTMENT_COUNT]);
        let peak = self.peak(Compartment::Infectious);
        TrajectorySummary {
            points: self.len(),
            horizon_days: self.time.last().copied().unwrap_or(0.0),
            peak_infectious: peak.map_or(Real::NAN, |p| p.value),
            peak_infectious_day: peak.map_or(Real::NAN, |p| p.time),
            final_susceptible: last[Compartment::Susceptible.index()],
            final_exposed: last[Compartment::Exposed.index()],
            final_infectious: last[Compartment::Infectious.index()],
            final_dead: last[Compartment::Dead.index()],
            final_recovered: last[Compartment::Recovered.index()],
            all_finite: self.all_finite(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        Trajectory::from_states(
            vec![0.0, 1.0, 2.0, 3.0],
            &[
                [90.0, 5.0, 5.0, 0.0, 0.0],
                [80.0, 8.0, 10.0, 1.0, 1.0],
                [70.0, 6.0, 12.0, 2.0, 10.0],
                [65.0, 3.0, 12.0, 3.0, 17.0],
            ],
        )
    }

    #[test]
    fn columns_are_split_in_state_order() {
        let t = sample();
        assert_eq!(t.len(), 4);
        assert_eq!(t.infectious, vec![5.0, 10.0, 12.0, 12.0]);
        assert_eq!(t.series(Compartment::Dead), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(t.compartments()[4], &[0.0, 1.0, 10.0, 17.0]);
        assert_eq!(t.state_at(1), Some([80.0, 8.0, 10.0, 1.0, 1.0]));
        assert_eq!(t.state_at(4), None);
    }

    #[test]
    fn peak_reports_first_maximum() {
        let p = sample().peak(Compartment::Infectious).unwrap();
        assert_eq!(p.index, 2);
        assert_eq!(p.time, 2.0);
        assert_eq!(p.value, 12.0);
    }

    #[test]
    fn peak_skips_non_finite_values() {
        let mut t = sample();
        t.exposed[1] = Real::NAN;
        t.exposed[3] = Real::INFINITY;
        let p = t.peak(Compartment::Exposed).unwrap();
        assert_eq!(p.value, 6.0);
        assert!(!t.all_finite());
    }

    #[test]
    fn living_population_excludes_dead() {
        assert_eq!(sample().living_population(1), Some(99.0));
    }

    #[test]
    fn summary_of_sample() {
        let s = sample().summary();
        assert_eq!(s.points, 4);
        assert_eq!(s.horizon_days, 3.0);
        assert_eq!(s.peak_infectious, 12.0);
        assert_eq!(s.peak_infectious_day, 2.0);
        assert_eq!(s.final_dead, 3.0);
        assert_eq!(s.final_recovered, 17.0);
        assert!(s.all_finite);
    }

    #[test]
    fn empty_trajectory_summary() {
        let t = Trajectory::from_states(Vec::new(), &[]);
        assert!(t.is_empty());
        assert_eq!(t.final_state(), None);
        let s = t.summary();
        assert_eq!(s.points, 0);
        assert!(s.peak_infectious.is_nan());
    }

    #[test]
    fn non_negative_tolerance() {
        let mut t = sample();
        assert!(t.is_non_negative(0.0));
        t.exposed[2] = -1e-9;
        assert!(!t.is_non_negative(0.0));
        assert!(t.is_non_negative(1e-6));
    }
}
