//! Compartment naming and the state vector layout.

use seidr_core::Real;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COMPARTMENT_COUNT: usize = 5;

/// `(S, E, I, D, R)` headcounts, in that order.
pub type StateVector = [Real; COMPARTMENT_COUNT];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compartment {
    Susceptible,
    Exposed,
    Infectious,
    Dead,
    Recovered,
}

impl Compartment {
    /// All compartments in state-vector order.
    pub const ALL: [Compartment; COMPARTMENT_COUNT] = [
        Compartment::Susceptible,
        Compartment::Exposed,
        Compartment::Infectious,
        Compartment::Dead,
        Compartment::Recovered,
    ];

    pub fn index(self) -> usize {
        match self {
            Compartment::Susceptible => 0,
            Compartment::Exposed => 1,
            Compartment::Infectious => 2,
            Compartment::Dead => 3,
            Compartment::Recovered => 4,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Compartment::Susceptible => "S",
            Compartment::Exposed => "E",
            Compartment::Infectious => "I",
            Compartment::Dead => "D",
            Compartment::Recovered => "R",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptible",
            Compartment::Exposed => "Exposed",
            Compartment::Infectious => "Infectious",
            Compartment::Dead => "Dead",
            Compartment::Recovered => "Recovered",
        }
    }

    /// Every compartment except `Dead` is subject to natural death.
    pub fn is_living(self) -> bool {
        !matches!(self, Compartment::Dead)
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
