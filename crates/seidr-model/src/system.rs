//! The SEIDR right-hand side.

use crate::compartment::StateVector;
use crate::params::DerivedRates;
use seidr_core::Real;
use seidr_sim::{OdeSystem, SimResult, array_add, array_scale};

/// SEIR with vital dynamics plus an absorbing D compartment fed by
/// disease mortality.
///
/// ```text
/// dS/dt = L - u*S - beta*S*(I/N0)
/// dE/dt = beta*S*(I/N0) - (u+epsilon)*E
/// dI/dt = epsilon*E - (gamma+u+alpha)*I
/// dD/dt = alpha*I
/// dR/dt = gamma*I - u*R
/// ```
///
/// D has no outflow while R loses `u*R` to natural death. The force of
/// infection divides by the constant N0, not the living population.
#[derive(Clone, Copy, Debug)]
pub struct SeidrSystem {
    rates: DerivedRates,
}

impl SeidrSystem {
    pub fn new(rates: DerivedRates) -> Self {
        Self { rates }
    }

    /// Instantaneous rate of change of `(S, E, I, D, R)`.
    pub fn derivatives(&self, y: &StateVector) -> StateVector {
        let [s, e, i, _d, r] = *y;
        let DerivedRates {
            epsilon,
            gamma,
            beta,
            alpha,
            u,
            birth_rate,
            total_population,
        } = self.rates;

        let infection = beta * s * (i / total_population);
        [
            birth_rate - u * s - infection,
            infection - (u + epsilon) * e,
            epsilon * e - (gamma + u + alpha) * i,
            alpha * i,
            gamma * i - u * r,
        ]
    }
}

impl OdeSystem for SeidrSystem {
    type State = StateVector;

    fn rhs(&self, _t: Real, x: &Self::State) -> SimResult<Self::State> {
        Ok(self.derivatives(x))
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        array_add(a, b)
    }

    fn scale(&self, a: &Self::State, scale: Real) -> Self::State {
        array_scale(a, scale)
    }

    fn is_finite(&self, x: &Self::State) -> bool {
        x.iter().all(|v| v.is_finite())
    }
}
