//! OdeSystem trait for pluggable derivative functions.

use crate::error::SimResult;
use seidr_core::Real;

/// A system of first-order ODEs `x' = f(t, x)`.
///
/// Implementors supply the right-hand side and the vector-space arithmetic
/// the integrators need (add two states, scale a state by a scalar). The
/// integrators never look inside `State`.
pub trait OdeSystem {
    /// State type (must be Clone, for snapshots).
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Must not mutate the system: integrating twice from the same state
    /// yields the same trajectory.
    fn rhs(&self, t: Real, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: Real) -> Self::State;

    /// Whether every component of `x` is finite. Used only for diagnostics;
    /// non-finite states are never treated as errors.
    fn is_finite(&self, _x: &Self::State) -> bool {
        true
    }
}

pub fn array_add<const N: usize>(a: &[Real; N], b: &[Real; N]) -> [Real; N] {
    std::array::from_fn(|i| a[i] + b[i])
}

pub fn array_scale<const N: usize>(a: &[Real; N], scale: Real) -> [Real; N] {
    std::array::from_fn(|i| scale * a[i])
}

/// Adapts a plain derivative function `f(state, t)` into an [`OdeSystem`]
/// over fixed-size arrays.
///
/// ```
/// use seidr_sim::{FnSystem, SolveOptions, solve};
///
/// let decay = FnSystem::new(|y: &[f64; 1], _t| [-y[0]]);
/// let record = solve(&decay, [1.0], &[0.0, 1.0], &SolveOptions::with_substeps(100)).unwrap();
/// assert!((record.x[1][0] - (-1.0_f64).exp()).abs() < 1e-9);
/// ```
pub struct FnSystem<F, const N: usize> {
    f: F,
}

impl<F, const N: usize> FnSystem<F, N>
where
    F: Fn(&[Real; N], Real) -> [Real; N],
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, const N: usize> OdeSystem for FnSystem<F, N>
where
    F: Fn(&[Real; N], Real) -> [Real; N],
{
    type State = [Real; N];

    fn rhs(&self, t: Real, x: &Self::State) -> SimResult<Self::State> {
        Ok((self.f)(x, t))
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
