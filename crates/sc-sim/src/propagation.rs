//! Exact zero-order-hold propagation for linear state-space models.
//!
//! Over an interval of length `h` with the input held at `u`, the state
//! advances as `x(t + h) = Phi x(t) + Gamma u` where
//!
//! ```text
//! exp([[A, B], [0, 0]] h) = [[Phi, Gamma], [0, 1]]
//! ```
//!
//! For a step input this is exact, independent of the step size.

use nalgebra::{DMatrix, DVector};
use sc_model::StateSpaceModel;
use tracing::trace;

/// Relative agreement under which a step size reuses the cached factors.
const STEP_REUSE_REL: f64 = 1e-12;

/// Discretized `(Phi, Gamma)` pair for one step size.
#[derive(Debug, Clone)]
struct Discretization {
    h: f64,
    phi: DMatrix<f64>,
    gamma: DVector<f64>,
}

/// Matrix-exponential propagator with a one-entry cache keyed on step size.
#[derive(Debug, Clone)]
pub struct ZohPropagator<'a> {
    ss: &'a StateSpaceModel,
    cached: Option<Discretization>,
    evaluations: usize,
}

impl<'a> ZohPropagator<'a> {
    pub fn new(ss: &'a StateSpaceModel) -> Self {
        Self {
            ss,
            cached: None,
            evaluations: 0,
        }
    }

    /// Number of matrix exponentials computed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Advance `x` by `h` with the input held at `u`.
    pub fn step(&mut self, x: &DVector<f64>, u: f64, h: f64) -> DVector<f64> {
        let disc = self.discretization(h);
        &disc.phi * x + &disc.gamma * u
    }

    fn discretization(&mut self, h: f64) -> &Discretization {
        let reusable = self
            .cached
            .as_ref()
            .is_some_and(|d| (d.h - h).abs() <= STEP_REUSE_REL * h.abs().max(d.h.abs()));
        if !reusable {
            self.cached = None;
        }
        let ss = self.ss;
        let evaluations = &mut self.evaluations;
        self.cached.get_or_insert_with(|| {
            *evaluations += 1;
            trace!(h, "recomputed zero-order-hold factors");
            discretize(ss, h)
        })
    }
}

fn discretize(ss: &StateSpaceModel, h: f64) -> Discretization {
    let n = ss.order();
    let mut augmented = DMatrix::<f64>::zeros(n + 1, n + 1);
    augmented.view_mut((0, 0), (n, n)).copy_from(&(ss.a() * h));
    augmented.view_mut((0, n), (n, 1)).copy_from(&(ss.b() * h));

    let e = augmented.exp();
    Discretization {
        h,
        phi: e.view((0, 0), (n, n)).into_owned(),
        gamma: e.column(n).rows(0, n).into_owned(),
    }
}
