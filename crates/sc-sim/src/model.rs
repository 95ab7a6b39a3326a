//! TransientModel trait and the step-driven state-space right-hand side.

use nalgebra::DVector;
use sc_model::StateSpaceModel;

use crate::error::SimResult;

/// A system `x' = f(t, x)` that the explicit [`Integrator`](crate::Integrator)s can advance.
///
/// The integrators only combine states through [`add`](Self::add) and
/// [`scale`](Self::scale), so any vector-like state works.
pub trait TransientModel {
    type State: Clone;

    /// State at t = 0.
    fn initial_state(&self) -> Self::State;

    /// `f(t, x)`. Takes `&mut self` so a model may keep scratch data between calls.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// `a + b`.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// `scale * a`.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}

/// `x' = A x + B u(t)` under a step of height `amplitude` applied at t = 0.
#[derive(Debug, Clone)]
pub struct StepDriven<'a> {
    ss: &'a StateSpaceModel,
    amplitude: f64,
}

impl<'a> StepDriven<'a> {
    pub fn new(ss: &'a StateSpaceModel, amplitude: f64) -> Self {
        Self { ss, amplitude }
    }

    /// Unit step.
    pub fn unit(ss: &'a StateSpaceModel) -> Self {
        Self::new(ss, 1.0)
    }

    /// Input value at `t`.
    pub fn input(&self, t: f64) -> f64 {
        if t >= 0.0 { self.amplitude } else { 0.0 }
    }
}

impl TransientModel for StepDriven<'_> {
    type State = DVector<f64>;

    fn initial_state(&self) -> Self::State {
        DVector::zeros(self.ss.order())
    }

    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok(self.ss.derivative(x, self.input(t)))
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }
}
