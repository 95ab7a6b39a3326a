//! [`LinearModel`]: one LTI system in either representation.

use nalgebra::DMatrix;
use sc_core::Tolerances;

use crate::error::ModelResult;
use crate::state_space::StateSpaceModel;
use crate::transfer_function::TransferFunctionModel;

/// SISO linear time-invariant system.
///
/// Owns its matrices/coefficients and is never mutated after construction.
/// Conversions return new, independently owned values.
#[derive(Debug, Clone, PartialEq)]
pub enum LinearModel {
    StateSpace(StateSpaceModel),
    TransferFunction(TransferFunctionModel),
}

impl LinearModel {
    /// State-space model from `A (n x n)`, `B (n x 1)`, `C (1 x n)`, `D (1 x 1)`.
    pub fn from_state_space(
        a: DMatrix<f64>,
        b: DMatrix<f64>,
        c: DMatrix<f64>,
        d: DMatrix<f64>,
    ) -> ModelResult<Self> {
        StateSpaceModel::new(a, b, c, d).map(Self::StateSpace)
    }

    /// Transfer-function model from coefficients, highest degree first.
    pub fn from_transfer_function(num: &[f64], den: &[f64]) -> ModelResult<Self> {
        TransferFunctionModel::new(num, den).map(Self::TransferFunction)
    }

    /// State-space form. Transfer functions are realized in controllable
    /// canonical form.
    pub fn to_state_space(&self) -> ModelResult<StateSpaceModel> {
        match self {
            Self::StateSpace(ss) => Ok(ss.clone()),
            Self::TransferFunction(tf) => tf.to_state_space(),
        }
    }

    /// Transfer-function form.
    pub fn to_transfer_function(&self) -> ModelResult<TransferFunctionModel> {
        match self {
            Self::StateSpace(ss) => ss.to_transfer_function(),
            Self::TransferFunction(tf) => Ok(tf.clone()),
        }
    }

    /// Number of states (state space) or denominator degree (transfer function).
    pub fn order(&self) -> usize {
        match self {
            Self::StateSpace(ss) => ss.order(),
            Self::TransferFunction(tf) => tf.order(),
        }
    }

    pub fn is_proper(&self) -> bool {
        match self {
            Self::StateSpace(_) => true,
            Self::TransferFunction(tf) => tf.is_proper(),
        }
    }

    /// Steady-state gain, `None` with a pole at the origin.
    pub fn dc_gain(&self) -> ModelResult<Option<f64>> {
        Ok(self.to_transfer_function()?.dc_gain())
    }

    /// Whether both models have the same input/output behavior, compared on
    /// normalized transfer-function coefficients.
    pub fn transfer_function_eq(&self, other: &Self, tol: Tolerances) -> ModelResult<bool> {
        let a = self.to_transfer_function()?;
        let b = other.to_transfer_function()?;
        Ok(a.approx_eq(&b, tol))
    }
}

impl From<StateSpaceModel> for LinearModel {
    fn from(ss: StateSpaceModel) -> Self {
        Self::StateSpace(ss)
    }
}

impl From<TransferFunctionModel> for LinearModel {
    fn from(tf: TransferFunctionModel) -> Self {
        Self::TransferFunction(tf)
    }
}
