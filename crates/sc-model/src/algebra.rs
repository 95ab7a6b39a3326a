//! Block-diagram algebra on [`LinearModel`]s.
//!
//! All compositions work at the transfer-function level and return a new
//! transfer-function model. No pole-zero cancellation is attempted, so the
//! order of a series or parallel connection is the sum of the operand orders.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::model::LinearModel;
use crate::poly::Poly;
use crate::transfer_function::TransferFunctionModel;

/// A closed-loop denominator coefficient at most this fraction of the
/// magnitudes it was formed from is taken as cancelled.
const CANCELLATION_REL: f64 = 1e-12;

/// Sign with which the fed-back signal enters the summing junction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSign {
    /// `e = r - y`
    #[default]
    Negative,
    /// `e = r + y`
    Positive,
}

impl FeedbackSign {
    pub fn value(self) -> f64 {
        match self {
            FeedbackSign::Negative => -1.0,
            FeedbackSign::Positive => 1.0,
        }
    }
}

/// Static gain `k / 1`.
pub fn gain(k: f64) -> ModelResult<LinearModel> {
    LinearModel::from_transfer_function(&[k], &[1.0])
}

/// Cascade: the output of `g1` drives the input of `g2`.
///
/// `(N1 N2) / (D1 D2)`.
pub fn series(g1: &LinearModel, g2: &LinearModel) -> ModelResult<LinearModel> {
    let tf1 = g1.to_transfer_function()?;
    let tf2 = g2.to_transfer_function()?;
    let num = tf1.num_poly() * tf2.num_poly();
    let den = tf1.den_poly() * tf2.den_poly();
    debug!(num = %num, den = %den, "series");
    TransferFunctionModel::from_polys(num, den).map(LinearModel::TransferFunction)
}

/// Sum of the outputs of `g1` and `g2` driven by the same input.
///
/// `(N1 D2 + N2 D1) / (D1 D2)`.
pub fn parallel(g1: &LinearModel, g2: &LinearModel) -> ModelResult<LinearModel> {
    let tf1 = g1.to_transfer_function()?;
    let tf2 = g2.to_transfer_function()?;
    let num = &(tf1.num_poly() * tf2.den_poly()) + &(tf2.num_poly() * tf1.den_poly());
    let den = tf1.den_poly() * tf2.den_poly();
    debug!(num = %num, den = %den, "parallel");
    TransferFunctionModel::from_polys(num, den).map(LinearModel::TransferFunction)
}

/// Closed loop with `forward` in the direct path and `sensor` in the return path.
///
/// `N1 D2 / (D1 D2 - sign N1 N2)`.
///
/// No stability check is made here; an unstable loop is only detected when
/// it is simulated.
///
/// # Errors
///
/// [`ModelError::InvalidModel`] if the closed-loop denominator cancels to zero.
pub fn feedback(
    forward: &LinearModel,
    sensor: &LinearModel,
    sign: FeedbackSign,
) -> ModelResult<LinearModel> {
    let fwd = forward.to_transfer_function()?;
    let ret = sensor.to_transfer_function()?;

    let loop_num = fwd.num_poly() * ret.num_poly();
    let open_den = fwd.den_poly() * ret.den_poly();
    let formed_from = &open_den.abs() + &loop_num.abs();
    let den = (&open_den - &loop_num.scale(sign.value()))
        .trim_cancelled(formed_from.coeffs(), CANCELLATION_REL);
    if den.is_zero() {
        return Err(ModelError::invalid(
            "feedback reduction yields a zero denominator",
        ));
    }
    let num = fwd.num_poly() * ret.den_poly();
    debug!(num = %num, den = %den, ?sign, "feedback");
    TransferFunctionModel::from_polys(num, den).map(LinearModel::TransferFunction)
}

/// Unity feedback around `open_loop`: `N / (D - sign N)`.
pub fn unity_feedback(open_loop: &LinearModel, sign: FeedbackSign) -> ModelResult<LinearModel> {
    feedback(open_loop, &gain(1.0)?, sign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::Tolerances;

    fn tf(num: &[f64], den: &[f64]) -> LinearModel {
        LinearModel::from_transfer_function(num, den).unwrap()
    }

    #[test]
    fn series_multiplies_polynomials() {
        let g = series(&tf(&[1.0], &[1.0, 1.0]), &tf(&[2.0], &[1.0, 2.0])).unwrap();
        let g = g.to_transfer_function().unwrap();
        assert_eq!(g.numerator(), &[2.0]);
        assert_eq!(g.denominator(), &[1.0, 3.0, 2.0]);
    }

    #[test]
    fn series_keeps_order_without_cancellation() {
        // (s + 1)/(s + 2) then 1/(s + 1): the (s + 1) factor is kept.
        let g = series(&tf(&[1.0, 1.0], &[1.0, 2.0]), &tf(&[1.0], &[1.0, 1.0])).unwrap();
        assert_eq!(g.order(), 2);
    }

    #[test]
    fn unity_feedback_negative_and_positive() {
        let open = tf(&[2.0], &[1.0, 1.0]);
        let neg = unity_feedback(&open, FeedbackSign::Negative)
            .unwrap()
            .to_transfer_function()
            .unwrap();
        assert_eq!(neg.numerator(), &[2.0]);
        assert_eq!(neg.denominator(), &[1.0, 3.0]);

        let pos = unity_feedback(&open, FeedbackSign::Positive)
            .unwrap()
            .to_transfer_function()
            .unwrap();
        assert_eq!(pos.denominator(), &[1.0, -1.0]);
    }

    #[test]
    fn feedback_cancelling_leading_term_drops_degree() {
        // G = -s / (s + 1) under negative feedback: D + N = 1.
        let open = tf(&[-1.0, 0.0], &[1.0, 1.0]);
        let closed = unity_feedback(&open, FeedbackSign::Negative)
            .unwrap()
            .to_transfer_function()
            .unwrap();
        assert_eq!(closed.denominator(), &[1.0]);
        assert!(!closed.is_proper());
    }

    #[test]
    fn feedback_keeps_widely_scaled_denominator() {
        // Poles near 1e4 rad/s: the leading 1 is tiny next to 1e12 but real.
        let open = tf(&[1e12], &[1.0, 3e4, 3e8, 1e12]);
        let closed = unity_feedback(&open, FeedbackSign::Negative)
            .unwrap()
            .to_transfer_function()
            .unwrap();
        assert_eq!(closed.order(), 3);
        assert_eq!(closed.numerator(), &[1e12]);
        assert_eq!(closed.denominator(), &[1.0, 3e4, 3e8, 2e12]);
    }

    #[test]
    fn feedback_to_zero_denominator_fails() {
        // G = 1 under positive feedback: 1 - 1 = 0.
        let err = unity_feedback(&gain(1.0).unwrap(), FeedbackSign::Positive).unwrap_err();
        assert!(matches!(err, ModelError::InvalidModel { .. }));
    }

    #[test]
    fn feedback_with_sensor_dynamics() {
        // G = 1/s, H = 1/(s + 1): s+1 / (s^2 + s + 1)
        let closed = feedback(
            &tf(&[1.0], &[1.0, 0.0]),
            &tf(&[1.0], &[1.0, 1.0]),
            FeedbackSign::Negative,
        )
        .unwrap();
        let expected = tf(&[1.0, 1.0], &[1.0, 1.0, 1.0]);
        assert!(closed.transfer_function_eq(&expected, Tolerances::default()).unwrap());
    }

    #[test]
    fn parallel_adds() {
        let sum = parallel(&tf(&[1.0], &[1.0, 1.0]), &gain(2.0).unwrap()).unwrap();
        let expected = tf(&[2.0, 3.0], &[1.0, 1.0]);
        assert!(sum.transfer_function_eq(&expected, Tolerances::default()).unwrap());
    }

    #[test]
    fn operands_are_not_aliased() {
        let a = tf(&[1.0], &[1.0, 1.0]);
        let before = a.clone();
        let _ = series(&a, &a).unwrap();
        assert_eq!(a, before);
    }
}
