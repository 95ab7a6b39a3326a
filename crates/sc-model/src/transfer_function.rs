//! Rational transfer functions `N(s) / D(s)`.

use nalgebra::{DMatrix, DVector, RowDVector};
use sc_core::{Tolerances, ensure_all_finite, slices_nearly_equal};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::poly::Poly;
use crate::state_space::StateSpaceModel;

/// Transfer function with real coefficients, highest degree first.
///
/// Invariants: both polynomials are non-empty, the denominator's leading
/// coefficient is non-zero, the numerator carries no leading zeros (except
/// for the zero polynomial `[0]`), and every coefficient is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunctionModel {
    num: Poly,
    den: Poly,
}

impl TransferFunctionModel {
    /// Build from numerator and denominator coefficients.
    ///
    /// Leading zeros of the numerator are dropped, so the PID form
    /// `[Kd, Kp, Ki]` with `Kd = 0` is accepted.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidModel`] if either slice is empty, any coefficient is
    /// non-finite, or the denominator's leading coefficient is zero.
    pub fn new(num: &[f64], den: &[f64]) -> ModelResult<Self> {
        if den.is_empty() {
            return Err(ModelError::invalid("denominator must not be empty"));
        }
        if num.is_empty() {
            return Err(ModelError::invalid("numerator must not be empty"));
        }
        ensure_all_finite(num, "numerator coefficient")?;
        ensure_all_finite(den, "denominator coefficient")?;
        if den[0] == 0.0 {
            return Err(ModelError::invalid(
                "denominator leading coefficient must be non-zero",
            ));
        }
        Ok(Self {
            num: Poly::new(num).trim(),
            den: Poly::new(den),
        })
    }

    pub(crate) fn from_polys(num: Poly, den: Poly) -> ModelResult<Self> {
        Self::new(num.coeffs(), den.coeffs())
    }

    pub fn numerator(&self) -> &[f64] {
        self.num.coeffs()
    }

    pub fn denominator(&self) -> &[f64] {
        self.den.coeffs()
    }

    pub fn num_poly(&self) -> &Poly {
        &self.num
    }

    pub fn den_poly(&self) -> &Poly {
        &self.den
    }

    /// Degree of the denominator.
    pub fn order(&self) -> usize {
        self.den.degree()
    }

    /// `deg(N) <= deg(D)`. The zero numerator counts as proper.
    pub fn is_proper(&self) -> bool {
        self.num.is_zero() || self.num.degree() <= self.den.degree()
    }

    /// Copy with a monic denominator.
    pub fn normalized(&self) -> Self {
        let lead = self.den.lead();
        Self {
            num: self.num.scale(1.0 / lead),
            den: self.den.monic(),
        }
    }

    /// `N(s) / D(s)` at real `s`, `None` at a pole.
    pub fn eval(&self, s: f64) -> Option<f64> {
        let d = self.den.eval(s);
        if d == 0.0 {
            None
        } else {
            Some(self.num.eval(s) / d)
        }
    }

    /// Steady-state gain `N(0) / D(0)`, `None` with a pole at the origin.
    pub fn dc_gain(&self) -> Option<f64> {
        self.eval(0.0)
    }

    /// Compare normalized coefficients.
    pub fn approx_eq(&self, other: &Self, tol: Tolerances) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        let num_len = a.num.coeffs().len().max(b.num.coeffs().len());
        slices_nearly_equal(a.den.coeffs(), b.den.coeffs(), tol)
            && slices_nearly_equal(&a.num.padded(num_len), &b.num.padded(num_len), tol)
    }

    /// Controllable canonical realization of order `deg(D)`.
    ///
    /// With the monic denominator `s^n + a_1 s^{n-1} + ... + a_n` and the
    /// numerator padded to `b_0 s^n + ... + b_n`:
    /// - `A` has ones on the superdiagonal and `[-a_n, ..., -a_1]` as last row
    /// - `B = e_n`
    /// - `C_i = b_{n-i} - a_{n-i} b_0`
    /// - `D = b_0`
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidModel`] for an improper transfer function.
    pub fn to_state_space(&self) -> ModelResult<StateSpaceModel> {
        if !self.is_proper() {
            return Err(ModelError::invalid(format!(
                "improper transfer function (numerator degree {} > denominator degree {}) has no state-space realization",
                self.num.degree(),
                self.den.degree()
            )));
        }

        let n = self.order();
        let lead = self.den.lead();
        let a: Vec<f64> = self.den.coeffs().iter().map(|x| x / lead).collect();
        let b: Vec<f64> = self.num.padded(n + 1).iter().map(|x| x / lead).collect();
        let b0 = b[0];

        let mut a_mat = DMatrix::<f64>::zeros(n, n);
        for i in 0..n.saturating_sub(1) {
            a_mat[(i, i + 1)] = 1.0;
        }
        for j in 0..n {
            a_mat[(n - 1, j)] = -a[n - j];
        }

        let mut b_vec = DVector::<f64>::zeros(n);
        if n > 0 {
            b_vec[n - 1] = 1.0;
        }

        let c_row = RowDVector::<f64>::from_fn(n, |_, j| b[n - j] - a[n - j] * b0);

        debug!(order = n, d = b0, "transfer function -> controllable canonical form");
        Ok(StateSpaceModel::from_parts(a_mat, b_vec, c_row, b0))
    }
}
