//! Single-input single-output state-space models.
//!
//! `x' = A x + B u`, `y = C x + D u` with `A: n x n`, `B: n x 1`, `C: 1 x n`
//! and scalar `D`.

use nalgebra::{DMatrix, DVector, RowDVector};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::poly::Poly;
use crate::transfer_function::TransferFunctionModel;

/// A numerator coefficient at most this fraction of the magnitudes it was
/// formed from is taken as cancelled.
const CANCELLATION_REL: f64 = 1e-12;

/// State-space realization of a SISO system.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpaceModel {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: RowDVector<f64>,
    d: f64,
}

impl StateSpaceModel {
    /// Build from matrices, checking that their shapes agree.
    ///
    /// # Errors
    ///
    /// - [`ModelError::Dimension`] if `A` is not square, `B` is not `n x 1`,
    ///   `C` is not `1 x n` or `D` is not `1 x 1`
    /// - [`ModelError::InvalidModel`] if any entry is non-finite
    pub fn new(
        a: DMatrix<f64>,
        b: DMatrix<f64>,
        c: DMatrix<f64>,
        d: DMatrix<f64>,
    ) -> ModelResult<Self> {
        let n = a.nrows();
        check_shape("A", (n, n), a.shape())?;
        check_shape("B", (n, 1), b.shape())?;
        check_shape("C", (1, n), c.shape())?;
        check_shape("D", (1, 1), d.shape())?;

        let mut entries = a.iter().chain(b.iter()).chain(c.iter()).chain(d.iter());
        if entries.any(|v| !v.is_finite()) {
            return Err(ModelError::invalid("state-space matrices contain non-finite entries"));
        }

        Ok(Self {
            a,
            b: b.column(0).into_owned(),
            c: c.row(0).into_owned(),
            d: d[(0, 0)],
        })
    }

    /// Build from row-major nested vectors, as found in scenario files.
    ///
    /// Empty `A`/`B`/`C` describe a static gain of order zero.
    pub fn from_rows(
        a: &[Vec<f64>],
        b: &[Vec<f64>],
        c: &[Vec<f64>],
        d: &[Vec<f64>],
    ) -> ModelResult<Self> {
        let n = a.len();
        Self::new(
            matrix_from_rows("A", a, n)?,
            matrix_from_rows("B", b, 1)?,
            matrix_from_rows("C", c, n)?,
            matrix_from_rows("D", d, 1)?,
        )
    }

    pub(crate) fn from_parts(
        a: DMatrix<f64>,
        b: DVector<f64>,
        c: RowDVector<f64>,
        d: f64,
    ) -> Self {
        Self { a, b, c, d }
    }

    /// Number of states.
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> &RowDVector<f64> {
        &self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    /// State derivative `A x + B u`.
    pub fn derivative(&self, x: &DVector<f64>, u: f64) -> DVector<f64> {
        &self.a * x + &self.b * u
    }

    /// Output `C x + D u`.
    pub fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        (&self.c * x)[(0, 0)] + self.d * u
    }

    /// Transfer function `C (sI - A)^-1 B + D`.
    ///
    /// Uses the Faddeev-LeVerrier recursion
    /// `M_1 = I`, `M_k = A M_{k-1} + c_{n-k+1} I`, `c_{n-k} = -tr(A M_k) / k`,
    /// which yields the monic characteristic polynomial together with the
    /// adjugate `adj(sI - A) = sum_k M_k s^{n-k}`.
    ///
    /// # Errors
    ///
    /// [`ModelError::Singular`] if the recursion produces non-finite values.
    pub fn to_transfer_function(&self) -> ModelResult<TransferFunctionModel> {
        let n = self.order();
        let identity = DMatrix::<f64>::identity(n, n);

        let mut den = Vec::with_capacity(n + 1);
        den.push(1.0);
        let mut adj_terms = Vec::with_capacity(n);
        let mut adj_scale = Vec::with_capacity(n);
        let mut m = DMatrix::<f64>::zeros(n, n);
        let (c_abs, b_abs) = (self.c.abs(), self.b.abs());

        for k in 1..=n {
            let prev = den[k - 1];
            m = &self.a * &m + &identity * prev;
            let am = &self.a * &m;
            let ck = -am.trace() / k as f64;
            if !ck.is_finite() {
                return Err(ModelError::Singular {
                    what: "characteristic polynomial",
                    order: n,
                });
            }
            den.push(ck);

            let cmb = (&self.c * &m * &self.b)[(0, 0)];
            if !cmb.is_finite() {
                return Err(ModelError::Singular {
                    what: "adjugate numerator",
                    order: n,
                });
            }
            adj_terms.push(cmb);
            adj_scale.push((&c_abs * m.abs() * &b_abs)[(0, 0)]);
        }

        let mut num = Vec::with_capacity(n + 1);
        let mut scale = Vec::with_capacity(n + 1);
        num.push(self.d);
        scale.push(self.d.abs());
        for (k, (term, term_scale)) in adj_terms.iter().zip(&adj_scale).enumerate() {
            num.push(term + self.d * den[k + 1]);
            scale.push(term_scale + (self.d * den[k + 1]).abs());
        }

        let num = Poly::new(&num).trim_cancelled(&scale, CANCELLATION_REL);
        debug!(order = n, num = %num, den = %Poly::new(&den), "state space -> transfer function");
        TransferFunctionModel::new(num.coeffs(), &den)
    }
}

fn check_shape(
    what: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
) -> ModelResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ModelError::Dimension {
            what,
            expected,
            found,
        })
    }
}

/// Row-major nested vectors to a matrix. `cols_if_empty` fixes the column
/// count when there are no rows.
fn matrix_from_rows(
    what: &'static str,
    rows: &[Vec<f64>],
    cols_if_empty: usize,
) -> ModelResult<DMatrix<f64>> {
    let Some(first) = rows.first() else {
        return Ok(DMatrix::zeros(0, cols_if_empty));
    };
    let cols = first.len();
    for row in rows {
        check_shape(what, (rows.len(), cols), (rows.len(), row.len()))?;
    }
    Ok(DMatrix::from_fn(rows.len(), cols, |i, j| rows[i][j]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn third_order() -> StateSpaceModel {
        StateSpaceModel::from_rows(
            &[
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![-6.0, -11.0, -6.0],
            ],
            &[vec![0.0], vec![0.0], vec![1.0]],
            &[vec![1.0, 0.0, 0.0]],
            &[vec![0.0]],
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_square_a() {
        let err = StateSpaceModel::new(
            DMatrix::zeros(2, 3),
            DMatrix::zeros(2, 1),
            DMatrix::zeros(1, 2),
            DMatrix::zeros(1, 1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::Dimension {
                what: "A",
                expected: (2, 2),
                found: (2, 3)
            }
        );
    }

    #[test]
    fn rejects_mismatched_b_and_c() {
        let b_err = StateSpaceModel::new(
            DMatrix::zeros(2, 2),
            DMatrix::zeros(3, 1),
            DMatrix::zeros(1, 2),
            DMatrix::zeros(1, 1),
        )
        .unwrap_err();
        assert!(matches!(b_err, ModelError::Dimension { what: "B", .. }));

        let c_err = StateSpaceModel::new(
            DMatrix::zeros(2, 2),
            DMatrix::zeros(2, 1),
            DMatrix::zeros(1, 3),
            DMatrix::zeros(1, 1),
        )
        .unwrap_err();
        assert!(matches!(c_err, ModelError::Dimension { what: "C", .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = StateSpaceModel::from_rows(
            &[vec![0.0, 1.0], vec![0.0]],
            &[vec![0.0], vec![1.0]],
            &[vec![1.0, 0.0]],
            &[vec![0.0]],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Dimension { what: "A", .. }));
    }

    #[test]
    fn rejects_non_finite() {
        let err = StateSpaceModel::from_rows(
            &[vec![f64::NAN]],
            &[vec![1.0]],
            &[vec![1.0]],
            &[vec![0.0]],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidModel { .. }));
    }

    #[test]
    fn third_order_characteristic_polynomial() {
        let tf = third_order().to_transfer_function().unwrap();
        assert_eq!(tf.denominator(), &[1.0, 6.0, 11.0, 6.0]);
        assert_eq!(tf.numerator(), &[1.0]);
    }

    #[test]
    fn feedthrough_enters_numerator() {
        // 20/(s + 100) + 0.5
        let ss = StateSpaceModel::from_rows(&[vec![-100.0]], &[vec![1.0]], &[vec![20.0]], &[vec![0.5]])
            .unwrap();
        let tf = ss.to_transfer_function().unwrap();
        assert_eq!(tf.denominator(), &[1.0, 100.0]);
        assert_eq!(tf.numerator(), &[0.5, 70.0]);
    }

    #[test]
    fn small_feedthrough_is_kept() {
        // 1e8/(s + 1e4) + 1e-5: (1e-5 s + 1e8 + 0.1) / (s + 1e4)
        let ss = StateSpaceModel::from_rows(&[vec![-1e4]], &[vec![1.0]], &[vec![1e8]], &[vec![1e-5]])
            .unwrap();
        let tf = ss.to_transfer_function().unwrap();
        assert_eq!(tf.denominator(), &[1.0, 1e4]);
        assert_eq!(tf.numerator().len(), 2);
        assert_eq!(tf.numerator()[0], 1e-5);
        assert!((tf.numerator()[1] - (1e8 + 0.1)).abs() < 1e-6);
    }

    #[test]
    fn cancelled_numerator_terms_are_dropped() {
        // C B = 1 - 1 = 0 exactly in value but formed from non-zero products.
        let ss = StateSpaceModel::from_rows(
            &[vec![-1.0, 0.0], vec![0.0, -2.0]],
            &[vec![1.0], vec![1.0]],
            &[vec![1.0, -1.0]],
            &[vec![0.0]],
        )
        .unwrap();
        let tf = ss.to_transfer_function().unwrap();
        // 1/(s + 1) - 1/(s + 2) = 1 / (s^2 + 3 s + 2)
        assert_eq!(tf.numerator(), &[1.0]);
        assert_eq!(tf.denominator(), &[1.0, 3.0, 2.0]);
    }

    #[test]
    fn static_gain_has_order_zero() {
        let ss = StateSpaceModel::from_rows(&[], &[], &[], &[vec![3.0]]).unwrap();
        assert_eq!(ss.order(), 0);
        let tf = ss.to_transfer_function().unwrap();
        assert_eq!(tf.numerator(), &[3.0]);
        assert_eq!(tf.denominator(), &[1.0]);
    }
}
