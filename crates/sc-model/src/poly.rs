//! Real polynomials in the Laplace variable `s`.
//!
//! Coefficients are stored highest degree first, so `[1.0, 6.0, 11.0, 6.0]`
//! is `s^3 + 6 s^2 + 11 s + 6`.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Polynomial with real coefficients, highest degree first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Poly(Vec<f64>);

impl Poly {
    /// Wrap coefficients as-is. An empty slice becomes the zero polynomial.
    pub fn new(coeffs: &[f64]) -> Self {
        if coeffs.is_empty() {
            Self::zero()
        } else {
            Self(coeffs.to_vec())
        }
    }

    pub fn zero() -> Self {
        Self(vec![0.0])
    }

    pub fn constant(c: f64) -> Self {
        Self(vec![c])
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.0
    }

    /// Degree as stored (leading zeros are counted unless trimmed first).
    pub fn degree(&self) -> usize {
        self.0.len() - 1
    }

    pub fn lead(&self) -> f64 {
        self.0[0]
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0.0)
    }

    /// Drop exactly-zero leading coefficients, keeping at least one.
    pub fn trim(mut self) -> Self {
        let first = self
            .0
            .iter()
            .position(|&c| c != 0.0)
            .unwrap_or(self.0.len() - 1);
        self.0.drain(..first);
        self
    }

    /// Drop leading coefficients that cancelled while being formed.
    ///
    /// `scale[i]` bounds the summed magnitudes of the terms that produced
    /// coefficient `i`; the two slices are aligned on the constant term. A
    /// coefficient with `|c| <= rel * scale` is treated as zero. Returns the
    /// zero polynomial if every coefficient cancelled.
    pub fn trim_cancelled(mut self, scale: &[f64], rel: f64) -> Self {
        let n = self.0.len();
        let bound = |i: usize| match (i + scale.len()).checked_sub(n) {
            Some(j) => scale[j],
            None => 0.0,
        };
        match self
            .0
            .iter()
            .enumerate()
            .position(|(i, c)| c.abs() > rel * bound(i))
        {
            Some(first) => {
                self.0.drain(..first);
                self
            }
            None => Self::zero(),
        }
    }

    /// Coefficient-wise magnitudes.
    pub fn abs(&self) -> Self {
        Self(self.0.iter().map(|c| c.abs()).collect())
    }

    /// Left-pad with zeros to `len` coefficients. Longer polynomials are
    /// returned unchanged.
    pub fn padded(&self, len: usize) -> Vec<f64> {
        let mut out = vec![0.0; len.saturating_sub(self.0.len())];
        out.extend_from_slice(&self.0);
        out
    }

    pub fn scale(&self, k: f64) -> Self {
        Self(self.0.iter().map(|c| c * k).collect())
    }

    /// Divide through by the leading coefficient.
    pub fn monic(&self) -> Self {
        self.scale(1.0 / self.lead())
    }

    /// Horner evaluation at real `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.0.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    fn combine(&self, rhs: &Self, sign: f64) -> Self {
        let len = self.0.len().max(rhs.0.len());
        let a = self.padded(len);
        let b = rhs.padded(len);
        Self(a.iter().zip(&b).map(|(x, y)| x + sign * y).collect())
    }
}

impl Add for &Poly {
    type Output = Poly;

    fn add(self, rhs: &Poly) -> Poly {
        self.combine(rhs, 1.0)
    }
}

impl Sub for &Poly {
    type Output = Poly;

    fn sub(self, rhs: &Poly) -> Poly {
        self.combine(rhs, -1.0)
    }
}

impl Mul for &Poly {
    type Output = Poly;

    /// Coefficient convolution.
    fn mul(self, rhs: &Poly) -> Poly {
        let mut out = vec![0.0; self.0.len() + rhs.0.len() - 1];
        for (i, a) in self.0.iter().enumerate() {
            for (j, b) in rhs.0.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Poly(out)
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.degree();
        let mut wrote = false;
        for (i, &c) in self.0.iter().enumerate() {
            if c == 0.0 && n > 0 {
                continue;
            }
            let power = n - i;
            if wrote {
                write!(f, " {} ", if c < 0.0 { '-' } else { '+' })?;
            } else if c < 0.0 {
                write!(f, "-")?;
            }
            let mag = c.abs();
            match power {
                0 => write!(f, "{mag}")?,
                1 => write!(f, "{mag}s")?,
                p => write!(f, "{mag}s^{p}")?,
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_and_add() {
        let a = Poly::new(&[1.0, 1.0]);
        let b = Poly::new(&[1.0, 2.0]);
        assert_eq!((&a * &b).coeffs(), &[1.0, 3.0, 2.0]);
        assert_eq!((&a + &Poly::constant(3.0)).coeffs(), &[1.0, 4.0]);
        assert_eq!((&b - &a).coeffs(), &[0.0, 1.0]);
    }

    #[test]
    fn trim_keeps_one_coefficient() {
        assert_eq!(Poly::new(&[0.0, 0.0, 25.0, 0.0]).trim().coeffs(), &[25.0, 0.0]);
        assert_eq!(Poly::new(&[0.0, 0.0]).trim().coeffs(), &[0.0]);
    }

    #[test]
    fn trim_cancelled_drops_only_cancelled_terms() {
        // Leading term cancelled from operands of size 1.
        let p = Poly::new(&[1e-17, 2.0]).trim_cancelled(&[2.0, 2.0], 1e-12);
        assert_eq!(p.coeffs(), &[2.0]);
        // Small against the rest of the polynomial but not cancelled.
        let p = Poly::new(&[1.0, 3e4, 3e8, 2e12]).trim_cancelled(&[1.0, 3e4, 3e8, 2e12], 1e-12);
        assert_eq!(p.coeffs(), &[1.0, 3e4, 3e8, 2e12]);
        // Shorter scale: missing leading entries count as zero.
        let p = Poly::new(&[0.0, 1e-5, 1.0]).trim_cancelled(&[1e-5, 1.0], 1e-12);
        assert_eq!(p.coeffs(), &[1e-5, 1.0]);
        assert!(Poly::new(&[0.0, 0.0]).trim_cancelled(&[1.0, 1.0], 1e-12).is_zero());
    }

    #[test]
    fn eval_horner() {
        let p = Poly::new(&[1.0, 6.0, 11.0, 6.0]);
        assert_eq!(p.eval(0.0), 6.0);
        assert_eq!(p.eval(-1.0), 0.0);
        assert_eq!(p.eval(1.0), 24.0);
    }

    #[test]
    fn display_readable() {
        assert_eq!(Poly::new(&[1.0, -6.0, 0.0, 6.0]).to_string(), "1s^3 - 6s^2 + 6");
        assert_eq!(Poly::zero().to_string(), "0");
    }
}
