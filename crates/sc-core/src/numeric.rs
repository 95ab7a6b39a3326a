use crate::CoreError;

/// Floating point type used throughout the system.
pub type Real = f64;

/// Absolute + relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Element-wise [`nearly_equal`] over two slices of equal length.
pub fn slices_nearly_equal(a: &[Real], b: &[Real], tol: Tolerances) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| nearly_equal(*x, *y, tol))
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check that every value in `values` is finite.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), CoreError> {
    for &v in values {
        ensure_finite(v, what)?;
    }
    Ok(())
}

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as Real })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn linspace_hits_endpoints() {
        let t = linspace(0.0, 0.2, 201);
        assert_eq!(t.len(), 201);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[200], 0.2);
        assert!((t[1] - 1e-3).abs() < 1e-15);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn slices_compare_lengths() {
        let tol = Tolerances::default();
        assert!(slices_nearly_equal(&[1.0, 2.0], &[1.0, 2.0], tol));
        assert!(!slices_nearly_equal(&[1.0], &[1.0, 2.0], tol));
    }
}
