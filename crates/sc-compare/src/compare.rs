//! Error metrics between a reference and a recorded trajectory.

use sc_core::Trajectory;
use serde::{Deserialize, Serialize};

use crate::{CompareError, CompareResult};

/// Differences `recorded - reference` over the overlapping time span.
///
/// Integral metrics use the trapezoidal rule on the recorded instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Recorded samples inside the reference span.
    pub samples: usize,
    pub max_abs_error: f64,
    pub max_abs_error_time: f64,
    pub rms_error: f64,
    /// Integral of |e|.
    pub iae: f64,
    /// Integral of e^2.
    pub ise: f64,
    /// Integral of t |e|.
    pub itae: f64,
    /// `max |e| / max |reference|`, `None` for an all-zero reference.
    pub normalized_max_error: Option<f64>,
}

impl Comparison {
    /// Whether the largest absolute error is at most `max_abs`.
    pub fn within(&self, max_abs: f64) -> bool {
        self.max_abs_error <= max_abs
    }

    pub fn to_json(&self) -> CompareResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compare `recorded` against `reference` evaluated at the recorded instants.
pub fn compare(reference: &Trajectory, recorded: &Trajectory) -> CompareResult<Comparison> {
    let errors: Vec<(f64, f64)> = recorded
        .samples()
        .filter(|&(t, _)| reference.covers(t))
        .map(|(t, y)| (t, y - reference.interpolate(t)))
        .collect();

    if errors.len() < 2 {
        return Err(CompareError::InsufficientOverlap {
            count: errors.len(),
        });
    }

    let (max_abs_error_time, max_abs_error) = errors
        .iter()
        .map(|&(t, e)| (t, e.abs()))
        .fold((errors[0].0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });

    let sum_sq: f64 = errors.iter().map(|&(_, e)| e * e).sum();
    let rms_error = (sum_sq / errors.len() as f64).sqrt();

    let (mut iae, mut ise, mut itae) = (0.0, 0.0, 0.0);
    for w in errors.windows(2) {
        let ((t0, e0), (t1, e1)) = (w[0], w[1]);
        let dt = t1 - t0;
        iae += 0.5 * dt * (e0.abs() + e1.abs());
        ise += 0.5 * dt * (e0 * e0 + e1 * e1);
        itae += 0.5 * dt * (t0 * e0.abs() + t1 * e1.abs());
    }

    let reference_peak = reference.max_abs();
    let normalized_max_error = (reference_peak > 0.0).then(|| max_abs_error / reference_peak);

    Ok(Comparison {
        samples: errors.len(),
        max_abs_error,
        max_abs_error_time,
        rms_error,
        iae,
        ise,
        itae,
        normalized_max_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::linspace;

    fn traj(time: Vec<f64>, f: impl Fn(f64) -> f64) -> Trajectory {
        let values = time.iter().map(|&t| f(t)).collect();
        Trajectory::new(time, values).unwrap()
    }

    #[test]
    fn identical_trajectories() {
        let a = traj(linspace(0.0, 1.0, 11), |t| t * t);
        let c = compare(&a, &a).unwrap();
        assert_eq!(c.samples, 11);
        assert_eq!(c.max_abs_error, 0.0);
        assert_eq!(c.iae, 0.0);
        assert!(c.within(0.0));
    }

    #[test]
    fn constant_offset() {
        let reference = traj(linspace(0.0, 2.0, 21), |_| 1.0);
        let recorded = traj(linspace(0.0, 2.0, 41), |_| 1.1);
        let c = compare(&reference, &recorded).unwrap();
        assert!((c.max_abs_error - 0.1).abs() < 1e-12);
        assert!((c.rms_error - 0.1).abs() < 1e-12);
        assert!((c.iae - 0.2).abs() < 1e-12);
        assert!((c.ise - 0.02).abs() < 1e-12);
        // int_0^2 0.1 t dt
        assert!((c.itae - 0.2).abs() < 1e-12);
        assert!((c.normalized_max_error.unwrap() - 0.1).abs() < 1e-12);
        assert!(c.within(0.11));
        assert!(!c.within(0.09));
    }

    #[test]
    fn reference_is_interpolated_between_samples() {
        let reference = traj(vec![0.0, 1.0], |t| t);
        let recorded = traj(vec![0.25, 0.5, 0.75], |t| t);
        let c = compare(&reference, &recorded).unwrap();
        assert!(c.max_abs_error < 1e-15);
    }

    #[test]
    fn peak_error_location() {
        let reference = traj(linspace(0.0, 1.0, 11), |_| 0.0);
        let recorded = traj(linspace(0.0, 1.0, 11), |t| if (t - 0.7).abs() < 1e-9 { -3.0 } else { 0.5 });
        let c = compare(&reference, &recorded).unwrap();
        assert_eq!(c.max_abs_error, 3.0);
        assert!((c.max_abs_error_time - 0.7).abs() < 1e-12);
        assert_eq!(c.normalized_max_error, None);
    }

    #[test]
    fn samples_outside_reference_span_are_ignored() {
        let reference = traj(linspace(0.0, 1.0, 11), |t| t);
        let recorded = traj(vec![0.5, 1.0, 1.5, 2.0], |t| t);
        let c = compare(&reference, &recorded).unwrap();
        assert_eq!(c.samples, 2);
    }

    #[test]
    fn insufficient_overlap() {
        let reference = traj(vec![0.0, 1.0], |t| t);
        let recorded = traj(vec![1.0, 2.0, 3.0], |t| t);
        let err = compare(&reference, &recorded).unwrap_err();
        assert!(matches!(err, CompareError::InsufficientOverlap { count: 1 }));
    }

    #[test]
    fn json_report() {
        let a = traj(vec![0.0, 1.0], |t| t);
        let json = compare(&a, &a).unwrap().to_json().unwrap();
        let back: Comparison = serde_json::from_str(&json).unwrap();
        assert_eq!(back.samples, 2);
    }
}
