//! Ordered `(time, value)` samples.
//!
//! A [`Trajectory`] is produced once (by simulation or by loading a recording)
//! and is read-only afterwards. Time is strictly increasing and every value is
//! finite; both are checked at construction.

use crate::error::{CoreError, CoreResult};
use crate::numeric::{Real, ensure_finite};

/// Scalar time series with strictly increasing time stamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    time: Vec<Real>,
    values: Vec<Real>,
}

impl Trajectory {
    /// Build a trajectory from parallel time and value columns.
    pub fn new(time: Vec<Real>, values: Vec<Real>) -> CoreResult<Self> {
        if time.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                what: "time and value columns",
                left: time.len(),
                right: values.len(),
            });
        }
        if time.is_empty() {
            return Err(CoreError::InvalidArg {
                what: "trajectory must contain at least one sample",
            });
        }
        for (&t, &v) in time.iter().zip(&values) {
            ensure_finite(t, "trajectory time")?;
            ensure_finite(v, "trajectory value")?;
        }
        for (i, w) in time.windows(2).enumerate() {
            if w[1] <= w[0] {
                return Err(CoreError::NonMonotonicTime {
                    index: i + 1,
                    prev: w[0],
                    next: w[1],
                });
            }
        }
        Ok(Self { time, values })
    }

    /// Build a trajectory from `(time, value)` pairs.
    pub fn from_samples<I>(samples: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (Real, Real)>,
    {
        let (time, values) = samples.into_iter().unzip();
        Self::new(time, values)
    }

    pub fn time(&self) -> &[Real] {
        &self.time
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false: construction rejects empty columns.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = (Real, Real)> + '_ {
        self.time.iter().copied().zip(self.values.iter().copied())
    }

    pub fn start_time(&self) -> Real {
        self.time[0]
    }

    pub fn end_time(&self) -> Real {
        self.time[self.time.len() - 1]
    }

    /// Value of the last sample.
    pub fn final_value(&self) -> Real {
        self.values[self.values.len() - 1]
    }

    /// Largest absolute value over all samples.
    pub fn max_abs(&self) -> Real {
        self.values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// Whether `t` lies inside `[start_time, end_time]`.
    pub fn covers(&self, t: Real) -> bool {
        t >= self.start_time() && t <= self.end_time()
    }

    /// Linear interpolation at `t`, clamped to the first/last sample outside
    /// the covered span.
    pub fn interpolate(&self, t: Real) -> Real {
        let n = self.time.len();
        if t <= self.time[0] {
            return self.values[0];
        }
        if t >= self.time[n - 1] {
            return self.values[n - 1];
        }
        // First index with time > t; guaranteed in 1..n by the checks above.
        let hi = self.time.partition_point(|&x| x <= t);
        let lo = hi - 1;
        let (t0, t1) = (self.time[lo], self.time[hi]);
        let (v0, v1) = (self.values[lo], self.values[hi]);
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}
