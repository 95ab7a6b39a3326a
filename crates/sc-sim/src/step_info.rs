//! Step-response metrics.

use sc_core::Trajectory;
use serde::{Deserialize, Serialize};

/// Conventional settling band (2%).
pub const DEFAULT_SETTLING_BAND: f64 = 0.02;

/// Characteristics of a sampled step response.
///
/// Metrics that are relative to the final value are `None` when the final
/// value is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Largest sample (in the direction of the final value).
    pub peak: f64,
    pub peak_time: f64,
    /// Last sample.
    pub final_value: f64,
    /// Time from 10% to 90% of the final value.
    pub rise_time: Option<f64>,
    /// First instant after which the response stays inside the band.
    pub settling_time: Option<f64>,
    /// Peak excursion past the final value, in percent.
    pub overshoot: Option<f64>,
}

impl StepInfo {
    pub fn from_trajectory(traj: &Trajectory, band: f64) -> Self {
        let time = traj.time();
        let values = traj.values();
        let final_value = traj.final_value();
        let sign = if final_value < 0.0 { -1.0 } else { 1.0 };

        let (peak_index, _) = values.iter().enumerate().fold(
            (0, f64::NEG_INFINITY),
            |(best_i, best), (i, &v)| {
                if sign * v > best {
                    (i, sign * v)
                } else {
                    (best_i, best)
                }
            },
        );
        let peak = values[peak_index];
        let peak_time = time[peak_index];

        if final_value == 0.0 {
            return Self {
                peak,
                peak_time,
                final_value,
                rise_time: None,
                settling_time: None,
                overshoot: None,
            };
        }

        let rise_time = match (
            crossing(time, values, 0.1 * final_value),
            crossing(time, values, 0.9 * final_value),
        ) {
            (Some(lo), Some(hi)) => Some(hi - lo),
            _ => None,
        };

        let tolerance = band * final_value.abs();
        let settling_time = match values
            .iter()
            .rposition(|v| (v - final_value).abs() > tolerance)
        {
            None => Some(time[0]),
            Some(i) if i + 1 < time.len() => Some(time[i + 1]),
            Some(_) => None,
        };

        let overshoot = Some(((peak - final_value) / final_value * 100.0).max(0.0));

        Self {
            peak,
            peak_time,
            final_value,
            rise_time,
            settling_time,
            overshoot,
        }
    }
}

/// First time the response reaches `level`, linearly interpolated.
fn crossing(time: &[f64], values: &[f64], level: f64) -> Option<f64> {
    let reached = |v: f64| if level >= 0.0 { v >= level } else { v <= level };
    if reached(values[0]) {
        return Some(time[0]);
    }
    time.windows(2)
        .zip(values.windows(2))
        .find(|(_, v)| reached(v[1]))
        .map(|(t, v)| t[0] + (level - v[0]) / (v[1] - v[0]) * (t[1] - t[0]))
}
