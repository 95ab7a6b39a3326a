//! Controller and plant building blocks expressed as linear models.
//!
//! - **PID**: ideal parallel form `Kp + Ki/s + Kd s = (Kd s^2 + Kp s + Ki) / s`
//! - **First-order lag**: `K / (tau s + 1)`
//! - **RL circuit**: current response of a series RL circuit to a voltage, `1 / (L s + R)`

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::LinearModel;

/// PID controller gains in ideal parallel form.
///
/// The model keeps the integrator pole `1/s` even when `ki = 0`, matching
/// the `[Kd, Kp, Ki] / [1, 0]` form used by validation scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    #[serde(default)]
    pub ki: f64,
    /// Derivative gain.
    #[serde(default)]
    pub kd: f64,
}

impl PidController {
    /// Create a new PID controller.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ki` - Integral gain
    /// * `kd` - Derivative gain
    pub fn new(kp: f64, ki: f64, kd: f64) -> ModelResult<Self> {
        let pid = Self { kp, ki, kd };
        pid.validate()?;
        Ok(pid)
    }

    /// Proportional-only controller.
    pub fn proportional(kp: f64) -> ModelResult<Self> {
        Self::new(kp, 0.0, 0.0)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !(self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()) {
            return Err(ModelError::invalid("PID gains must be finite"));
        }
        Ok(())
    }

    /// `(Kd s^2 + Kp s + Ki) / s`.
    ///
    /// Improper when `kd != 0`; it must then be cascaded with a plant of
    /// sufficient relative degree before simulation.
    pub fn to_model(&self) -> ModelResult<LinearModel> {
        self.validate()?;
        LinearModel::from_transfer_function(&[self.kd, self.kp, self.ki], &[1.0, 0.0])
    }
}

/// First-order lag `gain / (tau s + 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderLag {
    /// Steady-state gain.
    pub gain: f64,
    /// Time constant (seconds), must be positive.
    pub tau: f64,
}

impl FirstOrderLag {
    pub fn new(gain: f64, tau: f64) -> ModelResult<Self> {
        let lag = Self { gain, tau };
        lag.validate()?;
        Ok(lag)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(ModelError::invalid("tau must be positive"));
        }
        if !self.gain.is_finite() {
            return Err(ModelError::invalid("gain must be finite"));
        }
        Ok(())
    }

    pub fn to_model(&self) -> ModelResult<LinearModel> {
        self.validate()?;
        LinearModel::from_transfer_function(&[self.gain], &[self.tau, 1.0])
    }
}

/// Series RL circuit driven by a voltage, output current: `1 / (L s + R)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RlCircuit {
    /// Resistance (ohm).
    pub r: f64,
    /// Inductance (henry), must be positive.
    pub l: f64,
}

impl RlCircuit {
    pub fn new(r: f64, l: f64) -> ModelResult<Self> {
        let circuit = Self { r, l };
        circuit.validate()?;
        Ok(circuit)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !(self.l.is_finite() && self.l > 0.0) {
            return Err(ModelError::invalid("inductance must be positive"));
        }
        if !(self.r.is_finite() && self.r >= 0.0) {
            return Err(ModelError::invalid("resistance must be non-negative"));
        }
        Ok(())
    }

    /// Time constant `L / R`, infinite for a lossless coil.
    pub fn time_constant(&self) -> f64 {
        self.l / self.r
    }

    pub fn to_model(&self) -> ModelResult<LinearModel> {
        self.validate()?;
        LinearModel::from_transfer_function(&[1.0], &[self.l, self.r])
    }
}
