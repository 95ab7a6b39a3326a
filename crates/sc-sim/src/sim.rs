//! Step-response simulation runner.

use nalgebra::DVector;
use sc_core::Trajectory;
use sc_model::{LinearModel, StateSpaceModel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::StepDriven;
use crate::propagation::ZohPropagator;

/// Most sub-steps a single grid interval may be split into.
const MAX_SUBSTEPS: usize = 1_000_000;

/// Propagation method for the state between grid points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// Matrix-exponential zero-order hold (default, exact for step inputs).
    #[default]
    Exact,
    /// 4th-order Runge-Kutta (4 rhs calls per step).
    #[serde(rename = "rk4")]
    RK4,
    /// Forward Euler (1st-order, 1 rhs call per step).
    ForwardEuler,
}

/// Options for step-response runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Propagation method (default: exact).
    pub integrator: IntegratorType,
    /// Longest internal step (seconds) for RK4 and Euler. Exact propagation
    /// covers each grid interval in one step and only sub-steps to place a
    /// divergence.
    pub max_step: f64,
    /// Largest state or output magnitude accepted before the run is declared diverged.
    pub divergence_bound: f64,
    /// Height of the input step.
    pub amplitude: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorType::default(),
            max_step: 1e-3,
            divergence_bound: 1e6,
            amplitude: 1.0,
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if !(self.max_step.is_finite() && self.max_step > 0.0) {
            return Err(SimError::InvalidOptions {
                what: "max_step must be positive",
            });
        }
        if !(self.divergence_bound > 0.0) {
            return Err(SimError::InvalidOptions {
                what: "divergence_bound must be positive",
            });
        }
        if !self.amplitude.is_finite() {
            return Err(SimError::InvalidOptions {
                what: "amplitude must be finite",
            });
        }
        Ok(())
    }
}

/// Unit-step response of `model` sampled at `time_grid` with default options.
pub fn simulate(model: &LinearModel, time_grid: &[f64]) -> SimResult<Trajectory> {
    simulate_with(model, time_grid, &SimOptions::default())
}

/// Step response of `model` sampled at `time_grid`.
///
/// The response always starts at t = 0 from a zero state; `time_grid` only
/// selects the instants that are reported. The returned trajectory's time
/// column equals `time_grid` exactly.
///
/// # Errors
///
/// - [`SimError::EmptyGrid`] with fewer than two grid points
/// - [`SimError::InvalidGrid`] for negative, non-finite or non-increasing times
/// - [`SimError::Model`] if the model has no state-space realization
/// - [`SimError::InvalidOptions`] if RK4 or Euler would need more than
///   [`MAX_SUBSTEPS`] sub-steps for one grid interval
/// - [`SimError::Diverged`] once a state or the output leaves `divergence_bound`
pub fn simulate_with(
    model: &LinearModel,
    time_grid: &[f64],
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    validate_grid(time_grid)?;
    opts.validate()?;

    let ss = model.to_state_space()?;
    debug!(
        order = ss.order(),
        points = time_grid.len(),
        integrator = ?opts.integrator,
        "simulating step response"
    );

    let mut stepper = Stepper::new(&ss, opts);
    let u = opts.amplitude;
    let bound = opts.divergence_bound;
    let mut x = DVector::<f64>::zeros(ss.order());
    let mut t = 0.0;
    let mut values = Vec::with_capacity(time_grid.len());

    // `n` equal sub-steps over `[t0, t0 + h]`, bounds checked after each.
    let advance = |stepper: &mut Stepper<'_>, x: &DVector<f64>, t0: f64, h: f64, n: usize| {
        let dt = h / n as f64;
        let mut x = x.clone();
        for i in 1..=n {
            x = stepper.step(t0 + (i - 1) as f64 * dt, &x, dt)?;
            let time = if i == n { t0 + h } else { t0 + i as f64 * dt };
            check_bounds(&ss, &x, u, time, bound)?;
        }
        Ok::<_, SimError>(x)
    };

    for &target in time_grid {
        if target > t {
            let h = target - t;
            x = if stepper.is_exact() {
                match advance(&mut stepper, &x, t, h, 1) {
                    Err(diverged @ SimError::Diverged { .. }) => {
                        // Re-walk the interval to place the detection time.
                        let n = substep_count(h, opts.max_step).unwrap_or(MAX_SUBSTEPS);
                        return Err(advance(&mut stepper, &x, t, h, n)
                            .err()
                            .unwrap_or(diverged));
                    }
                    other => other?,
                }
            } else {
                let n = substep_count(h, opts.max_step).ok_or(SimError::InvalidOptions {
                    what: "max_step splits a grid interval into too many sub-steps",
                })?;
                advance(&mut stepper, &x, t, h, n)?
            };
            t = target;
        }
        values.push(ss.output(&x, u));
    }

    if let Stepper::Exact { prop, .. } = &stepper {
        debug!(expm = prop.evaluations(), "step response complete");
    }

    Ok(Trajectory::new(time_grid.to_vec(), values)?)
}

/// Sub-steps needed to cover `h` with steps no longer than `max_step`, or
/// `None` past [`MAX_SUBSTEPS`].
fn substep_count(h: f64, max_step: f64) -> Option<usize> {
    let n = (h / max_step).ceil().max(1.0);
    (n <= MAX_SUBSTEPS as f64).then_some(n as usize)
}

fn validate_grid(time_grid: &[f64]) -> SimResult<()> {
    if time_grid.len() < 2 {
        return Err(SimError::EmptyGrid {
            len: time_grid.len(),
        });
    }
    for (index, &t) in time_grid.iter().enumerate() {
        if !t.is_finite() {
            return Err(SimError::InvalidGrid {
                what: "time must be finite",
                index,
            });
        }
        if t < 0.0 {
            return Err(SimError::InvalidGrid {
                what: "time must be non-negative",
                index,
            });
        }
        if index > 0 && t <= time_grid[index - 1] {
            return Err(SimError::InvalidGrid {
                what: "time must be strictly increasing",
                index,
            });
        }
    }
    Ok(())
}

fn check_bounds(
    ss: &StateSpaceModel,
    x: &DVector<f64>,
    u: f64,
    time: f64,
    bound: f64,
) -> SimResult<()> {
    let y = ss.output(x, u);
    let magnitude = x.iter().fold(y.abs(), |acc, v| {
        if v.is_nan() || acc.is_nan() {
            f64::NAN
        } else {
            acc.max(v.abs())
        }
    });
    if magnitude.is_finite() && magnitude <= bound {
        Ok(())
    } else {
        Err(SimError::Diverged {
            time,
            magnitude,
            bound,
        })
    }
}

/// Per-run propagation state.
enum Stepper<'a> {
    Exact {
        prop: ZohPropagator<'a>,
        amplitude: f64,
    },
    Rk4(StepDriven<'a>),
    Euler(StepDriven<'a>),
}

impl<'a> Stepper<'a> {
    fn new(ss: &'a StateSpaceModel, opts: &SimOptions) -> Self {
        match opts.integrator {
            IntegratorType::Exact => Stepper::Exact {
                prop: ZohPropagator::new(ss),
                amplitude: opts.amplitude,
            },
            IntegratorType::RK4 => Stepper::Rk4(StepDriven::new(ss, opts.amplitude)),
            IntegratorType::ForwardEuler => Stepper::Euler(StepDriven::new(ss, opts.amplitude)),
        }
    }

    fn is_exact(&self) -> bool {
        matches!(self, Stepper::Exact { .. })
    }

    fn step(&mut self, t: f64, x: &DVector<f64>, h: f64) -> SimResult<DVector<f64>> {
        match self {
            Stepper::Exact { prop, amplitude } => Ok(prop.step(x, *amplitude, h)),
            Stepper::Rk4(model) => RK4.step(model, t, x, h),
            Stepper::Euler(model) => ForwardEuler.step(model, t, x, h),
        }
    }
}
