//! Scenario execution: simulate, compare against the recording, report.

use std::path::PathBuf;

use rayon::prelude::*;
use sc_compare::{ChartPanel, Comparison, compare, load_trajectory, render_chart};
use sc_core::Trajectory;
use sc_sim::{DEFAULT_SETTLING_BAND, StepInfo, simulate_with};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::scenario::{ScenarioDef, ScenarioFile};

/// Options for running scenarios.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Abort at the first failing scenario instead of recording it and continuing.
    pub fail_fast: bool,
    /// Write an SVG comparison chart here.
    pub chart: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Within tolerance.
    Passed,
    /// Compared without a tolerance.
    Reported,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub title: String,
    pub status: ScenarioStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_info: Option<StepInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub reference: Option<Trajectory>,
    #[serde(skip)]
    pub recorded: Option<Trajectory>,
}

impl ScenarioOutcome {
    fn failed(scenario: &ScenarioDef, error: String, recorded: Option<Trajectory>) -> Self {
        Self {
            name: scenario.name.clone(),
            title: scenario.display_title().to_string(),
            status: ScenarioStatus::Failed,
            comparison: None,
            step_info: None,
            error: Some(error),
            reference: None,
            recorded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status != ScenarioStatus::Failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == ScenarioStatus::Failed)
    }

    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::InvalidInput(format!("Failed to serialize report: {}", e)))
    }
}

/// Run every scenario in `file`.
///
/// Recordings are loaded in order, simulation and comparison run on the
/// rayon pool, and the chart (if requested) is drawn last.
pub fn run_scenarios(file: &ScenarioFile, options: &RunOptions) -> AppResult<RunReport> {
    let mut loaded = Vec::with_capacity(file.scenarios.len());
    for scenario in &file.scenarios {
        match load_trajectory(&scenario.recorded, &scenario.column) {
            Ok(recorded) => loaded.push((scenario, Ok(recorded))),
            Err(e) => {
                let reason = e.to_string();
                warn!(scenario = %scenario.name, error = %reason, "failed to load recording");
                if options.fail_fast {
                    return Err(AppError::ScenarioFailed {
                        name: scenario.name.clone(),
                        reason,
                    });
                }
                loaded.push((scenario, Err(reason)));
            }
        }
    }

    let outcomes: Vec<ScenarioOutcome> = loaded
        .into_par_iter()
        .map(|(scenario, recorded)| {
            let outcome = match recorded {
                Ok(recorded) => evaluate(scenario, recorded),
                Err(reason) => ScenarioOutcome::failed(scenario, reason, None),
            };
            if options.fail_fast && outcome.status == ScenarioStatus::Failed {
                return Err(AppError::ScenarioFailed {
                    name: outcome.name,
                    reason: outcome.error.unwrap_or_default(),
                });
            }
            Ok(outcome)
        })
        .collect::<AppResult<_>>()?;

    if let Some(path) = &options.chart {
        write_chart(path, &outcomes)?;
    }

    Ok(RunReport { outcomes })
}

fn evaluate(scenario: &ScenarioDef, recorded: Trajectory) -> ScenarioOutcome {
    info!(scenario = %scenario.name, samples = recorded.len(), "running scenario");

    let result = scenario
        .build_model()
        .map_err(AppError::from)
        .and_then(|model| {
            Ok(simulate_with(
                &model,
                recorded.time(),
                &scenario.options,
            )?)
        })
        .and_then(|reference| {
            let comparison = compare(&reference, &recorded)?;
            Ok((reference, comparison))
        });

    let (reference, comparison) = match result {
        Ok(pair) => pair,
        Err(e) => {
            warn!(scenario = %scenario.name, error = %e, "scenario failed");
            return ScenarioOutcome::failed(scenario, e.to_string(), Some(recorded));
        }
    };

    let (status, error) = match scenario.tolerance {
        None => (ScenarioStatus::Reported, None),
        Some(tol) if comparison.within(tol) => (ScenarioStatus::Passed, None),
        Some(tol) => (
            ScenarioStatus::Failed,
            Some(format!(
                "max error {:.3e} at t = {:.4} s exceeds tolerance {:.3e}",
                comparison.max_abs_error, comparison.max_abs_error_time, tol
            )),
        ),
    };

    match &error {
        Some(reason) => warn!(scenario = %scenario.name, %reason, "scenario out of tolerance"),
        None => info!(
            scenario = %scenario.name,
            max_abs_error = comparison.max_abs_error,
            rms_error = comparison.rms_error,
            "scenario complete"
        ),
    }

    ScenarioOutcome {
        name: scenario.name.clone(),
        title: scenario.display_title().to_string(),
        status,
        step_info: Some(StepInfo::from_trajectory(&reference, DEFAULT_SETTLING_BAND)),
        comparison: Some(comparison),
        error,
        reference: Some(reference),
        recorded: Some(recorded),
    }
}

fn write_chart(path: &std::path::Path, outcomes: &[ScenarioOutcome]) -> AppResult<()> {
    let panels: Vec<ChartPanel<'_>> = outcomes
        .iter()
        .filter_map(|o| match (&o.reference, &o.recorded) {
            (Some(reference), Some(recorded)) => Some(ChartPanel {
                title: &o.title,
                reference,
                recorded,
            }),
            _ => None,
        })
        .collect();

    if panels.is_empty() {
        warn!(path = %path.display(), "no scenario produced curves to chart");
        return Ok(());
    }
    render_chart(path, &panels)?;
    info!(path = %path.display(), panels = panels.len(), "wrote comparison chart");
    Ok(())
}
