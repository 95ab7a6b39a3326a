//! Scenario files: which model to simulate and which recording to check it against.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sc_compare::ColumnSelector;
use sc_model::{
    FeedbackSign, FirstOrderLag, LinearModel, ModelResult, PidController, RlCircuit,
    StateSpaceModel, gain, series, unity_feedback,
};
use sc_sim::SimOptions;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub scenarios: Vec<ScenarioDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Recorded CSV. Relative paths are resolved against the scenario file.
    pub recorded: PathBuf,
    #[serde(default)]
    pub column: ColumnSelector,
    pub plant: BlockDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<BlockDef>,
    #[serde(default, rename = "loop")]
    pub loop_kind: LoopKind,
    /// Largest accepted absolute error; without it the scenario only reports metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub options: SimOptions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopKind {
    #[default]
    Open,
    /// Unity negative feedback around controller and plant.
    Closed,
}

/// A plant or controller block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockDef {
    StateSpace {
        a: Vec<Vec<f64>>,
        b: Vec<Vec<f64>>,
        c: Vec<Vec<f64>>,
        d: Vec<Vec<f64>>,
    },
    TransferFunction {
        num: Vec<f64>,
        den: Vec<f64>,
    },
    Pid(PidController),
    Gain {
        k: f64,
    },
    FirstOrder(FirstOrderLag),
    RlCircuit(RlCircuit),
}

impl BlockDef {
    pub fn to_model(&self) -> ModelResult<LinearModel> {
        match self {
            BlockDef::StateSpace { a, b, c, d } => {
                StateSpaceModel::from_rows(a, b, c, d).map(LinearModel::from)
            }
            BlockDef::TransferFunction { num, den } => LinearModel::from_transfer_function(num, den),
            BlockDef::Pid(pid) => pid.to_model(),
            BlockDef::Gain { k } => gain(*k),
            BlockDef::FirstOrder(lag) => lag.to_model(),
            BlockDef::RlCircuit(rl) => rl.to_model(),
        }
    }
}

impl ScenarioDef {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Plant, optionally behind a controller, optionally closed with unity feedback.
    pub fn build_model(&self) -> ModelResult<LinearModel> {
        let plant = self.plant.to_model()?;
        let open = match &self.controller {
            Some(controller) => series(&controller.to_model()?, &plant)?,
            None => plant,
        };
        match self.loop_kind {
            LoopKind::Open => Ok(open),
            LoopKind::Closed => unity_feedback(&open, FeedbackSign::Negative),
        }
    }
}

impl ScenarioFile {
    /// Check names and tolerances, then make sure every model can be built.
    pub fn validate(&self) -> AppResult<()> {
        if self.scenarios.is_empty() {
            return Err(AppError::Validation(
                "Scenario file must have at least one scenario".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if scenario.name.trim().is_empty() {
                return Err(AppError::Validation(
                    "Scenario name must not be empty".to_string(),
                ));
            }
            if !seen.insert(scenario.name.as_str()) {
                return Err(AppError::Validation(format!(
                    "Duplicate scenario name '{}'",
                    scenario.name
                )));
            }
            let tolerance_ok = scenario
                .tolerance
                .is_none_or(|tol| tol.is_finite() && tol >= 0.0);
            if !tolerance_ok {
                return Err(AppError::Validation(format!(
                    "Scenario '{}' tolerance must be non-negative",
                    scenario.name
                )));
            }
            scenario.build_model().map_err(|e| {
                AppError::Validation(format!("Scenario '{}': {}", scenario.name, e))
            })?;
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        for scenario in &mut self.scenarios {
            if scenario.recorded.is_relative() {
                scenario.recorded = base_dir.join(&scenario.recorded);
            }
        }
    }
}

/// Load a scenario file from YAML.
pub fn load_scenarios(path: &Path) -> AppResult<ScenarioFile> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ScenarioFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut file = parse_scenarios(&content)?;
    if let Some(dir) = path.parent() {
        file.resolve_paths(dir);
    }
    Ok(file)
}

pub fn parse_scenarios(content: &str) -> AppResult<ScenarioFile> {
    serde_yaml::from_str(content)
        .map_err(|e| AppError::ScenarioFile(format!("Failed to parse scenario YAML: {}", e)))
}
