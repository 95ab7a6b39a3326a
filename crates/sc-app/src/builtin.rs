//! The three reference validation scenarios.

use std::path::Path;

use sc_compare::ColumnSelector;
use sc_model::{PidController, RlCircuit};
use sc_sim::SimOptions;

use crate::scenario::{BlockDef, LoopKind, ScenarioDef, ScenarioFile};

pub const THIRD_ORDER_SYSTEM: &str = "third_order_system";
pub const OPEN_LOOP_RL_CIRCUIT: &str = "open_loop_rl_circuit";
pub const CLOSED_LOOP_RL_CIRCUIT: &str = "closed_loop_rl_circuit";

/// Built-in scenarios reading `<dir>/<name>.csv`.
///
/// - `third_order_system`: `1/(s^3 + 6s^2 + 11s + 6)` in state space, PID with Kp = 25, closed loop
/// - `open_loop_rl_circuit`: `A = [-100], B = [1], C = [20], D = [0]`, open loop
/// - `closed_loop_rl_circuit`: `1/(0.05s + 5)`, PID with Kp = 1, closed loop
pub fn builtin_scenarios(dir: &Path) -> ScenarioFile {
    let scenario = |name: &str, title: &str, column, plant, controller, loop_kind| ScenarioDef {
        name: name.to_string(),
        title: Some(title.to_string()),
        recorded: dir.join(format!("{name}.csv")),
        column,
        plant,
        controller,
        loop_kind,
        tolerance: None,
        options: SimOptions::default(),
    };

    ScenarioFile {
        scenarios: vec![
            // Recorded with an input column ahead of the output.
            scenario(
                THIRD_ORDER_SYSTEM,
                "Third Order System Step Response",
                ColumnSelector::Name("output".to_string()),
                BlockDef::StateSpace {
                    a: vec![
                        vec![0.0, 1.0, 0.0],
                        vec![0.0, 0.0, 1.0],
                        vec![-6.0, -11.0, -6.0],
                    ],
                    b: vec![vec![0.0], vec![0.0], vec![1.0]],
                    c: vec![vec![1.0, 0.0, 0.0]],
                    d: vec![vec![0.0]],
                },
                Some(BlockDef::Pid(PidController {
                    kp: 25.0,
                    ki: 0.0,
                    kd: 0.0,
                })),
                LoopKind::Closed,
            ),
            scenario(
                OPEN_LOOP_RL_CIRCUIT,
                "Open Loop RL Circuit Step Response",
                ColumnSelector::default(),
                BlockDef::StateSpace {
                    a: vec![vec![-100.0]],
                    b: vec![vec![1.0]],
                    c: vec![vec![20.0]],
                    d: vec![vec![0.0]],
                },
                None,
                LoopKind::Open,
            ),
            scenario(
                CLOSED_LOOP_RL_CIRCUIT,
                "Closed Loop RL Circuit Step Response",
                ColumnSelector::default(),
                BlockDef::RlCircuit(RlCircuit { r: 5.0, l: 0.05 }),
                Some(BlockDef::Pid(PidController {
                    kp: 1.0,
                    ki: 0.0,
                    kd: 0.0,
                })),
                LoopKind::Closed,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::Tolerances;
    use sc_model::LinearModel;

    #[test]
    fn builtins_validate() {
        let file = builtin_scenarios(Path::new("output"));
        file.validate().unwrap();
        assert_eq!(
            file.scenarios[1].recorded,
            Path::new("output").join("open_loop_rl_circuit.csv")
        );
    }

    #[test]
    fn open_loop_rl_matches_circuit_transfer_function() {
        // 20 / (s + 100) = 1 / (0.05 s + 5)
        let file = builtin_scenarios(Path::new("."));
        let model = file.scenarios[1].build_model().unwrap();
        let circuit = LinearModel::from_transfer_function(&[1.0], &[0.05, 5.0]).unwrap();
        assert!(model.transfer_function_eq(&circuit, Tolerances::default()).unwrap());
    }

    #[test]
    fn closed_loop_rl_model() {
        // Kp = 1 enters as s/s and is not cancelled: s / (0.05 s^2 + 6 s)
        let file = builtin_scenarios(Path::new("."));
        let tf = file.scenarios[2]
            .build_model()
            .unwrap()
            .to_transfer_function()
            .unwrap();
        assert_eq!(tf.numerator(), &[1.0, 0.0]);
        assert_eq!(tf.denominator(), &[0.05, 6.0, 0.0]);
    }
}
