//! End-to-end runs of the built-in and file-based scenarios against
//! recordings written into a temporary directory.

use std::path::{Path, PathBuf};

use sc_app::{
    AppError, RunOptions, ScenarioStatus, builtin_scenarios, load_scenarios, run_scenarios,
};
use sc_core::linspace;
use sc_sim::simulate;

fn fresh_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a recording of every built-in scenario from its own model.
fn record_builtins(dir: &Path) {
    let file = builtin_scenarios(dir);
    for (scenario, (t_end, n)) in file.scenarios.iter().zip([(10.0, 1001), (0.1, 201), (0.1, 201)]) {
        let model = scenario.build_model().unwrap();
        let traj = simulate(&model, &linspace(0.0, t_end, n)).unwrap();
        let mut content = if scenario.name == "third_order_system" {
            String::from("t,input,output\n")
        } else {
            String::from("t,output\n")
        };
        for (t, y) in traj.samples() {
            if scenario.name == "third_order_system" {
                content.push_str(&format!("{t},1,{y}\n"));
            } else {
                content.push_str(&format!("{t},{y}\n"));
            }
        }
        std::fs::write(&scenario.recorded, content).unwrap();
    }
}

#[test]
fn builtin_scenarios_match_their_own_recordings() {
    let dir = fresh_dir("sc_app_smoke_builtin");
    record_builtins(&dir);

    let chart = dir.join("validation.svg");
    let report = run_scenarios(
        &builtin_scenarios(&dir),
        &RunOptions {
            fail_fast: true,
            chart: Some(chart.clone()),
        },
    )
    .unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.all_passed());
    for outcome in &report.outcomes {
        assert_eq!(outcome.status, ScenarioStatus::Reported);
        let comparison = outcome.comparison.as_ref().unwrap();
        assert!(comparison.max_abs_error < 1e-9, "{}: {:?}", outcome.name, comparison);
    }

    let svg = std::fs::read_to_string(&chart).unwrap();
    assert!(svg.contains("Third Order System Step Response"));

    let json = report.to_json().unwrap();
    assert!(json.contains("\"closed_loop_rl_circuit\""));
    assert!(json.contains("\"max_abs_error\""));
}

#[test]
fn missing_recording_is_recorded_or_aborts() {
    let dir = fresh_dir("sc_app_smoke_missing");
    record_builtins(&dir);
    std::fs::remove_file(dir.join("open_loop_rl_circuit.csv")).unwrap();
    let file = builtin_scenarios(&dir);

    let report = run_scenarios(&file, &RunOptions::default()).unwrap();
    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, vec!["open_loop_rl_circuit"]);
    assert_eq!(report.outcomes[2].status, ScenarioStatus::Reported);

    let err = run_scenarios(
        &file,
        &RunOptions {
            fail_fast: true,
            chart: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::ScenarioFailed { ref name, .. } if name == "open_loop_rl_circuit"));
}

#[test]
fn scenario_file_with_tolerances() {
    let dir = fresh_dir("sc_app_smoke_yaml");
    // A recording of 1/(0.5 s + 1) checked against two plants.
    let traj = simulate(
        &sc_model::FirstOrderLag::new(1.0, 0.5).unwrap().to_model().unwrap(),
        &linspace(0.0, 3.0, 301),
    )
    .unwrap();
    let mut content = String::from("time,current\n");
    for (t, y) in traj.samples() {
        content.push_str(&format!("{t},{y}\n"));
    }
    std::fs::write(dir.join("lag.csv"), content).unwrap();

    let yaml = r#"
scenarios:
  - name: matching
    recorded: lag.csv
    column: current
    plant: { kind: transfer_function, num: [1], den: [0.5, 1] }
    tolerance: 1.0e-6
  - name: too_slow
    recorded: lag.csv
    plant: { kind: first_order, gain: 1.0, tau: 0.8 }
    tolerance: 0.01
  - name: unstable
    recorded: lag.csv
    plant: { kind: transfer_function, num: [1], den: [1, -10] }
"#;
    let path = dir.join("scenarios.yaml");
    std::fs::write(&path, yaml).unwrap();

    let file = load_scenarios(&path).unwrap();
    file.validate().unwrap();
    let report = run_scenarios(&file, &RunOptions::default()).unwrap();

    let statuses: Vec<ScenarioStatus> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            ScenarioStatus::Passed,
            ScenarioStatus::Failed,
            ScenarioStatus::Failed
        ]
    );
    assert!(report.outcomes[1].error.as_deref().unwrap().contains("exceeds tolerance"));
    assert!(report.outcomes[2].error.as_deref().unwrap().contains("diverged"));
    assert!(!report.all_passed());
}
