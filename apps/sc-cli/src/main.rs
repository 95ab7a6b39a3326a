use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use sc_app::{
    AppError, AppResult, RunOptions, RunReport, ScenarioFile, ScenarioStatus, builtin_scenarios,
    load_scenarios, run_scenarios,
};
use sc_core::linspace;
use sc_model::LinearModel;
use sc_sim::{DEFAULT_SETTLING_BAND, IntegratorType, SimOptions, StepInfo, simulate_with};

#[derive(Parser)]
#[command(name = "stepcheck")]
#[command(about = "stepcheck - LTI step responses checked against recorded trajectories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenarios in a YAML file against their recordings
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Write an SVG comparison chart
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Stop at the first failing scenario
        #[arg(long)]
        fail_fast: bool,
    },
    /// Run the built-in validation scenarios against `<dir>/<name>.csv`
    Builtin {
        /// Directory holding the recorded CSV files
        dir: PathBuf,
        /// Write an SVG comparison chart
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Stop at the first failing scenario
        #[arg(long)]
        fail_fast: bool,
    },
    /// Step response of a transfer function as CSV
    Step {
        /// Numerator coefficients, highest power first (comma separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        num: Vec<f64>,
        /// Denominator coefficients, highest power first (comma separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        den: Vec<f64>,
        /// End time in seconds
        #[arg(long)]
        t_end: f64,
        /// Output sample spacing in seconds
        #[arg(long)]
        dt: f64,
        /// Propagation method
        #[arg(long, value_enum, default_value_t = Method::Exact)]
        method: Method,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Realization, DC gain and step metrics of a transfer function
    Info {
        /// Numerator coefficients, highest power first (comma separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        num: Vec<f64>,
        /// Denominator coefficients, highest power first (comma separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        den: Vec<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Exact,
    Rk4,
    Euler,
}

impl From<Method> for IntegratorType {
    fn from(method: Method) -> Self {
        match method {
            Method::Exact => IntegratorType::Exact,
            Method::Rk4 => IntegratorType::RK4,
            Method::Euler => IntegratorType::ForwardEuler,
        }
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            scenario_path,
            chart,
            json,
            fail_fast,
        } => cmd_validate(&scenario_path, chart, json.as_deref(), fail_fast),
        Commands::Builtin {
            dir,
            chart,
            json,
            fail_fast,
        } => cmd_builtin(&dir, chart, json.as_deref(), fail_fast),
        Commands::Step {
            num,
            den,
            t_end,
            dt,
            method,
            output,
        } => cmd_step(&num, &den, t_end, dt, method, output.as_deref()),
        Commands::Info { num, den } => cmd_info(&num, &den),
    }
}

fn cmd_validate(
    scenario_path: &Path,
    chart: Option<PathBuf>,
    json: Option<&Path>,
    fail_fast: bool,
) -> AppResult<()> {
    println!("Validating scenarios: {}", scenario_path.display());
    let file = load_scenarios(scenario_path)?;
    file.validate()?;
    run_and_print(&file, chart, json, fail_fast)
}

fn cmd_builtin(
    dir: &Path,
    chart: Option<PathBuf>,
    json: Option<&Path>,
    fail_fast: bool,
) -> AppResult<()> {
    println!("Running built-in scenarios from: {}", dir.display());
    let file = builtin_scenarios(dir);
    run_and_print(&file, chart, json, fail_fast)
}

fn run_and_print(
    file: &ScenarioFile,
    chart: Option<PathBuf>,
    json: Option<&Path>,
    fail_fast: bool,
) -> AppResult<()> {
    let options = RunOptions { fail_fast, chart };
    let report = run_scenarios(file, &options)?;
    print_report(&report);

    if let Some(path) = &options.chart {
        println!("✓ Chart written to {}", path.display());
    }
    if let Some(path) = json {
        std::fs::write(path, report.to_json()?)?;
        println!("✓ Report written to {}", path.display());
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(AppError::Validation(format!(
            "{} of {} scenarios failed",
            failed,
            report.outcomes.len()
        )));
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    for outcome in &report.outcomes {
        let mark = match outcome.status {
            ScenarioStatus::Passed => "✓",
            ScenarioStatus::Reported => "•",
            ScenarioStatus::Failed => "✗",
        };
        println!("{} {} ({})", mark, outcome.title, outcome.name);
        if let Some(c) = &outcome.comparison {
            println!(
                "    samples: {}  max|e|: {:.4e} at {:.4} s  rms: {:.4e}",
                c.samples, c.max_abs_error, c.max_abs_error_time, c.rms_error
            );
            println!(
                "    IAE: {:.4e}  ISE: {:.4e}  ITAE: {:.4e}",
                c.iae, c.ise, c.itae
            );
        }
        if let Some(error) = &outcome.error {
            println!("    error: {}", error);
        }
    }
}

fn grid(t_end: f64, dt: f64) -> AppResult<Vec<f64>> {
    if !(dt.is_finite() && dt > 0.0 && t_end.is_finite() && t_end > 0.0) {
        return Err(AppError::InvalidInput(
            "--t-end and --dt must be positive".to_string(),
        ));
    }
    let n = (t_end / dt).round() as usize + 1;
    Ok(linspace(0.0, t_end, n.max(2)))
}

fn cmd_step(
    num: &[f64],
    den: &[f64],
    t_end: f64,
    dt: f64,
    method: Method,
    output: Option<&Path>,
) -> AppResult<()> {
    let model = LinearModel::from_transfer_function(num, den)?;
    let opts = SimOptions {
        integrator: method.into(),
        ..SimOptions::default()
    };
    let traj = simulate_with(&model, &grid(t_end, dt)?, &opts)?;

    if let Some(path) = output {
        sc_compare::write_trajectory(path, &traj, ["t", "output"])?;
        println!("✓ Exported {} data points to {}", traj.len(), path.display());
    } else {
        let mut csv = String::from("t,output\n");
        for (t, y) in traj.samples() {
            csv.push_str(&format!("{},{}\n", t, y));
        }
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_info(num: &[f64], den: &[f64]) -> AppResult<()> {
    let model = LinearModel::from_transfer_function(num, den)?;
    let tf = model.to_transfer_function()?;
    println!("G(s) = ({}) / ({})", tf.num_poly(), tf.den_poly());
    println!("  Order: {}", model.order());
    match model.dc_gain()? {
        Some(k) => println!("  DC gain: {}", k),
        None => println!("  DC gain: unbounded (pole at the origin)"),
    }

    if !model.is_proper() {
        println!("  Improper: no state-space realization");
        return Ok(());
    }

    let ss = model.to_state_space()?;
    println!("  A = {}", ss.a());
    println!("  B = {}", ss.b());
    println!("  C = {}", ss.c());
    println!("  D = {}", ss.d());

    let t_end = 20.0;
    match simulate_with(&model, &grid(t_end, 1e-2)?, &SimOptions::default()) {
        Ok(traj) => {
            let info = StepInfo::from_trajectory(&traj, DEFAULT_SETTLING_BAND);
            println!("  Step response over {} s:", t_end);
            println!("    peak: {:.6} at {:.4} s", info.peak, info.peak_time);
            println!("    final: {:.6}", info.final_value);
            print_metric("rise time (10-90%)", info.rise_time, "s");
            print_metric("settling time (2%)", info.settling_time, "s");
            print_metric("overshoot", info.overshoot, "%");
        }
        Err(e) => println!("  Step response: {}", e),
    }
    Ok(())
}

fn print_metric(label: &str, value: Option<f64>, unit: &str) {
    match value {
        Some(v) => println!("    {}: {:.4} {}", label, v, unit),
        None => println!("    {}: n/a", label),
    }
}
