use nbsim::{ScenarioConfig, Scenario, CsvRecorder, RunReport};
use nbsim::{bench_gravity, bench_steps};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Direct-summation N-body gravity simulator")]
struct Args {
    /// Scenario YAML, as a path or a name under `scenarios/`
    #[arg(short, default_value = "earth_moon.yaml")]
    file_name: String,

    /// Trajectory CSV output
    #[arg(long, default_value = "trajectory.csv")]
    out: PathBuf,

    /// Optional YAML run summary
    #[arg(long)]
    summary: Option<PathBuf>,

    /// First step written to the trajectory CSV
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Override the scenario's force worker count
    #[arg(long)]
    workers: Option<usize>,

    /// Benchmark the force model instead of running the scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let mut config_path = PathBuf::from(file_name);
    if !config_path.exists() {
        config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    }

    let file = File::open(&config_path)
        .with_context(|| format!("cannot open scenario {}", config_path.display()))?;
    let scenario_cfg = ScenarioConfig::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse scenario {}", config_path.display()))?;

    info!("loaded scenario {}", config_path.display());
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        let workers = args.workers.unwrap_or(4);
        let mut counts = vec![1, 2, workers];
        counts.sort_unstable();
        counts.dedup();
        bench_gravity(&counts)?;
        bench_steps(workers)?;
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(workers) = args.workers {
        scenario_cfg.parameters.workers = workers;
    }

    let scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;
    if args.start > scenario.parameters.steps {
        warn!("--start {} is past the last step {}, trajectory will be empty", args.start, scenario.parameters.steps);
    }

    let initial = scenario.system.bodies.clone();
    let parameters = scenario.parameters.clone();
    let mut sim = scenario.into_simulation()?;

    let out = File::create(&args.out)
        .with_context(|| format!("cannot create {}", args.out.display()))?;
    let mut recorder = CsvRecorder::new(BufWriter::new(out), args.start);

    let t0 = Instant::now();
    let summary = sim.run(&mut recorder).context("simulation aborted")?;
    let execution_seconds = t0.elapsed().as_secs_f64();

    info!("wrote {} rows to {}", recorder.rows(), args.out.display());

    let report = RunReport::new(&parameters, args.start, &initial, &summary.bodies, summary.steps, execution_seconds);
    info!(
        "execution time {:.3} s, momentum drift {:e}, relative energy drift {:e}",
        report.execution_seconds, report.momentum_drift, report.energy_drift
    );

    if let Some(path) = &args.summary {
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        report.write_yaml(BufWriter::new(file))?;
        info!("wrote summary to {}", path.display());
    }

    Ok(())
}
