// src/bin/sweep.rs

use clap::Parser;
use matching_market::agents::config::{
    DEFAULT_D, DEFAULT_DELTA, DEFAULT_HORIZON, DEFAULT_LAMBDA, DEFAULT_M, DEFAULT_SEED,
    DEFAULT_TRIALS,
};
use matching_market::{ExperimentConfig, MarketParams, Result, Strategy, SweepAxis, experiment};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Compare greedy and patient matching across a parameter sweep")]
struct Args {
    /// JSON experiment config. When given, it replaces --lambda, --m, --d, --delta,
    /// --horizon, --trials and --seed entirely
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mean agent lifespan
    #[arg(long, default_value_t = DEFAULT_LAMBDA)]
    lambda: f64,

    /// Mean arrivals per step
    #[arg(long, default_value_t = DEFAULT_M)]
    m: u64,

    /// Compatibility threshold (edge probability d / (m + 1))
    #[arg(long, default_value_t = DEFAULT_D)]
    d: u64,

    /// Discount rate
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    delta: f64,

    /// Steps per run
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    horizon: u64,

    /// Runs per strategy and sweep point
    #[arg(short, long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Base seed; trial i uses seed + i
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Parameter to sweep: lambda, m, d or delta. Without it a single comparison is run.
    #[arg(long)]
    axis: Option<SweepAxis>,

    /// Sweep values, comma separated. Required with --axis
    #[arg(long, value_delimiter = ',', requires = "axis")]
    values: Vec<f64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => ExperimentConfig::from_json_file(path)?,
        None => ExperimentConfig {
            params: MarketParams {
                lambda: args.lambda,
                m: args.m,
                d: args.d,
                delta: args.delta,
                strategy: Strategy::Greedy,
            },
            horizon: args.horizon,
            trials: args.trials,
            seed: args.seed,
        },
    };
    config.params.validate()?;
    log::info!(
        "lambda={} m={} d={} delta={} horizon={} trials={}",
        config.params.lambda,
        config.params.m,
        config.params.d,
        config.params.delta,
        config.horizon,
        config.trials
    );

    match args.axis {
        Some(axis) => {
            for point in experiment::sweep(&config, axis, &args.values)? {
                println!("{}", serde_json::to_string(&point)?);
            }
        }
        None => {
            let comparison = experiment::compare_strategies(&config)?;
            println!("{}", serde_json::to_string(&comparison)?);
        }
    }
    Ok(())
}
