//! Capacitated p-median ACO driver.

use clap::Parser;
use evopt::aco::{AcoConfig, AcoRunner, PMedianInstance};
use evopt::random::{create_rng, resolve_seed};
use evopt::report::{AcoParamsRecord, AcoReport};
use log::info;
use rand::Rng;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "evopt-aco")]
#[command(about = "Ant colony optimization for the capacitated p-median problem")]
#[command(version)]
struct Cli {
    /// Problem instance file (`n p` header, then `x y capacity demand`).
    #[arg(long)]
    dataset: PathBuf,

    /// Output file for the binary result record.
    #[arg(long)]
    output_file: PathBuf,

    /// Initial seed (-1 to pick one at random).
    #[arg(long, default_value_t = -1)]
    seed: i64,

    /// Number of ants per iteration (-1 for n - p).
    #[arg(long, default_value_t = -1)]
    num_ants: i64,

    /// Number of independent executions.
    #[arg(long, default_value_t = 30)]
    num_executions: usize,

    /// Number of iterations per execution.
    #[arg(long, default_value_t = 50)]
    num_iterations: usize,

    /// Pheromone decay rate.
    #[arg(long, default_value_t = 0.01)]
    decay: f64,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> evopt::Result<()> {
    let instance = PMedianInstance::load(&cli.dataset)?;

    let master_seed = resolve_seed(cli.seed);
    info!("seed: {master_seed}");

    // One derived seed per execution, all reproducible from the master.
    let mut seed_rng = create_rng(master_seed);
    let seeds: Vec<u64> = (0..cli.num_executions)
        .map(|_| u64::from(seed_rng.random::<u32>()))
        .collect();

    let num_ants = if cli.num_ants < 0 {
        None
    } else {
        Some(cli.num_ants as usize)
    };

    let mut results = Vec::with_capacity(cli.num_executions);
    for (execution, &seed) in seeds.iter().enumerate() {
        info!("execution {execution}");
        let config = AcoConfig::default()
            .with_seed(seed)
            .with_num_iterations(cli.num_iterations)
            .with_num_ants(num_ants)
            .with_decay(cli.decay);
        results.push(AcoRunner::run(&instance, &config)?);
    }

    let params = AcoParamsRecord {
        seed: master_seed,
        num_executions: cli.num_executions,
        num_iterations: cli.num_iterations,
        num_ants: cli.num_ants,
        decay: cli.decay,
    };
    let report = AcoReport::new(params, &results);
    report.save(&cli.output_file)?;

    info!("mean global best: {}", report.mean_final_global_best());
    Ok(())
}
