//! Symbolic regression GP driver.

use clap::Parser;
use evopt::gp::{load_dataset, GpConfig, GpRunner};
use evopt::random::resolve_seed;
use evopt::report::GpReport;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "evopt-gp")]
#[command(about = "Tree GP for symbolic regression over a CSV dataset")]
#[command(version)]
struct Cli {
    /// Training dataset (CSV, one sample per line: x1,...,xk,y).
    #[arg(long)]
    dataset_train: PathBuf,

    /// Test dataset in the same format.
    #[arg(long)]
    dataset_test: PathBuf,

    /// Output file for the binary result record.
    #[arg(long)]
    output_file: PathBuf,

    /// Initial seed (-1 to pick one at random).
    #[arg(long, default_value_t = -1)]
    seed: i64,

    /// Number of independent instances to run.
    #[arg(long, default_value_t = 30)]
    num_instances: usize,

    /// Number of generations per instance.
    #[arg(long, default_value_t = 50)]
    num_generations: usize,

    /// Population size (normalized to fit ramped half-and-half).
    #[arg(long, default_value_t = 100)]
    population_size: usize,

    /// Tournament size.
    #[arg(long, default_value_t = 7)]
    tournament_size: usize,

    /// Maximum tree height.
    #[arg(long, default_value_t = 7)]
    max_height: usize,

    /// Crossover probability; mutation is used otherwise.
    #[arg(long, default_value_t = 0.9)]
    crossover_prob: f64,

    /// Carry the best individual unchanged into each new generation.
    #[arg(long)]
    elitism: bool,

    /// Evaluate the test dataset every generation.
    #[arg(long)]
    always_test: bool,
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
    let train = load_dataset(&cli.dataset_train)?;
    let test = load_dataset(&cli.dataset_test)?;
    let num_variables = train[0].0.len();

    let seed = resolve_seed(cli.seed);
    info!("seed: {seed}");

    let config = GpConfig::default()
        .with_seed(seed)
        .with_num_instances(cli.num_instances)
        .with_num_generations(cli.num_generations)
        .with_max_height(cli.max_height)
        .with_population_size(cli.population_size)
        .with_tournament_size(cli.tournament_size)
        .with_crossover_prob(cli.crossover_prob)
        .with_elitism(cli.elitism)
        .with_always_test(cli.always_test)
        .with_variables(num_variables);
    if config.population_size != cli.population_size {
        info!(
            "population size normalized from {} to {}",
            cli.population_size, config.population_size
        );
    }

    let result = GpRunner::run(&config, &train, &test)?;
    let report = GpReport::new(&config, &result);
    report.save(&cli.output_file)?;

    info!("final results:");
    info!(
        "  best fitness: {} +/- {}",
        report.final_stats.best_fitness.mean, report.final_stats.best_fitness.stddev
    );
    info!(
        "  best size: {} +/- {}",
        report.final_stats.best_size.mean, report.final_stats.best_size.stddev
    );
    info!("  best individual: {}", report.final_stats.best_expr);
    Ok(())
}
