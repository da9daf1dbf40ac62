//! GP evolutionary loop execution.
//!
//! [`GpRunner`] drives the full experiment: for each instance it builds a
//! ramped half-and-half population, evaluates it, and then iterates
//! generation assembly, fitness, and statistics. All stochastic decisions
//! run on the controller's RNG; only fitness evaluation fans out to the
//! worker pool.

use crate::error::Result;
use crate::gp::config::GpConfig;
use crate::gp::generators;
use crate::gp::operators::{self, ImprovementMetadata};
use crate::gp::stats::{self, Statistics};
use crate::gp::tree::Dataset;
use crate::parallel::EvalPool;
use crate::random::create_rng;
use log::info;

/// Statistics of a full GP run: one vector of per-generation statistics per
/// instance, for the training set and for the test set.
///
/// With `always_test` the test vectors cover every generation; otherwise
/// they hold a single entry for the final population.
#[derive(Debug, Clone)]
pub struct GpRunResult {
    /// Per-instance, per-generation training statistics.
    pub train: Vec<Vec<Statistics>>,
    /// Per-instance test statistics (all generations or final only).
    pub test: Vec<Vec<Statistics>>,
}

/// Executes the GP evolutionary loop.
pub struct GpRunner;

impl GpRunner {
    /// Runs all instances of the experiment.
    pub fn run(
        config: &GpConfig,
        train_dataset: &Dataset,
        test_dataset: &Dataset,
    ) -> Result<GpRunResult> {
        config.validate()?;

        let mut rng = create_rng(config.seed);
        let pool = EvalPool::new();

        let mut all_train = Vec::with_capacity(config.num_instances);
        let mut all_test = Vec::with_capacity(config.num_instances);

        for instance in 1..=config.num_instances {
            info!("instance {instance}");
            let mut train_stats = Vec::with_capacity(config.num_generations + 1);
            let mut test_stats = Vec::new();

            info!("generation 0");
            let mut population = generators::ramped_half_and_half(&mut rng, config);
            let mut fitnesses = stats::population_fitness(&population, train_dataset, &pool);
            let mut sizes = stats::population_sizes(&population);
            let generation_stats = Statistics::new(
                &population,
                &fitnesses,
                &sizes,
                &ImprovementMetadata::default(),
            );
            generation_stats.log("train");
            if config.always_test {
                test_stats.push(test_statistics(&population, test_dataset, &pool));
            }
            train_stats.push(generation_stats);

            for generation in 1..=config.num_generations {
                info!("generation {generation}");
                let parent_stats = train_stats.last().expect("generation 0 recorded");
                let (next_population, metadata) = operators::new_generation(
                    &mut rng,
                    config,
                    &population,
                    &fitnesses,
                    &sizes,
                    parent_stats,
                );
                population = next_population;
                fitnesses = stats::population_fitness(&population, train_dataset, &pool);
                sizes = stats::population_sizes(&population);

                let generation_stats = Statistics::new(&population, &fitnesses, &sizes, &metadata);
                generation_stats.log("train");
                if config.always_test || generation == config.num_generations {
                    test_stats.push(test_statistics(&population, test_dataset, &pool));
                }
                train_stats.push(generation_stats);
            }

            all_train.push(train_stats);
            all_test.push(test_stats);
        }

        Ok(GpRunResult {
            train: all_train,
            test: all_test,
        })
    }
}

fn test_statistics(
    population: &[crate::gp::tree::Node],
    test_dataset: &Dataset,
    pool: &EvalPool,
) -> Statistics {
    let fitnesses = stats::population_fitness(population, test_dataset, pool);
    let sizes = stats::population_sizes(population);
    let statistics = Statistics::new(population, &fitnesses, &sizes, &ImprovementMetadata::default());
    statistics.log("test");
    statistics
}
