//! Fitness evaluation and per-generation statistics.
//!
//! Fitness is the root-mean-square deviation of a tree's predictions
//! against the dataset targets, with no normalization. Non-finite fitness
//! values (log of a non-positive number, overflow) are retained: they are
//! ordered as worse than any finite value so they lose tournaments and the
//! best slot, but they are never filtered from the population.

use crate::gp::operators::ImprovementMetadata;
use crate::gp::tree::{Dataset, Node};
use crate::parallel::EvalPool;
use log::info;
use std::collections::HashSet;

/// Whether fitness `a` beats fitness `b` under minimization.
/// NaN never beats anything; anything non-NaN beats NaN.
pub(crate) fn better(a: f64, b: f64) -> bool {
    if a.is_nan() {
        false
    } else if b.is_nan() {
        true
    } else {
        a < b
    }
}

/// Whether fitness `a` is strictly worse than fitness `b`.
pub(crate) fn worse(a: f64, b: f64) -> bool {
    better(b, a)
}

/// RMSE of one tree over the dataset.
pub fn fitness(tree: &Node, dataset: &Dataset) -> f64 {
    let mut error = 0.0;
    for (input, expected) in dataset {
        error += (tree.eval(input) - expected).powi(2);
    }
    (error / dataset.len() as f64).sqrt()
}

/// Fitness of every individual, evaluated on the pool. The result vector
/// matches population order, and the outcome is independent of the worker
/// count: each index reads one tree and writes one slot.
pub fn population_fitness(population: &[Node], dataset: &Dataset, pool: &EvalPool) -> Vec<f64> {
    pool.map(0, population.len(), |i| fitness(&population[i], dataset))
}

/// Node count of every individual, in population order.
pub fn population_sizes(population: &[Node]) -> Vec<usize> {
    population.iter().map(Node::size).collect()
}

/// Better/worse child counts for one operator's offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImprovementCounts {
    /// Children that beat their recorded parent fitness.
    pub num_better: usize,
    /// Children that came out worse than their recorded parent fitness.
    pub num_worse: usize,
}

/// Summary of one generation of one instance.
#[derive(Debug, Clone)]
pub struct Statistics {
    /// Index of the best individual.
    pub best: usize,
    /// Fitness of the best individual.
    pub best_fitness: f64,
    /// Size of the best individual.
    pub best_size: usize,
    /// Printed expression of the best individual.
    pub best_expr: String,
    /// Index of the worst individual.
    pub worst: usize,
    /// Fitness of the worst individual.
    pub worst_fitness: f64,
    /// Size of the worst individual.
    pub worst_size: usize,
    /// Mean fitness across the population.
    pub avg_fitness: f64,
    /// Mean size across the population.
    pub avg_size: f64,
    /// Individuals whose fitness already occurred earlier in the vector.
    pub num_repeated: usize,
    /// Crossover improvement tallies; absent when no crossover children
    /// exist (generation 0, or a generation that only mutated).
    pub crossover: Option<ImprovementCounts>,
    /// Mutation improvement tallies, absent on the same terms.
    pub mutation: Option<ImprovementCounts>,
}

impl Statistics {
    /// Computes the statistics of a population. `metadata` carries the
    /// provenance of crossover/mutation children; pass an empty one for
    /// generation 0.
    pub fn new(
        population: &[Node],
        fitnesses: &[f64],
        sizes: &[usize],
        metadata: &ImprovementMetadata,
    ) -> Self {
        let mut best = 0;
        let mut worst = 0;
        let mut fitness_sum = 0.0;
        let mut size_sum = 0usize;
        for i in 0..fitnesses.len() {
            if better(fitnesses[i], fitnesses[best]) {
                best = i;
            }
            if worse(fitnesses[i], fitnesses[worst]) {
                worst = i;
            }
            fitness_sum += fitnesses[i];
            size_sum += sizes[i];
        }

        let mut seen = HashSet::with_capacity(fitnesses.len());
        let mut num_repeated = 0;
        for &fitness in fitnesses {
            if !seen.insert(fitness.to_bits()) {
                num_repeated += 1;
            }
        }

        Self {
            best,
            best_fitness: fitnesses[best],
            best_size: sizes[best],
            best_expr: population[best].to_string(),
            worst,
            worst_fitness: fitnesses[worst],
            worst_size: sizes[worst],
            avg_fitness: fitness_sum / fitnesses.len() as f64,
            avg_size: size_sum as f64 / sizes.len() as f64,
            num_repeated,
            crossover: improvement_counts(&metadata.crossover_avg_parent_fitness, fitnesses),
            mutation: improvement_counts(&metadata.mutation_parent_fitness, fitnesses),
        }
    }

    /// Logs a one-generation summary under the given label.
    pub fn log(&self, label: &str) {
        info!(
            "  {label}: best {:.6} (size {}) | worst {:.6} (size {}) | avg {:.6} | avg size {:.2} | repeated {}",
            self.best_fitness,
            self.best_size,
            self.worst_fitness,
            self.worst_size,
            self.avg_fitness,
            self.avg_size,
            self.num_repeated,
        );
        if let (Some(crossover), Some(mutation)) = (&self.crossover, &self.mutation) {
            info!(
                "  {label}: cross better/worse {}/{} | mut better/worse {}/{}",
                crossover.num_better, crossover.num_worse, mutation.num_better, mutation.num_worse,
            );
        }
    }
}

/// Tallies children against their recorded parent fitness. Absent when the
/// operator produced no children this generation.
fn improvement_counts(
    parent_fitnesses: &[(usize, f64)],
    fitnesses: &[f64],
) -> Option<ImprovementCounts> {
    if parent_fitnesses.is_empty() {
        return None;
    }

    let mut counts = ImprovementCounts::default();
    for &(child, parent_fitness) in parent_fitnesses {
        if better(fitnesses[child], parent_fitness) {
            counts.num_better += 1;
        } else if worse(fitnesses[child], parent_fitness) {
            counts.num_worse += 1;
        }
    }
    Some(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::primitives::Primitive;

    fn x(slot: usize) -> Node {
        Node::leaf(Primitive::Var(slot))
    }

    fn reference_dataset() -> Dataset {
        vec![(vec![12.0, 2.0], 15.0), (vec![15.0, 4.0], 21.0)]
    }

    #[test]
    fn test_rmse_reference_values() {
        let dataset = reference_dataset();

        // x0 + x1: errors -1 and -2 -> sqrt(5/2)
        let sum = Node::new(Primitive::Add, vec![x(0), x(1)]);
        assert!((fitness(&sum, &dataset) - 1.581_138_8).abs() < 1e-6);

        // log2(x0)
        let log = Node::new(Primitive::Log2, vec![x(0)]);
        assert!((fitness(&log, &dataset) - 14.534_055).abs() < 1e-5);

        // x0
        assert!((fitness(&x(0), &dataset) - 4.743_416_3).abs() < 1e-6);
    }

    #[test]
    fn test_population_fitness_order_and_determinism() {
        let dataset = reference_dataset();
        let population = vec![
            Node::new(Primitive::Add, vec![x(0), x(1)]),
            x(0),
            Node::new(Primitive::Log2, vec![x(0)]),
        ];

        let serial = EvalPool::with_workers(1);
        let parallel = EvalPool::with_workers(4);
        let a = population_fitness(&population, &dataset, &serial);
        let b = population_fitness(&population, &dataset, &parallel);
        assert_eq!(a, b);
        assert!((a[0] - 1.581_138_8).abs() < 1e-6);
        assert!((a[1] - 4.743_416_3).abs() < 1e-6);
    }

    #[test]
    fn test_population_sizes() {
        let population = vec![x(0), Node::new(Primitive::Add, vec![x(0), x(1)])];
        assert_eq!(population_sizes(&population), vec![1, 3]);
    }

    #[test]
    fn test_statistics_best_worst_avg() {
        let population = vec![x(0), x(1), x(0), x(1)];
        let fitnesses = vec![3.0, 1.0, 4.0, 2.0];
        let sizes = vec![1, 1, 1, 1];
        let stats = Statistics::new(
            &population,
            &fitnesses,
            &sizes,
            &ImprovementMetadata::default(),
        );

        assert_eq!(stats.best, 1);
        assert_eq!(stats.best_fitness, 1.0);
        assert_eq!(stats.best_expr, "x1");
        assert_eq!(stats.worst, 2);
        assert_eq!(stats.worst_fitness, 4.0);
        assert!((stats.avg_fitness - 2.5).abs() < 1e-12);
        assert!((stats.avg_size - 1.0).abs() < 1e-12);
        assert!(stats.crossover.is_none());
        assert!(stats.mutation.is_none());
    }

    #[test]
    fn test_nan_never_wins_best_but_takes_worst() {
        let population = vec![x(0), x(0), x(0)];
        let fitnesses = vec![f64::NAN, 2.0, 5.0];
        let sizes = vec![1, 1, 1];
        let stats = Statistics::new(
            &population,
            &fitnesses,
            &sizes,
            &ImprovementMetadata::default(),
        );
        assert_eq!(stats.best, 1);
        assert_eq!(stats.worst, 0);
        assert!(stats.worst_fitness.is_nan());
    }

    #[test]
    fn test_infinite_fitness_is_retained() {
        let population = vec![x(0), x(0)];
        let fitnesses = vec![f64::INFINITY, 1.0];
        let sizes = vec![1, 1];
        let stats = Statistics::new(
            &population,
            &fitnesses,
            &sizes,
            &ImprovementMetadata::default(),
        );
        assert_eq!(stats.best, 1);
        assert_eq!(stats.worst, 0);
        assert_eq!(stats.worst_fitness, f64::INFINITY);
    }

    #[test]
    fn test_repeated_fitness_count() {
        let population = vec![x(0); 5];
        let fitnesses = vec![1.0, 2.0, 1.0, 1.0, 2.0];
        let sizes = vec![1; 5];
        let stats = Statistics::new(
            &population,
            &fitnesses,
            &sizes,
            &ImprovementMetadata::default(),
        );
        // 1.0 repeats twice, 2.0 once.
        assert_eq!(stats.num_repeated, 3);
    }

    #[test]
    fn test_improvement_tallies() {
        let population = vec![x(0); 4];
        let fitnesses = vec![1.0, 5.0, 3.0, 3.0];
        let sizes = vec![1; 4];
        let metadata = ImprovementMetadata {
            crossover_avg_parent_fitness: vec![(0, 2.0), (1, 2.0)],
            mutation_parent_fitness: vec![(2, 3.0), (3, 4.0)],
        };
        let stats = Statistics::new(&population, &fitnesses, &sizes, &metadata);

        let crossover = stats.crossover.unwrap();
        assert_eq!(crossover.num_better, 1);
        assert_eq!(crossover.num_worse, 1);
        let mutation = stats.mutation.unwrap();
        // Child 2 equals its parent: counted neither better nor worse.
        assert_eq!(mutation.num_better, 1);
        assert_eq!(mutation.num_worse, 0);
    }

    #[test]
    fn test_better_worse_ordering() {
        assert!(better(1.0, 2.0));
        assert!(!better(2.0, 1.0));
        assert!(!better(f64::NAN, 1.0));
        assert!(better(1.0, f64::NAN));
        assert!(better(f64::INFINITY, f64::NAN));
        assert!(worse(f64::NAN, f64::INFINITY));
        assert!(!worse(f64::NAN, f64::NAN));
    }
}
