//! ACO iteration loop for the capacitated p-median problem.
//!
//! Each iteration constructs candidate median sets by roulette over the
//! pheromone vector, scores them with the GAP heuristic, reinforces the
//! pheromones of the iteration's best set, and resets the vector when it
//! saturates toward the min/max bounds.

use crate::aco::config::AcoConfig;
use crate::aco::dataset::PMedianInstance;
use crate::aco::gap;
use crate::aco::types::{AcoRunResult, IterationRecord, Solution};
use crate::error::Result;
use crate::random::create_rng;
use log::{info, warn};
use rand::Rng;

/// Executes the ant colony loop.
pub struct AcoRunner;

impl AcoRunner {
    /// Runs one execution against the instance.
    pub fn run(instance: &PMedianInstance, config: &AcoConfig) -> Result<AcoRunResult> {
        config.validate()?;

        let num_points = instance.num_points();
        let num_medians = instance.num_medians();
        let num_ants = config
            .num_ants
            .unwrap_or_else(|| (num_points - num_medians).max(1));

        let mut rng = create_rng(config.seed);
        let distances = instance.distance_matrix();
        let mut pheromones = vec![config.initial_pheromone; num_points];

        let mut global_best = Solution::unevaluated();
        let mut records = Vec::with_capacity(config.num_iterations);
        for iteration in 0..config.num_iterations {
            let mut solutions = Vec::with_capacity(num_ants);
            for _ in 0..num_ants {
                let (clients, medians) = select_medians(&mut rng, &pheromones, num_medians);
                let distance = match gap::gap(instance, &clients, &medians, &distances) {
                    Ok(assignment) => assignment.total_distance,
                    Err(error) => {
                        warn!("iteration {iteration}: discarding candidate: {error}");
                        f64::INFINITY
                    }
                };
                solutions.push(Solution { distance, medians });
            }

            let record = match local_extremes(&solutions) {
                Some((local_best, local_worst)) => {
                    let record = IterationRecord {
                        global_best: global_best.distance.min(local_best.distance),
                        local_best: local_best.distance,
                        local_worst: local_worst.distance,
                    };
                    update_pheromones(
                        &mut pheromones,
                        config,
                        &mut global_best,
                        local_best,
                        local_worst,
                    );
                    record
                }
                // Every ant was infeasible: no update this iteration.
                None => IterationRecord {
                    global_best: global_best.distance,
                    local_best: f64::INFINITY,
                    local_worst: f64::INFINITY,
                },
            };

            stagnation_control(&mut pheromones, config, num_medians);

            info!(
                "  iteration {iteration}\t| globalBest: {}\t| localBest: {}\t| localWorst: {}",
                record.global_best, record.local_best, record.local_worst
            );
            records.push(record);
        }

        Ok(AcoRunResult {
            best: global_best,
            iterations: records,
        })
    }
}

/// Roulette-selects `num_medians` distinct indices weighted by pheromone,
/// returning the complement and the selection as `(clients, medians)`.
pub fn select_medians<R: Rng>(
    rng: &mut R,
    pheromones: &[f64],
    num_medians: usize,
) -> (Vec<usize>, Vec<usize>) {
    let mut unselected: Vec<usize> = (0..pheromones.len()).collect();
    let mut medians = Vec::with_capacity(num_medians);

    for _ in 0..num_medians {
        let total: f64 = unselected.iter().map(|&i| pheromones[i]).sum();
        let draw = rng.random_range(0.0..total);

        let mut boundary = 0.0;
        let mut chosen = unselected.len() - 1; // floating-point fallback
        for (position, &point) in unselected.iter().enumerate() {
            boundary += pheromones[point];
            if draw <= boundary {
                chosen = position;
                break;
            }
        }
        medians.push(unselected.remove(chosen));
    }

    (unselected, medians)
}

/// Best and worst among the feasible solutions of one iteration; `None`
/// when every construction was infeasible, so that infinite-cost
/// candidates never corrupt the extremes.
fn local_extremes(solutions: &[Solution]) -> Option<(&Solution, &Solution)> {
    let mut best: Option<&Solution> = None;
    let mut worst: Option<&Solution> = None;
    for solution in solutions.iter().filter(|s| s.is_feasible()) {
        if best.is_none_or(|b| solution.distance < b.distance) {
            best = Some(solution);
        }
        if worst.is_none_or(|w| solution.distance > w.distance) {
            worst = Some(solution);
        }
    }
    best.zip(worst)
}

/// Reinforces the pheromones of the iteration's best median set and takes
/// over the global best when beaten.
///
/// `delta` measures how close the local best came to the global best,
/// scaled by the local best-to-worst spread; a degenerate spread of zero
/// counts as full reinforcement. Every touched entry is clamped to
/// `[min_pheromone, max_pheromone]`.
fn update_pheromones(
    pheromones: &mut [f64],
    config: &AcoConfig,
    global_best: &mut Solution,
    local_best: &Solution,
    local_worst: &Solution,
) {
    let spread = local_worst.distance - local_best.distance;
    let delta = if spread > 0.0 {
        1.0 - (local_best.distance - global_best.distance) / spread
    } else {
        1.0
    };

    for &median in &local_best.medians {
        let updated = pheromones[median] + config.decay * (delta - pheromones[median]);
        pheromones[median] = updated.clamp(config.min_pheromone, config.max_pheromone);
    }

    if local_best.distance < global_best.distance {
        *global_best = local_best.clone();
    }
}

/// Resets the pheromone vector when its sum is within the stagnation
/// threshold of the saturated state (`p` entries at max, the rest at min).
fn stagnation_control(pheromones: &mut [f64], config: &AcoConfig, num_medians: usize) {
    let sum: f64 = pheromones.iter().sum();
    let stagnation_sum = num_medians as f64 * config.max_pheromone
        + (pheromones.len() - num_medians) as f64 * config.min_pheromone;

    if (sum - stagnation_sum).abs() < config.stagnation_threshold {
        info!("pheromones saturated, resetting to {}", config.initial_pheromone);
        pheromones.fill(config.initial_pheromone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::dataset::Point;
    use crate::random::create_rng;

    fn point(x: f64, y: f64, capacity: f64, demand: f64) -> Point {
        Point {
            x,
            y,
            capacity,
            demand,
        }
    }

    fn clustered_instance() -> PMedianInstance {
        // Two clusters with ample capacity; p = 2.
        PMedianInstance::new(
            vec![
                point(0.0, 0.0, 100.0, 1.0),
                point(1.0, 0.0, 100.0, 1.0),
                point(0.0, 1.0, 100.0, 1.0),
                point(20.0, 20.0, 100.0, 1.0),
                point(21.0, 20.0, 100.0, 1.0),
                point(20.0, 21.0, 100.0, 1.0),
            ],
            2,
        )
    }

    #[test]
    fn test_select_medians_partitions_points() {
        let mut rng = create_rng(3);
        let pheromones = vec![0.5; 10];
        let (clients, medians) = select_medians(&mut rng, &pheromones, 3);
        assert_eq!(medians.len(), 3);
        assert_eq!(clients.len(), 7);

        let mut all: Vec<usize> = clients.iter().chain(&medians).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_select_medians_follows_pheromone_weight() {
        let mut rng = create_rng(4);
        // Index 2 carries almost all the mass.
        let mut pheromones = vec![0.001; 5];
        pheromones[2] = 0.999;

        let mut hits = 0;
        for _ in 0..1000 {
            let (_, medians) = select_medians(&mut rng, &pheromones, 1);
            if medians[0] == 2 {
                hits += 1;
            }
        }
        assert!(hits > 950, "expected heavy index to dominate, got {hits}");
    }

    #[test]
    fn test_pheromone_bounds_invariant() {
        let config = AcoConfig::default();
        let mut pheromones = vec![0.5; 8];
        let mut global_best = Solution::unevaluated();

        let local_best = Solution {
            distance: 10.0,
            medians: vec![0, 3],
        };
        let local_worst = Solution {
            distance: 40.0,
            medians: vec![1, 2],
        };
        for _ in 0..10_000 {
            update_pheromones(
                &mut pheromones,
                &config,
                &mut global_best,
                &local_best,
                &local_worst,
            );
            for &tau in pheromones.iter() {
                assert!((config.min_pheromone..=config.max_pheromone).contains(&tau));
            }
        }
    }

    #[test]
    fn test_update_replaces_global_best() {
        let config = AcoConfig::default();
        let mut pheromones = vec![0.5; 4];
        let mut global_best = Solution::unevaluated();
        let local_best = Solution {
            distance: 5.0,
            medians: vec![1],
        };
        let local_worst = Solution {
            distance: 9.0,
            medians: vec![2],
        };
        update_pheromones(
            &mut pheromones,
            &config,
            &mut global_best,
            &local_best,
            &local_worst,
        );
        assert_eq!(global_best.distance, 5.0);
        assert_eq!(global_best.medians, vec![1]);

        // A worse local best must not take over.
        let worse = Solution {
            distance: 7.0,
            medians: vec![3],
        };
        update_pheromones(
            &mut pheromones, &config, &mut global_best, &worse, &local_worst,
        );
        assert_eq!(global_best.distance, 5.0);
    }

    #[test]
    fn test_degenerate_spread_reinforces() {
        let config = AcoConfig::default();
        let mut pheromones = vec![0.5; 2];
        let mut global_best = Solution {
            distance: 5.0,
            medians: vec![0],
        };
        let solution = Solution {
            distance: 5.0,
            medians: vec![1],
        };
        // local best == local worst: delta defined as 1.
        update_pheromones(
            &mut pheromones,
            &config,
            &mut global_best,
            &solution,
            &solution,
        );
        assert!(pheromones[1] > 0.5);
        assert!(pheromones[1] <= config.max_pheromone);
    }

    #[test]
    fn test_stagnation_reset() {
        let config = AcoConfig::default();
        // Saturated state for p = 2, n = 6.
        let mut pheromones = vec![
            config.max_pheromone,
            config.max_pheromone,
            config.min_pheromone,
            config.min_pheromone,
            config.min_pheromone,
            config.min_pheromone,
        ];
        stagnation_control(&mut pheromones, &config, 2);
        assert!(pheromones.iter().all(|&t| t == config.initial_pheromone));
    }

    #[test]
    fn test_no_reset_far_from_saturation() {
        let config = AcoConfig::default();
        let mut pheromones = vec![0.5; 6];
        stagnation_control(&mut pheromones, &config, 2);
        assert!(pheromones.iter().all(|&t| t == 0.5));
    }

    #[test]
    fn test_local_extremes_skip_infeasible() {
        let feasible = Solution {
            distance: 3.0,
            medians: vec![0],
        };
        let worse = Solution {
            distance: 8.0,
            medians: vec![1],
        };
        let infeasible = Solution {
            distance: f64::INFINITY,
            medians: vec![2],
        };
        let solutions = vec![infeasible.clone(), feasible.clone(), worse.clone()];
        let (best, worst) = local_extremes(&solutions).unwrap();
        assert_eq!(best.distance, 3.0);
        assert_eq!(worst.distance, 8.0);

        assert!(local_extremes(&[infeasible]).is_none());
    }

    #[test]
    fn test_run_produces_records_and_best() {
        let instance = clustered_instance();
        let config = AcoConfig::default().with_seed(9).with_num_iterations(30);
        let result = AcoRunner::run(&instance, &config).unwrap();

        assert_eq!(result.iterations.len(), 30);
        assert!(result.best.is_feasible());
        assert_eq!(result.best.medians.len(), 2);

        // Global best is monotonically non-increasing.
        for window in result.iterations.windows(2) {
            assert!(window[1].global_best <= window[0].global_best);
        }
        // Records are consistent within an iteration.
        for record in &result.iterations {
            assert!(record.global_best <= record.local_best);
            assert!(record.local_best <= record.local_worst);
        }
    }

    #[test]
    fn test_run_deterministic_per_seed() {
        let instance = clustered_instance();
        let config = AcoConfig::default().with_seed(11).with_num_iterations(20);
        let a = AcoRunner::run(&instance, &config).unwrap();
        let b = AcoRunner::run(&instance, &config).unwrap();
        assert_eq!(a.best.medians, b.best.medians);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_default_ants_is_n_minus_p() {
        // Indirect check: a 6-point, 2-median instance runs with 4 ants and
        // still succeeds with no explicit ant count.
        let instance = clustered_instance();
        let config = AcoConfig::default().with_seed(1).with_num_iterations(5);
        assert!(AcoRunner::run(&instance, &config).is_ok());
    }
}
