//! Solution and result records for the ACO core.

use serde::{Deserialize, Serialize};

/// A candidate median set and its GAP objective value.
///
/// Starts at infinite distance so any real evaluation replaces it;
/// infeasible constructions keep the infinite distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Total client-to-median distance, `+inf` until evaluated.
    pub distance: f64,
    /// Indices of the chosen medians.
    pub medians: Vec<usize>,
}

impl Solution {
    /// An unevaluated solution that loses every comparison.
    pub fn unevaluated() -> Self {
        Self {
            distance: f64::INFINITY,
            medians: Vec::new(),
        }
    }

    /// Whether the solution carries a finite objective value.
    pub fn is_feasible(&self) -> bool {
        self.distance.is_finite()
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::unevaluated()
    }
}

/// Objective snapshot of one ACO iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Best objective seen so far across all iterations.
    pub global_best: f64,
    /// Best objective among this iteration's ants.
    pub local_best: f64,
    /// Worst feasible objective among this iteration's ants.
    pub local_worst: f64,
}

/// Outcome of one ACO execution.
#[derive(Debug, Clone)]
pub struct AcoRunResult {
    /// The best solution found over the whole execution.
    pub best: Solution,
    /// One record per iteration, in order.
    pub iterations: Vec<IterationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unevaluated_loses_to_any_real_distance() {
        let fresh = Solution::unevaluated();
        assert!(!fresh.is_feasible());
        assert!(1e300 < fresh.distance);
    }

    #[test]
    fn test_feasibility() {
        let solution = Solution {
            distance: 12.5,
            medians: vec![0, 3],
        };
        assert!(solution.is_feasible());
        let infeasible = Solution {
            distance: f64::INFINITY,
            medians: vec![1],
        };
        assert!(!infeasible.is_feasible());
    }
}
