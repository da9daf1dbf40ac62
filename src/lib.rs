//! Population-based metaheuristic cores over a shared substrate of
//! evaluation, scoring, and stochastic variation.
//!
//! Two cores are provided:
//!
//! - **Genetic Programming ([`gp`])**: evolves a fixed-size population of
//!   expression trees for symbolic regression over a tabular dataset,
//!   minimizing root-mean-square deviation. Ramped half-and-half
//!   initialization, tournament selection, height-limited subtree
//!   crossover and mutation, elitist replacement, and parallel fitness
//!   evaluation.
//! - **Ant Colony Optimization ([`aco`])**: solves the capacitated
//!   p-median problem by constructing median sets from a pheromone vector,
//!   scoring them with a greedy GAP assignment heuristic, and updating
//!   pheromones with min/max clamping and stagnation reset.
//!
//! # Architecture
//!
//! The cores share the ambient substrate: one seeded generator per run
//! ([`random`]), a fixed-size worker pool for parallel fitness
//! ([`parallel`]), a common error taxonomy ([`error`]), and versioned
//! binary result records ([`report`]). All stochastic decisions run on the
//! controller; workers only evaluate.

pub mod aco;
pub mod error;
pub mod gp;
pub mod parallel;
pub mod random;
pub mod report;

pub use error::{Error, Result};
