//! Ant Colony Optimization core for the capacitated p-median problem.
//!
//! Iteratively constructs candidate median sets by roulette over a
//! pheromone vector, scores each with a deterministic GAP assignment
//! heuristic, and reinforces the pheromones of the iteration's best set
//! with min/max clamping and stagnation reset.
//!
//! # Key Types
//!
//! - [`PMedianInstance`]: the dataset (points with capacity and demand)
//! - [`AcoConfig`]: iteration, ant, and pheromone parameters
//! - [`AcoRunner`]: the iteration loop
//! - [`Solution`] / [`IterationRecord`]: candidate sets and per-iteration
//!   objective snapshots
//!
//! # References
//!
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*
//! - Stützle & Hoos (2000), "MAX-MIN Ant System", *Future Generation
//!   Computer Systems* 16(8)

mod config;
mod dataset;
mod gap;
mod runner;
mod types;

pub use config::AcoConfig;
pub use dataset::{PMedianInstance, Point};
pub use gap::{gap, GapAssignment};
pub use runner::{select_medians, AcoRunner};
pub use types::{AcoRunResult, IterationRecord, Solution};
