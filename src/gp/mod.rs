//! Genetic Programming core for symbolic regression.
//!
//! Evolves a fixed-size population of expression trees against a tabular
//! dataset, minimizing root-mean-square deviation from the target column.
//!
//! # Key Types
//!
//! - [`Primitive`] / [`Node`]: expression tree representation
//! - [`GpConfig`]: run parameters, with population-size normalization
//! - [`Statistics`]: per-generation summary used for selection and reporting
//! - [`GpRunner`]: the multi-instance evolutionary loop
//!
//! # References
//!
//! - Koza (1992), *Genetic Programming: On the Programming of Computers by
//!   Means of Natural Selection*
//! - Poli, Langdon & McPhee (2008), *A Field Guide to Genetic Programming*

mod config;
mod dataset;
mod generators;
mod operators;
mod primitives;
mod runner;
mod stats;
mod tree;

pub use config::GpConfig;
pub use dataset::load_dataset;
pub use generators::{full, grow, ramped_half_and_half};
pub use operators::{
    crossover, max_node_height, mutation, new_generation, random_tree_point,
    tournament_selection, ImprovementMetadata,
};
pub use primitives::{safe_div, FunctionSpec, Primitive, TerminalSpec};
pub use runner::{GpRunResult, GpRunner};
pub use stats::{
    fitness, population_fitness, population_sizes, ImprovementCounts, Statistics,
};
pub use tree::{Dataset, EvalInput, Node};
