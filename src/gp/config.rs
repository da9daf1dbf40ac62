//! GP run configuration.
//!
//! [`GpConfig`] holds every parameter of the evolutionary loop. The
//! population size is normalized on construction so that ramped
//! half-and-half can split it across heights: at least `max_height - 1`,
//! a multiple of `max_height - 1`, and even, rounding up in steps of
//! `max_height - 1`.

use crate::error::{Error, Result};
use crate::gp::primitives::{FunctionSpec, TerminalSpec};

/// Configuration for the Genetic Programming core.
///
/// # Builder
///
/// ```
/// use evopt::gp::GpConfig;
///
/// let config = GpConfig::default()
///     .with_seed(42)
///     .with_population_size(48)
///     .with_max_height(7)
///     .with_elitism(true);
/// assert_eq!(config.population_size, 48);
/// ```
#[derive(Debug, Clone)]
pub struct GpConfig {
    /// Seed for the run's generator.
    pub seed: u64,

    /// Number of independent instances (restarts) to run.
    pub num_instances: usize,

    /// Generations per instance, not counting the initial population.
    pub num_generations: usize,

    /// Number of individuals, normalized as described on the type.
    pub population_size: usize,

    /// Number of uniform samples per tournament.
    pub tournament_size: usize,

    /// Maximum tree height; the root counts as height 1.
    pub max_height: usize,

    /// Probability of crossover for each offspring pair; mutation otherwise.
    /// Must lie in `[0, 1)`.
    pub crossover_prob: f64,

    /// Whether to copy the best parent unchanged into slot 0.
    pub elitism: bool,

    /// Whether to evaluate the test dataset every generation instead of
    /// only after the last one.
    pub always_test: bool,

    /// Function primitives available to the generators.
    pub functions: Vec<FunctionSpec>,

    /// Terminal primitives available to the generators.
    pub terminals: Vec<TerminalSpec>,
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_instances: 30,
            num_generations: 50,
            population_size: normalized_population(100, 7),
            tournament_size: 7,
            max_height: 7,
            crossover_prob: 0.9,
            elitism: false,
            always_test: false,
            functions: FunctionSpec::all(),
            terminals: vec![TerminalSpec::Const],
        }
    }
}

impl GpConfig {
    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of instances.
    pub fn with_num_instances(mut self, n: usize) -> Self {
        self.num_instances = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_num_generations(mut self, n: usize) -> Self {
        self.num_generations = n;
        self
    }

    /// Sets the population size, normalized against the current max height.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = normalized_population(n, self.max_height);
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, n: usize) -> Self {
        self.tournament_size = n;
        self
    }

    /// Sets the maximum tree height and renormalizes the population size.
    pub fn with_max_height(mut self, h: usize) -> Self {
        self.max_height = h;
        self.population_size = normalized_population(self.population_size, h);
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_prob(mut self, p: f64) -> Self {
        self.crossover_prob = p;
        self
    }

    /// Enables or disables elitism.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Enables or disables per-generation test evaluation.
    pub fn with_always_test(mut self, always_test: bool) -> Self {
        self.always_test = always_test;
        self
    }

    /// Sets the function set.
    pub fn with_functions(mut self, functions: Vec<FunctionSpec>) -> Self {
        self.functions = functions;
        self
    }

    /// Sets the terminal set.
    pub fn with_terminals(mut self, terminals: Vec<TerminalSpec>) -> Self {
        self.terminals = terminals;
        self
    }

    /// Sets the terminal set for a dataset with `n` input variables:
    /// a random constant plus one variable reference per slot.
    pub fn with_variables(mut self, n: usize) -> Self {
        self.terminals = TerminalSpec::for_variables(n);
        self
    }

    /// Validates the configuration, rejecting it before the first
    /// generation runs.
    pub fn validate(&self) -> Result<()> {
        if self.max_height < 2 {
            return Err(Error::InvalidConfig("max_height must be at least 2".into()));
        }
        if !(0.0..1.0).contains(&self.crossover_prob) {
            return Err(Error::InvalidConfig(format!(
                "crossover_prob must lie in [0, 1), got {}",
                self.crossover_prob
            )));
        }
        if self.tournament_size == 0 {
            return Err(Error::InvalidConfig(
                "tournament_size must be at least 1".into(),
            ));
        }
        if self.num_generations == 0 {
            return Err(Error::InvalidConfig(
                "num_generations must be at least 1".into(),
            ));
        }
        if self.num_instances == 0 {
            return Err(Error::InvalidConfig(
                "num_instances must be at least 1".into(),
            ));
        }
        if self.functions.is_empty() {
            return Err(Error::InvalidConfig("function set is empty".into()));
        }
        if self.terminals.is_empty() {
            return Err(Error::InvalidConfig("terminal set is empty".into()));
        }
        Ok(())
    }
}

/// Rounds a requested population size up so ramped half-and-half can split
/// it across heights `2..=max_height`.
fn normalized_population(requested: usize, max_height: usize) -> usize {
    let bucket = max_height.saturating_sub(1).max(1);
    let mut size = requested.max(bucket);
    let remainder = size % bucket;
    if remainder != 0 {
        size += bucket - remainder;
    }
    while size % 2 != 0 {
        size += bucket;
    }
    size
}
