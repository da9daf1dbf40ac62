//! ACO run configuration.

use crate::error::{Error, Result};

/// Configuration for the ant colony core.
///
/// # Builder
///
/// ```
/// use evopt::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_seed(7)
///     .with_num_iterations(100)
///     .with_decay(0.02);
/// assert_eq!(config.num_iterations, 100);
/// ```
#[derive(Debug, Clone)]
pub struct AcoConfig {
    /// Seed for the execution's generator.
    pub seed: u64,

    /// Number of iterations to run.
    pub num_iterations: usize,

    /// Ants (solution constructions) per iteration. `None` resolves to
    /// `n - p` for the instance being solved.
    pub num_ants: Option<usize>,

    /// Pheromone learning rate.
    pub decay: f64,

    /// Pheromone value every entry starts from, and the reset value after
    /// stagnation.
    pub initial_pheromone: f64,

    /// Lower clamp for pheromone entries.
    pub min_pheromone: f64,

    /// Upper clamp for pheromone entries.
    pub max_pheromone: f64,

    /// L1 distance from the theoretical saturation sum below which the
    /// pheromone vector is considered stagnated and reset.
    pub stagnation_threshold: f64,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_iterations: 50,
            num_ants: None,
            decay: 0.01,
            initial_pheromone: 0.5,
            min_pheromone: 0.001,
            max_pheromone: 0.999,
            stagnation_threshold: 0.5,
        }
    }
}

impl AcoConfig {
    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the iteration count.
    pub fn with_num_iterations(mut self, n: usize) -> Self {
        self.num_iterations = n;
        self
    }

    /// Sets the ant count; `None` resolves to `n - p` at run time.
    pub fn with_num_ants(mut self, n: Option<usize>) -> Self {
        self.num_ants = n;
        self
    }

    /// Sets the pheromone learning rate.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Sets the stagnation threshold.
    pub fn with_stagnation_threshold(mut self, threshold: f64) -> Self {
        self.stagnation_threshold = threshold;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_iterations == 0 {
            return Err(Error::InvalidConfig(
                "num_iterations must be at least 1".into(),
            ));
        }
        if self.num_ants == Some(0) {
            return Err(Error::InvalidConfig("num_ants must be at least 1".into()));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "decay must lie in (0, 1], got {}",
                self.decay
            )));
        }
        if !(self.min_pheromone > 0.0
            && self.min_pheromone < self.initial_pheromone
            && self.initial_pheromone < self.max_pheromone)
        {
            return Err(Error::InvalidConfig(format!(
                "pheromone bounds must satisfy 0 < min < initial < max, got {} / {} / {}",
                self.min_pheromone, self.initial_pheromone, self.max_pheromone
            )));
        }
        if self.stagnation_threshold < 0.0 {
            return Err(Error::InvalidConfig(
                "stagnation_threshold must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
