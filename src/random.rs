//! Seeded random source shared by both cores.
//!
//! Every stochastic decision in the crate (primitive selection, tournament
//! picks, crossover/mutation points, the crossover-vs-mutation coin flip,
//! ACO constant draws, roulette samples) flows through a single generator
//! created here and passed `&mut` down the call stack. There is no
//! process-wide source, and parallel fitness evaluation never draws.
//!
//! The seed maps to a ChaCha8 stream; numeric results for a given seed are
//! stable within this crate but are not expected to be bit-identical to any
//! other implementation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Creates the deterministic generator for a run.
pub fn create_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Resolves a CLI seed argument: negative means "pick one at random".
///
/// The resolved seed should be logged so the run can be reproduced.
pub fn resolve_seed(seed: i64) -> u64 {
    if seed < 0 {
        u64::from(rand::random::<u32>())
    } else {
        seed as u64
    }
}
