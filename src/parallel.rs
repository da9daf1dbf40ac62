//! Fixed-size worker pool for embarrassingly parallel index ranges.
//!
//! [`EvalPool`] wraps a rayon thread pool with an explicit worker count and
//! exposes the two shapes the cores need: fire-and-forget dispatch over an
//! index range, and an order-preserving map into a result vector. Only one
//! call is active at a time per pool; the caller blocks until every index
//! has been processed, and workers idle between calls. Dropping the pool
//! joins the workers.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Worker pool driving parallel evaluation of `[begin, end)` index ranges.
pub struct EvalPool {
    pool: ThreadPool,
}

impl EvalPool {
    /// Creates a pool sized to the hardware parallelism.
    pub fn new() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_workers(workers)
    }

    /// Creates a pool with exactly `workers` threads.
    pub fn with_workers(workers: usize) -> Self {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()
            .expect("failed to build worker pool");
        Self { pool }
    }

    /// Number of worker threads in the pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Invokes `task(i)` for every `i` in `[begin, end)`, blocking until all
    /// indices have completed.
    pub fn run<F>(&self, begin: usize, end: usize, task: F)
    where
        F: Fn(usize) + Sync,
    {
        self.pool
            .install(|| (begin..end).into_par_iter().for_each(|i| task(i)));
    }

    /// Maps `task` over `[begin, end)` and returns the results in index
    /// order, regardless of which worker produced each one.
    pub fn map<T, F>(&self, begin: usize, end: usize, task: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        self.pool
            .install(|| (begin..end).into_par_iter().map(|i| task(i)).collect())
    }
}

impl Default for EvalPool {
    fn default() -> Self {
        Self::new()
    }
}
