//! Error taxonomy shared by both cores.
//!
//! Everything user-visible funnels through [`Error`]: dataset parse failures
//! are fatal at load time, configuration is rejected before the first
//! generation, and an infeasible GAP assignment surfaces as an error value
//! that the ACO loop converts into an infinite-cost solution.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All error conditions the library can report.
#[derive(Error, Debug)]
pub enum Error {
    /// Failure to read an input file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed dataset content, with file and 1-based line context.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A configuration parameter failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// GAP assignment could not place a client on any median.
    #[error("no median can absorb client {client} (demand {demand})")]
    InfeasibleAssignment { client: usize, demand: f64 },

    /// A result file failed structural validation on load.
    #[error("invalid result file: {0}")]
    InvalidRecord(String),

    /// A result file's payload checksum did not match.
    #[error("result checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// Failure to write an output file.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
