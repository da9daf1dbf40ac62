//! Versioned binary result records.
//!
//! Both drivers write their results as a small envelope (4-byte magic,
//! format version, record kind, and a crc32 checksum) followed by a
//! JSON-serialized payload. The envelope makes files self-describing and
//! corruption-evident; the payload keeps the logical fields (per-generation
//! and per-iteration statistics plus the resolved parameter set) in a
//! well-defined serialization.

use crate::aco::AcoRunResult;
use crate::error::{Error, Result};
use crate::gp::{GpConfig, GpRunResult, Statistics};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MAGIC: &[u8; 4] = b"EVO\0";
const VERSION: u32 = 1;

/// Which core produced a record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Gp = 1,
    Aco = 2,
}

/// Mean and population standard deviation of one quantity across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanStddev {
    pub mean: f64,
    pub stddev: f64,
}

fn mean_stddev(values: impl Iterator<Item = f64> + Clone) -> MeanStddev {
    let count = values.clone().count() as f64;
    let mean = values.clone().sum::<f64>() / count;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    MeanStddev {
        mean,
        stddev: variance.sqrt(),
    }
}

// ============================================================================
// GP records
// ============================================================================

/// The resolved GP parameter set, as run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpParamsRecord {
    pub seed: u64,
    pub num_instances: usize,
    pub num_generations: usize,
    pub population_size: usize,
    pub tournament_size: usize,
    pub max_height: usize,
    pub crossover_prob: f64,
    pub elitism: bool,
    pub always_test: bool,
}

impl From<&GpConfig> for GpParamsRecord {
    fn from(config: &GpConfig) -> Self {
        Self {
            seed: config.seed,
            num_instances: config.num_instances,
            num_generations: config.num_generations,
            population_size: config.population_size,
            tournament_size: config.tournament_size,
            max_height: config.max_height,
            crossover_prob: config.crossover_prob,
            elitism: config.elitism,
            always_test: config.always_test,
        }
    }
}

/// One generation aggregated across instances. Improvement counts use a
/// `-1` sentinel where a generation carries no provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationAggregate {
    pub best_fitness: MeanStddev,
    pub best_size: MeanStddev,
    pub worst_fitness: MeanStddev,
    pub worst_size: MeanStddev,
    pub avg_fitness: MeanStddev,
    pub avg_size: MeanStddev,
    pub num_repeated: MeanStddev,
    pub num_cross_better: MeanStddev,
    pub num_cross_worse: MeanStddev,
    pub num_mut_better: MeanStddev,
    pub num_mut_worse: MeanStddev,
    /// Printed expression of the best individual across instances.
    pub best_expr: String,
    pub best_expr_fitness: f64,
    pub best_expr_size: usize,
}

impl GenerationAggregate {
    fn new(all_stats: &[Vec<Statistics>], generation: usize) -> Self {
        let aggregate = |accessor: fn(&Statistics) -> f64| -> MeanStddev {
            mean_stddev(all_stats.iter().map(move |stats| accessor(&stats[generation])))
        };

        let is_better =
            |a: f64, b: f64| !a.is_nan() && (b.is_nan() || a < b);
        let mut best_instance = 0;
        for i in 1..all_stats.len() {
            if is_better(
                all_stats[i][generation].best_fitness,
                all_stats[best_instance][generation].best_fitness,
            ) {
                best_instance = i;
            }
        }
        let overall_best = &all_stats[best_instance][generation];

        Self {
            best_fitness: aggregate(|s| s.best_fitness),
            best_size: aggregate(|s| s.best_size as f64),
            worst_fitness: aggregate(|s| s.worst_fitness),
            worst_size: aggregate(|s| s.worst_size as f64),
            avg_fitness: aggregate(|s| s.avg_fitness),
            avg_size: aggregate(|s| s.avg_size),
            num_repeated: aggregate(|s| s.num_repeated as f64),
            num_cross_better: aggregate(|s| {
                s.crossover.map_or(-1.0, |c| c.num_better as f64)
            }),
            num_cross_worse: aggregate(|s| {
                s.crossover.map_or(-1.0, |c| c.num_worse as f64)
            }),
            num_mut_better: aggregate(|s| s.mutation.map_or(-1.0, |m| m.num_better as f64)),
            num_mut_worse: aggregate(|s| s.mutation.map_or(-1.0, |m| m.num_worse as f64)),
            best_expr: overall_best.best_expr.clone(),
            best_expr_fitness: overall_best.best_fitness,
            best_expr_size: overall_best.best_size,
        }
    }

    fn all(all_stats: &[Vec<Statistics>]) -> Vec<Self> {
        (0..all_stats[0].len())
            .map(|generation| Self::new(all_stats, generation))
            .collect()
    }
}

/// Full GP experiment record: resolved parameters plus train and test
/// statistics aggregated per generation, and the final-generation summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpReport {
    pub params: GpParamsRecord,
    pub train: Vec<GenerationAggregate>,
    pub test: Vec<GenerationAggregate>,
    pub final_stats: GenerationAggregate,
}

impl GpReport {
    /// Aggregates a run into its report.
    pub fn new(config: &GpConfig, result: &GpRunResult) -> Self {
        let test = GenerationAggregate::all(&result.test);
        let final_stats = test.last().expect("at least the final test entry").clone();
        Self {
            params: GpParamsRecord::from(config),
            train: GenerationAggregate::all(&result.train),
            test,
            final_stats,
        }
    }

    /// Writes the report through the binary envelope.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_record(path, RecordKind::Gp, self)
    }

    /// Reads a report back, verifying magic, version, kind, and checksum.
    pub fn load(path: &Path) -> Result<Self> {
        read_record(path, RecordKind::Gp)
    }
}

// ============================================================================
// ACO records
// ============================================================================

/// The resolved ACO parameter set, as run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoParamsRecord {
    pub seed: u64,
    pub num_executions: usize,
    pub num_iterations: usize,
    /// `-1` when the ant count was resolved per instance as `n - p`.
    pub num_ants: i64,
    pub decay: f64,
}

/// One iteration's objectives across all executions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationAggregate {
    pub global_bests: Vec<f64>,
    pub local_bests: Vec<f64>,
    pub local_worsts: Vec<f64>,
}

/// Full ACO experiment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoReport {
    pub params: AcoParamsRecord,
    pub iterations: Vec<IterationAggregate>,
}

impl AcoReport {
    /// Collects per-iteration objective vectors across executions.
    pub fn new(params: AcoParamsRecord, results: &[AcoRunResult]) -> Self {
        let num_iterations = params.num_iterations;
        let iterations = (0..num_iterations)
            .map(|i| IterationAggregate {
                global_bests: results.iter().map(|r| r.iterations[i].global_best).collect(),
                local_bests: results.iter().map(|r| r.iterations[i].local_best).collect(),
                local_worsts: results.iter().map(|r| r.iterations[i].local_worst).collect(),
            })
            .collect();
        Self { params, iterations }
    }

    /// Mean final global best across executions.
    pub fn mean_final_global_best(&self) -> f64 {
        let last = self.iterations.last().expect("at least one iteration");
        last.global_bests.iter().sum::<f64>() / last.global_bests.len() as f64
    }

    /// Writes the report through the binary envelope.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_record(path, RecordKind::Aco, self)
    }

    /// Reads a report back, verifying magic, version, kind, and checksum.
    pub fn load(path: &Path) -> Result<Self> {
        read_record(path, RecordKind::Aco)
    }
}

// ============================================================================
// Envelope
// ============================================================================

fn write_record<T: Serialize>(path: &Path, kind: RecordKind, payload: &T) -> Result<()> {
    let body = serde_json::to_vec(payload)
        .map_err(|e| Error::InvalidRecord(format!("payload serialization failed: {e}")))?;

    let mut data = Vec::with_capacity(16 + body.len());
    data.extend_from_slice(MAGIC);
    data.extend_from_slice(&VERSION.to_le_bytes());
    data.extend_from_slice(&(kind as u32).to_le_bytes());
    data.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
    data.extend_from_slice(&body);

    fs::write(path, data).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn read_record<T: DeserializeOwned>(path: &Path, kind: RecordKind) -> Result<T> {
    let data = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if data.len() < 16 {
        return Err(Error::InvalidRecord("file too small".into()));
    }
    if &data[0..4] != MAGIC {
        return Err(Error::InvalidRecord("bad magic".into()));
    }

    let version = u32::from_le_bytes(data[4..8].try_into().expect("4 bytes"));
    if version != VERSION {
        return Err(Error::InvalidRecord(format!(
            "unsupported version {version}, expected {VERSION}"
        )));
    }
    let stored_kind = u32::from_le_bytes(data[8..12].try_into().expect("4 bytes"));
    if stored_kind != kind as u32 {
        return Err(Error::InvalidRecord(format!(
            "record kind {stored_kind} does not match expected {}",
            kind as u32
        )));
    }

    let stored = u32::from_le_bytes(data[12..16].try_into().expect("4 bytes"));
    let body = &data[16..];
    let computed = crc32fast::hash(body);
    if stored != computed {
        return Err(Error::ChecksumMismatch { stored, computed });
    }

    serde_json::from_slice(body)
        .map_err(|e| Error::InvalidRecord(format!("payload deserialization failed: {e}")))
}
