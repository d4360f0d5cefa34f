//! Benchmark configuration.
//!
//! The defaults are the canonical benchmark matrix; a TOML file can override
//! individual fields. The schema of the emitted report is fixed regardless.

use std::path::Path;

use serde::Deserialize;

use crate::backend::{MatBackend, Operation};
use crate::{BenchError, BenchResult};

/// Immutable run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Ordered multiply dimensions.
    pub mul_sizes: Vec<usize>,
    /// Ordered invert dimensions. Must stay within both backends' declared
    /// invert sets; anything else is rejected up front, not at run time.
    pub inv_sizes: Vec<usize>,
    /// Untimed priming iterations per (operation, size).
    pub warmup: u32,
    /// Timed trials per (operation, size).
    pub repeat: u32,
    /// Frobenius-error acceptance threshold for cross-backend agreement.
    pub err_threshold: f32,
    /// Generator seed. Fixed by default for run-to-run reproducibility.
    pub seed: u32,
    /// Largest dimension the matrix arena is sized for.
    pub max_n: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            mul_sizes: vec![3, 4, 6, 8, 10, 16, 32, 64],
            inv_sizes: vec![3, 4, 6, 8, 10],
            warmup: 1,
            repeat: 100,
            err_threshold: 1e-4,
            seed: 0x1234_5678,
            max_n: 64,
        }
    }
}

impl BenchConfig {
    /// Load overrides from a TOML file on top of the defaults.
    pub fn load(path: &Path) -> BenchResult<BenchConfig> {
        let s = std::fs::read_to_string(path)?;
        toml::from_str(&s).map_err(|e| BenchError::Config(e.to_string()))
    }

    /// Reject configurations the engine could not honor: oversized
    /// dimensions, zero repeats, or invert sizes outside what both backends
    /// declare. Unsupported sizes are a configuration error by contract and
    /// must never reach a trial.
    pub fn validate(&self, a: &dyn MatBackend, b: &dyn MatBackend) -> BenchResult<()> {
        if self.repeat == 0 {
            return Err(BenchError::Config("repeat must be at least 1".into()));
        }
        if self.max_n == 0 {
            return Err(BenchError::Config("max_n must be at least 1".into()));
        }
        for &n in self.mul_sizes.iter().chain(&self.inv_sizes) {
            if n == 0 || n > self.max_n {
                return Err(BenchError::Config(format!(
                    "size {n} is outside 1..={}",
                    self.max_n
                )));
            }
        }
        for &n in &self.inv_sizes {
            for backend in [a, b] {
                if !backend.supports(Operation::Invert, n) {
                    return Err(BenchError::Config(format!(
                        "backend {} does not support invert at size {n}",
                        backend.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total report lines a run will emit (excluding header and marker).
    pub fn total_lines(&self) -> usize {
        self.mul_sizes.len() + self.inv_sizes.len()
    }
}
