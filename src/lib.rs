pub mod backend;
pub mod core;
pub mod progress;
pub mod report;
pub mod rng;
pub mod runner;
pub mod timer;
pub mod trial;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("{0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type BenchResult<T> = Result<T, BenchError>;

/// Label emitted in the last CSV field. A debug build additionally gets a
/// warning line ahead of the header, since its cycle counts carry no weight.
pub fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "Debug"
    } else {
        "Release"
    }
}

// Re-export the types a caller needs to drive a run.
pub use crate::backend::{DspBackend, LinalgBackend, MatBackend, MatError, Operation};
pub use crate::core::config::BenchConfig;
pub use crate::progress::{ProgressOp, ProgressSnapshot, ProgressState};
pub use crate::runner::BenchRunner;
