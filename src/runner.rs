//! Run orchestration.
//!
//! # Architecture
//!
//! The runner is the only component with cross-cutting state: the RNG, the
//! matrix arena, and the published progress counters. Data flows one way
//! through it — generator into the backend adapters under the cycle timer,
//! trial executor validating and aggregating, formatter rendering, sink
//! receiving bytes. A run is single-shot and proceeds to completion; calling
//! [`BenchRunner::run`] again starts an independent, fully reset report.
//!
//! Sink failures are telemetry loss, not errors: a write that fails is
//! dropped and the run keeps going.

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::{DspBackend, LinalgBackend, Operation};
use crate::core::config::BenchConfig;
use crate::core::env::EnvironmentInfo;
use crate::progress::{ProgressOp, ProgressState};
use crate::report::{CSV_HEADER, DEBUG_BUILD_WARNING, DONE_MARKER, LineBuffer, format_line};
use crate::rng::Lcg32;
use crate::timer::CycleTimer;
use crate::trial::{MatrixArena, run_trials};
use crate::{BenchResult, build_mode};

/// Orchestrator for the measurement pipeline.
pub struct BenchRunner {
    config: BenchConfig,
    progress: Arc<ProgressState>,
    backend_a: LinalgBackend,
    backend_b: DspBackend,
    arena: MatrixArena,
}

impl BenchRunner {
    /// Build a runner, rejecting configurations the backends cannot honor.
    pub fn new(config: BenchConfig) -> BenchResult<Self> {
        let backend_a = LinalgBackend;
        let backend_b = DspBackend;
        config.validate(&backend_a, &backend_b)?;
        let arena = MatrixArena::new(config.max_n);
        Ok(BenchRunner {
            config,
            progress: Arc::new(ProgressState::new()),
            backend_a,
            backend_b,
            arena,
        })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Shared handle to the progress counters, for external observers.
    pub fn progress(&self) -> Arc<ProgressState> {
        Arc::clone(&self.progress)
    }

    /// Execute one complete report run into `sink`.
    pub fn run<W: Write>(&mut self, sink: &mut W) {
        self.progress.reset();

        let timer = CycleTimer::calibrate();
        let mut rng = Lcg32::new(self.config.seed);
        let build_mode = build_mode();

        let env = EnvironmentInfo::detect();
        info!(
            cpu = env.cpu_model.as_deref().unwrap_or("unknown"),
            cores = env.cpu_cores_logical.unwrap_or(0),
            os = env.os.as_deref().unwrap_or("unknown"),
            overhead_cycles = timer.overhead(),
            build_mode,
            seed = self.config.seed,
            "starting benchmark run"
        );

        if build_mode == "Debug" {
            emit(sink, DEBUG_BUILD_WARNING.as_bytes());
        }
        emit(sink, CSV_HEADER.as_bytes());

        let mut buf = LineBuffer::new();
        for op in [Operation::Multiply, Operation::Invert] {
            let (sizes, progress_op) = match op {
                Operation::Multiply => (&self.config.mul_sizes, ProgressOp::Multiply),
                Operation::Invert => (&self.config.inv_sizes, ProgressOp::Invert),
            };
            for &n in sizes {
                self.progress.set_active(progress_op, n as u32);
                let agg = run_trials(
                    op,
                    n,
                    &self.config,
                    &timer,
                    &mut rng,
                    &mut self.arena,
                    &self.backend_a,
                    &self.backend_b,
                );
                info!(
                    op = op.label(),
                    n,
                    valid = agg.valid,
                    invalid = agg.invalid,
                    avg_a = agg.avg_a(),
                    avg_b = agg.avg_b(),
                    "line complete"
                );
                format_line(&mut buf, op, n, &agg, &self.config, build_mode);
                emit(sink, buf.as_bytes());
                self.progress.finish_line();
            }
        }

        self.progress.set_done();
        emit(sink, DONE_MARKER.as_bytes());
        if let Err(e) = sink.flush() {
            debug!(error = %e, "report sink flush dropped");
        }
    }
}

fn emit<W: Write>(sink: &mut W, bytes: &[u8]) {
    if let Err(e) = sink.write_all(bytes) {
        debug!(error = %e, "report sink write dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_rejects_invalid_config() {
        let config = BenchConfig {
            inv_sizes: vec![5],
            ..BenchConfig::default()
        };
        assert!(BenchRunner::new(config).is_err());
    }

    #[test]
    fn progress_handle_outlives_borrows() {
        let runner = BenchRunner::new(BenchConfig::default()).unwrap();
        let progress = runner.progress();
        drop(runner);
        assert!(!progress.snapshot().done);
    }
}
