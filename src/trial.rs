//! Trial execution: warmup, timed repeats, validation, aggregation.
//!
//! One call to [`run_trials`] covers a single (operation, size) pair. Every
//! timed iteration generates fresh inputs, times each backend independently,
//! and then runs the validity oracle: backend status, result finiteness, and
//! cross-backend Frobenius agreement. Anything short of full agreement is an
//! invalid trial, counted and never retried.

use tracing::debug;

use crate::backend::{MatBackend, Operation, frobenius_error, is_finite};
use crate::core::config::BenchConfig;
use crate::rng::Lcg32;
use crate::timer::CycleTimer;

/// Matrix buffers reused across all trials, sized once to `max_n`².
///
/// `a` and `b` hold inputs, `work` the scratch copy for destructive
/// inversion, and `out_a`/`out_b` one result per backend. Only one trial's
/// data occupies them at a time.
pub struct MatrixArena {
    pub a: Vec<f32>,
    pub b: Vec<f32>,
    pub work: Vec<f32>,
    pub out_a: Vec<f32>,
    pub out_b: Vec<f32>,
}

impl MatrixArena {
    pub fn new(max_n: usize) -> Self {
        let cap = max_n * max_n;
        MatrixArena {
            a: vec![0.0; cap],
            b: vec![0.0; cap],
            work: vec![0.0; cap],
            out_a: vec![0.0; cap],
            out_b: vec![0.0; cap],
        }
    }
}

/// Accumulated statistics for all trials of one (operation, size) pair.
///
/// Cycle sums are u64 so hundreds of trials cannot overflow or lose
/// precision; the error sum stays in f64.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrialAggregate {
    pub cycles_a: u64,
    pub cycles_b: u64,
    pub error_sum: f64,
    pub valid: u32,
    pub invalid: u32,
}

impl TrialAggregate {
    pub fn avg_a(&self) -> f64 {
        if self.valid > 0 {
            self.cycles_a as f64 / f64::from(self.valid)
        } else {
            0.0
        }
    }

    pub fn avg_b(&self) -> f64 {
        if self.valid > 0 {
            self.cycles_b as f64 / f64::from(self.valid)
        } else {
            0.0
        }
    }

    /// B over A, or 0 when A's average is 0.
    pub fn ratio(&self) -> f64 {
        let a = self.avg_a();
        if a > 0.0 { self.avg_b() / a } else { 0.0 }
    }

    pub fn mean_error(&self) -> f64 {
        if self.valid > 0 {
            self.error_sum / f64::from(self.valid)
        } else {
            0.0
        }
    }
}

/// Run warmup plus the configured timed trials for one (operation, size)
/// pair and fold the outcomes into an aggregate.
pub fn run_trials(
    op: Operation,
    n: usize,
    config: &BenchConfig,
    timer: &CycleTimer,
    rng: &mut Lcg32,
    arena: &mut MatrixArena,
    backend_a: &dyn MatBackend,
    backend_b: &dyn MatBackend,
) -> TrialAggregate {
    let mut agg = TrialAggregate::default();

    for _ in 0..config.warmup {
        generate_inputs(op, n, rng, arena);
        match op {
            Operation::Multiply => {
                let _ = backend_a.multiply(n, &arena.a, &arena.b, &mut arena.out_a);
                let _ = backend_b.multiply(n, &arena.a, &arena.b, &mut arena.out_b);
            }
            Operation::Invert => {
                let _ = backend_a.invert(n, &mut arena.a, &mut arena.out_a);
                let _ = backend_b.invert(n, &mut arena.work, &mut arena.out_b);
            }
        }
    }

    for trial in 0..config.repeat {
        generate_inputs(op, n, rng, arena);

        let mut status_a = Ok(());
        let mut status_b = Ok(());
        let (raw_a, raw_b) = match op {
            Operation::Multiply => {
                let raw_a = timer.measure(|| {
                    status_a = backend_a.multiply(n, &arena.a, &arena.b, &mut arena.out_a);
                });
                let raw_b = timer.measure(|| {
                    status_b = backend_b.multiply(n, &arena.a, &arena.b, &mut arena.out_b);
                });
                (raw_a, raw_b)
            }
            Operation::Invert => {
                // Backend A reads the pristine input; B gets the scratch
                // copy because it factors in place.
                let raw_a = timer.measure(|| {
                    status_a = backend_a.invert(n, &mut arena.a, &mut arena.out_a);
                });
                let raw_b = timer.measure(|| {
                    status_b = backend_b.invert(n, &mut arena.work, &mut arena.out_b);
                });
                (raw_a, raw_b)
            }
        };

        if let Err(e) = status_a {
            debug!(op = op.label(), n, trial, backend = backend_a.name(), %e, "trial invalid");
            agg.invalid += 1;
            continue;
        }
        if let Err(e) = status_b {
            debug!(op = op.label(), n, trial, backend = backend_b.name(), %e, "trial invalid");
            agg.invalid += 1;
            continue;
        }

        if !is_finite(n, &arena.out_a) || !is_finite(n, &arena.out_b) {
            debug!(op = op.label(), n, trial, "non-finite result");
            agg.invalid += 1;
            continue;
        }

        let error = frobenius_error(n, &arena.out_a, &arena.out_b);
        if error > config.err_threshold {
            debug!(
                op = op.label(),
                n,
                trial,
                error = f64::from(error),
                "cross-backend disagreement"
            );
            agg.invalid += 1;
            continue;
        }

        agg.valid += 1;
        agg.cycles_a += timer.corrected(raw_a);
        agg.cycles_b += timer.corrected(raw_b);
        agg.error_sum += f64::from(error);
    }

    // Fold any unrecorded shortfall into the invalid count so that
    // valid + invalid always equals the configured repeat count.
    let attempted = agg.valid + agg.invalid;
    if attempted < config.repeat {
        agg.invalid += config.repeat - attempted;
    }

    agg
}

fn generate_inputs(op: Operation, n: usize, rng: &mut Lcg32, arena: &mut MatrixArena) {
    match op {
        Operation::Multiply => {
            rng.fill(&mut arena.a, n);
            rng.fill(&mut arena.b, n);
        }
        Operation::Invert => {
            rng.fill_invertible(&mut arena.a, n);
            arena.work[..n * n].copy_from_slice(&arena.a[..n * n]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DspBackend, LinalgBackend, MatError};

    fn small_config(repeat: u32) -> BenchConfig {
        BenchConfig {
            mul_sizes: vec![3],
            inv_sizes: vec![3],
            warmup: 1,
            repeat,
            max_n: 8,
            ..BenchConfig::default()
        }
    }

    #[test]
    fn valid_plus_invalid_equals_repeat() {
        let config = small_config(25);
        let timer = CycleTimer::calibrate();
        let mut rng = Lcg32::new(config.seed);
        let mut arena = MatrixArena::new(config.max_n);

        for op in [Operation::Multiply, Operation::Invert] {
            let agg = run_trials(
                op,
                3,
                &config,
                &timer,
                &mut rng,
                &mut arena,
                &LinalgBackend,
                &DspBackend,
            );
            assert_eq!(agg.valid + agg.invalid, config.repeat);
        }
    }

    #[test]
    fn small_multiply_trials_all_validate() {
        let config = small_config(50);
        let timer = CycleTimer::calibrate();
        let mut rng = Lcg32::new(config.seed);
        let mut arena = MatrixArena::new(config.max_n);
        let agg = run_trials(
            Operation::Multiply,
            3,
            &config,
            &timer,
            &mut rng,
            &mut arena,
            &LinalgBackend,
            &DspBackend,
        );
        // 3x3 products of unit-range inputs agree far below the 1e-4 gate.
        assert_eq!(agg.valid, config.repeat);
        assert_eq!(agg.invalid, 0);
        assert!(agg.mean_error() < 1e-4);
    }

    #[test]
    fn diagonal_bias_keeps_small_inversions_valid() {
        let config = small_config(100);
        let timer = CycleTimer::calibrate();
        let mut rng = Lcg32::new(config.seed);
        let mut arena = MatrixArena::new(config.max_n);
        let agg = run_trials(
            Operation::Invert,
            3,
            &config,
            &timer,
            &mut rng,
            &mut arena,
            &LinalgBackend,
            &DspBackend,
        );
        assert_eq!(agg.valid + agg.invalid, 100);
        assert!(agg.invalid <= 5, "unexpected invert failures: {}", agg.invalid);
    }

    #[test]
    fn backend_failure_marks_every_trial_invalid() {
        struct AlwaysSingular;
        impl MatBackend for AlwaysSingular {
            fn name(&self) -> &'static str {
                "always-singular"
            }
            fn supports(&self, _op: Operation, _n: usize) -> bool {
                true
            }
            fn multiply(
                &self,
                _n: usize,
                _a: &[f32],
                _b: &[f32],
                _out: &mut [f32],
            ) -> Result<(), MatError> {
                Ok(())
            }
            fn invert(
                &self,
                _n: usize,
                _src: &mut [f32],
                _out: &mut [f32],
            ) -> Result<(), MatError> {
                Err(MatError::Singular)
            }
        }

        let config = small_config(10);
        let timer = CycleTimer::calibrate();
        let mut rng = Lcg32::new(1);
        let mut arena = MatrixArena::new(config.max_n);
        let agg = run_trials(
            Operation::Invert,
            3,
            &config,
            &timer,
            &mut rng,
            &mut arena,
            &AlwaysSingular,
            &DspBackend,
        );
        assert_eq!(agg.valid, 0);
        assert_eq!(agg.invalid, 10);
        assert_eq!(agg.avg_a(), 0.0);
        assert_eq!(agg.ratio(), 0.0);
        assert_eq!(agg.mean_error(), 0.0);
    }

    #[test]
    fn non_finite_results_are_invalid() {
        struct NanBackend;
        impl MatBackend for NanBackend {
            fn name(&self) -> &'static str {
                "nan"
            }
            fn supports(&self, _op: Operation, _n: usize) -> bool {
                true
            }
            fn multiply(
                &self,
                n: usize,
                _a: &[f32],
                _b: &[f32],
                out: &mut [f32],
            ) -> Result<(), MatError> {
                out[..n * n].fill(f32::NAN);
                Ok(())
            }
            fn invert(
                &self,
                n: usize,
                _src: &mut [f32],
                out: &mut [f32],
            ) -> Result<(), MatError> {
                out[..n * n].fill(f32::NAN);
                Ok(())
            }
        }

        let config = small_config(5);
        let timer = CycleTimer::calibrate();
        let mut rng = Lcg32::new(1);
        let mut arena = MatrixArena::new(config.max_n);
        let agg = run_trials(
            Operation::Multiply,
            3,
            &config,
            &timer,
            &mut rng,
            &mut arena,
            &NanBackend,
            &DspBackend,
        );
        assert_eq!(agg.valid, 0);
        assert_eq!(agg.invalid, 5);
    }

    #[test]
    fn zero_threshold_only_admits_bit_identical_results() {
        let config = BenchConfig {
            err_threshold: 0.0,
            ..small_config(20)
        };
        let timer = CycleTimer::calibrate();
        let mut rng = Lcg32::new(config.seed);
        let mut arena = MatrixArena::new(config.max_n);
        let agg = run_trials(
            Operation::Multiply,
            3,
            &config,
            &timer,
            &mut rng,
            &mut arena,
            &LinalgBackend,
            &DspBackend,
        );
        assert_eq!(agg.valid + agg.invalid, 20);
        // Every surviving trial contributed exactly zero error.
        assert_eq!(agg.error_sum, 0.0);
    }

    #[test]
    fn aggregate_averages_guard_division_by_zero() {
        let agg = TrialAggregate::default();
        assert_eq!(agg.avg_a(), 0.0);
        assert_eq!(agg.avg_b(), 0.0);
        assert_eq!(agg.ratio(), 0.0);
        assert_eq!(agg.mean_error(), 0.0);
    }
}
