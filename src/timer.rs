//! Cycle-granular timing with overhead cancellation.
//!
//! On x86_64 the counter is the invariant TSC; elsewhere a monotonic-clock
//! nanosecond fallback stands in. Calibration samples the counter
//! back-to-back and keeps the minimum delta as the irreducible cost of
//! reading the counter itself; that baseline is subtracted from every
//! corrected measurement, flooring at zero.
//!
//! Measured closures must stay short and side-effect-local. The fences
//! around each sample keep the compiler and CPU from hoisting work across
//! the counter reads.

use std::sync::atomic::{Ordering, fence};

const OVERHEAD_SAMPLES: u32 = 64;

/// Read the free-running cycle counter.
#[cfg(target_arch = "x86_64")]
pub fn read_cycles() -> u64 {
    // SAFETY: RDTSC reads the time-stamp counter and has no memory effects.
    unsafe { std::arch::x86_64::_rdtsc() }
}

/// Read the free-running cycle counter.
///
/// Non-x86 fallback: nanoseconds since the first read. Coarser than a real
/// cycle counter, but the overhead calibration absorbs the difference.
#[cfg(not(target_arch = "x86_64"))]
pub fn read_cycles() -> u64 {
    static EPOCH: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
    let epoch = EPOCH.get_or_init(std::time::Instant::now);
    epoch.elapsed().as_nanos() as u64
}

/// Cycle timer with a self-calibrated measurement baseline.
#[derive(Debug, Clone, Copy)]
pub struct CycleTimer {
    overhead: u64,
}

impl CycleTimer {
    /// Sample the counter twice back-to-back, keeping the minimum observed
    /// delta across [`OVERHEAD_SAMPLES`] rounds.
    pub fn calibrate() -> Self {
        let mut min_delta = u64::MAX;
        for _ in 0..OVERHEAD_SAMPLES {
            fence(Ordering::SeqCst);
            let start = read_cycles();
            let end = read_cycles();
            let delta = end.wrapping_sub(start);
            if delta < min_delta {
                min_delta = delta;
            }
        }
        CycleTimer {
            overhead: if min_delta == u64::MAX { 0 } else { min_delta },
        }
    }

    pub fn overhead(&self) -> u64 {
        self.overhead
    }

    /// Invoke `f` between two counter reads and return the raw delta,
    /// overhead included.
    pub fn measure<F: FnOnce()>(&self, f: F) -> u64 {
        fence(Ordering::SeqCst);
        let start = read_cycles();
        f();
        fence(Ordering::SeqCst);
        let end = read_cycles();
        end.wrapping_sub(start)
    }

    /// Strip the calibrated overhead from a raw delta. Never negative.
    pub fn corrected(&self, raw: u64) -> u64 {
        raw.saturating_sub(self.overhead)
    }
}
