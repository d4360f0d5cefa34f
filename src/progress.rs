//! Coarse-grained run progress, observable from outside the engine.
//!
//! Four plain counters written by the orchestrator and read by whoever
//! cares (a monitor thread, a debugger). Relaxed atomics only: the values
//! are advisory telemetry, never correctness-bearing, and readers must
//! tolerate stale combinations.

use std::sync::atomic::{AtomicU32, Ordering};

/// Numeric operation codes in the published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ProgressOp {
    Idle = 0,
    Multiply = 1,
    Invert = 2,
}

impl ProgressOp {
    fn from_u32(v: u32) -> ProgressOp {
        match v {
            1 => ProgressOp::Multiply,
            2 => ProgressOp::Invert,
            _ => ProgressOp::Idle,
        }
    }
}

/// A point-in-time copy of the progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub op: ProgressOp,
    pub size: u32,
    pub lines_completed: u32,
    pub done: bool,
}

/// Shared progress counters. Written only by the orchestrator.
#[derive(Debug, Default)]
pub struct ProgressState {
    op: AtomicU32,
    size: AtomicU32,
    lines_completed: AtomicU32,
    done: AtomicU32,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return everything to the idle state at the start of an invocation.
    pub fn reset(&self) {
        self.op.store(ProgressOp::Idle as u32, Ordering::Relaxed);
        self.size.store(0, Ordering::Relaxed);
        self.lines_completed.store(0, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
    }

    pub fn set_active(&self, op: ProgressOp, size: u32) {
        self.op.store(op as u32, Ordering::Relaxed);
        self.size.store(size, Ordering::Relaxed);
    }

    pub fn finish_line(&self) {
        self.lines_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_done(&self) {
        self.done.store(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            op: ProgressOp::from_u32(self.op.load(Ordering::Relaxed)),
            size: self.size.load(Ordering::Relaxed),
            lines_completed: self.lines_completed.load(Ordering::Relaxed),
            done: self.done.load(Ordering::Relaxed) != 0,
        }
    }
}
