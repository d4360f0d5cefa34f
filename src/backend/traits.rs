//! Backend trait and status types for the unified backend abstraction.

use thiserror::Error;

/// The two benchmarked operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Multiply,
    Invert,
}

impl Operation {
    /// CSV label. Part of the external report contract.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Multiply => "mul",
            Operation::Invert => "inv",
        }
    }
}

/// Non-success status from a backend kernel.
///
/// `Singular` is a numerical failure the trial loop expects and counts;
/// `UnsupportedSize` is a caller configuration error that config validation
/// is supposed to rule out before a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatError {
    #[error("matrix is singular")]
    Singular,
    #[error("size {0} is not supported for this operation")]
    UnsupportedSize(usize),
}

/// One of the two interchangeable numeric implementations being compared.
///
/// All matrices are row-major `f32` slices of at least `n * n` elements.
/// `invert` takes its source mutably because DSP-style kernels factor in
/// place; callers that need the input afterwards must pass a scratch copy.
pub trait MatBackend {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Whether this backend can run `op` at dimension `n`.
    fn supports(&self, op: Operation, n: usize) -> bool;

    /// `out = a * b`, both `n`×`n`.
    fn multiply(&self, n: usize, a: &[f32], b: &[f32], out: &mut [f32]) -> Result<(), MatError>;

    /// `out = src⁻¹`. `src` may be destroyed.
    fn invert(&self, n: usize, src: &mut [f32], out: &mut [f32]) -> Result<(), MatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_labels() {
        assert_eq!(Operation::Multiply.label(), "mul");
        assert_eq!(Operation::Invert.label(), "inv");
    }

    #[test]
    fn error_display() {
        assert_eq!(MatError::Singular.to_string(), "matrix is singular");
        assert_eq!(
            MatError::UnsupportedSize(7).to_string(),
            "size 7 is not supported for this operation"
        );
    }
}
