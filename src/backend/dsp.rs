//! Backend B: DSP-style row-major f32 kernels.
//!
//! These mirror the kernels a fixed-point/float DSP library ships: a plain
//! multiply-accumulate product and an in-place Gauss-Jordan inversion with
//! row pivoting that destroys its input. Keeping them in single precision
//! end-to-end is the point; the cross-backend oracle compares their results
//! against the general linear-algebra backend.

use super::traits::{MatBackend, MatError, Operation};

/// DSP-style implementation of [`MatBackend`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DspBackend;

fn mat_mult(n: usize, a: &[f32], b: &[f32], out: &mut [f32]) {
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0f32;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            out[i * n + j] = sum;
        }
    }
}

/// Gauss-Jordan elimination, `src` reduced to the identity while `out`
/// accumulates the inverse. Pivot search takes the first non-zero entry at
/// or below the diagonal; no entry means singular.
fn mat_inverse(n: usize, src: &mut [f32], out: &mut [f32]) -> Result<(), MatError> {
    out[..n * n].fill(0.0);
    for i in 0..n {
        out[i * n + i] = 1.0;
    }

    for col in 0..n {
        let mut pivot_row = col;
        while pivot_row < n && src[pivot_row * n + col] == 0.0 {
            pivot_row += 1;
        }
        if pivot_row == n {
            return Err(MatError::Singular);
        }
        if pivot_row != col {
            for k in 0..n {
                src.swap(col * n + k, pivot_row * n + k);
                out.swap(col * n + k, pivot_row * n + k);
            }
        }

        let inv_pivot = 1.0 / src[col * n + col];
        for k in 0..n {
            src[col * n + k] *= inv_pivot;
            out[col * n + k] *= inv_pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = src[row * n + col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                src[row * n + k] -= factor * src[col * n + k];
                out[row * n + k] -= factor * out[col * n + k];
            }
        }
    }
    Ok(())
}

impl MatBackend for DspBackend {
    fn name(&self) -> &'static str {
        "dsp"
    }

    fn supports(&self, op: Operation, n: usize) -> bool {
        match op {
            Operation::Multiply => n > 0,
            Operation::Invert => matches!(n, 3 | 4 | 6 | 8 | 10),
        }
    }

    fn multiply(&self, n: usize, a: &[f32], b: &[f32], out: &mut [f32]) -> Result<(), MatError> {
        mat_mult(n, a, b, out);
        Ok(())
    }

    fn invert(&self, n: usize, src: &mut [f32], out: &mut [f32]) -> Result<(), MatError> {
        if !self.supports(Operation::Invert, n) {
            return Err(MatError::UnsupportedSize(n));
        }
        mat_inverse(n, src, out)
    }
}
