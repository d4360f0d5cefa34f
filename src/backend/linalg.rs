//! Backend A: general linear algebra via nalgebra.
//!
//! Sizes in the declared fixed set go through statically-dimensioned
//! `SMatrix` kernels so nalgebra can unroll them; anything else falls back
//! to one dynamically-dimensioned multiply path. Inversion is only offered
//! for the declared set, matching the benchmark configuration.

use nalgebra::{DMatrix, SMatrix};

use super::traits::{MatBackend, MatError, Operation};

/// Size -> kernel variant, resolved by a single match instead of
/// re-branching over every supported dimension at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MulKernel {
    Fixed3,
    Fixed4,
    Fixed6,
    Fixed8,
    Fixed10,
    Fixed16,
    Fixed32,
    Dynamic,
}

impl MulKernel {
    fn for_size(n: usize) -> MulKernel {
        match n {
            3 => MulKernel::Fixed3,
            4 => MulKernel::Fixed4,
            6 => MulKernel::Fixed6,
            8 => MulKernel::Fixed8,
            10 => MulKernel::Fixed10,
            16 => MulKernel::Fixed16,
            32 => MulKernel::Fixed32,
            _ => MulKernel::Dynamic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvKernel {
    Fixed3,
    Fixed4,
    Fixed6,
    Fixed8,
    Fixed10,
}

impl InvKernel {
    fn for_size(n: usize) -> Option<InvKernel> {
        match n {
            3 => Some(InvKernel::Fixed3),
            4 => Some(InvKernel::Fixed4),
            6 => Some(InvKernel::Fixed6),
            8 => Some(InvKernel::Fixed8),
            10 => Some(InvKernel::Fixed10),
            _ => None,
        }
    }
}

macro_rules! mul_fixed {
    ($n:literal, $a:expr, $b:expr, $out:expr) => {{
        let ma = SMatrix::<f32, $n, $n>::from_row_slice(&$a[..$n * $n]);
        let mb = SMatrix::<f32, $n, $n>::from_row_slice(&$b[..$n * $n]);
        let mc = ma * mb;
        for i in 0..$n {
            for j in 0..$n {
                $out[i * $n + j] = mc[(i, j)];
            }
        }
    }};
}

macro_rules! inv_fixed {
    ($n:literal, $src:expr, $out:expr) => {{
        let m = SMatrix::<f32, $n, $n>::from_row_slice(&$src[..$n * $n]);
        match m.try_inverse() {
            Some(inv) => {
                for i in 0..$n {
                    for j in 0..$n {
                        $out[i * $n + j] = inv[(i, j)];
                    }
                }
                Ok(())
            }
            None => Err(MatError::Singular),
        }
    }};
}

fn mul_dynamic(n: usize, a: &[f32], b: &[f32], out: &mut [f32]) {
    let ma = DMatrix::<f32>::from_row_slice(n, n, &a[..n * n]);
    let mb = DMatrix::<f32>::from_row_slice(n, n, &b[..n * n]);
    let mc = &ma * &mb;
    for i in 0..n {
        for j in 0..n {
            out[i * n + j] = mc[(i, j)];
        }
    }
}

/// nalgebra-backed implementation of [`MatBackend`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LinalgBackend;

impl MatBackend for LinalgBackend {
    fn name(&self) -> &'static str {
        "linalg"
    }

    fn supports(&self, op: Operation, n: usize) -> bool {
        match op {
            // The dynamic fallback covers every dimension.
            Operation::Multiply => n > 0,
            Operation::Invert => InvKernel::for_size(n).is_some(),
        }
    }

    fn multiply(&self, n: usize, a: &[f32], b: &[f32], out: &mut [f32]) -> Result<(), MatError> {
        match MulKernel::for_size(n) {
            MulKernel::Fixed3 => mul_fixed!(3, a, b, out),
            MulKernel::Fixed4 => mul_fixed!(4, a, b, out),
            MulKernel::Fixed6 => mul_fixed!(6, a, b, out),
            MulKernel::Fixed8 => mul_fixed!(8, a, b, out),
            MulKernel::Fixed10 => mul_fixed!(10, a, b, out),
            MulKernel::Fixed16 => mul_fixed!(16, a, b, out),
            MulKernel::Fixed32 => mul_fixed!(32, a, b, out),
            MulKernel::Dynamic => mul_dynamic(n, a, b, out),
        }
        Ok(())
    }

    fn invert(&self, n: usize, src: &mut [f32], out: &mut [f32]) -> Result<(), MatError> {
        match InvKernel::for_size(n) {
            Some(InvKernel::Fixed3) => inv_fixed!(3, src, out),
            Some(InvKernel::Fixed4) => inv_fixed!(4, src, out),
            Some(InvKernel::Fixed6) => inv_fixed!(6, src, out),
            Some(InvKernel::Fixed8) => inv_fixed!(8, src, out),
            Some(InvKernel::Fixed10) => inv_fixed!(10, src, out),
            None => Err(MatError::UnsupportedSize(n)),
        }
    }
}
