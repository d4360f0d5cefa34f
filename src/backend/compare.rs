//! Cross-backend result validation helpers.

/// Elementwise Frobenius-norm distance between two `n`×`n` matrices.
///
/// Accumulated in f64 regardless of input precision; summing squared f32
/// deltas in f32 loses exactly the small differences this oracle exists to
/// measure.
pub fn frobenius_error(n: usize, lhs: &[f32], rhs: &[f32]) -> f32 {
    let elements = n * n;
    let mut sum = 0.0f64;
    for (l, r) in lhs[..elements].iter().zip(&rhs[..elements]) {
        let delta = f64::from(*l) - f64::from(*r);
        sum += delta * delta;
    }
    sum.sqrt() as f32
}

/// True when no element of the `n`×`n` matrix is NaN or infinite.
pub fn is_finite(n: usize, data: &[f32]) -> bool {
    data[..n * n].iter().all(|v| v.is_finite())
}
