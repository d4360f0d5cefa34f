//! Deterministic matrix generation.
//!
//! A 32-bit linear congruential generator with full wraparound arithmetic.
//! The same seed always yields the same sequence, which is what makes two
//! report runs comparable field-by-field.

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const U24_SCALE: f32 = 1.0 / 16_777_216.0;

/// Deterministic sequence generator. One `u32` of state, advanced once per
/// value produced.
#[derive(Debug, Clone)]
pub struct Lcg32 {
    state: u32,
}

impl Lcg32 {
    pub fn new(seed: u32) -> Self {
        Lcg32 { state: seed }
    }

    /// Advance the recurrence and return the new state.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Signed float in [-1, 1), derived from the upper 24 bits so the low
    /// LCG bits (which have short periods) never reach the mantissa.
    pub fn next_signed_unit(&mut self) -> f32 {
        let u24 = (self.next_u32() >> 8) & 0x00FF_FFFF;
        (u24 as f32 * U24_SCALE) * 2.0 - 1.0
    }

    /// Fill the leading `n * n` entries of `dst` in row-major order.
    pub fn fill(&mut self, dst: &mut [f32], n: usize) {
        for slot in &mut dst[..n * n] {
            *slot = self.next_signed_unit();
        }
    }

    /// Like [`fill`](Self::fill), then add `n` to every diagonal entry.
    /// Diagonal dominance biases the matrix toward invertibility; it is a
    /// heuristic, not a guarantee, and backends may still report singular.
    pub fn fill_invertible(&mut self, dst: &mut [f32], n: usize) {
        self.fill(dst, n);
        for row in 0..n {
            dst[row * n + row] += n as f32;
        }
    }
}
