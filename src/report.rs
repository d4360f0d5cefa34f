//! CSV report rendering into fixed-size buffers.
//!
//! The report schema is byte-exact external contract: field order, CRLF
//! terminators, and the decimal widths of every numeric column. Formatting
//! is done digit-by-digit into a fixed buffer rather than through locale- or
//! shortest-repr-aware facilities, so two builds of the engine can never
//! disagree on the byte stream.

use crate::backend::Operation;
use crate::core::config::BenchConfig;
use crate::trial::TrialAggregate;

/// Fixed header line. No field ever contains a comma, so there is no
/// escaping anywhere in the schema.
pub const CSV_HEADER: &str =
    "op,n,repeat,warmup,A_avg_cycles,B_avg_cycles,B_over_A,error_l2,valid,invalid,build_mode\r\n";

/// Literal completion marker emitted after the last line.
pub const DONE_MARKER: &str = "done\r\n";

/// Disclaimer emitted ahead of the header when built without optimizations.
pub const DEBUG_BUILD_WARNING: &str =
    "WARNING: debug build, no formal performance conclusion\r\n";

const LINE_CAPACITY: usize = 256;

const POW10: [u64; 9] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
];

/// Fixed-capacity text line. Pushes past capacity are silently dropped;
/// a truncated telemetry line beats a panic mid-run.
pub struct LineBuffer {
    bytes: [u8; LINE_CAPACITY],
    len: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        LineBuffer {
            bytes: [0; LINE_CAPACITY],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn push_byte(&mut self, b: u8) {
        if self.len < LINE_CAPACITY {
            self.bytes[self.len] = b;
            self.len += 1;
        }
    }

    pub fn push_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.push_byte(b);
        }
    }

    pub fn push_u64(&mut self, mut v: u64) {
        let mut tmp = [0u8; 20];
        let mut n = 0;
        loop {
            tmp[n] = b'0' + (v % 10) as u8;
            n += 1;
            v /= 10;
            if v == 0 {
                break;
            }
        }
        while n > 0 {
            n -= 1;
            self.push_byte(tmp[n]);
        }
    }

    /// Fixed-decimal rendering with 0..=8 fractional digits.
    ///
    /// Rounds half-up on the last digit; when rounding the fraction carries
    /// past the scale it propagates into the integer part. The fraction is
    /// always exactly `decimals` digits wide, left-padded with zeros.
    pub fn push_fixed(&mut self, v: f64, decimals: u32) {
        let decimals = decimals.min(POW10.len() as u32 - 1) as usize;
        let mut v = v;
        if v < 0.0 {
            self.push_byte(b'-');
            v = -v;
        }
        let scale = POW10[decimals];
        let mut int_part = v as u64;
        let frac = v - int_part as f64;
        let mut frac_part = (frac * scale as f64).round() as u64;
        if frac_part >= scale {
            int_part += 1;
            frac_part -= scale;
        }
        self.push_u64(int_part);
        if decimals == 0 {
            return;
        }
        self.push_byte(b'.');
        let mut divisor = scale / 10;
        loop {
            self.push_byte(b'0' + ((frac_part / divisor) % 10) as u8);
            if divisor == 1 {
                break;
            }
            divisor /= 10;
        }
    }
}

/// Render one aggregate as a complete CSV line, CRLF included.
pub fn format_line(
    buf: &mut LineBuffer,
    op: Operation,
    n: usize,
    agg: &TrialAggregate,
    config: &BenchConfig,
    build_mode: &str,
) {
    buf.clear();
    buf.push_str(op.label());
    buf.push_byte(b',');
    buf.push_u64(n as u64);
    buf.push_byte(b',');
    buf.push_u64(u64::from(config.repeat));
    buf.push_byte(b',');
    buf.push_u64(u64::from(config.warmup));
    buf.push_byte(b',');
    buf.push_fixed(agg.avg_a(), 2);
    buf.push_byte(b',');
    buf.push_fixed(agg.avg_b(), 2);
    buf.push_byte(b',');
    buf.push_fixed(agg.ratio(), 6);
    buf.push_byte(b',');
    buf.push_fixed(agg.mean_error(), 8);
    buf.push_byte(b',');
    buf.push_u64(u64::from(agg.valid));
    buf.push_byte(b',');
    buf.push_u64(u64::from(agg.invalid));
    buf.push_byte(b',');
    buf.push_str(build_mode);
    buf.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(v: f64, decimals: u32) -> String {
        let mut buf = LineBuffer::new();
        buf.push_fixed(v, decimals);
        String::from_utf8(buf.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn integer_rendering() {
        let mut buf = LineBuffer::new();
        buf.push_u64(0);
        buf.push_byte(b',');
        buf.push_u64(1_234_567_890);
        assert_eq!(buf.as_bytes(), b"0,1234567890");
    }

    #[test]
    fn zero_with_zero_decimals() {
        assert_eq!(fixed(0.0, 0), "0");
    }

    #[test]
    fn half_up_rounding_carries_into_integer() {
        assert_eq!(fixed(2.5, 0), "3");
        assert_eq!(fixed(0.999, 2), "1.00");
        assert_eq!(fixed(12.345, 2), "12.35");
    }

    #[test]
    fn fraction_is_left_zero_padded() {
        assert_eq!(fixed(1.05, 2), "1.05");
        assert_eq!(fixed(0.000012, 8), "0.00001200");
    }

    #[test]
    fn zero_ratio_renders_full_width() {
        assert_eq!(fixed(0.0, 6), "0.000000");
    }

    #[test]
    fn decimals_clamp_at_eight() {
        assert_eq!(fixed(0.5, 99), "0.50000000");
    }

    #[test]
    fn negative_values_keep_their_sign() {
        assert_eq!(fixed(-1.25, 2), "-1.25");
    }

    #[test]
    fn buffer_drops_bytes_past_capacity() {
        let mut buf = LineBuffer::new();
        for _ in 0..LINE_CAPACITY + 50 {
            buf.push_byte(b'x');
        }
        assert_eq!(buf.as_bytes().len(), LINE_CAPACITY);
        buf.clear();
        assert!(buf.as_bytes().is_empty());
    }

    #[test]
    fn header_matches_contract() {
        assert!(CSV_HEADER.starts_with("op,n,repeat,warmup,"));
        assert!(CSV_HEADER.ends_with("build_mode\r\n"));
        assert_eq!(CSV_HEADER.matches(',').count(), 10);
    }
}
