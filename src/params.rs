use crate::error::{FilterError, Result};

const LN2: f64 = std::f64::consts::LN_2;
const LN2_SQUARED: f64 = LN2 * LN2;

/// Sizing derived from `(estimated_elements, false_positive_rate)`.
///
/// All three values are fixed for the lifetime of the filter that owns
/// them. Deriving is deterministic: identical inputs produce identical
/// sizing across calls and across processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    /// Total number of addressable bits (m)
    pub number_bits: u64,
    /// Hash rounds per element (k), never below 1
    pub number_hashes: u32,
    /// Bytes backing the bit array, `ceil(m / 8)`
    pub byte_length: u64,
}

impl FilterParams {
    /// Derives optimal sizing for `estimated_elements` at the target rate.
    ///
    /// `m = ceil(-n * ln(p) / ln(2)^2)` rounds up so the filter never
    /// under-provisions bits. `k = round(ln(2) * m / n)` rounds to nearest
    /// and is clamped to at least one round: the rounding formula yields
    /// zero for weak targets (p above ~0.71), and a zero-hash filter would
    /// answer "present" for every query.
    pub fn derive(
        estimated_elements: u64,
        false_positive_rate: f64,
    ) -> Result<Self> {
        if estimated_elements == 0 {
            return Err(FilterError::InvalidParameter(
                "estimated elements must be > 0".into(),
            ));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(FilterError::InvalidParameter(format!(
                "false positive rate must be between 0 and 1, got {false_positive_rate}"
            )));
        }

        let n = estimated_elements as f64;
        let bits = (-n * false_positive_rate.ln() / LN2_SQUARED).ceil();
        if !bits.is_finite() || bits >= u64::MAX as f64 {
            return Err(FilterError::InvalidParameter(format!(
                "derived bit count overflows for n={estimated_elements}, p={false_positive_rate}"
            )));
        }

        let number_bits = bits as u64;
        let number_hashes = ((LN2 * bits / n).round() as u32).max(1);

        Ok(Self {
            number_bits,
            number_hashes,
            byte_length: number_bits.div_ceil(8),
        })
    }
}
