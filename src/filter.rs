use crate::bitarray::BitArray;
use crate::common::bytes2hr;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::hash::{ChainedDigestHasher, IndexHasher};
use crate::params::FilterParams;
use std::fmt;
use tracing::debug;

/// Classic Bloom filter over byte-string items.
///
/// Sized at construction from an estimated element count and a target
/// false positive rate; never reports an inserted item as absent, and
/// reports never-inserted items as present at most at (roughly) the target
/// rate while the filter stays within its capacity estimate.
///
/// The bit buffer is exclusively owned and released when the filter is
/// dropped. Not synchronized: sharing across threads requires external
/// locking around all operations.
pub struct BloomFilter {
    config: FilterConfig,
    params: FilterParams,
    bits: BitArray,
    elements_added: u64,
    hasher: Box<dyn IndexHasher>,
}

impl BloomFilter {
    /// Creates a zeroed filter sized for `config`, using the default
    /// chained-digest hasher.
    pub fn new(config: FilterConfig) -> Result<Self> {
        Self::with_hasher(config, Box::new(ChainedDigestHasher))
    }

    /// Creates a zeroed filter with a caller-supplied hasher.
    pub fn with_hasher(
        config: FilterConfig,
        hasher: Box<dyn IndexHasher>,
    ) -> Result<Self> {
        config.validate()?;
        let params = FilterParams::derive(
            config.estimated_elements,
            f64::from(config.false_positive_rate),
        )?;
        let bits = BitArray::zeroed(params.number_bits)?;
        debug!(
            number_bits = params.number_bits,
            number_hashes = params.number_hashes,
            byte_length = params.byte_length,
            "allocated bloom filter"
        );
        Ok(Self {
            config,
            params,
            bits,
            elements_added: 0,
            hasher,
        })
    }

    /// Reassembles a filter from already-validated pieces; used by import.
    pub(crate) fn from_parts(
        config: FilterConfig,
        params: FilterParams,
        bits: BitArray,
        elements_added: u64,
        hasher: Box<dyn IndexHasher>,
    ) -> Self {
        Self {
            config,
            params,
            bits,
            elements_added,
            hasher,
        }
    }

    /// Inserts an item, setting its `k` bits and bumping the insert
    /// counter. Duplicates are not detected; re-inserting an item bumps
    /// the counter again.
    pub fn insert(&mut self, item: &[u8]) -> Result<()> {
        let indices = self.hasher.generate(
            self.params.number_hashes,
            self.params.number_bits,
            item,
        );
        for index in indices {
            self.bits.set(index)?;
        }
        self.elements_added += 1;
        Ok(())
    }

    /// Queries membership. `false` is always correct; `true` may be a
    /// false positive at (roughly) the configured rate. Items previously
    /// inserted under the same hasher are always `true`.
    pub fn contains(&self, item: &[u8]) -> Result<bool> {
        let indices = self.hasher.generate(
            self.params.number_hashes,
            self.params.number_bits,
            item,
        );
        for index in indices {
            if !self.bits.check(index)? {
                // no need to check the remaining rounds
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Zeroes every bit and the insert counter, keeping the allocation.
    pub fn clear(&mut self) {
        self.bits.clear();
        self.elements_added = 0;
    }

    /// Estimates the live false positive rate as
    /// `(1 - e^(-k * elements_added / m))^k`.
    ///
    /// Uses the running insert counter rather than the capacity estimate,
    /// so the value climbs as the filter fills and overshoots the true
    /// rate when duplicates were inserted.
    pub fn current_false_positive_rate(&self) -> f64 {
        let k = f64::from(self.params.number_hashes);
        let exponent =
            -k * self.elements_added as f64 / self.params.number_bits as f64;
        (1.0 - exponent.exp()).powf(k)
    }

    /// Replaces the active hasher.
    ///
    /// Must not change between inserts and queries over the same data set,
    /// or the no-false-negative guarantee is void.
    pub fn set_hasher(&mut self, hasher: Box<dyn IndexHasher>) {
        self.hasher = hasher;
    }

    /// Read-only snapshot of all scalar state plus the live estimate.
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            number_bits: self.params.number_bits,
            estimated_elements: self.config.estimated_elements,
            number_hashes: self.params.number_hashes,
            false_positive_rate: self.config.false_positive_rate,
            byte_length: self.params.byte_length,
            elements_added: self.elements_added,
            current_false_positive_rate: self.current_false_positive_rate(),
        }
    }

    pub fn estimated_elements(&self) -> u64 {
        self.config.estimated_elements
    }

    pub fn false_positive_rate(&self) -> f32 {
        self.config.false_positive_rate
    }

    pub fn number_bits(&self) -> u64 {
        self.params.number_bits
    }

    pub fn number_hashes(&self) -> u32 {
        self.params.number_hashes
    }

    pub fn byte_length(&self) -> u64 {
        self.params.byte_length
    }

    pub fn elements_added(&self) -> u64 {
        self.elements_added
    }

    pub(crate) fn raw_bits(&self) -> &[u8] {
        self.bits.as_bytes()
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BloomFilter {{ estimated_elements: {}, false_positive_rate: {}, number_bits: {}, number_hashes: {}, elements_added: {} }}",
            self.config.estimated_elements,
            self.config.false_positive_rate,
            self.params.number_bits,
            self.params.number_hashes,
            self.elements_added
        )
    }
}

/// Point-in-time report of a filter's state.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStats {
    pub number_bits: u64,
    pub estimated_elements: u64,
    pub number_hashes: u32,
    pub false_positive_rate: f32,
    pub byte_length: u64,
    pub elements_added: u64,
    pub current_false_positive_rate: f64,
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BloomFilter")?;
        writeln!(f, "    bits: {}", self.number_bits)?;
        writeln!(f, "    estimated elements: {}", self.estimated_elements)?;
        writeln!(f, "    number hashes: {}", self.number_hashes)?;
        writeln!(
            f,
            "    max false positive rate: {:.6}",
            self.false_positive_rate
        )?;
        writeln!(
            f,
            "    buffer size: {} ({})",
            self.byte_length,
            bytes2hr(self.byte_length)
        )?;
        writeln!(f, "    elements added: {}", self.elements_added)?;
        write!(
            f,
            "    current false positive rate: {:.6}",
            self.current_false_positive_rate
        )
    }
}
