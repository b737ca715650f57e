use crate::error::{FilterError, Result};
use bitvec::{order::Lsb0, vec::BitVec};

/// Owned fixed-length bit store backing a filter.
///
/// Bits are packed LSB-first within each byte (bit `i` lives at bit
/// `i % 8` of byte `i / 8`), which is also the on-disk snapshot layout.
/// Indices are expected to come from an in-contract hasher, but both
/// accessors still bounds-check defensively.
pub struct BitArray {
    bits: BitVec<u8, Lsb0>,
}

impl BitArray {
    /// Allocates a zeroed array addressing `[0, num_bits)`.
    pub fn zeroed(num_bits: u64) -> Result<Self> {
        let byte_length = num_bits.div_ceil(8);
        let bytes = usize::try_from(byte_length).map_err(|_| {
            FilterError::AllocationFailure { bytes: byte_length }
        })?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes)
            .map_err(|_| FilterError::AllocationFailure { bytes: byte_length })?;
        buf.resize(bytes, 0u8);

        Ok(Self::from_vec(buf, num_bits))
    }

    /// Wraps an existing byte buffer, addressing the first `num_bits` bits.
    /// The buffer must hold at least `ceil(num_bits / 8)` bytes.
    pub(crate) fn from_vec(buf: Vec<u8>, num_bits: u64) -> Self {
        let mut bits = BitVec::from_vec(buf);
        bits.truncate(num_bits as usize);
        Self { bits }
    }

    /// Sets the bit at `index`. Idempotent.
    pub fn set(&mut self, index: u64) -> Result<()> {
        let idx = self.checked_index(index)?;
        self.bits.set(idx, true);
        Ok(())
    }

    /// Returns whether the bit at `index` is set.
    pub fn check(&self, index: u64) -> Result<bool> {
        let idx = self.checked_index(index)?;
        Ok(self.bits[idx])
    }

    /// Clears every bit, keeping the allocation.
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    pub fn num_bits(&self) -> u64 {
        self.bits.len() as u64
    }

    /// Raw byte view, exactly `ceil(num_bits / 8)` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    fn checked_index(&self, index: u64) -> Result<usize> {
        if index >= self.bits.len() as u64 {
            return Err(FilterError::IndexOutOfBounds {
                index,
                number_bits: self.bits.len() as u64,
            });
        }
        Ok(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_zeroed() {
        let bits = BitArray::zeroed(64).unwrap();
        assert_eq!(bits.num_bits(), 64);
        assert!(bits.as_bytes().iter().all(|&b| b == 0));
        for i in 0..64 {
            assert!(!bits.check(i).unwrap());
        }
    }

    #[test]
    fn test_set_and_check() {
        let mut bits = BitArray::zeroed(100).unwrap();
        bits.set(0).unwrap();
        bits.set(42).unwrap();
        bits.set(99).unwrap();
        assert!(bits.check(0).unwrap());
        assert!(bits.check(42).unwrap());
        assert!(bits.check(99).unwrap());
        assert!(!bits.check(1).unwrap());
        assert!(!bits.check(98).unwrap());
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut bits = BitArray::zeroed(16).unwrap();
        bits.set(5).unwrap();
        let snapshot = bits.as_bytes().to_vec();
        bits.set(5).unwrap();
        assert_eq!(bits.as_bytes(), snapshot.as_slice());
    }

    #[test]
    fn test_lsb_first_packing() {
        let mut bits = BitArray::zeroed(16).unwrap();
        bits.set(0).unwrap();
        bits.set(9).unwrap();
        assert_eq!(bits.as_bytes(), &[0b0000_0001, 0b0000_0010]);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut bits = BitArray::zeroed(10).unwrap();
        assert!(matches!(
            bits.set(10),
            Err(FilterError::IndexOutOfBounds { index: 10, .. })
        ));
        assert!(bits.check(11).is_err());
    }

    #[test]
    fn test_byte_length_rounds_up() {
        let bits = BitArray::zeroed(9).unwrap();
        assert_eq!(bits.as_bytes().len(), 2);
        let bits = BitArray::zeroed(8).unwrap();
        assert_eq!(bits.as_bytes().len(), 1);
    }

    #[test]
    fn test_clear_resets_all_bits() {
        let mut bits = BitArray::zeroed(32).unwrap();
        for i in [0, 7, 15, 31] {
            bits.set(i).unwrap();
        }
        bits.clear();
        assert!(bits.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(bits.num_bits(), 32);
    }
}
