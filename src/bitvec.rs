// Licensed under the MIT license.

//! Fixed-length bit array backing a filter.
use std::collections::TryReserveError;
use std::fmt::Debug;

/// A packed, fixed-length bit array. Bit `i` lives in byte `i / 8`, at bit `i % 8`.
#[derive(Clone, PartialEq, Eq)]
pub struct BitVec {
    bytes: Box<[u8]>,
}

impl BitVec {
    /// Create a zeroed bit array backed by `nbytes` bytes.
    ///
    /// Fails instead of aborting if the memory cannot be allocated.
    pub fn with_bytes(nbytes: usize) -> Result<Self, TryReserveError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(nbytes)?;
        bytes.resize(nbytes, 0);

        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Get the length in bits of the array.
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Check whether this array is empty, ie. has a length of zero.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Set all bits to zero.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Set a single bit to `1`.
    pub fn set(&mut self, index: usize) {
        let (byte, mask) = self.locate(index);
        self.bytes[byte] |= mask;
    }

    /// Check whether a bit is set.
    pub fn is_set(&self, index: usize) -> bool {
        let (byte, mask) = self.locate(index);
        self.bytes[byte] & mask != 0
    }

    /// Count the number of `1` bits.
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Count the number of `0` bits.
    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    /// Return the underlying bytes storage.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn locate(&self, index: usize) -> (usize, u8) {
        if index >= self.len() {
            panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index,
            )
        }
        (index / 8, 1 << (index % 8))
    }
}

impl Debug for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits: String = (0..self.len())
            .map(|i| if self.is_set(i) { '1' } else { '0' })
            .collect();
        write!(f, "BitVec({})", bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitvec_length_is_in_whole_bytes() {
        assert_eq!(0, BitVec::with_bytes(0).unwrap().len());
        assert!(BitVec::with_bytes(0).unwrap().is_empty());
        assert_eq!(8, BitVec::with_bytes(1).unwrap().len());
        assert_eq!(1199 * 8, BitVec::with_bytes(1199).unwrap().len());
    }

    #[test]
    fn bits_across_byte_boundaries() {
        let mut bitvec = BitVec::with_bytes(3).unwrap();
        for i in [0, 7, 8, 23] {
            bitvec.set(i);
        }
        for i in 0..24 {
            assert_eq!([0, 7, 8, 23].contains(&i), bitvec.is_set(i), "bit {}", i);
        }
        assert_eq!(bitvec.as_bytes(), &[0b1000_0001, 0b0000_0001, 0b1000_0000]);
        assert_eq!(4, bitvec.count_ones());
        assert_eq!(20, bitvec.count_zeros());
    }

    #[test]
    fn set_is_idempotent() {
        let mut bitvec = BitVec::with_bytes(2).unwrap();
        bitvec.set(9);
        bitvec.set(9);
        assert_eq!(1, bitvec.count_ones());
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut bitvec = BitVec::with_bytes(4).unwrap();
        (0..32).step_by(3).for_each(|i| bitvec.set(i));
        assert_eq!(11, bitvec.count_ones());

        bitvec.clear();
        assert_eq!(0, bitvec.count_ones());
        assert!(bitvec.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn oversized_allocation_is_an_error() {
        assert!(BitVec::with_bytes(usize::MAX).is_err());
        assert!(BitVec::with_bytes(isize::MAX as usize).is_err());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn must_set_with_correct_index() {
        BitVec::with_bytes(1).unwrap().set(8);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn must_get_with_correct_index() {
        BitVec::with_bytes(2).unwrap().is_set(16);
    }

    #[test]
    fn debug_lists_bits_in_index_order() {
        let mut bitvec = BitVec::with_bytes(1).unwrap();
        bitvec.set(1);
        assert_eq!(format!("{:?}", bitvec), "BitVec(01000000)");
    }
}
