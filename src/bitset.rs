use rand::RngCore;
use std::fmt;
use std::fmt::{Display, Formatter};

const WORD_BITS: usize = 64;

/// A fixed-length bitstring, packed into 64-bit words.
///
/// Archives and frontiers hold many of these at once and compare/clone them
/// repeatedly, so a packed representation is used instead of `Vec<bool>`
/// (see `spec.md` §9).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitString {
    words: Vec<u64>,
    len: usize,
}

impl BitString {
    /// Create a bitstring of `len` bits, all zero.
    pub fn zeros(len: usize) -> Self {
        let n_words = len.div_ceil(WORD_BITS);
        Self {
            words: vec![0u64; n_words.max(1)],
            len,
        }
    }

    /// Create a bitstring of `len` bits with each bit drawn i.i.d. uniform.
    pub fn random(len: usize, rng: &mut impl RngCore) -> Self {
        let mut bs = Self::zeros(len);
        for i in 0..len {
            if rng.next_u32() & 1 == 1 {
                bs.set(i, true);
            }
        }
        bs
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `i`. Panics if `i >= len()`.
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "bit index {i} out of range for length {}", self.len);
        let (word, bit) = (i / WORD_BITS, i % WORD_BITS);
        (self.words[word] >> bit) & 1 == 1
    }

    /// Write bit `i`. Panics if `i >= len()`.
    pub fn set(&mut self, i: usize, value: bool) {
        assert!(i < self.len, "bit index {i} out of range for length {}", self.len);
        let (word, bit) = (i / WORD_BITS, i % WORD_BITS);
        if value {
            self.words[word] |= 1u64 << bit;
        } else {
            self.words[word] &= !(1u64 << bit);
        }
    }

    /// Flip bit `i` in place. Panics if `i >= len()`.
    pub fn flip(&mut self, i: usize) {
        assert!(i < self.len, "bit index {i} out of range for length {}", self.len);
        let (word, bit) = (i / WORD_BITS, i % WORD_BITS);
        self.words[word] ^= 1u64 << bit;
    }

    /// Return a copy of `self` with bit `i` flipped.
    pub fn flipped(&self, i: usize) -> Self {
        let mut out = self.clone();
        out.flip(i);
        out
    }

    /// Number of bits set to `1`.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Number of differing bit positions between `self` and `other`. Panics
    /// if the lengths differ.
    pub fn hamming_distance(&self, other: &Self) -> u32 {
        assert_eq!(self.len, other.len, "bitstrings of different lengths");
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            write!(f, "{}", self.get(i) as u8)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zeros_are_all_clear() {
        let bs = BitString::zeros(70);
        assert_eq!(bs.len(), 70);
        for i in 0..70 {
            assert!(!bs.get(i));
        }
    }

    #[test]
    fn set_get_flip_roundtrip() {
        let mut bs = BitString::zeros(5);
        bs.set(2, true);
        assert!(bs.get(2));
        assert!(!bs.get(0));
        bs.flip(2);
        assert!(!bs.get(2));
        bs.flip(0);
        assert!(bs.get(0));
    }

    #[test]
    fn sigma_worked_example_bits() {
        // x = 1 0 1
        let mut x = BitString::zeros(3);
        x.set(0, true);
        x.set(2, true);
        assert_eq!(x.to_string(), "101");
    }

    #[test]
    fn hamming_distance_counts_differing_bits() {
        let a = BitString::zeros(8);
        let mut b = BitString::zeros(8);
        b.set(1, true);
        b.set(5, true);
        assert_eq!(a.hamming_distance(&b), 2);
    }

    #[test]
    fn crosses_word_boundary() {
        let mut bs = BitString::zeros(130);
        bs.set(64, true);
        bs.set(129, true);
        assert!(bs.get(64));
        assert!(bs.get(129));
        assert_eq!(bs.count_ones(), 2);
    }

    #[test]
    fn random_is_reproducible_for_fixed_seed() {
        let mut r1 = ChaCha8Rng::seed_from_u64(7);
        let mut r2 = ChaCha8Rng::seed_from_u64(7);
        let a = BitString::random(40, &mut r1);
        let b = BitString::random(40, &mut r2);
        assert_eq!(a, b);
    }
}
