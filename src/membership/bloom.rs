//! A single fixed-capacity Bloom filter generation.
//!
//! Sizing follows the usual formulas for `n` expected items at a target
//! false-positive rate `p`:
//!
//! ```text
//! m = ceil(-n · ln p / (ln 2)²)      bits
//! k = max(1, round(m / n · ln 2))    hash functions
//! ```
//!
//! The `k` bit positions come from double hashing, `h1 + i·h2 mod m`, with
//! two fixed-seed `ahash` hashers.
//!
//! # Examples
//!
//! ```
//! use raven::membership::bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(100, 0.01).unwrap();
//! filter.insert("cat");
//!
//! assert!(filter.contains("cat").unwrap());
//! assert_eq!(filter.len(), 1);
//! ```

use std::f64::consts::LN_2;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use bit_vec::BitVec;

use crate::error::{RavenError, Result};

const H1_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

const H2_SEEDS: [u64; 4] = [
    0x4528_21e6_38d0_1377,
    0xbe54_66cf_34e9_0c6c,
    0xc0ac_29b7_c97c_50dd,
    0x3f84_d5b5_b547_0917,
];

/// One generation of a [`ScalableBloomFilter`](super::scalable::ScalableBloomFilter).
#[derive(Clone)]
pub struct BloomFilter {
    bits: BitVec,
    num_bits: usize,
    num_hashes: u32,
    capacity: usize,
    false_positive_rate: f64,
    len: usize,
    h1: RandomState,
    h2: RandomState,
}

impl BloomFilter {
    /// Create a filter sized for `capacity` items at `false_positive_rate`.
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(RavenError::invalid_config(
                "bloom filter capacity must be positive",
            ));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(RavenError::invalid_config(format!(
                "bloom filter false positive rate must be in (0, 1), got {false_positive_rate}"
            )));
        }

        let num_bits = Self::optimal_num_bits(capacity, false_positive_rate);
        let num_hashes = Self::optimal_num_hashes(capacity, num_bits);

        Ok(Self::from_raw_parts(
            BitVec::from_elem(num_bits, false),
            num_bits,
            num_hashes,
            capacity,
            false_positive_rate,
            0,
        ))
    }

    /// Rebuild a generation from its raw state.
    ///
    /// `num_bits` is the declared size of the bit array; a `bits` vector
    /// shorter than that (for instance a truncated snapshot) is reported by
    /// [`contains`](Self::contains) as a filter error.
    pub fn from_raw_parts(
        bits: BitVec,
        num_bits: usize,
        num_hashes: u32,
        capacity: usize,
        false_positive_rate: f64,
        len: usize,
    ) -> Self {
        BloomFilter {
            bits,
            num_bits: num_bits.max(1),
            num_hashes: num_hashes.max(1),
            capacity,
            false_positive_rate,
            len,
            h1: RandomState::with_seeds(H1_SEEDS[0], H1_SEEDS[1], H1_SEEDS[2], H1_SEEDS[3]),
            h2: RandomState::with_seeds(H2_SEEDS[0], H2_SEEDS[1], H2_SEEDS[2], H2_SEEDS[3]),
        }
    }

    fn optimal_num_bits(n: usize, p: f64) -> usize {
        let m = -(n as f64 * p.ln()) / (LN_2 * LN_2);
        (m.ceil() as usize).max(1)
    }

    fn optimal_num_hashes(n: usize, m: usize) -> u32 {
        let k = (m as f64 / n as f64) * LN_2;
        (k.round() as u32).max(1)
    }

    fn bit_positions<T: Hash + ?Sized>(&self, item: &T) -> impl Iterator<Item = usize> + use<T> {
        let m = self.num_bits as u64;
        let a = BuildHasher::hash_one(&self.h1, item);
        // Odd step so the probe sequence does not collapse when m is even.
        let b = BuildHasher::hash_one(&self.h2, item) | 1;

        (0..u64::from(self.num_hashes))
            .map(move |i| (a.wrapping_add(i.wrapping_mul(b)) % m) as usize)
    }

    /// Insert an item. Returns `true` if at least one bit changed.
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        if self.bits.len() < self.num_bits {
            let missing = self.num_bits - self.bits.len();
            self.bits.grow(missing, false);
        }

        let mut changed = false;
        for pos in self.bit_positions(item) {
            if !self.bits[pos] {
                self.bits.set(pos, true);
                changed = true;
            }
        }

        if changed {
            self.len += 1;
        }
        changed
    }

    /// Check whether an item may be present.
    ///
    /// `Ok(false)` means definitely absent. An error means the generation's
    /// bit array is inconsistent with its declared size.
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> Result<bool> {
        for pos in self.bit_positions(item) {
            match self.bits.get(pos) {
                Some(true) => {}
                Some(false) => return Ok(false),
                None => {
                    return Err(RavenError::filter(format!(
                        "bit {pos} outside a {}-bit generation (declared {} bits)",
                        self.bits.len(),
                        self.num_bits
                    )));
                }
            }
        }
        Ok(true)
    }

    /// Whether the generation has reached the item count it was sized for.
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Number of items inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Target false-positive rate the generation was sized for.
    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// The raw bit array.
    pub fn bits(&self) -> &BitVec {
        &self.bits
    }

    /// Fraction of bits set.
    pub fn fill_ratio(&self) -> f64 {
        let ones = self.bits.iter().filter(|bit| *bit).count();
        ones as f64 / self.num_bits as f64
    }

    /// False-positive probability implied by the current fill ratio.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.num_hashes as i32)
    }

    /// Approximate heap usage of the bit array in bytes.
    pub fn memory_usage(&self) -> usize {
        self.bits.len().div_ceil(8)
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.num_bits)
            .field("num_hashes", &self.num_hashes)
            .field("capacity", &self.capacity)
            .field("false_positive_rate", &self.false_positive_rate)
            .field("len", &self.len)
            .finish()
    }
}
