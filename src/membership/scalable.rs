//! Scalable Bloom filter: a growable chain of Bloom filter generations.
//!
//! Generation `i` is sized for `initial_capacity · growth_factor^i` items at
//! a false-positive target of `p · (1 - r) · r^i`, where `p` is the
//! configured rate and `r` the tightening ratio. The targets form a
//! geometric series summing to `p`, so the aggregate false-positive
//! probability stays below `p` however many generations are appended.
//!
//! # Examples
//!
//! ```
//! use raven::membership::scalable::{MembershipFilterConfig, ScalableBloomFilter};
//!
//! let config = MembershipFilterConfig {
//!     initial_capacity: 4,
//!     ..Default::default()
//! };
//! let mut filter = ScalableBloomFilter::new(config).unwrap();
//!
//! for i in 0..20 {
//!     filter.add(&format!("term{i}"));
//! }
//!
//! assert!(filter.generation_count() > 1);
//! assert!(filter.contains("term7").unwrap());
//! assert!(filter.false_positive_bound() <= 0.01);
//! ```

use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{RavenError, Result};
use crate::membership::bloom::BloomFilter;

/// Configuration of a [`ScalableBloomFilter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipFilterConfig {
    /// Items the first generation is sized for.
    pub initial_capacity: usize,

    /// Aggregate false-positive rate bound across all generations.
    pub false_positive_rate: f64,

    /// Capacity multiplier applied to each new generation.
    pub growth_factor: usize,

    /// Multiplier applied to each new generation's false-positive target.
    pub tightening_ratio: f64,
}

impl Default for MembershipFilterConfig {
    fn default() -> Self {
        MembershipFilterConfig {
            initial_capacity: 1000,
            false_positive_rate: 0.01,
            growth_factor: 2,
            tightening_ratio: 0.5,
        }
    }
}

impl MembershipFilterConfig {
    /// Check the configuration for values the filter cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(RavenError::invalid_config(
                "initial_capacity must be positive",
            ));
        }
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(RavenError::invalid_config(format!(
                "false_positive_rate must be in (0, 1), got {}",
                self.false_positive_rate
            )));
        }
        if self.growth_factor == 0 {
            return Err(RavenError::invalid_config("growth_factor must be >= 1"));
        }
        if !(self.tightening_ratio > 0.0 && self.tightening_ratio < 1.0) {
            return Err(RavenError::invalid_config(format!(
                "tightening_ratio must be in (0, 1), got {}",
                self.tightening_ratio
            )));
        }
        Ok(())
    }

    /// Capacity of generation `index`.
    pub fn generation_capacity(&self, index: usize) -> usize {
        let mut capacity = self.initial_capacity;
        for _ in 0..index {
            capacity = capacity.saturating_mul(self.growth_factor);
        }
        capacity
    }

    /// False-positive target of generation `index`.
    pub fn generation_false_positive_rate(&self, index: usize) -> f64 {
        let exponent = i32::try_from(index).unwrap_or(i32::MAX);
        let rate = self.false_positive_rate
            * (1.0 - self.tightening_ratio)
            * self.tightening_ratio.powi(exponent);
        rate.max(f64::MIN_POSITIVE)
    }
}

/// Approximate set membership for an unbounded number of items.
///
/// Items are never removed. [`contains`](Self::contains) has no false
/// negatives for added items.
#[derive(Debug, Clone)]
pub struct ScalableBloomFilter {
    config: MembershipFilterConfig,
    generations: Vec<BloomFilter>,
    len: usize,
}

impl ScalableBloomFilter {
    /// Create a filter with a single generation.
    pub fn new(config: MembershipFilterConfig) -> Result<Self> {
        config.validate()?;

        let first = BloomFilter::new(
            config.generation_capacity(0),
            config.generation_false_positive_rate(0),
        )?;

        Ok(ScalableBloomFilter {
            config,
            generations: vec![first],
            len: 0,
        })
    }

    /// Add an item. Returns `true` if it was newly inserted.
    ///
    /// Items that may already be present are skipped so duplicates do not
    /// use up generation capacity. When the last generation is full a new
    /// one is appended first.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        match self.contains(item) {
            Ok(true) => return false,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    target: "raven::membership",
                    error = %e,
                    "Membership check failed; inserting anyway"
                );
            }
        }

        if self.generations.last().is_none_or(BloomFilter::is_full) {
            self.grow();
        }

        let inserted = match self.generations.last_mut() {
            Some(generation) => generation.insert(item),
            None => false,
        };
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Rebuild a filter from existing generations, oldest first.
    ///
    /// The generations are taken as they are; a generation whose bit array
    /// is shorter than declared makes [`contains`](Self::contains) fail.
    pub fn from_generations(
        config: MembershipFilterConfig,
        generations: Vec<BloomFilter>,
    ) -> Result<Self> {
        config.validate()?;
        if generations.is_empty() {
            return Err(RavenError::filter(
                "membership filter needs at least one generation",
            ));
        }

        let len = generations.iter().map(BloomFilter::len).sum();
        Ok(ScalableBloomFilter {
            config,
            generations,
            len,
        })
    }

    fn grow(&mut self) {
        let index = self.generations.len();
        let capacity = self.config.generation_capacity(index);
        let rate = self.config.generation_false_positive_rate(index);

        // The config was validated and the rate is clamped to (0, 1).
        match BloomFilter::new(capacity, rate) {
            Ok(generation) => {
                tracing::debug!(
                    target: "raven::membership",
                    generation = index,
                    capacity,
                    false_positive_rate = rate,
                    "Appending bloom filter generation"
                );
                self.generations.push(generation);
            }
            Err(e) => {
                tracing::warn!(
                    target: "raven::membership",
                    generation = index,
                    error = %e,
                    "Could not size a new generation; overfilling the last one"
                );
            }
        }
    }

    /// Test whether an item may be present.
    ///
    /// Returns `Ok(true)` if any generation matches and `Ok(false)` only if
    /// none does. Structural errors are returned as
    /// [`RavenError::Filter`] rather than folded into a negative answer.
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> Result<bool> {
        if self.generations.is_empty() {
            return Err(RavenError::filter("membership filter has no generations"));
        }

        for generation in &self.generations {
            if generation.contains(item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Number of distinct items added.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn generation_count(&self) -> usize {
        self.generations.len()
    }

    pub fn generations(&self) -> &[BloomFilter] {
        &self.generations
    }

    pub fn config(&self) -> &MembershipFilterConfig {
        &self.config
    }

    /// Total item capacity of the generations allocated so far.
    pub fn capacity(&self) -> usize {
        self.generations
            .iter()
            .fold(0usize, |acc, g| acc.saturating_add(g.capacity()))
    }

    /// Sum of the generations' false-positive targets.
    ///
    /// Always below the configured `false_positive_rate`.
    pub fn false_positive_bound(&self) -> f64 {
        self.generations.iter().map(|g| g.false_positive_rate()).sum()
    }

    /// False-positive probability implied by the generations' fill ratios.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let all_negative: f64 = self
            .generations
            .iter()
            .map(|g| 1.0 - g.estimated_false_positive_rate())
            .product();
        1.0 - all_negative
    }

    /// Approximate heap usage of all bit arrays in bytes.
    pub fn memory_usage(&self) -> usize {
        self.generations.iter().map(|g| g.memory_usage()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bit_vec::BitVec;

    fn small_config() -> MembershipFilterConfig {
        MembershipFilterConfig {
            initial_capacity: 10,
            false_positive_rate: 0.01,
            growth_factor: 2,
            tightening_ratio: 0.5,
        }
    }

    #[test]
    fn test_default_config() {
        let config = MembershipFilterConfig::default();
        assert_eq!(config.initial_capacity, 1000);
        assert_eq!(config.false_positive_rate, 0.01);
        assert_eq!(config.growth_factor, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let bad = [
            MembershipFilterConfig {
                initial_capacity: 0,
                ..small_config()
            },
            MembershipFilterConfig {
                false_positive_rate: 1.5,
                ..small_config()
            },
            MembershipFilterConfig {
                growth_factor: 0,
                ..small_config()
            },
            MembershipFilterConfig {
                tightening_ratio: 1.0,
                ..small_config()
            },
        ];
        for config in bad {
            assert!(matches!(
                ScalableBloomFilter::new(config),
                Err(RavenError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_generation_schedule() {
        let config = small_config();
        assert_eq!(config.generation_capacity(0), 10);
        assert_eq!(config.generation_capacity(3), 80);
        assert!((config.generation_false_positive_rate(0) - 0.005).abs() < 1e-12);
        assert!((config.generation_false_positive_rate(1) - 0.0025).abs() < 1e-12);
        assert_eq!(config.generation_capacity(200), usize::MAX);
        assert!(config.generation_false_positive_rate(5000) > 0.0);
    }

    #[test]
    fn test_grows_without_false_negatives() {
        let mut filter = ScalableBloomFilter::new(small_config()).unwrap();
        let terms: Vec<String> = (0..1000).map(|i| format!("term-{i}")).collect();

        for term in &terms {
            filter.add(term.as_str());
        }

        assert!(filter.generation_count() >= 5);
        for term in &terms {
            assert!(filter.contains(term.as_str()).unwrap(), "missing {term}");
        }

        let capacities: Vec<usize> = filter.generations().iter().map(|g| g.capacity()).collect();
        for pair in capacities.windows(2) {
            assert_eq!(pair[1], pair[0] * 2);
        }
        assert!(filter.capacity() >= filter.len());
    }

    #[test]
    fn test_aggregate_bound_holds() {
        let mut filter = ScalableBloomFilter::new(small_config()).unwrap();
        for i in 0..5000 {
            filter.add(format!("item{i}").as_str());
        }

        assert!(filter.false_positive_bound() < 0.01);

        let false_positives = (0..20_000)
            .filter(|i| filter.contains(format!("other{i}").as_str()).unwrap())
            .count();
        // Bound is 1% (200); leave room for variance.
        assert!(false_positives < 400, "{false_positives} false positives");
        assert!(filter.estimated_false_positive_rate() < 0.02);
    }

    #[test]
    fn test_duplicates_do_not_consume_capacity() {
        let mut filter = ScalableBloomFilter::new(small_config()).unwrap();
        assert!(filter.add("cat"));
        for _ in 0..100 {
            assert!(!filter.add("cat"));
        }
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.generation_count(), 1);
    }

    #[test]
    fn test_from_generations() {
        assert!(matches!(
            ScalableBloomFilter::from_generations(small_config(), Vec::new()),
            Err(RavenError::Filter(_))
        ));

        let mut first = BloomFilter::new(10, 0.005).unwrap();
        first.insert("cat");
        let filter = ScalableBloomFilter::from_generations(small_config(), vec![first]).unwrap();
        assert_eq!(filter.len(), 1);
        assert!(filter.contains("cat").unwrap());
    }

    #[test]
    fn test_add_recovers_from_truncated_generation() {
        let truncated = BloomFilter::from_raw_parts(BitVec::new(), 256, 3, 10, 0.01, 0);
        let mut filter =
            ScalableBloomFilter::from_generations(small_config(), vec![truncated]).unwrap();
        assert!(matches!(filter.contains("cat"), Err(RavenError::Filter(_))));

        assert!(filter.add("cat"));
        assert_eq!(filter.len(), 1);
        assert!(filter.contains("cat").unwrap());
    }

    #[test]
    fn test_empty_filter_reports_absent() {
        let filter = ScalableBloomFilter::new(small_config()).unwrap();
        assert!(filter.is_empty());
        assert!(!filter.contains("bird").unwrap());
        assert!(filter.memory_usage() > 0);
    }
}
