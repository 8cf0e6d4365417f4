// Licensed under the MIT license.

//! A Bloom filter driven by caller-supplied hash functions.
use std::fmt;

use crate::bitvec::BitVec;
use crate::error::{ConfigError, Error, Result};
use crate::hash::{HashFn, HashFunctions, SipHashFamily, Slot};
use crate::params::{self, Parameters, DEFAULT_FALSE_POSITIVE_RATE, MAX_HASH_FUNCTIONS};

/// The sizing of a filter, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterConfig {
    capacity: usize,
    false_positive_rate: f64,
    params: Parameters,
}

impl FilterConfig {
    /// Size a filter for `capacity` items at the given false positive rate.
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        let params = params::compute_parameters(capacity, false_positive_rate)?;

        Ok(Self {
            capacity,
            false_positive_rate,
            params,
        })
    }

    /// Expected number of distinct items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Target false positive rate.
    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    /// Derived sizing.
    pub fn params(&self) -> Parameters {
        self.params
    }
}

/// A Bloom filter over integer values.
///
/// The filter starts out unconfigured: [`BloomFilter::hashes`] functions have to be
/// registered with [`BloomFilter::set_hash_fns`] before values can be set or queried.
pub struct BloomFilter {
    config: FilterConfig,
    hashers: HashFunctions,
    bits: BitVec,
    size: usize,
}

impl BloomFilter {
    /// Return a new Bloom filter with a given approximate item capacity.
    /// The false positive rate is [`DEFAULT_FALSE_POSITIVE_RATE`].
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_rate(capacity, DEFAULT_FALSE_POSITIVE_RATE)
    }

    /// Return a new Bloom filter with a given approximate item capacity
    /// and a desired false positive rate.
    pub fn with_rate(capacity: usize, fp_rate: f64) -> Result<Self> {
        FilterConfig::new(capacity, fp_rate).and_then(Self::with_config)
    }

    /// Return a new Bloom filter for an existing configuration.
    ///
    /// Fails with [`ConfigError::TooLarge`] if the bit array cannot be allocated.
    pub fn with_config(config: FilterConfig) -> Result<Self> {
        let params = config.params();

        tracing::debug!(
            capacity = config.capacity(),
            fp_rate = config.false_positive_rate(),
            bits = params.bits(),
            hashes = params.hashes,
            "creating bloom filter"
        );

        let bits = BitVec::with_bytes(params.bytes).map_err(|err| {
            tracing::warn!(bytes = params.bytes, %err, "cannot allocate bloom filter");
            ConfigError::TooLarge {
                capacity: config.capacity(),
                fp_rate: config.false_positive_rate(),
            }
        })?;

        Ok(Self {
            config,
            hashers: HashFunctions::new(),
            bits,
            size: 0,
        })
    }

    /// Return a new Bloom filter, ready to use with a [`SipHashFamily`].
    pub fn with_sip_hashes(capacity: usize, fp_rate: f64) -> Result<Self> {
        let mut filter = Self::with_rate(capacity, fp_rate)?;
        filter.set_hash_fns(SipHashFamily::new(filter.hashes()).into_hash_fns())?;

        Ok(filter)
    }

    /// Register the hash functions, replacing any previously registered ones.
    ///
    /// Between [`BloomFilter::hashes`] and [`MAX_HASH_FUNCTIONS`] functions must be
    /// given. Only the first [`BloomFilter::hashes`] are used.
    pub fn set_hash_fns(&mut self, fns: Vec<Box<dyn HashFn>>) -> Result<()> {
        self.set_hash_slots(fns.into_iter().map(Some).collect())
    }

    /// Register hash function slots, some of which may not be callable.
    ///
    /// Bounds are checked as in [`BloomFilter::set_hash_fns`]. An empty slot is only
    /// reported, as [`Error::NotCallable`], when a value is set or queried.
    pub fn set_hash_slots(&mut self, slots: Vec<Slot>) -> Result<()> {
        self.hashers.replace(slots, self.hashes())
    }

    /// Whether hash functions have been registered.
    pub fn is_ready(&self) -> bool {
        !self.hashers.is_empty()
    }

    /// Add a value to the filter.
    ///
    /// Every hash function is evaluated before any bit is set, so a failing function
    /// leaves the filter untouched.
    pub fn set(&mut self, value: i64) -> Result<()> {
        if !self.is_ready() {
            return Err(Error::NotReady);
        }
        let mut positions = [0; MAX_HASH_FUNCTIONS];
        let k = self.hashers.len();

        for (position, hash) in positions.iter_mut().zip(self.hashers.hashes(value)) {
            *position = self.index(hash?);
        }
        for &index in &positions[..k] {
            tracing::trace!(value, index, "setting bit");
            self.bits.set(index);
        }
        self.size += 1;

        Ok(())
    }

    /// Return whether or not a given value is likely in the filter. There is a
    /// possibility for a false positive, but a false negative will never occur.
    pub fn is_set(&self, value: i64) -> Result<bool> {
        if !self.is_ready() {
            return Err(Error::NotReady);
        }
        for hash in self.hashers.hashes(value) {
            let index = self.index(hash?);

            tracing::trace!(value, index, "probing bit");

            if !self.bits.is_set(index) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Set all bits to zero and reset the size. Registered hash functions are kept.
    pub fn clear(&mut self) {
        tracing::debug!(size = self.size, "clearing bloom filter");

        self.bits.clear();
        self.size = 0;
    }

    /// Number of successful [`BloomFilter::set`] calls since creation or the last clear.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The capacity the filter was sized for.
    pub fn cap(&self) -> usize {
        self.config.capacity()
    }

    /// Number of hash functions used (`k` parameter).
    pub fn hashes(&self) -> usize {
        self.config.params().hashes
    }

    /// Return the number of bits in this filter.
    pub fn bits(&self) -> usize {
        self.bits.len()
    }

    /// Return the number of bytes backing this filter.
    pub fn bytes(&self) -> usize {
        self.bits.as_bytes().len()
    }

    /// The filter's configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Return the underlying bytes storage.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_bytes()
    }

    /// Approximate the number of distinct values in the filter from its fill ratio.
    pub fn estimated_count(&self) -> usize {
        let nbits = self.bits.len() as f64;
        let nbits_unset = self.bits.count_zeros() as f64;
        let nhashes = self.hashes() as f64;
        let count = -(nbits / nhashes) * (nbits_unset / nbits).ln();

        count.round() as usize
    }

    /// The probability that a value which was never set currently reports as set.
    pub fn current_false_positive_rate(&self) -> f64 {
        let fill = self.bits.count_ones() as f64 / self.bits.len() as f64;

        fill.powi(self.hashes() as i32)
    }

    /// Map a hash result to a bit index. Negative results wrap around, so
    /// `-1` is the last bit.
    fn index(&self, hash: i64) -> usize {
        hash.rem_euclid(self.bits.len() as i64) as usize
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("config", &self.config)
            .field("hashers", &self.hashers)
            .field("bits", &self.bits.len())
            .field("ones", &self.bits.count_ones())
            .field("size", &self.size)
            .finish()
    }
}
