// Licensed under the MIT license.

//! Filter sizing.
//!
//! Given an expected capacity `n` and a target false positive rate `p`, the bit array
//! holds `n · ln(p) / ln(0.6185)` bits and `⌈-log₂(p)⌉` hash functions are used.
//! `0.6185 ≈ 2^(-ln 2)` is the false positive rate per bit-per-element at the optimal
//! load factor, so this is the usual `-n · ln(p) / (ln 2)²`.

use crate::error::{ConfigError, Result};

/// The default false positive probability value, 1%.
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

/// Maximum number of hash functions a filter can use.
pub const MAX_HASH_FUNCTIONS: usize = 16;

/// False positive rate contributed by each bit per element at the optimal load.
const OPTIMAL_LOAD_RATE: f64 = 0.6185;

/// Largest backing array, in bytes. Keeps every bit index representable as an `i64`.
pub const MAX_BYTES: usize = isize::MAX as usize / 8;

/// Sizing derived from a capacity and a false positive rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameters {
    /// Number of bits required by the formula.
    pub slots: usize,
    /// Number of bytes backing the bit array: `slots / 8 + 1`.
    ///
    /// The division rounds down and the extra byte covers any remainder, so this is
    /// never less than `⌈slots / 8⌉` and is one more when `slots` is a multiple of 8.
    pub bytes: usize,
    /// Number of hash functions (`k`).
    pub hashes: usize,
}

impl Parameters {
    /// Number of addressable bits in the backing storage.
    pub fn bits(&self) -> usize {
        self.bytes * 8
    }
}

/// Return the number of bits and hash functions for the given capacity and rate,
/// without building a filter.
///
/// Unlike [`compute_parameters`], the hash function count is not checked against
/// [`MAX_HASH_FUNCTIONS`], so callers can inspect any rate.
pub fn slots(capacity: usize, fp_rate: f64) -> Result<(usize, usize)> {
    validate(capacity, fp_rate)?;

    let slots = checked_slots(capacity, fp_rate)?;

    Ok((slots, optimal_hashes(fp_rate)))
}

/// Compute the full sizing of a filter.
pub fn compute_parameters(capacity: usize, fp_rate: f64) -> Result<Parameters> {
    validate(capacity, fp_rate)?;

    let hashes = optimal_hashes(fp_rate);
    if hashes > MAX_HASH_FUNCTIONS {
        tracing::warn!(fp_rate, hashes, "false positive rate needs too many hash functions");
        return Err(ConfigError::TooManyHashes {
            required: hashes,
            max: MAX_HASH_FUNCTIONS,
        }
        .into());
    }
    let slots = checked_slots(capacity, fp_rate)?;
    let bytes = slots / 8 + 1;
    if bytes > MAX_BYTES {
        tracing::warn!(capacity, fp_rate, bytes, "filter too large");
        return Err(ConfigError::TooLarge { capacity, fp_rate }.into());
    }

    Ok(Parameters {
        slots,
        bytes,
        hashes,
    })
}

/// Return the number of bits needed for `capacity` items at `fp_rate`, or `None` if
/// that many bits cannot be counted in a `usize`.
pub fn optimal_slots(capacity: usize, fp_rate: f64) -> Option<usize> {
    let slots = (capacity as f64) * (fp_rate.ln() / OPTIMAL_LOAD_RATE.ln());

    if slots.is_finite() && slots < usize::MAX as f64 {
        Some(slots as usize)
    } else {
        None
    }
}

fn checked_slots(capacity: usize, fp_rate: f64) -> Result<usize> {
    optimal_slots(capacity, fp_rate).ok_or_else(|| {
        tracing::warn!(capacity, fp_rate, "bit count overflows");
        ConfigError::TooLarge { capacity, fp_rate }.into()
    })
}

/// Return the number of hash functions needed to reach `fp_rate`.
///
/// Also called `k`.
pub fn optimal_hashes(fp_rate: f64) -> usize {
    (-fp_rate.log2()).ceil().max(1.) as usize
}

fn validate(capacity: usize, fp_rate: f64) -> Result<()> {
    if capacity == 0 {
        tracing::warn!("rejecting zero capacity");
        return Err(ConfigError::ZeroCapacity.into());
    }
    // Also rejects NaN.
    if !(fp_rate > 0. && fp_rate < 1.) {
        tracing::warn!(fp_rate, "rejecting false positive rate");
        return Err(ConfigError::RateOutOfRange(fp_rate).into());
    }
    Ok(())
}
