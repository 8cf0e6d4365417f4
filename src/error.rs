// Licensed under the MIT license.

//! Error types.
use thiserror::Error;

/// Error type returned by user-supplied hash functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A filter configuration was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The expected capacity was zero.
    #[error("capacity must be greater than zero")]
    ZeroCapacity,
    /// The false positive rate was not strictly between 0 and 1.
    #[error("false positive rate must be in (0, 1), found {0}")]
    RateOutOfRange(f64),
    /// The false positive rate needs more hash functions than are supported.
    #[error("false positive rate requires {required} hash functions, at most {max} are supported")]
    TooManyHashes {
        /// Hash functions the rate would require.
        required: usize,
        /// Supported maximum.
        max: usize,
    },
    /// The bit array for this capacity and rate cannot be addressed or allocated.
    #[error("filter for capacity {capacity} at rate {fp_rate} is too large")]
    TooLarge {
        /// Requested capacity.
        capacity: usize,
        /// Requested false positive rate.
        fp_rate: f64,
    },
    /// The number of registered hash functions is out of bounds.
    #[error("{min} <= #hash functions ({count}) <= {max} required")]
    HashFnCount {
        /// Number of functions supplied.
        count: usize,
        /// Number of functions the filter needs.
        min: usize,
        /// Supported maximum.
        max: usize,
    },
}

/// An error returned by a filter operation.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid sizing or hash function registration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A value was set or queried before any hash functions were registered.
    #[error("hash functions not set")]
    NotReady,
    /// A registered slot holds no callable hash function.
    #[error("hash function slot {slot} is not callable")]
    NotCallable {
        /// Index of the empty slot.
        slot: usize,
    },
    /// A hash function returned an error.
    #[error("hash function {slot} failed: {source}")]
    HashFn {
        /// Index of the failing function.
        slot: usize,
        /// The error raised by the function.
        source: BoxError,
    },
}

impl Error {
    /// Return the error raised by a user hash function, if that is what this is.
    pub fn into_hash_fn_error(self) -> Option<BoxError> {
        match self {
            Error::HashFn { source, .. } => Some(source),
            _ => None,
        }
    }
}
