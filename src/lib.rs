//! A Bloom filter, a space-efficient probabilistic data structure, driven by a
//! family of hash functions chosen by the caller.
//!
//! # Bloom Filters
//!
//! A Bloom filter is used to test whether an element is a member of a set. It allows
//! for queries to return: "possibly in set" or "definitely not in set". Elements can be
//! added to the set, but not removed; the more elements that are added to the set, the
//! larger the probability of false positives.
//!
//! # Sizing
//!
//! A filter is sized from the number of elements it is expected to hold and a target
//! false positive rate. The rate fixes the number of hash functions `k = ⌈-log₂(p)⌉`,
//! which may not exceed [`MAX_HASH_FUNCTIONS`]. Use [`params::slots`] to inspect the
//! sizing without allocating a filter.
//!
//! # Hash Functions
//!
//! The filter does not hash values itself. After creation, exactly [`BloomFilter::hashes`]
//! (or up to [`MAX_HASH_FUNCTIONS`]) [`HashFn`]s are registered, and each is called once
//! per [`BloomFilter::set`] and [`BloomFilter::is_set`]. A set either sets every bit for
//! a value or, if a hash function fails, none at all.
//!
//! # Example
//!
//! ```
//! use bloomkit::{BloomFilter, HashFn};
//!
//! let mut filter = BloomFilter::new(1000).unwrap();
//! assert_eq!(filter.hashes(), 7);
//!
//! let primes = [2, 3, 5, 7, 11, 13, 17];
//! let fns = primes
//!     .iter()
//!     .map(|&p| Box::new(move |v: i64| v.wrapping_mul(p)) as Box<dyn HashFn>)
//!     .collect();
//! filter.set_hash_fns(fns).unwrap();
//!
//! filter.set(42).unwrap();
//!
//! filter.is_set(42).unwrap(); // true
//! filter.is_set(9999).unwrap(); // false
//!
//! filter.size(); // 1
//! ```
#![warn(missing_docs)]
#![allow(clippy::bool_assert_comparison)]

pub mod bitvec;
pub mod bloom;
pub mod error;
pub mod hash;
pub mod params;

pub use bloom::{BloomFilter, FilterConfig};
pub use error::{BoxError, ConfigError, Error, Result};
pub use hash::{Fallible, HashFn, HashFunctions, SipHashFamily, Slot};
pub use params::{DEFAULT_FALSE_POSITIVE_RATE, MAX_HASH_FUNCTIONS};
