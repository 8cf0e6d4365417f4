// Licensed under the MIT license.

//! Hash functions driving a filter.
//!
//! A filter does not hash values itself: it is configured with an ordered family
//! of [`HashFn`]s, one per bit position to set or probe. Any `Fn(i64) -> i64` is a
//! hash function; fallible functions are wrapped in [`Fallible`]. [`SipHashFamily`]
//! provides a ready-made family of independent seeded hashes.
use std::fmt;
use std::hash::Hasher;

use siphasher::sip::SipHasher13;

use crate::error::{BoxError, ConfigError, Error, Result};
use crate::params::MAX_HASH_FUNCTIONS;

/// A single hash function, mapping a value to an integer.
pub trait HashFn {
    /// Hash `value`. Errors are passed back to the caller of the filter operation.
    fn hash(&self, value: i64) -> std::result::Result<i64, BoxError>;
}

impl<F> HashFn for F
where
    F: Fn(i64) -> i64,
{
    fn hash(&self, value: i64) -> std::result::Result<i64, BoxError> {
        Ok(self(value))
    }
}

/// Adapter turning a fallible function into a [`HashFn`].
#[derive(Clone, Copy, Debug)]
pub struct Fallible<F>(pub F);

impl<F, E> HashFn for Fallible<F>
where
    F: Fn(i64) -> std::result::Result<i64, E>,
    E: Into<BoxError>,
{
    fn hash(&self, value: i64) -> std::result::Result<i64, BoxError> {
        (self.0)(value).map_err(Into::into)
    }
}

/// A hash function slot. `None` marks an entry that cannot be called.
pub type Slot = Option<Box<dyn HashFn>>;

/// The ordered hash functions registered with a filter.
///
/// Holds at most [`MAX_HASH_FUNCTIONS`] slots, of which the first `len` are in use.
pub struct HashFunctions {
    slots: [Slot; MAX_HASH_FUNCTIONS],
    len: usize,
}

impl HashFunctions {
    /// An empty set, with no functions registered.
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
            len: 0,
        }
    }

    /// Replace the registered functions with the first `required` of `slots`.
    ///
    /// Fails if fewer than `required` or more than [`MAX_HASH_FUNCTIONS`] slots are
    /// given, in which case the current functions are kept.
    pub fn replace(&mut self, slots: Vec<Slot>, required: usize) -> Result<()> {
        let count = slots.len();
        if count < required || count > MAX_HASH_FUNCTIONS {
            tracing::warn!(count, required, "rejecting hash functions");
            return Err(ConfigError::HashFnCount {
                count,
                min: required,
                max: MAX_HASH_FUNCTIONS,
            }
            .into());
        }
        // Drops the previous functions.
        self.slots = Default::default();
        for (target, slot) in self.slots.iter_mut().zip(slots.into_iter().take(required)) {
            *target = slot;
        }
        self.len = required;

        tracing::debug!(count, used = required, "hash functions registered");

        Ok(())
    }

    /// Number of functions in use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no functions are registered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Invoke every registered function on `value`, in registration order.
    ///
    /// The iterator yields one result per slot; it stops being useful after the first
    /// error, which the caller is expected to propagate.
    pub fn hashes(&self, value: i64) -> impl Iterator<Item = Result<i64>> + '_ {
        self.slots[..self.len]
            .iter()
            .enumerate()
            .map(move |(slot, f)| match f {
                Some(f) => f.hash(value).map_err(|source| Error::HashFn { slot, source }),
                None => Err(Error::NotCallable { slot }),
            })
    }
}

impl Default for HashFunctions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let callable: Vec<bool> = self.slots[..self.len].iter().map(Option::is_some).collect();
        f.debug_struct("HashFunctions")
            .field("len", &self.len)
            .field("callable", &callable)
            .finish()
    }
}

/// Seeds used for SipHash.
const HASHER_SEEDS: [[u8; 16]; 2] = [
    [
        136, 168, 28, 251, 141, 239, 69, 38, 166, 209, 98, 201, 2, 169, 146, 170,
    ],
    [
        103, 236, 177, 212, 54, 11, 66, 5, 194, 86, 6, 254, 82, 93, 203, 37,
    ],
];

/// A SipHash-1-3 instance keyed for one member of a [`SipHashFamily`].
#[derive(Clone, Copy, Debug)]
pub struct SipHashFn {
    hasher: SipHasher13,
}

impl SipHashFn {
    /// Create the `index`-th function of the family.
    pub fn new(index: usize) -> Self {
        let mut key = HASHER_SEEDS[index % 2];
        // Mix the index into the key so every member is independent.
        for (k, b) in key.iter_mut().zip((index as u64).to_le_bytes()) {
            *k ^= b;
        }
        Self {
            hasher: SipHasher13::new_with_key(&key),
        }
    }
}

impl HashFn for SipHashFn {
    fn hash(&self, value: i64) -> std::result::Result<i64, BoxError> {
        let mut sip = self.hasher;
        sip.write_i64(value);

        // Drop the sign bit so results are non-negative.
        Ok((sip.finish() >> 1) as i64)
    }
}

/// A family of independent seeded SipHash functions.
#[derive(Clone, Debug)]
pub struct SipHashFamily {
    members: Vec<SipHashFn>,
}

impl SipHashFamily {
    /// Create a family of `k` functions.
    pub fn new(k: usize) -> Self {
        Self {
            members: (0..k).map(SipHashFn::new).collect(),
        }
    }

    /// Number of functions in the family.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the family has no functions.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Box the members for registration with a filter.
    pub fn into_hash_fns(self) -> Vec<Box<dyn HashFn>> {
        self.members
            .into_iter()
            .map(|f| Box::new(f) as Box<dyn HashFn>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn slots(n: usize) -> Vec<Slot> {
        (0..n)
            .map(|i| Some(Box::new(move |v: i64| v + i as i64) as Box<dyn HashFn>))
            .collect()
    }

    #[test]
    fn test_closures_and_fallible() {
        let double = |v: i64| v * 2;
        assert_eq!(double.hash(21).unwrap(), 42);

        let checked = Fallible(|v: i64| {
            if v < 0 {
                Err("negative")
            } else {
                Ok(v)
            }
        });
        assert_eq!(checked.hash(3).unwrap(), 3);
        assert_eq!(checked.hash(-3).unwrap_err().to_string(), "negative");
    }

    #[test]
    fn test_replace_bounds() {
        let mut fns = HashFunctions::new();
        assert!(fns.is_empty());

        assert!(matches!(
            fns.replace(slots(2), 3),
            Err(Error::Config(ConfigError::HashFnCount {
                count: 2,
                min: 3,
                max: 16
            }))
        ));
        assert!(matches!(
            fns.replace(slots(17), 3),
            Err(Error::Config(ConfigError::HashFnCount { count: 17, .. }))
        ));
        assert!(fns.is_empty());

        fns.replace(slots(3), 3).unwrap();
        assert_eq!(fns.len(), 3);
        fns.replace(slots(16), 3).unwrap();
        assert_eq!(fns.len(), 3);
    }

    #[test]
    fn test_hashes_in_order() {
        let mut fns = HashFunctions::new();
        fns.replace(slots(5), 4).unwrap();

        let results: Vec<i64> = fns.hashes(10).map(|r| r.unwrap()).collect();
        assert_eq!(results, vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_empty_slot_is_not_callable() {
        let mut fns = HashFunctions::new();
        let mut given = slots(3);
        given[1] = None;
        fns.replace(given, 3).unwrap();

        let results: Vec<Result<i64>> = fns.hashes(0).collect();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::NotCallable { slot: 1 })));
    }

    #[test]
    fn test_replace_releases_previous() {
        let token = Rc::new(());
        let held = Rc::clone(&token);
        let mut fns = HashFunctions::new();

        fns.replace(
            vec![Some(
                Box::new(move |v: i64| v + Rc::strong_count(&held) as i64) as Box<dyn HashFn>
            )],
            1,
        )
        .unwrap();
        assert_eq!(Rc::strong_count(&token), 2);

        fns.replace(slots(1), 1).unwrap();
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn test_unused_extras_are_released() {
        let token = Rc::new(());
        let held = Rc::clone(&token);
        let mut given = slots(2);
        given.push(Some(
            Box::new(move |v: i64| v + Rc::strong_count(&held) as i64) as Box<dyn HashFn>
        ));

        let mut fns = HashFunctions::new();
        fns.replace(given, 2).unwrap();
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn test_sip_family_is_independent() {
        let family = SipHashFamily::new(16);
        assert_eq!(family.len(), 16);

        let outputs: HashSet<i64> = family
            .into_hash_fns()
            .iter()
            .map(|f| f.hash(42).unwrap())
            .collect();
        assert_eq!(outputs.len(), 16);
        assert!(outputs.iter().all(|h| *h >= 0));
    }

    #[test]
    fn test_sip_family_is_deterministic() {
        let a = SipHashFamily::new(4).into_hash_fns();
        let b = SipHashFamily::new(4).into_hash_fns();

        for (fa, fb) in a.iter().zip(b.iter()) {
            assert_eq!(fa.hash(-7).unwrap(), fb.hash(-7).unwrap());
        }
    }
}
