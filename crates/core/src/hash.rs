//! Stable structural hashing and per-field equality policies.
//!
//! Hash codes of value objects are computed once, at construction, by folding
//! every field through a [`HashComposer`]. Field hashes come from xxh3 so they
//! do not drift between builds or toolchain versions; callers may key external
//! caches by them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use xxhash_rust::xxh3::xxh3_64;

use crate::custom_data::CustomData;

/// Hash contribution of an absent optional field.
pub const ABSENT: u64 = 0;

/// A hash that depends only on a value's content.
pub trait StableHash {
    fn stable_hash(&self) -> u64;
}

impl StableHash for str {
    fn stable_hash(&self) -> u64 {
        xxh3_64(self.as_bytes())
    }
}

impl StableHash for String {
    fn stable_hash(&self) -> u64 {
        self.as_str().stable_hash()
    }
}

impl StableHash for bool {
    fn stable_hash(&self) -> u64 {
        if *self { 1231 } else { 1237 }
    }
}

macro_rules! impl_stable_hash_for_int {
    ($($t:ty),*) => {
        $(
            impl StableHash for $t {
                fn stable_hash(&self) -> u64 {
                    xxh3_64(&self.to_le_bytes())
                }
            }
        )*
    };
}

impl_stable_hash_for_int!(u8, i32, u32, i64, u64);

impl StableHash for Decimal {
    /// `1.50` and `1.5` are equal decimals and must hash alike.
    fn stable_hash(&self) -> u64 {
        xxh3_64(self.normalize().to_string().as_bytes())
    }
}

impl StableHash for DateTime<Utc> {
    fn stable_hash(&self) -> u64 {
        let mut buf = [0u8; 12];
        buf[..8].copy_from_slice(&self.timestamp().to_le_bytes());
        buf[8..].copy_from_slice(&self.timestamp_subsec_nanos().to_le_bytes());
        xxh3_64(&buf)
    }
}

impl StableHash for Value {
    /// Hashes the compact rendering; object keys are sorted by `serde_json::Map`.
    fn stable_hash(&self) -> u64 {
        xxh3_64(self.to_string().as_bytes())
    }
}

impl<T: StableHash + ?Sized> StableHash for &T {
    fn stable_hash(&self) -> u64 {
        (**self).stable_hash()
    }
}

impl<T: StableHash> StableHash for Option<T> {
    fn stable_hash(&self) -> u64 {
        match self {
            Some(value) => value.stable_hash(),
            None => ABSENT,
        }
    }
}

/// Ordered sequences: position matters.
impl<T: StableHash> StableHash for [T] {
    fn stable_hash(&self) -> u64 {
        let mut acc = (self.len() as u64).stable_hash();
        for item in self {
            acc = acc.rotate_left(7) ^ item.stable_hash().wrapping_mul(31);
        }
        acc
    }
}

impl<T: StableHash> StableHash for Vec<T> {
    fn stable_hash(&self) -> u64 {
        self.as_slice().stable_hash()
    }
}

/// Case-insensitive view of a string field, for hashing.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreCase<'a>(pub &'a str);

impl StableHash for IgnoreCase<'_> {
    fn stable_hash(&self) -> u64 {
        self.0.to_lowercase().stable_hash()
    }
}

/// Case-insensitive view of an optional string field.
pub fn ignore_case(value: Option<&str>) -> Option<IgnoreCase<'_>> {
    value.map(IgnoreCase)
}

/// Case-insensitive string equality (consistent with [`IgnoreCase`] hashing).
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Both absent, or both present and equal ignoring case.
pub fn opt_eq_ignore_case(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => eq_ignore_case(a, b),
        _ => false,
    }
}

/// Folds field hashes into a single value-object hash.
///
/// Each field is multiplied by a small odd constant tied to its position and
/// XOR-ed into the accumulator; the extension payload goes last. Multipliers
/// are part of a type's contract and must not change.
///
/// ```
/// use ocppvo_core::hash::HashComposer;
///
/// let a = HashComposer::new().field(3, "EVSE").field(5, &Some(1u32)).finish(None);
/// let b = HashComposer::new().field(3, "EVSE").field(5, &Some(1u32)).finish(None);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HashComposer {
    acc: u64,
}

impl HashComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<T: StableHash + ?Sized>(mut self, multiplier: u64, value: &T) -> Self {
        self.acc ^= value.stable_hash().wrapping_mul(multiplier);
        self
    }

    pub fn finish(self, custom_data: Option<&CustomData>) -> u64 {
        self.acc ^ custom_data.stable_hash()
    }
}
