//! Deduplicated, order-insensitive collection of value objects.

use crate::hash::StableHash;

/// A set of value objects.
///
/// Duplicates (by value equality) collapse on insertion; first occurrence
/// wins and keeps its position, so emission order is deterministic. Equality
/// and hashing ignore order.
#[derive(Debug, Clone)]
pub struct ValueSet<T> {
    items: Vec<T>,
}

impl<T: Eq> ValueSet<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Insert `item` unless an equal one is already present.
    ///
    /// Returns whether the item was added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Eq> Default for ValueSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq> FromIterator<T> for ValueSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<T: Eq> IntoIterator for ValueSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Eq> IntoIterator for &'a ValueSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Eq> PartialEq for ValueSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len() && self.items.iter().all(|item| other.contains(item))
    }
}

impl<T: Eq> Eq for ValueSet<T> {}

impl<T: StableHash> StableHash for ValueSet<T> {
    /// Commutative fold, so element order does not matter.
    fn stable_hash(&self) -> u64 {
        self.items
            .iter()
            .fold((self.items.len() as u64).stable_hash(), |acc, item| {
                acc.wrapping_add(item.stable_hash())
            })
    }
}
