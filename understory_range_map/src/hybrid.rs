// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single interval map type that picks a compact or a tree backing at construction.

use crate::backends::array::{ArrayIntervalMap, ArrayIter};
use crate::backends::tree::{TreeIntervalMap, TreeIter};
use crate::map::{IntervalMap, OverlapError, SplitOp};
use crate::range::{IndexRange, IndexType};

/// Default domain-size threshold at or below which [`HybridIntervalMap`] uses the compact backing.
pub const DEFAULT_HYBRID_THRESHOLD: usize = 16;

/// Which backing a [`HybridIntervalMap`] uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MapMode {
    /// Array-backed, for domains of at most `N` indices.
    Small,
    /// Tree-backed, for larger domains.
    Big,
}

/// Interval map that is array-backed for small domains and tree-backed otherwise.
///
/// The mode is fixed when the map is created and never changes afterwards. Every
/// [`IntervalMap`] operation dispatches to the active backing, so callers can use one type
/// regardless of domain size. Performance-sensitive code that is already generic over
/// [`IntervalMap`] can reach the backing directly through [`small`](Self::small) or
/// [`big`](Self::big) and skip the per-call dispatch.
///
/// ```rust
/// use understory_range_map::{HybridIntervalMap, IndexRange, IntervalMap, MapMode};
///
/// let mut small = HybridIntervalMap::<u8, 16>::new(12);
/// assert_eq!(small.mode(), MapMode::Small);
/// small.insert(IndexRange::new(0, 4), 1);
///
/// let big = HybridIntervalMap::<u8, 16>::new(1 << 20);
/// assert_eq!(big.mode(), MapMode::Big);
/// assert_eq!(small.get(2), Some((IndexRange::new(0, 4), &1)));
/// ```
#[derive(Clone, Debug)]
pub enum HybridIntervalMap<T, const N: usize> {
    /// Compact backing.
    Small(ArrayIntervalMap<T, N>),
    /// Tree backing.
    Big(TreeIntervalMap<T>),
}

impl<T, const N: usize> Default for HybridIntervalMap<T, N> {
    fn default() -> Self {
        Self::Big(TreeIntervalMap::new())
    }
}

impl<T, const N: usize> HybridIntervalMap<T, N> {
    /// Creates a map for the domain `[0, limit)`, compact if `limit <= N`.
    #[must_use]
    pub fn new(limit: IndexType) -> Self {
        if limit <= IndexType::try_from(N).unwrap_or(IndexType::MAX) {
            Self::Small(ArrayIntervalMap::new(limit))
        } else {
            Self::Big(TreeIntervalMap::with_limit(limit))
        }
    }

    /// Exclusive upper bound of the key domain, whichever backing is active.
    #[must_use]
    pub fn limit(&self) -> IndexType {
        match self {
            Self::Small(map) => map.limit(),
            Self::Big(map) => map.limit(),
        }
    }

    /// Returns the active backing mode.
    #[must_use]
    pub fn mode(&self) -> MapMode {
        match self {
            Self::Small(_) => MapMode::Small,
            Self::Big(_) => MapMode::Big,
        }
    }

    /// Returns `true` if the compact backing is active.
    #[must_use]
    pub fn is_small(&self) -> bool {
        matches!(self, Self::Small(_))
    }

    /// Returns `true` if the tree backing is active.
    #[must_use]
    pub fn is_big(&self) -> bool {
        matches!(self, Self::Big(_))
    }

    /// Returns the compact backing, if active.
    #[must_use]
    pub fn as_small(&self) -> Option<&ArrayIntervalMap<T, N>> {
        match self {
            Self::Small(map) => Some(map),
            Self::Big(_) => None,
        }
    }

    /// Returns the tree backing, if active.
    #[must_use]
    pub fn as_big(&self) -> Option<&TreeIntervalMap<T>> {
        match self {
            Self::Big(map) => Some(map),
            Self::Small(_) => None,
        }
    }

    /// Returns the compact backing.
    ///
    /// # Panics
    ///
    /// Panics if the map is in [`MapMode::Big`].
    #[must_use]
    pub fn small(&self) -> &ArrayIntervalMap<T, N> {
        match self {
            Self::Small(map) => map,
            Self::Big(_) => panic!("compact backing requested from a tree-backed map"),
        }
    }

    /// Returns the compact backing mutably.
    ///
    /// # Panics
    ///
    /// Panics if the map is in [`MapMode::Big`].
    pub fn small_mut(&mut self) -> &mut ArrayIntervalMap<T, N> {
        match self {
            Self::Small(map) => map,
            Self::Big(_) => panic!("compact backing requested from a tree-backed map"),
        }
    }

    /// Returns the tree backing.
    ///
    /// # Panics
    ///
    /// Panics if the map is in [`MapMode::Small`].
    #[must_use]
    pub fn big(&self) -> &TreeIntervalMap<T> {
        match self {
            Self::Big(map) => map,
            Self::Small(_) => panic!("tree backing requested from a compact map"),
        }
    }

    /// Returns the tree backing mutably.
    ///
    /// # Panics
    ///
    /// Panics if the map is in [`MapMode::Small`].
    pub fn big_mut(&mut self) -> &mut TreeIntervalMap<T> {
        match self {
            Self::Big(map) => map,
            Self::Small(_) => panic!("tree backing requested from a compact map"),
        }
    }
}

/// Iterator over a [`HybridIntervalMap`].
#[derive(Clone, Debug)]
pub enum HybridIter<'a, T> {
    /// Iterating the compact backing.
    Small(ArrayIter<'a, T>),
    /// Iterating the tree backing.
    Big(TreeIter<'a, T>),
}

impl<'a, T> Iterator for HybridIter<'a, T> {
    type Item = (IndexRange, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Small(it) => it.next(),
            Self::Big(it) => it.next(),
        }
    }
}

impl<T, const N: usize> IntervalMap for HybridIntervalMap<T, N> {
    type Value = T;
    type Iter<'a>
        = HybridIter<'a, T>
    where
        Self: 'a;

    fn len(&self) -> usize {
        match self {
            Self::Small(map) => map.len(),
            Self::Big(map) => map.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Small(map) => map.clear(),
            Self::Big(map) => map.clear(),
        }
    }

    fn iter(&self) -> Self::Iter<'_> {
        match self {
            Self::Small(map) => HybridIter::Small(map.iter()),
            Self::Big(map) => HybridIter::Big(map.iter()),
        }
    }

    fn iter_from(&self, index: IndexType) -> Self::Iter<'_> {
        match self {
            Self::Small(map) => HybridIter::Small(map.iter_from(index)),
            Self::Big(map) => HybridIter::Big(map.iter_from(index)),
        }
    }

    fn find(&self, key: IndexRange) -> Option<&T> {
        match self {
            Self::Small(map) => map.find(key),
            Self::Big(map) => map.find(key),
        }
    }

    fn get(&self, index: IndexType) -> Option<(IndexRange, &T)> {
        match self {
            Self::Small(map) => map.get(index),
            Self::Big(map) => map.get(index),
        }
    }

    fn lower_bound(&self, index: IndexType) -> Option<(IndexRange, &T)> {
        match self {
            Self::Small(map) => map.lower_bound(index),
            Self::Big(map) => map.lower_bound(index),
        }
    }

    fn try_insert(&mut self, range: IndexRange, value: T) -> Result<(), OverlapError<T>> {
        match self {
            Self::Small(map) => map.try_insert(range, value),
            Self::Big(map) => map.try_insert(range, value),
        }
    }

    fn split(&mut self, index: IndexType, op: SplitOp) -> bool
    where
        Self::Value: Clone,
    {
        match self {
            Self::Small(map) => map.split(index, op),
            Self::Big(map) => map.split(index, op),
        }
    }

    fn overwrite_range(&mut self, range: IndexRange, value: T)
    where
        Self::Value: Clone,
    {
        match self {
            Self::Small(map) => map.overwrite_range(range, value),
            Self::Big(map) => map.overwrite_range(range, value),
        }
    }

    fn remove_range(&mut self, range: IndexRange)
    where
        Self::Value: Clone,
    {
        match self {
            Self::Small(map) => map.remove_range(range),
            Self::Big(map) => map.remove_range(range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_threshold() {
        assert!(HybridIntervalMap::<u8, 4>::new(4).is_small());
        assert!(HybridIntervalMap::<u8, 4>::new(5).is_big());
        assert!(HybridIntervalMap::<u8, 4>::default().is_big());
    }

    #[test]
    fn option_accessors_match_mode() {
        let map = HybridIntervalMap::<u8, 4>::new(2);
        assert!(map.as_small().is_some());
        assert!(map.as_big().is_none());
        assert_eq!(map.small().limit(), 2);
        assert_eq!(HybridIntervalMap::<u8, 4>::new(9).big().limit(), 9);
    }

    #[test]
    #[should_panic(expected = "tree backing requested from a compact map")]
    fn wrong_mode_accessor_panics() {
        let map = HybridIntervalMap::<u8, 4>::new(2);
        let _ = map.big();
    }
}
