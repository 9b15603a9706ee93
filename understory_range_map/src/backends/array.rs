// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact backing: a sorted `SmallVec` of entries with binary search.
//!
//! Intended for bounded domains of at most `N` indices, in which case the map can never hold
//! more than `N` entries and never spills to the heap.

use core::fmt::{self, Debug};

use smallvec::SmallVec;

use crate::map::{IntervalMap, OverlapError, SplitOp, split_halves};
use crate::range::{IndexRange, IndexType};

/// Array-backed interval map over the bounded domain `[0, limit)`.
pub struct ArrayIntervalMap<T, const N: usize> {
    limit: IndexType,
    entries: SmallVec<[(IndexRange, T); N]>,
}

impl<T, const N: usize> ArrayIntervalMap<T, N> {
    /// Creates an empty map accepting keys within `[0, limit)`.
    #[must_use]
    pub fn new(limit: IndexType) -> Self {
        Self {
            limit,
            entries: SmallVec::new(),
        }
    }

    /// Exclusive upper bound of the key domain.
    #[must_use]
    pub fn limit(&self) -> IndexType {
        self.limit
    }

    /// Returns `true` if the entries have spilled out of inline storage.
    #[must_use]
    pub fn spilled(&self) -> bool {
        self.entries.spilled()
    }

    /// Position of the first entry whose end lies after `index`.
    #[inline]
    fn lower_bound_position(&self, index: IndexType) -> usize {
        self.entries.partition_point(|(r, _)| r.end <= index)
    }

    /// Position of the first entry starting at or after `index`.
    #[inline]
    fn start_position(&self, index: IndexType) -> usize {
        self.entries.partition_point(|(r, _)| r.begin < index)
    }

    fn assert_in_domain(&self, range: IndexRange) {
        assert!(!range.is_empty(), "interval map keys must be non-empty");
        assert!(
            range.end <= self.limit,
            "interval {range:?} lies outside the map domain [0, {})",
            self.limit
        );
    }

    fn remove_span(&mut self, range: IndexRange) -> usize
    where
        T: Clone,
    {
        self.split(range.begin, SplitOp::KeepBoth);
        self.split(range.end, SplitOp::KeepBoth);
        let lo = self.start_position(range.begin);
        let hi = self.start_position(range.end);
        self.entries.drain(lo..hi);
        lo
    }
}

impl<T: Debug, const N: usize> Debug for ArrayIntervalMap<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayIntervalMap")
            .field("limit", &self.limit)
            .field("capacity", &N)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<T: Clone, const N: usize> Clone for ArrayIntervalMap<T, N> {
    fn clone(&self) -> Self {
        Self {
            limit: self.limit,
            entries: self.entries.clone(),
        }
    }
}

/// Iterator over an [`ArrayIntervalMap`].
#[derive(Clone, Debug)]
pub struct ArrayIter<'a, T> {
    inner: core::slice::Iter<'a, (IndexRange, T)>,
}

impl<'a, T> Iterator for ArrayIter<'a, T> {
    type Item = (IndexRange, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(range, value)| (*range, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, const N: usize> IntervalMap for ArrayIntervalMap<T, N> {
    type Value = T;
    type Iter<'a>
        = ArrayIter<'a, T>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn iter(&self) -> Self::Iter<'_> {
        ArrayIter {
            inner: self.entries.iter(),
        }
    }

    fn iter_from(&self, index: IndexType) -> Self::Iter<'_> {
        let start = self.lower_bound_position(index);
        ArrayIter {
            inner: self.entries[start..].iter(),
        }
    }

    fn find(&self, key: IndexRange) -> Option<&T> {
        let pos = self
            .entries
            .binary_search_by_key(&key.begin, |(range, _)| range.begin)
            .ok()?;
        let (range, value) = &self.entries[pos];
        (*range == key).then_some(value)
    }

    fn get(&self, index: IndexType) -> Option<(IndexRange, &T)> {
        let (range, value) = self.entries.get(self.lower_bound_position(index))?;
        range.includes(index).then_some((*range, value))
    }

    fn try_insert(&mut self, range: IndexRange, value: T) -> Result<(), OverlapError<T>> {
        self.assert_in_domain(range);
        let pos = self.lower_bound_position(range.begin);
        if self
            .entries
            .get(pos)
            .is_some_and(|(existing, _)| existing.begin < range.end)
        {
            return Err(OverlapError { range, value });
        }
        self.entries.insert(pos, (range, value));
        Ok(())
    }

    fn split(&mut self, index: IndexType, op: SplitOp) -> bool
    where
        Self::Value: Clone,
    {
        let pos = self.lower_bound_position(index);
        let Some((whole, _)) = self.entries.get(pos) else {
            return false;
        };
        let whole = *whole;
        if !whole.includes(index) {
            return false;
        }
        match split_halves(whole, index, op) {
            (Some(lower), Some(upper)) => {
                let value = self.entries[pos].1.clone();
                self.entries[pos].0 = lower;
                self.entries.insert(pos + 1, (upper, value));
            }
            (Some(kept), None) | (None, Some(kept)) => self.entries[pos].0 = kept,
            (None, None) => {
                self.entries.remove(pos);
            }
        }
        true
    }

    fn overwrite_range(&mut self, range: IndexRange, value: T)
    where
        Self::Value: Clone,
    {
        self.assert_in_domain(range);
        let pos = self.remove_span(range);
        self.entries.insert(pos, (range, value));
    }

    fn remove_range(&mut self, range: IndexRange)
    where
        Self::Value: Clone,
    {
        if !range.is_empty() {
            self.remove_span(range);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn keys<const N: usize>(map: &ArrayIntervalMap<u32, N>) -> Vec<(IndexRange, u32)> {
        map.iter().map(|(r, v)| (r, *v)).collect()
    }

    #[test]
    fn insert_keeps_entries_sorted() {
        let mut map = ArrayIntervalMap::<u32, 8>::new(16);
        map.insert(IndexRange::new(8, 10), 2);
        map.insert(IndexRange::new(0, 4), 1);
        assert_eq!(
            keys(&map),
            [(IndexRange::new(0, 4), 1), (IndexRange::new(8, 10), 2)]
        );
        assert!(!map.spilled());
    }

    #[test]
    fn overlapping_insert_is_rejected() {
        let mut map = ArrayIntervalMap::<u32, 8>::new(16);
        map.insert(IndexRange::new(2, 6), 1);
        let err = map.try_insert(IndexRange::new(5, 7), 9).unwrap_err();
        assert_eq!(err.value, 9);
        assert_eq!(map.len(), 1);
        assert!(map.try_insert(IndexRange::new(6, 7), 9).is_ok());
    }

    #[test]
    #[should_panic(expected = "outside the map domain")]
    fn insert_outside_domain_panics() {
        let mut map = ArrayIntervalMap::<u32, 4>::new(4);
        map.insert(IndexRange::new(2, 5), 1);
    }

    #[test]
    fn split_at_first_index_with_keep_lower_drops_entry() {
        let mut map = ArrayIntervalMap::<u32, 8>::new(16);
        map.insert(IndexRange::new(2, 6), 1);
        assert!(map.split(2, SplitOp::KeepLower));
        assert!(map.is_empty());
    }

    #[test]
    fn overwrite_in_the_middle_splits_both_edges() {
        let mut map = ArrayIntervalMap::<u32, 8>::new(16);
        map.insert(IndexRange::new(0, 10), 1);
        map.overwrite_range(IndexRange::new(3, 5), 2);
        assert_eq!(
            keys(&map),
            [
                (IndexRange::new(0, 3), 1),
                (IndexRange::new(3, 5), 2),
                (IndexRange::new(5, 10), 1),
            ]
        );
    }
}
