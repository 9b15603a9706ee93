// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse backing: a `BTreeMap` keyed by interval start. Suits large or unbounded domains.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map;

use crate::map::{IntervalMap, OverlapError, SplitOp, split_halves};
use crate::range::{IndexRange, IndexType};

/// Tree-backed interval map over `[0, limit)`, the whole [`IndexType`] domain by default.
#[derive(Clone, Debug)]
pub struct TreeIntervalMap<T> {
    limit: IndexType,
    // begin -> (end, value)
    entries: BTreeMap<IndexType, (IndexType, T)>,
}

impl<T> Default for TreeIntervalMap<T> {
    fn default() -> Self {
        Self::with_limit(IndexType::MAX)
    }
}

impl<T> TreeIntervalMap<T> {
    /// Creates an empty map over the whole [`IndexType`] domain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map accepting keys within `[0, limit)`.
    #[must_use]
    pub fn with_limit(limit: IndexType) -> Self {
        Self {
            limit,
            entries: BTreeMap::new(),
        }
    }

    /// Exclusive upper bound of the key domain.
    #[must_use]
    pub fn limit(&self) -> IndexType {
        self.limit
    }

    fn assert_in_domain(&self, range: IndexRange) {
        assert!(!range.is_empty(), "interval map keys must be non-empty");
        assert!(
            range.end <= self.limit,
            "interval {range:?} lies outside the map domain [0, {})",
            self.limit
        );
    }

    fn containing(&self, index: IndexType) -> Option<IndexRange> {
        let (&begin, &(end, _)) = self.entries.range(..=index).next_back()?;
        (index < end).then(|| IndexRange::new(begin, end))
    }

    fn remove_span(&mut self, range: IndexRange)
    where
        T: Clone,
    {
        self.split(range.begin, SplitOp::KeepBoth);
        self.split(range.end, SplitOp::KeepBoth);
        let mut tail = self.entries.split_off(&range.begin);
        let mut rest = tail.split_off(&range.end);
        self.entries.append(&mut rest);
    }
}

/// Iterator over a [`TreeIntervalMap`].
#[derive(Clone, Debug)]
pub struct TreeIter<'a, T> {
    inner: btree_map::Range<'a, IndexType, (IndexType, T)>,
}

impl<'a, T> Iterator for TreeIter<'a, T> {
    type Item = (IndexRange, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(&begin, (end, value))| (IndexRange::new(begin, *end), value))
    }
}

impl<T> IntervalMap for TreeIntervalMap<T> {
    type Value = T;
    type Iter<'a>
        = TreeIter<'a, T>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn iter(&self) -> Self::Iter<'_> {
        TreeIter {
            inner: self.entries.range(..),
        }
    }

    fn iter_from(&self, index: IndexType) -> Self::Iter<'_> {
        let start = self.containing(index).map_or(index, |range| range.begin);
        TreeIter {
            inner: self.entries.range(start..),
        }
    }

    fn find(&self, key: IndexRange) -> Option<&T> {
        let (end, value) = self.entries.get(&key.begin)?;
        (*end == key.end).then_some(value)
    }

    fn get(&self, index: IndexType) -> Option<(IndexRange, &T)> {
        let range = self.containing(index)?;
        let (_, value) = self.entries.get(&range.begin)?;
        Some((range, value))
    }

    fn try_insert(&mut self, range: IndexRange, value: T) -> Result<(), OverlapError<T>> {
        self.assert_in_domain(range);
        let overlaps = self.containing(range.begin).is_some()
            || self.entries.range(range.begin..range.end).next().is_some();
        if overlaps {
            return Err(OverlapError { range, value });
        }
        self.entries.insert(range.begin, (range.end, value));
        Ok(())
    }

    fn split(&mut self, index: IndexType, op: SplitOp) -> bool
    where
        Self::Value: Clone,
    {
        let Some(whole) = self.containing(index) else {
            return false;
        };
        if whole.begin == index && op.keeps_upper() {
            // Nothing below the split point; the entry is already the upper half.
            return true;
        }
        let Some((_, value)) = self.entries.remove(&whole.begin) else {
            return false;
        };
        match split_halves(whole, index, op) {
            (Some(lower), Some(upper)) => {
                let upper_value = value.clone();
                self.entries.insert(lower.begin, (lower.end, value));
                self.entries.insert(upper.begin, (upper.end, upper_value));
            }
            (Some(kept), None) | (None, Some(kept)) => {
                self.entries.insert(kept.begin, (kept.end, value));
            }
            (None, None) => {}
        }
        true
    }

    fn overwrite_range(&mut self, range: IndexRange, value: T)
    where
        Self::Value: Clone,
    {
        self.assert_in_domain(range);
        self.remove_span(range);
        self.entries.insert(range.begin, (range.end, value));
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
