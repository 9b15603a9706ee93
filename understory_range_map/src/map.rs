// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interval map contract shared by all backings.

use core::fmt;

use crate::range::{IndexRange, IndexType};

/// Which side(s) of an entry survive a [`IntervalMap::split`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SplitOp {
    /// Keep both `[begin, index)` and `[index, end)`, each carrying a clone of the value.
    KeepBoth,
    /// Keep only `[begin, index)`.
    KeepLower,
    /// Keep only `[index, end)`.
    KeepUpper,
}

impl SplitOp {
    /// Returns `true` if the lower half survives.
    #[must_use]
    pub const fn keeps_lower(self) -> bool {
        matches!(self, Self::KeepBoth | Self::KeepLower)
    }

    /// Returns `true` if the upper half survives.
    #[must_use]
    pub const fn keeps_upper(self) -> bool {
        matches!(self, Self::KeepBoth | Self::KeepUpper)
    }
}

/// Error returned when an insertion would overlap an existing entry.
///
/// The rejected value is handed back so the caller can retry without cloning.
pub struct OverlapError<T> {
    /// The key that was rejected.
    pub range: IndexRange,
    /// The value that was not inserted.
    pub value: T,
}

impl<T> fmt::Debug for OverlapError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlapError")
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for OverlapError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interval {:?} overlaps an existing entry", self.range)
    }
}

impl<T> core::error::Error for OverlapError<T> {}

/// An ordered mapping from non-overlapping, non-empty [`IndexRange`] keys to values.
///
/// Entries are ordered by interval start. Adjacent entries are never merged implicitly, even
/// when their values compare equal; callers decide the granularity.
///
/// Lookups are expressed in terms of a single index:
/// - [`get`](Self::get) returns the entry *containing* the index.
/// - [`lower_bound`](Self::lower_bound) returns the first entry that ends after the index,
///   which is either the containing entry or the first entry past a gap.
pub trait IntervalMap {
    /// Stored value type.
    type Value;

    /// Iterator over `(key, value)` pairs in ascending key order.
    type Iter<'a>: Iterator<Item = (IndexRange, &'a Self::Value)>
    where
        Self: 'a;

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    fn clear(&mut self);

    /// Iterates all entries in ascending key order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Iterates entries starting at [`lower_bound(index)`](Self::lower_bound).
    fn iter_from(&self, index: IndexType) -> Self::Iter<'_>;

    /// Returns the value stored under exactly `key`.
    fn find(&self, key: IndexRange) -> Option<&Self::Value>;

    /// Returns the entry whose key contains `index`.
    fn get(&self, index: IndexType) -> Option<(IndexRange, &Self::Value)>;

    /// Returns the first entry whose key ends after `index`.
    fn lower_bound(&self, index: IndexType) -> Option<(IndexRange, &Self::Value)> {
        self.iter_from(index).next()
    }

    /// Inserts `value` under `range` if no existing entry overlaps it.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty or lies outside the backing's domain.
    fn try_insert(
        &mut self,
        range: IndexRange,
        value: Self::Value,
    ) -> Result<(), OverlapError<Self::Value>>;

    /// Inserts `value` under `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` overlaps an existing entry, is empty, or lies outside the
    /// backing's domain.
    fn insert(&mut self, range: IndexRange, value: Self::Value) {
        if let Err(err) = self.try_insert(range, value) {
            panic!("{err}");
        }
    }

    /// Splits the entry containing `index` at `index`, keeping the side(s) selected by `op`.
    ///
    /// Returns `false` when no entry contains `index`. Splitting at an entry's first index
    /// leaves an empty lower half, which is dropped.
    fn split(&mut self, index: IndexType, op: SplitOp) -> bool
    where
        Self::Value: Clone;

    /// Replaces everything under `range` with a single entry holding `value`.
    ///
    /// Entries straddling either boundary are split and keep their outside portion.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty or lies outside the backing's domain.
    fn overwrite_range(&mut self, range: IndexRange, value: Self::Value)
    where
        Self::Value: Clone;

    /// Removes everything under `range`, splitting straddling entries.
    fn remove_range(&mut self, range: IndexRange)
    where
        Self::Value: Clone;
}

/// Shared split arithmetic: the surviving `(lower, upper)` halves of `whole` split at `index`.
pub(crate) fn split_halves(
    whole: IndexRange,
    index: IndexType,
    op: SplitOp,
) -> (Option<IndexRange>, Option<IndexRange>) {
    let lower = IndexRange::new(whole.begin, index);
    let upper = IndexRange::new(index, whole.end);
    (
        (op.keeps_lower() && !lower.is_empty()).then_some(lower),
        (op.keeps_upper() && !upper.is_empty()).then_some(upper),
    )
}
