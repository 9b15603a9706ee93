// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Half-open intervals over the linear index space.

use core::fmt;
use core::ops::{Add, AddAssign, Range};

/// Scalar type of the linear index space.
pub type IndexType = u64;

/// A half-open interval `[begin, end)` over [`IndexType`].
///
/// `IndexRange` is `Copy` (unlike [`core::ops::Range`]), which keeps cursor and generator
/// state cheap to snapshot. The all-zero value doubles as the "past the end" tombstone
/// used by range generators.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct IndexRange {
    /// First index in the interval.
    pub begin: IndexType,
    /// One past the last index in the interval.
    pub end: IndexType,
}

impl IndexRange {
    /// The canonical empty interval `[0, 0)`.
    pub const EMPTY: Self = Self { begin: 0, end: 0 };

    /// Creates a new interval.
    ///
    /// # Panics
    ///
    /// Panics if `begin > end`.
    #[must_use]
    pub const fn new(begin: IndexType, end: IndexType) -> Self {
        assert!(begin <= end, "IndexRange begin must not exceed end");
        Self { begin, end }
    }

    /// Creates the interval `[begin, begin + len)`.
    #[must_use]
    pub const fn from_len(begin: IndexType, len: IndexType) -> Self {
        Self {
            begin,
            end: begin + len,
        }
    }

    /// Returns `true` if the interval contains no indices.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.begin >= self.end
    }

    /// Returns the number of indices in the interval.
    #[must_use]
    pub const fn len(self) -> IndexType {
        self.end.saturating_sub(self.begin)
    }

    /// Returns `true` if `index` lies within `[begin, end)`.
    #[must_use]
    pub const fn includes(self, index: IndexType) -> bool {
        self.begin <= index && index < self.end
    }

    /// Returns `true` if `other` is entirely inside `self`.
    #[must_use]
    pub const fn contains_range(self, other: Self) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Returns `true` if the two intervals share at least one index.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Returns the overlap of the two intervals, or [`IndexRange::EMPTY`] when disjoint.
    #[must_use]
    pub fn intersection(self, other: Self) -> Self {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        if begin < end {
            Self { begin, end }
        } else {
            Self::EMPTY
        }
    }

    /// Returns `true` if `other` begins exactly where `self` ends.
    #[must_use]
    pub const fn precedes(self, other: Self) -> bool {
        self.end == other.begin
    }

    /// Converts to a standard library range.
    #[must_use]
    pub const fn as_range(self) -> Range<IndexType> {
        self.begin..self.end
    }
}

impl Add<IndexType> for IndexRange {
    type Output = Self;

    fn add(self, offset: IndexType) -> Self {
        Self {
            begin: self.begin + offset,
            end: self.end + offset,
        }
    }
}

impl AddAssign<IndexType> for IndexRange {
    fn add_assign(&mut self, offset: IndexType) {
        self.begin += offset;
        self.end += offset;
    }
}

impl From<Range<IndexType>> for IndexRange {
    fn from(range: Range<IndexType>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<IndexRange> for Range<IndexType> {
    fn from(range: IndexRange) -> Self {
        range.as_range()
    }
}

impl fmt::Debug for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}
