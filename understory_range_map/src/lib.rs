// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_range_map --heading-base-level=0

//! Understory Range Map: ordered maps keyed by half-open integer intervals.
//!
//! Per-subresource state tracking stores values against contiguous runs of a dense linear
//! index space rather than against individual indices. This crate provides that storage:
//!
//! - [`IndexRange`]: a `Copy` half-open interval `[begin, end)` over [`IndexType`] (`u64`).
//! - [`IntervalMap`]: the contract every backing satisfies. Keys are non-empty and never
//!   overlap; lookups are by single index (`get`, `lower_bound`) or exact key (`find`);
//!   mutation is by `insert`, `split` (with a [`SplitOp`] policy), `overwrite_range`,
//!   and `remove_range`.
//! - [`ArrayIntervalMap`]: sorted entries in a `SmallVec` with binary search. Best for bounded
//!   domains with few indices, where it never allocates.
//! - [`TreeIntervalMap`]: entries in a `BTreeMap` keyed by interval start. Best for large or
//!   unbounded domains.
//! - [`HybridIntervalMap`]: a sum type over the two, picking the backing once from the domain
//!   size and a const threshold `N`.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_range_map::{IndexRange, IntervalMap, TreeIntervalMap};
//!
//! let mut map = TreeIntervalMap::new();
//! map.insert(IndexRange::new(0, 10), "initial");
//!
//! // Overwrite the middle; the straddled entry keeps its outside portions.
//! map.overwrite_range(IndexRange::new(4, 6), "written");
//!
//! let entries: Vec<_> = map.iter().map(|(range, value)| (range.as_range(), *value)).collect();
//! assert_eq!(entries, [(0..4, "initial"), (4..6, "written"), (6..10, "initial")]);
//!
//! // `lower_bound` finds the entry containing an index, or the next one past a gap.
//! assert_eq!(map.lower_bound(5).map(|(range, _)| range), Some(IndexRange::new(4, 6)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod backends;
mod hybrid;
mod map;
mod range;

pub use backends::array::{ArrayIntervalMap, ArrayIter};
pub use backends::tree::{TreeIntervalMap, TreeIter};
pub use hybrid::{DEFAULT_HYBRID_THRESHOLD, HybridIntervalMap, HybridIter, MapMode};
pub use map::{IntervalMap, OverlapError, SplitOp};
pub use range::{IndexRange, IndexType};
