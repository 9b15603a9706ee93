// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_subresource --heading-base-level=0

//! Understory Subresource: linear encoding of GPU image subresources.
//!
//! An image is divided into subresources along three axes: aspect (color, depth, stencil,
//! or a plane of a multi-planar format), mip level, and array layer. Tracking state such as
//! layouts or access masks per subresource is cheapest when the subresources map onto a
//! dense integer domain and state is stored against contiguous runs of it. This crate
//! provides that mapping and the machinery to walk it:
//!
//! - [`AspectTraits`]: the canonical aspect combinations and the order of their bits.
//! - [`RangeEncoder`]: a bijection between subresources and `0..subresource_count()`,
//!   layer fastest, then mip level, then aspect.
//! - [`OffsetRangeEncoder`] and [`LayoutRangeEncoder`]: the same bijection with texel
//!   offsets or memory-layout elements as slower outer axes.
//! - [`SubresourceCursor`] and friends: coordinate walkers in encoding order.
//! - [`RangeGenerator`] and [`OffsetRangeGenerator`]: the minimal ascending sequence of
//!   contiguous [`IndexRange`]s covering a selection.
//! - [`MapView`]: iterates the valued subresources of a selection in an [`IntervalMap`],
//!   querying the map once per constant-value run.
//!
//! The interval maps themselves live in `understory_range_map` and are re-exported here.
//! [`SubresourceMap`] is the hybrid map with the default threshold.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_subresource::{
//!     AspectFlags, IntervalMap, MapView, RangeEncoder, RangeGenerator, SubresourceMap,
//!     SubresourceRange,
//! };
//!
//! let encoder = RangeEncoder::new(SubresourceRange::full(
//!     AspectFlags::DEPTH | AspectFlags::STENCIL,
//!     3,
//!     4,
//! ));
//! assert_eq!(encoder.subresource_count(), 24);
//!
//! // Record a state for every stencil subresource.
//! let stencil = SubresourceRange::full(AspectFlags::STENCIL, 3, 4);
//! let mut map = SubresourceMap::new(encoder.subresource_count());
//! for range in RangeGenerator::new(&encoder, stencil) {
//!     map.overwrite_range(range, "attachment");
//! }
//! assert_eq!(map.len(), 1);
//!
//! // Read it back for the stencil aspect of mip level 1.
//! let view = MapView::new(&map, &encoder);
//! let layers: Vec<_> = view
//!     .iter(SubresourceRange::new(AspectFlags::STENCIL, 1, 1, 0, 4))
//!     .map(|item| item.subresource.array_layer)
//!     .collect();
//! assert_eq!(layers, [0, 1, 2, 3]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod aspect;
mod cursor;
mod encoder;
mod error;
mod generator;
mod layout_encoder;
mod map_view;
mod offset_encoder;
mod offset_generator;
pub mod trace;
mod types;

pub use aspect::{AspectFlags, AspectTraits};
pub use cursor::{SubresourceCursor, SubresourceLayoutCursor, SubresourceOffsetCursor};
pub use encoder::RangeEncoder;
pub use error::EncoderError;
pub use generator::RangeGenerator;
pub use layout_encoder::LayoutRangeEncoder;
pub use map_view::{MapView, MapViewItem, MapViewIter};
pub use offset_encoder::OffsetRangeEncoder;
pub use offset_generator::OffsetRangeGenerator;
pub use trace::{ViewEvent, ViewTrace, ViewTraceRecorder};
pub use types::{
    Extent2D, Extent3D, ImageSubresource, MemoryLayout, Offset2D, Offset3D, Subresource,
    SubresourceLayout, SubresourceOffset, SubresourceRange,
};

pub use understory_range_map::{
    DEFAULT_HYBRID_THRESHOLD, HybridIntervalMap, IndexRange, IndexType, IntervalMap, MapMode,
};

/// Per-subresource state storage with the default compact-to-tree threshold.
pub type SubresourceMap<T> = HybridIntervalMap<T, DEFAULT_HYBRID_THRESHOLD>;
