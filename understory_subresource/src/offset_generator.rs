// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition of a texel region into contiguous linear index ranges.

use understory_range_map::IndexRange;

use crate::cursor::SubresourceOffsetCursor;
use crate::offset_encoder::OffsetRangeEncoder;
use crate::types::{Extent3D, Offset3D, SubresourceOffset, SubresourceRange, index};

/// Produces an ascending sequence of [`IndexRange`]s covering a texel region.
///
/// This is the [`RangeGenerator`](crate::RangeGenerator) state machine with two outer
/// axes: after the last aspect of a texel the generator moves to the next column, and
/// after the last column to the next row. When the selection covers every layer, mip
/// level, and aspect, whole columns merge; if it also starts at column 0 and spans the
/// image width, whole rows merge into one range regardless of the row offset.
///
/// ```rust
/// use understory_subresource::{
///     AspectFlags, Extent3D, Offset3D, OffsetRangeEncoder, OffsetRangeGenerator,
///     SubresourceRange,
/// };
///
/// let range = SubresourceRange::full(AspectFlags::COLOR, 1, 1);
/// let encoder = OffsetRangeEncoder::new(range, Extent3D::new(4, 4, 1));
/// let ranges: Vec<_> = OffsetRangeGenerator::new(
///     &encoder,
///     range,
///     Offset3D::new(1, 1, 0),
///     Extent3D::new(2, 2, 1),
/// )
/// .map(|range| range.as_range())
/// .collect();
/// assert_eq!(ranges, [5..7, 9..11]);
/// ```
#[derive(Clone, Debug)]
pub struct OffsetRangeGenerator<'a> {
    encoder: &'a OffsetRangeEncoder,
    cursor: SubresourceOffsetCursor<'a>,
    pos: IndexRange,
    aspect_base: IndexRange,
    offset_x_base: IndexRange,
    offset_y_base: IndexRange,
    mip_count: u32,
    mip_index: u32,
    aspect_count: u32,
    aspect_index: u32,
    offset_x_count: u32,
    offset_x_index: u32,
    offset_y_count: u32,
    offset_y_index: u32,
}

impl<'a> OffsetRangeGenerator<'a> {
    /// Creates a generator positioned at the first range of the region.
    ///
    /// On 3-D images `offset.z` and `extent.depth` select depth slices in place of the
    /// range's array layers. An empty region yields a generator that is already at its end.
    ///
    /// # Panics
    ///
    /// Panics if the region does not fit the encoder's domain
    /// (see [`OffsetRangeEncoder::is_valid_region`]).
    #[must_use]
    pub fn new(
        encoder: &'a OffsetRangeEncoder,
        range: SubresourceRange,
        offset: Offset3D,
        extent: Extent3D,
    ) -> Self {
        assert!(
            encoder.is_valid_region(&range, offset, extent),
            "region {range:?} at {offset:?} of {extent:?} does not fit the encoder's domain"
        );
        let cursor = SubresourceOffsetCursor::new(encoder, range, offset, extent);
        let base = encoder.base();
        let mut generator = Self {
            encoder,
            cursor,
            pos: IndexRange::EMPTY,
            aspect_base: IndexRange::EMPTY,
            offset_x_base: IndexRange::EMPTY,
            offset_y_base: IndexRange::EMPTY,
            mip_count: 0,
            mip_index: 0,
            aspect_count: 0,
            aspect_index: base.aspect_count(),
            offset_x_count: 0,
            offset_x_index: 0,
            offset_y_count: 0,
            offset_y_index: 0,
        };
        if generator.cursor.is_at_end() {
            return generator;
        }

        let selection = *generator.cursor.limits();
        let limits = base.limits();
        let image = encoder.extent();
        let aspect_index = generator.cursor.subresource().aspect_index;
        let x_size = encoder.offset_x_size();
        let y_size = encoder.offset_y_size();
        let origin = index(offset.y) * y_size + index(offset.x) * x_size;
        let full_layers =
            selection.base_array_layer == 0 && selection.layer_count == limits.array_layer;
        let full_mips = selection.base_mip_level == 0 && selection.level_count == limits.mip_level;

        let mut mip_count = 1;
        let mut aspect_count = base.aspect_count();
        let mut offset_count = (extent.width, extent.height);
        let pos = if full_layers && full_mips && selection.aspect_mask == limits.aspect {
            aspect_count = 1;
            if offset.x == 0 && extent.width == image.width {
                offset_count = (1, 1);
                if offset.y == 0 && extent.height == image.height {
                    IndexRange::new(0, encoder.domain_size())
                } else {
                    IndexRange::from_len(index(offset.y) * y_size, index(extent.height) * y_size)
                }
            } else {
                // One range per row, each spanning the selected columns.
                offset_count = (1, extent.height);
                IndexRange::from_len(origin, index(extent.width) * x_size)
            }
        } else if full_layers && full_mips {
            IndexRange::from_len(origin + base.aspect_base(aspect_index), base.aspect_size())
        } else if full_layers {
            let begin = origin
                + base.aspect_base(aspect_index)
                + index(selection.base_mip_level) * base.mip_size();
            IndexRange::from_len(begin, index(selection.level_count) * base.mip_size())
        } else {
            mip_count = selection.level_count;
            IndexRange::from_len(
                encoder.encode(generator.cursor.position()),
                index(selection.layer_count),
            )
        };

        generator.pos = pos;
        generator.aspect_base = pos;
        generator.offset_x_base = pos;
        generator.offset_y_base = pos;
        generator.mip_count = mip_count;
        generator.aspect_count = aspect_count;
        generator.aspect_index = aspect_index;
        (generator.offset_x_count, generator.offset_y_count) = offset_count;
        generator
    }

    /// The current range; [`IndexRange::EMPTY`] once exhausted.
    #[must_use]
    pub fn current(&self) -> IndexRange {
        self.pos
    }

    /// Returns `true` once every range has been produced.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos.is_empty()
    }

    /// The first coordinate of the current range.
    #[must_use]
    pub fn position(&self) -> &SubresourceOffset {
        self.cursor.position()
    }

    /// The lock-stepped coordinate cursor.
    #[must_use]
    pub fn cursor(&self) -> &SubresourceOffsetCursor<'a> {
        &self.cursor
    }

    /// The coordinate cursor, for walking within the current range.
    pub fn cursor_mut(&mut self) -> &mut SubresourceOffsetCursor<'a> {
        &mut self.cursor
    }

    /// The encoder the generator was built from.
    #[must_use]
    pub fn encoder(&self) -> &'a OffsetRangeEncoder {
        self.encoder
    }

    /// Moves to the next range, or to the tombstone after the last one.
    ///
    /// Advancing at the end is a no-op.
    pub fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        let base = self.encoder.base();
        let mask = self.cursor.limits().aspect_mask;

        self.mip_index += 1;
        if self.mip_index < self.mip_count {
            self.pos += base.mip_size();
            self.cursor
                .seek_mip(self.cursor.limits().base_mip_level + self.mip_index);
            return;
        }

        let last_aspect = self.aspect_index;
        self.aspect_index = base.lower_bound_from_mask_at(mask, last_aspect + 1);
        if self.aspect_index < self.aspect_count {
            self.cursor.seek_aspect(self.aspect_index);
            assert!(
                !self.cursor.is_at_end(),
                "cursor tombstoned while ranges remain"
            );
            self.aspect_base += base.aspect_base(self.aspect_index) - base.aspect_base(last_aspect);
            self.pos = self.aspect_base;
            self.mip_index = 0;
            return;
        }

        self.mip_index = 0;
        self.aspect_index = base.lower_bound_from_mask(mask);
        self.offset_x_index += 1;
        if self.offset_x_index < self.offset_x_count {
            self.cursor
                .seek_offset_x(self.cursor.limits_offset().x + self.offset_x_index);
            self.offset_x_base += self.encoder.offset_x_size();
            self.pos = self.offset_x_base;
            self.aspect_base = self.pos;
            return;
        }

        self.offset_y_index += 1;
        if self.offset_y_index < self.offset_y_count {
            self.cursor
                .seek_offset_y(self.cursor.limits_offset().y + self.offset_y_index);
            self.offset_y_base += self.encoder.offset_y_size();
            self.pos = self.offset_y_base;
            self.offset_x_base = self.pos;
            self.aspect_base = self.pos;
            self.offset_x_index = 0;
        } else {
            self.pos = IndexRange::EMPTY;
            self.cursor.set_end();
        }
    }
}

impl Iterator for OffsetRangeGenerator<'_> {
    type Item = IndexRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end() {
            return None;
        }
        let current = self.pos;
        self.advance();
        Some(current)
    }
}
