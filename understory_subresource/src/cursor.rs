// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate cursors that walk a selection in encoding order.
//!
//! A cursor tracks one coordinate inside a selection and steps it with `advance`, layer
//! fastest, then mip level, then aspect (then texel column and row for the offset cursor).
//! The `seek_*` methods resynchronize a cursor after its owner has moved the coordinate
//! by other means; a generator calls them whenever it jumps to the start of a new range.
//! Callers that edit a cursor's coordinate directly must seek before advancing again.
//!
//! Reaching the end clears the coordinate's aspect bit. That tombstone is terminal.

use understory_range_map::IndexType;

use crate::aspect::AspectFlags;
use crate::encoder::RangeEncoder;
use crate::layout_encoder::LayoutRangeEncoder;
use crate::offset_encoder::OffsetRangeEncoder;
use crate::types::{
    Extent2D, Extent3D, ImageSubresource, MemoryLayout, Offset2D, Offset3D, Subresource,
    SubresourceLayout, SubresourceOffset, SubresourceRange,
};

/// Cursor over the coordinates of a [`SubresourceRange`].
///
/// Also an [`Iterator`] over the remaining coordinates.
#[derive(Clone, Debug)]
pub struct SubresourceCursor<'a> {
    pos: Subresource,
    encoder: &'a RangeEncoder,
    limits: SubresourceRange,
}

impl<'a> SubresourceCursor<'a> {
    /// Creates a cursor at the first coordinate of `range`, or at the end if it is empty.
    #[must_use]
    pub fn new(encoder: &'a RangeEncoder, range: SubresourceRange) -> Self {
        let mut cursor = Self {
            pos: Subresource::default(),
            encoder,
            limits: range,
        };
        if range.is_empty() {
            cursor.set_end();
        } else {
            cursor.pos = encoder.begin_subresource(&range);
        }
        cursor
    }

    /// The current coordinate.
    #[must_use]
    pub fn subresource(&self) -> &Subresource {
        &self.pos
    }

    /// The current coordinate, for direct edits. Seek before advancing afterwards.
    pub fn subresource_mut(&mut self) -> &mut Subresource {
        &mut self.pos
    }

    /// The current coordinate as an image subresource.
    #[must_use]
    pub fn image_subresource(&self) -> ImageSubresource {
        ImageSubresource::new(self.pos.aspect, self.pos.mip_level, self.pos.array_layer)
    }

    /// The selection being walked.
    #[must_use]
    pub fn limits(&self) -> &SubresourceRange {
        &self.limits
    }

    /// The encoder the cursor was built from.
    #[must_use]
    pub fn encoder(&self) -> &'a RangeEncoder {
        self.encoder
    }

    /// Returns `true` once the cursor has passed the last coordinate.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos.is_at_end()
    }

    /// Moves to the first mip level and layer of aspect `aspect_index`.
    ///
    /// An index at or past the aspect count moves to the end.
    pub fn seek_aspect(&mut self, aspect_index: u32) {
        self.pos.array_layer = self.limits.base_array_layer;
        self.pos.mip_level = self.limits.base_mip_level;
        if aspect_index < self.encoder.aspect_count() {
            self.pos.aspect_index = aspect_index;
            self.pos.aspect = self.encoder.aspect_bit(aspect_index) & self.limits.aspect_mask;
        } else {
            self.set_end();
        }
    }

    /// Moves to the first layer of `mip_level` in the current aspect.
    pub fn seek_mip(&mut self, mip_level: u32) {
        self.pos.array_layer = self.limits.base_array_layer;
        self.pos.mip_level = mip_level;
    }

    /// Moves to the coordinate with linear index `index`.
    ///
    /// This decodes from scratch; it is the slow path, used to jump over gaps.
    pub fn seek(&mut self, index: IndexType) {
        self.pos = self.encoder.decode(index);
    }

    /// Moves to the next selected aspect, or to the end.
    pub fn next_aspect(&mut self) {
        let next = self
            .encoder
            .lower_bound_from_mask_at(self.limits.aspect_mask, self.pos.aspect_index + 1);
        self.seek_aspect(next);
    }

    /// Moves to the next selected mip level, wrapping into the next aspect.
    pub fn next_mip(&mut self) {
        self.pos.array_layer = self.limits.base_array_layer;
        self.pos.mip_level += 1;
        if self.pos.mip_level >= self.limits.end_mip_level() {
            self.next_aspect();
        }
    }

    /// Moves to the next coordinate of the selection.
    pub fn advance(&mut self) {
        self.pos.array_layer += 1;
        if self.pos.array_layer >= self.limits.end_array_layer() {
            self.next_mip();
        }
    }

    pub(crate) fn set_end(&mut self) {
        self.pos.aspect = AspectFlags::empty();
        self.pos.aspect_index = self.encoder.aspect_count();
    }
}

impl Iterator for SubresourceCursor<'_> {
    type Item = Subresource;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end() {
            return None;
        }
        let current = self.pos;
        self.advance();
        Some(current)
    }
}

/// Cursor over the coordinates of a texel region.
///
/// Offsets are absolute. On 3-D images the region's depth slices take the place of the
/// selection's array layers.
#[derive(Clone, Debug)]
pub struct SubresourceOffsetCursor<'a> {
    pos: SubresourceOffset,
    encoder: &'a OffsetRangeEncoder,
    limits: SubresourceRange,
    limits_offset: Offset2D,
    limits_extent: Extent2D,
}

impl<'a> SubresourceOffsetCursor<'a> {
    /// Creates a cursor at the first coordinate of the region, or at the end if it is empty.
    #[must_use]
    pub fn new(
        encoder: &'a OffsetRangeEncoder,
        range: SubresourceRange,
        offset: Offset3D,
        extent: Extent3D,
    ) -> Self {
        let limits = encoder.fold_depth(range, offset, extent);
        let mut cursor = Self {
            pos: SubresourceOffset::default(),
            encoder,
            limits,
            limits_offset: offset.xy(),
            limits_extent: extent.xy(),
        };
        if limits.is_empty() || extent.width == 0 || extent.height == 0 {
            cursor.set_end();
        } else {
            cursor.pos = encoder.begin_subresource_offset(&limits, offset);
        }
        cursor
    }

    /// The current coordinate.
    #[must_use]
    pub fn position(&self) -> &SubresourceOffset {
        &self.pos
    }

    /// The current coordinate without its offset.
    #[must_use]
    pub fn subresource(&self) -> &Subresource {
        &self.pos.subresource
    }

    /// The current coordinate, for direct edits. Seek before advancing afterwards.
    pub fn position_mut(&mut self) -> &mut SubresourceOffset {
        &mut self.pos
    }

    /// The selection being walked, with depth folded into layers.
    #[must_use]
    pub fn limits(&self) -> &SubresourceRange {
        &self.limits
    }

    /// Origin of the region.
    #[must_use]
    pub fn limits_offset(&self) -> Offset2D {
        self.limits_offset
    }

    /// Size of the region.
    #[must_use]
    pub fn limits_extent(&self) -> Extent2D {
        self.limits_extent
    }

    /// The encoder the cursor was built from.
    #[must_use]
    pub fn encoder(&self) -> &'a OffsetRangeEncoder {
        self.encoder
    }

    /// Returns `true` once the cursor has passed the last coordinate.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos.subresource.is_at_end()
    }

    fn reset_subresource(&mut self) {
        let encoder = self.encoder;
        let base = encoder.base();
        let sub = &mut self.pos.subresource;
        sub.array_layer = self.limits.base_array_layer;
        sub.mip_level = self.limits.base_mip_level;
        sub.aspect_index = base.lower_bound_from_mask(self.limits.aspect_mask);
        sub.aspect = base.aspect_bit(sub.aspect_index) & self.limits.aspect_mask;
    }

    /// Moves to the start of row `y`, or to the end if `y` is past the region.
    pub fn seek_offset_y(&mut self, y: u32) {
        self.reset_subresource();
        self.pos.offset.x = self.limits_offset.x;
        let end = self.limits_offset.y + self.limits_extent.height;
        if y < end {
            self.pos.offset.y = y;
        } else {
            self.pos.offset.y = end;
            self.set_end();
        }
    }

    /// Moves to the start of column `x` in the current row.
    pub fn seek_offset_x(&mut self, x: u32) {
        self.reset_subresource();
        self.pos.offset.x = x;
    }

    /// Moves to the first mip level and layer of aspect `aspect_index` at the current offset.
    ///
    /// An index at or past the aspect count moves to the end.
    pub fn seek_aspect(&mut self, aspect_index: u32) {
        let encoder = self.encoder;
        let base = encoder.base();
        let sub = &mut self.pos.subresource;
        sub.array_layer = self.limits.base_array_layer;
        sub.mip_level = self.limits.base_mip_level;
        if aspect_index < base.aspect_count() {
            sub.aspect_index = aspect_index;
            sub.aspect = base.aspect_bit(aspect_index) & self.limits.aspect_mask;
        } else {
            self.set_end();
        }
    }

    /// Moves to the first layer of `mip_level`.
    pub fn seek_mip(&mut self, mip_level: u32) {
        self.pos.subresource.array_layer = self.limits.base_array_layer;
        self.pos.subresource.mip_level = mip_level;
    }

    /// Moves to the coordinate with linear index `index`.
    pub fn seek(&mut self, index: IndexType) {
        self.pos = self.encoder.decode(index);
    }

    /// Moves to the next row, or to the end.
    pub fn next_offset_y(&mut self) {
        self.seek_offset_y(self.pos.offset.y + 1);
    }

    /// Moves to the next column, wrapping into the next row.
    pub fn next_offset_x(&mut self) {
        let x = self.pos.offset.x + 1;
        if x >= self.limits_offset.x + self.limits_extent.width {
            self.next_offset_y();
        } else {
            self.seek_offset_x(x);
        }
    }

    /// Moves to the next selected aspect, wrapping into the next column.
    pub fn next_aspect(&mut self) {
        let base = self.encoder.base();
        let next = base.lower_bound_from_mask_at(
            self.limits.aspect_mask,
            self.pos.subresource.aspect_index + 1,
        );
        if next >= base.aspect_count() {
            self.next_offset_x();
        } else {
            self.seek_aspect(next);
        }
    }

    /// Moves to the next selected mip level, wrapping into the next aspect.
    pub fn next_mip(&mut self) {
        let mip_level = self.pos.subresource.mip_level + 1;
        if mip_level >= self.limits.end_mip_level() {
            self.next_aspect();
        } else {
            self.seek_mip(mip_level);
        }
    }

    /// Moves to the next coordinate of the region.
    pub fn advance(&mut self) {
        self.pos.subresource.array_layer += 1;
        if self.pos.subresource.array_layer >= self.limits.end_array_layer() {
            self.next_mip();
        }
    }

    pub(crate) fn set_end(&mut self) {
        self.pos.subresource.aspect = AspectFlags::empty();
        self.pos.subresource.aspect_index = self.encoder.base().aspect_count();
    }
}

impl Iterator for SubresourceOffsetCursor<'_> {
    type Item = SubresourceOffset;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end() {
            return None;
        }
        let current = self.pos;
        self.advance();
        Some(current)
    }
}

/// Cursor over the coordinates of a [`SubresourceRange`] at a fixed memory layout.
#[derive(Clone, Debug)]
pub struct SubresourceLayoutCursor<'a> {
    inner: SubresourceCursor<'a>,
    encoder: &'a LayoutRangeEncoder,
    layout: MemoryLayout,
}

impl<'a> SubresourceLayoutCursor<'a> {
    /// Creates a cursor at the first coordinate of `range`, paired with `layout`.
    #[must_use]
    pub fn new(
        encoder: &'a LayoutRangeEncoder,
        range: SubresourceRange,
        layout: MemoryLayout,
    ) -> Self {
        Self {
            inner: SubresourceCursor::new(encoder.base(), range),
            encoder,
            layout,
        }
    }

    /// The current coordinate.
    #[must_use]
    pub fn position(&self) -> SubresourceLayout {
        SubresourceLayout::new(*self.inner.subresource(), self.layout)
    }

    /// The current coordinate without its layout.
    #[must_use]
    pub fn subresource(&self) -> &Subresource {
        self.inner.subresource()
    }

    /// The current layout.
    #[must_use]
    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// The selection being walked.
    #[must_use]
    pub fn limits(&self) -> &SubresourceRange {
        self.inner.limits()
    }

    /// The encoder the cursor was built from.
    #[must_use]
    pub fn encoder(&self) -> &'a LayoutRangeEncoder {
        self.encoder
    }

    /// Returns `true` once the cursor has passed the last coordinate.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.inner.is_at_end()
    }

    /// See [`SubresourceCursor::seek_aspect`].
    pub fn seek_aspect(&mut self, aspect_index: u32) {
        self.inner.seek_aspect(aspect_index);
    }

    /// See [`SubresourceCursor::seek_mip`].
    pub fn seek_mip(&mut self, mip_level: u32) {
        self.inner.seek_mip(mip_level);
    }

    /// Moves to the coordinate and layout with linear index `index`.
    pub fn seek(&mut self, index: IndexType) {
        let decoded = self.encoder.decode(index);
        *self.inner.subresource_mut() = decoded.subresource;
        self.layout = decoded.layout;
    }

    /// See [`SubresourceCursor::next_aspect`].
    pub fn next_aspect(&mut self) {
        self.inner.next_aspect();
    }

    /// See [`SubresourceCursor::next_mip`].
    pub fn next_mip(&mut self) {
        self.inner.next_mip();
    }

    /// See [`SubresourceCursor::advance`].
    pub fn advance(&mut self) {
        self.inner.advance();
    }
}

impl Iterator for SubresourceLayoutCursor<'_> {
    type Item = SubresourceLayout;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end() {
            return None;
        }
        let current = SubresourceLayout::new(*self.inner.subresource(), self.layout);
        self.advance();
        Some(current)
    }
}
