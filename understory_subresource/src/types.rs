// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate and extent types shared by the encoders, cursors, and generators.

use understory_range_map::IndexType;

use crate::aspect::AspectFlags;

/// A single subresource coordinate, as consumed and produced by encoders.
///
/// `aspect` holds exactly one aspect bit, and `aspect_index` is that bit's dense index
/// within the encoder's [`AspectTraits`](crate::AspectTraits). The index is derived from
/// the bit and kept alongside it so encoding never has to search for it.
///
/// A coordinate with an empty `aspect` is the "at end" tombstone used by cursors and
/// generators.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Subresource {
    /// The aspect bit.
    pub aspect: AspectFlags,
    /// Zero-based mip level.
    pub mip_level: u32,
    /// Zero-based array layer.
    pub array_layer: u32,
    /// Dense index of `aspect`.
    pub aspect_index: u32,
}

impl Subresource {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(
        aspect: AspectFlags,
        mip_level: u32,
        array_layer: u32,
        aspect_index: u32,
    ) -> Self {
        Self {
            aspect,
            mip_level,
            array_layer,
            aspect_index,
        }
    }

    /// Returns `true` if this is the "at end" tombstone.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.aspect.is_empty()
    }
}

/// An API-shaped single subresource, whose aspect mask may hold several bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageSubresource {
    /// Aspects addressed; encoders use the lowest one they know.
    pub aspect_mask: AspectFlags,
    /// Zero-based mip level.
    pub mip_level: u32,
    /// Zero-based array layer.
    pub array_layer: u32,
}

impl ImageSubresource {
    /// Creates an image subresource.
    #[must_use]
    pub const fn new(aspect_mask: AspectFlags, mip_level: u32, array_layer: u32) -> Self {
        Self {
            aspect_mask,
            mip_level,
            array_layer,
        }
    }
}

/// An axis-aligned selection of aspects, mip levels, and array layers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SubresourceRange {
    /// Selected aspects.
    pub aspect_mask: AspectFlags,
    /// First selected mip level.
    pub base_mip_level: u32,
    /// Number of selected mip levels.
    pub level_count: u32,
    /// First selected array layer.
    pub base_array_layer: u32,
    /// Number of selected array layers.
    pub layer_count: u32,
}

impl SubresourceRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(
        aspect_mask: AspectFlags,
        base_mip_level: u32,
        level_count: u32,
        base_array_layer: u32,
        layer_count: u32,
    ) -> Self {
        Self {
            aspect_mask,
            base_mip_level,
            level_count,
            base_array_layer,
            layer_count,
        }
    }

    /// Creates a range covering every level and layer of an image, starting at zero.
    #[must_use]
    pub const fn full(aspect_mask: AspectFlags, level_count: u32, layer_count: u32) -> Self {
        Self::new(aspect_mask, 0, level_count, 0, layer_count)
    }

    /// Returns `true` if the range selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aspect_mask.is_empty() || self.level_count == 0 || self.layer_count == 0
    }

    /// One past the last selected mip level.
    #[must_use]
    pub const fn end_mip_level(&self) -> u32 {
        self.base_mip_level + self.level_count
    }

    /// One past the last selected array layer.
    #[must_use]
    pub const fn end_array_layer(&self) -> u32 {
        self.base_array_layer + self.layer_count
    }
}

/// A 2-D texel offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset2D {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Offset2D {
    /// Creates an offset.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A 3-D texel offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset3D {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Depth slice.
    pub z: u32,
}

impl Offset3D {
    /// Creates an offset.
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Drops the depth component.
    #[must_use]
    pub const fn xy(self) -> Offset2D {
        Offset2D::new(self.x, self.y)
    }
}

/// A 2-D texel extent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent2D {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

impl Extent2D {
    /// Creates an extent.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A 3-D texel extent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent3D {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Depth slices.
    pub depth: u32,
}

impl Extent3D {
    /// Creates an extent.
    #[must_use]
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Drops the depth component.
    #[must_use]
    pub const fn xy(self) -> Extent2D {
        Extent2D::new(self.width, self.height)
    }

    /// Returns `true` if any dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }
}

/// Byte layout of one subresource in linear memory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MemoryLayout {
    /// Byte offset of the first texel.
    pub offset: u64,
    /// Size in bytes.
    pub size: u64,
    /// Bytes between consecutive rows.
    pub row_pitch: u64,
    /// Bytes between consecutive array layers.
    pub array_pitch: u64,
    /// Bytes between consecutive depth slices.
    pub depth_pitch: u64,
}

impl MemoryLayout {
    /// Byte offset of the texel at `offset` in array layer `layer`.
    #[must_use]
    pub const fn texel_offset(&self, layer: u32, offset: Offset3D, element_size: u64) -> u64 {
        self.offset
            + layer as u64 * self.array_pitch
            + offset.z as u64 * self.depth_pitch
            + offset.y as u64 * self.row_pitch
            + offset.x as u64 * element_size
    }

    /// One past the last byte of the layout.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// A subresource coordinate extended with a 2-D offset.
///
/// Depth slices of 3-D images are carried in `subresource.array_layer`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SubresourceOffset {
    /// Aspect, mip, and layer.
    pub subresource: Subresource,
    /// Texel column and row.
    pub offset: Offset2D,
}

impl SubresourceOffset {
    /// Creates an offset coordinate.
    #[must_use]
    pub const fn new(subresource: Subresource, offset: Offset2D) -> Self {
        Self {
            subresource,
            offset,
        }
    }
}

/// A subresource coordinate extended with a memory layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SubresourceLayout {
    /// Aspect, mip, and layer.
    pub subresource: Subresource,
    /// Memory layout of the addressed element.
    pub layout: MemoryLayout,
}

impl SubresourceLayout {
    /// Creates a layout coordinate.
    #[must_use]
    pub const fn new(subresource: Subresource, layout: MemoryLayout) -> Self {
        Self {
            subresource,
            layout,
        }
    }
}

/// Widens a `u32` count or coordinate into the linear index type.
#[inline]
pub(crate) fn index(value: u32) -> IndexType {
    IndexType::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ranges() {
        let no_mips = SubresourceRange::new(AspectFlags::COLOR, 0, 0, 0, 4);
        let no_aspects = SubresourceRange::new(AspectFlags::empty(), 0, 1, 0, 1);
        assert!(no_mips.is_empty());
        assert!(no_aspects.is_empty());
        assert!(!SubresourceRange::full(AspectFlags::COLOR, 1, 1).is_empty());
    }

    #[test]
    fn texel_offset_sums_pitches() {
        let layout = MemoryLayout {
            offset: 256,
            size: 4096,
            row_pitch: 64,
            array_pitch: 1024,
            depth_pitch: 512,
        };
        let texel = layout.texel_offset(2, Offset3D::new(3, 4, 1), 4);
        assert_eq!(texel, 256 + 2 * 1024 + 512 + 4 * 64 + 3 * 4);
    }
}
