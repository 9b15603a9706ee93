// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encoding with an outer memory-layout axis.

use understory_range_map::IndexType;

use crate::encoder::RangeEncoder;
use crate::error::EncoderError;
use crate::offset_encoder::fold_depth_range;
use crate::types::{
    Extent3D, ImageSubresource, MemoryLayout, Offset3D, SubresourceLayout, SubresourceRange,
};

/// A [`RangeEncoder`] extended with byte-addressed elements of a linear memory layout.
///
/// The layout is split into elements of `element_size` bytes, and the element number is
/// the slowest varying axis:
///
/// ```text
/// element = (pos.layout.offset - layout.offset) / element_size
/// index   = element * base.subresource_count() + base.encode(subresource)
/// ```
///
/// Decoding recovers the element's byte offset, reports `element_size` as its size, and
/// copies the pitches from the image layout.
#[derive(Clone, Debug)]
pub struct LayoutRangeEncoder {
    base: RangeEncoder,
    extent: Extent3D,
    layout: MemoryLayout,
    element_size: u64,
    limits: SubresourceLayout,
}

impl LayoutRangeEncoder {
    /// Creates an encoder for a whole image stored with `layout`.
    ///
    /// # Panics
    ///
    /// Panics if [`try_new`](Self::try_new) would fail.
    #[must_use]
    pub fn new(
        full_range: SubresourceRange,
        extent: Extent3D,
        layout: MemoryLayout,
        element_size: u64,
    ) -> Self {
        match Self::try_new(full_range, extent, layout, element_size) {
            Ok(encoder) => encoder,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an encoder for a whole image stored with `layout`, reporting why it is unusable.
    pub fn try_new(
        full_range: SubresourceRange,
        extent: Extent3D,
        layout: MemoryLayout,
        element_size: u64,
    ) -> Result<Self, EncoderError> {
        let base = RangeEncoder::try_new(fold_depth_range(full_range, extent)?)?;
        if element_size == 0 || layout.size < element_size {
            return Err(EncoderError::InvalidLayout);
        }
        let limits = SubresourceLayout::new(*base.limits(), layout);
        Ok(Self {
            base,
            extent,
            layout,
            element_size,
            limits,
        })
    }

    /// Encodes a layout coordinate.
    ///
    /// # Panics
    ///
    /// Panics if `pos.layout.offset` precedes the image layout's offset.
    #[inline]
    #[must_use]
    pub fn encode(&self, pos: &SubresourceLayout) -> IndexType {
        assert!(
            pos.layout.offset >= self.layout.offset,
            "layout offset {} precedes the image layout at {}",
            pos.layout.offset,
            self.layout.offset
        );
        let element = (pos.layout.offset - self.layout.offset) / self.element_size;
        element * self.base.subresource_count() + self.base.encode(&pos.subresource)
    }

    /// Encodes the element holding the texel at `offset` of `subres`.
    #[must_use]
    pub fn encode_texel(&self, subres: &ImageSubresource, offset: Offset3D) -> IndexType {
        let mut subresource = self.base.subresource(subres);
        let texel = if self.extent.depth > 1 {
            subresource.array_layer = offset.z;
            self.layout.texel_offset(0, offset, self.element_size)
        } else {
            let offset = Offset3D { z: 0, ..offset };
            let layer = subres.array_layer;
            self.layout.texel_offset(layer, offset, self.element_size)
        };
        let layout = MemoryLayout {
            offset: texel,
            size: self.element_size,
            ..self.layout
        };
        self.encode(&SubresourceLayout::new(subresource, layout))
    }

    /// Decodes a linear index.
    #[must_use]
    pub fn decode(&self, encoded: IndexType) -> SubresourceLayout {
        let count = self.base.subresource_count();
        let element = encoded / count;
        SubresourceLayout::new(
            self.base.decode(encoded % count),
            MemoryLayout {
                offset: self.layout.offset + element * self.element_size,
                size: self.element_size,
                ..self.layout
            },
        )
    }

    /// Returns `true` if `subres` lies inside the image and `layout` inside its memory.
    #[must_use]
    pub fn in_range(&self, subres: &ImageSubresource, layout: &MemoryLayout) -> bool {
        self.base.in_range(subres) && self.layout_in_range(layout)
    }

    /// Returns `true` if `range` lies inside the image and `layout` inside its memory.
    #[must_use]
    pub fn range_in_range(&self, range: &SubresourceRange, layout: &MemoryLayout) -> bool {
        self.base.range_in_range(range) && self.layout_in_range(layout)
    }

    fn layout_in_range(&self, layout: &MemoryLayout) -> bool {
        layout.offset >= self.layout.offset
            && layout.offset < self.layout.end()
            && layout.end() <= self.layout.end()
            && layout.row_pitch <= self.layout.row_pitch
            && layout.array_pitch <= self.layout.array_pitch
            && layout.depth_pitch <= self.layout.depth_pitch
    }

    /// The first coordinate of `range` at `layout`.
    #[must_use]
    pub fn begin_subresource_layout(
        &self,
        range: &SubresourceRange,
        layout: &MemoryLayout,
    ) -> SubresourceLayout {
        SubresourceLayout::new(self.base.begin_subresource(range), *layout)
    }

    /// The embedded subresource encoder.
    #[must_use]
    pub fn base(&self) -> &RangeEncoder {
        &self.base
    }

    /// The image's memory layout.
    #[must_use]
    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Bytes per element.
    #[must_use]
    pub fn element_size(&self) -> u64 {
        self.element_size
    }

    /// Upper bounds of the domain.
    #[must_use]
    pub fn limits(&self) -> &SubresourceLayout {
        &self.limits
    }

    /// Number of whole elements in the layout.
    #[must_use]
    pub fn element_count(&self) -> u64 {
        self.layout.size / self.element_size
    }

    /// Size of the whole linear domain.
    #[must_use]
    pub fn domain_size(&self) -> IndexType {
        self.element_count() * self.base.subresource_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectFlags;
    use crate::types::Subresource;

    fn linear() -> LayoutRangeEncoder {
        LayoutRangeEncoder::new(
            SubresourceRange::full(AspectFlags::COLOR, 2, 2),
            Extent3D::new(4, 4, 1),
            MemoryLayout {
                offset: 1024,
                size: 128,
                row_pitch: 16,
                array_pitch: 64,
                depth_pitch: 64,
            },
            4,
        )
    }

    #[test]
    fn element_is_the_outer_axis() {
        let encoder = linear();
        assert_eq!(encoder.element_count(), 32);
        assert_eq!(encoder.domain_size(), 128);

        let pos = encoder.decode(4 * 5 + 3);
        let expected = Subresource::new(AspectFlags::COLOR, 1, 1, 0);
        assert_eq!(pos.subresource, expected);
        assert_eq!(pos.layout.offset, 1024 + 5 * 4);
        assert_eq!(pos.layout.size, 4);
        assert_eq!(pos.layout.row_pitch, 16);
        assert_eq!(encoder.encode(&pos), 23);
    }

    #[test]
    fn texel_addressing() {
        let encoder = linear();
        let subres = ImageSubresource::new(AspectFlags::COLOR, 0, 1);
        let encoded = encoder.encode_texel(&subres, Offset3D::new(2, 1, 0));
        // byte 64 + 16 + 8 past the base is element 22
        assert_eq!(encoded, 22 * 4 + 1);
        assert_eq!(encoder.decode(encoded).layout.offset, 1024 + 88);
    }

    #[test]
    fn zero_element_size_is_rejected() {
        let err = LayoutRangeEncoder::try_new(
            SubresourceRange::full(AspectFlags::COLOR, 1, 1),
            Extent3D::new(1, 1, 1),
            MemoryLayout {
                size: 16,
                ..MemoryLayout::default()
            },
            0,
        )
        .unwrap_err();
        assert_eq!(err, EncoderError::InvalidLayout);
    }

    #[test]
    fn layout_predicates() {
        let encoder = linear();
        let subres = ImageSubresource::new(AspectFlags::COLOR, 1, 1);
        let inside = MemoryLayout {
            offset: 1040,
            size: 16,
            row_pitch: 16,
            array_pitch: 64,
            depth_pitch: 0,
        };
        assert!(encoder.in_range(&subres, &inside));
        let past_end = MemoryLayout {
            offset: 1140,
            ..inside
        };
        assert!(!encoder.in_range(&subres, &past_end));
        let whole = SubresourceRange::full(AspectFlags::COLOR, 2, 2);
        assert!(encoder.range_in_range(&whole, &inside));
    }

    #[test]
    #[should_panic(expected = "precedes the image layout")]
    fn encode_rejects_offsets_before_the_layout() {
        let encoder = linear();
        let before = MemoryLayout {
            offset: 1020,
            ..*encoder.layout()
        };
        let _ = encoder.encode(&SubresourceLayout::new(Subresource::default(), before));
    }
}
