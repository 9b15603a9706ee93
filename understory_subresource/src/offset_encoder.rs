// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encoding with an outer 2-D texel offset axis.

use understory_range_map::IndexType;

use crate::encoder::{RangeEncoder, fits};
use crate::error::EncoderError;
use crate::types::{
    Extent3D, ImageSubresource, Offset2D, Offset3D, SubresourceOffset, SubresourceRange, index,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum OffsetShape {
    /// Height 1: only X varies.
    OneD,
    TwoD,
}

/// A [`RangeEncoder`] extended with texel offsets.
///
/// Offsets are the slowest varying axes, row before column:
///
/// ```text
/// index = y * offset_y_size + x * offset_x_size + base.encode(subresource)
/// offset_x_size = base.subresource_count()
/// offset_y_size = offset_x_size * width
/// ```
///
/// The depth slices of a 3-D image are folded into the array layer axis, so the embedded
/// base encoder has `depth` layers in that case. Arrayed 3-D images are rejected.
#[derive(Clone, Debug)]
pub struct OffsetRangeEncoder {
    base: RangeEncoder,
    extent: Extent3D,
    limits: SubresourceOffset,
    offset_x_size: IndexType,
    offset_y_size: IndexType,
    shape: OffsetShape,
}

impl OffsetRangeEncoder {
    /// Creates an encoder for a whole image of the given extent.
    ///
    /// # Panics
    ///
    /// Panics if [`try_new`](Self::try_new) would fail.
    #[must_use]
    pub fn new(full_range: SubresourceRange, extent: Extent3D) -> Self {
        match Self::try_new(full_range, extent) {
            Ok(encoder) => encoder,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an encoder for a whole image of the given extent, reporting why it is unusable.
    pub fn try_new(full_range: SubresourceRange, extent: Extent3D) -> Result<Self, EncoderError> {
        let base = RangeEncoder::try_new(fold_depth_range(full_range, extent)?)?;
        let offset_x_size = base.subresource_count();
        let offset_y_size = offset_x_size * index(extent.width);
        let corner = Offset2D::new(extent.width, extent.height);
        let limits = SubresourceOffset::new(*base.limits(), corner);
        Ok(Self {
            base,
            extent,
            limits,
            offset_x_size,
            offset_y_size,
            shape: if extent.height == 1 {
                OffsetShape::OneD
            } else {
                OffsetShape::TwoD
            },
        })
    }

    /// Encodes an offset coordinate.
    #[inline]
    #[must_use]
    pub fn encode(&self, pos: &SubresourceOffset) -> IndexType {
        let outer = match self.shape {
            OffsetShape::OneD => index(pos.offset.x) * self.offset_x_size,
            OffsetShape::TwoD => {
                index(pos.offset.x) * self.offset_x_size + index(pos.offset.y) * self.offset_y_size
            }
        };
        outer + self.base.encode(&pos.subresource)
    }

    /// Encodes an image subresource at a 3-D offset.
    #[must_use]
    pub fn encode_image_subresource(
        &self,
        subres: &ImageSubresource,
        offset: Offset3D,
    ) -> IndexType {
        self.encode(&self.subresource_offset(subres, offset))
    }

    /// Decodes a linear index, splitting off the offset first.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "indices within the domain decode to offsets below the image extent"
    )]
    pub fn decode(&self, encoded: IndexType) -> SubresourceOffset {
        let (y, rest) = match self.shape {
            OffsetShape::OneD => (0, encoded),
            OffsetShape::TwoD => {
                let y = encoded / self.offset_y_size;
                (y, encoded - y * self.offset_y_size)
            }
        };
        let x = rest / self.offset_x_size;
        SubresourceOffset::new(
            self.base.decode(rest % self.offset_x_size),
            Offset2D::new(x as u32, y as u32),
        )
    }

    /// Converts an image subresource and 3-D offset to an offset coordinate.
    ///
    /// On 3-D images `offset.z` becomes the array layer.
    #[must_use]
    pub fn subresource_offset(
        &self,
        subres: &ImageSubresource,
        offset: Offset3D,
    ) -> SubresourceOffset {
        let mut subresource = self.base.subresource(subres);
        if self.is_volume() {
            subresource.array_layer = offset.z;
        }
        SubresourceOffset::new(subresource, offset.xy())
    }

    /// The first coordinate of a region.
    #[must_use]
    pub fn begin_subresource_offset(
        &self,
        range: &SubresourceRange,
        offset: Offset3D,
    ) -> SubresourceOffset {
        let mut subresource = self.base.begin_subresource(range);
        if self.is_volume() {
            subresource.array_layer = offset.z;
        }
        SubresourceOffset::new(subresource, offset.xy())
    }

    /// Rewrites a selection so that on 3-D images its layers are the selected depth slices.
    #[must_use]
    pub fn fold_depth(
        &self,
        range: SubresourceRange,
        offset: Offset3D,
        extent: Extent3D,
    ) -> SubresourceRange {
        if self.is_volume() {
            SubresourceRange {
                base_array_layer: offset.z,
                layer_count: extent.depth,
                ..range
            }
        } else {
            range
        }
    }

    /// Returns `true` if `subres` at `offset` lies inside the image.
    #[must_use]
    pub fn in_range(&self, subres: &ImageSubresource, offset: Offset3D) -> bool {
        let layer = if self.is_volume() {
            offset.z
        } else {
            subres.array_layer
        };
        let subres = ImageSubresource {
            array_layer: layer,
            ..*subres
        };
        self.base.in_range(&subres) && offset.x < self.extent.width && offset.y < self.extent.height
    }

    /// Returns `true` if the region starts inside the image and does not extend past it.
    #[must_use]
    pub fn region_in_range(
        &self,
        range: &SubresourceRange,
        offset: Offset3D,
        extent: Extent3D,
    ) -> bool {
        let folded = self.fold_depth(*range, offset, extent);
        self.base.range_in_range(&folded)
            && offset.x < self.extent.width
            && offset.y < self.extent.height
            && fits(offset.x, extent.width, self.extent.width)
            && fits(offset.y, extent.height, self.extent.height)
    }

    /// Returns `true` if the region can be iterated by an offset generator.
    #[must_use]
    pub fn is_valid_region(
        &self,
        range: &SubresourceRange,
        offset: Offset3D,
        extent: Extent3D,
    ) -> bool {
        let folded = self.fold_depth(*range, offset, extent);
        self.base.is_valid_selection(&folded)
            && fits(offset.x, extent.width, self.extent.width)
            && fits(offset.y, extent.height, self.extent.height)
    }

    /// The embedded subresource encoder.
    #[must_use]
    pub fn base(&self) -> &RangeEncoder {
        &self.base
    }

    /// The image extent.
    #[must_use]
    pub fn extent(&self) -> Extent3D {
        self.extent
    }

    /// Upper bounds of the domain; the offset holds width and height.
    #[must_use]
    pub fn limits(&self) -> &SubresourceOffset {
        &self.limits
    }

    /// Linear indices per texel column.
    #[must_use]
    pub fn offset_x_size(&self) -> IndexType {
        self.offset_x_size
    }

    /// Linear indices per texel row.
    #[must_use]
    pub fn offset_y_size(&self) -> IndexType {
        self.offset_y_size
    }

    /// Size of the whole linear domain.
    #[must_use]
    pub fn domain_size(&self) -> IndexType {
        self.offset_y_size * index(self.extent.height)
    }

    fn is_volume(&self) -> bool {
        self.extent.depth > 1
    }
}

/// Replaces the layer axis with the depth axis for 3-D images.
pub(crate) fn fold_depth_range(
    full_range: SubresourceRange,
    extent: Extent3D,
) -> Result<SubresourceRange, EncoderError> {
    if extent.is_empty() || (extent.depth > 1 && full_range.layer_count > 1) {
        return Err(EncoderError::InvalidExtent(extent));
    }
    Ok(if extent.depth > 1 {
        SubresourceRange {
            layer_count: extent.depth,
            ..full_range
        }
    } else {
        full_range
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectFlags;
    use crate::types::Subresource;

    #[test]
    fn strides_cover_the_subresource_domain() {
        let encoder = OffsetRangeEncoder::new(
            SubresourceRange::full(AspectFlags::DEPTH | AspectFlags::STENCIL, 2, 3),
            Extent3D::new(4, 5, 1),
        );
        assert_eq!(encoder.offset_x_size(), 12);
        assert_eq!(encoder.offset_y_size(), 48);
        assert_eq!(encoder.domain_size(), 240);
    }

    #[test]
    fn one_dimensional_decode_yields_row_zero() {
        let encoder = OffsetRangeEncoder::new(
            SubresourceRange::full(AspectFlags::COLOR, 1, 2),
            Extent3D::new(8, 1, 1),
        );
        let pos = encoder.decode(7);
        assert_eq!(pos.offset, Offset2D::new(3, 0));
        let expected = Subresource::new(AspectFlags::COLOR, 0, 1, 0);
        assert_eq!(pos.subresource, expected);
        assert_eq!(encoder.encode(&pos), 7);
    }

    #[test]
    fn depth_folds_into_layers() {
        let encoder = OffsetRangeEncoder::new(
            SubresourceRange::full(AspectFlags::COLOR, 2, 1),
            Extent3D::new(2, 2, 4),
        );
        assert_eq!(encoder.base().limits().array_layer, 4);
        let subres = ImageSubresource::new(AspectFlags::COLOR, 1, 0);
        let pos = encoder.subresource_offset(&subres, Offset3D::new(1, 1, 3));
        assert_eq!(pos.subresource.array_layer, 3);
        let encoded = encoder.encode(&pos);
        assert_eq!(encoded, 16 + 8 + 4 + 3);
        assert_eq!(encoder.decode(encoded), pos);
    }

    #[test]
    fn arrayed_volumes_are_rejected() {
        let err = OffsetRangeEncoder::try_new(
            SubresourceRange::full(AspectFlags::COLOR, 1, 2),
            Extent3D::new(4, 4, 2),
        )
        .unwrap_err();
        assert_eq!(err, EncoderError::InvalidExtent(Extent3D::new(4, 4, 2)));
    }

    #[test]
    fn region_predicates() {
        let encoder = OffsetRangeEncoder::new(
            SubresourceRange::full(AspectFlags::COLOR, 1, 1),
            Extent3D::new(8, 4, 1),
        );
        let range = SubresourceRange::full(AspectFlags::COLOR, 1, 1);
        let whole = Extent3D::new(8, 4, 1);
        assert!(encoder.region_in_range(&range, Offset3D::default(), whole));
        assert!(encoder.is_valid_region(&range, Offset3D::default(), whole));
        assert!(!encoder.region_in_range(&range, Offset3D::new(1, 0, 0), whole));
        assert!(encoder.in_range(
            &ImageSubresource::new(AspectFlags::COLOR, 0, 0),
            Offset3D::new(7, 3, 0)
        ));
        assert!(!encoder.in_range(
            &ImageSubresource::new(AspectFlags::COLOR, 0, 0),
            Offset3D::new(8, 0, 0)
        ));
    }
}
