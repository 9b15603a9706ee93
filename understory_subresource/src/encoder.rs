// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bijective encoding of `(aspect, mip, layer)` coordinates into a dense linear index.
//!
//! Coordinates are ordered, slowest varying first, by aspect, then mip level, then array
//! layer:
//!
//! ```text
//! index = aspect_base[aspect_index] + mip_level * mip_size + array_layer
//! ```
//!
//! where `mip_size` is the layer count and `aspect_size = mip_size * level_count`.

use understory_range_map::IndexType;

use crate::aspect::{AspectFlags, AspectTraits};
use crate::error::EncoderError;
use crate::types::{ImageSubresource, Subresource, SubresourceRange, index};

/// Which of the mip and layer axes are non-trivial.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Shape {
    /// One array layer: `index = mip`.
    MipOnly,
    /// One mip level: `index = layer`.
    ArrayOnly,
    /// Both axes: `index = mip * mip_size + layer`.
    MipArray,
}

impl Shape {
    fn select(level_count: u32, layer_count: u32) -> Self {
        if layer_count == 1 {
            Self::MipOnly
        } else if level_count == 1 {
            Self::ArrayOnly
        } else {
            Self::MipArray
        }
    }
}

/// Encode/decode arithmetic, fixed once per encoder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Strategy {
    /// One aspect; the aspect base is always zero and is skipped.
    One(Shape),
    /// Two aspects.
    Two(Shape),
    /// Three aspects, always with the general shape.
    Three,
}

/// Encoder and decoder for the subresources of one whole image.
///
/// An encoder is built once per image from the image's full range, which must start at
/// mip level 0 and array layer 0 and carry a canonical aspect mask. It is immutable
/// afterwards and is borrowed by every cursor, generator, and view built from it.
///
/// ```rust
/// use understory_subresource::{AspectFlags, RangeEncoder, Subresource, SubresourceRange};
///
/// let encoder = RangeEncoder::new(SubresourceRange::full(
///     AspectFlags::DEPTH | AspectFlags::STENCIL,
///     3,
///     4,
/// ));
/// assert_eq!(encoder.subresource_count(), 24);
///
/// let stencil = Subresource::new(AspectFlags::STENCIL, 1, 2, 1);
/// assert_eq!(encoder.encode(&stencil), 12 + 4 + 2);
/// assert_eq!(encoder.decode(18), stencil);
/// ```
#[derive(Clone, Debug)]
pub struct RangeEncoder {
    full_range: SubresourceRange,
    limits: Subresource,
    mip_size: IndexType,
    aspect_size: IndexType,
    traits: &'static AspectTraits,
    strategy: Strategy,
    aspect_base: [IndexType; AspectTraits::MAX_ASPECTS],
}

impl RangeEncoder {
    /// Creates an encoder for a whole image.
    ///
    /// # Panics
    ///
    /// Panics if [`try_new`](Self::try_new) would fail.
    #[must_use]
    pub fn new(full_range: SubresourceRange) -> Self {
        match Self::try_new(full_range) {
            Ok(encoder) => encoder,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an encoder for a whole image, reporting why the range is unusable.
    pub fn try_new(full_range: SubresourceRange) -> Result<Self, EncoderError> {
        let traits = AspectTraits::try_resolve(full_range.aspect_mask)
            .ok_or(EncoderError::NonCanonicalAspectMask(full_range.aspect_mask))?;
        if traits.count() == 0 {
            return Err(EncoderError::NoAspects);
        }
        if full_range.base_mip_level != 0 || full_range.base_array_layer != 0 {
            return Err(EncoderError::NonZeroBase);
        }
        if full_range.level_count == 0 || full_range.layer_count == 0 {
            return Err(EncoderError::EmptyRange);
        }

        let shape = Shape::select(full_range.level_count, full_range.layer_count);
        let strategy = match traits.count() {
            1 => Strategy::One(shape),
            2 => Strategy::Two(shape),
            _ => Strategy::Three,
        };
        let mip_size = index(full_range.layer_count);
        let aspect_size = mip_size * index(full_range.level_count);
        let mut aspect_base = [0; AspectTraits::MAX_ASPECTS];
        for i in 1..traits.count() as usize {
            aspect_base[i] = aspect_base[i - 1] + aspect_size;
        }

        Ok(Self {
            full_range,
            limits: Subresource::new(
                traits.mask(),
                full_range.level_count,
                full_range.layer_count,
                traits.count(),
            ),
            mip_size,
            aspect_size,
            traits,
            strategy,
            aspect_base,
        })
    }

    /// Encodes a coordinate into its linear index.
    ///
    /// `pos` must lie within the encoder's domain; the result is unspecified otherwise.
    #[inline]
    #[must_use]
    pub fn encode(&self, pos: &Subresource) -> IndexType {
        match self.strategy {
            Strategy::One(shape) => self.encode_local(shape, pos),
            Strategy::Two(shape) => {
                self.encode_local(shape, pos) + self.aspect_base[pos.aspect_index as usize]
            }
            Strategy::Three => {
                self.encode_local(Shape::MipArray, pos)
                    + self.aspect_base[pos.aspect_index as usize]
            }
        }
    }

    #[inline]
    fn encode_local(&self, shape: Shape, pos: &Subresource) -> IndexType {
        match shape {
            Shape::MipOnly => index(pos.mip_level),
            Shape::ArrayOnly => index(pos.array_layer),
            Shape::MipArray => index(pos.array_layer) + index(pos.mip_level) * self.mip_size,
        }
    }

    /// Decodes a linear index back into its coordinate.
    ///
    /// Exact for every index in `[0, subresource_count())`; the result is unspecified
    /// outside that range.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "indices within the domain decode to mip levels and layers that fit in u32"
    )]
    pub fn decode(&self, encoded: IndexType) -> Subresource {
        let (aspect_index, local, shape) = match self.strategy {
            Strategy::One(shape) => (0, encoded, shape),
            Strategy::Two(shape) => {
                let aspect_index = u32::from(encoded >= self.aspect_base[1]);
                (
                    aspect_index,
                    encoded - self.aspect_base[aspect_index as usize],
                    shape,
                )
            }
            Strategy::Three => {
                let aspect_index = if encoded >= self.aspect_base[2] {
                    2
                } else if encoded >= self.aspect_base[1] {
                    1
                } else {
                    0
                };
                (
                    aspect_index,
                    encoded - self.aspect_base[aspect_index as usize],
                    Shape::MipArray,
                )
            }
        };
        let (mip_level, array_layer) = match shape {
            Shape::MipOnly => (local, 0),
            Shape::ArrayOnly => (0, local),
            Shape::MipArray => (local / self.mip_size, local % self.mip_size),
        };
        Subresource::new(
            self.traits.bit(aspect_index),
            mip_level as u32,
            array_layer as u32,
            aspect_index,
        )
    }

    /// Dense index of the lowest aspect present in both `mask` and the encoder's mask.
    ///
    /// # Panics
    ///
    /// Panics if `mask` shares no aspect with the encoder.
    #[must_use]
    pub fn lower_bound_from_mask(&self, mask: AspectFlags) -> u32 {
        assert!(
            mask.intersects(self.limits.aspect),
            "aspect mask {mask:?} shares no aspect with {:?}",
            self.limits.aspect
        );
        self.lower_bound_from_mask_at(mask, 0)
    }

    /// Dense index of the lowest aspect at or after `start` present in both masks.
    ///
    /// Returns [`aspect_count()`](Self::aspect_count) when there is none, which generators
    /// use as the "no next aspect" signal.
    #[must_use]
    pub fn lower_bound_from_mask_at(&self, mask: AspectFlags, start: u32) -> u32 {
        let count = self.aspect_count();
        (start..count)
            .find(|&i| mask.intersects(self.traits.bit(i)))
            .unwrap_or(count)
    }

    /// Returns `true` if `subres` addresses a subresource of this image.
    #[must_use]
    pub fn in_range(&self, subres: &ImageSubresource) -> bool {
        subres.mip_level < self.limits.mip_level
            && subres.array_layer < self.limits.array_layer
            && subres.aspect_mask.intersects(self.limits.aspect)
    }

    /// Returns `true` if `range` starts inside the image and does not extend past it.
    #[must_use]
    pub fn range_in_range(&self, range: &SubresourceRange) -> bool {
        let (mips, layers) = (self.limits.mip_level, self.limits.array_layer);
        range.base_mip_level < mips
            && fits(range.base_mip_level, range.level_count, mips)
            && range.base_array_layer < layers
            && fits(range.base_array_layer, range.layer_count, layers)
            && range.aspect_mask.intersects(self.limits.aspect)
    }

    /// Returns `true` if `range` can be iterated by a generator built from this encoder.
    ///
    /// Unlike [`range_in_range`](Self::range_in_range), every selected aspect must belong
    /// to the image, and empty selections are accepted.
    #[must_use]
    pub fn is_valid_selection(&self, range: &SubresourceRange) -> bool {
        let (mips, layers) = (self.limits.mip_level, self.limits.array_layer);
        self.limits.aspect.contains(range.aspect_mask)
            && fits(range.base_mip_level, range.level_count, mips)
            && fits(range.base_array_layer, range.layer_count, layers)
    }

    /// The first coordinate of `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` selects no aspect of this image.
    #[must_use]
    pub fn begin_subresource(&self, range: &SubresourceRange) -> Subresource {
        let aspect_index = self.lower_bound_from_mask(range.aspect_mask);
        Subresource::new(
            self.traits.bit(aspect_index),
            range.base_mip_level,
            range.base_array_layer,
            aspect_index,
        )
    }

    /// Converts an image subresource to a coordinate, using the lowest aspect of its mask
    /// that this image has.
    ///
    /// # Panics
    ///
    /// Panics if the mask shares no aspect with this image.
    #[must_use]
    pub fn subresource(&self, subres: &ImageSubresource) -> Subresource {
        let aspect_index = self.lower_bound_from_mask(subres.aspect_mask);
        Subresource::new(
            self.traits.bit(aspect_index),
            subres.mip_level,
            subres.array_layer,
            aspect_index,
        )
    }

    /// Encodes an image subresource; see [`subresource`](Self::subresource).
    #[must_use]
    pub fn encode_image_subresource(&self, subres: &ImageSubresource) -> IndexType {
        self.encode(&self.subresource(subres))
    }

    /// Converts a coordinate back to an image subresource with a single-bit mask.
    #[must_use]
    pub fn make_image_subresource(&self, subres: &Subresource) -> ImageSubresource {
        ImageSubresource::new(
            self.traits.bit(subres.aspect_index),
            subres.mip_level,
            subres.array_layer,
        )
    }

    /// The full range the encoder was built for.
    #[must_use]
    pub fn full_range(&self) -> &SubresourceRange {
        &self.full_range
    }

    /// Upper bounds of the domain: aspect mask, level count, layer count, aspect count.
    #[must_use]
    pub fn limits(&self) -> &Subresource {
        &self.limits
    }

    /// The canonical aspect combination of the image.
    #[must_use]
    pub fn traits(&self) -> &'static AspectTraits {
        self.traits
    }

    /// The image's aspect mask.
    #[must_use]
    pub fn aspect_mask(&self) -> AspectFlags {
        self.limits.aspect
    }

    /// Number of aspects.
    #[must_use]
    pub fn aspect_count(&self) -> u32 {
        self.limits.aspect_index
    }

    /// Linear indices per mip level (the layer count).
    #[must_use]
    pub fn mip_size(&self) -> IndexType {
        self.mip_size
    }

    /// Linear indices per aspect.
    #[must_use]
    pub fn aspect_size(&self) -> IndexType {
        self.aspect_size
    }

    /// Size of the whole linear domain.
    #[must_use]
    pub fn subresource_count(&self) -> IndexType {
        self.aspect_size * index(self.aspect_count())
    }

    /// The aspect bit at dense index `aspect_index`.
    ///
    /// # Panics
    ///
    /// Panics if `aspect_index >= aspect_count()`.
    #[must_use]
    pub fn aspect_bit(&self, aspect_index: u32) -> AspectFlags {
        assert!(
            aspect_index < self.aspect_count(),
            "aspect index {aspect_index} out of range"
        );
        self.traits.bit(aspect_index)
    }

    /// First linear index of the aspect at dense index `aspect_index`.
    ///
    /// # Panics
    ///
    /// Panics if `aspect_index >= aspect_count()`.
    #[must_use]
    pub fn aspect_base(&self, aspect_index: u32) -> IndexType {
        assert!(
            aspect_index < self.aspect_count(),
            "aspect index {aspect_index} out of range"
        );
        self.aspect_base[aspect_index as usize]
    }
}

/// `base + count <= limit`, without overflow.
#[inline]
pub(crate) fn fits(base: u32, count: u32, limit: u32) -> bool {
    base.checked_add(count).is_some_and(|end| end <= limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(levels: u32, layers: u32) -> RangeEncoder {
        RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, levels, layers))
    }

    #[test]
    fn strategy_follows_axis_cardinality() {
        assert_eq!(color(4, 1).strategy, Strategy::One(Shape::MipOnly));
        assert_eq!(color(1, 4).strategy, Strategy::One(Shape::ArrayOnly));
        assert_eq!(color(3, 4).strategy, Strategy::One(Shape::MipArray));
        let planes = RangeEncoder::new(SubresourceRange::full(
            AspectTraits::MULTIPLANE_3.mask(),
            1,
            1,
        ));
        assert_eq!(planes.strategy, Strategy::Three);
    }

    #[test]
    fn aspect_bases_are_cumulative() {
        let encoder = RangeEncoder::new(SubresourceRange::full(
            AspectTraits::MULTIPLANE_3.mask(),
            2,
            3,
        ));
        assert_eq!(encoder.aspect_size(), 6);
        assert_eq!(encoder.aspect_base(0), 0);
        assert_eq!(encoder.aspect_base(1), 6);
        assert_eq!(encoder.aspect_base(2), 12);
        assert_eq!(encoder.subresource_count(), 18);
    }

    #[test]
    fn try_new_reports_bad_ranges() {
        let err = |range| RangeEncoder::try_new(range).unwrap_err();
        let color_depth = AspectFlags::COLOR | AspectFlags::DEPTH;
        assert_eq!(
            err(SubresourceRange::full(color_depth, 1, 1)),
            EncoderError::NonCanonicalAspectMask(color_depth)
        );
        assert_eq!(
            err(SubresourceRange::full(AspectFlags::empty(), 1, 1)),
            EncoderError::NoAspects
        );
        assert_eq!(
            err(SubresourceRange::new(AspectFlags::COLOR, 1, 1, 0, 1)),
            EncoderError::NonZeroBase
        );
        assert_eq!(
            err(SubresourceRange::full(AspectFlags::COLOR, 0, 1)),
            EncoderError::EmptyRange
        );
    }

    #[test]
    fn lower_bound_with_start_tolerates_exhaustion() {
        let encoder = RangeEncoder::new(SubresourceRange::full(
            AspectFlags::DEPTH | AspectFlags::STENCIL,
            1,
            1,
        ));
        assert_eq!(encoder.lower_bound_from_mask(AspectFlags::STENCIL), 1);
        assert_eq!(
            encoder.lower_bound_from_mask(AspectFlags::DEPTH | AspectFlags::STENCIL),
            0
        );
        assert_eq!(encoder.lower_bound_from_mask_at(AspectFlags::DEPTH, 1), 2);
        assert_eq!(encoder.lower_bound_from_mask_at(AspectFlags::STENCIL, 5), 2);
    }

    #[test]
    #[should_panic(expected = "shares no aspect")]
    fn lower_bound_without_common_aspect_panics() {
        let _ = color(1, 1).lower_bound_from_mask(AspectFlags::DEPTH);
    }

    #[test]
    fn image_subresource_uses_lowest_known_aspect() {
        let encoder = RangeEncoder::new(SubresourceRange::full(
            AspectFlags::DEPTH | AspectFlags::STENCIL,
            2,
            2,
        ));
        let subres = ImageSubresource::new(AspectFlags::COLOR | AspectFlags::STENCIL, 1, 1);
        let pos = encoder.subresource(&subres);
        assert_eq!(pos, Subresource::new(AspectFlags::STENCIL, 1, 1, 1));
        assert_eq!(encoder.encode_image_subresource(&subres), 4 + 2 + 1);
        assert_eq!(
            encoder.make_image_subresource(&pos),
            ImageSubresource::new(AspectFlags::STENCIL, 1, 1)
        );
    }

    #[test]
    fn range_predicates() {
        let encoder = color(4, 6);
        assert!(encoder.in_range(&ImageSubresource::new(AspectFlags::COLOR, 3, 5)));
        assert!(!encoder.in_range(&ImageSubresource::new(AspectFlags::COLOR, 4, 0)));
        assert!(!encoder.in_range(&ImageSubresource::new(AspectFlags::DEPTH, 0, 0)));

        let inside = SubresourceRange::new(AspectFlags::COLOR, 1, 3, 2, 4);
        assert!(encoder.range_in_range(&inside));
        assert!(encoder.is_valid_selection(&inside));

        let too_long = SubresourceRange::new(AspectFlags::COLOR, 1, 4, 0, 1);
        assert!(!encoder.range_in_range(&too_long));
        assert!(!encoder.is_valid_selection(&too_long));

        let foreign = SubresourceRange::new(AspectFlags::COLOR | AspectFlags::DEPTH, 0, 1, 0, 1);
        assert!(encoder.range_in_range(&foreign));
        assert!(!encoder.is_valid_selection(&foreign));

        let overflowing = SubresourceRange::new(AspectFlags::COLOR, 1, u32::MAX, 0, 1);
        assert!(!encoder.is_valid_selection(&overflowing));
    }
}
