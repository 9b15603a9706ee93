// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition of a [`SubresourceRange`] into contiguous linear index ranges.

use understory_range_map::IndexRange;

use crate::cursor::SubresourceCursor;
use crate::encoder::RangeEncoder;
use crate::types::{Subresource, SubresourceRange, index};

/// Produces the minimal ascending sequence of [`IndexRange`]s covering a selection.
///
/// The selection is classified once, at construction:
///
/// 1. Every layer, every mip level, and every aspect: one range over the whole domain.
/// 2. Every layer and mip level, some aspects: one range per selected aspect.
/// 3. Every layer, some mip levels: one range per selected aspect spanning all selected
///    mip levels.
/// 4. Some layers: one range per selected aspect and mip level, spanning the selected
///    layers.
///
/// The generator drives a [`SubresourceCursor`] in lock step, so that at every step the
/// cursor sits on the first coordinate of [`current`](Self::current). After the last range
/// both are tombstoned: the range becomes [`IndexRange::EMPTY`] and the cursor's aspect is
/// cleared.
///
/// ```rust
/// use understory_subresource::{AspectFlags, RangeEncoder, RangeGenerator, SubresourceRange};
///
/// let encoder = RangeEncoder::new(SubresourceRange::full(
///     AspectFlags::DEPTH | AspectFlags::STENCIL,
///     2,
///     4,
/// ));
/// let mip_one = SubresourceRange::new(AspectFlags::DEPTH | AspectFlags::STENCIL, 1, 1, 0, 4);
/// let ranges: Vec<_> = RangeGenerator::new(&encoder, mip_one)
///     .map(|range| range.as_range())
///     .collect();
/// assert_eq!(ranges, [4..8, 12..16]);
/// ```
#[derive(Clone, Debug)]
pub struct RangeGenerator<'a> {
    encoder: &'a RangeEncoder,
    cursor: SubresourceCursor<'a>,
    pos: IndexRange,
    aspect_base: IndexRange,
    mip_count: u32,
    mip_index: u32,
    aspect_count: u32,
    aspect_index: u32,
}

impl<'a> RangeGenerator<'a> {
    /// Creates a generator positioned at the first range of `range`.
    ///
    /// An empty selection yields a generator that is already at its end.
    ///
    /// # Panics
    ///
    /// Panics if `range` does not fit the encoder's domain
    /// (see [`RangeEncoder::is_valid_selection`]).
    #[must_use]
    pub fn new(encoder: &'a RangeEncoder, range: SubresourceRange) -> Self {
        assert!(
            encoder.is_valid_selection(&range),
            "subresource range {range:?} does not fit the encoder's domain"
        );
        let cursor = SubresourceCursor::new(encoder, range);
        let mut generator = Self {
            encoder,
            cursor,
            pos: IndexRange::EMPTY,
            aspect_base: IndexRange::EMPTY,
            mip_count: 0,
            mip_index: 0,
            aspect_count: 0,
            aspect_index: encoder.aspect_count(),
        };
        if generator.cursor.is_at_end() {
            return generator;
        }

        let limits = encoder.limits();
        let aspect_index = generator.cursor.subresource().aspect_index;
        let full_layers = range.base_array_layer == 0 && range.layer_count == limits.array_layer;
        let full_mips = range.base_mip_level == 0 && range.level_count == limits.mip_level;
        let (pos, mip_count, aspect_count) = if full_layers {
            // Whole layer spans merge across mip levels, so there is no per-mip stepping.
            if full_mips {
                if range.aspect_mask == limits.aspect {
                    // A single aspect count means the aspect never advances.
                    (IndexRange::new(0, encoder.subresource_count()), 1, 1)
                } else {
                    let begin = encoder.aspect_base(aspect_index);
                    (
                        IndexRange::from_len(begin, encoder.aspect_size()),
                        1,
                        encoder.aspect_count(),
                    )
                }
            } else {
                let begin = encoder.aspect_base(aspect_index)
                    + index(range.base_mip_level) * encoder.mip_size();
                (
                    IndexRange::from_len(begin, index(range.level_count) * encoder.mip_size()),
                    1,
                    encoder.aspect_count(),
                )
            }
        } else {
            let begin = encoder.encode(generator.cursor.subresource());
            (
                IndexRange::from_len(begin, index(range.layer_count)),
                range.level_count,
                encoder.aspect_count(),
            )
        };

        generator.pos = pos;
        generator.aspect_base = pos;
        generator.mip_count = mip_count;
        generator.aspect_count = aspect_count;
        generator.aspect_index = aspect_index;
        generator
    }

    /// Creates a generator over the encoder's whole domain, which is a single range.
    #[must_use]
    pub fn full(encoder: &'a RangeEncoder) -> Self {
        Self::new(encoder, *encoder.full_range())
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
    pub fn subresource(&self) -> &Subresource {
        self.cursor.subresource()
    }

    /// The lock-stepped coordinate cursor.
    #[must_use]
    pub fn cursor(&self) -> &SubresourceCursor<'a> {
        &self.cursor
    }

    /// The coordinate cursor, for walking within the current range.
    ///
    /// Each [`advance`](Self::advance) reseeks the cursor to the start of the next range.
    pub fn cursor_mut(&mut self) -> &mut SubresourceCursor<'a> {
        &mut self.cursor
    }

    /// The encoder the generator was built from.
    #[must_use]
    pub fn encoder(&self) -> &'a RangeEncoder {
        self.encoder
    }

    /// Moves to the next range, or to the tombstone after the last one.
    ///
    /// Advancing at the end is a no-op.
    pub fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        self.mip_index += 1;
        if self.mip_index < self.mip_count {
            // Partial layer spans are discontinuous between mip levels.
            self.pos += self.encoder.mip_size();
            self.cursor
                .seek_mip(self.cursor.limits().base_mip_level + self.mip_index);
            return;
        }

        let last_aspect = self.aspect_index;
        self.aspect_index = self
            .encoder
            .lower_bound_from_mask_at(self.cursor.limits().aspect_mask, last_aspect + 1);
        if self.aspect_index < self.aspect_count {
            self.cursor.seek_aspect(self.aspect_index);
            assert!(
                !self.cursor.is_at_end(),
                "cursor tombstoned while ranges remain"
            );
            self.aspect_base += self.encoder.aspect_base(self.aspect_index)
                - self.encoder.aspect_base(last_aspect);
            self.pos = self.aspect_base;
            self.mip_index = 0;
        } else {
            self.pos = IndexRange::EMPTY;
            self.cursor.set_end();
        }
    }
}

impl Iterator for RangeGenerator<'_> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectFlags;
    use alloc::vec::Vec;

    fn ranges(generator: RangeGenerator<'_>) -> Vec<(u64, u64)> {
        generator.map(|r| (r.begin, r.end)).collect()
    }

    #[test]
    fn full_domain_is_one_range() {
        let encoder = RangeEncoder::new(SubresourceRange::full(
            AspectFlags::PLANE_0 | AspectFlags::PLANE_1 | AspectFlags::PLANE_2,
            3,
            2,
        ));
        assert_eq!(ranges(RangeGenerator::full(&encoder)), [(0, 18)]);
    }

    #[test]
    fn partial_layers_step_per_mip_and_aspect() {
        let encoder = RangeEncoder::new(SubresourceRange::full(
            AspectFlags::DEPTH | AspectFlags::STENCIL,
            3,
            4,
        ));
        let range = SubresourceRange::new(AspectFlags::DEPTH | AspectFlags::STENCIL, 1, 2, 1, 2);
        assert_eq!(
            ranges(RangeGenerator::new(&encoder, range)),
            [(5, 7), (9, 11), (17, 19), (21, 23)]
        );
    }

    #[test]
    fn cursor_tracks_range_starts() {
        let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 3, 4));
        let range = SubresourceRange::new(AspectFlags::COLOR, 0, 3, 2, 2);
        let mut generator = RangeGenerator::new(&encoder, range);
        while !generator.is_at_end() {
            assert_eq!(
                encoder.encode(generator.subresource()),
                generator.current().begin
            );
            generator.advance();
        }
        assert!(generator.cursor().is_at_end());
        assert_eq!(generator.current(), IndexRange::EMPTY);
        generator.advance();
        assert!(generator.is_at_end());
    }

    #[test]
    fn empty_selection_starts_at_end() {
        let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 2, 2));
        let selection = SubresourceRange::new(AspectFlags::COLOR, 0, 2, 1, 0);
        let generator = RangeGenerator::new(&encoder, selection);
        assert!(generator.is_at_end());
        assert!(generator.cursor().is_at_end());
    }

    #[test]
    #[should_panic(expected = "does not fit the encoder's domain")]
    fn oversized_selection_panics() {
        let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 2, 2));
        let selection = SubresourceRange::new(AspectFlags::COLOR, 1, 2, 0, 2);
        let _ = RangeGenerator::new(&encoder, selection);
    }
}
