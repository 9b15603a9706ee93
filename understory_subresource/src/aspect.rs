// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aspect flags and the canonical aspect combinations an encoder can be built for.

bitflags::bitflags! {
    /// Image aspect (plane) bits.
    ///
    /// Bit values match the common graphics API encoding, so masks can be passed through
    /// from a host API without translation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AspectFlags: u32 {
        /// Color data.
        const COLOR    = 0x0000_0001;
        /// Depth data.
        const DEPTH    = 0x0000_0002;
        /// Stencil data.
        const STENCIL  = 0x0000_0004;
        /// Sparse residency metadata.
        const METADATA = 0x0000_0008;
        /// First plane of a multi-planar format.
        const PLANE_0  = 0x0000_0010;
        /// Second plane of a multi-planar format.
        const PLANE_1  = 0x0000_0020;
        /// Third plane of a multi-planar format.
        const PLANE_2  = 0x0000_0040;
    }
}

impl Default for AspectFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Constant description of one canonical aspect combination.
///
/// There is exactly one `AspectTraits` value per canonical mask, obtained with
/// [`resolve`](Self::resolve). Each one lists its aspect bits in ascending order, and the
/// position of a bit in that list is its dense aspect index.
///
/// | Combination     | Mask                             | Count |
/// |-----------------|----------------------------------|-------|
/// | none            | empty                            | 0     |
/// | color           | `COLOR`                          | 1     |
/// | depth           | `DEPTH`                          | 1     |
/// | stencil         | `STENCIL`                        | 1     |
/// | depth + stencil | `DEPTH \| STENCIL`               | 2     |
/// | two planes      | `PLANE_0 \| PLANE_1`             | 2     |
/// | three planes    | `PLANE_0 \| PLANE_1 \| PLANE_2`  | 3     |
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AspectTraits {
    mask: AspectFlags,
    count: u32,
    bits: &'static [AspectFlags],
}

static CANONICAL: [&AspectTraits; 7] = [
    &AspectTraits::COLOR,
    &AspectTraits::DEPTH,
    &AspectTraits::STENCIL,
    &AspectTraits::DEPTH_STENCIL,
    &AspectTraits::MULTIPLANE_2,
    &AspectTraits::MULTIPLANE_3,
    &AspectTraits::NONE,
];

impl AspectTraits {
    /// Largest number of aspects any canonical combination has.
    pub const MAX_ASPECTS: usize = 3;

    /// No aspects.
    pub const NONE: Self = Self {
        mask: AspectFlags::empty(),
        count: 0,
        bits: &[],
    };
    /// Color only.
    pub const COLOR: Self = Self {
        mask: AspectFlags::COLOR,
        count: 1,
        bits: &[AspectFlags::COLOR],
    };
    /// Depth only.
    pub const DEPTH: Self = Self {
        mask: AspectFlags::DEPTH,
        count: 1,
        bits: &[AspectFlags::DEPTH],
    };
    /// Stencil only.
    pub const STENCIL: Self = Self {
        mask: AspectFlags::STENCIL,
        count: 1,
        bits: &[AspectFlags::STENCIL],
    };
    /// Combined depth and stencil.
    pub const DEPTH_STENCIL: Self = Self {
        mask: AspectFlags::DEPTH.union(AspectFlags::STENCIL),
        count: 2,
        bits: &[AspectFlags::DEPTH, AspectFlags::STENCIL],
    };
    /// Two-plane format.
    pub const MULTIPLANE_2: Self = Self {
        mask: AspectFlags::PLANE_0.union(AspectFlags::PLANE_1),
        count: 2,
        bits: &[AspectFlags::PLANE_0, AspectFlags::PLANE_1],
    };
    /// Three-plane format.
    pub const MULTIPLANE_3: Self = Self {
        mask: AspectFlags::PLANE_0
            .union(AspectFlags::PLANE_1)
            .union(AspectFlags::PLANE_2),
        count: 3,
        bits: &[
            AspectFlags::PLANE_0,
            AspectFlags::PLANE_1,
            AspectFlags::PLANE_2,
        ],
    };

    /// Returns the traits for a canonical mask, or `None` if `mask` is not canonical.
    #[must_use]
    pub fn try_resolve(mask: AspectFlags) -> Option<&'static Self> {
        CANONICAL.iter().copied().find(|traits| traits.mask == mask)
    }

    /// Returns the traits for a canonical mask.
    ///
    /// # Panics
    ///
    /// Panics if `mask` is not one of the canonical combinations.
    #[must_use]
    pub fn resolve(mask: AspectFlags) -> &'static Self {
        match Self::try_resolve(mask) {
            Some(traits) => traits,
            None => panic!("aspect mask {mask:?} is not a canonical combination"),
        }
    }

    /// The full aspect mask of this combination.
    #[must_use]
    pub const fn mask(&self) -> AspectFlags {
        self.mask
    }

    /// Number of aspects.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Aspect bits in dense-index order.
    #[must_use]
    pub const fn bits(&self) -> &'static [AspectFlags] {
        self.bits
    }

    /// Returns the aspect bit at dense index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.count()`.
    #[must_use]
    pub fn bit(&self, index: u32) -> AspectFlags {
        self.bits[index as usize]
    }

    /// Maps a single aspect bit to its dense index.
    ///
    /// Returns `None` if `bit` is not one of this combination's bits.
    #[must_use]
    pub fn index_of(&self, bit: AspectFlags) -> Option<u32> {
        (0_u32..)
            .zip(self.bits)
            .find_map(|(index, candidate)| (*candidate == bit).then_some(index))
    }
}
