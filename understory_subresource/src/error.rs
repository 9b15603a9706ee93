// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::aspect::AspectFlags;
use crate::types::Extent3D;

/// Reasons an encoder cannot be built for a full image range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncoderError {
    /// The aspect mask is not one of the canonical combinations.
    NonCanonicalAspectMask(AspectFlags),
    /// The range has a non-zero base mip level or base array layer.
    NonZeroBase,
    /// The aspect mask is empty.
    NoAspects,
    /// The range has zero mip levels or zero array layers.
    EmptyRange,
    /// The image extent has a zero dimension, or has depth greater than one on an arrayed image.
    InvalidExtent(Extent3D),
    /// The memory layout cannot hold a single element of the given size.
    InvalidLayout,
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonCanonicalAspectMask(mask) => {
                write!(f, "aspect mask {mask:?} is not a canonical combination")
            }
            Self::NonZeroBase => {
                f.write_str("encoder range must start at mip level 0 and array layer 0")
            }
            Self::NoAspects => f.write_str("encoder range selects no aspects"),
            Self::EmptyRange => f.write_str("encoder range has no mip levels or no array layers"),
            Self::InvalidExtent(extent) => write!(f, "image extent {extent:?} is not encodable"),
            Self::InvalidLayout => f.write_str("memory layout cannot hold an element"),
        }
    }
}

impl core::error::Error for EncoderError {}
