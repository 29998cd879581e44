//! Supporting types for the kernel operations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{KernelError, ParameterError};

/// Number of bits used to encode one sample inside a packed byte stream.
///
/// Only widths that divide a byte evenly are representable. [`BitDepth::Eight`]
/// is the identity codec. Serialized as the plain integer width, so a
/// configuration can say `"nbits": 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum BitDepth {
    /// One bit per sample, eight samples per byte.
    One = 1,
    /// Two bits per sample, four samples per byte.
    Two = 2,
    /// Four bits per sample, two samples per byte.
    Four = 4,
    /// One sample per byte.
    Eight = 8,
}

impl BitDepth {
    /// All supported depths, narrowest first.
    pub const ALL: [BitDepth; 4] = [BitDepth::One, BitDepth::Two, BitDepth::Four, BitDepth::Eight];

    /// Width in bits.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Number of samples stored in one byte.
    pub const fn samples_per_byte(self) -> usize {
        8 / self.bits() as usize
    }

    /// Mask selecting one sample's worth of low bits.
    pub const fn mask(self) -> u8 {
        match self {
            BitDepth::Eight => u8::MAX,
            other => (1u8 << other.bits()) - 1,
        }
    }

    /// Largest value a sample of this depth can hold.
    pub const fn max_value(self) -> u8 {
        self.mask()
    }

    /// Number of samples produced by unpacking `n_bytes` bytes.
    pub const fn unpacked_len(self, n_bytes: usize) -> usize {
        n_bytes * self.samples_per_byte()
    }

    /// Number of whole bytes produced by packing `n_samples` samples.
    pub const fn packed_len(self, n_samples: usize) -> usize {
        n_samples / self.samples_per_byte()
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = KernelError;

    fn try_from(nbits: u8) -> Result<Self, Self::Error> {
        match nbits {
            1 => Ok(BitDepth::One),
            2 => Ok(BitDepth::Two),
            4 => Ok(BitDepth::Four),
            8 => Ok(BitDepth::Eight),
            other => Err(ParameterError::invalid_value(
                "nbits",
                format!("must be one of 1, 2, 4 or 8, got {other}"),
            )
            .into()),
        }
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}
