//! Sub-byte sample packing.
//!
//! Raw filterbank data is commonly written at 1, 2 or 4 bits per sample. This
//! module converts between those packed byte streams and one-sample-per-byte
//! buffers.
//!
//! ## Bit order
//!
//! The order of samples within a byte depends on the depth:
//!
//! - **1 bit**: least significant bit first (bit 0 is the first sample).
//! - **2 and 4 bits**: most significant group first; each group reads as a
//!   big-endian integer, so group `j` is `(byte >> (8 - nbits * (j + 1))) & mask`.
//! - **8 bits**: identity.
//!
//! ```rust
//! use sigproc_kernels::operations::codec::{pack, unpack};
//!
//! let packed = [0u8, 2, 7, 23];
//! let samples = unpack(&packed, 4).unwrap();
//! assert_eq!(samples, vec![0, 0, 0, 2, 0, 7, 1, 7]);
//! assert_eq!(pack(&samples, 4).unwrap(), packed);
//! ```

use super::types::BitDepth;
use crate::{KernelResult, ParameterError};

/// Unpacks `packed` at `nbits` bits per sample.
///
/// Returns `packed.len() * 8 / nbits` samples, each in `[0, 2^nbits - 1]`.
///
/// # Errors
/// Returns an invalid-parameter error if `nbits` is not one of 1, 2, 4 or 8.
pub fn unpack(packed: &[u8], nbits: u8) -> KernelResult<Vec<u8>> {
    Ok(BitDepth::try_from(nbits)?.unpack(packed))
}

/// Packs `unpacked` samples at `nbits` bits per sample.
///
/// Exact inverse of [`unpack`]. Bits above the depth are masked off. Trailing
/// samples that do not fill a whole byte are dropped.
///
/// # Errors
/// Returns an invalid-parameter error if `nbits` is not one of 1, 2, 4 or 8.
pub fn pack(unpacked: &[u8], nbits: u8) -> KernelResult<Vec<u8>> {
    Ok(BitDepth::try_from(nbits)?.pack(unpacked))
}

impl BitDepth {
    /// Right shift that brings sample `j` of a byte down to the low bits.
    #[inline(always)]
    const fn shift(self, j: usize) -> u32 {
        match self {
            BitDepth::One => j as u32,
            other => 8 - other.bits() as u32 * (j as u32 + 1),
        }
    }

    /// Unpacks a byte stream into one sample per byte.
    pub fn unpack(self, packed: &[u8]) -> Vec<u8> {
        tracing::trace!(depth = %self, n_bytes = packed.len(), "unpack");
        if self == BitDepth::Eight {
            return packed.to_vec();
        }
        let mut out = vec![0u8; self.unpacked_len(packed.len())];
        self.unpack_unchecked(packed, &mut out);
        out
    }

    /// Unpacks into a caller-owned buffer.
    ///
    /// # Errors
    /// Returns an invalid-parameter error unless `out.len()` equals
    /// [`BitDepth::unpacked_len`] of `packed.len()`.
    pub fn unpack_into(self, packed: &[u8], out: &mut [u8]) -> KernelResult<()> {
        let expected = self.unpacked_len(packed.len());
        if out.len() != expected {
            return Err(ParameterError::length_mismatch("out", expected, out.len()).into());
        }
        self.unpack_unchecked(packed, out);
        Ok(())
    }

    fn unpack_unchecked(self, packed: &[u8], out: &mut [u8]) {
        let per_byte = self.samples_per_byte();
        let mask = self.mask();
        for (&byte, samples) in packed.iter().zip(out.chunks_exact_mut(per_byte)) {
            for (j, sample) in samples.iter_mut().enumerate() {
                *sample = (byte >> self.shift(j)) & mask;
            }
        }
    }

    /// Packs one-sample-per-byte data into a byte stream.
    pub fn pack(self, unpacked: &[u8]) -> Vec<u8> {
        tracing::trace!(depth = %self, n_samples = unpacked.len(), "pack");
        let n_bytes = self.packed_len(unpacked.len());
        let dropped = unpacked.len() - n_bytes * self.samples_per_byte();
        if dropped > 0 {
            tracing::debug!(
                depth = %self,
                dropped,
                "pack: trailing samples do not fill a byte and are dropped"
            );
        }
        let mut out = vec![0u8; n_bytes];
        self.pack_unchecked(unpacked, &mut out);
        out
    }

    /// Packs into a caller-owned buffer.
    ///
    /// # Errors
    /// Returns an invalid-parameter error unless `unpacked.len()` is a whole number
    /// of bytes at this depth and `out.len()` equals [`BitDepth::packed_len`].
    pub fn pack_into(self, unpacked: &[u8], out: &mut [u8]) -> KernelResult<()> {
        if unpacked.len() % self.samples_per_byte() != 0 {
            return Err(ParameterError::invalid_value(
                "unpacked",
                format!(
                    "length {} is not a multiple of {} samples per byte",
                    unpacked.len(),
                    self.samples_per_byte()
                ),
            )
            .into());
        }
        let expected = self.packed_len(unpacked.len());
        if out.len() != expected {
            return Err(ParameterError::length_mismatch("out", expected, out.len()).into());
        }
        self.pack_unchecked(unpacked, out);
        Ok(())
    }

    fn pack_unchecked(self, unpacked: &[u8], out: &mut [u8]) {
        let mask = self.mask();
        for (byte, samples) in out
            .iter_mut()
            .zip(unpacked.chunks_exact(self.samples_per_byte()))
        {
            *byte = samples
                .iter()
                .enumerate()
                .fold(0u8, |acc, (j, &sample)| acc | ((sample & mask) << self.shift(j)));
        }
    }
}
