//! Core trait definitions for the kernel operations.
//!
//! The free functions in [`super::statistics`] and [`super::transforms`] are the
//! primary interface. These traits expose the same operations as methods on
//! sample slices so pipeline code can write `block.running_median(w)`.

use crate::KernelResult;

/// Sliding-window statistics over a sample sequence.
///
/// Implemented for `[T]` where `T` is any supported [`crate::Sample`].
pub trait WindowedStatistics {
    /// Edge-replicated running mean, one value per sample.
    ///
    /// # Errors
    /// Fails with an invalid-parameter error if the window is outside `[1, N]`.
    fn running_mean(&self, window: usize) -> KernelResult<Vec<f64>>;

    /// Edge-replicated running median, one value per sample.
    ///
    /// # Errors
    /// Fails with an invalid-parameter error if the window is outside `[1, N]`.
    fn running_median(&self, window: usize) -> KernelResult<Vec<f64>>;
}

/// Real-input spectral transforms with interleaved half-spectrum packing.
///
/// Implemented for `[F]` where `F` is `f32` or `f64`.
pub trait RealTransforms {
    /// Element type of the samples and of the spectrum buffer.
    type Elem;

    /// Unnormalised forward transform, `2 * (N / 2 + 1)` interleaved values.
    fn forward_real_transform(&self) -> Vec<Self::Elem>;

    /// Treats `self` as a spectrum buffer and inverts it to `n_samples` real
    /// samples, scaled by `n_samples`.
    ///
    /// # Errors
    /// Fails with an invalid-parameter error if `self.len() != 2 * (n_samples / 2 + 1)`.
    fn inverse_real_transform(&self, n_samples: usize) -> KernelResult<Vec<Self::Elem>>;
}
