//! Real-input spectral transforms.
//!
//! A real signal of `N` samples has a Hermitian spectrum, so only bins
//! `0..=N/2` carry information. The forward transform stores exactly those
//! `N/2 + 1` bins as interleaved `(re, im)` pairs:
//!
//! ```text
//! [re_0, im_0, re_1, im_1, ..., re_{N/2}, im_{N/2}]     length 2 * (N/2 + 1)
//! ```
//!
//! `im_0` is always zero, as is the Nyquist slot `im_{N/2}` for even `N`; the slot
//! is still reserved so the layout does not depend on the parity of `N`.
//!
//! Neither direction normalises, so `inverse(forward(x), N) == N * x`.
//!
//! The transforms run on `realfft` plans taken from the shared
//! [`super::fft_backends`] cache; this module only converts between the packed
//! layout and the plans' complex bins.

use num_complex::Complex;
use num_traits::Zero;

use super::fft_backends::FftPrecision;
use super::traits::RealTransforms;
use crate::{KernelResult, ParameterError};

/// Number of retained bins for an `n`-point real transform.
pub const fn spectrum_bins(n_samples: usize) -> usize {
    n_samples / 2 + 1
}

/// Length of the interleaved spectrum buffer for an `n`-point real transform.
pub const fn spectrum_len(n_samples: usize) -> usize {
    2 * spectrum_bins(n_samples)
}

/// Forward real transform of `samples`.
///
/// Returns `2 * (N / 2 + 1)` values: the unnormalised DFT bins `0..=N/2` as
/// interleaved `(re, im)` pairs. Any length is supported, including odd and
/// prime lengths. An empty input yields the single zero DC bin `[0, 0]`.
///
/// # Examples
/// ```rust
/// use sigproc_kernels::operations::transforms::forward_real_transform;
///
/// let spectrum = forward_real_transform(&[1.0f64, 1.0, 1.0, 1.0]);
/// assert_eq!(spectrum, vec![4.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
/// ```
pub fn forward_real_transform<F: FftPrecision>(samples: &[F]) -> Vec<F> {
    let n_samples = samples.len();
    tracing::trace!(n_samples, "forward_real_transform");
    if n_samples == 0 {
        return vec![F::zero(); spectrum_len(0)];
    }

    let plan = F::plan_cache().plan(n_samples);
    let bins = match plan.forward(samples) {
        Ok(bins) => bins,
        Err(err) => {
            // The plan is looked up by `n_samples`, so the lengths always agree.
            tracing::error!(%err, n_samples, "forward real transform failed");
            return vec![F::nan(); spectrum_len(n_samples)];
        }
    };

    let mut spectrum = Vec::with_capacity(spectrum_len(n_samples));
    for bin in &bins {
        spectrum.push(bin.re);
        spectrum.push(bin.im);
    }
    spectrum[1] = F::zero();
    if n_samples % 2 == 0 {
        spectrum[2 * bins.len() - 1] = F::zero();
    }
    spectrum
}

/// Inverse real transform of a packed half spectrum.
///
/// Returns the unnormalised inverse DFT of the Hermitian spectrum whose first
/// `n_samples / 2 + 1` bins are given, i.e. `n_samples` times the original
/// signal. The imaginary parts of the DC bin and, for even `n_samples`, of the
/// Nyquist bin are ignored.
///
/// # Errors
/// Returns an invalid-parameter error if `spectrum.len() != 2 * (n_samples / 2 + 1)`.
///
/// # Examples
/// ```rust
/// use sigproc_kernels::operations::transforms::{forward_real_transform, inverse_real_transform};
///
/// let x = [0.5f64, -1.0, 2.0];
/// let y = inverse_real_transform(&forward_real_transform(&x), x.len()).unwrap();
/// for (a, b) in x.iter().zip(&y) {
///     assert!((a * 3.0 - b).abs() < 1e-12);
/// }
/// ```
pub fn inverse_real_transform<F: FftPrecision>(
    spectrum: &[F],
    n_samples: usize,
) -> KernelResult<Vec<F>> {
    let expected = spectrum_len(n_samples);
    if spectrum.len() != expected {
        return Err(ParameterError::length_mismatch("spectrum", expected, spectrum.len()).into());
    }
    tracing::trace!(n_samples, "inverse_real_transform");
    if n_samples == 0 {
        return Ok(Vec::new());
    }

    let mut bins: Vec<Complex<F>> = bins_of(spectrum)?.collect();
    bins[0].im = F::zero();
    if n_samples % 2 == 0 {
        bins[n_samples / 2].im = F::zero();
    }
    F::plan_cache().plan(n_samples).inverse(&mut bins)
}

/// Splits an interleaved spectrum buffer into complex bins.
fn bins_of<F: FftPrecision>(spectrum: &[F]) -> KernelResult<impl Iterator<Item = Complex<F>> + '_> {
    if spectrum.len() % 2 != 0 {
        return Err(ParameterError::invalid_value(
            "spectrum",
            format!(
                "length {} is odd; expected interleaved (re, im) pairs",
                spectrum.len()
            ),
        )
        .into());
    }
    Ok(spectrum
        .chunks_exact(2)
        .map(|pair| Complex::new(pair[0], pair[1])))
}

/// Amplitude `|X_k|` of every bin of an interleaved spectrum buffer.
///
/// # Errors
/// Returns an invalid-parameter error if the buffer length is odd.
pub fn amplitude_spectrum<F: FftPrecision>(spectrum: &[F]) -> KernelResult<Vec<F>> {
    Ok(bins_of(spectrum)?.map(|bin| bin.norm()).collect())
}

/// Amplitude spectrum with nearest-neighbour interpolation.
///
/// A periodic signal whose frequency falls halfway between two Fourier bins loses
/// up to ~36% of its amplitude in either bin. For each bin this returns
/// `sqrt(max(|X_k|^2, (pi^2 / 16) * |X_k - X_{k-1}|^2))`, with `X_{-1} = 0`, which
/// recovers most of that loss for periodicity searches.
///
/// # Errors
/// Returns an invalid-parameter error if the buffer length is odd.
pub fn interpolated_amplitude_spectrum<F: FftPrecision>(spectrum: &[F]) -> KernelResult<Vec<F>> {
    let pi = F::PI();
    let weight = pi * pi / F::cast_from(16.0);
    let mut previous = Complex::<F>::zero();
    Ok(bins_of(spectrum)?
        .map(|bin| {
            let power = bin.norm_sqr();
            let interbin = (bin - previous).norm_sqr() * weight;
            previous = bin;
            power.max(interbin).sqrt()
        })
        .collect())
}

impl<F: FftPrecision> RealTransforms for [F] {
    type Elem = F;

    fn forward_real_transform(&self) -> Vec<F> {
        forward_real_transform(self)
    }

    fn inverse_real_transform(&self, n_samples: usize) -> KernelResult<Vec<F>> {
        inverse_real_transform(self, n_samples)
    }
}
