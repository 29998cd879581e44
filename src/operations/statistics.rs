//! Sliding-window statistics with edge replication.
//!
//! Every output index `i` summarises the `W` samples
//!
//! ```text
//! lo = i - ceil((W - 1) / 2)
//! hi = i + floor((W - 1) / 2)
//! ```
//!
//! where indices below `0` read sample `0` and indices past the end read the last
//! sample. Odd windows are centred; even windows lean one sample towards the past.
//! Replicated edge samples count once per replicated position.
//!
//! Both drivers slide the window one sample at a time, dropping the sample that
//! leaves and adding the one that enters, so the replicated edges fall out of the
//! same update as the interior. The mean keeps a compensated sum over the finite
//! samples and counts non-finite ones separately, so a single spike or `NaN`
//! only affects the outputs whose windows contain it.

use super::order_statistics::SlidingMedian;
use super::traits::WindowedStatistics;
use crate::traits::Sample;
use crate::{KernelResult, ParameterError};

/// Offsets of the window around its output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowSpan {
    /// Samples before the output index, `ceil((W - 1) / 2)`.
    back: usize,
    /// Samples after the output index, `floor((W - 1) / 2)`.
    forward: usize,
}

impl WindowSpan {
    fn new(window: usize, n_samples: usize) -> KernelResult<Self> {
        if window == 0 || (n_samples > 0 && window > n_samples) {
            return Err(
                ParameterError::out_of_range("window", window, 1, n_samples.max(1)).into(),
            );
        }
        Ok(Self {
            back: window / 2,
            forward: (window - 1) / 2,
        })
    }
}

/// Reads samples at signed positions, replicating the edge samples outside `[0, N)`.
struct Replicated<'a, T> {
    samples: &'a [T],
}

impl<T: Sample> Replicated<'_, T> {
    #[inline(always)]
    fn at(&self, index: isize) -> f64 {
        let last = self.samples.len() - 1;
        let clamped = index.clamp(0, last as isize) as usize;
        self.samples[clamped].as_f64()
    }

    /// Sum of the window centred on `index`, accumulated from scratch.
    fn window_sum(&self, index: isize, span: WindowSpan) -> WindowSum {
        let mut acc = WindowSum::default();
        for k in index - span.back as isize..=index + span.forward as isize {
            acc.push(self.at(k));
        }
        acc
    }
}

/// Sliding sum of a window of `f64` samples.
///
/// Finite samples go through Neumaier compensated summation, so a large value
/// leaving the window does not take the small ones with it. Infinities and
/// `NaN`s are only counted and never enter the running total.
#[derive(Debug, Default, Clone, Copy)]
struct WindowSum {
    sum: f64,
    compensation: f64,
    nan: usize,
    pos_inf: usize,
    neg_inf: usize,
}

impl WindowSum {
    fn push(&mut self, x: f64) {
        if x.is_nan() {
            self.nan += 1;
        } else if x == f64::INFINITY {
            self.pos_inf += 1;
        } else if x == f64::NEG_INFINITY {
            self.neg_inf += 1;
        } else {
            self.accumulate(x);
        }
    }

    /// Removes a sample previously passed to [`Self::push`].
    fn pop(&mut self, x: f64) {
        if x.is_nan() {
            self.nan -= 1;
        } else if x == f64::INFINITY {
            self.pos_inf -= 1;
        } else if x == f64::NEG_INFINITY {
            self.neg_inf -= 1;
        } else {
            self.accumulate(-x);
        }
    }

    fn accumulate(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// False once the finite part has overflowed and must be rebuilt.
    fn is_finite(&self) -> bool {
        self.sum.is_finite() && self.compensation.is_finite()
    }

    /// IEEE sum of everything pushed and not popped.
    fn total(&self) -> f64 {
        if self.nan > 0 || (self.pos_inf > 0 && self.neg_inf > 0) {
            f64::NAN
        } else if self.pos_inf > 0 {
            f64::INFINITY
        } else if self.neg_inf > 0 {
            f64::NEG_INFINITY
        } else if !self.sum.is_finite() {
            self.sum
        } else {
            self.sum + self.compensation
        }
    }
}

/// Running mean of `samples` over a window of `window` samples.
///
/// Returns one `f64` per input sample. A window of 1 returns the input promoted
/// to `f64`. An empty input returns an empty output for any non-zero window.
///
/// # Errors
/// Returns an invalid-parameter error if `window == 0` or `window > samples.len()`.
///
/// # Examples
/// ```rust
/// use sigproc_kernels::operations::statistics::running_mean;
///
/// let mean = running_mean(&[2u8, 4, 6, 5, 7], 2).unwrap();
/// assert_eq!(mean, vec![2.0, 3.0, 5.0, 5.5, 6.0]);
/// ```
pub fn running_mean<T: Sample>(samples: &[T], window: usize) -> KernelResult<Vec<f64>> {
    let span = WindowSpan::new(window, samples.len())?;
    tracing::trace!(n_samples = samples.len(), window, "running_mean");
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    if window == 1 {
        return Ok(samples.iter().map(|&x| x.as_f64()).collect());
    }

    let src = Replicated { samples };
    let back = span.back as isize;
    let forward = span.forward as isize;
    let period = window as isize;
    let scale = 1.0 / window as f64;

    let mut acc = src.window_sum(0, span);
    let mut out = Vec::with_capacity(samples.len());
    out.push(acc.total() * scale);
    for i in 1..samples.len() as isize {
        // Rebuilt once per window length to bound drift in the compensation.
        if i % period == 0 {
            acc = src.window_sum(i, span);
        } else {
            acc.pop(src.at(i - 1 - back));
            acc.push(src.at(i + forward));
            if !acc.is_finite() {
                acc = src.window_sum(i, span);
            }
        }
        out.push(acc.total() * scale);
    }
    Ok(out)
}

/// Running median of `samples` over a window of `window` samples.
///
/// Odd windows yield the middle sorted value, even windows the mean of the two
/// middle sorted values, so the output is always `f64`. The window contents are
/// tracked incrementally by a [`SlidingMedian`], giving `O(N log W)` overall.
///
/// # Errors
/// Returns an invalid-parameter error if `window == 0` or `window > samples.len()`.
///
/// # Examples
/// ```rust
/// use sigproc_kernels::operations::statistics::running_median;
///
/// let median = running_median(&[3i32, 2, 5, 1, 4], 3).unwrap();
/// assert_eq!(median, vec![3.0, 3.0, 2.0, 4.0, 4.0]);
/// ```
pub fn running_median<T: Sample>(samples: &[T], window: usize) -> KernelResult<Vec<f64>> {
    let span = WindowSpan::new(window, samples.len())?;
    tracing::trace!(n_samples = samples.len(), window, "running_median");
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    if window == 1 {
        return Ok(samples.iter().map(|&x| x.as_f64()).collect());
    }

    let src = Replicated { samples };
    let back = span.back as isize;
    let forward = span.forward as isize;

    let mut tracker = SlidingMedian::with_capacity(window);
    for k in -back..=forward {
        tracker.insert(src.at(k));
    }
    let mut out = Vec::with_capacity(samples.len());
    out.push(tracker.median().unwrap_or(f64::NAN));
    for i in 1..samples.len() as isize {
        tracker.remove(src.at(i - 1 - back))?;
        tracker.insert(src.at(i + forward));
        out.push(tracker.median().unwrap_or(f64::NAN));
    }
    Ok(out)
}

impl<T: Sample> WindowedStatistics for [T] {
    fn running_mean(&self, window: usize) -> KernelResult<Vec<f64>> {
        running_mean(self, window)
    }

    fn running_median(&self, window: usize) -> KernelResult<Vec<f64>> {
        running_median(self, window)
    }
}
