//! Process-wide FFT plan cache.
//!
//! Planning a mixed-radix transform (factorising the length, building twiddle
//! tables) costs far more than running it on a typical block, so `realfft` plans
//! are built once per `(precision, length)` and shared for the life of the process.
//!
//! Each length owns an `Arc<OnceLock<_>>` slot. Looking up or inserting a slot
//! takes a short `RwLock` section; building the plan happens outside the lock
//! inside [`OnceLock::get_or_init`], so concurrent first use of one length builds
//! exactly one plan while other lengths proceed unhindered. Built plans are never
//! mutated.

use num_complex::Complex;
use parking_lot::RwLock;
use realfft::{ComplexToReal, FftError, RealFftPlanner, RealToComplex};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, OnceLock};

use crate::traits::RealFloat;
use crate::{KernelResult, ParameterError};

/// Real-to-complex and complex-to-real transforms for one length.
///
/// Both directions work on the `len / 2 + 1` non-redundant bins only, so a
/// transform costs roughly half of the equivalent complex FFT.
pub struct RealFftPlan<F: RealFloat> {
    len: usize,
    forward: Arc<dyn RealToComplex<F>>,
    inverse: Arc<dyn ComplexToReal<F>>,
}

impl<F: RealFloat> RealFftPlan<F> {
    /// Plans both directions for `len` points.
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<F>::new();
        Self {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        }
    }

    /// Transform length.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true for the zero-length plan.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bins on the spectrum side, `len / 2 + 1`.
    pub fn complex_len(&self) -> usize {
        self.forward.complex_len()
    }

    /// Unnormalised forward transform of `samples`.
    ///
    /// # Errors
    /// Returns an invalid-parameter error if `samples.len()` differs from [`Self::len`].
    pub fn forward(&self, samples: &[F]) -> KernelResult<Vec<Complex<F>>> {
        if samples.len() != self.len {
            return Err(ParameterError::length_mismatch("samples", self.len, samples.len()).into());
        }
        let mut input = self.forward.make_input_vec();
        input.copy_from_slice(samples);
        let mut output = self.forward.make_output_vec();
        self.forward
            .process(&mut input, &mut output)
            .map_err(|err| fft_error("samples", err))?;
        Ok(output)
    }

    /// Unnormalised inverse transform of `bins`, which is used as scratch.
    ///
    /// The imaginary part of the DC bin and, for even lengths, of the Nyquist
    /// bin must be zero.
    ///
    /// # Errors
    /// Returns an invalid-parameter error if `bins.len()` differs from
    /// [`Self::complex_len`] or a reserved imaginary part is non-zero.
    pub fn inverse(&self, bins: &mut [Complex<F>]) -> KernelResult<Vec<F>> {
        let expected = self.complex_len();
        if bins.len() != expected {
            return Err(ParameterError::length_mismatch("spectrum", expected, bins.len()).into());
        }
        let mut output = self.inverse.make_output_vec();
        self.inverse
            .process(bins, &mut output)
            .map_err(|err| fft_error("spectrum", err))?;
        Ok(output)
    }
}

fn fft_error(parameter: &str, err: FftError) -> crate::KernelError {
    ParameterError::invalid_value(parameter, format!("rejected by the FFT: {err:?}")).into()
}

impl<F: RealFloat> std::fmt::Debug for RealFftPlan<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFftPlan").field("len", &self.len).finish()
    }
}

type PlanSlot<F> = Arc<OnceLock<Arc<RealFftPlan<F>>>>;

/// Lazily populated map from transform length to its shared plan.
pub struct PlanCache<F: RealFloat> {
    slots: RwLock<HashMap<usize, PlanSlot<F>>>,
}

impl<F: RealFloat> PlanCache<F> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the plan for `len`, building it on first use.
    pub fn plan(&self, len: usize) -> Arc<RealFftPlan<F>> {
        let existing = self.slots.read().get(&len).cloned();
        let slot = match existing {
            Some(slot) => slot,
            None => self.slots.write().entry(len).or_default().clone(),
        };
        slot.get_or_init(|| {
            tracing::debug!(
                len,
                precision = std::any::type_name::<F>(),
                "building FFT plan"
            );
            Arc::new(RealFftPlan::new(len))
        })
        .clone()
    }

    /// Lengths whose plans have been built, ascending.
    pub fn cached_lengths(&self) -> Vec<usize> {
        let mut lengths: Vec<usize> = self
            .slots
            .read()
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(&len, _)| len)
            .collect();
        lengths.sort_unstable();
        lengths
    }
}

impl<F: RealFloat> Default for PlanCache<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Floating point precisions that have a process-wide [`PlanCache`].
pub trait FftPrecision: RealFloat {
    /// The shared cache for this precision.
    fn plan_cache() -> &'static PlanCache<Self>;
}

static F32_PLANS: LazyLock<PlanCache<f32>> = LazyLock::new(PlanCache::new);
static F64_PLANS: LazyLock<PlanCache<f64>> = LazyLock::new(PlanCache::new);

impl FftPrecision for f32 {
    fn plan_cache() -> &'static PlanCache<f32> {
        &F32_PLANS
    }
}

impl FftPrecision for f64 {
    fn plan_cache() -> &'static PlanCache<f64> {
        &F64_PLANS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use std::thread;

    #[test]
    fn plans_are_reused_per_length() {
        let cache = PlanCache::<f64>::new();
        let a = cache.plan(30);
        let b = cache.plan(30);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 30);

        let c = cache.plan(17);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.cached_lengths(), vec![17, 30]);
    }

    #[test]
    fn concurrent_first_use_builds_one_plan() {
        let cache = PlanCache::<f32>::new();
        let plans: Vec<Arc<RealFftPlan<f32>>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| cache.plan(1000))).collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("planning thread panicked"))
                .collect()
        });
        for plan in &plans[1..] {
            assert!(Arc::ptr_eq(&plans[0], plan));
        }
        assert_eq!(cache.cached_lengths(), vec![1000]);
    }

    #[test]
    fn global_caches_are_per_precision() {
        let single = f32::plan_cache().plan(12);
        let double = f64::plan_cache().plan(12);
        assert_eq!(single.len(), double.len());
        assert!(f32::plan_cache().cached_lengths().contains(&12));
        assert!(f64::plan_cache().cached_lengths().contains(&12));
    }

    #[test]
    fn forward_then_inverse_scales_by_length() {
        for len in [1usize, 6, 7] {
            let plan = RealFftPlan::<f64>::new(len);
            assert_eq!(plan.complex_len(), len / 2 + 1);
            let input: Vec<f64> = (1..=len).map(|i| i as f64).collect();
            let mut bins = plan.forward(&input).unwrap();
            assert_approx_eq!(bins[0].re, input.iter().sum::<f64>(), 1e-9);
            let output = plan.inverse(&mut bins).unwrap();
            for (got, want) in output.iter().zip(&input) {
                assert_approx_eq!(*got, want * len as f64, 1e-9);
            }
        }
    }

    #[test]
    fn buffer_lengths_are_checked() {
        let plan = RealFftPlan::<f32>::new(8);
        let err = plan.forward(&[0.0; 7]).unwrap_err();
        assert_eq!(err.parameter(), "samples");

        let mut bins = vec![Complex::new(0.0f32, 0.0); 4];
        let err = plan.inverse(&mut bins).unwrap_err();
        assert_eq!(err.parameter(), "spectrum");
    }

    #[test]
    fn non_zero_reserved_imaginary_part_is_rejected() {
        let plan = RealFftPlan::<f64>::new(4);
        let mut bins = plan.forward(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        bins[0].im = 1.0;
        assert!(plan.inverse(&mut bins).unwrap_err().is_invalid_parameter());
    }
}
