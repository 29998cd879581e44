//! Core traits for the numeric element types the kernels accept.
//!
//! Statistics are written once against [`Sample`] and promote every element to
//! `f64` through [`CastInto`]. The spectral kernels additionally need a real
//! floating point type that `rustfft` can transform, captured by [`RealFloat`].

use bytemuck::Pod;
use num_traits::{Float, FloatConst, NumCast};
use rustfft::FftNum;
use std::fmt::{Debug, Display};

use crate::repr::SampleType;

/// Trait for casting from one type to another.
pub trait CastFrom<S>: Sized {
    /// Cast from the source type to Self.
    fn cast_from(value: S) -> Self;
}

/// Trait for casting into another type.
pub trait CastInto<T>: Sized {
    /// Cast self into the target type.
    fn cast_into(self) -> T;
}

impl<S, T: CastFrom<S>> CastInto<T> for S {
    #[inline]
    fn cast_into(self) -> T {
        T::cast_from(self)
    }
}

/// Core trait implemented by every supported element type.
///
/// # Supported Types
/// - `i8`, `u8`: raw 8-bit telescope samples (and unpacked sub-byte samples)
/// - `i32`, `i64`: accumulated or integrated samples
/// - `f32`, `f64`: calibrated or already reduced samples
///
/// The set is closed: [`SampleType`] names exactly these six types and
/// [`crate::SampleArray`] dispatches over them.
pub trait Sample:
    Copy
    + Default
    + Debug
    + Display
    + PartialOrd
    + Send
    + Sync
    + NumCast
    + Pod
    + CastInto<f64>
    + 'static
{
    /// Runtime tag for this element type.
    const SAMPLE_TYPE: SampleType;

    /// Promotes this sample to `f64` for accumulation.
    #[inline]
    fn as_f64(self) -> f64 {
        self.cast_into()
    }
}

macro_rules! impl_sample {
    ($($ty:ty => $tag:ident),+ $(,)?) => {
        $(
            impl Sample for $ty {
                const SAMPLE_TYPE: SampleType = SampleType::$tag;
            }
        )+
    };
}

impl_sample!(i8 => I8, u8 => U8, i32 => I32, i64 => I64, f32 => F32, f64 => F64);

macro_rules! impl_cast_from {
    ($src:ty => [$($dst:ty),+]) => {
        $(
            impl CastFrom<$src> for $dst {
                #[inline]
                fn cast_from(value: $src) -> Self {
                    value as $dst
                }
            }
        )+
    };
}

impl_cast_from!(i8 => [f32, f64]);
impl_cast_from!(u8 => [f32, f64]);
impl_cast_from!(i32 => [f32, f64]);
impl_cast_from!(i64 => [f32, f64]);
impl_cast_from!(f32 => [f32, f64]);
impl_cast_from!(f64 => [f32, f64]);

/// Marker trait for real floating-point types (f32, f64) accepted by the spectral kernels.
pub trait RealFloat: Sample + Float + FloatConst + FftNum + CastFrom<f64> {}

impl RealFloat for f32 {}
impl RealFloat for f64 {}
