//! Dynamically typed sample arrays.
//!
//! The kernels themselves are generic over [`Sample`], but the pipeline that calls
//! them usually learns the element type at runtime (from a file header or a
//! configuration value). [`SampleType`] names the closed set of supported types and
//! [`SampleArray`] holds one `ndarray` buffer of any of them, dispatching each
//! operation to the monomorphised kernel.
//!
//! # Examples
//!
//! ```rust
//! use sigproc_kernels::{SampleArray, SampleType};
//!
//! let raw: Vec<u8> = vec![2, 4, 6, 5, 7];
//! let array = SampleArray::from_ne_bytes(&raw, SampleType::U8).unwrap();
//! let smoothed = array.running_mean(3).unwrap();
//! assert_eq!(smoothed.len(), 5);
//! ```

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::traits::Sample;
use crate::{KernelError, KernelResult, ParameterError};

/// Supported element types as string identifiers.
pub const SUPPORTED_DTYPES: [&str; 6] = ["int8", "uint8", "int32", "int64", "float32", "float64"];

/// Runtime tag for the element type of a sample buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    /// 8-bit signed integer.
    I8,
    /// 8-bit unsigned integer.
    U8,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl SampleType {
    /// numpy-style name of the type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SampleType::I8 => "int8",
            SampleType::U8 => "uint8",
            SampleType::I32 => "int32",
            SampleType::I64 => "int64",
            SampleType::F32 => "float32",
            SampleType::F64 => "float64",
        }
    }

    /// Size of one element in bytes.
    pub const fn size_of(&self) -> usize {
        match self {
            SampleType::I8 | SampleType::U8 => 1,
            SampleType::I32 | SampleType::F32 => 4,
            SampleType::I64 | SampleType::F64 => 8,
        }
    }

    /// Returns true for `F32` and `F64`.
    pub const fn is_float(&self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleType {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int8" | "i8" => Ok(SampleType::I8),
            "uint8" | "u8" => Ok(SampleType::U8),
            "int32" | "i32" => Ok(SampleType::I32),
            "int64" | "i64" => Ok(SampleType::I64),
            "float32" | "f32" => Ok(SampleType::F32),
            "float64" | "f64" => Ok(SampleType::F64),
            other => Err(ParameterError::invalid_value(
                "dtype",
                format!("'{other}' is not one of {SUPPORTED_DTYPES:?}"),
            )
            .into()),
        }
    }
}

/// A one-dimensional sample buffer of any supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleArray {
    /// 8-bit signed samples.
    I8(Array1<i8>),
    /// 8-bit unsigned samples.
    U8(Array1<u8>),
    /// 32-bit signed samples.
    I32(Array1<i32>),
    /// 64-bit signed samples.
    I64(Array1<i64>),
    /// 32-bit float samples.
    F32(Array1<f32>),
    /// 64-bit float samples.
    F64(Array1<f64>),
}

/// Runs `$body` with `$arr` bound to the typed array of whichever variant `$self` holds.
macro_rules! dispatch {
    ($self:expr, $arr:ident => $body:expr) => {
        match $self {
            SampleArray::I8($arr) => $body,
            SampleArray::U8($arr) => $body,
            SampleArray::I32($arr) => $body,
            SampleArray::I64($arr) => $body,
            SampleArray::F32($arr) => $body,
            SampleArray::F64($arr) => $body,
        }
    };
}

impl SampleArray {
    /// Element type of the buffer.
    pub const fn sample_type(&self) -> SampleType {
        match self {
            SampleArray::I8(_) => SampleType::I8,
            SampleArray::U8(_) => SampleType::U8,
            SampleArray::I32(_) => SampleType::I32,
            SampleArray::I64(_) => SampleType::I64,
            SampleArray::F32(_) => SampleType::F32,
            SampleArray::F64(_) => SampleType::F64,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        dispatch!(self, arr => arr.len())
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a typed array from native-endian raw bytes.
    ///
    /// # Errors
    /// Returns an invalid-parameter error if `bytes.len()` is not a multiple of the
    /// element size.
    pub fn from_ne_bytes(bytes: &[u8], sample_type: SampleType) -> KernelResult<Self> {
        let width = sample_type.size_of();
        if bytes.len() % width != 0 {
            return Err(ParameterError::invalid_value(
                "bytes",
                format!(
                    "length {} is not a multiple of the {} element size ({width})",
                    bytes.len(),
                    sample_type
                ),
            )
            .into());
        }

        fn collect<T: Sample>(bytes: &[u8]) -> Array1<T> {
            bytes
                .chunks_exact(std::mem::size_of::<T>())
                .map(bytemuck::pod_read_unaligned::<T>)
                .collect()
        }

        Ok(match sample_type {
            SampleType::I8 => SampleArray::I8(collect(bytes)),
            SampleType::U8 => SampleArray::U8(Array1::from_vec(bytes.to_vec())),
            SampleType::I32 => SampleArray::I32(collect(bytes)),
            SampleType::I64 => SampleArray::I64(collect(bytes)),
            SampleType::F32 => SampleArray::F32(collect(bytes)),
            SampleType::F64 => SampleArray::F64(collect(bytes)),
        })
    }

    /// Copies the samples out as native-endian raw bytes.
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        dispatch!(self, arr => match arr.as_slice() {
            Some(slice) => bytemuck::cast_slice::<_, u8>(slice).to_vec(),
            None => arr.iter().flat_map(|x| bytemuck::bytes_of(x).to_vec()).collect(),
        })
    }

    /// Promotes every sample to `f64`.
    pub fn to_f64(&self) -> Array1<f64> {
        dispatch!(self, arr => arr.mapv(Sample::as_f64))
    }

    /// Edge-replicated running mean, see [`crate::operations::statistics::running_mean`].
    #[cfg(feature = "statistics")]
    pub fn running_mean(&self, window: usize) -> KernelResult<Array1<f64>> {
        use crate::operations::statistics::running_mean;
        dispatch!(self, arr => running_mean(&contiguous(arr), window).map(Array1::from_vec))
    }

    /// Edge-replicated running median, see [`crate::operations::statistics::running_median`].
    #[cfg(feature = "statistics")]
    pub fn running_median(&self, window: usize) -> KernelResult<Array1<f64>> {
        use crate::operations::statistics::running_median;
        dispatch!(self, arr => running_median(&contiguous(arr), window).map(Array1::from_vec))
    }
}

#[cfg(feature = "statistics")]
fn contiguous<T: Sample>(arr: &Array1<T>) -> std::borrow::Cow<'_, [T]> {
    match arr.as_slice() {
        Some(slice) => std::borrow::Cow::Borrowed(slice),
        None => std::borrow::Cow::Owned(arr.to_vec()),
    }
}

macro_rules! impl_from_samples {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<Array1<$ty>> for SampleArray {
                fn from(arr: Array1<$ty>) -> Self {
                    SampleArray::$variant(arr)
                }
            }

            impl From<Vec<$ty>> for SampleArray {
                fn from(samples: Vec<$ty>) -> Self {
                    SampleArray::$variant(Array1::from_vec(samples))
                }
            }
        )+
    };
}

impl_from_samples!(i8 => I8, u8 => U8, i32 => I32, i64 => I64, f32 => F32, f64 => F64);
