// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # sigproc_kernels
//!
//! Numeric kernels for reducing radio-astronomy time series (pulsar and FRB survey
//! data). The surrounding pipeline (file formats, dedispersion, folding) lives
//! elsewhere and calls into this crate with in-memory buffers.
//!
//! ## Kernels
//!
//! - **Bit-depth codec** ([`operations::codec`]): unpack 1, 2 and 4-bit packed
//!   bytes to one sample per byte, and pack them back.
//! - **Sliding-window statistics** ([`operations::statistics`]): edge-replicated
//!   running mean and running median.
//! - **Real spectral transform** ([`operations::transforms`]): forward and inverse
//!   real FFT with an interleaved half-spectrum layout, for any length.
//!
//! All kernels are synchronous, never mutate their input and allocate their own
//! output. The only process-wide state is the FFT plan cache, which is built
//! lazily per length and immutable afterwards.
//!
//! ## Features
//!
//! - `codec`: bit-depth pack/unpack
//! - `statistics`: running mean and median
//! - `fft`: real FFT packing (adds the plan cache)
//! - `full`: all of the above (default)
//!
//! ## Error Handling
//!
//! Every contract violation is an invalid-parameter condition:
//!
//! ```rust
//! use sigproc_kernels::{KernelError, KernelResult, ParameterError};
//!
//! let result: KernelResult<()> = Err(KernelError::Parameter(
//!     ParameterError::out_of_range("window", 0, 1, 128),
//! ));
//!
//! match result {
//!     Ok(()) => {}
//!     Err(err) if err.is_invalid_parameter() => eprintln!("bad call: {err}"),
//!     Err(other) => eprintln!("unexpected: {other}"),
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use sigproc_kernels::operations::codec::unpack;
//! use sigproc_kernels::{RealTransforms, WindowedStatistics};
//!
//! // Two-bit samples straight from the telescope.
//! let raw = [0b0001_1011u8, 0b1110_0100];
//! let samples = unpack(&raw, 2).unwrap();
//! assert_eq!(samples, vec![0, 1, 2, 3, 3, 2, 1, 0]);
//!
//! // Robust baseline, then its spectrum.
//! let baseline = samples.running_median(3).unwrap();
//! let spectrum = baseline.forward_real_transform();
//! assert_eq!(spectrum.len(), 10);
//!
//! let restored = spectrum.inverse_real_transform(baseline.len()).unwrap();
//! for (x, y) in baseline.iter().zip(&restored) {
//!     assert!((x * 8.0 - y).abs() < 1e-9);
//! }
//! ```
//!
//! ## Sample Types
//!
//! - `i8`, `u8`, `i32`, `i64`, `f32`, `f64` for the statistics kernels
//! - `u8` for the codec
//! - `f32`, `f64` for the spectral transform
//!
//! When the element type is only known at runtime, wrap the buffer in a
//! [`SampleArray`] and let it dispatch.

mod error;
pub mod operations;
mod repr;
/// Core traits for sample element types.
pub mod traits;

pub use crate::error::{KernelError, KernelResult, ParameterError};
pub use crate::operations::{BitDepth, RealTransforms, WindowedStatistics};
pub use crate::repr::{SUPPORTED_DTYPES, SampleArray, SampleType};
pub use crate::traits::{CastFrom, CastInto, RealFloat, Sample};

#[cfg(feature = "fft")]
pub use crate::operations::fft_backends::FftPrecision;
