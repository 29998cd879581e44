//! Kernel operations.
//!
//! ## Module Organization
//!
//! - [`types`] - Supporting types ([`BitDepth`])
//! - [`traits`] - Method-style access to the kernels on slices
//! - [`codec`] - Sub-byte pack/unpack
//! - [`statistics`] - Running mean and running median
//! - [`order_statistics`] - Incremental median tracking used by the running median
//! - [`transforms`] - Real FFT packing and amplitude spectra
//! - [`fft_backends`] - Process-wide FFT plan cache
//!
//! ## Quick Start
//!
//! ```rust
//! use sigproc_kernels::operations::*;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = [0u8, 2, 7, 23];
//! let samples = codec::unpack(&raw, 2)?;
//!
//! let baseline = samples.running_median(5)?;
//! let spectrum = baseline.forward_real_transform();
//! assert_eq!(spectrum.len(), 2 * (samples.len() / 2 + 1));
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod types;

#[cfg(feature = "codec")]
pub mod codec;
#[cfg(feature = "fft")]
pub mod fft_backends;
#[cfg(feature = "statistics")]
pub mod order_statistics;
#[cfg(feature = "statistics")]
pub mod statistics;
#[cfg(feature = "fft")]
pub mod transforms;

pub use traits::{RealTransforms, WindowedStatistics};
pub use types::BitDepth;
