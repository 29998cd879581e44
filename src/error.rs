//! Error types and result utilities for kernel operations.
//!
//! Every contract violation a caller can commit (an unsupported bit depth, a window
//! outside `[1, N]`, a spectrum buffer of the wrong length) is reported as
//! [`KernelError::Parameter`]. There is no I/O in this crate, so there are no
//! transient failures to retry.

use thiserror::Error;

/// Convenience type alias for results that may contain a [`KernelError`].
pub type KernelResult<T> = Result<T, KernelError>;

/// Error types that can occur when invoking a kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Invalid parameters were provided to an operation.
    #[error("Invalid parameter: {0}")]
    Parameter(#[from] ParameterError),
}

impl KernelError {
    /// Returns true if this error is an invalid-parameter condition.
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, KernelError::Parameter(_))
    }

    /// Name of the offending parameter.
    pub fn parameter(&self) -> &str {
        match self {
            KernelError::Parameter(err) => err.parameter(),
        }
    }
}

/// Describes which parameter was rejected and why.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// The value is not one of the accepted values.
    #[error("`{parameter}` {reason}")]
    InvalidValue {
        /// Parameter name.
        parameter: String,
        /// Human readable reason.
        reason: String,
    },

    /// The value lies outside the accepted inclusive range.
    #[error("`{parameter}` = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Parameter name.
        parameter: String,
        /// Rejected value.
        value: usize,
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },

    /// A buffer length does not match the length derived from the other arguments.
    #[error("`{parameter}` has length {actual}, expected {expected}")]
    LengthMismatch {
        /// Parameter name.
        parameter: String,
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
}

impl ParameterError {
    /// Creates an [`ParameterError::InvalidValue`].
    pub fn invalid_value(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        ParameterError::InvalidValue {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`ParameterError::OutOfRange`].
    pub fn out_of_range(parameter: impl Into<String>, value: usize, min: usize, max: usize) -> Self {
        ParameterError::OutOfRange {
            parameter: parameter.into(),
            value,
            min,
            max,
        }
    }

    /// Creates an [`ParameterError::LengthMismatch`].
    pub fn length_mismatch(parameter: impl Into<String>, expected: usize, actual: usize) -> Self {
        ParameterError::LengthMismatch {
            parameter: parameter.into(),
            expected,
            actual,
        }
    }

    /// Name of the offending parameter.
    pub fn parameter(&self) -> &str {
        match self {
            ParameterError::InvalidValue { parameter, .. }
            | ParameterError::OutOfRange { parameter, .. }
            | ParameterError::LengthMismatch { parameter, .. } => parameter,
        }
    }
}
