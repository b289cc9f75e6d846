//! Error types for mathbench operations.
//!
//! Every variant is a configuration error: it is detected before a benchmark's
//! clock starts and aborts only the case it concerns. Domain errors of the
//! underlying math functions (NaN for `asin(2.0)`, infinities on overflow) are
//! not errors here; they flow through the output buffers untouched.

use crate::catalog::CaseKey;
use crate::function::{Arity, Precision};

/// Errors that can occur while registering, looking up or running a benchmark case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BenchError {
    /// The same (function, precision, strategy) key was registered twice.
    #[error("Duplicate registration for case {key}")]
    DuplicateCase {
        /// The key that was already present in the catalog.
        key: CaseKey,
    },
    /// No case is registered for the requested key.
    #[error("No benchmark registered for case {key}")]
    CaseNotFound {
        /// The key that was looked up.
        key: CaseKey,
    },
    /// Two buffers that must have the same length do not.
    #[error("Buffer length mismatch: {message} (expected {expected}, got {actual})")]
    LengthMismatch {
        /// Length of the reference buffer.
        expected: usize,
        /// Length of the offending buffer.
        actual: usize,
        /// Human-readable error message.
        message: String,
    },
    /// A benchmark was asked to run over zero elements.
    #[error("Empty buffer: {message}")]
    EmptyBuffer {
        /// Human-readable error message.
        message: String,
    },
    /// The buffer length is not a multiple of the lane width under the strict tail policy.
    #[error(
        "Buffer length {len} is not a multiple of the lane width {lanes} ({remainder} trailing elements)"
    )]
    LaneRemainder {
        /// Buffer length.
        len: usize,
        /// Lane width of the register used by the strategy.
        lanes: usize,
        /// Number of elements left over after the last full register.
        remainder: usize,
    },
    /// Buffers of one precision were handed to a case of the other precision.
    #[error("Precision mismatch for case {key}: case expects {expected}, buffers are {actual}")]
    PrecisionMismatch {
        /// The case (or registration key) concerned.
        key: CaseKey,
        /// Precision of the case.
        expected: Precision,
        /// Precision of the supplied buffers or transform.
        actual: Precision,
    },
    /// One input buffer was handed to a two-input function, or the reverse.
    #[error("Arity mismatch for case {key}: case expects {expected} input(s), got {actual}")]
    ArityMismatch {
        /// The case (or registration key) concerned.
        key: CaseKey,
        /// Arity of the function.
        expected: Arity,
        /// Arity of the supplied operands or kernel.
        actual: Arity,
    },
    /// A harness or logging setting could not be parsed or is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },
}

/// Result type alias for mathbench operations.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Creates a length mismatch error.
pub fn length_mismatch(expected: usize, actual: usize, message: impl Into<String>) -> BenchError {
    BenchError::LengthMismatch {
        expected,
        actual,
        message: message.into(),
    }
}

/// Creates an empty buffer error.
pub fn empty_buffer(message: impl Into<String>) -> BenchError {
    BenchError::EmptyBuffer {
        message: message.into(),
    }
}

/// Creates a lane remainder error for a buffer of `len` elements and `lanes` wide registers.
pub fn lane_remainder(len: usize, lanes: usize) -> BenchError {
    BenchError::LaneRemainder {
        len,
        lanes,
        remainder: len % lanes,
    }
}

/// Creates an invalid configuration error.
pub fn invalid_config(message: impl Into<String>) -> BenchError {
    BenchError::InvalidConfig {
        message: message.into(),
    }
}

/// Checks that an output buffer matches its input and that neither is empty.
pub(crate) fn check_lengths(input: usize, output: usize) -> Result<()> {
    if input != output {
        return Err(length_mismatch(
            input,
            output,
            "output buffer must have the same length as the input",
        ));
    }
    if input == 0 {
        return Err(empty_buffer("benchmark buffers must hold at least one element"));
    }
    Ok(())
}
