//! Execution strategies.
//!
//! A strategy is one way of applying a function to a whole buffer. All three
//! share the same contract: `out[i] = f(x[i])` (or `f(y[i], x[i])`), lengths
//! checked up front, domain errors passed through as NaN.
//!
//! | Strategy | Register | Tail |
//! |----------|----------|------|
//! | [`Scalar`] | none | n/a |
//! | [`LibraryVectorized`] | native (8 × f32 / 4 × f64) | handled by [`crate::vml`] |
//! | [`ExplicitSimd`] | explicit (16 × f32 / 8 × f64) | chosen by [`TailPolicy`] |

use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::{check_lengths, invalid_config, length_mismatch, BenchError, Result};
use crate::math::{BinaryOp, UnaryOp};

mod explicit;
mod library;
mod scalar;

pub use explicit::ExplicitSimd;
pub use library::LibraryVectorized;
pub use scalar::Scalar;

/// Identifies a strategy in case keys and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyKind {
    Scalar,
    LibraryVectorized,
    ExplicitSimd,
}

impl StrategyKind {
    /// Every strategy, in report column order.
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Scalar,
        StrategyKind::LibraryVectorized,
        StrategyKind::ExplicitSimd,
    ];

    /// Kebab-case name used in case keys and report headers.
    pub const fn name(self) -> &'static str {
        match self {
            StrategyKind::Scalar => "scalar",
            StrategyKind::LibraryVectorized => "library-vectorized",
            StrategyKind::ExplicitSimd => "explicit-simd",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the explicit SIMD loop does with the elements after the last full register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Buffers must be a multiple of the lane width; anything else is a [`BenchError::LaneRemainder`].
    #[default]
    Strict,
    /// The trailing elements go through one padded register and only valid lanes are stored.
    Masked,
    /// The trailing elements are evaluated one by one with the scalar function.
    ScalarFallback,
}

impl TailPolicy {
    /// The `MATHBENCH_TAIL` spelling, also accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            TailPolicy::Strict => "strict",
            TailPolicy::Masked => "masked",
            TailPolicy::ScalarFallback => "scalar",
        }
    }
}

impl fmt::Display for TailPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TailPolicy {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TailPolicy::Strict),
            "masked" => Ok(TailPolicy::Masked),
            "scalar" | "scalar-fallback" => Ok(TailPolicy::ScalarFallback),
            other => Err(invalid_config(format!(
                "unknown tail policy '{other}', expected strict, masked or scalar"
            ))),
        }
    }
}

/// Applies a function to every element of a buffer.
///
/// Implementors are small `Copy` values so kernels can capture them by value.
pub trait Strategy: Copy + Send + Sync + 'static {
    fn kind(&self) -> StrategyKind;

    /// Buffer lengths this strategy accepts must be a multiple of this value.
    fn length_multiple<T: Element>(&self) -> usize;

    /// `out[i] = Op(x[i])`
    fn unary<T: Element, Op: UnaryOp>(&self, x: &[T], out: &mut [T]) -> Result<()>;

    /// `out[i] = Op(y[i], x[i])`; `y` and `x` are read at the same offsets.
    fn binary<T: Element, Op: BinaryOp>(&self, y: &[T], x: &[T], out: &mut [T]) -> Result<()>;
}

/// Length check shared by the two-input paths.
pub(crate) fn check_binary_lengths(y: usize, x: usize, out: usize) -> Result<()> {
    if y != x {
        return Err(length_mismatch(
            y,
            x,
            "x operand must have the same length as y",
        ));
    }
    check_lengths(x, out)
}
