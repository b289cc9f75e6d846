//! The closed catalog of benchmarked functions and precisions.
//!
//! [`FunctionId::dispatch`] is the single place where a function id is mapped to
//! the operation type that evaluates it. Everything that needs a concrete kernel
//! for a function (the registration table, the criterion benches) goes through
//! a [`OpVisitor`] instead of matching on the id again.

use std::fmt;
use std::ops::Range;

use crate::math::ops;
use crate::math::{BinaryOp, UnaryOp};
use crate::verify::Tolerance;

/// Floating-point precision of a benchmark case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    /// `f32`
    Single,
    /// `f64`
    Double,
}

impl Precision {
    /// Both precisions, in catalog order.
    pub const ALL: [Precision; 2] = [Precision::Single, Precision::Double];

    /// Size of one element in bytes.
    pub const fn element_bytes(self) -> usize {
        match self {
            Precision::Single => std::mem::size_of::<f32>(),
            Precision::Double => std::mem::size_of::<f64>(),
        }
    }

    /// Lane count of the explicit-SIMD register (512 bits).
    pub const fn explicit_lanes(self) -> usize {
        match self {
            Precision::Single => 16,
            Precision::Double => 8,
        }
    }

    /// Lane count of the register the vector library uses internally (256 bits).
    pub const fn library_lanes(self) -> usize {
        match self {
            Precision::Single => 8,
            Precision::Double => 4,
        }
    }

    /// Rust type name of the element, also used as the display form.
    pub const fn name(self) -> &'static str {
        match self {
            Precision::Single => "f32",
            Precision::Double => "f64",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of input buffers a function reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// `out[i] = f(x[i])`
    Unary,
    /// `out[i] = f(y[i], x[i])`
    Binary,
}

impl Arity {
    /// Number of input buffers.
    pub const fn inputs(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inputs())
    }
}

/// Elementary functions covered by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FunctionId {
    /// `e^x`
    Exp,
    /// `2^x`
    Exp2,
    /// `e^x - 1`
    ExpM1,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Arcsine, defined on `[-1, 1]`.
    Asin,
    /// Arccosine, defined on `[-1, 1]`.
    Acos,
    /// Arctangent.
    Atan,
    /// Quadrant-aware arctangent of `y / x`, the only two-input function.
    Atan2,
}

impl FunctionId {
    /// Every function, in catalog order.
    pub const ALL: [FunctionId; 10] = [
        FunctionId::Exp,
        FunctionId::Exp2,
        FunctionId::ExpM1,
        FunctionId::Sin,
        FunctionId::Cos,
        FunctionId::Tan,
        FunctionId::Asin,
        FunctionId::Acos,
        FunctionId::Atan,
        FunctionId::Atan2,
    ];

    /// Short lowercase name, e.g. `expm1`.
    pub const fn name(self) -> &'static str {
        match self {
            FunctionId::Exp => "exp",
            FunctionId::Exp2 => "exp2",
            FunctionId::ExpM1 => "expm1",
            FunctionId::Sin => "sin",
            FunctionId::Cos => "cos",
            FunctionId::Tan => "tan",
            FunctionId::Asin => "asin",
            FunctionId::Acos => "acos",
            FunctionId::Atan => "atan",
            FunctionId::Atan2 => "atan2",
        }
    }

    /// Number of input buffers the function reads.
    pub const fn arity(self) -> Arity {
        match self {
            FunctionId::Atan2 => Arity::Binary,
            _ => Arity::Unary,
        }
    }

    /// Input range the harness samples from.
    ///
    /// The exponential ranges reach the edge of single precision: `exp(88)`
    /// is close to `f32::MAX` and `exp(-88)`, `exp2(-127)` are subnormal.
    pub fn domain(self, precision: Precision) -> Range<f64> {
        match (self, precision) {
            (FunctionId::Exp | FunctionId::ExpM1, _) => -88.0..88.0,
            (FunctionId::Exp2, _) => -127.0..127.0,
            (FunctionId::Sin | FunctionId::Cos | FunctionId::Tan, Precision::Single) => {
                -1e3..1e3
            }
            (FunctionId::Sin | FunctionId::Cos | FunctionId::Tan, Precision::Double) => {
                -1e4..1e4
            }
            (FunctionId::Asin | FunctionId::Acos, _) => -1.0..1.0,
            (FunctionId::Atan, _) => -1e3..1e3,
            (FunctionId::Atan2, _) => -10.0..10.0,
        }
    }

    /// How far a vectorized result may drift from the scalar one.
    ///
    /// `exp` and `exp2` accept any error below the smallest normal value, so
    /// subnormal results are compared absolutely.
    pub fn tolerance(self, precision: Precision) -> Tolerance {
        match precision {
            Precision::Single => match self {
                FunctionId::Exp => Tolerance::new(f32::MIN_POSITIVE as f64, 1e-6),
                FunctionId::Exp2 => Tolerance::new(f32::MIN_POSITIVE as f64, 2e-5),
                FunctionId::ExpM1 => Tolerance::new(1e-12, 1e-5),
                FunctionId::Sin | FunctionId::Cos => Tolerance::new(1e-5, 1e-5),
                FunctionId::Tan => Tolerance::new(1e-5, 1e-4),
                FunctionId::Asin | FunctionId::Acos | FunctionId::Atan | FunctionId::Atan2 => {
                    Tolerance::new(1e-5, 1e-5)
                }
            },
            Precision::Double => match self {
                FunctionId::Exp => Tolerance::new(f64::MIN_POSITIVE, 1e-13),
                FunctionId::Exp2 => Tolerance::new(f64::MIN_POSITIVE, 1e-12),
                FunctionId::ExpM1 => Tolerance::new(1e-300, 1e-12),
                FunctionId::Sin | FunctionId::Cos => Tolerance::new(1e-12, 1e-12),
                FunctionId::Tan => Tolerance::new(1e-12, 1e-10),
                FunctionId::Asin | FunctionId::Acos | FunctionId::Atan | FunctionId::Atan2 => {
                    Tolerance::new(1e-12, 1e-12)
                }
            },
        }
    }

    /// Hands the operation type for this function to `visitor`.
    pub fn dispatch<V: OpVisitor>(self, visitor: V) -> V::Output {
        match self {
            FunctionId::Exp => visitor.visit_unary::<ops::Exp>(),
            FunctionId::Exp2 => visitor.visit_unary::<ops::Exp2>(),
            FunctionId::ExpM1 => visitor.visit_unary::<ops::ExpM1>(),
            FunctionId::Sin => visitor.visit_unary::<ops::Sin>(),
            FunctionId::Cos => visitor.visit_unary::<ops::Cos>(),
            FunctionId::Tan => visitor.visit_unary::<ops::Tan>(),
            FunctionId::Asin => visitor.visit_unary::<ops::Asin>(),
            FunctionId::Acos => visitor.visit_unary::<ops::Acos>(),
            FunctionId::Atan => visitor.visit_unary::<ops::Atan>(),
            FunctionId::Atan2 => visitor.visit_binary::<ops::Atan2>(),
        }
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives the operation type chosen by [`FunctionId::dispatch`].
pub trait OpVisitor {
    type Output;

    fn visit_unary<Op: UnaryOp>(self) -> Self::Output;

    fn visit_binary<Op: BinaryOp>(self) -> Self::Output;
}
