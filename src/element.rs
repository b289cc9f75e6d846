//! Element types the harness is generic over.

use std::fmt;

use wide::{f32x8, f64x4};

use crate::catalog::{Kernel, TypedKernel};
use crate::function::Precision;
use crate::math::ElementaryMath;
use crate::simd::{F32x16, F64x8, LaneAdapter};

/// A floating-point element type: `f32` or `f64`.
///
/// Ties each element type to its [`Precision`], to the registers used by the
/// vectorized strategies and to its slot in a [`TypedKernel`].
pub trait Element:
    num::Float + ElementaryMath + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const PRECISION: Precision;

    /// Native-width register used by the vector math library.
    type Native: LaneAdapter<Scalar = Self>;

    /// 512-bit register used by the explicit SIMD loop.
    type Explicit: LaneAdapter<Scalar = Self>;

    fn wrap(kernel: Kernel<Self>) -> TypedKernel;

    /// Returns the kernel if it was built for this element type.
    fn unwrap(kernel: &TypedKernel) -> Option<&Kernel<Self>>;

    fn widen(self) -> f64;

    /// Rounds an `f64` to this precision.
    fn narrow(value: f64) -> Self;

    /// Number of representable values between `self` and `other`.
    ///
    /// `+0.0` and `-0.0` are zero ULPs apart. Returns `u64::MAX` if either
    /// value is NaN.
    fn ulp_distance(self, other: Self) -> u64;
}

impl Element for f32 {
    const PRECISION: Precision = Precision::Single;

    type Native = f32x8;
    type Explicit = F32x16;

    fn wrap(kernel: Kernel<f32>) -> TypedKernel {
        TypedKernel::F32(kernel)
    }

    fn unwrap(kernel: &TypedKernel) -> Option<&Kernel<f32>> {
        match kernel {
            TypedKernel::F32(kernel) => Some(kernel),
            TypedKernel::F64(_) => None,
        }
    }

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn narrow(value: f64) -> f32 {
        value as f32
    }

    fn ulp_distance(self, other: f32) -> u64 {
        if self.is_nan() || other.is_nan() {
            return u64::MAX;
        }
        let ordered = |v: f32| {
            let bits = v.to_bits() as i32;
            if bits < 0 {
                i64::from(i32::MIN) - i64::from(bits)
            } else {
                i64::from(bits)
            }
        };
        (ordered(self) - ordered(other)).unsigned_abs()
    }
}

impl Element for f64 {
    const PRECISION: Precision = Precision::Double;

    type Native = f64x4;
    type Explicit = F64x8;

    fn wrap(kernel: Kernel<f64>) -> TypedKernel {
        TypedKernel::F64(kernel)
    }

    fn unwrap(kernel: &TypedKernel) -> Option<&Kernel<f64>> {
        match kernel {
            TypedKernel::F64(kernel) => Some(kernel),
            TypedKernel::F32(_) => None,
        }
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(value: f64) -> f64 {
        value
    }

    fn ulp_distance(self, other: f64) -> u64 {
        if self.is_nan() || other.is_nan() {
            return u64::MAX;
        }
        let ordered = |v: f64| {
            let bits = v.to_bits() as i64;
            if bits < 0 {
                i128::from(i64::MIN) - i128::from(bits)
            } else {
                i128::from(bits)
            }
        };
        let distance = (ordered(self) - ordered(other)).unsigned_abs();
        u64::try_from(distance).unwrap_or(u64::MAX)
    }
}
