//! The elementary-function oracle seen by every strategy.
//!
//! [`ElementaryMath`] is implemented for the scalar element types (delegating to
//! the standard library) and for `wide`'s 256-bit registers (delegating to the
//! vector routines `wide` ships). The strategies never evaluate a function
//! themselves: they move data and call through this trait.
//!
//! `wide` has no `exp2` or `exp_m1`. Both are expressed through its `exp` and
//! `ln`:
//!
//! - `exp2(x) = exp(x * ln 2)`
//! - `exp_m1(x) = u - 1` for `|x| >= 0.5`, and Kahan's `(u - 1) * x / ln(u)`
//!   below that, where `u = exp(x)`. The correction cancels the rounding error
//!   of `u` so small arguments keep their relative precision.
//!
//! # Special values
//!
//! The register results are patched so they match the scalar ones outside the
//! range the vector routines are built for:
//!
//! - `wide`'s `exp` returns `0` once `|x|` reaches about 87.3 (`f32`) or 708.4
//!   (`f64`), and for every non-finite input. Lanes beyond [`EXP_REACH_F32`] /
//!   [`EXP_REACH_F64`] are evaluated as `exp(x ∓ 64 ln 2) * 2^±64`, which
//!   overflows to `inf` and underflows gradually through the subnormals like
//!   the scalar `exp`. NaN lanes are passed through. `exp2` and `exp_m1` are
//!   built on the patched `exp` and inherit this.
//! - `asin` and `acos` are NaN for NaN input and outside `[-1, 1]`.
//! - A zero `atan2` result carries the sign of `y`.

use std::f32::consts::LN_2 as LN_2_F32;
use std::f64::consts::LN_2 as LN_2_F64;

use wide::{f32x8, f64x4, CmpEq, CmpGe, CmpGt, CmpLe, CmpLt, CmpNe};

use crate::function::FunctionId;

/// `|x|` from which the `f32` register `exp` takes the rescaled path.
pub const EXP_REACH_F32: f32 = 87.0;

/// `|x|` from which the `f64` register `exp` takes the rescaled path.
pub const EXP_REACH_F64: f64 = 708.0;

/// `2^64`, the rescaling factor of the wide-range `exp`.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Elementwise elementary functions. For a register type every method works lane by lane.
pub trait ElementaryMath: Copy {
    fn exp(self) -> Self;

    fn exp2(self) -> Self;

    fn exp_m1(self) -> Self;

    fn sin(self) -> Self;

    fn cos(self) -> Self;

    fn tan(self) -> Self;

    fn asin(self) -> Self;

    fn acos(self) -> Self;

    fn atan(self) -> Self;

    /// Four-quadrant arctangent of `self / x`, `self` being the `y` coordinate.
    fn atan2(self, x: Self) -> Self;
}

/// A single-input function, named at the type level so kernels monomorphize per function.
pub trait UnaryOp: 'static {
    const ID: FunctionId;

    fn eval<M: ElementaryMath>(x: M) -> M;
}

/// A two-input function `f(y, x)`.
pub trait BinaryOp: 'static {
    const ID: FunctionId;

    fn eval<M: ElementaryMath>(y: M, x: M) -> M;
}

/// Zero-sized operation types, one per [`FunctionId`].
pub mod ops {
    use super::{BinaryOp, ElementaryMath, UnaryOp};
    use crate::function::FunctionId;

    macro_rules! unary_op {
        ($name:ident, $method:ident) => {
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl UnaryOp for $name {
                const ID: FunctionId = FunctionId::$name;

                #[inline(always)]
                fn eval<M: ElementaryMath>(x: M) -> M {
                    x.$method()
                }
            }
        };
    }

    unary_op!(Exp, exp);
    unary_op!(Exp2, exp2);
    unary_op!(ExpM1, exp_m1);
    unary_op!(Sin, sin);
    unary_op!(Cos, cos);
    unary_op!(Tan, tan);
    unary_op!(Asin, asin);
    unary_op!(Acos, acos);
    unary_op!(Atan, atan);

    #[derive(Debug, Clone, Copy, Default)]
    pub struct Atan2;

    impl BinaryOp for Atan2 {
        const ID: FunctionId = FunctionId::Atan2;

        #[inline(always)]
        fn eval<M: ElementaryMath>(y: M, x: M) -> M {
            y.atan2(x)
        }
    }
}

macro_rules! impl_scalar_math {
    ($($float:ident),*) => {
        $(
            impl ElementaryMath for $float {
                #[inline(always)]
                fn exp(self) -> Self {
                    $float::exp(self)
                }

                #[inline(always)]
                fn exp2(self) -> Self {
                    $float::exp2(self)
                }

                #[inline(always)]
                fn exp_m1(self) -> Self {
                    $float::exp_m1(self)
                }

                #[inline(always)]
                fn sin(self) -> Self {
                    $float::sin(self)
                }

                #[inline(always)]
                fn cos(self) -> Self {
                    $float::cos(self)
                }

                #[inline(always)]
                fn tan(self) -> Self {
                    $float::tan(self)
                }

                #[inline(always)]
                fn asin(self) -> Self {
                    $float::asin(self)
                }

                #[inline(always)]
                fn acos(self) -> Self {
                    $float::acos(self)
                }

                #[inline(always)]
                fn atan(self) -> Self {
                    $float::atan(self)
                }

                #[inline(always)]
                fn atan2(self, x: Self) -> Self {
                    $float::atan2(self, x)
                }
            }
        )*
    };
}

impl_scalar_math!(f32, f64);

macro_rules! impl_register_math {
    ($register:ident, $scalar:ty, $ln2:expr, $reach:expr) => {
        impl ElementaryMath for $register {
            #[inline(always)]
            fn exp(self) -> Self {
                let direct = $register::exp(self);
                let rescaled = self.abs().cmp_ge($register::splat($reach)) | self.cmp_ne(self);
                if !rescaled.any() {
                    return direct;
                }

                let shift = $register::splat(64.0 * $ln2);
                let scale = TWO_POW_64 as $scalar;
                let high = $register::exp(self - shift) * $register::splat(scale);
                let low = $register::exp(self + shift) * $register::splat(1.0 / scale);
                let scaled = self.cmp_gt($register::splat(0.0)).blend(high, low);

                let result = rescaled.blend(scaled, direct);
                let result = self
                    .cmp_gt($register::splat(<$scalar>::MAX.ln()))
                    .blend($register::splat(<$scalar>::INFINITY), result);
                self.cmp_ne(self).blend(self, result)
            }

            #[inline(always)]
            fn exp2(self) -> Self {
                <Self as ElementaryMath>::exp(self * $register::splat($ln2))
            }

            #[inline(always)]
            fn exp_m1(self) -> Self {
                let one = $register::splat(1.0);
                let u = <Self as ElementaryMath>::exp(self);
                let um1 = u - one;
                let corrected = um1 * self / $register::ln(u);
                let corrected = u.cmp_eq(one).blend(self, corrected);
                self.abs()
                    .cmp_lt($register::splat(0.5))
                    .blend(corrected, um1)
            }

            #[inline(always)]
            fn sin(self) -> Self {
                $register::sin(self)
            }

            #[inline(always)]
            fn cos(self) -> Self {
                $register::cos(self)
            }

            #[inline(always)]
            fn tan(self) -> Self {
                $register::tan(self)
            }

            #[inline(always)]
            fn asin(self) -> Self {
                // false for NaN as well as for |x| > 1
                let inside = self.abs().cmp_le($register::splat(1.0));
                inside.blend($register::asin(self), $register::splat(<$scalar>::NAN))
            }

            #[inline(always)]
            fn acos(self) -> Self {
                let inside = self.abs().cmp_le($register::splat(1.0));
                inside.blend($register::acos(self), $register::splat(<$scalar>::NAN))
            }

            #[inline(always)]
            fn atan(self) -> Self {
                $register::atan(self)
            }

            #[inline(always)]
            fn atan2(self, x: Self) -> Self {
                let zero = $register::splat(0.0);
                let result = $register::atan2(self, x);
                result.cmp_eq(zero).blend(zero.copysign(self), result)
            }
        }
    };
}

impl_register_math!(f32x8, f32, LN_2_F32, EXP_REACH_F32);
impl_register_math!(f64x4, f64, LN_2_F64, EXP_REACH_F64);
