//! Whole-slice vector math.
//!
//! Each entry point evaluates one function over an entire buffer. The register
//! width is chosen by the element type ([`Element::Native`]: 8 lanes for `f32`,
//! 4 lanes for `f64`) and the tail is handled internally, so callers never deal
//! with remainders.
//!
//! # Loop structure
//!
//! ```text
//! x:   |-- block --|-- block --| ... |-- block --|- tail -|
//!          load        load              load     load_partial
//!          eval        eval              eval     eval
//!          store       store             store    store_partial
//! ```
//!
//! The tail is evaluated in a padded register rather than element by element,
//! so every output comes from the same vector routine. Padding uses values
//! inside every function's domain (`0` for inputs and `y`, `1` for the `x`
//! operand of `atan2`).
//!
//! # Example
//!
//! ```rust
//! let x: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
//! let mut out = vec![0.0; x.len()];
//! mathbench::vml::sin(&x, &mut out);
//! assert!((out[3] - 0.3f64.sin()).abs() < 1e-14);
//! ```

use num::{One, Zero};

use crate::element::Element;
use crate::math::{ops, BinaryOp, UnaryOp};
use crate::simd::LaneAdapter;

/// `out[i] = Op(x[i])` over registers of type `V`.
///
/// # Panics
///
/// Panics if `x` and `out` have different lengths.
#[inline]
pub fn map_unary<V: LaneAdapter, Op: UnaryOp>(x: &[V::Scalar], out: &mut [V::Scalar]) {
    assert_eq!(x.len(), out.len(), "input and output lengths differ");

    let mut src = x.chunks_exact(V::LANES);
    let mut dst = out.chunks_exact_mut(V::LANES);
    for (block, result) in (&mut src).zip(&mut dst) {
        V::load(block).apply::<Op>().store(result);
    }

    let tail = src.remainder();
    if !tail.is_empty() {
        V::load_partial(tail, V::Scalar::zero())
            .apply::<Op>()
            .store_partial(dst.into_remainder());
    }
}

/// `out[i] = Op(y[i], x[i])` over registers of type `V`.
///
/// # Panics
///
/// Panics if the three slices do not all have the same length.
#[inline]
pub fn map_binary<V: LaneAdapter, Op: BinaryOp>(
    y: &[V::Scalar],
    x: &[V::Scalar],
    out: &mut [V::Scalar],
) {
    assert_eq!(y.len(), x.len(), "y and x lengths differ");
    assert_eq!(x.len(), out.len(), "input and output lengths differ");

    let mut ys = y.chunks_exact(V::LANES);
    let mut xs = x.chunks_exact(V::LANES);
    let mut dst = out.chunks_exact_mut(V::LANES);
    for ((yb, xb), result) in (&mut ys).zip(&mut xs).zip(&mut dst) {
        V::load(yb).apply2::<Op>(V::load(xb)).store(result);
    }

    let (y_tail, x_tail) = (ys.remainder(), xs.remainder());
    if !y_tail.is_empty() {
        let yv = V::load_partial(y_tail, V::Scalar::zero());
        let xv = V::load_partial(x_tail, V::Scalar::one());
        yv.apply2::<Op>(xv).store_partial(dst.into_remainder());
    }
}

macro_rules! vml_unary {
    ($($(#[$doc:meta])* $name:ident => $op:ty;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Panics
            ///
            /// Panics if `x` and `out` have different lengths.
            pub fn $name<T: Element>(x: &[T], out: &mut [T]) {
                map_unary::<T::Native, $op>(x, out)
            }
        )*
    };
}

vml_unary! {
    /// `out[i] = e^x[i]`
    exp => ops::Exp;
    /// `out[i] = 2^x[i]`
    exp2 => ops::Exp2;
    /// `out[i] = e^x[i] - 1`
    expm1 => ops::ExpM1;
    /// `out[i] = sin(x[i])`
    sin => ops::Sin;
    /// `out[i] = cos(x[i])`
    cos => ops::Cos;
    /// `out[i] = tan(x[i])`
    tan => ops::Tan;
    /// `out[i] = asin(x[i])`, NaN outside `[-1, 1]`
    asin => ops::Asin;
    /// `out[i] = acos(x[i])`, NaN outside `[-1, 1]`
    acos => ops::Acos;
    /// `out[i] = atan(x[i])`
    atan => ops::Atan;
}

/// `out[i] = atan2(y[i], x[i])`
///
/// # Panics
///
/// Panics if the three slices do not all have the same length.
pub fn atan2<T: Element>(y: &[T], x: &[T], out: &mut [T]) {
    map_binary::<T::Native, ops::Atan2>(y, x, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_with_tail() {
        // 8-lane blocks plus a 3 element tail
        let x: Vec<f32> = (0..19).map(|i| i as f32 * 0.5 - 4.0).collect();
        let mut out = vec![0.0f32; x.len()];
        exp(&x, &mut out);
        for (i, (got, xi)) in out.iter().zip(&x).enumerate() {
            let expected = xi.exp();
            let relative_error = ((got - expected) / expected).abs();
            assert!(relative_error < 1e-6, "index {i}: exp({xi}) = {got}, expected {expected}");
        }
    }

    #[test]
    fn test_shorter_than_one_register() {
        let x = [0.5f64, -0.5];
        let mut out = [0.0f64; 2];
        atan(&x, &mut out);
        assert!((out[0] - 0.5f64.atan()).abs() < 1e-15);
        assert!((out[1] + 0.5f64.atan()).abs() < 1e-15);
    }

    #[test]
    fn test_atan2_tail_uses_matching_offsets() {
        let y: Vec<f64> = (0..6).map(|i| i as f64 - 2.5).collect();
        let x: Vec<f64> = (0..6).map(|i| 3.0 - i as f64 * 1.5).collect();
        let mut out = vec![0.0f64; 6];
        atan2(&y, &x, &mut out);
        for i in 0..6 {
            let expected = y[i].atan2(x[i]);
            assert!((out[i] - expected).abs() < 1e-14, "index {i}: {} != {expected}", out[i]);
        }
    }

    #[test]
    fn test_empty_slices_are_a_no_op() {
        let mut out: [f32; 0] = [];
        sin::<f32>(&[], &mut out);
    }

    #[test]
    #[should_panic(expected = "lengths differ")]
    fn test_length_mismatch_panics() {
        let mut out = [0.0f32; 3];
        cos(&[1.0f32; 4], &mut out);
    }
}
