//! 512-bit registers made of two native 256-bit halves.
//!
//! `DoubleWidth<H>` holds `2 * H::LANES` lanes: the low half covers elements
//! `0..H::LANES`, the high half the rest. Every operation is applied to both
//! halves, so the register behaves exactly like a single 512-bit vector.
//!
//! # Partial loads and stores
//!
//! A partial chunk shorter than one half leaves the high half entirely filled
//! with the pad value:
//!
//! ```text
//! src (5 of 16):  a b c d e
//! lo:             a b c d e f f f
//! hi:             f f f f f f f f
//! ```
//!
//! A longer chunk fills the low half completely and pads the high half.

use crate::math::ElementaryMath;

use super::LaneAdapter;

/// A register twice as wide as `H`.
#[derive(Copy, Clone, Debug)]
pub struct DoubleWidth<H> {
    /// Lanes `0..H::LANES`
    pub lo: H,
    /// Lanes `H::LANES..2 * H::LANES`
    pub hi: H,
}

impl<H: LaneAdapter> DoubleWidth<H> {
    #[inline(always)]
    pub fn from_halves(lo: H, hi: H) -> Self {
        Self { lo, hi }
    }

    #[inline(always)]
    fn map(self, f: impl Fn(H) -> H) -> Self {
        Self {
            lo: f(self.lo),
            hi: f(self.hi),
        }
    }

    #[inline(always)]
    fn zip(self, other: Self, f: impl Fn(H, H) -> H) -> Self {
        Self {
            lo: f(self.lo, other.lo),
            hi: f(self.hi, other.hi),
        }
    }
}

impl<H: LaneAdapter> LaneAdapter for DoubleWidth<H> {
    type Scalar = H::Scalar;

    const LANES: usize = 2 * H::LANES;

    #[inline(always)]
    fn splat(value: H::Scalar) -> Self {
        Self::from_halves(H::splat(value), H::splat(value))
    }

    #[inline(always)]
    fn load(src: &[H::Scalar]) -> Self {
        assert_eq!(src.len(), Self::LANES, "full load needs exactly {} lanes", Self::LANES);
        let (lo, hi) = src.split_at(H::LANES);
        Self::from_halves(H::load(lo), H::load(hi))
    }

    #[inline(always)]
    fn load_partial(src: &[H::Scalar], fill: H::Scalar) -> Self {
        if src.len() <= H::LANES {
            Self::from_halves(H::load_partial(src, fill), H::splat(fill))
        } else {
            let (lo, hi) = src.split_at(H::LANES);
            Self::from_halves(H::load(lo), H::load_partial(hi, fill))
        }
    }

    #[inline(always)]
    fn store(self, dst: &mut [H::Scalar]) {
        assert_eq!(dst.len(), Self::LANES, "full store needs exactly {} lanes", Self::LANES);
        let (lo, hi) = dst.split_at_mut(H::LANES);
        self.lo.store(lo);
        self.hi.store(hi);
    }

    #[inline(always)]
    fn store_partial(self, dst: &mut [H::Scalar]) {
        if dst.len() <= H::LANES {
            self.lo.store_partial(dst);
        } else {
            let (lo, hi) = dst.split_at_mut(H::LANES);
            self.lo.store(lo);
            self.hi.store_partial(hi);
        }
    }
}

impl<H: LaneAdapter> ElementaryMath for DoubleWidth<H> {
    #[inline(always)]
    fn exp(self) -> Self {
        self.map(H::exp)
    }

    #[inline(always)]
    fn exp2(self) -> Self {
        self.map(H::exp2)
    }

    #[inline(always)]
    fn exp_m1(self) -> Self {
        self.map(H::exp_m1)
    }

    #[inline(always)]
    fn sin(self) -> Self {
        self.map(H::sin)
    }

    #[inline(always)]
    fn cos(self) -> Self {
        self.map(H::cos)
    }

    #[inline(always)]
    fn tan(self) -> Self {
        self.map(H::tan)
    }

    #[inline(always)]
    fn asin(self) -> Self {
        self.map(H::asin)
    }

    #[inline(always)]
    fn acos(self) -> Self {
        self.map(H::acos)
    }

    #[inline(always)]
    fn atan(self) -> Self {
        self.map(H::atan)
    }

    #[inline(always)]
    fn atan2(self, x: Self) -> Self {
        self.zip(x, H::atan2)
    }
}

#[cfg(test)]
mod tests {
    use crate::math::ElementaryMath;
    use crate::simd::{F32x16, F64x8, LaneAdapter};

    #[test]
    fn test_lane_counts() {
        assert_eq!(F32x16::lane_count(), 16);
        assert_eq!(F64x8::lane_count(), 8);
    }

    #[test]
    fn test_load_store_keeps_lane_order() {
        let src: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let mut dst = vec![0.0f32; 16];
        F32x16::load(&src).store(&mut dst);
        assert_eq!(src, dst);
        assert_eq!(F32x16::load(&src).hi.to_array()[0], 8.0);
    }

    #[test]
    fn test_partial_short_of_one_half() {
        let v = F64x8::load_partial(&[1.0, 2.0, 3.0], 0.5);
        assert_eq!(v.lo.to_array(), [1.0, 2.0, 3.0, 0.5]);
        assert_eq!(v.hi.to_array(), [0.5; 4]);

        let mut out = [-1.0f64; 8];
        v.store_partial(&mut out[..3]);
        assert_eq!(out, [1.0, 2.0, 3.0, -1.0, -1.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_partial_spanning_both_halves() {
        let src: Vec<f32> = (1..=13).map(|i| i as f32).collect();
        let v = F32x16::load_partial(&src, 0.0);

        let mut out = vec![f32::NAN; 13];
        v.store_partial(&mut out);
        assert_eq!(out, src);
        assert_eq!(&v.hi.to_array()[5..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_math_applies_to_both_halves() {
        let x: Vec<f64> = (0..8).map(|i| i as f64 * 0.25).collect();
        let mut out = vec![0.0f64; 8];
        ElementaryMath::cos(F64x8::load(&x)).store(&mut out);
        for (got, xi) in out.iter().zip(&x) {
            assert!((got - xi.cos()).abs() < 1e-14, "cos({xi}) = {got}");
        }
    }
}
