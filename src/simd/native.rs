//! [`LaneAdapter`] for `wide`'s native 256-bit registers.

use wide::{f32x8, f64x4};

use super::LaneAdapter;

macro_rules! impl_native_adapter {
    ($register:ident, $scalar:ty, $lanes:literal) => {
        impl LaneAdapter for $register {
            type Scalar = $scalar;

            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                $register::splat(value)
            }

            #[inline(always)]
            fn load(src: &[$scalar]) -> Self {
                let mut lanes = [0.0; $lanes];
                lanes.copy_from_slice(src);
                $register::from(lanes)
            }

            #[inline(always)]
            fn load_partial(src: &[$scalar], fill: $scalar) -> Self {
                let mut lanes = [fill; $lanes];
                lanes[..src.len()].copy_from_slice(src);
                $register::from(lanes)
            }

            #[inline(always)]
            fn store(self, dst: &mut [$scalar]) {
                dst.copy_from_slice(&self.to_array());
            }

            #[inline(always)]
            fn store_partial(self, dst: &mut [$scalar]) {
                let len = dst.len();
                dst.copy_from_slice(&self.to_array()[..len]);
            }
        }
    };
}

impl_native_adapter!(f32x8, f32, 8);
impl_native_adapter!(f64x4, f64, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_partial_pads_with_fill() {
        let v = <f32x8 as LaneAdapter>::load_partial(&[1.0, 2.0, 3.0], -1.0);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, -1.0, -1.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_store_partial_leaves_the_rest_untouched() {
        let v = <f64x4 as LaneAdapter>::load(&[1.0, 2.0, 3.0, 4.0]);
        let mut out = [9.0; 5];
        v.store_partial(&mut out[..2]);
        assert_eq!(out, [1.0, 2.0, 9.0, 9.0, 9.0]);
    }

    #[test]
    #[should_panic]
    fn test_load_rejects_short_slices() {
        let _ = <f32x8 as LaneAdapter>::load(&[1.0; 7]);
    }
}
