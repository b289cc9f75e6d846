//! Hand-written SIMD loop over 512-bit registers.
//!
//! The loop mirrors what a programmer writes against a fixed-width vector
//! class:
//!
//! 1. Take the lane width `w` from the register type (16 for `f32`, 8 for `f64`).
//! 2. For every full `w`-element chunk: load, evaluate, store.
//! 3. Deal with the last `len % w` elements according to the [`TailPolicy`].
//!
//! Under [`TailPolicy::Strict`] a length that is not a multiple of `w` is
//! rejected before a single element is touched, so the output buffer is either
//! fully written or not written at all.

use num::{One, Zero};

use crate::element::Element;
use crate::error::{check_lengths, lane_remainder, Result};
use crate::math::{BinaryOp, UnaryOp};
use crate::simd::LaneAdapter;

use super::{check_binary_lengths, Strategy, StrategyKind, TailPolicy};

/// Fixed-width SIMD loop with a configurable remainder rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplicitSimd {
    pub tail: TailPolicy,
}

impl ExplicitSimd {
    pub fn new(tail: TailPolicy) -> Self {
        Self { tail }
    }

    fn check_tail<T: Element>(&self, len: usize) -> Result<()> {
        let lanes = T::Explicit::LANES;
        if self.tail == TailPolicy::Strict && len % lanes != 0 {
            return Err(lane_remainder(len, lanes));
        }
        Ok(())
    }
}

impl Strategy for ExplicitSimd {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ExplicitSimd
    }

    fn length_multiple<T: Element>(&self) -> usize {
        match self.tail {
            TailPolicy::Strict => T::Explicit::LANES,
            TailPolicy::Masked | TailPolicy::ScalarFallback => 1,
        }
    }

    fn unary<T: Element, Op: UnaryOp>(&self, x: &[T], out: &mut [T]) -> Result<()> {
        check_lengths(x.len(), out.len())?;
        self.check_tail::<T>(x.len())?;

        let lanes = T::Explicit::LANES;
        let mut src = x.chunks_exact(lanes);
        let mut dst = out.chunks_exact_mut(lanes);
        for (block, result) in (&mut src).zip(&mut dst) {
            T::Explicit::load(block).apply::<Op>().store(result);
        }

        let tail = src.remainder();
        if tail.is_empty() {
            return Ok(());
        }
        let tail_out = dst.into_remainder();
        match self.tail {
            TailPolicy::Masked => {
                T::Explicit::load_partial(tail, T::zero())
                    .apply::<Op>()
                    .store_partial(tail_out);
            }
            TailPolicy::ScalarFallback => {
                for (result, &value) in tail_out.iter_mut().zip(tail) {
                    *result = Op::eval(value);
                }
            }
            // rejected by check_tail
            TailPolicy::Strict => {}
        }
        Ok(())
    }

    fn binary<T: Element, Op: BinaryOp>(&self, y: &[T], x: &[T], out: &mut [T]) -> Result<()> {
        check_binary_lengths(y.len(), x.len(), out.len())?;
        self.check_tail::<T>(x.len())?;

        let lanes = T::Explicit::LANES;
        let mut ys = y.chunks_exact(lanes);
        let mut xs = x.chunks_exact(lanes);
        let mut dst = out.chunks_exact_mut(lanes);
        for ((yb, xb), result) in (&mut ys).zip(&mut xs).zip(&mut dst) {
            let yv = T::Explicit::load(yb);
            let xv = T::Explicit::load(xb);
            yv.apply2::<Op>(xv).store(result);
        }

        let (y_tail, x_tail) = (ys.remainder(), xs.remainder());
        if y_tail.is_empty() {
            return Ok(());
        }
        let tail_out = dst.into_remainder();
        match self.tail {
            TailPolicy::Masked => {
                let yv = T::Explicit::load_partial(y_tail, T::zero());
                let xv = T::Explicit::load_partial(x_tail, T::one());
                yv.apply2::<Op>(xv).store_partial(tail_out);
            }
            TailPolicy::ScalarFallback => {
                for ((result, &yv), &xv) in tail_out.iter_mut().zip(y_tail).zip(x_tail) {
                    *result = Op::eval(yv, xv);
                }
            }
            TailPolicy::Strict => {}
        }
        Ok(())
    }
}
