use crate::math::{BinaryOp, ElementaryMath, UnaryOp};

/// A fixed-width vector register that can be filled from and spilled to a slice.
///
/// Implementors are the only place the crate touches lane layout. Strategies
/// describe *which* chunks to process; the adapter decides *how* a chunk maps
/// onto the register.
pub trait LaneAdapter: ElementaryMath + Send + Sync + 'static {
    /// Element type held in each lane.
    type Scalar: num::Float + ElementaryMath + Send + Sync + 'static;

    /// Number of lanes.
    const LANES: usize;

    #[inline(always)]
    fn lane_count() -> usize {
        Self::LANES
    }

    /// Broadcasts `value` to every lane.
    fn splat(value: Self::Scalar) -> Self;

    /// Loads exactly [`Self::LANES`] elements.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != Self::LANES`.
    fn load(src: &[Self::Scalar]) -> Self;

    /// Loads fewer than [`Self::LANES`] elements, padding the remaining lanes with `fill`.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() > Self::LANES`.
    fn load_partial(src: &[Self::Scalar], fill: Self::Scalar) -> Self;

    /// Stores every lane into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst.len() != Self::LANES`.
    fn store(self, dst: &mut [Self::Scalar]);

    /// Stores the first `dst.len()` lanes into `dst`; the others are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `dst.len() > Self::LANES`.
    fn store_partial(self, dst: &mut [Self::Scalar]);

    /// Evaluates `Op` lane by lane.
    #[inline(always)]
    fn apply<Op: UnaryOp>(self) -> Self {
        Op::eval(self)
    }

    /// Evaluates `Op(self, x)` lane by lane, `self` being the first operand.
    #[inline(always)]
    fn apply2<Op: BinaryOp>(self, x: Self) -> Self {
        Op::eval(self, x)
    }
}
