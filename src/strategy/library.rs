use crate::element::Element;
use crate::error::{check_lengths, Result};
use crate::math::{BinaryOp, UnaryOp};
use crate::vml;

use super::{check_binary_lengths, Strategy, StrategyKind};

/// A single whole-buffer call into [`crate::vml`]; register width and tail are the library's business.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryVectorized;

impl Strategy for LibraryVectorized {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LibraryVectorized
    }

    fn length_multiple<T: Element>(&self) -> usize {
        1
    }

    fn unary<T: Element, Op: UnaryOp>(&self, x: &[T], out: &mut [T]) -> Result<()> {
        check_lengths(x.len(), out.len())?;
        vml::map_unary::<T::Native, Op>(x, out);
        Ok(())
    }

    fn binary<T: Element, Op: BinaryOp>(&self, y: &[T], x: &[T], out: &mut [T]) -> Result<()> {
        check_binary_lengths(y.len(), x.len(), out.len())?;
        vml::map_binary::<T::Native, Op>(y, x, out);
        Ok(())
    }
}
