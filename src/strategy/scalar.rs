use crate::element::Element;
use crate::error::{check_lengths, Result};
use crate::math::{BinaryOp, UnaryOp};

use super::{check_binary_lengths, Strategy, StrategyKind};

/// One standard-library call per element.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Strategy for Scalar {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Scalar
    }

    fn length_multiple<T: Element>(&self) -> usize {
        1
    }

    fn unary<T: Element, Op: UnaryOp>(&self, x: &[T], out: &mut [T]) -> Result<()> {
        check_lengths(x.len(), out.len())?;
        for (result, &value) in out.iter_mut().zip(x) {
            *result = Op::eval(value);
        }
        Ok(())
    }

    fn binary<T: Element, Op: BinaryOp>(&self, y: &[T], x: &[T], out: &mut [T]) -> Result<()> {
        check_binary_lengths(y.len(), x.len(), out.len())?;
        for ((result, &yv), &xv) in out.iter_mut().zip(y).zip(x) {
            *result = Op::eval(yv, xv);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use crate::math::ops;

    #[test]
    fn test_scalar_matches_std() {
        let x = [0.0f64, 0.5, -1.25, 3.0];
        let mut out = [0.0; 4];
        Scalar.unary::<f64, ops::Tan>(&x, &mut out).unwrap();
        for (got, xi) in out.iter().zip(x) {
            assert_eq!(*got, xi.tan());
        }
    }

    #[test]
    fn test_domain_errors_pass_through() {
        let x = [2.0f32, -1.5];
        let mut out = [0.0; 2];
        Scalar.unary::<f32, ops::Asin>(&x, &mut out).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rejects_mismatched_output() {
        let mut out = [0.0f32; 3];
        let error = Scalar.unary::<f32, ops::Exp>(&[1.0; 4], &mut out).unwrap_err();
        assert!(matches!(error, BenchError::LengthMismatch { expected: 4, actual: 3, .. }));
    }
}
