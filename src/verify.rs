//! Comparison of a candidate output buffer against a reference one.
//!
//! These are hooks for the harness and the test suite, not an accuracy study:
//! they answer "do two strategies agree within a tolerance" and record how far
//! apart they are.

use crate::element::Element;
use crate::error::{length_mismatch, Result};

/// Accepted distance between a reference and a candidate value.
///
/// A pair is accepted if either bound holds: `|r - c| <= abs` or
/// `|r - c| <= rel * |r|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub abs: f64,
    pub rel: f64,
}

impl Tolerance {
    pub const fn new(abs: f64, rel: f64) -> Self {
        Self { abs, rel }
    }

    /// A purely relative tolerance.
    pub const fn relative(rel: f64) -> Self {
        Self { abs: 0.0, rel }
    }

    /// NaN matches NaN and infinities match only themselves.
    pub fn accepts(&self, reference: f64, candidate: f64) -> bool {
        if reference.is_nan() || candidate.is_nan() {
            return reference.is_nan() && candidate.is_nan();
        }
        if reference == candidate {
            return true;
        }
        if !reference.is_finite() || !candidate.is_finite() {
            return false;
        }
        let absolute_error = (reference - candidate).abs();
        absolute_error <= self.abs || absolute_error <= self.rel * reference.abs()
    }
}

/// First element outside the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub index: usize,
    pub reference: f64,
    pub candidate: f64,
}

/// Result of [`compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct Agreement {
    pub compared: usize,
    /// Largest `|r - c|` over pairs where both values are finite.
    pub max_abs_error: f64,
    /// Largest `|r - c| / |r|` over finite pairs with a non-zero reference.
    pub max_rel_error: f64,
    pub max_ulps: u64,
    pub mismatches: usize,
    pub first_mismatch: Option<Mismatch>,
}

impl Agreement {
    pub fn is_ok(&self) -> bool {
        self.mismatches == 0
    }
}

/// Compares `candidate` against `reference` element by element.
pub fn compare<T: Element>(reference: &[T], candidate: &[T], tolerance: Tolerance) -> Result<Agreement> {
    if reference.len() != candidate.len() {
        return Err(length_mismatch(
            reference.len(),
            candidate.len(),
            "candidate must have the same length as the reference",
        ));
    }

    let mut agreement = Agreement {
        compared: reference.len(),
        max_abs_error: 0.0,
        max_rel_error: 0.0,
        max_ulps: 0,
        mismatches: 0,
        first_mismatch: None,
    };

    for (index, (&r, &c)) in reference.iter().zip(candidate).enumerate() {
        let (rw, cw) = (r.widen(), c.widen());

        if rw.is_finite() && cw.is_finite() {
            let absolute_error = (rw - cw).abs();
            agreement.max_abs_error = agreement.max_abs_error.max(absolute_error);
            if rw != 0.0 {
                agreement.max_rel_error = agreement.max_rel_error.max(absolute_error / rw.abs());
            }
            agreement.max_ulps = agreement.max_ulps.max(r.ulp_distance(c));
        }

        if !tolerance.accepts(rw, cw) {
            agreement.mismatches += 1;
            agreement.first_mismatch.get_or_insert(Mismatch {
                index,
                reference: rw,
                candidate: cw,
            });
        }
    }

    Ok(agreement)
}

/// Number of representable values between `a` and `b`; see [`Element::ulp_distance`].
pub fn ulp_distance<T: Element>(a: T, b: T) -> u64 {
    a.ulp_distance(b)
}
