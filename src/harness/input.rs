//! Input buffers sampled from each function's domain.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;

use crate::catalog::Operands;
use crate::element::Element;
use crate::error::{invalid_config, BenchError};
use crate::function::{Arity, FunctionId};

/// How input values are spread over a function's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputDistribution {
    /// Evenly spaced, see [`linspace`].
    #[default]
    Linspace,
    /// Independent uniform samples from a seeded generator.
    Uniform,
}

impl fmt::Display for InputDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputDistribution::Linspace => f.write_str("linspace"),
            InputDistribution::Uniform => f.write_str("uniform"),
        }
    }
}

impl FromStr for InputDistribution {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, BenchError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linspace" => Ok(InputDistribution::Linspace),
            "uniform" => Ok(InputDistribution::Uniform),
            other => Err(invalid_config(format!(
                "unknown input distribution '{other}', expected linspace or uniform"
            ))),
        }
    }
}

/// `n` evenly spaced values starting at `range.start`; `range.end` is not included.
///
/// Values are computed in `f64` and rounded once to `T`.
pub fn linspace<T: Element>(range: Range<f64>, n: usize) -> Vec<T> {
    let step = (range.end - range.start) / n as f64;
    (0..n)
        .map(|i| T::narrow(range.start + step * i as f64))
        .collect()
}

/// `n` uniform samples from `range`.
pub fn uniform<T: Element>(range: Range<f64>, n: usize, rng: &mut StdRng) -> Vec<T> {
    (0..n)
        .map(|_| T::narrow(rng.random_range(range.clone())))
        .collect()
}

/// The input buffers of one `(function, precision)` group.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSet<T> {
    pub function: FunctionId,
    /// First operand of a two-input function, `None` otherwise.
    pub y: Option<Vec<T>>,
    pub x: Vec<T>,
}

impl<T: Element> InputSet<T> {
    pub fn operands(&self) -> Operands<'_, T> {
        match &self.y {
            Some(y) => Operands::Binary { y, x: &self.x },
            None => Operands::Unary(&self.x),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Samples `points` inputs for `function` at precision `T`.
///
/// For `atan2` under [`InputDistribution::Linspace`], `x` is `y` rotated by a
/// quarter of its length, so each quarter of the buffer lands in a different
/// quadrant. Under [`InputDistribution::Uniform`] the two operands are
/// independent streams.
pub fn generate<T: Element>(
    function: FunctionId,
    points: usize,
    distribution: InputDistribution,
    rng: &mut StdRng,
) -> InputSet<T> {
    let domain = function.domain(T::PRECISION);
    let sample = |rng: &mut StdRng| match distribution {
        InputDistribution::Linspace => linspace::<T>(domain.clone(), points),
        InputDistribution::Uniform => uniform::<T>(domain.clone(), points, rng),
    };

    match function.arity() {
        Arity::Unary => InputSet {
            function,
            y: None,
            x: sample(&mut *rng),
        },
        Arity::Binary => {
            let y = sample(&mut *rng);
            let x = match distribution {
                InputDistribution::Linspace => {
                    let mut x = y.clone();
                    x.rotate_left(points / 4);
                    x
                }
                InputDistribution::Uniform => sample(&mut *rng),
            };
            InputSet {
                function,
                y: Some(y),
                x,
            }
        }
    }
}
