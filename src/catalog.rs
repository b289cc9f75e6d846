//! Benchmark cases and the registry that owns them.
//!
//! A [`BenchmarkCase`] binds a key `(function, precision, strategy)` to a
//! ready-to-call [`Transform`]. The [`Catalog`] is built once from a table of
//! every function, precision and strategy, and is read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use mathbench::{build_catalog, FunctionId, Operands, Precision, StrategyKind};
//!
//! let catalog = build_catalog().unwrap();
//! let case = catalog
//!     .lookup(FunctionId::Cos, Precision::Double, StrategyKind::ExplicitSimd)
//!     .unwrap();
//!
//! let x = vec![0.0f64; 64];
//! let mut out = vec![0.0f64; 64];
//! case.apply(Operands::Unary(&x), &mut out).unwrap();
//! assert!(out.iter().all(|&v| v == 1.0));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, info, instrument};

use crate::element::Element;
use crate::error::{check_lengths, lane_remainder, length_mismatch, BenchError, Result};
use crate::function::{Arity, FunctionId, OpVisitor, Precision};
use crate::math::{BinaryOp, UnaryOp};
use crate::strategy::{ExplicitSimd, LibraryVectorized, Scalar, Strategy, StrategyKind, TailPolicy};

/// Identity of a benchmark case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseKey {
    pub function: FunctionId,
    pub precision: Precision,
    pub strategy: StrategyKind,
}

impl CaseKey {
    pub const fn new(function: FunctionId, precision: Precision, strategy: StrategyKind) -> Self {
        Self {
            function,
            precision,
            strategy,
        }
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.function, self.precision, self.strategy)
    }
}

type UnaryFn<T> = Box<dyn Fn(&[T], &mut [T]) -> Result<()> + Send + Sync>;
type BinaryFn<T> = Box<dyn Fn(&[T], &[T], &mut [T]) -> Result<()> + Send + Sync>;

/// A buffer-to-buffer function for one element type.
pub enum Kernel<T> {
    /// `f(x, out)`
    Unary(UnaryFn<T>),
    /// `f(y, x, out)`
    Binary(BinaryFn<T>),
}

impl<T> Kernel<T> {
    /// Boxes an `f(x, out)` closure.
    pub fn unary(f: impl Fn(&[T], &mut [T]) -> Result<()> + Send + Sync + 'static) -> Self {
        Kernel::Unary(Box::new(f))
    }

    /// Boxes an `f(y, x, out)` closure.
    pub fn binary(f: impl Fn(&[T], &[T], &mut [T]) -> Result<()> + Send + Sync + 'static) -> Self {
        Kernel::Binary(Box::new(f))
    }

    pub fn arity(&self) -> Arity {
        match self {
            Kernel::Unary(_) => Arity::Unary,
            Kernel::Binary(_) => Arity::Binary,
        }
    }
}

impl<T> fmt::Debug for Kernel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kernel::Unary(_) => f.write_str("Kernel::Unary"),
            Kernel::Binary(_) => f.write_str("Kernel::Binary"),
        }
    }
}

/// A kernel tagged with its element type.
#[derive(Debug)]
pub enum TypedKernel {
    F32(Kernel<f32>),
    F64(Kernel<f64>),
}

impl TypedKernel {
    pub fn precision(&self) -> Precision {
        match self {
            TypedKernel::F32(_) => Precision::Single,
            TypedKernel::F64(_) => Precision::Double,
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            TypedKernel::F32(kernel) => kernel.arity(),
            TypedKernel::F64(kernel) => kernel.arity(),
        }
    }
}

/// Input buffers handed to a case. The output is always a separate `&mut` slice.
#[derive(Debug, Clone, Copy)]
pub enum Operands<'a, T> {
    Unary(&'a [T]),
    /// `atan2(y, x)` operands, read at the same offsets.
    Binary { y: &'a [T], x: &'a [T] },
}

impl<T> Operands<'_, T> {
    pub fn arity(&self) -> Arity {
        match self {
            Operands::Unary(_) => Arity::Unary,
            Operands::Binary { .. } => Arity::Binary,
        }
    }

    /// Length of the (first) input buffer.
    pub fn len(&self) -> usize {
        match self {
            Operands::Unary(x) => x.len(),
            Operands::Binary { y, .. } => y.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A kernel plus the buffer-length constraint it was built with.
#[derive(Debug)]
pub struct Transform {
    kernel: TypedKernel,
    length_multiple: usize,
}

impl Transform {
    pub fn new<T: Element>(kernel: Kernel<T>) -> Self {
        Self {
            kernel: T::wrap(kernel),
            length_multiple: 1,
        }
    }

    /// Requires buffer lengths to be a multiple of `multiple` (values below 1 are treated as 1).
    pub fn with_length_multiple(mut self, multiple: usize) -> Self {
        self.length_multiple = multiple.max(1);
        self
    }

    pub fn precision(&self) -> Precision {
        self.kernel.precision()
    }

    pub fn arity(&self) -> Arity {
        self.kernel.arity()
    }

    pub fn length_multiple(&self) -> usize {
        self.length_multiple
    }
}

/// An immutable, registered benchmark case.
#[derive(Debug)]
pub struct BenchmarkCase {
    key: CaseKey,
    transform: Transform,
}

impl BenchmarkCase {
    pub fn key(&self) -> CaseKey {
        self.key
    }

    pub fn function(&self) -> FunctionId {
        self.key.function
    }

    pub fn precision(&self) -> Precision {
        self.key.precision
    }

    pub fn strategy(&self) -> StrategyKind {
        self.key.strategy
    }

    pub fn length_multiple(&self) -> usize {
        self.transform.length_multiple
    }

    /// Validates buffers against this case without running it.
    ///
    /// Checks, in order: element precision, operand arity, operand lengths,
    /// output length, non-emptiness and the length multiple.
    pub fn check<T: Element>(&self, operands: &Operands<'_, T>, out_len: usize) -> Result<()> {
        if T::PRECISION != self.precision() {
            return Err(BenchError::PrecisionMismatch {
                key: self.key,
                expected: self.precision(),
                actual: T::PRECISION,
            });
        }
        if operands.arity() != self.function().arity() {
            return Err(BenchError::ArityMismatch {
                key: self.key,
                expected: self.function().arity(),
                actual: operands.arity(),
            });
        }
        if let Operands::Binary { y, x } = operands {
            if y.len() != x.len() {
                return Err(length_mismatch(
                    y.len(),
                    x.len(),
                    "x operand must have the same length as y",
                ));
            }
        }
        check_lengths(operands.len(), out_len)?;

        let multiple = self.length_multiple();
        if operands.len() % multiple != 0 {
            return Err(lane_remainder(operands.len(), multiple));
        }
        Ok(())
    }

    /// Runs the kernel once over `operands`, writing into `out`.
    pub fn apply<T: Element>(&self, operands: Operands<'_, T>, out: &mut [T]) -> Result<()> {
        let kernel = T::unwrap(&self.transform.kernel).ok_or(BenchError::PrecisionMismatch {
            key: self.key,
            expected: self.precision(),
            actual: T::PRECISION,
        })?;
        match (kernel, operands) {
            (Kernel::Unary(f), Operands::Unary(x)) => f(x, out),
            (Kernel::Binary(f), Operands::Binary { y, x }) => f(y, x, out),
            (kernel, operands) => Err(BenchError::ArityMismatch {
                key: self.key,
                expected: kernel.arity(),
                actual: operands.arity(),
            }),
        }
    }
}

/// Collects cases and rejects inconsistent registrations.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    cases: BTreeMap<CaseKey, BenchmarkCase>,
    tail: TailPolicy,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `transform` under `(function, precision, strategy)`.
    ///
    /// # Errors
    ///
    /// - [`BenchError::DuplicateCase`] if the key is already registered.
    /// - [`BenchError::PrecisionMismatch`] if the transform was built for the other precision.
    /// - [`BenchError::ArityMismatch`] if the kernel arity differs from the function's.
    pub fn register(
        &mut self,
        function: FunctionId,
        precision: Precision,
        strategy: StrategyKind,
        transform: Transform,
    ) -> Result<&mut Self> {
        let key = CaseKey::new(function, precision, strategy);
        if self.cases.contains_key(&key) {
            return Err(BenchError::DuplicateCase { key });
        }
        if transform.precision() != precision {
            return Err(BenchError::PrecisionMismatch {
                key,
                expected: precision,
                actual: transform.precision(),
            });
        }
        if transform.arity() != function.arity() {
            return Err(BenchError::ArityMismatch {
                key,
                expected: function.arity(),
                actual: transform.arity(),
            });
        }

        debug!(case = %key, length_multiple = transform.length_multiple(), "registered case");
        self.cases.insert(key, BenchmarkCase { key, transform });
        Ok(self)
    }

    /// Records the tail policy the explicit cases were built with.
    pub fn tail_policy(&mut self, tail: TailPolicy) -> &mut Self {
        self.tail = tail;
        self
    }

    pub fn build(self) -> Catalog {
        Catalog {
            cases: self.cases,
            tail: self.tail,
        }
    }
}

/// The cases of one `(function, precision)` pair, in strategy order.
#[derive(Debug, Clone)]
pub struct CaseGroup<'a> {
    pub function: FunctionId,
    pub precision: Precision,
    pub cases: Vec<&'a BenchmarkCase>,
}

/// Read-only registry of benchmark cases, ordered by key.
#[derive(Debug)]
pub struct Catalog {
    cases: BTreeMap<CaseKey, BenchmarkCase>,
    tail: TailPolicy,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Registers every function in both precisions under all three strategies.
    #[instrument(level = "debug")]
    pub fn build(tail: TailPolicy) -> Result<Catalog> {
        let mut builder = CatalogBuilder::new();
        builder.tail_policy(tail);
        for function in FunctionId::ALL {
            register_strategies::<f32>(&mut builder, function, tail)?;
            register_strategies::<f64>(&mut builder, function, tail)?;
        }
        let catalog = builder.build();
        info!(cases = catalog.len(), %tail, "catalog built");
        Ok(catalog)
    }

    pub fn lookup(
        &self,
        function: FunctionId,
        precision: Precision,
        strategy: StrategyKind,
    ) -> Result<&BenchmarkCase> {
        let key = CaseKey::new(function, precision, strategy);
        self.cases.get(&key).ok_or(BenchError::CaseNotFound { key })
    }

    pub fn cases(&self) -> impl Iterator<Item = &BenchmarkCase> {
        self.cases.values()
    }

    /// Cases grouped by `(function, precision)`, in catalog order.
    pub fn groups(&self) -> Vec<CaseGroup<'_>> {
        let mut groups: Vec<CaseGroup<'_>> = Vec::new();
        for case in self.cases.values() {
            match groups.last_mut() {
                Some(group)
                    if group.function == case.function() && group.precision == case.precision() =>
                {
                    group.cases.push(case);
                }
                _ => groups.push(CaseGroup {
                    function: case.function(),
                    precision: case.precision(),
                    cases: vec![case],
                }),
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Tail policy of the explicit SIMD cases.
    pub fn tail(&self) -> TailPolicy {
        self.tail
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Builds the full catalog with the strict tail policy.
pub fn build_catalog() -> Result<Catalog> {
    Catalog::build(TailPolicy::default())
}

/// Builds the transform that runs `function` with `strategy` on elements of type `T`.
pub fn transform_for<S: Strategy, T: Element>(strategy: S, function: FunctionId) -> Transform {
    let kernel = function.dispatch(KernelSelector::<S, T> {
        strategy,
        element: PhantomData,
    });
    Transform::new(kernel).with_length_multiple(strategy.length_multiple::<T>())
}

fn register_strategies<T: Element>(
    builder: &mut CatalogBuilder,
    function: FunctionId,
    tail: TailPolicy,
) -> Result<()> {
    builder
        .register(
            function,
            T::PRECISION,
            StrategyKind::Scalar,
            transform_for::<_, T>(Scalar, function),
        )?
        .register(
            function,
            T::PRECISION,
            StrategyKind::LibraryVectorized,
            transform_for::<_, T>(LibraryVectorized, function),
        )?
        .register(
            function,
            T::PRECISION,
            StrategyKind::ExplicitSimd,
            transform_for::<_, T>(ExplicitSimd::new(tail), function),
        )?;
    Ok(())
}

/// Turns the operation chosen by [`FunctionId::dispatch`] into a kernel for one strategy.
struct KernelSelector<S, T> {
    strategy: S,
    element: PhantomData<fn() -> T>,
}

impl<S: Strategy, T: Element> OpVisitor for KernelSelector<S, T> {
    type Output = Kernel<T>;

    fn visit_unary<Op: UnaryOp>(self) -> Kernel<T> {
        let strategy = self.strategy;
        Kernel::unary(move |x, out| strategy.unary::<T, Op>(x, out))
    }

    fn visit_binary<Op: BinaryOp>(self) -> Kernel<T> {
        let strategy = self.strategy;
        Kernel::binary(move |y, x, out| strategy.binary::<T, Op>(y, x, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ops;

    fn assert_send_sync<T: Send + Sync>() {}

    fn exp_transform() -> Transform {
        Transform::new(Kernel::<f32>::unary(|x, out| {
            Scalar.unary::<f32, ops::Exp>(x, out)
        }))
    }

    #[test]
    fn test_catalog_is_complete() {
        let catalog = build_catalog().unwrap();
        assert_eq!(catalog.len(), 60);
        assert_eq!(catalog.groups().len(), 20);
        for group in catalog.groups() {
            let strategies: Vec<_> = group.cases.iter().map(|c| c.strategy()).collect();
            assert_eq!(strategies, StrategyKind::ALL);
        }
    }

    #[test]
    fn test_catalog_records_its_tail_policy() {
        assert_eq!(build_catalog().unwrap().tail(), TailPolicy::Strict);
        assert_eq!(Catalog::build(TailPolicy::ScalarFallback).unwrap().tail(), TailPolicy::ScalarFallback);

        let mut builder = Catalog::builder();
        builder.tail_policy(TailPolicy::Masked);
        assert_eq!(builder.build().tail(), TailPolicy::Masked);
    }

    #[test]
    fn test_catalog_is_shareable() {
        assert_send_sync::<Catalog>();
        assert_send_sync::<BenchmarkCase>();
    }

    #[test]
    fn test_duplicate_registration() {
        let mut builder = CatalogBuilder::new();
        builder
            .register(FunctionId::Exp, Precision::Single, StrategyKind::Scalar, exp_transform())
            .unwrap();
        let error = builder
            .register(FunctionId::Exp, Precision::Single, StrategyKind::Scalar, exp_transform())
            .unwrap_err();
        assert_eq!(
            error,
            BenchError::DuplicateCase {
                key: CaseKey::new(FunctionId::Exp, Precision::Single, StrategyKind::Scalar)
            }
        );
    }

    #[test]
    fn test_register_checks_precision_and_arity() {
        let mut builder = CatalogBuilder::new();
        assert!(matches!(
            builder.register(FunctionId::Exp, Precision::Double, StrategyKind::Scalar, exp_transform()),
            Err(BenchError::PrecisionMismatch {
                expected: Precision::Double,
                actual: Precision::Single,
                ..
            })
        ));
        assert!(matches!(
            builder.register(FunctionId::Atan2, Precision::Single, StrategyKind::Scalar, exp_transform()),
            Err(BenchError::ArityMismatch {
                expected: Arity::Binary,
                actual: Arity::Unary,
                ..
            })
        ));
    }

    #[test]
    fn test_lookup_missing_case() {
        let catalog = Catalog::builder().build();
        assert!(catalog.is_empty());
        let error = catalog
            .lookup(FunctionId::Atan2, Precision::Single, StrategyKind::ExplicitSimd)
            .unwrap_err();
        assert!(matches!(error, BenchError::CaseNotFound { .. }));
    }

    #[test]
    fn test_strict_explicit_cases_carry_lane_multiple() {
        let catalog = build_catalog().unwrap();
        let explicit = catalog
            .lookup(FunctionId::Sin, Precision::Single, StrategyKind::ExplicitSimd)
            .unwrap();
        assert_eq!(explicit.length_multiple(), 16);
        let library = catalog
            .lookup(FunctionId::Sin, Precision::Double, StrategyKind::LibraryVectorized)
            .unwrap();
        assert_eq!(library.length_multiple(), 1);
    }

    #[test]
    fn test_check_order() {
        let catalog = build_catalog().unwrap();
        let case = catalog
            .lookup(FunctionId::Exp, Precision::Single, StrategyKind::ExplicitSimd)
            .unwrap();

        let x64 = [0.0f64; 16];
        assert!(matches!(
            case.check(&Operands::Unary(&x64), 16),
            Err(BenchError::PrecisionMismatch { .. })
        ));

        let x = [0.0f32; 17];
        assert!(matches!(
            case.check(&Operands::Binary { y: &x, x: &x }, 17),
            Err(BenchError::ArityMismatch { .. })
        ));
        assert!(matches!(
            case.check(&Operands::Unary(&x), 16),
            Err(BenchError::LengthMismatch { .. })
        ));
        assert!(matches!(
            case.check(&Operands::Unary(&x[..0]), 0),
            Err(BenchError::EmptyBuffer { .. })
        ));
        assert!(matches!(
            case.check(&Operands::Unary(&x), 17),
            Err(BenchError::LaneRemainder { remainder: 1, .. })
        ));
        assert!(case.check(&Operands::Unary(&x[..16]), 16).is_ok());
    }

    #[test]
    fn test_apply_wrong_precision() {
        let catalog = build_catalog().unwrap();
        let case = catalog
            .lookup(FunctionId::Cos, Precision::Double, StrategyKind::Scalar)
            .unwrap();
        let x = [0.0f32; 8];
        let mut out = [0.0f32; 8];
        assert!(matches!(
            case.apply(Operands::Unary(&x), &mut out),
            Err(BenchError::PrecisionMismatch { .. })
        ));
    }
}
