//! Throughput benchmarks for elementary math functions.
//!
//! Every function in [`FunctionId`] is registered in both precisions under three
//! execution strategies:
//!
//! - [`StrategyKind::Scalar`]: one standard-library call per element.
//! - [`StrategyKind::LibraryVectorized`]: one whole-buffer call into [`vml`].
//! - [`StrategyKind::ExplicitSimd`]: a hand-written loop over 512-bit registers
//!   whose remainder handling is set by a [`TailPolicy`].
//!
//! ```rust
//! use mathbench::{build_catalog, harness, FunctionId, Operands, Precision, StrategyKind};
//!
//! let catalog = build_catalog().unwrap();
//! let case = catalog
//!     .lookup(FunctionId::Exp, Precision::Single, StrategyKind::ExplicitSimd)
//!     .unwrap();
//!
//! let x = vec![0.0f32; 1024];
//! let mut out = vec![0.0f32; 1024];
//! let elapsed = harness::run(case, Operands::Unary(&x), &mut out).unwrap();
//! assert!(out.iter().all(|&v| v == 1.0));
//! println!("{} took {elapsed:?}", case.key());
//! ```

pub mod catalog;
pub mod element;
pub mod error;
pub mod function;
pub mod harness;
pub mod logging;
pub mod math;
pub mod platform;
pub mod simd;
pub mod strategy;
pub mod verify;
pub mod vml;

pub use catalog::{build_catalog, BenchmarkCase, CaseKey, Catalog, CatalogBuilder, Kernel, Operands, Transform};
pub use element::Element;
pub use error::{BenchError, Result};
pub use function::{Arity, FunctionId, Precision};
pub use harness::{run, Harness, HarnessConfig, SuiteReport};
pub use strategy::{StrategyKind, TailPolicy};
pub use verify::Tolerance;

/// Default number of elements per benchmark buffer.
pub const DEFAULT_BENCH_POINTS: usize = 200_000;
