//! Benchmark execution.
//!
//! [`run`] times a single invocation of a case. [`Harness::run_suite`] drives
//! the whole catalog:
//!
//! 1. For each `(function, precision)` group, sample one input set from the
//!    function's domain. It is shared read-only by the group's cases.
//! 2. Run the scalar case once to get the reference output (if verification
//!    is enabled).
//! 3. For each case: warm up, time `trials` runs into its own output buffer,
//!    compare the last output against the reference, summarise.
//! 4. A case that fails validation is recorded as skipped and the suite
//!    carries on.
//!
//! Everything runs on the calling thread, one case at a time.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{BenchmarkCase, CaseGroup, Catalog, Operands};
use crate::element::Element;
use crate::error::{invalid_config, Result};
use crate::function::Precision;
use crate::strategy::StrategyKind;
use crate::verify;

pub mod config;
pub mod input;
pub mod report;

pub use config::HarnessConfig;
pub use input::{InputDistribution, InputSet};
pub use report::{CaseOutcome, Measurement, SuiteReport, Summary};

/// Runs `case` once over `operands`, writing into `out`, and returns the elapsed time.
///
/// Buffers are validated with [`BenchmarkCase::check`] before the clock
/// starts, so a configuration error never produces a timing.
pub fn run<T: Element>(
    case: &BenchmarkCase,
    operands: Operands<'_, T>,
    out: &mut [T],
) -> Result<Duration> {
    case.check(&operands, out.len())?;

    let start = Instant::now();
    let outcome = case.apply(operands, out);
    let elapsed = start.elapsed();

    outcome.map(|()| elapsed)
}

/// Runs every case of a catalog according to a [`HarnessConfig`].
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    #[instrument(skip_all, fields(cases = catalog.len(), points = self.config.points))]
    pub fn run_suite(&self, catalog: &Catalog) -> SuiteReport {
        if catalog.tail() != self.config.tail {
            warn!(
                catalog = %catalog.tail(),
                configured = %self.config.tail,
                "catalog was built with a different tail policy, reporting the catalog's"
            );
        }
        let mut report = SuiteReport::new(&self.config, catalog.tail());
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        for group in catalog.groups() {
            let outcomes = match group.precision {
                Precision::Single => self.run_group::<f32>(&group, &mut rng),
                Precision::Double => self.run_group::<f64>(&group, &mut rng),
            };
            report.outcomes.extend(outcomes);
        }

        info!(
            measured = report.measured().count(),
            skipped = report.skipped().count(),
            mismatched = report.mismatched().count(),
            "suite finished"
        );
        report
    }

    fn run_group<T: Element>(&self, group: &CaseGroup<'_>, rng: &mut StdRng) -> Vec<CaseOutcome> {
        let inputs =
            input::generate::<T>(group.function, self.config.points, self.config.distribution, rng);
        let operands = inputs.operands();
        debug!(function = %group.function, precision = %group.precision, "running group");

        let reference = if self.config.verify {
            self.reference_output(group, operands)
        } else {
            None
        };

        group
            .cases
            .iter()
            .map(|case| match self.run_case(case, operands, reference.as_deref()) {
                Ok(measurement) => CaseOutcome::Measured(measurement),
                Err(error) => {
                    warn!(case = %case.key(), %error, "skipping case");
                    CaseOutcome::Skipped {
                        key: case.key(),
                        error,
                    }
                }
            })
            .collect()
    }

    fn reference_output<T: Element>(
        &self,
        group: &CaseGroup<'_>,
        operands: Operands<'_, T>,
    ) -> Option<Vec<T>> {
        let scalar = group
            .cases
            .iter()
            .find(|case| case.strategy() == StrategyKind::Scalar)?;
        let mut out = vec![T::default(); operands.len()];
        match run(scalar, operands, &mut out) {
            Ok(_) => Some(out),
            Err(error) => {
                warn!(case = %scalar.key(), %error, "no scalar reference, verification disabled for group");
                None
            }
        }
    }

    /// Warms up, times and verifies a single case.
    pub fn run_case<T: Element>(
        &self,
        case: &BenchmarkCase,
        operands: Operands<'_, T>,
        reference: Option<&[T]>,
    ) -> Result<Measurement> {
        let mut out = vec![T::default(); operands.len()];

        for _ in 0..self.config.warmup {
            run(case, operands, &mut out)?;
        }
        let samples = (0..self.config.trials)
            .map(|_| run(case, operands, &mut out))
            .collect::<Result<Vec<_>>>()?;

        let summary = Summary::from_durations(&samples)
            .ok_or_else(|| invalid_config("trials must be at least 1"))?;

        let agreement = match reference {
            Some(reference) if case.strategy() != StrategyKind::Scalar => {
                let tolerance = case.function().tolerance(T::PRECISION);
                let agreement = verify::compare(reference, &out, tolerance)?;
                if !agreement.is_ok() {
                    warn!(
                        case = %case.key(),
                        mismatches = agreement.mismatches,
                        max_abs_error = agreement.max_abs_error,
                        max_ulps = agreement.max_ulps,
                        "output disagrees with scalar"
                    );
                }
                Some(agreement)
            }
            _ => None,
        };

        debug!(
            case = %case.key(),
            median_ns = summary.median_ns,
            std_dev_ns = summary.std_dev_ns,
            "measured"
        );
        Ok(Measurement {
            key: case.key(),
            points: operands.len(),
            summary,
            agreement,
        })
    }
}
