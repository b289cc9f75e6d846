//! Timing summaries and the markdown report.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use statrs::statistics::{Data, Median, Statistics};

use crate::catalog::CaseKey;
use crate::error::BenchError;
use crate::function::{FunctionId, Precision};
use crate::strategy::{StrategyKind, TailPolicy};
use crate::verify::Agreement;

use super::config::HarnessConfig;

/// Statistics over the timed trials of one case, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub trials: usize,
    pub mean_ns: f64,
    pub median_ns: f64,
    /// Sample standard deviation; `0.0` for a single trial.
    pub std_dev_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
}

impl Summary {
    /// Returns `None` for an empty sample.
    pub fn from_durations(samples: &[Duration]) -> Option<Summary> {
        if samples.is_empty() {
            return None;
        }
        let ns: Vec<f64> = samples.iter().map(|d| d.as_nanos() as f64).collect();

        let std_dev_ns = if ns.len() > 1 {
            Statistics::std_dev(ns.iter())
        } else {
            0.0
        };

        Some(Summary {
            trials: ns.len(),
            mean_ns: Statistics::mean(ns.iter()),
            median_ns: Data::new(ns.clone()).median(),
            std_dev_ns,
            min_ns: Statistics::min(ns.iter()),
            max_ns: Statistics::max(ns.iter()),
        })
    }
}

/// A case that ran to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub key: CaseKey,
    pub points: usize,
    pub summary: Summary,
    /// Comparison against the scalar output; `None` for the scalar case itself
    /// or when verification is disabled.
    pub agreement: Option<Agreement>,
}

impl Measurement {
    pub fn median_ns_per_element(&self) -> f64 {
        self.summary.median_ns / self.points as f64
    }

    pub fn verified(&self) -> bool {
        self.agreement.as_ref().map_or(true, Agreement::is_ok)
    }
}

/// What happened to one case during a suite run.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Measured(Measurement),
    /// The case was rejected before timing; the suite moved on.
    Skipped { key: CaseKey, error: BenchError },
}

impl CaseOutcome {
    pub fn key(&self) -> CaseKey {
        match self {
            CaseOutcome::Measured(measurement) => measurement.key,
            CaseOutcome::Skipped { key, .. } => *key,
        }
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            CaseOutcome::Measured(measurement) => Some(measurement),
            CaseOutcome::Skipped { .. } => None,
        }
    }
}

/// Outcomes of a whole suite run.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    pub generated_at: DateTime<Utc>,
    pub points: usize,
    pub trials: usize,
    pub tail: TailPolicy,
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// An empty report for a run of `config` over a catalog built with `tail`.
    pub fn new(config: &HarnessConfig, tail: TailPolicy) -> Self {
        Self {
            generated_at: Utc::now(),
            points: config.points,
            trials: config.trials,
            tail,
            outcomes: Vec::new(),
        }
    }

    pub fn find(&self, key: CaseKey) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|outcome| outcome.key() == key)
    }

    pub fn measured(&self) -> impl Iterator<Item = &Measurement> {
        self.outcomes.iter().filter_map(CaseOutcome::measurement)
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&CaseKey, &BenchError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            CaseOutcome::Skipped { key, error } => Some((key, error)),
            CaseOutcome::Measured(_) => None,
        })
    }

    /// Measured cases whose output disagreed with the scalar one.
    pub fn mismatched(&self) -> impl Iterator<Item = &Measurement> {
        self.measured().filter(|m| !m.verified())
    }

    /// Renders one table per precision: a row per function, a column per
    /// strategy. Cells hold the median time and the speedup over scalar; the
    /// fastest cell of each row is wrapped in backticks.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# mathbench");
        let _ = writeln!(md);
        let _ = writeln!(
            md,
            "{} · {} points · {} trials · {} tail",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            thousands(self.points as u128),
            self.trials,
            self.tail,
        );

        for precision in Precision::ALL {
            let _ = writeln!(md);
            let _ = write!(md, "| {precision} |");
            for strategy in StrategyKind::ALL {
                let _ = write!(md, " {strategy} |");
            }
            let _ = writeln!(md);
            let _ = writeln!(md, "|---|{}", "---:|".repeat(StrategyKind::ALL.len()));

            for function in FunctionId::ALL {
                let _ = writeln!(md, "{}", self.markdown_row(function, precision));
            }
        }

        let problems: Vec<String> = self
            .skipped()
            .map(|(key, error)| format!("- `{key}` skipped: {error}"))
            .chain(self.mismatched().filter_map(|m| {
                let mismatch = m.agreement.as_ref()?.first_mismatch?;
                Some(format!(
                    "- `{}` disagrees with scalar at index {}: {} vs {}",
                    m.key, mismatch.index, mismatch.candidate, mismatch.reference
                ))
            }))
            .collect();
        if !problems.is_empty() {
            let _ = writeln!(md);
            for line in problems {
                let _ = writeln!(md, "{line}");
            }
        }
        md
    }

    fn markdown_row(&self, function: FunctionId, precision: Precision) -> String {
        let median = |strategy| {
            self.find(CaseKey::new(function, precision, strategy))
                .and_then(CaseOutcome::measurement)
                .map(|m| m.summary.median_ns)
        };
        let medians: Vec<Option<f64>> = StrategyKind::ALL.iter().map(|&s| median(s)).collect();
        let scalar = median(StrategyKind::Scalar);
        let fastest = medians
            .iter()
            .flatten()
            .copied()
            .fold(f64::INFINITY, f64::min);

        let mut row = format!("| `{function}` |");
        for value in medians {
            let cell = match value {
                None => "n/a".to_string(),
                Some(ns) => {
                    let mut text = format!("{} ns", thousands(ns.round() as u128));
                    if let Some(base) = scalar.filter(|_| ns > 0.0) {
                        let _ = write!(text, " ({:.2}x)", base / ns);
                    }
                    if ns == fastest {
                        format!("`{text}`")
                    } else {
                        text
                    }
                }
            };
            let _ = write!(row, " {cell} |");
        }
        row
    }
}

/// Formats `value` with `,` as thousands separator.
fn thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(function: FunctionId, strategy: StrategyKind, median: u64) -> CaseOutcome {
        let samples = vec![Duration::from_nanos(median); 3];
        CaseOutcome::Measured(Measurement {
            key: CaseKey::new(function, Precision::Single, strategy),
            points: 1000,
            summary: Summary::from_durations(&samples).unwrap(),
            agreement: None,
        })
    }

    #[test]
    fn test_summary_statistics() {
        let samples: Vec<Duration> = [10, 20, 30, 40, 1000]
            .into_iter()
            .map(Duration::from_nanos)
            .collect();
        let summary = Summary::from_durations(&samples).unwrap();
        assert_eq!(summary.trials, 5);
        assert_eq!(summary.median_ns, 30.0);
        assert_eq!(summary.mean_ns, 220.0);
        assert_eq!(summary.min_ns, 10.0);
        assert_eq!(summary.max_ns, 1000.0);
        assert!(summary.std_dev_ns > 400.0);
    }

    #[test]
    fn test_summary_single_and_empty() {
        assert!(Summary::from_durations(&[]).is_none());
        let one = Summary::from_durations(&[Duration::from_nanos(5)]).unwrap();
        assert_eq!(one.std_dev_ns, 0.0);
        assert_eq!(one.median_ns, 5.0);
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(200_000), "200,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_markdown_marks_fastest_and_speedup() {
        let mut report = SuiteReport::new(&HarnessConfig::default(), TailPolicy::Strict);
        report.outcomes = vec![
            measured(FunctionId::Exp, StrategyKind::Scalar, 8000),
            measured(FunctionId::Exp, StrategyKind::LibraryVectorized, 2000),
            measured(FunctionId::Exp, StrategyKind::ExplicitSimd, 1000),
            CaseOutcome::Skipped {
                key: CaseKey::new(FunctionId::Sin, Precision::Single, StrategyKind::ExplicitSimd),
                error: crate::error::lane_remainder(1001, 16),
            },
        ];

        let md = report.to_markdown();
        assert!(md.contains("| f32 | scalar | library-vectorized | explicit-simd |"));
        assert!(md.contains(
            "| `exp` | 8,000 ns (1.00x) | 2,000 ns (4.00x) | `1,000 ns (8.00x)` |"
        ));
        assert!(md.contains("`sin/f32/explicit-simd` skipped"));
        assert!(md.contains("200,000 points"));
    }
}
