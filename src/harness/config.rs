use std::env;
use std::str::FromStr;

use tracing::debug;

use crate::error::{invalid_config, BenchError, Result};
use crate::strategy::TailPolicy;
use crate::DEFAULT_BENCH_POINTS;

use super::input::InputDistribution;

/// Settings of a benchmark suite run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Elements per buffer.
    pub points: usize,
    /// Timed runs per case.
    pub trials: usize,
    /// Untimed runs per case before the first trial.
    pub warmup: usize,
    pub tail: TailPolicy,
    pub distribution: InputDistribution,
    /// Seed for [`InputDistribution::Uniform`].
    pub seed: u64,
    /// Compare every vectorized output against the scalar one.
    pub verify: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_BENCH_POINTS,
            trials: 10,
            warmup: 2,
            tail: TailPolicy::Strict,
            distribution: InputDistribution::Linspace,
            seed: 42,
            verify: true,
        }
    }
}

impl HarnessConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `MATHBENCH_POINTS` - buffer length (default 200000)
    /// - `MATHBENCH_TRIALS` - timed runs per case (default 10)
    /// - `MATHBENCH_WARMUP` - untimed runs per case (default 2)
    /// - `MATHBENCH_TAIL` - `strict`, `masked` or `scalar`
    /// - `MATHBENCH_DISTRIBUTION` - `linspace` or `uniform`
    /// - `MATHBENCH_SEED` - seed of the uniform sampler (default 42)
    /// - `MATHBENCH_VERIFY` - `true` or `false`
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] if a variable does not parse or
    /// the result fails [`HarnessConfig::validate`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`HarnessConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(points) = lookup("MATHBENCH_POINTS") {
            config.points = parse_number("MATHBENCH_POINTS", &points)?;
        }
        if let Some(trials) = lookup("MATHBENCH_TRIALS") {
            config.trials = parse_number("MATHBENCH_TRIALS", &trials)?;
        }
        if let Some(warmup) = lookup("MATHBENCH_WARMUP") {
            config.warmup = parse_number("MATHBENCH_WARMUP", &warmup)?;
        }
        if let Some(tail) = lookup("MATHBENCH_TAIL") {
            config.tail = tail.parse()?;
        }
        if let Some(distribution) = lookup("MATHBENCH_DISTRIBUTION") {
            config.distribution = distribution.parse()?;
        }
        if let Some(seed) = lookup("MATHBENCH_SEED") {
            config.seed = parse_number("MATHBENCH_SEED", &seed)?;
        }
        if let Some(verify) = lookup("MATHBENCH_VERIFY") {
            config.verify = parse_flag("MATHBENCH_VERIFY", &verify)?;
        }

        config.validate()?;
        debug!(?config, "harness configuration");
        Ok(config)
    }

    /// Rejects settings that would make every case fail or measure nothing.
    pub fn validate(&self) -> Result<()> {
        if self.points == 0 {
            return Err(invalid_config("points must be at least 1"));
        }
        if self.trials == 0 {
            return Err(invalid_config("trials must be at least 1"));
        }
        Ok(())
    }
}

fn parse_number<N: FromStr>(name: &str, value: &str) -> Result<N> {
    value
        .trim()
        .replace('_', "")
        .parse()
        .map_err(|_| invalid_config(format!("{name} must be a non-negative integer, got '{value}'")))
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BenchError::InvalidConfig {
            message: format!("{name} must be true or false, got '{value}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<HarnessConfig> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        HarnessConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.points, 200_000);
        assert_eq!(config.tail, TailPolicy::Strict);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MATHBENCH_POINTS", "1_024"),
            ("MATHBENCH_TRIALS", "3"),
            ("MATHBENCH_WARMUP", "0"),
            ("MATHBENCH_TAIL", "masked"),
            ("MATHBENCH_DISTRIBUTION", "uniform"),
            ("MATHBENCH_SEED", "7"),
            ("MATHBENCH_VERIFY", "off"),
        ])
        .unwrap();
        assert_eq!(config.points, 1024);
        assert_eq!(config.trials, 3);
        assert_eq!(config.warmup, 0);
        assert_eq!(config.tail, TailPolicy::Masked);
        assert_eq!(config.distribution, InputDistribution::Uniform);
        assert_eq!(config.seed, 7);
        assert!(!config.verify);
    }

    #[test]
    fn test_rejects_garbage_and_zero() {
        assert!(matches!(
            config_from(&[("MATHBENCH_POINTS", "lots")]),
            Err(BenchError::InvalidConfig { .. })
        ));
        assert!(matches!(
            config_from(&[("MATHBENCH_POINTS", "0")]),
            Err(BenchError::InvalidConfig { .. })
        ));
        assert!(matches!(
            config_from(&[("MATHBENCH_TRIALS", "0")]),
            Err(BenchError::InvalidConfig { .. })
        ));
        assert!(matches!(
            config_from(&[("MATHBENCH_VERIFY", "maybe")]),
            Err(BenchError::InvalidConfig { .. })
        ));
    }
}
