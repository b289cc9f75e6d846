use std::process::ExitCode;

use mathbench::logging::{init_tracing, LogConfig};
use mathbench::platform::Platform;
use mathbench::{Catalog, Harness, HarnessConfig};
use tracing::error;

fn main() -> ExitCode {
    if let Err(err) = init_tracing(&LogConfig::from_env()) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    Platform::current().log();

    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let catalog = match Catalog::build(config.tail) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(%err, "failed to build the benchmark catalog");
            return ExitCode::FAILURE;
        }
    };

    let report = Harness::new(config).run_suite(&catalog);
    println!("{}", report.to_markdown());

    if report.mismatched().next().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
