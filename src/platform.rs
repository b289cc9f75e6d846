//! Host and build SIMD capabilities.
//!
//! `build.rs` records the widest extension of the build host and the rustc
//! channel. The extensions the binary was actually compiled for come from
//! `cfg!(target_feature = ...)`. A mismatch usually means the crate was built
//! without `-C target-cpu=native`, which makes `wide` fall back to narrower
//! instructions and skews every vectorized measurement.

use std::fmt;

use tracing::{info, warn};

/// Extensions in order of decreasing register width.
const EXTENSIONS: [&str; 4] = ["avx512f", "avx2", "neon", "sse4_1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub arch: &'static str,
    /// Widest extension of the build host, `none`, or `unknown` when cross-compiling.
    pub host_simd: &'static str,
    /// Widest extension enabled at compile time, or `none`.
    pub compiled_simd: &'static str,
    pub rustc_channel: &'static str,
}

impl Platform {
    pub fn current() -> Self {
        Self {
            arch: std::env::consts::ARCH,
            host_simd: env!("MATHBENCH_HOST_SIMD"),
            compiled_simd: compiled_simd(),
            rustc_channel: env!("MATHBENCH_RUSTC_CHANNEL"),
        }
    }

    /// `false` if the host supports a wider extension than the binary uses.
    pub fn uses_best_extension(&self) -> bool {
        match (rank(self.host_simd), rank(self.compiled_simd)) {
            (Some(host), Some(compiled)) => compiled <= host,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    /// Logs the platform, warning if the build leaves SIMD width on the table.
    pub fn log(&self) {
        if self.uses_best_extension() {
            info!(platform = %self, "platform");
        } else {
            warn!(
                platform = %self,
                "binary does not use the widest SIMD extension of this host; \
                 rebuild with RUSTFLAGS=\"-C target-cpu=native\""
            );
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (host: {}, compiled: {}, rustc: {})",
            self.arch, self.host_simd, self.compiled_simd, self.rustc_channel
        )
    }
}

fn rank(extension: &str) -> Option<usize> {
    EXTENSIONS.iter().position(|&name| name == extension)
}

fn compiled_simd() -> &'static str {
    if cfg!(target_feature = "avx512f") {
        "avx512f"
    } else if cfg!(target_feature = "avx2") {
        "avx2"
    } else if cfg!(target_feature = "neon") {
        "neon"
    } else if cfg!(target_feature = "sse4.1") {
        "sse4_1"
    } else {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(host_simd: &'static str, compiled_simd: &'static str) -> Platform {
        Platform {
            arch: "x86_64",
            host_simd,
            compiled_simd,
            rustc_channel: "stable",
        }
    }

    #[test]
    fn test_best_extension() {
        assert!(platform("avx2", "avx2").uses_best_extension());
        assert!(!platform("avx512f", "avx2").uses_best_extension());
        assert!(!platform("avx2", "none").uses_best_extension());
        assert!(platform("unknown", "sse4_1").uses_best_extension());
        assert!(platform("none", "none").uses_best_extension());
    }

    #[test]
    fn test_current_is_populated() {
        let current = Platform::current();
        assert!(!current.host_simd.is_empty());
        assert!(!current.rustc_channel.is_empty());
        assert_eq!(current.arch, std::env::consts::ARCH);
    }
}
