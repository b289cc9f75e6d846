use std::cmp::Ordering;
use std::env;
use std::process::Command;

// SIMD extensions reported to the crate, widest first
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    detected: bool,
}

impl CpuFeature {
    // Lowest number == widest registers
    fn priority(&self) -> usize {
        match self.name {
            "avx512f" => 0,
            "avx2" => 1,
            "neon" => 2,
            "sse4_1" => 3,
            _ => usize::MAX,
        }
    }

    fn features() -> Vec<CpuFeature> {
        ["sse4_1", "avx2", "avx512f", "neon"]
            .into_iter()
            .map(|name| CpuFeature {
                name,
                detected: false,
            })
            .collect()
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let contents = cpuinfo.to_lowercase();
            for feature in features.iter_mut() {
                feature.detected = match feature.name {
                    // aarch64 kernels list Advanced SIMD as "asimd"
                    "neon" => contents.contains("asimd") || contents.contains(" neon"),
                    name => contents.contains(name),
                };
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                match feature.name {
                    "avx512f" => feature.detected = contents.contains("hw.optional.avx512f: 1"),
                    "avx2" => feature.detected = contents.contains("hw.optional.avx2_0: 1"),
                    "sse4_1" => feature.detected = contents.contains("hw.optional.sse4_1: 1"),
                    "neon" => feature.detected = contents.contains("hw.optional.neon: 1"),
                    _ => {}
                }
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn compiler_channel() -> &'static str {
        let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
        let Ok(output) = Command::new(rustc).args(["--version", "--verbose"]).output() else {
            return "unknown";
        };

        let version_info = String::from_utf8_lossy(&output.stdout);
        if version_info.contains("nightly") {
            "nightly"
        } else if version_info.contains("beta") {
            "beta"
        } else {
            "stable"
        }
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        if let Some(detector) = Self::cpu_features_detectors()
            .into_iter()
            .find(|detector| detector.is_applicable())
        {
            detector.detect_features(features);
        }
    }

    fn best(features: &mut [CpuFeature]) -> &'static str {
        features.sort();
        features
            .iter()
            .find(|feature| feature.detected)
            .map_or("none", |feature| feature.name)
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let rustc_channel = PlatformDetector::compiler_channel();
    println!("cargo:rustc-env=MATHBENCH_RUSTC_CHANNEL={rustc_channel}");

    // The host CPU says nothing about the target when cross-compiling
    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();

    let host_simd = if host == target {
        let mut features = CpuFeature::features();
        PlatformDetector::detect_cpu_features(&mut features);
        PlatformDetector::best(&mut features)
    } else {
        "unknown"
    };
    println!("cargo:rustc-env=MATHBENCH_HOST_SIMD={host_simd}");
}
