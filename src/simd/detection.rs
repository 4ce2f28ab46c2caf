//! Host SIMD feature report
//!
//! The lane types are compiled against a fixed backend, but the host may
//! support wider instruction sets. This report is printed alongside the
//! benchmark results so scores can be read in context.

use super::lanes::LaneBackend;
use std::fmt;

/// SIMD features detected on the running host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostFeatures {
    /// Target architecture (`std::env::consts::ARCH`)
    pub arch: String,
    /// Detected feature names, narrowest first
    pub features: Vec<String>,
    /// Backend the 4-lane kernels use in this build
    pub lane_backend: String,
}

impl HostFeatures {
    /// Detect features of the current host
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut features: Vec<&'static str> = Vec::new();

        #[cfg(target_arch = "x86_64")]
        {
            // SSE2 is part of the x86_64 baseline
            features.push("sse2");
            if is_x86_feature_detected!("sse4.1") {
                features.push("sse4.1");
            }
            if is_x86_feature_detected!("avx") {
                features.push("avx");
            }
            if is_x86_feature_detected!("avx2") {
                features.push("avx2");
            }
            if is_x86_feature_detected!("fma") {
                features.push("fma");
            }
            if is_x86_feature_detected!("avx512f") {
                features.push("avx512f");
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            // NEON is mandatory on aarch64
            features.push("neon");
        }

        #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
        {
            features.push("simd128");
        }

        let report = HostFeatures {
            arch: std::env::consts::ARCH.to_string(),
            features: features.into_iter().map(String::from).collect(),
            lane_backend: LaneBackend::current().to_string(),
        };
        log::debug!("Detected host SIMD features: {}", report);
        report
    }

    /// Whether the host reported any vector extension
    pub fn has_simd(&self) -> bool {
        !self.features.is_empty()
    }

    /// Whether a named feature was detected
    pub fn has(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f.eq_ignore_ascii_case(feature))
    }
}

impl fmt::Display for HostFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let features = if self.features.is_empty() {
            "none".to_string()
        } else {
            self.features.join(", ")
        };
        write!(
            f,
            "arch: {} | features: {} | 4-lane backend: {}",
            self.arch, features, self.lane_backend
        )
    }
}
