//! 4-lane SIMD layer with compile-time backend selection
//!
//! Provides the vector types the SIMD kernels are written against (SSE2 on
//! x86_64, NEON on aarch64, per-lane loop elsewhere) and a host feature
//! report for printing next to benchmark scores.

pub mod detection;
pub mod lanes;

pub use detection::HostFeatures;
pub use lanes::{F32x4, I32x4, LaneBackend, Mask4, LANES};
