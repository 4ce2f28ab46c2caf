//! SIMD vs scalar micro-benchmarks
//!
//! Each kernel implements the same computation twice: once on explicit
//! 4-wide lanes ([`simd::F32x4`], [`simd::I32x4`]) and once with scalar
//! loops. The [`Harness`] checks that both agree, times them, and reports
//! the speedup (`scalar time / SIMD time`) as the kernel's score.
//!
//! ```no_run
//! use simd_bench::{ConsoleSink, Harness, HarnessConfig, KernelKind};
//!
//! let mut harness = Harness::new(HarnessConfig::new().with_verbose(true));
//! harness.register_kind(KernelKind::Average);
//! harness.register_kind(KernelKind::Mandelbrot);
//!
//! let report = harness.run_all(&mut ConsoleSink);
//! assert!(report.is_success());
//! ```

pub mod config;
pub mod error;
pub mod kernels;
pub mod runtime;
pub mod simd;

pub use config::HarnessConfig;
pub use error::{BenchError, CheckPhase, Result};
pub use kernels::{Average, Kernel, KernelKind, KernelOutput, Mandelbrot};
pub use runtime::{
    BenchmarkResult, ConsoleSink, FnSink, Harness, LogSink, MemorySink, ResultSink, RunReport,
};
pub use simd::{HostFeatures, LaneBackend};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
