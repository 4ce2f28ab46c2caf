//! Benchmark harness: registry, timing protocol and scoring
//!
//! For each registered kernel, in registration order: run `init`, time the
//! scalar implementation, time the SIMD implementation, run `cleanup`, then
//! report the timings and the speedup score through a [`ResultSink`].

use super::sink::ResultSink;
use super::timer::Stopwatch;
use crate::config::HarnessConfig;
use crate::error::{BenchError, CheckPhase, Result};
use crate::kernels::{Kernel, KernelKind};
use std::hint::black_box;
use std::time::Duration;

/// Timings and score for one kernel
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BenchmarkResult {
    /// Kernel name
    pub name: String,
    /// Outer repetitions passed to both implementations
    pub iterations: u64,
    /// Wall-clock time of the scalar call
    pub scalar_elapsed: Duration,
    /// Wall-clock time of the SIMD call
    pub simd_elapsed: Duration,
    /// `scalar_elapsed / simd_elapsed`
    pub score: f64,
}

impl BenchmarkResult {
    /// Build a result, deriving the score from the two timings
    pub fn new(
        name: impl Into<String>,
        iterations: u64,
        scalar_elapsed: Duration,
        simd_elapsed: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            iterations,
            scalar_elapsed,
            simd_elapsed,
            score: speedup(scalar_elapsed, simd_elapsed),
        }
    }

    /// Scalar time in milliseconds
    pub fn scalar_elapsed_ms(&self) -> f64 {
        self.scalar_elapsed.as_secs_f64() * 1000.0
    }

    /// SIMD time in milliseconds
    pub fn simd_elapsed_ms(&self) -> f64 {
        self.simd_elapsed.as_secs_f64() * 1000.0
    }

    /// Human-readable detail line
    pub fn summary(&self) -> String {
        format!(
            "{}: scalar {:.3} ms, simd {:.3} ms ({} iters)",
            self.name,
            self.scalar_elapsed_ms(),
            self.simd_elapsed_ms(),
            self.iterations,
        )
    }
}

/// Speedup of the SIMD path: `scalar / simd`. Infinite when the SIMD time
/// rounds to zero.
pub fn speedup(scalar: Duration, simd: Duration) -> f64 {
    if simd.as_nanos() > 0 {
        scalar.as_secs_f64() / simd.as_secs_f64()
    } else {
        f64::INFINITY
    }
}

/// A kernel that did not produce a clean result
#[derive(Debug)]
pub struct KernelFailure {
    /// Kernel name
    pub name: String,
    /// What went wrong
    pub error: BenchError,
}

/// Everything one `run_all` produced
#[derive(Debug, Default)]
pub struct RunReport {
    /// Completed kernels in registration order
    pub results: Vec<BenchmarkResult>,
    /// Failed checks and aborted kernels in the order they happened
    pub failures: Vec<KernelFailure>,
}

impl RunReport {
    /// Geometric mean of the per-kernel scores, `None` without results
    pub fn aggregate_score(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let log_sum: f64 = self.results.iter().map(|r| r.score.ln()).sum();
        Some((log_sum / self.results.len() as f64).exp())
    }

    /// True when every kernel completed and passed both checks
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Result for a kernel by name
    pub fn result(&self, name: &str) -> Option<&BenchmarkResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Formatted table of all results
    pub fn report(&self) -> String {
        let mut lines = Vec::new();
        let width = self
            .results
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(10)
            .max("Kernel".len());

        lines.push(format!(
            "{:<width$}  {:>10}  {:>14}  {:>14}  {:>8}",
            "Kernel",
            "Iters",
            "Scalar (ms)",
            "SIMD (ms)",
            "Score",
            width = width
        ));
        lines.push("-".repeat(width + 54));

        for r in &self.results {
            lines.push(format!(
                "{:<width$}  {:>10}  {:>14.3}  {:>14.3}  {:>7.2}x",
                r.name,
                r.iterations,
                r.scalar_elapsed_ms(),
                r.simd_elapsed_ms(),
                r.score,
                width = width
            ));
        }

        lines.push(String::new());
        if let Some(score) = self.aggregate_score() {
            lines.push(format!("Aggregate score: {:.2}", score));
        }
        for f in &self.failures {
            lines.push(format!("FAILED {}: {}", f.name, f.error));
        }
        lines.join("\n")
    }
}

/// Raw timings of one kernel's scalar and SIMD calls
struct Timings {
    scalar: Duration,
    simd: Duration,
}

/// Owns the kernel registry and runs it
pub struct Harness {
    config: HarnessConfig,
    kernels: Vec<Box<dyn Kernel>>,
}

impl Harness {
    /// Create an empty harness
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            kernels: Vec::new(),
        }
    }

    /// Create a harness with every kernel the configuration selects
    pub fn from_config(config: HarnessConfig) -> Self {
        let kinds = config.selected_kernels();
        let mut harness = Self::new(config);
        for kind in kinds {
            harness.register_kind(kind);
        }
        harness
    }

    /// Append a kernel to the registry
    pub fn register(&mut self, kernel: Box<dyn Kernel>) -> &mut Self {
        log::debug!("Registered kernel {}", kernel.name());
        self.kernels.push(kernel);
        self
    }

    /// Append the default implementation of a built-in kernel
    pub fn register_kind(&mut self, kind: KernelKind) -> &mut Self {
        self.register(kind.build())
    }

    /// Registered kernel names in order
    pub fn kernel_names(&self) -> Vec<&str> {
        self.kernels.iter().map(|k| k.name()).collect()
    }

    /// Number of registered kernels
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Whether no kernel is registered
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Harness configuration
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every registered kernel in order, reporting through `sink`
    pub fn run_all(&mut self, sink: &mut dyn ResultSink) -> RunReport {
        let verbose = self.config.verbose;
        let iterations_override = self.config.iterations;
        let mut report = RunReport::default();

        log::info!("Running {} kernel(s)", self.kernels.len());

        for kernel in self.kernels.iter_mut() {
            let kernel = kernel.as_mut();
            let name = kernel.name().to_string();
            let iterations = iterations_override.unwrap_or_else(|| kernel.iterations());

            let timings = match measure(kernel, iterations) {
                Ok(t) => t,
                Err(error) => {
                    if error.is_recoverable() {
                        log::warn!("{}", error);
                    } else {
                        log::error!("{}", error);
                    }
                    sink.notify_error(&error.to_string());
                    report.failures.push(KernelFailure { name, error });
                    continue;
                }
            };

            if !kernel.cleanup() {
                let error = BenchError::SanityCheck {
                    kernel: name.clone(),
                    phase: CheckPhase::Cleanup,
                };
                log::warn!("{}", error);
                sink.notify_error(&error.to_string());
                report.failures.push(KernelFailure {
                    name: name.clone(),
                    error,
                });
            }

            let result = BenchmarkResult::new(name, iterations, timings.scalar, timings.simd);
            log::debug!("{}", result.summary());
            if verbose {
                sink.notify_result(&result.summary());
            }
            sink.notify_score(&format!("{}: {:.2}", result.name, result.score));
            report.results.push(result);
        }

        if let Some(score) = report.aggregate_score() {
            sink.notify_score(&format!("Score: {:.2}", score));
        }
        report
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}

/// Init check, then one timed scalar call and one timed SIMD call
fn measure(kernel: &mut dyn Kernel, iterations: u64) -> Result<Timings> {
    if !kernel.init() {
        return Err(BenchError::SanityCheck {
            kernel: kernel.name().to_string(),
            phase: CheckPhase::Init,
        });
    }

    let (scalar_out, scalar) = Stopwatch::time(|| kernel.run_scalar(iterations))?;
    black_box(scalar_out?);

    let (simd_out, simd) = Stopwatch::time(|| kernel.run_simd(iterations))?;
    black_box(simd_out?);

    log::trace!(
        "{}: scalar {:?}, simd {:?} over {} iterations",
        kernel.name(),
        scalar,
        simd,
        iterations
    );
    Ok(Timings { scalar, simd })
}
