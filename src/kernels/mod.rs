//! Benchmark kernels
//!
//! Every kernel implements the same work twice, once on 4-wide lanes and
//! once with scalar loops, and can check that the two agree.

pub mod average;
pub mod mandelbrot;

use crate::error::{BenchError, Result};
use std::fmt;
use std::str::FromStr;

pub use average::Average;
pub use mandelbrot::Mandelbrot;

/// Value produced by one kernel invocation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelOutput {
    /// Floating-point accumulation result
    Mean(f64),
    /// Per-lane integer counts
    Counts([u32; 4]),
}

impl KernelOutput {
    /// Whether two outputs are equivalent.
    ///
    /// `Mean` values agree when their absolute difference is below
    /// `tolerance`; `Counts` must match exactly. Different variants never
    /// agree.
    pub fn agrees_with(&self, other: &KernelOutput, tolerance: f64) -> bool {
        match (self, other) {
            (KernelOutput::Mean(a), KernelOutput::Mean(b)) => (a - b).abs() < tolerance,
            (KernelOutput::Counts(a), KernelOutput::Counts(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for KernelOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelOutput::Mean(v) => write!(f, "{}", v),
            KernelOutput::Counts([a, b, c, d]) => write!(f, "[{},{},{},{}]", a, b, c, d),
        }
    }
}

/// A benchmark kernel: a SIMD and a scalar implementation of the same work
pub trait Kernel {
    /// Display name
    fn name(&self) -> &str;

    /// Number of outer repetitions the harness asks for when timing
    fn iterations(&self) -> u64;

    /// Sanity check run before timing
    fn init(&mut self) -> bool;

    /// Sanity check run after timing
    fn cleanup(&mut self) -> bool;

    /// Run the 4-lane implementation `n` times and return the last result
    fn run_simd(&self, n: u64) -> Result<KernelOutput>;

    /// Run the scalar implementation `n` times and return the last result
    fn run_scalar(&self, n: u64) -> Result<KernelOutput>;
}

/// Built-in kernel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum KernelKind {
    /// Mean of a constant sequence
    Average,
    /// Mandelbrot escape-iteration count
    Mandelbrot,
}

impl KernelKind {
    /// Every built-in kernel in registration order
    pub const ALL: [KernelKind; 2] = [KernelKind::Average, KernelKind::Mandelbrot];

    /// Build the default implementation of this kernel
    pub fn build(self) -> Box<dyn Kernel> {
        match self {
            KernelKind::Average => Box::new(Average::new()),
            KernelKind::Mandelbrot => Box::new(Mandelbrot::new()),
        }
    }

    /// Lower-case identifier used on the command line and in config files
    pub fn as_str(self) -> &'static str {
        match self {
            KernelKind::Average => "average",
            KernelKind::Mandelbrot => "mandelbrot",
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        KernelKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BenchError::UnknownKernel(s.to_string()))
    }
}
