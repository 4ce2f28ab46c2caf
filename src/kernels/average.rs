//! Average kernel: mean of a constant-valued sequence
//!
//! The scalar path accumulates in `f64`; the SIMD path accumulates four
//! `f32` lanes and sums them at the end. The sanity check tolerates the
//! precision difference between the two accumulators.

use super::{Kernel, KernelOutput};
use crate::error::Result;
use crate::numeric_fault;
use crate::simd::{F32x4, LANES};
use std::hint::black_box;

/// Number of elements averaged per outer iteration
pub const LENGTH: usize = 10_000;

/// Value of every element
pub const VALUE: f64 = 0.5;

/// Maximum absolute difference tolerated between the two paths
pub const TOLERANCE: f64 = 1e-4;

/// Outer repetitions used when benchmarking
pub const ITERATIONS: u64 = 1000;

// The vector loop has no remainder handling.
const _: () = assert!(LENGTH % LANES == 0);

/// Scalar mean: `n` passes over the sequence, each starting from zero
pub fn average(n: u64) -> f64 {
    let value = black_box(VALUE);
    let mut sum = 0.0f64;
    for _ in 0..n {
        sum = 0.0;
        for _ in 0..LENGTH {
            sum += value;
        }
        sum = black_box(sum);
    }
    sum / LENGTH as f64
}

/// 4-lane mean: `n` passes adding a splatted vector `LENGTH / 4` times
pub fn simd_average(n: u64) -> f64 {
    let b = F32x4::splat(black_box(VALUE as f32));
    let mut sum4 = F32x4::zero();
    for _ in 0..n {
        sum4 = F32x4::zero();
        for _ in 0..LENGTH / LANES {
            sum4 = sum4.add(b);
        }
        sum4 = black_box(sum4);
    }
    sum4.horizontal_sum() / LENGTH as f64
}

/// The Average benchmark
#[derive(Debug, Clone)]
pub struct Average {
    iterations: u64,
}

impl Average {
    /// Create the kernel with its default iteration count
    pub fn new() -> Self {
        Self {
            iterations: ITERATIONS,
        }
    }

    /// Override the number of outer repetitions
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    fn sanity_check(&self) -> bool {
        let scalar = average(1);
        let simd = simd_average(1);
        let ok = (scalar - simd).abs() < TOLERANCE;
        if !ok {
            log::warn!("Average diverged: scalar={} simd={}", scalar, simd);
        }
        ok
    }

    fn checked(&self, value: f64) -> Result<KernelOutput> {
        if !value.is_finite() {
            return Err(numeric_fault!(self.name(), "non-finite mean {}", value));
        }
        Ok(KernelOutput::Mean(value))
    }
}

impl Default for Average {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for Average {
    fn name(&self) -> &str {
        "Average"
    }

    fn iterations(&self) -> u64 {
        self.iterations
    }

    fn init(&mut self) -> bool {
        self.sanity_check()
    }

    fn cleanup(&mut self) -> bool {
        self.sanity_check()
    }

    fn run_simd(&self, n: u64) -> Result<KernelOutput> {
        self.checked(simd_average(n))
    }

    fn run_scalar(&self, n: u64) -> Result<KernelOutput> {
        self.checked(average(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_is_value_for_any_n() {
        for n in [1, 2, 7, 50] {
            assert_eq!(average(n), VALUE, "n = {n}");
        }
    }

    #[test]
    fn test_simd_within_tolerance() {
        for n in [1, 3] {
            assert!((average(n) - simd_average(n)).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_zero_repetitions() {
        assert_eq!(average(0), 0.0);
        assert_eq!(simd_average(0), 0.0);
    }

    #[test]
    fn test_kernel_checks_pass() {
        let mut k = Average::new();
        assert_eq!(k.iterations(), ITERATIONS);
        assert!(k.init());
        assert!(k.cleanup());

        let simd = k.run_simd(1).unwrap();
        let scalar = k.run_scalar(1).unwrap();
        assert!(simd.agrees_with(&scalar, TOLERANCE));
    }

    #[test]
    fn test_with_iterations() {
        assert_eq!(Average::new().with_iterations(5).iterations(), 5);
    }
}
