//! Mandelbrot kernel: escape-iteration counts for four complex points
//!
//! The scalar path iterates each point on its own and stops as soon as it
//! escapes. The SIMD path iterates all four points in lockstep and only
//! stops once every lane has escaped; lanes that escaped early keep being
//! iterated (their counts frozen by the active mask) until the slowest lane
//! is done. That extra work is part of what this benchmark measures.
//!
//! Both paths use the same single-precision operations in the same order,
//! so per-lane counts are identical.

use super::{Kernel, KernelOutput};
use crate::error::{BenchError, Result};
use crate::numeric_fault;
use crate::simd::{F32x4, I32x4, LANES};
use std::hint::black_box;

/// Iteration cap per point
pub const MAX_ITERATIONS: u32 = 100;

/// Outer repetitions used when benchmarking
pub const ITERATIONS: u64 = 10_000;

/// Default point, inside the main cardioid (never escapes within the cap)
pub const DEFAULT_POINT: (f32, f32) = (0.01, 0.01);

/// Squared-magnitude bound of the escape test
const ESCAPE_RADIUS_SQ: f32 = 4.0;

/// Number of iterations of `z = z² + c` (starting at `z = c`) before
/// `|z|² > 4`, or `max_iterations` if the point never escapes.
pub fn mandel_x1(c_re: f32, c_im: f32, max_iterations: u32) -> u32 {
    let mut z_re = c_re;
    let mut z_im = c_im;
    let mut i = 0;
    while i < max_iterations {
        let z_re2 = z_re * z_re;
        let z_im2 = z_im * z_im;
        if z_re2 + z_im2 > ESCAPE_RADIUS_SQ {
            break;
        }

        let new_re = z_re2 - z_im2;
        let new_im = 2.0 * z_re * z_im;
        z_re = c_re + new_re;
        z_im = c_im + new_im;
        i += 1;
    }
    i
}

/// Outcome of a lockstep run over four lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lockstep {
    /// Escape count per lane
    pub counts: [u32; LANES],
    /// Lockstep iterations executed for all lanes together
    pub steps: u32,
}

/// [`mandel_x4`] that also reports how many lockstep iterations ran.
///
/// `steps` always equals the largest lane count: the loop only exits once
/// the last lane has escaped (or the cap is hit).
pub fn mandel_x4_traced(c_re4: F32x4, c_im4: F32x4, max_iterations: u32) -> Lockstep {
    let four4 = F32x4::splat(ESCAPE_RADIUS_SQ);
    let two4 = F32x4::splat(2.0);
    let one4 = I32x4::splat(1);

    let mut z_re4 = c_re4;
    let mut z_im4 = c_im4;
    let mut count4 = I32x4::splat(0);
    let mut steps = 0;

    while steps < max_iterations {
        let z_re24 = z_re4.mul(z_re4);
        let z_im24 = z_im4.mul(z_im4);

        let active = z_re24.add(z_im24).le(four4);
        // Every lane has escaped
        if active.none() {
            break;
        }

        let new_re4 = z_re24.sub(z_im24);
        let new_im4 = two4.mul(z_re4).mul(z_im4);
        z_re4 = c_re4.add(new_re4);
        z_im4 = c_im4.add(new_im4);
        count4 = count4.add(one4.and_mask(active));
        steps += 1;
    }

    let [a, b, c, d] = count4.to_array();
    Lockstep {
        counts: [a as u32, b as u32, c as u32, d as u32],
        steps,
    }
}

/// Escape counts for four points evaluated in lockstep
pub fn mandel_x4(c_re4: F32x4, c_im4: F32x4, max_iterations: u32) -> I32x4 {
    let [a, b, c, d] = mandel_x4_traced(c_re4, c_im4, max_iterations).counts;
    I32x4::from_array([a as i32, b as i32, c as i32, d as i32])
}

/// The Mandelbrot benchmark
#[derive(Debug, Clone)]
pub struct Mandelbrot {
    c_re: [f32; LANES],
    c_im: [f32; LANES],
    max_iterations: u32,
    iterations: u64,
}

impl Mandelbrot {
    /// Four copies of [`DEFAULT_POINT`], capped at [`MAX_ITERATIONS`]
    pub fn new() -> Self {
        let (re, im) = DEFAULT_POINT;
        Self {
            c_re: [re; LANES],
            c_im: [im; LANES],
            max_iterations: MAX_ITERATIONS,
            iterations: ITERATIONS,
        }
    }

    /// Evaluate four arbitrary points, one per lane
    pub fn with_points(c_re: [f32; LANES], c_im: [f32; LANES]) -> Result<Self> {
        if let Some(bad) = c_re.iter().chain(c_im.iter()).find(|v| !v.is_finite()) {
            return Err(BenchError::Config(format!(
                "Mandelbrot point component {} is not finite",
                bad
            )));
        }
        Ok(Self {
            c_re,
            c_im,
            ..Self::new()
        })
    }

    /// Override the per-point iteration cap
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Override the number of outer repetitions
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Per-point iteration cap
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Scalar counts, `n` repetitions, last result returned
    pub fn scalar_counts(&self, n: u64) -> [u32; LANES] {
        let mut result = [0u32; LANES];
        for _ in 0..n {
            for (lane, out) in result.iter_mut().enumerate() {
                *out = mandel_x1(self.c_re[lane], self.c_im[lane], self.max_iterations);
            }
            result = black_box(result);
        }
        result
    }

    /// Lockstep counts, `n` repetitions, last result returned
    pub fn simd_counts(&self, n: u64) -> [u32; LANES] {
        let c_re4 = F32x4::from_array(self.c_re);
        let c_im4 = F32x4::from_array(self.c_im);
        let mut result = [0u32; LANES];
        for _ in 0..n {
            result = black_box(mandel_x4_traced(c_re4, c_im4, self.max_iterations).counts);
        }
        result
    }

    fn sanity_check(&self) -> bool {
        let simd = self.simd_counts(1);
        let scalar = self.scalar_counts(1);
        if simd != scalar {
            log::warn!("Mandelbrot diverged: simd={:?} scalar={:?}", simd, scalar);
            return false;
        }
        true
    }

    fn checked(&self, counts: [u32; LANES]) -> Result<KernelOutput> {
        if let Some(c) = counts.iter().find(|&&c| c > self.max_iterations) {
            return Err(numeric_fault!(
                self.name(),
                "count {} exceeds cap {}",
                c,
                self.max_iterations
            ));
        }
        Ok(KernelOutput::Counts(counts))
    }
}

impl Default for Mandelbrot {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for Mandelbrot {
    fn name(&self) -> &str {
        "Mandelbrot"
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
        self.checked(self.simd_counts(n))
    }

    fn run_scalar(&self, n: u64) -> Result<KernelOutput> {
        self.checked(self.scalar_counts(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_point_hits_cap() {
        assert_eq!(mandel_x1(0.01, 0.01, MAX_ITERATIONS), 100);

        let k = Mandelbrot::new();
        assert_eq!(k.scalar_counts(1), [100; 4]);
        assert_eq!(k.simd_counts(1), [100; 4]);
    }

    #[test]
    fn test_known_escape_counts() {
        // |c|² > 4 escapes before the first update
        assert_eq!(mandel_x1(2.5, 0.0, MAX_ITERATIONS), 0);
        // z: 1 -> 2 -> 5; |2|² == 4 is still inside
        assert_eq!(mandel_x1(1.0, 0.0, MAX_ITERATIONS), 2);
        // z: 2i -> -4+2i
        assert_eq!(mandel_x1(0.0, 2.0, MAX_ITERATIONS), 1);
    }

    #[test]
    fn test_lockstep_runs_until_slowest_lane() {
        let c_re = F32x4::new(2.5, 1.0, 0.0, 0.01);
        let c_im = F32x4::new(0.0, 0.0, 2.0, 0.01);

        let out = mandel_x4_traced(c_re, c_im, MAX_ITERATIONS);
        assert_eq!(out.counts, [0, 2, 1, 100]);
        assert_eq!(out.steps, 100);

        let fast = mandel_x4_traced(
            F32x4::new(2.5, 1.0, 0.0, 1.0),
            F32x4::new(0.0, 0.0, 2.0, 0.0),
            MAX_ITERATIONS,
        );
        assert_eq!(fast.counts, [0, 2, 1, 2]);
        assert_eq!(fast.steps, 2);
    }

    #[test]
    fn test_mandel_x4_matches_traced_counts() {
        let c = F32x4::splat(0.01);
        assert_eq!(mandel_x4(c, c, MAX_ITERATIONS).to_array(), [100; 4]);
    }

    #[test]
    fn test_zero_repetitions() {
        let k = Mandelbrot::new();
        assert_eq!(k.scalar_counts(0), [0; 4]);
        assert_eq!(k.simd_counts(0), [0; 4]);
    }

    #[test]
    fn test_with_points_rejects_non_finite() {
        let err = Mandelbrot::with_points([0.0, f32::NAN, 0.0, 0.0], [0.0; 4]).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[test]
    fn test_kernel_checks_pass() {
        let mut k = Mandelbrot::new();
        assert_eq!(k.iterations(), ITERATIONS);
        assert!(k.init());
        assert_eq!(k.run_simd(2).unwrap(), KernelOutput::Counts([100; 4]));
        assert_eq!(k.run_scalar(2).unwrap(), KernelOutput::Counts([100; 4]));
        assert!(k.cleanup());
    }
}
