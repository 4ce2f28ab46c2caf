//! Lane speedup demo
//!
//! Prints the host SIMD features and the lane backend in use, then runs the
//! built-in kernels at several iteration counts and prints the speedup of
//! the 4-lane versions over the scalar versions.
//!
//! # Running
//! ```bash
//! cargo run --example lane_speedup --release
//! ```
//!
//! Build with `--features portable-lanes` to see the same kernels on the
//! per-lane loop backend.

use simd_bench::kernels::mandelbrot::{mandel_x1, mandel_x4_traced, MAX_ITERATIONS};
use simd_bench::simd::F32x4;
use simd_bench::{FnSink, Harness, HarnessConfig, HostFeatures, KernelKind};

fn main() {
    println!("=== simd-bench lane speedup ===\n");
    println!("{}\n", HostFeatures::detect());

    for &iterations in &[100u64, 1_000, 10_000] {
        println!("Iterations: {}", iterations);

        let mut errors = Vec::new();
        let mut sink = FnSink::new(
            |_line: &str| {},
            |line: &str| errors.push(line.to_string()),
            |_line: &str| {},
        );

        let config = HarnessConfig::new()
            .with_iterations(iterations)
            .with_kernels(KernelKind::ALL.to_vec());
        let report = Harness::from_config(config).run_all(&mut sink);
        drop(sink);

        println!("{}", report.report());
        for e in &errors {
            println!("  error: {}", e);
        }
        println!();
    }

    // Lockstep cost: lanes escaping at different times still pay for the slowest one
    println!("=== Lockstep early exit ===");
    let re = [2.5f32, 1.0, 0.0, -0.75];
    let im = [0.0f32, 0.0, 2.0, 0.1];
    let lockstep = mandel_x4_traced(F32x4::from_array(re), F32x4::from_array(im), MAX_ITERATIONS);
    let scalar: Vec<u32> = re
        .iter()
        .zip(im.iter())
        .map(|(&r, &i)| mandel_x1(r, i, MAX_ITERATIONS))
        .collect();
    let scalar_work: u32 = scalar.iter().sum();

    println!("  scalar counts:   {:?} ({} point-iterations)", scalar, scalar_work);
    println!(
        "  lockstep counts: {:?} ({} steps x 4 lanes = {} lane-iterations)",
        lockstep.counts,
        lockstep.steps,
        lockstep.steps * 4
    );
    println!("\nDone.");
}
