//! Mandelbrot kernel: lockstep lanes match independent scalar runs

#[cfg(test)]
mod tests {
    use simd_bench::kernels::mandelbrot::{
        mandel_x1, mandel_x4, mandel_x4_traced, MAX_ITERATIONS,
    };
    use simd_bench::simd::F32x4;
    use simd_bench::{Kernel, KernelOutput, Mandelbrot};

    fn scalar_lanes(re: [f32; 4], im: [f32; 4], cap: u32) -> [u32; 4] {
        let mut out = [0u32; 4];
        for lane in 0..4 {
            out[lane] = mandel_x1(re[lane], im[lane], cap);
        }
        out
    }

    // Sets of four points with different escape times
    const POINT_SETS: &[([f32; 4], [f32; 4])] = &[
        ([0.01, 0.01, 0.01, 0.01], [0.01, 0.01, 0.01, 0.01]),
        ([2.5, 1.0, 0.0, 0.01], [0.0, 0.0, 2.0, 0.01]),
        ([-0.75, 0.3, -1.5, 0.25], [0.1, 0.5, 0.0, 0.0]),
        ([0.4, -0.5, 0.36, -2.1], [0.3, 0.6, 0.1, 0.0]),
        ([-0.1, 0.28, -1.25, 0.45], [0.65, 0.53, 0.2, -0.35]),
    ];

    #[test]
    fn test_default_kernel_counts_are_cap() {
        let mut kernel = Mandelbrot::new();
        assert!(kernel.init());
        assert_eq!(kernel.run_scalar(1).unwrap(), KernelOutput::Counts([100, 100, 100, 100]));
        assert_eq!(kernel.run_simd(1).unwrap(), KernelOutput::Counts([100, 100, 100, 100]));
        assert!(kernel.cleanup());
    }

    #[test]
    fn test_lockstep_matches_independent_scalar_runs() {
        for &(re, im) in POINT_SETS {
            let lockstep = mandel_x4(F32x4::from_array(re), F32x4::from_array(im), MAX_ITERATIONS);
            let expected = scalar_lanes(re, im, MAX_ITERATIONS);
            let got = lockstep.to_array().map(|c| c as u32);
            assert_eq!(got, expected, "points re={re:?} im={im:?}");
        }
    }

    #[test]
    fn test_lockstep_steps_follow_slowest_lane() {
        for &(re, im) in POINT_SETS {
            let traced = mandel_x4_traced(F32x4::from_array(re), F32x4::from_array(im), MAX_ITERATIONS);
            let slowest = *traced.counts.iter().max().unwrap();
            assert_eq!(traced.steps, slowest, "points re={re:?} im={im:?}");
        }
    }

    #[test]
    fn test_lockstep_does_more_work_when_lanes_diverge() {
        let (re, im) = POINT_SETS[1];
        let traced = mandel_x4_traced(F32x4::from_array(re), F32x4::from_array(im), MAX_ITERATIONS);
        let scalar_work: u32 = scalar_lanes(re, im, MAX_ITERATIONS).iter().sum();
        assert!(traced.steps * 4 > scalar_work);
    }

    #[test]
    fn test_kernel_with_points_passes_checks() {
        for &(re, im) in POINT_SETS {
            let mut kernel = Mandelbrot::with_points(re, im).unwrap();
            assert!(kernel.init(), "init failed for re={re:?} im={im:?}");
            assert_eq!(
                kernel.run_simd(2).unwrap(),
                kernel.run_scalar(2).unwrap()
            );
            assert!(kernel.cleanup());
        }
    }

    #[test]
    fn test_lower_cap_applies_to_both_paths() {
        let kernel = Mandelbrot::new().with_max_iterations(10);
        assert_eq!(kernel.max_iterations(), 10);
        assert_eq!(kernel.scalar_counts(1), [10; 4]);
        assert_eq!(kernel.simd_counts(1), [10; 4]);
    }
}
