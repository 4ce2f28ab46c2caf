//! Average kernel: scalar and 4-lane paths agree and are independent of `n`

#[cfg(test)]
mod tests {
    use simd_bench::kernels::average::{average, simd_average, LENGTH, TOLERANCE, VALUE};
    use simd_bench::{Average, Kernel, KernelOutput};

    #[test]
    fn test_scalar_idempotent_in_n() {
        let first = average(1);
        for n in [2u64, 10, 100] {
            assert_eq!(average(n), first, "average({n}) drifted");
        }
        assert_eq!(first, VALUE);
    }

    #[test]
    fn test_simd_idempotent_in_n() {
        let first = simd_average(1);
        for n in [2u64, 10, 100] {
            assert_eq!(simd_average(n), first, "simd_average({n}) drifted");
        }
    }

    #[test]
    fn test_paths_agree_within_tolerance() {
        assert!((average(1) - simd_average(1)).abs() < TOLERANCE);
    }

    #[test]
    fn test_length_covers_whole_lanes() {
        assert_eq!(LENGTH % 4, 0);
    }

    #[test]
    fn test_kernel_outputs_agree() {
        let mut kernel = Average::new().with_iterations(3);
        assert!(kernel.init());

        let scalar = kernel.run_scalar(kernel.iterations()).unwrap();
        let simd = kernel.run_simd(kernel.iterations()).unwrap();
        assert_eq!(scalar, KernelOutput::Mean(VALUE));
        assert!(scalar.agrees_with(&simd, TOLERANCE));

        assert!(kernel.cleanup());
    }
}
