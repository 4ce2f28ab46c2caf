//! Kernel equivalence test suite entry point
//!
//! This file declares all submodules in the kernel_equivalence/ directory.

#[path = "kernel_equivalence/average_tests.rs"]
mod average_tests;

#[path = "kernel_equivalence/mandelbrot_tests.rs"]
mod mandelbrot_tests;
