//! Command-line runner for the SIMD vs scalar kernels.
//!
//! Usage:
//!   cargo run --release --bin simd-bench -- --verbose
//!   cargo run --release --bin simd-bench -- --kernel mandelbrot --iterations 500

use std::path::PathBuf;
use std::process;

use clap::Parser;
use simd_bench::{
    BenchError, ConsoleSink, Harness, HarnessConfig, HostFeatures, Kernel, KernelKind,
};

/// Run SIMD vs scalar micro-benchmarks and print their speedup scores.
#[derive(Parser)]
#[command(name = "simd-bench", version, about = "Time 4-lane SIMD kernels against their scalar versions")]
struct Cli {
    /// Print per-kernel timings, not only scores.
    #[arg(long, short, env = "SIMD_BENCH_VERBOSE")]
    verbose: bool,

    /// Kernel to run (repeatable). Defaults to every kernel.
    #[arg(long = "kernel", short = 'k', value_name = "NAME")]
    kernels: Vec<KernelKind>,

    /// Replace every kernel's iteration count.
    #[arg(long, short = 'n', env = "SIMD_BENCH_ITERATIONS")]
    iterations: Option<u64>,

    /// JSON config file; flags given on the command line take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List available kernels and the lane backend, then exit.
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn into_config(self) -> Result<HarnessConfig, BenchError> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };
        if self.verbose {
            config.verbose = true;
        }
        if !self.kernels.is_empty() {
            config.kernels = self.kernels;
        }
        if let Some(n) = self.iterations {
            config.iterations = Some(n);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.list {
        println!("{}", HostFeatures::detect());
        for kind in KernelKind::ALL {
            let kernel = kind.build();
            println!("  {:<12} {} iterations", kind, kernel.iterations());
        }
        return;
    }

    let config = match cli.into_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let verbose = config.verbose;
    let mut harness = Harness::from_config(config);

    if verbose {
        println!("simd-bench {} | {}", simd_bench::VERSION, HostFeatures::detect());
    }

    let report = harness.run_all(&mut ConsoleSink);

    if verbose {
        println!();
        println!("{}", report.report());
    }

    if !report.is_success() {
        process::exit(1);
    }
}
