//! Benchmark runtime: harness, timing and output sinks

pub mod benchmark;
pub mod sink;
pub mod timer;

pub use benchmark::{speedup, BenchmarkResult, Harness, KernelFailure, RunReport};
pub use sink::{Channel, ConsoleSink, FnSink, LogSink, MemorySink, ResultSink};
pub use timer::Stopwatch;
