//! Benchmarks for low-level DSP primitives.

mod filter;
mod noise;
mod oscillator;

pub use filter::bench_filter;
pub use noise::bench_noise;
pub use oscillator::bench_oscillator;
