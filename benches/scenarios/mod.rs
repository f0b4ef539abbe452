//! Scenario benchmarks: every built-in preset rendered as a full voice graph.

mod presets;

pub use presets::bench_presets;
