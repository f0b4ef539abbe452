//! Low-level DSP primitives used by the voice graph.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so they can live directly inside graph layers. They stay focused on the
//! signal math; the graph layer handles wiring, gain and lifecycle.

/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Helpers for block-rate parameter modulation.
pub mod modulate;
/// Colored noise buffer generation.
pub mod noise;
/// Periodic oscillator waveforms.
pub mod oscillator;
/// Linear parameter ramps for click-free gain changes.
pub mod ramp;

pub use noise::{NoiseBuffer, NoiseColor};
pub use oscillator::Waveform;
