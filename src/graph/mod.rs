//! Running audio graphs built from presets.
//!
//! Graph nodes wrap the low-level DSP primitives with what a soundscape
//! needs: start/stop lifecycle, block-rate modulation and multi-channel
//! rendering. [`voice::VoiceGraph`] ties them together for one preset.

/// Master gain with click-free level ramps.
pub mod gain;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Connect LFOs to layer parameters.
pub mod modulation;
/// Core traits shared by all graph nodes.
pub mod node;
/// Looping playback of rendered noise buffers.
pub mod noise_source;
/// Fixed-pitch oscillator layers.
pub mod tone;
/// Preset realization, rendering and teardown.
pub mod voice;

pub use node::{Generator, GraphNode, Modulatable, RenderCtx};
pub use voice::{GraphBuilder, GraphId, GraphSummary, VoiceGraph};
