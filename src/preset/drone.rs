//! Ambient drone preset - a low, steady bed.
//!
//! # How It Works
//!
//! 1. Three sine drones at A2, E3 and A3 (root, fifth, octave)
//! 2. Quieter toward the top so the root dominates
//! 3. Pink noise through a 1 kHz low-pass adds air without hiss
//! 4. A very slow LFO (20 s cycle) on the root keeps it from sounding static
//!
//! # Variations
//!
//! - Swap the fifth for a minor third (130.81 Hz) = melancholic
//! - Raise the noise low-pass = brighter, more "room tone"

use crate::preset::{FilterSpec, ModTarget, ModulationSpec, NoiseSpec, Preset, ToneSpec};

/// Create the ambient drone preset.
pub fn ambient_drone() -> Preset {
    Preset::new("ambient-drone")
        .layer(ToneSpec::sine(110.0).gain(0.18))
        .layer(ToneSpec::sine(164.81).gain(0.12))
        .layer(ToneSpec::sine(220.0).gain(0.08))
        .layer(NoiseSpec::pink().gain(0.05).filter(FilterSpec::lowpass(1_000.0)))
        .layer(ModulationSpec::new(ModTarget::gain(0), 0.05, 0.05))
}
