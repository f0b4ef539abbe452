//! Ocean preset - surf rolling in and out.
//!
//! # How It Works
//!
//! 1. Low-passed brown noise is the wave body
//! 2. A ~11 s gain LFO with a large depth makes each wave swell and recede
//! 3. A thin band of pink noise is the foam hiss, breathing slightly
//!
//! # Variations
//!
//! - Slower LFO (0.05 Hz) = long, lazy swells
//! - More foam gain = closer to the shore

use crate::preset::{FilterSpec, ModTarget, ModulationSpec, NoiseSpec, Preset};

/// Create the ocean preset.
pub fn ocean() -> Preset {
    Preset::new("ocean")
        .layer(
            NoiseSpec::brown()
                .gain(0.5)
                .filter(FilterSpec::lowpass(600.0))
                .filter(FilterSpec::highpass(40.0)),
        )
        .layer(ModulationSpec::new(ModTarget::gain(0), 0.09, 0.3))
        .layer(
            NoiseSpec::pink()
                .gain(0.06)
                .filter(FilterSpec::highpass(1_500.0))
                .filter(FilterSpec::lowpass(5_000.0)),
        )
        .layer(ModulationSpec::new(ModTarget::gain(2), 0.09, 0.05))
}
