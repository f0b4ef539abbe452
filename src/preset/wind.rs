//! Wind preset - gusting band-pass noise.
//!
//! # How It Works
//!
//! 1. Pink noise through a fairly narrow band-pass is the whistle
//! 2. A slow LFO sweeps that band up and down (gusts change pitch)
//! 3. A triangle LFO on its gain makes gusts rise and fall linearly
//! 4. Low-passed brown noise underneath is the steady rumble

use crate::{
    dsp::{filter::FilterType, Waveform},
    preset::{FilterSpec, ModTarget, ModulationSpec, NoiseSpec, Preset},
};

/// Create the wind preset.
pub fn wind() -> Preset {
    Preset::new("wind")
        .layer(NoiseSpec::pink().gain(0.35).filter(FilterSpec::bandpass(500.0).q(1.5)))
        .layer(ModulationSpec::new(
            ModTarget::cutoff(0, FilterType::BandPass),
            0.06,
            300.0,
        ))
        .layer(
            ModulationSpec::new(ModTarget::gain(0), 0.13, 0.15).waveform(Waveform::Triangle),
        )
        .layer(NoiseSpec::brown().gain(0.25).filter(FilterSpec::lowpass(250.0)))
}
