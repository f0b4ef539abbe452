//! Rain preset - steady downpour with gusts.
//!
//! Rain on a roof is mostly low, dense noise. Brown noise has the right
//! weight; band-limiting it removes the sub rumble and the hiss so what is
//! left sits where rain actually lives.
//!
//! # How It Works
//!
//! 1. Brown noise through high-pass 120 Hz then low-pass 700 Hz is the body
//! 2. Pink noise through a band-pass is a "wind" layer on top
//! 3. One LFO sweeps the wind band-pass cutoff (gusting), another its level
//! 4. A 48 Hz sine underneath adds distant-thunder weight
//!
//! # Variations
//!
//! - Raise the low-pass toward 1.5 kHz = lighter rain on leaves
//! - Drop the sub tone = no thunder, just rain

use crate::{
    dsp::filter::FilterType,
    preset::{FilterSpec, ModTarget, ModulationSpec, NoiseSpec, Preset, ToneSpec},
};

/// Create the rain preset.
pub fn rain() -> Preset {
    Preset::new("rain")
        .layer(
            NoiseSpec::brown()
                .gain(0.6)
                .filter(FilterSpec::highpass(120.0))
                .filter(FilterSpec::lowpass(700.0)),
        )
        .layer(NoiseSpec::pink().gain(0.12).filter(FilterSpec::bandpass(900.0).q(0.9)))
        .layer(ModulationSpec::new(
            ModTarget::cutoff(1, FilterType::BandPass),
            0.07,
            400.0,
        ))
        .layer(ModulationSpec::new(ModTarget::gain(1), 0.11, 0.05))
        .layer(ToneSpec::sine(48.0).gain(0.05))
}
