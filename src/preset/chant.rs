//! Chant preset - layered "OM" drone.
//!
//! A sung OM is not one pitch: the voice carries its overtones, several
//! singers never land on exactly the same frequency, and the chest adds a
//! low undertone. Each of those becomes its own sine layer.
//!
//! # How It Works
//!
//! 1. Fundamental at 136.1 Hz (the "OM" frequency) carries the body
//! 2. Harmonics 2 and 3 at 0.12/n add the vowel color
//! 3. A pair of unison voices detuned ±6 cents beats slowly against it
//! 4. Sub-octave and fifth fill out the chord underneath
//! 5. A 0.1 Hz LFO on the master gain swells the whole chord like breath
//! 6. Optional shimmer: a quiet triangle two octaves up
//!
//! # Variations
//!
//! - Wider detune (15+ cents) = bigger, looser choir
//! - Drop the fifth = darker, more austere
//! - Faster breathing (0.2 Hz) = more urgent
//! - Shimmer on = airy, "singing bowl" top

use crate::{
    dsp::Waveform,
    preset::{LayerSpec, ModTarget, ModulationSpec, Preset, ToneSpec},
};

/// Knobs for [`chant_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChantOptions {
    pub fundamental_hz: f32,
    /// Harmonic numbers to stack; `1` is the fundamental itself.
    pub harmonics: Vec<u32>,
    /// Cents for a ± detuned unison pair around the fundamental.
    pub detune_pair: Option<f32>,
    pub sub_octave: bool,
    pub fifth: bool,
    /// `(rate_hz, depth)` of the breathing LFO on the master gain. Depth is
    /// relative to the volume: 0.15 swings between 85% and 115%.
    pub breathing: Option<(f32, f32)>,
    pub shimmer: bool,
}

impl Default for ChantOptions {
    fn default() -> Self {
        Self {
            fundamental_hz: 136.1,
            harmonics: vec![1, 2, 3],
            detune_pair: Some(6.0),
            sub_octave: true,
            fifth: true,
            breathing: Some((0.1, 0.15)),
            shimmer: false,
        }
    }
}

/// Create the default chant.
pub fn chant() -> Preset {
    chant_with(&ChantOptions::default())
}

/// Create a chant from `options`.
pub fn chant_with(options: &ChantOptions) -> Preset {
    let f = options.fundamental_hz;
    let mut layers: Vec<LayerSpec> = Vec::new();

    for &harmonic in &options.harmonics {
        let gain = if harmonic == 1 {
            0.25
        } else {
            0.12 / harmonic as f32
        };
        layers.push(ToneSpec::sine(f * harmonic as f32).gain(gain).into());
    }

    if let Some(cents) = options.detune_pair {
        for detune in [-cents, cents] {
            layers.push(ToneSpec::sine(f).detune(detune).gain(0.08).into());
        }
    }

    if options.sub_octave {
        layers.push(ToneSpec::sine(f / 2.0).gain(0.15).into());
    }

    if options.fifth {
        layers.push(ToneSpec::sine(f * 1.5).gain(0.1).into());
    }

    if options.shimmer {
        layers.push(ToneSpec::triangle(f * 4.0).gain(0.02).into());
    }

    if let Some((rate, depth)) = options.breathing {
        layers.push(
            ModulationSpec::new(ModTarget::master(), rate, depth)
                .waveform(Waveform::Sine)
                .into(),
        );
    }

    Preset {
        name: "chant".to_string(),
        layers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone_frequencies(preset: &Preset) -> Vec<f32> {
        preset
            .layers
            .iter()
            .filter_map(|layer| match layer {
                LayerSpec::Tone(tone) => Some(tone.effective_frequency()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn default_chant_layout() {
        let preset = chant();
        // 3 harmonics + pair + sub + fifth + breathing
        assert_eq!(preset.layers.len(), 8);
        assert!(matches!(
            preset.layers.last(),
            Some(LayerSpec::Modulation(ModulationSpec {
                target: ModTarget::MasterGain,
                ..
            }))
        ));
    }

    #[test]
    fn exactly_one_tone_at_fundamental() {
        let frequencies = tone_frequencies(&chant());
        let at_fundamental = frequencies
            .iter()
            .filter(|&&f| (f - 136.1).abs() < 1e-3)
            .count();
        assert_eq!(at_fundamental, 1);
    }

    #[test]
    fn shimmer_adds_triangle_two_octaves_up() {
        let preset = chant_with(&ChantOptions {
            shimmer: true,
            ..ChantOptions::default()
        });
        let shimmer = preset.layers.iter().find_map(|layer| match layer {
            LayerSpec::Tone(tone) if tone.waveform == Waveform::Triangle => Some(tone),
            _ => None,
        });
        let shimmer = shimmer.expect("shimmer layer");
        assert!((shimmer.frequency_hz - 544.4).abs() < 1e-2);
    }

    #[test]
    fn breathing_survives_without_fundamental() {
        let preset = chant_with(&ChantOptions {
            harmonics: vec![2, 3],
            ..ChantOptions::default()
        });
        assert_eq!(preset.layers.iter().filter(|l| l.is_modulation()).count(), 1);
    }

    #[test]
    fn breathing_can_be_turned_off() {
        let preset = chant_with(&ChantOptions {
            breathing: None,
            ..ChantOptions::default()
        });
        assert!(!preset.layers.iter().any(LayerSpec::is_modulation));
    }
}
