use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Oscillator Waveforms
====================

The oscillator keeps a normalized phase in [0, 1) and advances it by
frequency / sample_rate every sample. Each waveform is a different mapping
from phase to amplitude:

  sine       sin(2π·phase)              pure tone, no overtones
  square     +1 for phase < 0.5, else -1 odd harmonics, hollow
  sawtooth   2·phase - 1                all harmonics, bright
  triangle   1 - 4·|phase - 0.5|        odd harmonics falling as 1/n²

Drones and chants use sine almost exclusively. The naive (non band-limited)
square/saw alias at high pitch, which is inaudible at the sub-1 kHz
frequencies these soundscapes use and harmless for LFOs.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn square() -> Self {
        Self::new(Waveform::Square)
    }

    pub fn sawtooth() -> Self {
        Self::new(Waveform::Sawtooth)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    #[inline]
    fn value_at(&self, phase: f32) -> f32 {
        match self.waveform {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }

    /// Fill `out` with the waveform at `frequency` Hz.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        let increment = frequency / sample_rate;
        for sample in out.iter_mut() {
            *sample = self.value_at(self.phase);
            self.phase += increment;
            self.phase -= self.phase.floor();
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = OscillatorBlock::sine();

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, frequency, sample_rate);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * frequency * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn all_waveforms_stay_in_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            let mut osc = OscillatorBlock::new(waveform);
            let mut buffer = vec![0.0f32; 4096];
            osc.render(&mut buffer, 997.0, 48_000.0);
            assert!(
                buffer.iter().all(|s| (-1.0..=1.0).contains(s)),
                "{waveform:?} left [-1, 1]"
            );
        }
    }

    #[test]
    fn phase_continues_across_blocks() {
        let mut split = OscillatorBlock::sine();
        let mut whole = OscillatorBlock::sine();

        let mut a = vec![0.0f32; 64];
        let mut b = vec![0.0f32; 64];
        split.render(&mut a, 220.0, 48_000.0);
        split.render(&mut b, 220.0, 48_000.0);

        let mut reference = vec![0.0f32; 128];
        whole.render(&mut reference, 220.0, 48_000.0);

        assert!((b[10] - reference[74]).abs() < 1e-5);
    }
}
