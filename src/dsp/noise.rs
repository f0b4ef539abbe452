use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/*
Colored Noise
=============

Noise beds are the backbone of ambient soundscapes: rain, surf and wind are
all filtered noise with a particular spectral tilt. The tilt is described by
a "color":

  white   Flat spectrum. Every frequency band carries equal power.
          Sound: hiss, static.

  pink    Power falls 3 dB per octave (1/f). Every OCTAVE carries equal
          power, which matches how we hear, so it sounds "even".
          Sound: steady rain, waterfall.

  brown   Power falls 6 dB per octave (1/f²). Most energy sits in the lows.
          Sound: distant surf, rumble, heavy wind.

All three start from the same white source; pink and brown apply a filter
recurrence to it.


Pink: Paul Kellet's Filter Bank
-------------------------------

Seven one-pole filters with staggered poles approximate the 1/f slope to
within ±0.05 dB above ~9 Hz at 44.1 kHz:

    b0 = 0.99886 b0 + w·0.0555179
    b1 = 0.99332 b1 + w·0.0750759
    b2 = 0.96900 b2 + w·0.1538520
    b3 = 0.86650 b3 + w·0.3104856
    b4 = 0.55000 b4 + w·0.5329522
    b5 = -0.7616 b5 - w·0.0168980
    pink = b0+b1+b2+b3+b4+b5+b6 + w·0.5362
    b6 = w·0.115926

The raw sum is loud (peaks of several units), so it is scaled by 0.05.


Brown: Leaky Integrator
-----------------------

A pure integrator of white noise random-walks off to infinity. Leaking a
little each sample keeps it bounded:

    out[i] = (out[i-1] + k·w[i]) / (1 + k),   k = 0.02

The leak removes a lot of amplitude, so the result is scaled by 3.5.


Looping
-------

Buffers are generated once and looped. A plain loop jumps from the last
sample straight back to the first, which clicks on the smooth brown bed.
`generate_seamless` renders a short overhang past the end of the buffer and
crossfades it into the head, so the sample after the last one is a natural
continuation of the same random process.
*/

/// Peak magnitude any generated sample may reach.
pub const HEADROOM: f32 = 1.5;

const PINK_SCALE: f32 = 0.05;
const BROWN_LEAK: f32 = 0.02;
const BROWN_SCALE: f32 = 3.5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

impl NoiseColor {
    pub fn name(self) -> &'static str {
        match self {
            NoiseColor::White => "white",
            NoiseColor::Pink => "pink",
            NoiseColor::Brown => "brown",
        }
    }
}

/// Per-channel filter state for one noise color.
#[derive(Debug, Clone, Copy, Default)]
struct ColorFilter {
    b: [f32; 7],
    last: f32,
}

impl ColorFilter {
    #[inline]
    fn next(&mut self, color: NoiseColor, white: f32) -> f32 {
        match color {
            NoiseColor::White => white,
            NoiseColor::Pink => {
                let b = &mut self.b;
                b[0] = 0.99886 * b[0] + white * 0.0555179;
                b[1] = 0.99332 * b[1] + white * 0.0750759;
                b[2] = 0.96900 * b[2] + white * 0.1538520;
                b[3] = 0.86650 * b[3] + white * 0.3104856;
                b[4] = 0.55000 * b[4] + white * 0.5329522;
                b[5] = -0.7616 * b[5] - white * 0.0168980;
                let pink = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362;
                b[6] = white * 0.115926;
                (pink * PINK_SCALE).clamp(-HEADROOM, HEADROOM)
            }
            NoiseColor::Brown => {
                self.last = (self.last + BROWN_LEAK * white) / (1.0 + BROWN_LEAK);
                (self.last * BROWN_SCALE).clamp(-HEADROOM, HEADROOM)
            }
        }
    }
}

/// Planar multi-channel sample buffer.
#[derive(Debug, Clone)]
pub struct NoiseBuffer {
    color: NoiseColor,
    sample_rate: f32,
    channels: Vec<Vec<f32>>,
}

impl NoiseBuffer {
    pub fn color(&self) -> NoiseColor {
        self.color
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Fold `overhang` trailing frames into the head with a linear crossfade
    /// and drop them. The new first frame is the old first overhang frame,
    /// so it directly continues the new last frame.
    fn fold_overhang(&mut self, overhang: usize) {
        if overhang == 0 {
            return;
        }
        for samples in &mut self.channels {
            let len = samples.len() - overhang;
            for i in 0..overhang {
                let t = i as f32 / overhang as f32;
                samples[i] = samples[len + i] * (1.0 - t) + samples[i] * t;
            }
            samples.truncate(len);
        }
    }
}

fn frames_for(duration_seconds: f32, sample_rate: f32) -> Result<usize> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(EngineError::config(format!(
            "noise duration must be positive, got {duration_seconds}"
        )));
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(EngineError::config(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }
    let frames = (duration_seconds * sample_rate).round() as usize;
    if frames == 0 {
        return Err(EngineError::config(format!(
            "{duration_seconds}s at {sample_rate} Hz is shorter than one frame"
        )));
    }
    Ok(frames)
}

fn render<R: Rng>(
    color: NoiseColor,
    frames: usize,
    sample_rate: f32,
    channels: usize,
    rng: &mut R,
) -> Result<NoiseBuffer> {
    if channels == 0 {
        return Err(EngineError::config("noise buffer needs at least one channel"));
    }

    // Channels are rendered one after another, so each gets its own run of
    // random draws and its own filter state.
    let channels: Vec<Vec<f32>> = (0..channels)
        .map(|_| {
            let mut filter = ColorFilter::default();
            (0..frames)
                .map(|_| filter.next(color, rng.gen_range(-1.0f32..=1.0)))
                .collect::<Vec<f32>>()
        })
        .collect();

    Ok(NoiseBuffer {
        color,
        sample_rate,
        channels,
    })
}

/// Generate `duration_seconds` of `color` noise.
///
/// Each channel holds `round(duration_seconds * sample_rate)` samples, all
/// finite and within [-1.5, 1.5]. Pure apart from the draws taken from `rng`.
pub fn generate<R: Rng>(
    color: NoiseColor,
    duration_seconds: f32,
    sample_rate: f32,
    channels: usize,
    rng: &mut R,
) -> Result<NoiseBuffer> {
    let frames = frames_for(duration_seconds, sample_rate)?;
    render(color, frames, sample_rate, channels, rng)
}

/// Like [`generate`], with `crossfade_seconds` of overhang folded into the
/// head so the buffer loops without a discontinuity. The length is the same
/// as [`generate`] would produce; the crossfade is capped at that length.
pub fn generate_seamless<R: Rng>(
    color: NoiseColor,
    duration_seconds: f32,
    sample_rate: f32,
    channels: usize,
    crossfade_seconds: f32,
    rng: &mut R,
) -> Result<NoiseBuffer> {
    let frames = frames_for(duration_seconds, sample_rate)?;
    let overhang = if crossfade_seconds.is_finite() && crossfade_seconds > 0.0 {
        ((crossfade_seconds * sample_rate).round() as usize).min(frames)
    } else {
        0
    };

    let mut buffer = render(color, frames + overhang, sample_rate, channels, rng)?;
    buffer.fold_overhang(overhang);
    Ok(buffer)
}
