//! Built-in soundscapes and the layer vocabulary they are written in.
//!
//! A preset is plain data: an ordered list of layers. Nothing runs until a
//! [`VoiceGraph`](crate::graph::voice::VoiceGraph) is built from it.
//!
//! # Example
//!
//! ```ignore
//! use tranquil::preset::{self, FilterSpec, NoiseSpec, Preset, ToneSpec};
//!
//! let rain = preset::by_name("rain")?;
//!
//! let hum = Preset::new("hum")
//!     .layer(ToneSpec::sine(60.0).gain(0.1))
//!     .layer(NoiseSpec::pink().gain(0.05).filter(FilterSpec::lowpass(800.0)));
//! ```
//!
//! Modulation layers refer to other layers by their index in this list, so
//! reordering layers means updating the targets too.

mod chant;
mod drone;
mod ocean;
mod rain;
mod wind;

use std::f32::consts::FRAC_1_SQRT_2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{filter::FilterType, NoiseColor, Waveform},
    error::{EngineError, Result},
    graph::node::RenderCtx,
};

pub use chant::{chant, chant_with, ChantOptions};
pub use drone::ambient_drone;
pub use ocean::ocean;
pub use rain::rain;
pub use wind::wind;

/// Names accepted by [`by_name`], in display order.
pub const NAMES: [&str; 5] = ["ambient-drone", "rain", "chant", "ocean", "wind"];

/// Look up a built-in preset.
pub fn by_name(name: &str) -> Result<Preset> {
    match name {
        "ambient-drone" => Ok(ambient_drone()),
        "rain" => Ok(rain()),
        "chant" => Ok(chant()),
        "ocean" => Ok(ocean()),
        "wind" => Ok(wind()),
        other => Err(EngineError::UnknownPreset {
            name: other.to_string(),
        }),
    }
}

pub fn all() -> Vec<Preset> {
    vec![ambient_drone(), rain(), chant(), ocean(), wind()]
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub layers: Vec<LayerSpec>,
}

impl Preset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    pub fn layer(mut self, layer: impl Into<LayerSpec>) -> Self {
        self.layers.push(layer.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Check every layer against `ctx`. Modulation targets must point at a
    /// tone or noise layer (and at a filter that layer actually has).
    pub fn validate(&self, ctx: &RenderCtx) -> Result<()> {
        if self.layers.is_empty() {
            return Err(EngineError::config(format!(
                "preset '{}' has no layers",
                self.name
            )));
        }
        for (index, layer) in self.layers.iter().enumerate() {
            match layer {
                LayerSpec::Tone(tone) => tone.validate(ctx),
                LayerSpec::Noise(noise) => noise.validate(ctx),
                LayerSpec::Modulation(modulation) => modulation.validate(&self.layers, ctx),
            }
            .map_err(|err| match err {
                EngineError::Configuration { reason } => {
                    EngineError::config(format!("{} layer {index}: {reason}", self.name))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSpec {
    Tone(ToneSpec),
    Noise(NoiseSpec),
    Modulation(ModulationSpec),
}

impl LayerSpec {
    /// Filters declared on a tone or noise layer. Modulation layers have none.
    pub fn filters(&self) -> &[FilterSpec] {
        match self {
            LayerSpec::Tone(tone) => &tone.filters,
            LayerSpec::Noise(noise) => &noise.filters,
            LayerSpec::Modulation(_) => &[],
        }
    }

    pub fn is_modulation(&self) -> bool {
        matches!(self, LayerSpec::Modulation(_))
    }
}

impl From<ToneSpec> for LayerSpec {
    fn from(spec: ToneSpec) -> Self {
        LayerSpec::Tone(spec)
    }
}

impl From<NoiseSpec> for LayerSpec {
    fn from(spec: NoiseSpec) -> Self {
        LayerSpec::Noise(spec)
    }
}

impl From<ModulationSpec> for LayerSpec {
    fn from(spec: ModulationSpec) -> Self {
        LayerSpec::Modulation(spec)
    }
}

fn check_gain(gain: f32) -> Result<()> {
    if !gain.is_finite() || gain < 0.0 {
        return Err(EngineError::config(format!(
            "gain must be finite and non-negative, got {gain}"
        )));
    }
    Ok(())
}

/// One oscillator at a fixed pitch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub detune_cents: f32,
    pub gain: f32,
    pub filters: Vec<FilterSpec>,
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency_hz: 440.0,
            detune_cents: 0.0,
            gain: 1.0,
            filters: Vec::new(),
        }
    }
}

impl ToneSpec {
    pub fn new(waveform: Waveform, frequency_hz: f32) -> Self {
        Self {
            waveform,
            frequency_hz,
            ..Self::default()
        }
    }

    pub fn sine(frequency_hz: f32) -> Self {
        Self::new(Waveform::Sine, frequency_hz)
    }

    pub fn triangle(frequency_hz: f32) -> Self {
        Self::new(Waveform::Triangle, frequency_hz)
    }

    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    /// `frequency_hz · 2^(detune_cents / 1200)`
    pub fn effective_frequency(&self) -> f32 {
        self.frequency_hz * 2.0_f32.powf(self.detune_cents / 1200.0)
    }

    pub fn validate(&self, ctx: &RenderCtx) -> Result<()> {
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(EngineError::config(format!(
                "tone frequency must be positive, got {}",
                self.frequency_hz
            )));
        }
        if !self.detune_cents.is_finite() {
            return Err(EngineError::config("tone detune must be finite"));
        }
        let effective = self.effective_frequency();
        if effective >= ctx.nyquist() {
            return Err(EngineError::config(format!(
                "tone at {effective} Hz is above Nyquist ({} Hz)",
                ctx.nyquist()
            )));
        }
        check_gain(self.gain)?;
        self.filters.iter().try_for_each(|f| f.validate(ctx))
    }
}

/// A looped noise buffer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseSpec {
    pub color: NoiseColor,
    pub gain: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub filters: Vec<FilterSpec>,
}

impl NoiseSpec {
    pub fn new(color: NoiseColor) -> Self {
        Self {
            color,
            gain: 1.0,
            filters: Vec::new(),
        }
    }

    pub fn white() -> Self {
        Self::new(NoiseColor::White)
    }

    pub fn pink() -> Self {
        Self::new(NoiseColor::Pink)
    }

    pub fn brown() -> Self {
        Self::new(NoiseColor::Brown)
    }

    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn validate(&self, ctx: &RenderCtx) -> Result<()> {
        check_gain(self.gain)?;
        self.filters.iter().try_for_each(|f| f.validate(ctx))
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub kind: FilterType,
    pub cutoff_hz: f32,
    pub q: f32,
}

impl FilterSpec {
    pub fn new(kind: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self { kind, cutoff_hz, q }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, FRAC_1_SQRT_2)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, FRAC_1_SQRT_2)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz, 1.0)
    }

    pub fn q(mut self, q: f32) -> Self {
        self.q = q;
        self
    }

    pub fn validate(&self, ctx: &RenderCtx) -> Result<()> {
        if !self.cutoff_hz.is_finite() || self.cutoff_hz <= 0.0 || self.cutoff_hz >= ctx.nyquist() {
            return Err(EngineError::config(format!(
                "{} cutoff {} Hz outside (0, {})",
                self.kind.name(),
                self.cutoff_hz,
                ctx.nyquist()
            )));
        }
        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(EngineError::config(format!(
                "{} q must be positive, got {}",
                self.kind.name(),
                self.q
            )));
        }
        Ok(())
    }
}

/// Which parameter a modulation layer drives.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "param", rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModTarget {
    /// Gain of the layer at this index.
    LayerGain { layer: usize },
    /// Cutoff of the first `kind` filter in the layer's chain.
    FilterCutoff { layer: usize, kind: FilterType },
    /// The master level, relative to the session volume: depth 0.1 swings
    /// the output between 90% and 110% of the volume.
    MasterGain,
}

impl ModTarget {
    pub fn gain(layer: usize) -> Self {
        ModTarget::LayerGain { layer }
    }

    pub fn cutoff(layer: usize, kind: FilterType) -> Self {
        ModTarget::FilterCutoff { layer, kind }
    }

    pub fn master() -> Self {
        ModTarget::MasterGain
    }

    /// Targeted layer index; `None` for the master gain.
    pub fn layer(self) -> Option<usize> {
        match self {
            ModTarget::LayerGain { layer } | ModTarget::FilterCutoff { layer, .. } => Some(layer),
            ModTarget::MasterGain => None,
        }
    }
}

/// An LFO added onto another layer's parameter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationSpec {
    pub target: ModTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub waveform: Waveform,
    pub rate_hz: f32,
    pub depth: f32,
}

impl ModulationSpec {
    /// Sine LFO at `rate_hz`, swinging the target by ±`depth`.
    pub fn new(target: ModTarget, rate_hz: f32, depth: f32) -> Self {
        Self {
            target,
            waveform: Waveform::Sine,
            rate_hz,
            depth,
        }
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn validate(&self, layers: &[LayerSpec], ctx: &RenderCtx) -> Result<()> {
        if !self.rate_hz.is_finite() || self.rate_hz <= 0.0 || self.rate_hz >= ctx.nyquist() {
            return Err(EngineError::config(format!(
                "lfo rate {} Hz outside (0, {})",
                self.rate_hz,
                ctx.nyquist()
            )));
        }
        if !self.depth.is_finite() {
            return Err(EngineError::config("modulation depth must be finite"));
        }

        let Some(index) = self.target.layer() else {
            return Ok(());
        };
        let target = layers.get(index).ok_or_else(|| {
            EngineError::config(format!("modulation targets missing layer {index}"))
        })?;
        if target.is_modulation() {
            return Err(EngineError::config(format!(
                "modulation cannot target modulation layer {index}"
            )));
        }
        if let ModTarget::FilterCutoff { kind, .. } = self.target {
            if !target.filters().iter().any(|f| f.kind == kind) {
                return Err(EngineError::config(format!(
                    "layer {index} has no {} filter to modulate",
                    kind.name()
                )));
            }
        }
        Ok(())
    }
}
