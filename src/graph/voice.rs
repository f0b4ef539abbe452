use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use rand::Rng;
use tracing::debug;

use crate::{
    dsp::{
        filter::{FilterType, SVFilter},
        noise, NoiseColor,
    },
    error::{EngineError, Result},
    graph::{
        gain::MasterGain,
        lfo::LfoNode,
        modulation::{attach_modulation, ModulationLink},
        noise_source::NoiseSource,
        node::{Generator, GraphNode, Modulatable, RenderCtx},
        tone::{create_tone_layer, ToneNode},
    },
    preset::{FilterSpec, LayerSpec, ModTarget, NoiseSpec, Preset},
    MAX_BLOCK_SIZE,
};

/*
Voice Graph
===========

A voice graph is one preset made audible. Every tone and noise layer of the
preset becomes a layer node; every modulation layer becomes a link that
owns its LFO. All layers are summed into a single master gain:

    tone ──► [filters] ──► gain ─┐
    noise ─► [filters] ──► gain ─┼──► master gain ──► out
    tone ──► [filters] ──► gain ─┘
              ▲             ▲
              └── LFO links ┘

Build
-----

Building is all-or-nothing. The whole preset is validated before any node
exists, and if something still fails halfway (a noise buffer that cannot be
rendered) every node built so far is stopped before the error is returned.
LFOs are started first, then the sources, so there is no "armed but silent"
state: a graph that exists is running.

Filter chains are reordered high-pass → band-pass → low-pass (stable, so
two filters of the same kind keep their relative order). Each output
channel has its own filter state.

Render
------

Each block of at most MAX_BLOCK_SIZE frames:

  1. links advance their LFO and push gain / cutoff offsets into layers,
     or a breath scale into the master gain
  2. layers render planar audio, filter it and add it into the mix
  3. the master gain (possibly mid-ramp) scales the mix
  4. the mix is interleaved into the output

Teardown
--------

`dispose()` stops every generator and ignores the ones that are not
running. It is idempotent and runs on drop, so a graph can never be
discarded with generators still running.
*/

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a built graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph-{}", self.0)
    }
}

/// Signal generator behind a layer.
pub enum Source {
    Tone(ToneNode),
    Noise(NoiseSource),
}

impl Source {
    fn generator(&self) -> &dyn Generator {
        match self {
            Source::Tone(tone) => tone as &dyn Generator,
            Source::Noise(noise) => noise,
        }
    }

    fn generator_mut(&mut self) -> &mut dyn Generator {
        match self {
            Source::Tone(tone) => tone as &mut dyn Generator,
            Source::Noise(noise) => noise,
        }
    }
}

/// Layer parameters a modulation link can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerParam {
    Gain,
    /// Cutoff of the first filter of this kind in the chain.
    Cutoff(FilterType),
}

/// Resolved layer target: position in [`VoiceGraph::layers`] plus param.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerTarget {
    pub layer: usize,
    pub param: LayerParam,
}

/// What a modulation link drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    Layer(LayerTarget),
    /// Breathing on the master gain, relative to the volume.
    Master,
}

impl LinkTarget {
    /// Targeted layer position, if the link drives a layer.
    pub fn layer(self) -> Option<usize> {
        match self {
            LinkTarget::Layer(target) => Some(target.layer),
            LinkTarget::Master => None,
        }
    }
}

struct FilterStage {
    spec: FilterSpec,
    per_channel: Vec<SVFilter>,
}

impl FilterStage {
    fn new(spec: FilterSpec, channels: usize) -> Self {
        Self {
            spec,
            per_channel: (0..channels)
                .map(|_| SVFilter::new(spec.kind, spec.cutoff_hz, spec.q))
                .collect(),
        }
    }

    fn cutoff(&self) -> f32 {
        self.per_channel
            .first()
            .map_or(self.spec.cutoff_hz, |f| f.cutoff_hz)
    }
}

/// One generating layer: source → filter chain → gain.
pub struct LayerNode {
    preset_index: usize,
    source: Source,
    stages: Vec<FilterStage>,
    base_gain: f32,
    gain: f32,
    max_cutoff: f32,
}

impl LayerNode {
    fn new(
        preset_index: usize,
        source: Source,
        filters: &[FilterSpec],
        gain: f32,
        ctx: &RenderCtx,
    ) -> Self {
        let mut chain = filters.to_vec();
        chain.sort_by_key(|f| f.kind.chain_rank());

        Self {
            preset_index,
            source,
            stages: chain
                .into_iter()
                .map(|spec| FilterStage::new(spec, ctx.channels))
                .collect(),
            base_gain: gain,
            gain,
            max_cutoff: ctx.sample_rate * 0.49,
        }
    }

    /// Index of this layer in the preset it was built from.
    pub fn preset_index(&self) -> usize {
        self.preset_index
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Effective frequency, for tone layers.
    pub fn tone_frequency(&self) -> Option<f32> {
        match &self.source {
            Source::Tone(tone) => Some(tone.effective_hz()),
            Source::Noise(_) => None,
        }
    }

    pub fn noise_color(&self) -> Option<NoiseColor> {
        match &self.source {
            Source::Noise(noise) => Some(noise.buffer().color()),
            Source::Tone(_) => None,
        }
    }

    /// Filters in processing order, with their unmodulated cutoffs.
    pub fn filter_chain(&self) -> Vec<FilterSpec> {
        self.stages.iter().map(|stage| stage.spec).collect()
    }

    /// Current cutoff of the first `kind` filter.
    pub fn cutoff(&self, kind: FilterType) -> Option<f32> {
        self.stage(kind).map(FilterStage::cutoff)
    }

    /// Current (possibly modulated) gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn base_gain(&self) -> f32 {
        self.base_gain
    }

    pub fn is_running(&self) -> bool {
        self.source.generator().is_running()
    }

    fn stage(&self, kind: FilterType) -> Option<&FilterStage> {
        self.stages.iter().find(|stage| stage.spec.kind == kind)
    }

    fn stop(&mut self) -> Result<()> {
        self.source.generator_mut().stop()
    }

    /// Render into `scratch` and add the result into `mix`. Both planar.
    fn render_into(&mut self, scratch: &mut [f32], mix: &mut [f32], ctx: &RenderCtx) {
        let frames = ctx.frames_in(scratch.len());
        if frames == 0 {
            return;
        }

        match &mut self.source {
            Source::Tone(tone) => tone.render_block(scratch, ctx),
            Source::Noise(noise) => noise.render_block(scratch, ctx),
        }

        for stage in &mut self.stages {
            for (plane, filter) in scratch.chunks_exact_mut(frames).zip(&mut stage.per_channel) {
                filter.render(plane, ctx.sample_rate);
            }
        }

        let gain = self.gain;
        for (acc, &sample) in mix.iter_mut().zip(scratch.iter()) {
            *acc += sample * gain;
        }
    }
}

impl Modulatable for LayerNode {
    type Param = LayerParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            LayerParam::Gain => self.base_gain,
            LayerParam::Cutoff(kind) => self.stage(kind).map_or(0.0, |stage| stage.spec.cutoff_hz),
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let value = base + modulation;
        match param {
            LayerParam::Gain => self.gain = value.max(0.0),
            LayerParam::Cutoff(kind) => {
                let cutoff = value.clamp(20.0, self.max_cutoff);
                if let Some(stage) = self.stages.iter_mut().find(|s| s.spec.kind == kind) {
                    stage
                        .per_channel
                        .iter_mut()
                        .for_each(|filter| filter.set_cutoff(cutoff));
                }
            }
        }
    }
}

/// Snapshot of a graph's shape, for logging and the player UI.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSummary {
    pub id: GraphId,
    pub preset: String,
    pub layers: usize,
    pub modulations: usize,
    pub running_generators: usize,
    pub master_gain: f32,
}

/// Builds voice graphs for one render context.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    ctx: RenderCtx,
    noise_seconds: f32,
    loop_crossfade: f32,
}

impl GraphBuilder {
    pub fn new(ctx: RenderCtx) -> Self {
        Self {
            ctx,
            noise_seconds: 2.0,
            loop_crossfade: 0.05,
        }
    }

    /// Length of each looped noise buffer.
    pub fn noise_seconds(mut self, seconds: f32) -> Self {
        self.noise_seconds = seconds;
        self
    }

    /// Overhang folded into the head of noise buffers so they loop cleanly.
    /// Zero disables it.
    pub fn loop_crossfade(mut self, seconds: f32) -> Self {
        self.loop_crossfade = seconds;
        self
    }

    pub fn build<R: Rng>(&self, preset: &Preset, rng: &mut R) -> Result<VoiceGraph> {
        let ctx = self.ctx;
        if !ctx.sample_rate.is_finite() || ctx.sample_rate <= 0.0 || ctx.channels == 0 {
            return Err(EngineError::config(format!(
                "cannot render at {} Hz with {} channels",
                ctx.sample_rate, ctx.channels
            )));
        }
        preset.validate(&ctx)?;

        // Preset index → position among generating layers
        let mut positions = Vec::with_capacity(preset.layers.len());
        let mut next = 0;
        for layer in &preset.layers {
            if layer.is_modulation() {
                positions.push(None);
            } else {
                positions.push(Some(next));
                next += 1;
            }
        }

        let mut links = Vec::new();
        for layer in &preset.layers {
            if let LayerSpec::Modulation(spec) = layer {
                let target = resolve_target(spec.target, &positions)?;
                let mut lfo = LfoNode::new(spec.waveform, spec.rate_hz);
                lfo.start();
                links.push(attach_modulation(lfo, target, spec.depth));
            }
        }

        let mut layers: Vec<LayerNode> = Vec::with_capacity(next);
        for (index, layer) in preset.layers.iter().enumerate() {
            let node = match layer {
                LayerSpec::Tone(spec) => create_tone_layer(spec, &ctx).map(|tone| {
                    LayerNode::new(index, Source::Tone(tone), &spec.filters, spec.gain, &ctx)
                }),
                LayerSpec::Noise(spec) => self.noise_source(spec, rng).map(|noise| {
                    LayerNode::new(index, Source::Noise(noise), &spec.filters, spec.gain, &ctx)
                }),
                LayerSpec::Modulation(_) => continue,
            };

            match node {
                Ok(node) => layers.push(node),
                Err(err) => {
                    stop_quietly(&mut layers, &mut links);
                    return Err(err);
                }
            }
        }

        let id = GraphId::next();
        let channels = ctx.channels;
        debug!(
            graph = %id,
            preset = preset.name(),
            layers = layers.len(),
            modulations = links.len(),
            "voice graph built"
        );

        Ok(VoiceGraph {
            id,
            preset_name: preset.name.clone(),
            ctx,
            master: MasterGain::new(layers.len()),
            layers,
            links,
            scratch: vec![0.0; MAX_BLOCK_SIZE * channels],
            mix: vec![0.0; MAX_BLOCK_SIZE * channels],
            disposed: false,
        })
    }

    fn noise_source<R: Rng>(&self, spec: &NoiseSpec, rng: &mut R) -> Result<NoiseSource> {
        let buffer = noise::generate_seamless(
            spec.color,
            self.noise_seconds,
            self.ctx.sample_rate,
            self.ctx.channels,
            self.loop_crossfade,
            rng,
        )?;
        let mut source = NoiseSource::new(buffer);
        source.start();
        Ok(source)
    }
}

fn resolve_target(target: ModTarget, positions: &[Option<usize>]) -> Result<LinkTarget> {
    let (index, param) = match target {
        ModTarget::LayerGain { layer } => (layer, LayerParam::Gain),
        ModTarget::FilterCutoff { layer, kind } => (layer, LayerParam::Cutoff(kind)),
        ModTarget::MasterGain => return Ok(LinkTarget::Master),
    };
    let layer = positions
        .get(index)
        .copied()
        .flatten()
        .ok_or_else(|| EngineError::config(format!("no layer {index} to modulate")))?;
    Ok(LinkTarget::Layer(LayerTarget { layer, param }))
}

fn stop_quietly(layers: &mut [LayerNode], links: &mut [ModulationLink<LinkTarget>]) {
    for link in links.iter_mut() {
        if let Err(err) = link.lfo_mut().stop() {
            debug!(%err, "lfo stop ignored");
        }
    }
    for layer in layers.iter_mut() {
        if let Err(err) = layer.stop() {
            debug!(%err, layer = layer.preset_index, "layer stop ignored");
        }
    }
}

/// A running realization of a preset.
pub struct VoiceGraph {
    id: GraphId,
    preset_name: String,
    ctx: RenderCtx,
    layers: Vec<LayerNode>,
    links: Vec<ModulationLink<LinkTarget>>,
    master: MasterGain,
    scratch: Vec<f32>,
    mix: Vec<f32>,
    disposed: bool,
}

impl VoiceGraph {
    /// Build with the default noise settings. See [`GraphBuilder`].
    pub fn build<R: Rng>(preset: &Preset, ctx: RenderCtx, rng: &mut R) -> Result<Self> {
        GraphBuilder::new(ctx).build(preset, rng)
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn preset_name(&self) -> &str {
        &self.preset_name
    }

    pub fn ctx(&self) -> RenderCtx {
        self.ctx
    }

    /// Generating layers, in preset order.
    pub fn layers(&self) -> &[LayerNode] {
        &self.layers
    }

    pub fn links(&self) -> &[ModulationLink<LinkTarget>] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut [ModulationLink<LinkTarget>] {
        &mut self.links
    }

    /// Effective frequencies of every tone layer.
    pub fn tone_frequencies(&self) -> Vec<f32> {
        self.layers.iter().filter_map(LayerNode::tone_frequency).collect()
    }

    /// Sources plus LFOs.
    pub fn generator_count(&self) -> usize {
        self.layers.len() + self.links.len()
    }

    pub fn running_generators(&self) -> usize {
        self.layers.iter().filter(|layer| layer.is_running()).count()
            + self.links.iter().filter(|link| link.lfo().is_running()).count()
    }

    pub fn modulation_count(&self) -> usize {
        self.links.len()
    }

    /// Layers summed into the master gain.
    pub fn master_inputs(&self) -> usize {
        self.master.inputs()
    }

    /// Current master gain, breathing included.
    pub fn master_gain(&self) -> f32 {
        self.master.value()
    }

    /// Current volume level of the master, without breathing.
    pub fn master_level(&self) -> f32 {
        self.master.level()
    }

    pub fn master(&self) -> &MasterGain {
        &self.master
    }

    pub fn master_mut(&mut self) -> &mut MasterGain {
        &mut self.master
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            id: self.id,
            preset: self.preset_name.clone(),
            layers: self.layers.len(),
            modulations: self.links.len(),
            running_generators: self.running_generators(),
            master_gain: self.master.value(),
        }
    }

    /// Render interleaved frames into `out`. A disposed graph renders silence.
    pub fn render_block(&mut self, out: &mut [f32]) {
        if self.disposed {
            out.fill(0.0);
            return;
        }

        let ctx = self.ctx;
        let channels = ctx.channels;
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let frames = chunk.len() / channels;
            let len = frames * channels;

            for link in &mut self.links {
                match link.target() {
                    LinkTarget::Layer(target) => {
                        if let Some(layer) = self.layers.get_mut(target.layer) {
                            link.drive(layer, target.param, frames, &ctx);
                        }
                    }
                    LinkTarget::Master => link.drive(&mut self.master, (), frames, &ctx),
                }
            }

            let mix = &mut self.mix[..len];
            let scratch = &mut self.scratch[..len];
            mix.fill(0.0);
            for layer in &mut self.layers {
                layer.render_into(scratch, mix, &ctx);
            }

            self.master.process(mix, frames);

            for (frame, samples) in chunk.chunks_exact_mut(channels).enumerate() {
                for (channel, sample) in samples.iter_mut().enumerate() {
                    *sample = mix[channel * frames + frame];
                }
            }
            chunk[len..].fill(0.0);
        }
    }

    /// Stop every generator. Generators that are already stopped are
    /// skipped silently; calling this twice is fine.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        stop_quietly(&mut self.layers, &mut self.links);
        self.disposed = true;
        debug!(graph = %self.id, preset = %self.preset_name, "voice graph disposed");
    }
}

impl Drop for VoiceGraph {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{self, ModulationSpec, NoiseSpec, ToneSpec};
    use rand::{rngs::StdRng, SeedableRng};

    const CTX: RenderCtx = RenderCtx {
        sample_rate: 48_000.0,
        channels: 2,
    };

    fn build(preset: &Preset) -> Result<VoiceGraph> {
        let mut rng = StdRng::seed_from_u64(7);
        GraphBuilder::new(CTX).noise_seconds(0.5).build(preset, &mut rng)
    }

    #[test]
    fn drone_shape() {
        let graph = build(&preset::ambient_drone()).unwrap();
        assert_eq!(graph.layers().len(), 4);
        assert_eq!(graph.modulation_count(), 1);
        assert_eq!(graph.generator_count(), 5);
        assert_eq!(graph.running_generators(), 5);
        assert_eq!(graph.master_inputs(), 4);
        assert_eq!(graph.tone_frequencies(), vec![110.0, 164.81, 220.0]);
    }

    #[test]
    fn graph_ids_are_unique() {
        let a = build(&preset::rain()).unwrap();
        let b = build(&preset::rain()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn invalid_preset_builds_nothing() {
        let preset = Preset::new("broken")
            .layer(ToneSpec::sine(110.0))
            .layer(NoiseSpec::pink())
            .layer(ToneSpec::sine(0.0));
        assert!(matches!(build(&preset), Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn bad_noise_length_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = GraphBuilder::new(CTX)
            .noise_seconds(0.0)
            .build(&preset::rain(), &mut rng);
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn filters_are_reordered_highpass_first() {
        let preset = Preset::new("order").layer(
            NoiseSpec::brown()
                .filter(FilterSpec::lowpass(700.0))
                .filter(FilterSpec::bandpass(400.0))
                .filter(FilterSpec::highpass(120.0)),
        );
        let graph = build(&preset).unwrap();
        let kinds: Vec<FilterType> = graph.layers()[0]
            .filter_chain()
            .iter()
            .map(|f| f.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![FilterType::HighPass, FilterType::BandPass, FilterType::LowPass]
        );
    }

    #[test]
    fn modulation_targets_follow_preset_indices() {
        // Modulation layer sits between sources: preset index 2 is graph layer 1
        let preset = Preset::new("indices")
            .layer(ToneSpec::sine(100.0))
            .layer(ModulationSpec::new(ModTarget::gain(2), 0.2, 0.1))
            .layer(NoiseSpec::pink().filter(FilterSpec::bandpass(800.0)));
        let graph = build(&preset).unwrap();
        assert_eq!(
            graph.links()[0].target(),
            LinkTarget::Layer(LayerTarget {
                layer: 1,
                param: LayerParam::Gain
            })
        );
        assert_eq!(graph.layers()[1].preset_index(), 2);
    }

    #[test]
    fn render_is_finite_and_audible() {
        let mut graph = build(&preset::rain()).unwrap();
        let mut out = vec![0.0f32; 4800 * 2];
        graph.render_block(&mut out);

        assert!(out.iter().all(|s| s.is_finite()));
        let peak = out.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak > 0.001, "rain rendered silence");
    }

    #[test]
    fn master_gain_scales_output() {
        let mut loud = build(&preset::ambient_drone()).unwrap();
        let mut quiet = build(&preset::ambient_drone()).unwrap();
        quiet.master_mut().set(0.0);

        let mut a = vec![0.0f32; 1024];
        let mut b = vec![0.0f32; 1024];
        loud.render_block(&mut a);
        quiet.render_block(&mut b);

        assert!(a.iter().any(|s| s.abs() > 0.01));
        assert!(b.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn cutoff_modulation_stays_clamped() {
        let preset = Preset::new("sweep")
            .layer(NoiseSpec::pink().filter(FilterSpec::bandpass(500.0)))
            .layer(ModulationSpec::new(
                ModTarget::cutoff(0, FilterType::BandPass),
                5.0,
                100_000.0,
            ));
        let mut graph = build(&preset).unwrap();
        let mut out = vec![0.0f32; 512 * 2];
        for _ in 0..40 {
            graph.render_block(&mut out);
            let cutoff = graph.layers()[0].cutoff(FilterType::BandPass).unwrap();
            assert!((20.0..=48_000.0 * 0.49).contains(&cutoff), "cutoff {cutoff}");
            assert!(out.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn stopped_lfo_freezes_layer_gain() {
        let preset = Preset::new("breath")
            .layer(ToneSpec::sine(136.1).gain(0.25))
            .layer(ModulationSpec::new(ModTarget::gain(0), 2.0, 0.1));
        let mut graph = build(&preset).unwrap();
        let mut out = vec![0.0f32; 1024 * 2];
        graph.render_block(&mut out);

        graph.links_mut()[0].lfo_mut().stop().unwrap();
        let frozen = graph.layers()[0].gain();
        for _ in 0..10 {
            graph.render_block(&mut out);
        }
        assert_eq!(graph.layers()[0].gain(), frozen);
        assert_eq!(graph.layers()[0].base_gain(), 0.25);
    }

    #[test]
    fn dispose_is_idempotent_and_tolerates_stopped_nodes() {
        let mut graph = build(&preset::wind()).unwrap();
        graph.links_mut()[0].lfo_mut().stop().unwrap();

        graph.dispose();
        assert!(graph.is_disposed());
        assert_eq!(graph.running_generators(), 0);
        graph.dispose();

        let mut out = vec![1.0f32; 64];
        graph.render_block(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn odd_block_sizes_render() {
        let mut graph = build(&preset::ocean()).unwrap();
        // Longer than one internal block and not a multiple of it
        let mut out = vec![0.0f32; (MAX_BLOCK_SIZE + 37) * 2];
        graph.render_block(&mut out);
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn master_breathing_moves_around_the_volume() {
        let preset = Preset::new("breathing")
            .layer(ToneSpec::sine(136.1).gain(0.25))
            .layer(ModulationSpec::new(ModTarget::master(), 2.0, 0.2));
        let mut graph = build(&preset).unwrap();
        graph.master_mut().set(0.5);
        assert_eq!(graph.links()[0].target(), LinkTarget::Master);

        // 2 Hz over 200 blocks of 256 frames covers two cycles
        let mut out = vec![0.0f32; 256 * 2];
        let (mut low, mut high) = (f32::MAX, f32::MIN);
        for _ in 0..200 {
            graph.render_block(&mut out);
            let gain = graph.master_gain();
            low = low.min(gain);
            high = high.max(gain);
            assert_eq!(graph.master_level(), 0.5);
        }
        assert!(low < 0.45 && high > 0.55, "gain swung {low}..{high}");
        assert!(low >= 0.5 * 0.8 - 1e-4 && high <= 0.5 * 1.2 + 1e-4);
    }

    #[test]
    fn muted_master_stays_silent_while_breathing() {
        let preset = Preset::new("breathing")
            .layer(ToneSpec::sine(136.1).gain(0.25))
            .layer(ModulationSpec::new(ModTarget::master(), 2.0, 0.5));
        let mut graph = build(&preset).unwrap();
        graph.master_mut().set(0.0);

        let mut out = vec![1.0f32; 512 * 2];
        for _ in 0..10 {
            graph.render_block(&mut out);
            assert!(out.iter().all(|&s| s == 0.0));
        }
    }
}
