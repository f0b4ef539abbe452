use crate::{
    dsp::{oscillator::OscillatorBlock, Waveform},
    error::Result,
    graph::node::{Generator, GraphNode, RenderCtx, Transport},
    preset::ToneSpec,
};

/*
Tone Layer
==========

One periodic oscillator at a fixed pitch. The layer's gain and filters live
on the owning voice layer; this node only produces the raw waveform.

Detune
------

Detune is given in cents (1/100 of a semitone) and scales the pitch
multiplicatively:

    effective_hz = frequency_hz × 2^(cents / 1200)

    +1200 cents  →  one octave up
       +6 cents  →  136.1 Hz becomes ~136.57 Hz

Two layers a few cents apart beat against each other at their frequency
difference, which is where the slow "choir" movement of a chant comes from.
Pitch is fixed for the layer's lifetime.

Output is mono: the same samples are copied to every channel.
*/

pub struct ToneNode {
    osc: OscillatorBlock,
    frequency_hz: f32,
    detune_cents: f32,
    effective_hz: f32,
    transport: Transport,
}

impl ToneNode {
    fn new(waveform: Waveform, frequency_hz: f32, detune_cents: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            frequency_hz,
            detune_cents,
            effective_hz: frequency_hz * 2.0_f32.powf(detune_cents / 1200.0),
            transport: Transport::default(),
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    pub fn frequency_hz(&self) -> f32 {
        self.frequency_hz
    }

    pub fn detune_cents(&self) -> f32 {
        self.detune_cents
    }

    /// Frequency after detune.
    pub fn effective_hz(&self) -> f32 {
        self.effective_hz
    }
}

/// Build a tone generator from `spec` and start it.
///
/// Rejects non-positive or non-finite frequencies, pitches at or above
/// Nyquist and invalid gains with a configuration error.
pub fn create_tone_layer(spec: &ToneSpec, ctx: &RenderCtx) -> Result<ToneNode> {
    spec.validate(ctx)?;
    let mut node = ToneNode::new(spec.waveform, spec.frequency_hz, spec.detune_cents);
    node.start();
    Ok(node)
}

impl GraphNode for ToneNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if !self.is_running() {
            out.fill(0.0);
            return;
        }

        let frames = ctx.frames_in(out.len());
        let (first, rest) = out.split_at_mut(frames);
        self.osc.render(first, self.effective_hz, ctx.sample_rate);
        for channel in rest.chunks_exact_mut(frames.max(1)) {
            channel.copy_from_slice(first);
        }
    }
}

impl Generator for ToneNode {
    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }
}
