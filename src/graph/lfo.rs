use crate::{
    dsp::{oscillator::OscillatorBlock, Waveform},
    graph::node::{Generator, GraphNode, RenderCtx, Transport},
};

/*
LFO (Low Frequency Oscillator)
==============================

An LFO is an oscillator that runs at sub-audio frequencies to move another
layer's parameter over time. Soundscapes use very slow ones:

  0.05 Hz   20 s cycle   drone root drifting in level
  0.1 Hz    10 s cycle   chant "breathing"
  0.06 Hz   ~17 s cycle  wind band-pass sweeping (gusts)

Output is bipolar, [-1.0, +1.0]; the modulation link scales it by depth.
The LFO never reaches the speakers, so it renders one mono run only and
ignores the channel count.


Available Waveforms
-------------------

  sine      Smooth, natural sweep (most common)
  triangle  Linear rise and fall, gusts that build evenly
  sawtooth  Gradual rise, instant reset
  square    Jumps between two values
*/

pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32, // Fixed rate in Hz
    transport: Transport,
}

impl LfoNode {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            frequency,
            transport: Transport::default(),
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(Waveform::Sine, frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(Waveform::Triangle, frequency)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if !self.is_running() {
            out.fill(0.0);
            return;
        }
        self.osc.render(out, self.frequency, ctx.sample_rate);
    }
}

impl Generator for LfoNode {
    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }
}
