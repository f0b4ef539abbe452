use crate::{
    dsp::NoiseBuffer,
    graph::node::{Generator, GraphNode, RenderCtx, Transport},
};

/// Loops a pre-rendered noise buffer.
///
/// Output channel `c` reads buffer channel `c % buffer channels`, so a mono
/// buffer feeds every output and a stereo buffer keeps its channels apart.
pub struct NoiseSource {
    buffer: NoiseBuffer,
    position: usize,
    transport: Transport,
}

impl NoiseSource {
    /// Created stopped; the voice graph starts it.
    pub fn new(buffer: NoiseBuffer) -> Self {
        Self {
            buffer,
            position: 0,
            transport: Transport::default(),
        }
    }

    pub fn buffer(&self) -> &NoiseBuffer {
        &self.buffer
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn read_channel(&self, channel: usize, out: &mut [f32]) {
        let samples = self.buffer.channel(channel % self.buffer.channel_count());
        let len = samples.len();
        let mut pos = self.position;
        let mut written = 0;

        while written < out.len() {
            let run = (len - pos).min(out.len() - written);
            out[written..written + run].copy_from_slice(&samples[pos..pos + run]);
            written += run;
            pos = (pos + run) % len;
        }
    }
}

impl GraphNode for NoiseSource {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if !self.is_running() || self.buffer.is_empty() {
            out.fill(0.0);
            return;
        }

        let frames = ctx.frames_in(out.len());
        if frames == 0 {
            return;
        }
        for (channel, plane) in out.chunks_exact_mut(frames).enumerate() {
            self.read_channel(channel, plane);
        }
        self.position = (self.position + frames) % self.buffer.len();
    }
}

impl Generator for NoiseSource {
    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }
}
