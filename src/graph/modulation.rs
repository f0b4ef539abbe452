use crate::{
    dsp::modulate::{apply_modulation, block_average},
    graph::{
        lfo::LfoNode,
        node::{Generator, GraphNode, Modulatable, RenderCtx},
    },
    MAX_BLOCK_SIZE,
};

/*
Modulation Link
===============

Connects an LFO to one parameter on another node:

    value = base + block_average(lfo) × depth

Depth is in the parameter's own units. A gusting wind sweeps a 500 Hz
band-pass by ±300 Hz; a breathing chant adds ±0.15 to the master's unit
breath stage, which swells the whole chord by ±15% of the volume.

The link owns its LFO; the target is named by whatever parameter handle the
graph uses (`T`), and the node itself is passed in at render time. Links
render their LFO before the targeted layer renders, so each block's layers
see that block's modulation.

Stopping the LFO
----------------

Once the LFO stops, the link applies nothing more and the target keeps the
last modulated value it was given. This is expected: it is how a platform
audio graph behaves when an oscillator feeding an AudioParam is stopped.
*/

pub struct ModulationLink<T> {
    lfo: LfoNode,
    target: T,
    depth: f32,
    last_offset: f32,
    scratch: Vec<f32>, // Temp buffer for LFO output
}

/// Scale `lfo` by `depth` and aim it at `target`.
///
/// The LFO is started by whoever owns the link (the voice graph starts every
/// generator during build).
pub fn attach_modulation<T: Copy>(lfo: LfoNode, target: T, depth: f32) -> ModulationLink<T> {
    ModulationLink {
        lfo,
        target,
        depth,
        last_offset: 0.0,
        scratch: vec![0.0; MAX_BLOCK_SIZE],
    }
}

impl<T: Copy> ModulationLink<T> {
    pub fn target(&self) -> T {
        self.target
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn lfo(&self) -> &LfoNode {
        &self.lfo
    }

    pub fn lfo_mut(&mut self) -> &mut LfoNode {
        &mut self.lfo
    }

    /// Offset most recently applied to the target.
    pub fn last_offset(&self) -> f32 {
        self.last_offset
    }

    /// Render `frames` of the LFO and return `average × depth`, or `None`
    /// once the LFO has stopped.
    pub fn next_offset(&mut self, frames: usize, ctx: &RenderCtx) -> Option<f32> {
        if !self.lfo.is_running() {
            return None;
        }
        let len = frames.min(self.scratch.len());
        self.lfo.render_block(&mut self.scratch[..len], ctx);
        let offset = apply_modulation(0.0, block_average(&self.scratch[..len]), self.depth);
        self.last_offset = offset;
        Some(offset)
    }

    /// Advance the LFO one block and push the result into `node`.
    pub fn drive<M: Modulatable>(
        &mut self,
        node: &mut M,
        param: M::Param,
        frames: usize,
        ctx: &RenderCtx,
    ) {
        if let Some(offset) = self.next_offset(frames, ctx) {
            let base = node.get_param(param);
            node.apply_modulation(param, base, offset);
        }
    }
}
