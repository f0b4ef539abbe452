use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::warn;

use crate::graph::{GraphId, VoiceGraph};

/*
Control → Render
================

Two paths cross from the control thread to the render thread, and neither
blocks:

  master gain   one atomic slot holding the newest (target, frames) request.
                Writing replaces whatever the renderer has not picked up
                yet, so a burst of slider moves can never be lost or queue
                up behind each other: the renderer always lands on the
                last value asked for.
  commands      an SPSC ring for one-shot events (dispose). A full ring
                drops the command with a warning.

The renderer reads both at the start of every `process` call.
*/

/// One-shot events sent from the control thread to the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphCommand {
    /// Stop every generator; the graph renders silence afterwards.
    Dispose,
}

const EMPTY_SLOT: u64 = u64::MAX;

/// Latest gain request. Target bits in the high word, ramp frames in the low
/// word, so both are read in one load. A finite non-negative target never
/// has all bits set, which leaves `u64::MAX` free to mean "nothing pending".
#[derive(Debug)]
struct GainSlot(AtomicU64);

impl GainSlot {
    fn new() -> Self {
        Self(AtomicU64::new(EMPTY_SLOT))
    }

    fn store(&self, target: f32, frames: u32) {
        let packed = (u64::from(target.to_bits()) << 32) | u64::from(frames);
        self.0.store(packed, Ordering::Release);
    }

    fn take(&self) -> Option<(f32, u32)> {
        let packed = self.0.swap(EMPTY_SLOT, Ordering::Acquire);
        (packed != EMPTY_SLOT).then(|| (f32::from_bits((packed >> 32) as u32), packed as u32))
    }
}

/// Render-thread side: the graph plus what feeds it.
pub struct Renderer {
    graph: VoiceGraph,
    commands: Consumer<GraphCommand>,
    gain: Arc<GainSlot>,
}

impl Renderer {
    pub fn graph(&self) -> &VoiceGraph {
        &self.graph
    }

    pub fn channels(&self) -> usize {
        self.graph.ctx().channels
    }

    /// Apply pending commands and the newest gain request, then render
    /// interleaved frames into `data`.
    pub fn process(&mut self, data: &mut [f32]) {
        while let Ok(command) = self.commands.pop() {
            match command {
                GraphCommand::Dispose => self.graph.dispose(),
            }
        }
        if let Some((target, frames)) = self.gain.take() {
            self.graph.master_mut().ramp_to(target, frames);
        }
        self.graph.render_block(data);
    }
}

/// Control-thread side. Nothing here blocks.
pub struct ControlHandle {
    graph_id: GraphId,
    commands: Producer<GraphCommand>,
    gain: Arc<GainSlot>,
}

impl ControlHandle {
    pub fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    /// Ramp the master gain to `target` over `frames` frames. Replaces any
    /// request the renderer has not applied yet. Negative or non-finite
    /// targets count as 0.
    pub fn ramp_gain(&self, target: f32, frames: u32) {
        let target = if target.is_finite() { target.max(0.0) } else { 0.0 };
        self.gain.store(target, frames);
    }

    /// Queue `command`. Returns false (and logs) if the queue is full.
    pub fn send(&mut self, command: GraphCommand) -> bool {
        match self.commands.push(command) {
            Ok(()) => true,
            Err(PushError::Full(command)) => {
                warn!(graph = %self.graph_id, ?command, "command queue full, dropping");
                false
            }
        }
    }
}

/// Split `graph` into a control handle and a renderer. Commands travel on a
/// ring of `capacity` entries.
pub fn channel(graph: VoiceGraph, capacity: usize) -> (ControlHandle, Renderer) {
    let (producer, consumer) = RingBuffer::new(capacity.max(1));
    let gain = Arc::new(GainSlot::new());
    let handle = ControlHandle {
        graph_id: graph.id(),
        commands: producer,
        gain: Arc::clone(&gain),
    };
    let renderer = Renderer {
        graph,
        commands: consumer,
        gain,
    };
    (handle, renderer)
}
