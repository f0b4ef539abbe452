use crate::error::{EngineError, Result};

/// Context passed to graph nodes during rendering
///
/// Fixed for the lifetime of a graph: the rate and channel count come from
/// the audio context the graph was built for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub channels: usize,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn nyquist(&self) -> f32 {
        self.sample_rate * 0.5
    }

    /// Frames in a planar block of `len` samples.
    #[inline]
    pub fn frames_in(&self, len: usize) -> usize {
        len / self.channels.max(1)
    }
}

/// Trait for nodes that support parameter modulation
pub trait Modulatable: Send {
    type Param: Copy + Send;

    /// Base (unmodulated) value of `param`.
    fn get_param(&self, param: Self::Param) -> f32;

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32);
}

/// Core trait for audio processing graph nodes
///
/// `out` is planar: `ctx.channels` runs of equal length, channel 0 first.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Pending,
    Running,
    Stopped,
}

/// Start/stop bookkeeping shared by every generating node.
#[derive(Debug, Clone)]
pub struct Transport {
    state: PlayState,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            state: PlayState::Pending,
        }
    }
}

impl Transport {
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Pending → Running. A stopped node cannot be restarted.
    pub fn start(&mut self) {
        if self.state == PlayState::Pending {
            self.state = PlayState::Running;
        }
    }

    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            PlayState::Running => {
                self.state = PlayState::Stopped;
                Ok(())
            }
            PlayState::Pending | PlayState::Stopped => Err(EngineError::GeneratorNotRunning),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == PlayState::Running
    }
}

/// A node that produces signal on its own once started.
///
/// Generators render silence unless running.
pub trait Generator: GraphNode {
    fn transport(&self) -> &Transport;

    fn transport_mut(&mut self) -> &mut Transport;

    fn start(&mut self) {
        self.transport_mut().start();
    }

    /// Fails with [`EngineError::GeneratorNotRunning`] when the node was
    /// never started or has already been stopped.
    fn stop(&mut self) -> Result<()> {
        self.transport_mut().stop()
    }

    fn is_running(&self) -> bool {
        self.transport().is_running()
    }
}
