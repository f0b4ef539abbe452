//! Audio contexts a session can play into.
//!
//! A session never reaches for a global audio device: it is handed an
//! [`AudioHost`] and asks it for a fresh [`AudioContext`] on every start.
//! [`CpalHost`] opens the platform's default output; [`OfflineHost`]
//! renders on demand and counts what it was asked to do.

mod device;
mod offline;
pub mod renderer;

use crate::{error::Result, graph::RenderCtx};

pub use device::{CpalContext, CpalHost};
pub use offline::{OfflineContext, OfflineHost};
pub use renderer::{ControlHandle, GraphCommand, Renderer};

/// Format chosen by the platform when a context is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u16,
}

impl StreamInfo {
    pub fn render_ctx(&self) -> RenderCtx {
        RenderCtx::new(self.sample_rate as f32, self.channels as usize)
    }

    /// Whole frames in `duration` at this rate.
    pub fn frames_for(&self, duration: std::time::Duration) -> u32 {
        (duration.as_secs_f64() * self.sample_rate as f64).round() as u32
    }
}

/// Factory for audio contexts.
pub trait AudioHost {
    type Context: AudioContext;

    /// Open a new context. Fails with `PlatformUnavailable` when there is no
    /// usable output.
    fn open(&self) -> Result<Self::Context>;
}

/// One open output. Owns whatever renders into it.
pub trait AudioContext {
    fn info(&self) -> StreamInfo;

    /// Start pulling audio from `renderer` on the context's render thread.
    fn play(&mut self, renderer: Renderer) -> Result<()>;

    /// Stop output and release the context, dropping the renderer.
    fn close(self) -> Result<()>;
}
