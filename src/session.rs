//! Playback lifecycle for one soundscape.

/*
Playback Session
================

A session owns at most one audio context and the voice graph playing into
it. It has exactly two states:

    Idle ──start()──► Active ──stop()──► Idle

  start()       Idle: open a fresh context, build the preset's graph, set
                the master gain to the current volume, hand the graph to
                the context's render thread. Active: nothing.
  stop()        Active: dispose the graph, close the context. Idle: nothing.
  set_volume()  Store the clamped volume; when Active, ramp the master gain.
  is_active()   Pure query.

Control calls never wait for the render thread. Gain changes overwrite a
single slot the render thread reads every block, so the newest volume always
lands however many changes arrive in between. Disposal is posted to a
lock-free queue.

Failures
--------

  Configuration        the preset is invalid. The context that was opened
                       for it is closed again; the session stays Idle.
  PlatformUnavailable  no output could be opened. The session stays Idle
  (and Stream)         and the failure is logged once; later attempts log
                       quietly until a start succeeds.

Teardown never fails: errors from closing a context are logged and dropped.
Dropping an Active session stops it.
*/

use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    config::SessionConfig,
    error::{EngineError, Result},
    graph::{GraphBuilder, GraphId, GraphSummary},
    host::{
        renderer::{self, ControlHandle, GraphCommand},
        AudioContext, AudioHost, StreamInfo,
    },
    preset::Preset,
};

struct Active<C> {
    context: C,
    control: ControlHandle,
    info: StreamInfo,
    summary: GraphSummary,
}

pub struct PlaybackSession<H: AudioHost> {
    label: String,
    host: H,
    preset: Preset,
    config: SessionConfig,
    volume: f32,
    muted: bool,
    active: Option<Active<H::Context>>,
    unavailable_reported: bool,
    starts: u64,
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

impl<H: AudioHost> PlaybackSession<H> {
    /// Create an Idle session. Nothing is opened until [`start`](Self::start).
    pub fn new(label: impl Into<String>, host: H, preset: Preset, config: SessionConfig) -> Self {
        Self {
            label: label.into(),
            host,
            preset,
            volume: clamp_volume(config.volume),
            config,
            muted: false,
            active: None,
            unavailable_reported: false,
            starts: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Identity of the playing graph, when Active.
    pub fn graph_id(&self) -> Option<GraphId> {
        self.active.as_ref().map(|active| active.summary.id)
    }

    /// Shape of the playing graph as it was built.
    pub fn summary(&self) -> Option<&GraphSummary> {
        self.active.as_ref().map(|active| &active.summary)
    }

    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.active.as_ref().map(|active| active.info)
    }

    /// Level the master gain should sit at.
    fn effective_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.active.is_some() {
            debug!(session = %self.label, "start ignored, already active");
            return Ok(());
        }

        let mut context = match self.host.open() {
            Ok(context) => context,
            Err(err) => return Err(self.report_failure(err)),
        };
        let info = context.info();

        match self.launch(&mut context, info) {
            Ok((control, summary)) => {
                self.unavailable_reported = false;
                info!(
                    session = %self.label,
                    preset = self.preset.name(),
                    graph = %summary.id,
                    sample_rate = info.sample_rate,
                    channels = info.channels,
                    volume = self.volume,
                    "session started"
                );
                self.active = Some(Active {
                    context,
                    control,
                    info,
                    summary,
                });
                Ok(())
            }
            Err(err) => {
                if let Err(close_err) = context.close() {
                    debug!(session = %self.label, %close_err, "close after failed start");
                }
                Err(self.report_failure(err))
            }
        }
    }

    fn launch(
        &mut self,
        context: &mut H::Context,
        info: StreamInfo,
    ) -> Result<(ControlHandle, GraphSummary)> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.starts)),
            None => StdRng::from_entropy(),
        };
        self.starts += 1;

        let mut graph = GraphBuilder::new(info.render_ctx())
            .noise_seconds(self.config.noise_seconds)
            .loop_crossfade(self.config.loop_crossfade)
            .build(&self.preset, &mut rng)?;
        graph.master_mut().set(self.effective_gain());
        let summary = graph.summary();

        let (control, renderer) = renderer::channel(graph, self.config.command_capacity);
        context.play(renderer)?;
        Ok((control, summary))
    }

    /// Log platform failures once per streak; pass every error through.
    fn report_failure(&mut self, err: EngineError) -> EngineError {
        if err.is_platform() {
            if self.unavailable_reported {
                debug!(session = %self.label, %err, "audio still unavailable");
            } else {
                warn!(session = %self.label, %err, "audio unavailable, session stays idle");
                self.unavailable_reported = true;
            }
        } else {
            debug!(session = %self.label, %err, "session failed to start");
        }
        err
    }

    pub fn stop(&mut self) {
        let Some(mut active) = self.active.take() else {
            debug!(session = %self.label, "stop ignored, already idle");
            return;
        };

        active.control.send(GraphCommand::Dispose);
        if let Err(err) = active.context.close() {
            debug!(session = %self.label, %err, "error closing audio context ignored");
        }
        info!(session = %self.label, graph = %active.summary.id, "session stopped");
    }

    /// Clamp `volume` to [0, 1] (NaN counts as 0) and ramp to it if playing.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
        self.post_gain();
    }

    /// Silence output without forgetting the volume.
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            self.muted = muted;
            self.post_gain();
        }
    }

    /// Ramp the master gain to zero over `duration`. The session stays
    /// Active; call [`stop`](Self::stop) once the fade is over. A later
    /// `set_volume` or unmute brings the level back.
    pub fn fade_out(&mut self, duration: Duration) {
        if let Some(active) = self.active.as_mut() {
            let frames = active.info.frames_for(duration);
            active.control.ramp_gain(0.0, frames);
        }
    }

    fn post_gain(&mut self) {
        let target = self.effective_gain();
        let ramp = self.config.volume_ramp;
        if let Some(active) = self.active.as_mut() {
            let frames = active.info.frames_for(ramp);
            active.control.ramp_gain(target, frames);
        }
    }
}

impl<H: AudioHost> Drop for PlaybackSession<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{host::OfflineHost, preset};

    fn session(host: &OfflineHost) -> PlaybackSession<OfflineHost> {
        PlaybackSession::new(
            "drone",
            host.clone(),
            preset::ambient_drone(),
            SessionConfig::default().seed(1).noise_seconds(0.25),
        )
    }

    #[test]
    fn initial_volume_is_clamped() {
        let host = OfflineHost::new(48_000, 2);
        let session = PlaybackSession::new(
            "x",
            host,
            preset::rain(),
            SessionConfig::default().volume(3.0),
        );
        assert_eq!(session.volume(), 1.0);
        assert!(!session.is_active());
    }

    #[test]
    fn nan_volume_counts_as_zero() {
        let host = OfflineHost::new(48_000, 2);
        let mut session = session(&host);
        session.set_volume(f32::NAN);
        assert_eq!(session.volume(), 0.0);
    }

    #[test]
    fn master_gain_starts_at_volume() {
        let host = OfflineHost::new(48_000, 2);
        let mut session = session(&host);
        session.set_volume(0.3);
        session.start().unwrap();

        assert_eq!(host.with_latest_graph(|g| g.master_gain()), Some(0.3));
        assert_eq!(session.summary().map(|s| s.master_gain), Some(0.3));
    }

    #[test]
    fn starting_while_muted_starts_silent() {
        let host = OfflineHost::new(48_000, 2);
        let mut session = session(&host);
        session.set_muted(true);
        session.start().unwrap();
        assert_eq!(host.with_latest_graph(|g| g.master_gain()), Some(0.0));
        assert_eq!(session.volume(), 0.5);
    }

    #[test]
    fn seeded_sessions_start_differently_each_time() {
        let host = OfflineHost::new(48_000, 1);
        let mut session = session(&host);
        session.start().unwrap();
        let first = host.render(256).unwrap();
        session.stop();
        session.start().unwrap();
        let second = host.render(256).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn volume_burst_lands_on_the_last_value() {
        let host = OfflineHost::new(48_000, 2);
        let mut session = session(&host);
        session.start().unwrap();

        let burst = session.config().command_capacity + 10;
        for i in 0..burst {
            session.set_volume(if i % 2 == 0 { 0.1 } else { 0.2 });
        }
        session.set_volume(0.9);
        host.render(9_600);

        assert_eq!(session.volume(), 0.9);
        assert_eq!(host.with_latest_graph(|g| g.master_level()), Some(0.9));
    }
}
