//! Player adapter: one sound category, one session.
//!
//! Turns the interactions a sound toggle offers (on/off, a volume slider,
//! mute) into session calls. Dropping the player stops its session, so a
//! player that goes away never leaves a context running.
//!
//! A deck of players can share a master level: the session plays at
//! `slider × master`, while [`Player::volume`] keeps reporting the slider.

use std::time::Duration;

use crate::{
    config::SessionConfig,
    error::Result,
    host::AudioHost,
    preset::{self, Preset},
    session::PlaybackSession,
};

pub struct Player<H: AudioHost> {
    session: PlaybackSession<H>,
    /// Slider position in [0, 1].
    level: f32,
    /// Deck-wide scale in [0, 1].
    master: f32,
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl<H: AudioHost> Player<H> {
    pub fn new(label: impl Into<String>, host: H, preset: Preset, config: SessionConfig) -> Self {
        let session = PlaybackSession::new(label, host, preset, config);
        Self {
            level: session.volume(),
            master: 1.0,
            session,
        }
    }

    /// Player for a built-in preset, labelled with its name.
    pub fn from_preset_name(name: &str, host: H, config: SessionConfig) -> Result<Self> {
        let preset = preset::by_name(name)?;
        Ok(Self::new(name, host, preset, config))
    }

    pub fn label(&self) -> &str {
        self.session.label()
    }

    /// Start if idle, stop if playing. Returns whether it is now playing.
    ///
    /// A failed start leaves the player off and returns the error; the
    /// next toggle simply tries again.
    pub fn toggle(&mut self) -> Result<bool> {
        if self.session.is_active() {
            self.session.stop();
            Ok(false)
        } else {
            self.session.start()?;
            Ok(true)
        }
    }

    pub fn start(&mut self) -> Result<()> {
        self.session.start()
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Slider position, before the master level.
    pub fn volume(&self) -> f32 {
        self.level
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.level = unit(volume);
        self.apply_level();
    }

    /// Move the volume by `delta` (slider step). Returns the clamped result.
    pub fn nudge_volume(&mut self, delta: f32) -> f32 {
        self.set_volume(self.level + delta);
        self.level
    }

    pub fn master(&self) -> f32 {
        self.master
    }

    /// Scale this player by a deck-wide level in [0, 1]. Zero works as a
    /// master mute that leaves the slider alone.
    pub fn set_master(&mut self, master: f32) {
        self.master = unit(master);
        self.apply_level();
    }

    fn apply_level(&mut self) {
        self.session.set_volume(self.level * self.master);
    }

    pub fn is_muted(&self) -> bool {
        self.session.is_muted()
    }

    /// Flip mute. Returns whether it is now muted.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.session.is_muted();
        self.session.set_muted(muted);
        muted
    }

    pub fn fade_out(&mut self, duration: Duration) {
        self.session.fade_out(duration);
    }

    pub fn session(&self) -> &PlaybackSession<H> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PlaybackSession<H> {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::EngineError, host::OfflineHost};

    fn config() -> SessionConfig {
        SessionConfig::default().seed(4).noise_seconds(0.25)
    }

    #[test]
    fn toggle_starts_and_stops() {
        let host = OfflineHost::new(48_000, 2);
        let mut player = Player::from_preset_name("rain", host.clone(), config()).unwrap();

        assert!(player.toggle().unwrap());
        assert!(player.is_active());
        assert!(!player.toggle().unwrap());
        assert!(!player.is_active());
        assert_eq!(host.contexts_opened(), 1);
        assert_eq!(host.live_contexts(), 0);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let host = OfflineHost::new(48_000, 2);
        assert!(matches!(
            Player::from_preset_name("thunder", host, config()),
            Err(EngineError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn failed_toggle_stays_off() {
        let host = OfflineHost::new(48_000, 2);
        host.set_available(false);
        let mut player = Player::from_preset_name("wind", host.clone(), config()).unwrap();

        assert!(player.toggle().is_err());
        assert!(!player.is_active());

        host.set_available(true);
        assert!(player.toggle().unwrap());
    }

    #[test]
    fn nudge_clamps_at_the_ends() {
        let host = OfflineHost::new(48_000, 2);
        let mut player = Player::from_preset_name("ocean", host, config()).unwrap();
        for _ in 0..30 {
            player.nudge_volume(0.05);
        }
        assert_eq!(player.volume(), 1.0);
        for _ in 0..30 {
            player.nudge_volume(-0.05);
        }
        assert_eq!(player.volume(), 0.0);
    }

    #[test]
    fn dropping_player_releases_context() {
        let host = OfflineHost::new(48_000, 2);
        {
            let mut player = Player::from_preset_name("chant", host.clone(), config()).unwrap();
            player.start().unwrap();
            assert_eq!(host.live_contexts(), 1);
        }
        assert_eq!(host.live_contexts(), 0);
    }

    #[test]
    fn toggle_mute_keeps_volume() {
        let host = OfflineHost::new(48_000, 2);
        let mut player = Player::from_preset_name("ambient-drone", host, config()).unwrap();
        player.set_volume(0.7);
        assert!(player.toggle_mute());
        assert!((player.volume() - 0.7).abs() < 1e-6);
        assert!(!player.toggle_mute());
    }

    #[test]
    fn master_scales_without_moving_the_slider() {
        let host = OfflineHost::new(48_000, 2);
        let mut player = Player::from_preset_name("rain", host, config()).unwrap();
        player.set_volume(0.8);
        player.set_master(0.5);

        assert_eq!(player.volume(), 0.8);
        assert!((player.session().volume() - 0.4).abs() < 1e-6);

        player.nudge_volume(-0.4);
        assert!((player.session().volume() - 0.2).abs() < 1e-6);

        player.set_master(0.0);
        assert_eq!(player.session().volume(), 0.0);
        assert!((player.volume() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn master_reaches_a_playing_graph() {
        let host = OfflineHost::new(48_000, 2);
        let mut player = Player::from_preset_name("ambient-drone", host.clone(), config()).unwrap();
        player.set_volume(1.0);
        player.start().unwrap();

        player.set_master(0.25);
        host.render(4_800);
        assert_eq!(host.with_latest_graph(|g| g.master_level()), Some(0.25));
    }
}
