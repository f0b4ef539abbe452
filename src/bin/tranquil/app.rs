//! Deck state: one player per soundscape plus the current selection.

use std::time::{Duration, Instant};

use tranquil::{host::CpalHost, Player, Result, SessionConfig};

/// Slider step for the arrow keys.
pub const VOLUME_STEP: f32 = 0.05;

/// Length of the `f` fade before the sound is stopped.
pub const FADE: Duration = Duration::from_secs(4);

pub struct Deck {
    players: Vec<Player<CpalHost>>,
    /// Stop deadlines of sounds that are fading out.
    fades: Vec<Option<Instant>>,
    selected: usize,
    /// Deck-wide level applied on top of every slider.
    master_volume: f32,
    master_muted: bool,
    status: String,
}

impl Deck {
    pub fn new(names: &[String], config: SessionConfig) -> Result<Self> {
        let players = names
            .iter()
            .map(|name| Player::from_preset_name(name, CpalHost::new(), config.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fades: vec![None; players.len()],
            players,
            selected: 0,
            master_volume: 1.0,
            master_muted: false,
            status: "space: play/stop".to_string(),
        })
    }

    pub fn players(&self) -> &[Player<CpalHost>] {
        &self.players
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn is_master_muted(&self) -> bool {
        self.master_muted
    }

    pub fn nudge_master(&mut self, delta: f32) {
        self.master_volume = (self.master_volume + delta).clamp(0.0, 1.0);
        self.apply_master();
        self.status = format!("master volume {:.0}%", self.master_volume * 100.0);
    }

    pub fn toggle_master_mute(&mut self) {
        self.master_muted = !self.master_muted;
        self.apply_master();
        self.status = if self.master_muted {
            "all muted".to_string()
        } else {
            "all unmuted".to_string()
        };
    }

    fn apply_master(&mut self) {
        let master = if self.master_muted {
            0.0
        } else {
            self.master_volume
        };
        for player in &mut self.players {
            player.set_master(master);
        }
    }

    pub fn is_fading(&self, index: usize) -> bool {
        self.fades.get(index).is_some_and(Option::is_some)
    }

    pub fn select_next(&mut self) {
        if !self.players.is_empty() {
            self.selected = (self.selected + 1) % self.players.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.players.is_empty() {
            self.selected = (self.selected + self.players.len() - 1) % self.players.len();
        }
    }

    pub fn toggle_selected(&mut self) {
        let index = self.selected;
        let Some(player) = self.players.get_mut(index) else {
            return;
        };
        self.fades[index] = None;

        self.status = match player.toggle() {
            Ok(true) => format!("{} playing", player.label()),
            Ok(false) => format!("{} stopped", player.label()),
            Err(err) => format!("{}: {err}", player.label()),
        };
    }

    pub fn nudge_selected(&mut self, delta: f32) {
        if let Some(player) = self.players.get_mut(self.selected) {
            let volume = player.nudge_volume(delta);
            self.status = format!("{} volume {:.0}%", player.label(), volume * 100.0);
        }
    }

    pub fn toggle_mute_selected(&mut self) {
        if let Some(player) = self.players.get_mut(self.selected) {
            let muted = player.toggle_mute();
            self.status = format!(
                "{} {}",
                player.label(),
                if muted { "muted" } else { "unmuted" }
            );
        }
    }

    pub fn fade_selected(&mut self) {
        let index = self.selected;
        let Some(player) = self.players.get_mut(index) else {
            return;
        };
        if !player.is_active() {
            return;
        }
        player.fade_out(FADE);
        self.fades[index] = Some(Instant::now() + FADE);
        self.status = format!("{} fading out", player.label());
    }

    /// Stop sounds whose fade has finished.
    pub fn tick(&mut self, now: Instant) {
        for (player, fade) in self.players.iter_mut().zip(self.fades.iter_mut()) {
            if fade.is_some_and(|deadline| now >= deadline) {
                *fade = None;
                player.stop();
                self.status = format!("{} faded out", player.label());
            }
        }
    }

    pub fn stop_all(&mut self) {
        for player in &mut self.players {
            player.stop();
        }
        self.fades.iter_mut().for_each(|fade| *fade = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> Deck {
        let names = vec!["rain".to_string(), "chant".to_string()];
        Deck::new(&names, SessionConfig::default().volume(0.8)).unwrap()
    }

    #[test]
    fn master_volume_scales_every_player() {
        let mut deck = deck();
        for _ in 0..10 {
            deck.nudge_master(-VOLUME_STEP);
        }
        assert!((deck.master_volume() - 0.5).abs() < 1e-4);
        for player in deck.players() {
            assert!((player.volume() - 0.8).abs() < 1e-6);
            assert!((player.session().volume() - 0.4).abs() < 1e-4);
        }
    }

    #[test]
    fn master_mute_keeps_sliders_and_master_level() {
        let mut deck = deck();
        deck.nudge_master(-0.25);
        deck.toggle_master_mute();
        assert!(deck.players().iter().all(|p| p.session().volume() == 0.0));

        deck.toggle_master_mute();
        assert!(!deck.is_master_muted());
        for player in deck.players() {
            assert!((player.session().volume() - 0.6).abs() < 1e-4);
        }
    }

    #[test]
    fn master_is_clamped() {
        let mut deck = deck();
        deck.nudge_master(5.0);
        assert_eq!(deck.master_volume(), 1.0);
        deck.nudge_master(-5.0);
        assert_eq!(deck.master_volume(), 0.0);
    }
}
