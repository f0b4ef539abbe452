//! Session configuration.
//!
//! Defaults: 2 second noise beds at 50% volume, 50 ms volume ramps.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables for a [`PlaybackSession`](crate::PlaybackSession).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Initial volume in [0, 1].
    pub volume: f32,
    /// Ramp applied to the master gain on volume and mute changes.
    pub volume_ramp: Duration,
    /// Length of each generated noise buffer, in seconds.
    pub noise_seconds: f32,
    /// Crossfade folded into the head of each noise buffer so the loop seam
    /// does not click. Zero disables it.
    pub loop_crossfade: f32,
    /// Seed for noise generation. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Capacity of the control -> render command ring.
    pub command_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            volume_ramp: Duration::from_millis(50),
            noise_seconds: 2.0,
            loop_crossfade: 0.05,
            seed: None,
            command_capacity: 64,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn volume_ramp(mut self, ramp: Duration) -> Self {
        self.volume_ramp = ramp;
        self
    }

    pub fn noise_seconds(mut self, seconds: f32) -> Self {
        self.noise_seconds = seconds;
        self
    }

    pub fn loop_crossfade(mut self, seconds: f32) -> Self {
        self.loop_crossfade = seconds;
        self
    }

    /// Fix the noise seed so a run is reproducible. Each start of a session
    /// derives its own stream from it.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }
}
