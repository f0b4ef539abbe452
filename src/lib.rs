pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Voice graphs realized from presets
pub mod host; // Audio context abstraction (device + offline)
pub mod player;
pub mod preset; // Static soundscape descriptions
pub mod session; // Playback lifecycle

pub use config::SessionConfig;
pub use error::{EngineError, Result};
pub use player::Player;
pub use preset::Preset;
pub use session::PlaybackSession;

pub const MAX_BLOCK_SIZE: usize = 2048;
