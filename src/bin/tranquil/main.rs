//! tranquil - ambient soundscape deck
//!
//! Run with: cargo run -- --sound rain --sound chant

mod app;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;
use tranquil::{preset, SessionConfig};

use app::Deck;
use ui::UiApp;

#[derive(Debug, Parser)]
#[command(name = "tranquil", version, about = "Procedural ambient soundscapes")]
struct Args {
    /// List the built-in soundscapes and exit
    #[arg(long)]
    list: bool,

    /// Soundscape to put on the deck (repeatable, default: all)
    #[arg(long = "sound", value_name = "NAME")]
    sounds: Vec<String>,

    /// Initial volume of every sound, 0.0 to 1.0
    #[arg(long, default_value_t = 0.5)]
    volume: f32,

    /// Seed the noise generators for reproducible beds
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    if args.list {
        for name in preset::NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    let names: Vec<String> = if args.sounds.is_empty() {
        preset::NAMES.iter().map(|name| name.to_string()).collect()
    } else {
        args.sounds.clone()
    };

    let mut config = SessionConfig::default().volume(args.volume);
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }

    let deck = Deck::new(&names, config).wrap_err("failed to load soundscapes")?;
    let mut app = UiApp::new(deck);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    // Every session is released before exit, even if the UI loop failed
    app.shutdown();
    result
}
