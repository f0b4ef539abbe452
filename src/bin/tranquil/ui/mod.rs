//! TUI module for tranquil
//!
//! One row per soundscape, a status line and a help bar.

mod deck;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};

use crate::app::{Deck, VOLUME_STEP};

use deck::render_deck;

/// UI application state
pub struct UiApp {
    deck: Deck,
    /// Whether the app should quit
    should_quit: bool,
}

impl UiApp {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.deck.tick(Instant::now());

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Stop every sound.
    pub fn shutdown(&mut self) {
        self.deck.stop_all();
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.deck.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.deck.select_next(),
            KeyCode::Char(' ') | KeyCode::Enter => self.deck.toggle_selected(),
            KeyCode::Left => self.deck.nudge_selected(-VOLUME_STEP),
            KeyCode::Right => self.deck.nudge_selected(VOLUME_STEP),
            KeyCode::Char('m') => self.deck.toggle_mute_selected(),
            KeyCode::Char('M') => self.deck.toggle_master_mute(),
            KeyCode::Char('-') => self.deck.nudge_master(-VOLUME_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.deck.nudge_master(VOLUME_STEP),
            KeyCode::Char('f') => self.deck.fade_selected(),
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),    // Sounds
                Constraint::Length(3), // Status
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let master = if self.deck.is_master_muted() {
            " master muted ".to_string()
        } else {
            format!(" master {:.0}% ", self.deck.master_volume() * 100.0)
        };
        let deck_block = Block::default()
            .title(" tranquil ")
            .title_bottom(master)
            .borders(Borders::ALL);
        let deck_inner = deck_block.inner(chunks[0]);
        frame.render_widget(deck_block, chunks[0]);
        render_deck(frame, deck_inner, &self.deck);

        let status = Paragraph::new(self.deck.status())
            .block(Block::default().title(" status ").borders(Borders::ALL));
        frame.render_widget(status, chunks[1]);

        let help = Paragraph::new(
            " [Q] Quit  [↑/↓] Select  [Space] Play/Stop  [←/→] Volume  [m] Mute  [F] Fade  \
             [-/+] Master  [M] Mute all",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
