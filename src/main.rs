//! Terminal host (default binary).
//!
//! Drives a [`GameController`] at a fixed 16ms step, feeds it commands from
//! crossterm key events and prints the text view every frame. High scores are
//! kept in a JSON file (`TETRIS_SCORES_PATH`, default in the working directory).

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::Print;
use crossterm::{cursor, terminal, QueueableCommand};

use prism_tetris::core::{GameConfig, GameController};
use prism_tetris::input::{map_key, should_quit, InputHandler};
use prism_tetris::store::JsonFileStore;
use prism_tetris::types::{GameCommand, TICK_MS};
use prism_tetris::view;

struct Terminal {
    out: Stdout,
}

impl Terminal {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        out.queue(terminal::EnterAlternateScreen)?;
        out.queue(cursor::Hide)?;
        out.queue(terminal::DisableLineWrap)?;
        out.flush()?;
        Ok(Self { out })
    }

    fn exit(&mut self) -> Result<()> {
        self.out.queue(terminal::EnableLineWrap)?;
        self.out.queue(cursor::Show)?;
        self.out.queue(terminal::LeaveAlternateScreen)?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn draw(&mut self, lines: &[String]) -> Result<()> {
        for (row, line) in lines.iter().enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            self.out.queue(Print(line))?;
            self.out
                .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        }
        self.out
            .queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        self.out.flush()?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let config = GameConfig::from_env();
    let store = JsonFileStore::from_env();
    eprintln!(
        "[Host] seed={} start_level={} scores={}",
        config.seed,
        config.start_level,
        store.path().display()
    );

    let mut game = GameController::with_store(config, Box::new(store));
    let mut term = Terminal::enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Some(best) = game.high_scores().best() {
        println!("[Host] best score: {}", best);
    }
    result
}

fn run(term: &mut Terminal, game: &mut GameController) -> Result<()> {
    let mut input = InputHandler::new();
    let mut snapshot = game.snapshot();
    let mut frame = Vec::new();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        game.snapshot_into(&mut snapshot);
        view::render_into(&snapshot, &mut frame);
        term.draw(&frame)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if InputHandler::handles(key.code) {
                            if let Some(command) = input.handle_key_press(key.code) {
                                game.apply(command);
                            }
                        } else if let Some(command) = map_key(key) {
                            if command == GameCommand::Pause {
                                if let Some(stop) = input.reset() {
                                    game.apply(stop);
                                }
                            }
                            game.apply(command);
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Held keys repeat through DAS/ARR, not terminal auto-repeat.
                    }
                    KeyEventKind::Release => {
                        if let Some(command) = input.handle_key_release(key.code) {
                            game.apply(command);
                        }
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            for command in input.update(TICK_MS) {
                game.apply(command);
            }
            game.tick(TICK_MS);
        }
    }
}
