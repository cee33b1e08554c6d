//! DAS/ARR input handler for terminal environments.
//!
//! Horizontal keys repeat after the DAS delay at the ARR rate. The soft drop key
//! is a hold: pressing it emits `SoftDropStart`, releasing it (or the release
//! timeout firing) emits `SoftDropStop`, and the engine applies the faster
//! gravity in between.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::{GameCommand, DEFAULT_ARR_MS, DEFAULT_DAS_MS};

/// Commands produced by one update, bounded so the hot path never allocates
pub type CommandBatch = ArrayVec<GameCommand, 32>;

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

/// Tracks input state for DAS/ARR handling.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    down_held: bool,
    last_key_time: Instant,
    das_timer: u32,
    arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

// Without release events a tap would otherwise stay "held" forever.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

fn is_left(code: KeyCode) -> bool {
    matches!(code, KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') | KeyCode::Char('H'))
}

fn is_right(code: KeyCode) -> bool {
    matches!(code, KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') | KeyCode::Char('L'))
}

fn is_down(code: KeyCode) -> bool {
    matches!(code, KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') | KeyCode::Char('J'))
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            down_held: false,
            last_key_time: Instant::now(),
            das_timer: 0,
            arr_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn is_soft_drop_held(&self) -> bool {
        self.down_held
    }

    /// Whether `code` is handled here rather than by [`crate::map_key`]
    pub fn handles(code: KeyCode) -> bool {
        is_left(code) || is_right(code) || is_down(code)
    }

    /// Key press (or terminal key repeat). Returns the command to apply now.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameCommand> {
        let direction = if is_left(code) {
            HorizontalDirection::Left
        } else if is_right(code) {
            HorizontalDirection::Right
        } else if is_down(code) {
            self.last_key_time = Instant::now();
            if self.down_held {
                return None;
            }
            self.down_held = true;
            return Some(GameCommand::SoftDropStart);
        } else {
            return None;
        };

        self.last_key_time = Instant::now();
        if self.horizontal == direction {
            // Terminal auto-repeat; DAS/ARR produces the repeats.
            return None;
        }
        self.horizontal = direction;
        self.das_timer = 0;
        self.arr_accumulator = 0;
        Some(match direction {
            HorizontalDirection::Left => GameCommand::MoveLeft,
            _ => GameCommand::MoveRight,
        })
    }

    /// Key release. Only the soft drop key produces a command.
    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<GameCommand> {
        if (is_left(code) && self.horizontal == HorizontalDirection::Left)
            || (is_right(code) && self.horizontal == HorizontalDirection::Right)
        {
            self.release_horizontal();
            None
        } else if is_down(code) && self.down_held {
            self.down_held = false;
            Some(GameCommand::SoftDropStop)
        } else {
            None
        }
    }

    fn release_horizontal(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }

    /// Advance repeat timers; returns the commands to apply this tick.
    pub fn update(&mut self, elapsed_ms: u32) -> CommandBatch {
        let mut commands = CommandBatch::new();

        // Auto-release when terminal does not emit release events.
        let since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if since_last_key > self.key_release_timeout_ms {
            if self.horizontal != HorizontalDirection::None {
                self.release_horizontal();
            }
            if self.down_held {
                self.down_held = false;
                let _ = commands.try_push(GameCommand::SoftDropStop);
            }
        }

        let repeat = match self.horizontal {
            HorizontalDirection::Left => GameCommand::MoveLeft,
            HorizontalDirection::Right => GameCommand::MoveRight,
            HorizontalDirection::None => return commands,
        };

        let prev_das = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);
        if self.das_timer >= self.das_delay {
            let excess = if prev_das < self.das_delay {
                self.das_timer - self.das_delay
            } else {
                elapsed_ms
            };
            self.arr_accumulator = self.arr_accumulator.saturating_add(excess);
            while self.arr_accumulator >= self.arr_rate {
                if commands.try_push(repeat).is_err() {
                    // Batch full: drop the backlog rather than replay it later.
                    self.arr_accumulator = 0;
                    break;
                }
                self.arr_accumulator -= self.arr_rate;
            }
        }

        commands
    }

    /// Forget every held key (focus loss, pause).
    pub fn reset(&mut self) -> Option<GameCommand> {
        self.release_horizontal();
        self.last_key_time = Instant::now();
        if self.down_held {
            self.down_held = false;
            Some(GameCommand::SoftDropStop)
        } else {
            None
        }
    }

    #[cfg(test)]
    fn age_last_key(&mut self, ms: u64) {
        self.last_key_time = Instant::now() - std::time::Duration::from_millis(ms);
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_das_arr_repeats_after_delay() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameCommand::MoveLeft));

        // Before DAS expires: no repeats.
        assert!(ih.update(99).is_empty());

        // Exactly at DAS: still no repeats.
        assert!(ih.update(1).is_empty());

        // First ARR interval after DAS: one repeat.
        assert_eq!(ih.update(25).as_slice(), &[GameCommand::MoveLeft]);
        assert_eq!(ih.update(50).as_slice(), &[GameCommand::MoveLeft, GameCommand::MoveLeft]);
    }

    #[test]
    fn test_terminal_repeat_does_not_restart_das() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(GameCommand::MoveRight));
        ih.update(90);
        assert_eq!(ih.handle_key_press(KeyCode::Right), None);
        assert_eq!(ih.update(35).as_slice(), &[GameCommand::MoveRight]);
    }

    #[test]
    fn test_direction_switch_emits_immediately() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        ih.handle_key_press(KeyCode::Left);
        ih.update(200);
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(GameCommand::MoveRight));
        assert!(ih.update(99).is_empty());
    }

    #[test]
    fn test_soft_drop_is_a_hold() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);
        assert_eq!(ih.handle_key_press(KeyCode::Down), Some(GameCommand::SoftDropStart));
        assert_eq!(ih.handle_key_press(KeyCode::Down), None);
        assert!(ih.is_soft_drop_held());
        assert!(ih.update(500).is_empty());

        assert_eq!(ih.handle_key_release(KeyCode::Down), Some(GameCommand::SoftDropStop));
        assert_eq!(ih.handle_key_release(KeyCode::Down), None);
    }

    #[test]
    fn test_auto_release_stops_soft_drop_and_repeats() {
        let mut ih = InputHandler::with_config(100, 25);
        ih.key_release_timeout_ms = 50;

        ih.handle_key_press(KeyCode::Left);
        ih.handle_key_press(KeyCode::Down);
        ih.age_last_key(51);

        assert_eq!(ih.update(500).as_slice(), &[GameCommand::SoftDropStop]);
        assert_eq!(ih.horizontal, HorizontalDirection::None);
        assert!(!ih.is_soft_drop_held());
    }

    #[test]
    fn test_non_movement_key_does_not_extend_auto_release_timeout() {
        let mut ih = InputHandler::with_config(100, 25);
        ih.key_release_timeout_ms = 50;

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameCommand::MoveLeft));
        ih.age_last_key(51);
        assert_eq!(ih.handle_key_press(KeyCode::Up), None);

        assert!(ih.update(0).is_empty());
        assert_eq!(ih.horizontal, HorizontalDirection::None);
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        ih.handle_key_press(KeyCode::Left);
        ih.handle_key_press(KeyCode::Down);
        assert!(!ih.update(200).is_empty());

        assert_eq!(ih.reset(), Some(GameCommand::SoftDropStop));
        assert!(ih.update(200).is_empty());
        assert_eq!(ih.reset(), None);
    }

    #[test]
    fn test_handles_only_held_keys() {
        assert!(InputHandler::handles(KeyCode::Left));
        assert!(InputHandler::handles(KeyCode::Char('s')));
        assert!(!InputHandler::handles(KeyCode::Up));
        assert!(!InputHandler::handles(KeyCode::Char(' ')));
    }
}
