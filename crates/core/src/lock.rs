//! Lock delay state machine
//!
//! A piece that touches down gets `delay_ms` of grace before it becomes part of
//! the grid. Each successful move or rotation while grounded restarts the grace
//! period, but only `max_moves` times: the move count, not wall-clock time,
//! bounds how long a piece can be kept alive on the floor.
//!
//! The move count belongs to the piece, not to one grounding. Kicking up off
//! the floor and landing again keeps it; only reaching a row below the lowest
//! one seen so far starts a fresh count.

use crate::types::{LOCK_DELAY_MS, LOCK_RESET_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockState {
    /// Free to fall
    Falling,
    /// Resting on the stack or floor, waiting out the lock delay
    Grounded { elapsed_ms: u32, moves: u8 },
    /// Terminal: the piece must be written to the grid
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTimer {
    state: LockState,
    delay_ms: u32,
    max_moves: u8,
    /// Moves spent since the piece last reached a new lowest row
    moves: u8,
    /// Deepest origin row reached so far
    lowest_y: Option<i8>,
}

impl LockTimer {
    pub fn new(delay_ms: u32, max_moves: u8) -> Self {
        Self {
            state: LockState::Falling,
            delay_ms,
            max_moves: max_moves.max(1),
            moves: 0,
            lowest_y: None,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self.state, LockState::Grounded { .. })
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn max_moves(&self) -> u8 {
        self.max_moves
    }

    /// The piece now sits with its origin on row `y`.
    ///
    /// A row below every earlier one refunds the move count.
    pub fn reached_row(&mut self, y: i8) {
        if self.lowest_y.map_or(true, |lowest| y > lowest) {
            self.lowest_y = Some(y);
            self.moves = 0;
            if let LockState::Grounded { elapsed_ms, .. } = self.state {
                self.state = LockState::Grounded { elapsed_ms, moves: 0 };
            }
        }
    }

    /// The piece found nothing below it: start the grace period (once).
    pub fn touch_down(&mut self) {
        if self.state == LockState::Falling {
            self.state = LockState::Grounded {
                elapsed_ms: 0,
                moves: self.moves,
            };
        }
    }

    /// The cell below is clear again: back to falling. Spent moves are kept.
    pub fn lift_off(&mut self) {
        if self.is_grounded() {
            self.state = LockState::Falling;
        }
    }

    /// A successful move or rotation happened.
    ///
    /// Only counts while grounded; restarts the delay while under the move cap.
    pub fn register_move(&mut self) {
        if let LockState::Grounded { elapsed_ms, .. } = self.state {
            self.moves = self.moves.saturating_add(1);
            let elapsed_ms = if self.moves < self.max_moves { 0 } else { elapsed_ms };
            self.state = LockState::Grounded {
                elapsed_ms,
                moves: self.moves,
            };
        }
    }

    /// Advance the grace period; returns true once the piece must lock.
    pub fn advance(&mut self, elapsed: u32) -> bool {
        match self.state {
            LockState::Falling => false,
            LockState::Locked => true,
            LockState::Grounded { elapsed_ms, moves } => {
                let elapsed_ms = elapsed_ms.saturating_add(elapsed);
                if elapsed_ms >= self.delay_ms || moves >= self.max_moves {
                    self.state = LockState::Locked;
                    true
                } else {
                    self.state = LockState::Grounded { elapsed_ms, moves };
                    false
                }
            }
        }
    }

    /// Lock immediately (hard drop, soft drop into the floor).
    pub fn lock(&mut self) {
        self.state = LockState::Locked;
    }

    /// Fresh timer for a new piece.
    pub fn reset(&mut self) {
        self.state = LockState::Falling;
        self.moves = 0;
        self.lowest_y = None;
    }

    /// `(elapsed_ms, delay_ms)` for lock progress feedback.
    pub fn progress(&self) -> (u32, u32) {
        match self.state {
            LockState::Falling => (0, self.delay_ms),
            LockState::Grounded { elapsed_ms, .. } => (elapsed_ms.min(self.delay_ms), self.delay_ms),
            LockState::Locked => (self.delay_ms, self.delay_ms),
        }
    }

    /// Moves spent since the piece last reached a new lowest row
    pub fn moves(&self) -> u8 {
        self.moves
    }
}

impl Default for LockTimer {
    fn default() -> Self {
        Self::new(LOCK_DELAY_MS, LOCK_RESET_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falling_never_locks() {
        let mut timer = LockTimer::new(500, 15);
        assert!(!timer.advance(10_000));
        assert_eq!(timer.state(), LockState::Falling);
    }

    #[test]
    fn test_locks_after_delay() {
        let mut timer = LockTimer::new(500, 15);
        timer.touch_down();
        assert!(!timer.advance(499));
        assert!(timer.advance(1));
        assert!(timer.is_locked());
    }

    #[test]
    fn test_move_restarts_delay() {
        let mut timer = LockTimer::new(500, 15);
        timer.touch_down();
        assert!(!timer.advance(400));
        timer.register_move();
        assert_eq!(timer.state(), LockState::Grounded { elapsed_ms: 0, moves: 1 });
        assert!(!timer.advance(400));
    }

    #[test]
    fn test_move_cap_forces_lock() {
        let mut timer = LockTimer::new(500, 3);
        timer.touch_down();
        for _ in 0..3 {
            assert!(!timer.advance(100));
            timer.register_move();
        }
        // Third move hit the cap: it did not restart the delay and the next tick locks.
        assert_eq!(timer.state(), LockState::Grounded { elapsed_ms: 100, moves: 3 });
        assert!(timer.advance(0));
    }

    #[test]
    fn test_touch_down_is_idempotent() {
        let mut timer = LockTimer::new(500, 15);
        timer.touch_down();
        timer.advance(200);
        timer.touch_down();
        assert_eq!(timer.progress(), (200, 500));
    }

    #[test]
    fn test_lift_off_keeps_spent_moves() {
        let mut timer = LockTimer::new(500, 15);
        timer.reached_row(20);
        timer.touch_down();
        timer.register_move();
        timer.register_move();
        timer.lift_off();
        assert_eq!(timer.state(), LockState::Falling);
        assert_eq!(timer.moves(), 2);

        // Landing again on the same row resumes the count.
        timer.reached_row(20);
        timer.touch_down();
        assert_eq!(timer.state(), LockState::Grounded { elapsed_ms: 0, moves: 2 });
    }

    #[test]
    fn test_new_lowest_row_refunds_moves() {
        let mut timer = LockTimer::new(500, 15);
        timer.reached_row(10);
        timer.touch_down();
        timer.register_move();
        timer.lift_off();
        timer.reached_row(9);
        assert_eq!(timer.moves(), 1);
        timer.reached_row(11);
        assert_eq!(timer.moves(), 0);
    }

    #[test]
    fn test_exhausted_moves_lock_on_next_landing() {
        let mut timer = LockTimer::new(500, 2);
        timer.reached_row(20);
        timer.touch_down();
        timer.register_move();
        timer.register_move();
        timer.lift_off();
        timer.touch_down();
        assert!(timer.advance(0));
    }

    #[test]
    fn test_moves_while_falling_are_free() {
        let mut timer = LockTimer::new(500, 1);
        timer.register_move();
        timer.touch_down();
        assert!(!timer.advance(10));
    }
}
