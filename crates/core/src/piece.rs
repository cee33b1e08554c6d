//! Active piece - placement geometry, movement, rotation and gravity
//!
//! [`Tetromino`] is the pure placement (kind, rotation, origin). [`ActivePiece`]
//! wraps the one falling piece together with its gravity accumulator and
//! [`LockTimer`]. Every movement is validated against the [`Grid`]; a rejected
//! movement leaves the piece untouched.

use crate::config::GameConfig;
use crate::grid::Grid;
use crate::lock::{LockState, LockTimer};
use crate::pieces::{get_shape, spawn_x, try_rotate};
use crate::scoring::soft_drop_interval_ms;
use crate::types::{MinoOffset, PieceKind, PieceShape, Rotation, RotationDirection};

/// A piece placement on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Spawn placement for `kind`: North, centred, on row `spawn_y`
    pub fn at_spawn(kind: PieceKind, width: u8, spawn_y: i8) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: spawn_x(kind, width),
            y: spawn_y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute grid cells occupied by this placement
    pub fn cells(&self) -> [MinoOffset; 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check if all minos are at valid positions on the grid
    pub fn fits(&self, grid: &Grid) -> bool {
        grid.can_place(&self.shape(), self.x, self.y)
    }

    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Check if the piece is resting on something
    pub fn is_grounded(&self, grid: &Grid) -> bool {
        !self.shifted(0, 1).fits(grid)
    }

    /// How many rows a hard drop would descend
    pub fn drop_distance(&self, grid: &Grid) -> u8 {
        let mut distance: i8 = 0;
        while self.shifted(0, distance + 1).fits(grid) {
            distance += 1;
        }
        distance as u8
    }
}

/// Result of a single soft-drop step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDrop {
    Moved,
    Locked,
}

/// What gravity did during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GravityStep {
    pub rows_fallen: u8,
    /// Rows fallen while soft dropping (scored one point each)
    pub soft_rows: u8,
    pub locked: bool,
}

/// The falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    piece: Tetromino,
    fall_ms: u32,
    soft_drop: bool,
    soft_drop_multiplier: u32,
    lock: LockTimer,
}

impl ActivePiece {
    /// Place a new piece at the spawn point.
    ///
    /// Returns `None` when the spawn placement is blocked (top-out).
    pub fn spawn(kind: PieceKind, grid: &Grid, config: &GameConfig) -> Option<Self> {
        let piece = Tetromino::at_spawn(kind, grid.width(), config.spawn_y);
        if !piece.fits(grid) {
            return None;
        }
        let mut lock = LockTimer::new(config.lock_delay_ms, config.max_lock_moves);
        lock.reached_row(piece.y);
        Some(Self {
            piece,
            fall_ms: 0,
            soft_drop: false,
            soft_drop_multiplier: config.soft_drop_multiplier.max(1),
            lock,
        })
    }

    pub fn piece(&self) -> Tetromino {
        self.piece
    }

    pub fn kind(&self) -> PieceKind {
        self.piece.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.piece.rotation
    }

    pub fn position(&self) -> (i8, i8) {
        (self.piece.x, self.piece.y)
    }

    pub fn cells(&self) -> [MinoOffset; 4] {
        self.piece.cells()
    }

    pub fn lock_timer(&self) -> &LockTimer {
        &self.lock
    }

    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn set_soft_drop(&mut self, on: bool) {
        if self.soft_drop != on {
            self.soft_drop = on;
            // Apply the new speed from the next interval.
            self.fall_ms = 0;
        }
    }

    /// Move without touching lock bookkeeping
    fn shift(&mut self, grid: &Grid, dx: i8, dy: i8) -> bool {
        if self.is_locked() {
            return false;
        }
        let moved = self.piece.shifted(dx, dy);
        if moved.fits(grid) {
            self.piece = moved;
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self, grid: &Grid) -> bool {
        self.player_shift(grid, -1)
    }

    pub fn move_right(&mut self, grid: &Grid) -> bool {
        self.player_shift(grid, 1)
    }

    fn player_shift(&mut self, grid: &Grid, dx: i8) -> bool {
        let moved = self.shift(grid, dx, 0);
        if moved {
            self.lock.register_move();
        }
        moved
    }

    /// One row down, or lock at once if the piece cannot descend.
    pub fn soft_drop(&mut self, grid: &Grid) -> SoftDrop {
        if self.shift(grid, 0, 1) {
            self.fall_ms = 0;
            self.lock.lift_off();
            self.lock.reached_row(self.piece.y);
            SoftDrop::Moved
        } else {
            self.lock.lock();
            SoftDrop::Locked
        }
    }

    /// Drop to the ghost row and lock. Returns the rows descended.
    pub fn hard_drop(&mut self, grid: &Grid) -> u8 {
        if self.is_locked() {
            return 0;
        }
        let distance = self.piece.drop_distance(grid);
        self.piece = self.piece.shifted(0, distance as i8);
        self.lock.lock();
        distance
    }

    pub fn rotate_cw(&mut self, grid: &Grid) -> bool {
        self.rotate(grid, RotationDirection::Clockwise)
    }

    pub fn rotate_ccw(&mut self, grid: &Grid) -> bool {
        self.rotate(grid, RotationDirection::CounterClockwise)
    }

    /// Rotate with SRS kicks; returns the kick used on success.
    pub fn rotate_with_kick(&mut self, grid: &Grid, direction: RotationDirection) -> Option<MinoOffset> {
        if self.is_locked() {
            return None;
        }
        let piece = self.piece;
        let (rotation, (kx, ky)) = try_rotate(
            piece.kind,
            piece.rotation,
            piece.x,
            piece.y,
            direction,
            |x, y| grid.is_free(x, y),
        )?;
        self.piece = Tetromino {
            rotation,
            x: piece.x + kx,
            y: piece.y + ky,
            ..piece
        };
        self.lock.register_move();
        self.lock.reached_row(self.piece.y);
        Some((kx, ky))
    }

    fn rotate(&mut self, grid: &Grid, direction: RotationDirection) -> bool {
        self.rotate_with_kick(grid, direction).is_some()
    }

    /// Row a hard drop would land on
    pub fn ghost_y(&self, grid: &Grid) -> i8 {
        self.piece.y + self.piece.drop_distance(grid) as i8
    }

    /// Cells of the ghost piece
    pub fn ghost_cells(&self, grid: &Grid) -> [MinoOffset; 4] {
        self.piece
            .shifted(0, self.piece.drop_distance(grid) as i8)
            .cells()
    }

    pub fn is_grounded(&self, grid: &Grid) -> bool {
        self.piece.is_grounded(grid)
    }

    /// Advance gravity and the lock timer by `elapsed_ms`.
    ///
    /// `interval_ms` is the level's time per row; soft drop divides it by the
    /// configured multiplier. A soft-dropping piece that is grounded locks at once.
    pub fn update(&mut self, grid: &Grid, elapsed_ms: u32, interval_ms: u32) -> GravityStep {
        let mut step = GravityStep::default();
        if self.is_locked() {
            step.locked = true;
            return step;
        }

        if self.piece.is_grounded(grid) {
            self.fall_ms = 0;
            if self.soft_drop {
                self.lock.lock();
                step.locked = true;
                return step;
            }
            self.lock.touch_down();
            step.locked = self.lock.advance(elapsed_ms);
            return step;
        }

        self.lock.lift_off();
        let interval = if self.soft_drop {
            soft_drop_interval_ms(interval_ms, self.soft_drop_multiplier)
        } else {
            interval_ms.max(1)
        };

        self.fall_ms = self.fall_ms.saturating_add(elapsed_ms);
        while self.fall_ms >= interval {
            self.fall_ms -= interval;
            if !self.shift(grid, 0, 1) {
                break;
            }
            self.lock.reached_row(self.piece.y);
            step.rows_fallen += 1;
            if self.soft_drop {
                step.soft_rows += 1;
            }
            if self.piece.is_grounded(grid) {
                self.fall_ms = 0;
                self.lock.touch_down();
                break;
            }
        }
        step
    }
}
