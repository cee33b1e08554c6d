//! Read-only view of the game for renderers
//!
//! [`GameSnapshot`] is filled by [`GameController::snapshot_into`], which reuses
//! the snapshot's buffers so a host can pull one every frame without allocating.
//!
//! [`GameController::snapshot_into`]: crate::controller::GameController::snapshot_into

use crate::controller::ControllerState;
use crate::piece::Tetromino;
use crate::scoring::Statistics;
use crate::types::{Cell, MinoOffset, PieceKind, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub cells: [MinoOffset; 4],
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
        }
    }
}

/// Lock delay feedback for the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LockSnapshot {
    pub grounded: bool,
    pub elapsed_ms: u32,
    pub delay_ms: u32,
    pub moves: u8,
    pub max_moves: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    pub countdown_ms: u32,
    pub line_clear_ms: u32,
    pub drop_interval_ms: u32,
}

/// Rows collapsed by the most recent clear, visible for one tick
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LastClear {
    pub rows: Vec<usize>,
    pub count: u8,
    pub perfect_clear: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    pub hidden_rows: u8,
    /// Row-major, hidden rows first
    pub cells: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub ghost_cells: Option<[MinoOffset; 4]>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next: Vec<PieceKind>,
    pub state: ControllerState,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub back_to_back: bool,
    pub best_score: Option<u32>,
    pub lock: LockSnapshot,
    pub timers: TimersSnapshot,
    pub last_clear: Option<LastClear>,
    pub stats: Statistics,
    pub episode_id: u32,
    pub piece_id: u32,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.hidden_rows = 0;
        self.cells.clear();
        self.active = None;
        self.ghost_y = None;
        self.ghost_cells = None;
        self.hold = None;
        self.can_hold = true;
        self.next.clear();
        self.state = ControllerState::Menu;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.combo = 0;
        self.back_to_back = false;
        self.best_score = None;
        self.lock = LockSnapshot::default();
        self.timers = TimersSnapshot::default();
        self.last_clear = None;
        self.stats = Statistics::default();
        self.episode_id = 0;
        self.piece_id = 0;
        self.seed = 0;
    }

    /// Locked cell at (x, y); out of bounds reads as empty.
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if x >= self.width as usize {
            return None;
        }
        self.cells
            .get(y * self.width as usize + x)
            .copied()
            .flatten()
    }

    /// Visible rows only, top to bottom
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells
            .chunks(self.width.max(1) as usize)
            .skip(self.hidden_rows as usize)
    }

    pub fn playable(&self) -> bool {
        self.state == ControllerState::Playing
    }

    pub fn game_over(&self) -> bool {
        self.state == ControllerState::GameOver
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            hidden_rows: 0,
            cells: Vec::new(),
            active: None,
            ghost_y: None,
            ghost_cells: None,
            hold: None,
            can_hold: true,
            next: Vec::new(),
            state: ControllerState::Menu,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            back_to_back: false,
            best_score: None,
            lock: LockSnapshot::default(),
            timers: TimersSnapshot::default(),
            last_clear: None,
            stats: Statistics::default(),
            episode_id: 0,
            piece_id: 0,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_snapshot_carries_cells() {
        let piece = Tetromino::at_spawn(PieceKind::O, 10, 0);
        let snap = ActiveSnapshot::from(piece);
        assert_eq!(snap.cells, [(4, 0), (5, 0), (4, 1), (5, 1)]);
    }

    #[test]
    fn test_cell_and_visible_rows() {
        let mut snap = GameSnapshot {
            width: 2,
            height: 3,
            hidden_rows: 1,
            cells: vec![Some(PieceKind::I), None, None, None, None, Some(PieceKind::T)],
            ..GameSnapshot::default()
        };
        assert_eq!(snap.cell(0, 0), Some(PieceKind::I));
        assert_eq!(snap.cell(1, 2), Some(PieceKind::T));
        assert_eq!(snap.cell(5, 0), None);
        assert_eq!(snap.visible_rows().count(), 2);

        snap.clear();
        assert!(snap.cells.is_empty());
        assert_eq!(snap.state, ControllerState::Menu);
    }
}
