//! Line clear detection and resolution
//!
//! Clearing is split in two so the controller can hold a visual phase between
//! scoring and the grid mutation: [`LineClearEngine::resolve`] scores the clear
//! against the untouched grid, [`LineClearEngine::commit`] collapses the rows and
//! runs the perfect-clear check.

use crate::grid::Grid;
use crate::scoring::{LineClearAward, ScoreEngine};

/// A scored clear whose rows have not been removed yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClear {
    /// Completed row indices, top to bottom
    pub rows: Vec<usize>,
    pub award: LineClearAward,
}

/// Outcome of a committed clear
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearReport {
    pub rows: Vec<usize>,
    pub award: LineClearAward,
    pub perfect_clear: bool,
    pub perfect_clear_bonus: u32,
}

impl ClearReport {
    pub fn lines(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LineClearEngine;

impl LineClearEngine {
    /// Score the rows completed by the last lock.
    ///
    /// No completed rows resets the combo chain and returns `None`.
    pub fn resolve(grid: &Grid, score: &mut ScoreEngine) -> Option<PendingClear> {
        let rows = grid.find_completed_rows();
        if rows.is_empty() {
            score.on_line_clear(0);
            return None;
        }
        let award = score.on_line_clear(rows.len());
        Some(PendingClear { rows, award })
    }

    /// Remove the pending rows and award a perfect clear if the grid is left empty.
    pub fn commit(grid: &mut Grid, pending: &PendingClear, score: &mut ScoreEngine) -> ClearReport {
        let removed = grid.clear_rows(&pending.rows);
        debug_assert_eq!(removed, pending.rows.len(), "pending rows changed before commit");

        let perfect_clear = grid.is_empty();
        let perfect_clear_bonus = if perfect_clear {
            score.on_perfect_clear()
        } else {
            0
        };

        ClearReport {
            rows: pending.rows.clone(),
            award: pending.award,
            perfect_clear,
            perfect_clear_bonus,
        }
    }

    /// Resolve and commit in one step; returns an empty report when nothing cleared.
    pub fn apply(grid: &mut Grid, score: &mut ScoreEngine) -> ClearReport {
        match Self::resolve(grid, score) {
            Some(pending) => Self::commit(grid, &pending, score),
            None => ClearReport::default(),
        }
    }
}
