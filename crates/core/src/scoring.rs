//! Scoring module - guideline line-clear scoring, combos and leveling
//!
//! The free functions hold the rules; [`ScoreEngine`] owns the running state
//! (score, level, lines, combo, back-to-back) and is the only thing that
//! mutates it. Points for a clear use the level in effect before the cleared
//! lines are counted.
//!
//! - 1/2/3/4 lines: 100/300/500/800 x level
//! - Consecutive tetrises: x3/2 (floored) on the base points
//! - Combo: `50 x combo x level` from the second consecutive clear on
//! - Perfect clear: `2000 x level`
//! - Drops: 1 point per soft-dropped row, 2 per hard-dropped row

use crate::types::{
    B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BASE, DROP_INTERVALS, DROP_INTERVAL_MIN_MS,
    HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, PERFECT_CLEAR_BONUS, SOFT_DROP_POINTS,
};

/// Base points for clearing `lines` rows at `level`
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Combo bonus for the `combo`-th consecutive clear (first clear earns nothing)
pub fn calculate_combo_bonus(combo: u32, level: u32) -> u32 {
    if combo <= 1 {
        return 0;
    }
    COMBO_BASE.saturating_mul(combo).saturating_mul(level)
}

/// Only tetrises chain back-to-back
pub fn qualifies_for_b2b(lines: usize) -> bool {
    lines == 4
}

/// Apply the B2B multiplier (3/2, floored) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    cells.saturating_mul(per_cell)
}

/// Level for a cumulative line count: one level per 10 lines.
pub fn calculate_level(start_level: u32, total_lines: u32) -> u32 {
    start_level.max(1).saturating_add(total_lines / LINES_PER_LEVEL)
}

/// Gravity for a level in milliseconds per row, clamped at the floor
pub fn drop_interval_ms(level: u32) -> u32 {
    let index = level.max(1) as usize - 1;
    DROP_INTERVALS
        .get(index)
        .copied()
        .unwrap_or(DROP_INTERVAL_MIN_MS)
        .max(DROP_INTERVAL_MIN_MS)
}

/// Calculate soft drop interval
/// Base interval divided by soft drop multiplier
pub fn soft_drop_interval_ms(base_interval: u32, multiplier: u32) -> u32 {
    (base_interval / multiplier.max(1)).max(1)
}

/// Cumulative per-game counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub tetrises: u32,
    pub perfect_clears: u32,
    pub pieces_locked: u32,
    pub soft_drop_cells: u32,
    pub hard_drop_cells: u32,
}

/// Breakdown of the points awarded for one clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineClearAward {
    pub lines: u8,
    /// Line points including the back-to-back multiplier
    pub line_points: u32,
    pub combo_bonus: u32,
    pub total: u32,
    pub combo: u32,
    pub b2b_applied: bool,
    /// Back-to-back flag after this clear
    pub back_to_back: bool,
    /// New level when this clear crossed a threshold
    pub level_up: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEngine {
    score: u32,
    level: u32,
    start_level: u32,
    lines: u32,
    combo: u32,
    max_combo: u32,
    back_to_back: bool,
    stats: Statistics,
}

impl ScoreEngine {
    pub fn new(start_level: u32) -> Self {
        let start_level = start_level.max(1);
        Self {
            score: 0,
            level: start_level,
            start_level,
            lines: 0,
            combo: 0,
            max_combo: 0,
            back_to_back: false,
            stats: Statistics::default(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Score a lock that cleared `lines` rows (0 breaks the combo chain).
    pub fn on_line_clear(&mut self, lines: usize) -> LineClearAward {
        if lines == 0 {
            self.combo = 0;
            self.back_to_back = false;
            return LineClearAward::default();
        }

        let lines = lines.min(4);
        let level = self.level;
        let base = calculate_line_score(lines, level);

        let b2b_applied = qualifies_for_b2b(lines) && self.back_to_back;
        let line_points = if b2b_applied {
            apply_b2b_multiplier(base)
        } else {
            base
        };
        self.back_to_back = qualifies_for_b2b(lines);

        self.combo = self.combo.saturating_add(1);
        self.max_combo = self.max_combo.max(self.combo);
        let combo_bonus = calculate_combo_bonus(self.combo, level);

        match lines {
            1 => self.stats.singles += 1,
            2 => self.stats.doubles += 1,
            3 => self.stats.triples += 1,
            _ => self.stats.tetrises += 1,
        }

        let total = line_points.saturating_add(combo_bonus);
        self.score = self.score.saturating_add(total);
        let level_up = self.add_lines(lines as u32);

        LineClearAward {
            lines: lines as u8,
            line_points,
            combo_bonus,
            total,
            combo: self.combo,
            b2b_applied,
            back_to_back: self.back_to_back,
            level_up,
        }
    }

    pub fn on_soft_drop(&mut self, cells: u32) -> u32 {
        self.stats.soft_drop_cells = self.stats.soft_drop_cells.saturating_add(cells);
        self.award(calculate_drop_score(cells, false))
    }

    pub fn on_hard_drop(&mut self, cells: u32) -> u32 {
        self.stats.hard_drop_cells = self.stats.hard_drop_cells.saturating_add(cells);
        self.award(calculate_drop_score(cells, true))
    }

    pub fn on_perfect_clear(&mut self) -> u32 {
        self.stats.perfect_clears += 1;
        self.award(PERFECT_CLEAR_BONUS.saturating_mul(self.level))
    }

    pub fn on_piece_locked(&mut self) {
        self.stats.pieces_locked = self.stats.pieces_locked.saturating_add(1);
    }

    /// Count cleared lines; returns the new level if it went up.
    pub fn add_lines(&mut self, lines: u32) -> Option<u32> {
        self.lines = self.lines.saturating_add(lines);
        let level = calculate_level(self.start_level, self.lines);
        if level > self.level {
            self.level = level;
            Some(level)
        } else {
            None
        }
    }

    /// Gravity for the current level
    pub fn gravity_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level)
    }

    fn award(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        points
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 1), 300);
        assert_eq!(calculate_line_score(3, 1), 500);
        assert_eq!(calculate_line_score(4, 1), 800);
        assert_eq!(calculate_line_score(4, 3), 2400);
        assert_eq!(calculate_line_score(0, 5), 0);
        assert_eq!(calculate_line_score(5, 5), 0);
    }

    #[test]
    fn test_combo_bonus() {
        assert_eq!(calculate_combo_bonus(0, 1), 0);
        assert_eq!(calculate_combo_bonus(1, 1), 0);
        assert_eq!(calculate_combo_bonus(2, 1), 100);
        assert_eq!(calculate_combo_bonus(3, 2), 300);
    }

    #[test]
    fn test_b2b_multiplier_floors() {
        assert_eq!(apply_b2b_multiplier(800), 1200);
        assert_eq!(apply_b2b_multiplier(101), 151);
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(calculate_drop_score(10, false), 10);
        assert_eq!(calculate_drop_score(10, true), 20);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(calculate_level(1, 0), 1);
        assert_eq!(calculate_level(1, 9), 1);
        assert_eq!(calculate_level(1, 10), 2);
        assert_eq!(calculate_level(1, 25), 3);
        assert_eq!(calculate_level(5, 10), 6);
        assert_eq!(calculate_level(0, 0), 1);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(0), 1000);
        assert_eq!(drop_interval_ms(1), 1000);
        assert_eq!(drop_interval_ms(2), 793);
        assert_eq!(drop_interval_ms(13), 18);
        assert_eq!(drop_interval_ms(14), DROP_INTERVAL_MIN_MS);
        assert_eq!(drop_interval_ms(u32::MAX), DROP_INTERVAL_MIN_MS);
    }

    #[test]
    fn test_soft_drop_interval() {
        assert_eq!(soft_drop_interval_ms(1000, 10), 100);
        assert_eq!(soft_drop_interval_ms(5, 10), 1);
        assert_eq!(soft_drop_interval_ms(50, 0), 50);
    }

    #[test]
    fn test_single_clear() {
        let mut engine = ScoreEngine::new(1);
        let award = engine.on_line_clear(1);
        assert_eq!(award.total, 100);
        assert_eq!(engine.score(), 100);
        assert_eq!(engine.lines(), 1);
        assert_eq!(engine.combo(), 1);
        assert!(!engine.back_to_back());
        assert_eq!(engine.stats().singles, 1);
    }

    #[test]
    fn test_zero_clear_resets_chain() {
        let mut engine = ScoreEngine::new(1);
        engine.on_line_clear(4);
        engine.on_line_clear(1);
        assert_eq!(engine.combo(), 2);

        let award = engine.on_line_clear(0);
        assert_eq!(award.total, 0);
        assert_eq!(engine.combo(), 0);
        assert!(!engine.back_to_back());
        assert_eq!(engine.max_combo(), 2);
    }

    #[test]
    fn test_back_to_back_tetrises() {
        let mut engine = ScoreEngine::new(1);

        let first = engine.on_line_clear(4);
        assert_eq!(first.line_points, 800);
        assert!(!first.b2b_applied);
        assert!(first.back_to_back);

        let second = engine.on_line_clear(4);
        assert!(second.b2b_applied);
        assert_eq!(second.line_points, 1200);
        assert_eq!(second.combo_bonus, 100);
    }

    #[test]
    fn test_non_tetris_breaks_back_to_back() {
        let mut engine = ScoreEngine::new(1);
        engine.on_line_clear(4);
        engine.on_line_clear(2);
        let award = engine.on_line_clear(4);
        assert!(!award.b2b_applied);
        assert_eq!(award.line_points, 800);
    }

    #[test]
    fn test_points_use_level_before_lines_are_added() {
        let mut engine = ScoreEngine::new(1);
        engine.add_lines(8);
        let award = engine.on_line_clear(2);
        assert_eq!(award.line_points, 300);
        assert_eq!(award.level_up, Some(2));
        assert_eq!(engine.level(), 2);
    }

    #[test]
    fn test_perfect_clear_and_drops() {
        let mut engine = ScoreEngine::new(2);
        assert_eq!(engine.on_perfect_clear(), 4000);
        assert_eq!(engine.on_soft_drop(3), 3);
        assert_eq!(engine.on_hard_drop(10), 20);
        assert_eq!(engine.score(), 4023);
        assert_eq!(engine.stats().perfect_clears, 1);
        assert_eq!(engine.stats().hard_drop_cells, 10);
    }

    #[test]
    fn test_score_saturates() {
        let mut engine = ScoreEngine::new(1);
        engine.score = u32::MAX - 1;
        engine.on_hard_drop(10);
        assert_eq!(engine.score(), u32::MAX);
    }
}
