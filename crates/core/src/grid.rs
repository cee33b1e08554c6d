//! Grid module - the matrix of locked cells
//!
//! The grid is `width` columns by `visible_height + hidden_rows` rows. Row 0 is
//! the top of the hidden buffer; the visible playfield is the bottom
//! `visible_height` rows. Cells are stored in a flat row-major array.
//!
//! Only two operations mutate the grid during play: [`Grid::place`] when a piece
//! locks and [`Grid::clear_rows`] when completed rows collapse.

use crate::types::{Cell, MinoOffset, PieceKind, BOARD_WIDTH, HIDDEN_ROWS, VISIBLE_HEIGHT};

/// Fixed-size matrix of locked cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    hidden_rows: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid with `hidden_rows` buffer rows on top of `visible_height`.
    pub fn new(width: u8, visible_height: u8, hidden_rows: u8) -> Self {
        let height = visible_height.saturating_add(hidden_rows);
        Self {
            width,
            height,
            hidden_rows,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Standard 10 x (20 + 2) grid.
    pub fn standard() -> Self {
        Self::new(BOARD_WIDTH, VISIBLE_HEIGHT, HIDDEN_ROWS)
    }

    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if !self.is_inside(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Total height including hidden rows
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn visible_height(&self) -> u8 {
        self.height - self.hidden_rows
    }

    pub fn hidden_rows(&self) -> u8 {
        self.hidden_rows
    }

    /// True iff `0 <= x < width` and `0 <= y < height`
    #[inline]
    pub fn is_inside(&self, x: i8, y: i8) -> bool {
        x >= 0 && (x as i16) < self.width as i16 && y >= 0 && (y as i16) < self.height as i16
    }

    /// Get cell at position (x, y); `None` if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y); returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Occupied or outside the grid
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        !matches!(self.get(x, y), Some(None))
    }

    /// Inside the grid and empty
    #[inline]
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Whether every mino of `shape` at origin (x, y) is inside and unoccupied
    pub fn can_place(&self, shape: &[MinoOffset], x: i8, y: i8) -> bool {
        shape.iter().all(|&(dx, dy)| {
            match (x.checked_add(dx), y.checked_add(dy)) {
                (Some(px), Some(py)) => self.is_free(px, py),
                _ => false,
            }
        })
    }

    /// Write `kind` into every mino of `shape` at origin (x, y).
    ///
    /// No validation: the caller checks [`Grid::can_place`] first.
    pub fn place(&mut self, shape: &[MinoOffset], x: i8, y: i8, kind: PieceKind) {
        debug_assert!(
            self.can_place(shape, x, y),
            "place() at ({}, {}) overlaps or leaves the grid",
            x,
            y
        );
        for &(dx, dy) in shape {
            self.set(x.wrapping_add(dx), y.wrapping_add(dy), Some(kind));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        let width = self.width as usize;
        let start = y * width;
        self.cells[start..start + width].iter().all(|cell| cell.is_some())
    }

    /// Indices of all full rows, top to bottom
    pub fn find_completed_rows(&self) -> Vec<usize> {
        (0..self.height as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Remove the listed rows and compact the rest downward.
    ///
    /// Rows may be given in any order; duplicates and out-of-range indices are
    /// ignored. Surviving rows keep their relative order and the top is refilled
    /// with empty rows. Returns the number of rows removed.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut write_y = height;

        // Two-pointer compaction from the bottom up.
        for read_y in (0..height).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        write_y
    }

    /// Perfect-clear check: no locked cell anywhere on the grid.
    ///
    /// Hidden rows are included. A lock that leaves cells up there ends the
    /// game anyway, so a visible-only check would never disagree in play.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Whether any locked cell sits in the hidden buffer rows.
    pub fn hidden_rows_occupied(&self) -> bool {
        let end = self.hidden_rows as usize * self.width as usize;
        self.cells[..end].iter().any(|cell| cell.is_some())
    }

    /// Rows top to bottom (hidden rows first)
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width as usize)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of locked cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a grid from text rows for tests and fixtures.
    ///
    /// Rows are listed bottom-aligned: the last string is the bottom row. `.` is
    /// empty, a piece letter fills with that kind, anything else fills with `I`.
    pub fn from_rows(width: u8, visible_height: u8, hidden_rows: u8, rows: &[&str]) -> Self {
        let mut grid = Self::new(width, visible_height, hidden_rows);
        let height = grid.height as usize;
        for (i, row) in rows.iter().rev().enumerate() {
            if i >= height {
                break;
            }
            let y = (height - 1 - i) as i8;
            for (x, ch) in row.chars().enumerate().take(width as usize) {
                let cell = match ch {
                    '.' | ' ' => None,
                    other => Some(PieceKind::from_str(&other.to_string()).unwrap_or(PieceKind::I)),
                };
                grid.set(x as i8, y, cell);
            }
        }
        grid
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::standard()
    }
}
