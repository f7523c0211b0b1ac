//! Letter bitmaps and the merged occupancy grid behind the banner puzzle.
//!
//! Everything here is plain data with no ECS dependencies: bitmaps go in,
//! a centered occupancy grid with per-letter column offsets comes out. The
//! grid is static for the life of the banner, so callers build it once and
//! keep it in a resource.

use bevy::prelude::{Reflect, Vec2, Vec3};
use thiserror::Error;

/// Construction errors for [`LetterBitmap`] and [`LetterGrid`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LetterGridError {
    /// A bitmap had rows of differing widths.
    #[error("letter bitmap has ragged rows: row {row} is {got} wide, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Width found at that row.
        got: usize,
        /// Width of row 0.
        expected: usize,
    },
    /// A bitmap had no rows or no columns.
    #[error("letter bitmap must have at least one row and one column")]
    EmptyBitmap,
    /// The grid was built from an empty letter list.
    #[error("letter grid needs at least one letter")]
    NoLetters,
    /// Letters in one grid must share a row count.
    #[error("letter {letter} has {got} rows, expected {expected} (all letters must match)")]
    RowCountMismatch {
        /// Index of the offending letter.
        letter: usize,
        /// Row count found.
        got: usize,
        /// Row count of letter 0.
        expected: usize,
    },
}

/// One glyph as a row-major 0/1 matrix. Row 0 is the top of the glyph.
#[derive(Debug, Clone)]
pub struct LetterBitmap {
    rows: Vec<Vec<bool>>,
}

impl LetterBitmap {
    /// Builds a bitmap from row slices, rejecting ragged or empty input.
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self, LetterGridError> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(LetterGridError::EmptyBitmap);
        }
        let expected = rows[0].len();
        for (row, r) in rows.iter().enumerate() {
            if r.len() != expected {
                return Err(LetterGridError::RaggedRows {
                    row,
                    got: r.len(),
                    expected,
                });
            }
        }
        Ok(Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|&v| v != 0).collect())
                .collect(),
        })
    }

    /// Number of rows in the glyph.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the glyph.
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    fn is_set(&self, row: usize, col: usize) -> bool {
        self.rows[row][col]
    }
}

/// A single occupancy cell address in the merged grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct GridCell {
    /// Row index, 0 at the top.
    pub row: usize,
    /// Column index across the whole merged grid.
    pub col: usize,
}

/// Merged occupancy grid for an ordered list of letters, with one blank
/// separator column between adjacent letters.
///
/// World mapping centers the grid on the origin in the XY plane:
/// `x = col - cols / 2`, `y = rows / 2 - row` (integer division, matching
/// the board's 1-unit cell size).
#[derive(Debug)]
pub struct LetterGrid {
    cells: Vec<Vec<bool>>,
    start_cols: Vec<usize>,
    widths: Vec<usize>,
    rows: usize,
    cols: usize,
}

impl LetterGrid {
    /// Merges `letters` into one grid.
    ///
    /// Fails fast when the list is empty or row counts differ; a silently
    /// corrupt grid is never produced.
    pub fn new(letters: &[LetterBitmap]) -> Result<Self, LetterGridError> {
        if letters.is_empty() {
            return Err(LetterGridError::NoLetters);
        }
        let rows = letters[0].height();
        for (i, letter) in letters.iter().enumerate() {
            if letter.height() != rows {
                return Err(LetterGridError::RowCountMismatch {
                    letter: i,
                    got: letter.height(),
                    expected: rows,
                });
            }
        }

        let cols = letters.iter().map(|l| l.width() + 1).sum::<usize>() - 1;
        let mut cells = vec![vec![false; cols]; rows];
        let mut start_cols = Vec::with_capacity(letters.len());
        let mut widths = Vec::with_capacity(letters.len());

        let mut current_col = 0;
        for letter in letters {
            start_cols.push(current_col);
            widths.push(letter.width());
            for row in 0..rows {
                for col in 0..letter.width() {
                    cells[row][current_col + col] = letter.is_set(row, col);
                }
            }
            current_col += letter.width() + 1;
        }

        Ok(Self {
            cells,
            start_cols,
            widths,
            rows,
            cols,
        })
    }

    // ── Shape queries ──────────────────────────────────────────────

    /// Total rows in the merged grid.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total columns, including separator columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of letters in the grid.
    pub fn letter_count(&self) -> usize {
        self.start_cols.len()
    }

    /// Starting column of letter `i`.
    pub fn start_col(&self, i: usize) -> usize {
        self.start_cols[i]
    }

    /// Whether `cell` is inside the grid and part of a glyph.
    pub fn is_active(&self, cell: GridCell) -> bool {
        cell.row < self.rows && cell.col < self.cols && self.cells[cell.row][cell.col]
    }

    /// Total number of active cells across all letters.
    pub fn active_cell_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&c| c).count())
            .sum()
    }

    // ── Letter resolution ──────────────────────────────────────────

    /// Resolves a column to the letter occupying it, scanning cumulative
    /// column ranges. Separator columns resolve to `None`.
    pub fn letter_at_col(&self, col: usize) -> Option<usize> {
        for (i, (&start, &width)) in self.start_cols.iter().zip(&self.widths).enumerate() {
            if col >= start && col < start + width {
                return Some(i);
            }
        }
        None
    }

    /// All active cells of letter `i`, in row-major order.
    pub fn letter_cells(&self, i: usize) -> Vec<GridCell> {
        let start = self.start_cols[i];
        let width = self.widths[i];
        let mut out = Vec::new();
        for row in 0..self.rows {
            for col in start..start + width {
                if self.cells[row][col] {
                    out.push(GridCell { row, col });
                }
            }
        }
        out
    }

    /// Active cells of letter `i` sorted for the fill animation: highest
    /// world Y first (top rows before bottom rows), left to right within a
    /// row.
    pub fn fall_order_cells(&self, i: usize) -> Vec<GridCell> {
        let mut cells = self.letter_cells(i);
        cells.sort_by(|a, b| a.row.cmp(&b.row).then(a.col.cmp(&b.col)));
        cells
    }

    // ── World mapping ──────────────────────────────────────────────

    /// World-space XY center of a cell, grid centered on the origin.
    pub fn cell_center(&self, cell: GridCell) -> Vec2 {
        Vec2::new(
            cell.col as f32 - (self.cols / 2) as f32,
            (self.rows / 2) as f32 - cell.row as f32,
        )
    }

    /// World-space position of a cell at depth `z`.
    pub fn cell_world(&self, cell: GridCell, z: f32) -> Vec3 {
        let c = self.cell_center(cell);
        Vec3::new(c.x, c.y, z)
    }

    /// Inverse of [`Self::cell_center`]: snaps a world XY position to the
    /// nearest cell, or `None` when it lands outside the grid.
    pub fn cell_at(&self, pos: Vec2) -> Option<GridCell> {
        let col = pos.x.round() + (self.cols / 2) as f32;
        let row = (self.rows / 2) as f32 - pos.y.round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows && col < self.cols).then_some(GridCell { row, col })
    }
}

// ── Built-in glyphs ─────────────────────────────────────────────────

const P: &[&[u8]] = &[
    &[1, 1, 1, 1, 1],
    &[1, 0, 0, 0, 1],
    &[1, 1, 1, 1, 1],
    &[1, 0, 0, 0, 0],
    &[1, 0, 0, 0, 0],
];

const G: &[&[u8]] = &[
    &[0, 1, 1, 1, 0],
    &[1, 0, 0, 0, 0],
    &[1, 0, 1, 1, 1],
    &[1, 0, 0, 0, 1],
    &[0, 1, 1, 1, 0],
];

const A: &[&[u8]] = &[
    &[0, 1, 1, 1, 0],
    &[1, 0, 0, 0, 1],
    &[1, 1, 1, 1, 1],
    &[1, 0, 0, 0, 1],
    &[1, 0, 0, 0, 1],
];

/// The banner's default "P G A" letter set.
pub fn default_letters() -> Vec<LetterBitmap> {
    [P, G, A]
        .iter()
        .map(|rows| LetterBitmap::from_rows(rows).expect("built-in glyphs are well-formed"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pga_grid() -> LetterGrid {
        LetterGrid::new(&default_letters()).unwrap()
    }

    // ── Construction ───────────────────────────────────────────────

    #[test]
    fn column_count_is_sum_of_widths_plus_separators() {
        let grid = pga_grid();
        // 5 + 1 + 5 + 1 + 5
        assert_eq!(grid.cols(), 17);
        assert_eq!(grid.rows(), 5);
    }

    #[test]
    fn start_cols_are_prefix_sums() {
        let grid = pga_grid();
        assert_eq!(grid.start_col(0), 0);
        assert_eq!(grid.start_col(1), 6);
        assert_eq!(grid.start_col(2), 12);
    }

    #[test]
    fn empty_letter_list_is_rejected() {
        assert_eq!(LetterGrid::new(&[]).unwrap_err(), LetterGridError::NoLetters);
    }

    #[test]
    fn mismatched_row_counts_fail_fast() {
        let tall = LetterBitmap::from_rows(&[&[1], &[1], &[1]]).unwrap();
        let short = LetterBitmap::from_rows(&[&[1], &[1]]).unwrap();
        let err = LetterGrid::new(&[tall, short]).unwrap_err();
        assert_eq!(
            err,
            LetterGridError::RowCountMismatch {
                letter: 1,
                got: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn ragged_bitmap_is_rejected() {
        let err = LetterBitmap::from_rows(&[&[1, 0], &[1]]).unwrap_err();
        assert_eq!(
            err,
            LetterGridError::RaggedRows {
                row: 1,
                got: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn empty_bitmap_is_rejected() {
        assert_eq!(
            LetterBitmap::from_rows(&[]).unwrap_err(),
            LetterGridError::EmptyBitmap
        );
    }

    // ── Occupancy ──────────────────────────────────────────────────

    #[test]
    fn separator_columns_are_inactive() {
        let grid = pga_grid();
        for row in 0..grid.rows() {
            assert!(!grid.is_active(GridCell { row, col: 5 }));
            assert!(!grid.is_active(GridCell { row, col: 11 }));
        }
    }

    #[test]
    fn occupancy_matches_bitmaps() {
        let grid = pga_grid();
        // P's top row is fully set.
        for col in 0..5 {
            assert!(grid.is_active(GridCell { row: 0, col }));
        }
        // G's top-left corner is clear (col 6 is G's start).
        assert!(!grid.is_active(GridCell { row: 0, col: 6 }));
        assert!(grid.is_active(GridCell { row: 0, col: 7 }));
    }

    #[test]
    fn out_of_bounds_is_inactive() {
        let grid = pga_grid();
        assert!(!grid.is_active(GridCell { row: 99, col: 0 }));
        assert!(!grid.is_active(GridCell { row: 0, col: 99 }));
    }

    #[test]
    fn active_cell_count_sums_letters() {
        let grid = pga_grid();
        let by_letter: usize = (0..3).map(|i| grid.letter_cells(i).len()).sum();
        assert_eq!(grid.active_cell_count(), by_letter);
        // P = 14, G = 13, A = 14 set bits.
        assert_eq!(grid.letter_cells(0).len(), 14);
        assert_eq!(grid.letter_cells(1).len(), 13);
        assert_eq!(grid.letter_cells(2).len(), 14);
    }

    // ── Letter resolution ──────────────────────────────────────────

    #[test]
    fn columns_resolve_to_their_letter() {
        let grid = pga_grid();
        assert_eq!(grid.letter_at_col(0), Some(0));
        assert_eq!(grid.letter_at_col(4), Some(0));
        assert_eq!(grid.letter_at_col(5), None);
        assert_eq!(grid.letter_at_col(6), Some(1));
        assert_eq!(grid.letter_at_col(12), Some(2));
        assert_eq!(grid.letter_at_col(16), Some(2));
        assert_eq!(grid.letter_at_col(17), None);
    }

    // ── Fall order ─────────────────────────────────────────────────

    #[test]
    fn fall_order_is_top_to_bottom() {
        let grid = pga_grid();
        let order = grid.fall_order_cells(0);
        assert_eq!(order.len(), 14);
        for pair in order.windows(2) {
            assert!(
                pair[0].row < pair[1].row
                    || (pair[0].row == pair[1].row && pair[0].col < pair[1].col),
                "cells must fall top-first: {pair:?}"
            );
        }
    }

    // ── World mapping ──────────────────────────────────────────────

    #[test]
    fn grid_is_centered_on_origin() {
        let grid = pga_grid();
        let top_left = grid.cell_center(GridCell { row: 0, col: 0 });
        assert_eq!(top_left, Vec2::new(-8.0, 2.0));
        let center = grid.cell_center(GridCell { row: 2, col: 8 });
        assert_eq!(center, Vec2::ZERO);
    }

    #[test]
    fn cell_at_inverts_cell_center() {
        let grid = pga_grid();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let cell = GridCell { row, col };
                assert_eq!(grid.cell_at(grid.cell_center(cell)), Some(cell));
            }
        }
    }

    #[test]
    fn cell_at_snaps_fractional_positions() {
        let grid = pga_grid();
        assert_eq!(
            grid.cell_at(Vec2::new(-7.7, 1.6)),
            Some(GridCell { row: 0, col: 0 })
        );
    }

    #[test]
    fn cell_at_outside_grid_is_none() {
        let grid = pga_grid();
        assert_eq!(grid.cell_at(Vec2::new(-20.0, 0.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(20.0, 0.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(0.0, 50.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(0.0, -50.0)), None);
    }

    #[test]
    fn cell_world_uses_depth() {
        let grid = pga_grid();
        let pos = grid.cell_world(GridCell { row: 2, col: 8 }, 0.5);
        assert_eq!(pos, Vec3::new(0.0, 0.0, 0.5));
    }
}
