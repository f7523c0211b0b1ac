//! Per-letter drop bookkeeping for the cube placement tracker.
//!
//! Deduplication is by grid-cell coordinate, not by cube id: a letter only
//! fills once two *distinct* active cells have received a drop.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::letters::GridCell;

/// Result of registering one drop against a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The letter was already filled; the drop is ignored.
    AlreadyFilled,
    /// The drop was recorded; the letter is not yet filled.
    Registered,
    /// This drop completed the letter. Returned exactly once per letter.
    Completed,
}

/// Completion sets and filled flags for every letter on the board.
///
/// Filled flags are monotonic: once set they stay set for the session.
#[derive(Resource)]
pub struct LetterProgress {
    placed: Vec<HashSet<GridCell>>,
    filled: Vec<bool>,
    required: usize,
}

impl LetterProgress {
    /// Fresh progress for `letter_count` letters, each needing `required`
    /// distinct cell drops to fill.
    pub fn new(letter_count: usize, required: usize) -> Self {
        Self {
            placed: (0..letter_count).map(|_| HashSet::default()).collect(),
            filled: vec![false; letter_count],
            required,
        }
    }

    /// Records a drop on `cell` belonging to `letter`.
    pub fn register_drop(&mut self, letter: usize, cell: GridCell) -> DropOutcome {
        if self.filled[letter] {
            return DropOutcome::AlreadyFilled;
        }
        self.placed[letter].insert(cell);
        if self.placed[letter].len() >= self.required {
            self.filled[letter] = true;
            DropOutcome::Completed
        } else {
            DropOutcome::Registered
        }
    }

    /// Whether letter `i` has filled.
    pub fn is_filled(&self, i: usize) -> bool {
        self.filled[i]
    }

    /// Whether every letter has filled.
    pub fn all_filled(&self) -> bool {
        self.filled.iter().all(|&f| f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: usize, col: usize) -> GridCell {
        GridCell { row, col }
    }

    #[test]
    fn one_drop_does_not_fill() {
        let mut p = LetterProgress::new(3, 2);
        assert_eq!(p.register_drop(0, cell(0, 0)), DropOutcome::Registered);
        assert!(!p.is_filled(0));
    }

    #[test]
    fn same_cell_twice_does_not_fill() {
        let mut p = LetterProgress::new(3, 2);
        p.register_drop(0, cell(0, 0));
        assert_eq!(p.register_drop(0, cell(0, 0)), DropOutcome::Registered);
        assert!(!p.is_filled(0), "duplicate cell must not count twice");
    }

    #[test]
    fn two_distinct_cells_fill_exactly_once() {
        let mut p = LetterProgress::new(3, 2);
        p.register_drop(0, cell(0, 0));
        assert_eq!(p.register_drop(0, cell(0, 1)), DropOutcome::Completed);
        assert!(p.is_filled(0));
        // Further drops are ignored, never a second completion.
        assert_eq!(p.register_drop(0, cell(0, 2)), DropOutcome::AlreadyFilled);
    }

    #[test]
    fn filled_flag_is_monotonic() {
        let mut p = LetterProgress::new(1, 2);
        p.register_drop(0, cell(0, 0));
        p.register_drop(0, cell(1, 0));
        assert!(p.is_filled(0));
        for i in 0..10 {
            p.register_drop(0, cell(i, i));
            assert!(p.is_filled(0));
        }
    }

    #[test]
    fn letters_progress_independently() {
        let mut p = LetterProgress::new(2, 2);
        p.register_drop(0, cell(0, 0));
        p.register_drop(0, cell(0, 1));
        assert!(p.is_filled(0));
        assert!(!p.is_filled(1));
        assert!(!p.all_filled());

        p.register_drop(1, cell(0, 6));
        p.register_drop(1, cell(0, 7));
        assert!(p.all_filled());
    }
}
