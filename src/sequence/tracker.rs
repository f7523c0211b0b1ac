//! Completion accounting for the disappear stage.
//!
//! Exploding entities finish in arbitrary order within the frame loop; the
//! tracker only compares final cardinalities against totals snapshotted when
//! the stage began.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

/// Which population an exploding entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ExplosionKind {
    /// A cube spawned by the letter fill animation.
    Cube,
    /// An active board cell.
    Cell,
}

/// Sent exactly once per exploding entity when its lifetime elapses.
#[derive(Message)]
pub struct ExplosionFinished {
    /// The entity that finished exploding.
    pub entity: Entity,
    /// Its population.
    pub kind: ExplosionKind,
}

/// Expected totals plus append-only completion sets for the disappear stage.
///
/// Armed exactly once on entry to the stage; records arriving while disarmed
/// (late callbacks after teardown) are dropped.
#[derive(Resource, Default)]
pub struct ExplosionAccounting {
    armed: bool,
    expected_cubes: usize,
    expected_cells: usize,
    cubes: HashSet<Entity>,
    cells: HashSet<Entity>,
}

impl ExplosionAccounting {
    /// Snapshots the expected totals and clears both completion sets.
    pub fn arm(&mut self, expected_cubes: usize, expected_cells: usize) {
        self.armed = true;
        self.expected_cubes = expected_cubes;
        self.expected_cells = expected_cells;
        self.cubes.clear();
        self.cells.clear();
    }

    /// Disarms and clears; subsequent records are ignored.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether totals have been snapshotted for this session.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Records one completion. Duplicate entities are deduplicated.
    pub fn record(&mut self, kind: ExplosionKind, entity: Entity) {
        if !self.armed {
            return;
        }
        match kind {
            ExplosionKind::Cube => self.cubes.insert(entity),
            ExplosionKind::Cell => self.cells.insert(entity),
        };
    }

    /// True once both completion sets match their snapshotted totals.
    ///
    /// Totals of `(0, 0)` are satisfied immediately; "nothing to explode"
    /// must not stall the sequence.
    pub fn is_satisfied(&self) -> bool {
        self.armed
            && self.cubes.len() == self.expected_cubes
            && self.cells.len() == self.expected_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn unarmed_is_never_satisfied() {
        let acct = ExplosionAccounting::default();
        assert!(!acct.is_satisfied());
    }

    #[test]
    fn zero_totals_are_satisfied_on_arming() {
        let mut acct = ExplosionAccounting::default();
        acct.arm(0, 0);
        assert!(acct.is_satisfied());
    }

    #[test]
    fn satisfied_only_when_both_sets_are_full() {
        let ids = entities(3);
        let mut acct = ExplosionAccounting::default();
        acct.arm(2, 1);

        acct.record(ExplosionKind::Cube, ids[0]);
        assert!(!acct.is_satisfied());
        acct.record(ExplosionKind::Cube, ids[1]);
        assert!(!acct.is_satisfied(), "cells still outstanding");
        acct.record(ExplosionKind::Cell, ids[2]);
        assert!(acct.is_satisfied());
    }

    #[test]
    fn duplicate_completions_count_once() {
        let ids = entities(1);
        let mut acct = ExplosionAccounting::default();
        acct.arm(2, 0);

        acct.record(ExplosionKind::Cube, ids[0]);
        acct.record(ExplosionKind::Cube, ids[0]);
        assert!(!acct.is_satisfied());
    }

    #[test]
    fn completion_order_does_not_matter() {
        let ids = entities(4);
        let mut forward = ExplosionAccounting::default();
        let mut backward = ExplosionAccounting::default();
        forward.arm(2, 2);
        backward.arm(2, 2);

        forward.record(ExplosionKind::Cube, ids[0]);
        forward.record(ExplosionKind::Cube, ids[1]);
        forward.record(ExplosionKind::Cell, ids[2]);
        forward.record(ExplosionKind::Cell, ids[3]);

        backward.record(ExplosionKind::Cell, ids[3]);
        backward.record(ExplosionKind::Cube, ids[1]);
        backward.record(ExplosionKind::Cell, ids[2]);
        backward.record(ExplosionKind::Cube, ids[0]);

        assert!(forward.is_satisfied());
        assert!(backward.is_satisfied());
    }

    #[test]
    fn records_after_reset_are_dropped() {
        let ids = entities(1);
        let mut acct = ExplosionAccounting::default();
        acct.arm(1, 0);
        acct.reset();

        // A late callback arriving after teardown must not resurrect state.
        acct.record(ExplosionKind::Cube, ids[0]);
        assert!(!acct.is_armed());
        assert!(!acct.is_satisfied());
    }

    #[test]
    fn rearming_clears_previous_session() {
        let ids = entities(2);
        let mut acct = ExplosionAccounting::default();
        acct.arm(1, 0);
        acct.record(ExplosionKind::Cube, ids[0]);
        assert!(acct.is_satisfied());

        acct.arm(1, 0);
        assert!(!acct.is_satisfied(), "new session starts empty");
        acct.record(ExplosionKind::Cube, ids[1]);
        assert!(acct.is_satisfied());
    }
}
