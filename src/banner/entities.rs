//! Components, resources, and messages for the banner scene.

use bevy::prelude::*;

use crate::letters::{GridCell, LetterGrid};

/// Root of the banner scene. Every banner entity — cells, cubes, pending
/// fill timers, explosions, the revealed logo — is a descendant, so one
/// despawn on page exit cancels every outstanding timer.
#[derive(Component)]
pub struct BannerRoot;

/// Marker on the banner's perspective camera.
#[derive(Component)]
pub struct BannerCamera;

/// One cell of the letter board.
#[derive(Component, Reflect)]
pub struct BoardCell {
    /// Grid address of this cell.
    pub cell: GridCell,
    /// Whether the cell belongs to a glyph.
    pub active: bool,
}

/// A cube the user can drag onto the board. Never destroyed during filling;
/// resets to `home` after its letter completes.
#[derive(Component, Reflect)]
pub struct MovableCube {
    /// Stable index into the initial cube set.
    pub index: usize,
    /// Starting position to reset to.
    pub home: Vec3,
}

/// Marker while a cube follows the cursor.
#[derive(Component)]
pub struct DraggingCube;

/// Marker while a released cube descends to rest depth.
#[derive(Component)]
pub struct DroppingCube;

/// A cube spawned by the letter fill animation.
#[derive(Component, Reflect)]
pub struct FillCube;

/// A scheduled fill-cube spawn. The stagger delay lives in the entity's
/// timer; if the stage has advanced by the time it fires, the spawn is
/// suppressed.
#[derive(Component)]
pub struct PendingFillCube {
    /// Cell the cube will occupy.
    pub cell: GridCell,
    /// Delay until the spawn fires.
    pub timer: Timer,
}

/// The static letter grid behind the board.
#[derive(Resource)]
pub struct Board {
    /// Merged occupancy grid with per-letter offsets.
    pub grid: LetterGrid,
}

/// Shared mesh handles for board cells and cubes.
#[derive(Resource)]
pub struct BannerMeshes {
    /// Flat cell box.
    pub cell: Handle<Mesh>,
    /// Unit cube.
    pub cube: Handle<Mesh>,
}

/// Shared material handles for the board's visual states.
#[derive(Resource)]
pub struct BannerMaterials {
    /// Inactive (separator / background) cells.
    pub idle_cell: Handle<StandardMaterial>,
    /// Cells that belong to a glyph.
    pub active_cell: Handle<StandardMaterial>,
    /// Hover highlight for active cells.
    pub hover_cell: Handle<StandardMaterial>,
    /// Movable and fill cubes.
    pub cube: Handle<StandardMaterial>,
}

/// Sent when a released cube finishes its descent onto the board.
#[derive(Message)]
pub struct CubeDropped {
    /// The movable cube entity.
    pub cube: Entity,
    /// Where it came to rest.
    pub world: Vec3,
}

pub use super::progress::{DropOutcome, LetterProgress};
