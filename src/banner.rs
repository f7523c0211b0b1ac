//! The letter-board banner: a grid spelling "PGA", six draggable cubes, and
//! the fill animation that covers each letter once the user has dropped
//! cubes on two distinct cells of it.
//!
//! The stage machine that takes over after all letters fill lives in
//! [`crate::sequence`]; this module only plays the filling stage and owns
//! the scene lifecycle on [`Page::Home`].

mod entities;
mod progress;
mod systems;

pub use entities::{
    BannerCamera, BannerMaterials, BannerMeshes, BannerRoot, Board, BoardCell, CubeDropped,
    DraggingCube, DroppingCube, FillCube, MovableCube, PendingFillCube,
};
pub use progress::{DropOutcome, LetterProgress};

use bevy::prelude::*;

use crate::Page;
use crate::sequence::BannerStage;

/// Per-plugin configuration for the banner scene.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct BannerConfig {
    /// Scene background.
    pub clear_color: Color,
    /// Movable and fill cubes.
    pub cube_color: Color,
    /// Cells belonging to a glyph.
    pub active_cell_color: Color,
    /// Separator and background cells.
    pub idle_cell_color: Color,
    /// Hover highlight on active cells.
    pub hover_cell_color: Color,
    /// Thickness of a board cell.
    pub cell_depth: f32,
    /// Camera position while the puzzle is live.
    pub camera_start: Vec3,
    /// Vertical field of view in degrees.
    pub camera_fov: f32,
    /// Starting positions of the draggable cubes.
    pub initial_cube_positions: Vec<Vec3>,
    /// Height a dragged cube hovers at above the board plane.
    pub drag_height: f32,
    /// Height a cube rests at once dropped.
    pub cube_rest_height: f32,
    /// Descent speed of a released cube (world units per second).
    pub drop_speed: f32,
    /// Delay between consecutive fill-cube spawns (seconds).
    pub fill_stride: f32,
    /// Distinct active cells needed to fill a letter.
    pub required_cells: usize,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::srgb_u8(0xf2, 0xf2, 0xf4),
            cube_color: Color::srgb_u8(0x04, 0x00, 0xff),
            active_cell_color: Color::srgb_u8(0xd8, 0xd7, 0xd7),
            idle_cell_color: Color::srgb_u8(0xf5, 0xf5, 0xf5),
            hover_cell_color: Color::srgb_u8(0x00, 0x7a, 0xff),
            cell_depth: 0.5,
            camera_start: Vec3::new(0.0, -5.0, 15.0),
            camera_fov: 50.0,
            initial_cube_positions: vec![
                Vec3::new(0.0, -6.0, 0.5),
                Vec3::new(2.0, -6.0, 0.5),
                Vec3::new(-2.0, -6.0, 0.5),
                Vec3::new(4.0, -6.0, 0.5),
                Vec3::new(-4.0, -6.0, 0.5),
                Vec3::new(6.0, -6.0, 0.5),
            ],
            drag_height: 1.2,
            cube_rest_height: 0.5,
            drop_speed: 12.0,
            fill_stride: 0.05,
            required_cells: 2,
        }
    }
}

/// Banner plugin: board lifecycle, cube drag/drop, letter fill animation.
pub struct BannerPlugin(pub BannerConfig);

impl Plugin for BannerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BannerConfig>()
            .register_type::<BoardCell>()
            .register_type::<MovableCube>()
            .register_type::<FillCube>()
            .insert_resource(self.0.clone())
            .add_message::<CubeDropped>()
            .add_systems(OnEnter(Page::Home), systems::spawn_banner)
            .add_systems(OnExit(Page::Home), systems::despawn_banner)
            .add_systems(
                Update,
                (systems::drag_cubes, systems::descend_cubes)
                    .chain()
                    .run_if(in_state(Page::Home)),
            )
            .add_systems(
                Update,
                systems::handle_drops
                    .after(systems::descend_cubes)
                    .run_if(in_state(BannerStage::Filling)),
            )
            .add_systems(
                Update,
                systems::tick_pending_fills.run_if(in_state(Page::Home)),
            );
    }
}
