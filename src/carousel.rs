//! Project showcase: nine cards on a rotating ring, scroll to browse,
//! click to bring a card to the front, with an info panel for the
//! selected project. Mounted on [`Page::Projects`].

mod entities;
mod systems;

pub use entities::{
    CarouselCamera, CarouselCard, CarouselRing, CarouselRoot, ProjectCard, SelectedProject,
    project_cards,
};

use bevy::prelude::*;

use crate::Page;

/// Per-plugin configuration for the project carousel.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CarouselConfig {
    /// Scene background.
    pub clear_color: Color,
    /// Camera position.
    pub camera_position: Vec3,
    /// Ring radius.
    pub radius: f32,
    /// Card width.
    pub card_width: f32,
    /// Card height.
    pub card_height: f32,
    /// Exponential approach rate for the ring yaw (per second).
    pub rotation_rate: f32,
    /// Yaw added per scroll-wheel line.
    pub scroll_step: f32,
    /// Exponential approach rate for card scale and lift (per second).
    pub card_rate: f32,
    /// Scale of a hovered card.
    pub hover_scale: f32,
    /// Scale of the selected card.
    pub selected_scale: f32,
    /// Y lift of the selected card.
    pub selected_lift: f32,
    /// Info panel text color.
    pub panel_text_color: Color,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::srgb_u8(0x12, 0x12, 0x14),
            camera_position: Vec3::new(0.0, 1.6, 7.5),
            radius: 3.2,
            card_width: 1.6,
            card_height: 1.0,
            rotation_rate: 6.0,
            scroll_step: 0.25,
            card_rate: 10.0,
            hover_scale: 1.08,
            selected_scale: 1.2,
            selected_lift: 0.3,
            panel_text_color: Color::srgb_u8(0xf5, 0xf5, 0xf5),
        }
    }
}

/// Carousel plugin: scene lifecycle on [`Page::Projects`] plus its drivers.
pub struct CarouselPlugin(pub CarouselConfig);

impl Plugin for CarouselPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CarouselConfig>()
            .register_type::<CarouselRing>()
            .register_type::<CarouselCard>()
            .register_type::<SelectedProject>()
            .insert_resource(self.0.clone())
            .init_resource::<SelectedProject>()
            .add_systems(OnEnter(Page::Projects), systems::spawn_carousel)
            .add_systems(OnExit(Page::Projects), systems::despawn_carousel)
            .add_systems(
                Update,
                (
                    systems::scroll_ring,
                    systems::rotate_ring,
                    systems::animate_cards,
                    systems::update_panel,
                )
                    .run_if(in_state(Page::Projects)),
            );
    }
}
