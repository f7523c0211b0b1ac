//! Persistent navbar overlay: the extruded logo travels across the top of
//! the screen on its own camera, trailing particles, and navigation labels
//! fade in as it passes them.

mod entities;
mod systems;

pub use entities::{NavLabel, NavLogo, NavParticle};
pub use systems::NAV_LAYER;

use bevy::prelude::*;

/// Per-plugin configuration for the navbar overlay.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct NavbarConfig {
    /// Logo X at spawn.
    pub start_x: f32,
    /// Logo X at the end of its run.
    pub end_x: f32,
    /// Logo Y in overlay space.
    pub logo_y: f32,
    /// Travel speed (world units per second).
    pub speed: f32,
    /// Particles emitted per second while moving.
    pub emission_rate: f32,
    /// Particle lifetime (seconds).
    pub particle_lifetime: f32,
    /// Particle sphere radius.
    pub particle_radius: f32,
    /// Colors sampled uniformly per particle.
    pub palette: Vec<Color>,
    /// Nav label text color at full reveal.
    pub label_color: Color,
    /// Logo X thresholds past which each label reveals, in label order.
    pub label_thresholds: Vec<f32>,
    /// Duration of a label's fade-in (seconds).
    pub reveal_duration: f32,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            start_x: -8.0,
            end_x: 6.6,
            logo_y: 4.6,
            speed: 3.0,
            emission_rate: 60.0,
            particle_lifetime: 0.8,
            particle_radius: 0.06,
            palette: vec![
                Color::srgb_u8(0x01, 0x39, 0xff),
                Color::srgb_u8(0x1d, 0x1d, 0x1b),
            ],
            label_color: Color::srgb_u8(0x1d, 0x1d, 0x1b),
            label_thresholds: vec![0.0, 3.0, 5.5],
            reveal_duration: 0.35,
        }
    }
}

/// Navbar plugin: overlay camera, travelling logo, particles, labels.
pub struct NavbarPlugin(pub NavbarConfig);

impl Plugin for NavbarPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<NavbarConfig>()
            .register_type::<NavLogo>()
            .register_type::<NavParticle>()
            .register_type::<NavLabel>()
            .insert_resource(self.0.clone())
            .add_systems(
                Startup,
                systems::spawn_navbar.after(crate::logo::build_logo_meshes),
            )
            .add_systems(
                Update,
                (
                    systems::drive_logo,
                    systems::animate_particles,
                    systems::reveal_labels,
                    systems::handle_label_clicks,
                ),
            );
    }
}
