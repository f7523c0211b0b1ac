//! Components for the navbar overlay.

use bevy::prelude::*;

use crate::Page;

/// The extruded logo travelling across the top of the screen.
#[derive(Component, Reflect)]
pub struct NavLogo {
    /// Fires once per particle emission while the logo is moving.
    pub emission: Timer,
}

/// One particle trailing the travelling logo. Lifetime lives on the entity,
/// so despawning the entity cancels its fade.
#[derive(Component, Reflect)]
pub struct NavParticle {
    /// Constant linear velocity.
    pub velocity: Vec3,
    /// Remaining lifetime.
    pub timer: Timer,
}

/// A navigation label that reveals once the logo passes its threshold.
#[derive(Component, Reflect)]
pub struct NavLabel {
    /// Page this label navigates to when clicked; `None` for labels that
    /// have no page behind them yet.
    pub target: Option<Page>,
    /// Logo X coordinate past which the label reveals.
    pub threshold: f32,
    /// Latched once the threshold is crossed; never cleared.
    pub revealed: bool,
    /// Reveal animation progress in [0, 1].
    pub progress: f32,
}
