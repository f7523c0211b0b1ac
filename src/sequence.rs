//! Banner stage sequencer: filling → camera move → disappear → logo.
//!
//! Owns the [`BannerStage`] state. All other modules read the stage and gate
//! their systems on it; only systems in this module write transitions, and
//! every transition goes through [`BannerStage::next`], so stages can never
//! be skipped or revisited.

mod systems;
mod tracker;

pub use tracker::{ExplosionAccounting, ExplosionFinished, ExplosionKind};

use bevy::prelude::*;

use crate::Page;

/// Phases of the banner animation, strictly ordered and one-directional.
///
/// Modeled as a sub-state of [`Page::Home`]: the stage exists only while the
/// banner is mounted, and remounting the page starts a fresh session at
/// [`BannerStage::Filling`].
#[derive(SubStates, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
#[source(Page = Page::Home)]
pub enum BannerStage {
    /// The user drags cubes onto letters.
    #[default]
    Filling,
    /// The camera glides toward its showcase pose.
    CameraMove,
    /// Board cells and fill cubes explode outward and fade.
    Disappear,
    /// The extruded logo scales in. Terminal.
    Logo,
}

impl BannerStage {
    /// The only stage reachable from `self`, or `None` at the terminal stage.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Filling => Some(Self::CameraMove),
            Self::CameraMove => Some(Self::Disappear),
            Self::Disappear => Some(Self::Logo),
            Self::Logo => None,
        }
    }
}

/// Per-plugin configuration for the stage sequencer.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct SequenceConfig {
    /// Camera position at the end of the camera-move stage.
    pub camera_target: Vec3,
    /// Exponential approach rate for the camera glide (per second).
    pub camera_rate: f32,
    /// Positional arrival tolerance (world units).
    pub pos_tolerance: f32,
    /// Angular arrival tolerance (radians).
    pub rot_tolerance: f32,
    /// Lifetime of each exploding entity (seconds).
    pub explosion_duration: f32,
    /// Minimum initial outward speed of exploding entities.
    pub explosion_speed_min: f32,
    /// Maximum initial outward speed of exploding entities.
    pub explosion_speed_max: f32,
    /// Exponential velocity damping for exploding entities (per second).
    pub explosion_damping: f32,
    /// Maximum random spin of exploding entities (radians per second).
    pub explosion_spin: f32,
    /// World position of the revealed logo group.
    pub logo_position: Vec3,
    /// Starting scale of the logo reveal.
    pub logo_epsilon: f32,
    /// Final scale of the logo reveal.
    pub logo_scale: f32,
    /// Exponential approach rate for the logo scale-in (per second).
    pub logo_rate: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            camera_target: Vec3::new(0.0, 0.0, 9.0),
            camera_rate: 2.5,
            pos_tolerance: 0.05,
            rot_tolerance: 0.02,
            explosion_duration: 1.5,
            explosion_speed_min: 4.0,
            explosion_speed_max: 9.0,
            explosion_damping: 1.6,
            explosion_spin: 6.0,
            logo_position: Vec3::new(0.0, 0.0, 2.0),
            logo_epsilon: 0.01,
            logo_scale: 5.0,
            logo_rate: 4.0,
        }
    }
}

/// Stage sequencer plugin: owns [`BannerStage`] and the explosion accounting.
pub struct SequencePlugin(pub SequenceConfig);

impl Plugin for SequencePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BannerStage>()
            .register_type::<SequenceConfig>()
            .register_type::<systems::Exploding>()
            .insert_resource(self.0.clone())
            .init_resource::<ExplosionAccounting>()
            .add_message::<ExplosionFinished>()
            .add_sub_state::<BannerStage>()
            .add_systems(
                Update,
                systems::advance_when_filled.run_if(in_state(BannerStage::Filling)),
            )
            .add_systems(
                Update,
                systems::drive_camera_move.run_if(in_state(BannerStage::CameraMove)),
            )
            .add_systems(OnEnter(BannerStage::Disappear), systems::detonate)
            .add_systems(
                Update,
                (
                    systems::animate_explosions,
                    systems::collect_explosions,
                    systems::advance_when_settled,
                )
                    .chain()
                    .run_if(in_state(BannerStage::Disappear)),
            )
            .add_systems(OnEnter(BannerStage::Logo), systems::reveal_logo)
            .add_systems(
                Update,
                systems::scale_in_logo.run_if(in_state(BannerStage::Logo)),
            )
            .add_systems(OnExit(Page::Home), systems::reset_accounting);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_is_strict() {
        assert_eq!(BannerStage::Filling.next(), Some(BannerStage::CameraMove));
        assert_eq!(
            BannerStage::CameraMove.next(),
            Some(BannerStage::Disappear)
        );
        assert_eq!(BannerStage::Disappear.next(), Some(BannerStage::Logo));
    }

    #[test]
    fn logo_is_terminal() {
        assert_eq!(BannerStage::Logo.next(), None);
    }

    #[test]
    fn chain_visits_every_stage_once() {
        let mut seen = vec![BannerStage::default()];
        while let Some(next) = seen.last().unwrap().next() {
            assert!(!seen.contains(&next), "stage revisited: {next:?}");
            seen.push(next);
        }
        assert_eq!(seen.len(), 4);
    }
}
