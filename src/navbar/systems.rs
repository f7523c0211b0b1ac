//! Navbar systems: travelling logo, particle trail, label reveal.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::camera::visibility::RenderLayers;
use bevy::render::view::Hdr;
use rand::Rng;

use super::NavbarConfig;
use super::entities::{NavLabel, NavLogo, NavParticle};
use crate::Page;
use crate::logo::LogoMeshes;
use crate::math;

/// Render layer reserved for the navbar overlay scene.
pub const NAV_LAYER: usize = 1;

const LABELS: [(&str, Option<Page>); 3] = [
    ("Home", Some(Page::Home)),
    ("Projects", Some(Page::Projects)),
    ("Contact", None),
];

/// Shared handles for the navbar overlay.
#[derive(Resource)]
pub struct NavbarAssets {
    /// Particle billboard mesh.
    pub particle: Handle<Mesh>,
}

/// Spawns the overlay camera, the travelling logo, and the nav labels.
///
/// Everything here is spawned once at startup and survives page switches;
/// the overlay camera doubles as the UI camera.
pub fn spawn_navbar(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<NavbarConfig>,
    logo: Res<LogoMeshes>,
) {
    commands.spawn((
        Name::new("NavbarCamera"),
        Camera3d::default(),
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: 0.2,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
        Transform::from_xyz(0.0, 0.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
        RenderLayers::layer(NAV_LAYER),
        IsDefaultUiCamera,
    ));

    let travel = commands
        .spawn((
            NavLogo {
                emission: Timer::from_seconds(1.0 / cfg.emission_rate, TimerMode::Repeating),
            },
            Name::new("NavLogo"),
            Transform::from_xyz(cfg.start_x, cfg.logo_y, 0.0),
            Visibility::default(),
            RenderLayers::layer(NAV_LAYER),
        ))
        .id();
    for (mesh, color) in &logo.parts {
        let material = materials.add(StandardMaterial {
            base_color: *color,
            unlit: true,
            ..default()
        });
        let part = commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material),
                RenderLayers::layer(NAV_LAYER),
            ))
            .id();
        commands.entity(travel).add_child(part);
    }

    let bar = commands
        .spawn((
            Name::new("NavLabels"),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(14.0),
                right: Val::Px(28.0),
                column_gap: Val::Px(24.0),
                ..default()
            },
        ))
        .id();
    for (i, (label, target)) in LABELS.into_iter().enumerate() {
        let threshold = cfg
            .label_thresholds
            .get(i)
            .copied()
            .unwrap_or(cfg.end_x);
        let id = commands
            .spawn((
                NavLabel {
                    target,
                    threshold,
                    revealed: false,
                    progress: 0.0,
                },
                Name::new(format!("NavLabel({label})")),
                Button,
                Text::new(label),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(cfg.label_color.with_alpha(0.0)),
            ))
            .id();
        commands.entity(bar).add_child(id);
    }

    commands.insert_resource(NavbarAssets {
        particle: meshes.add(Sphere::new(cfg.particle_radius)),
    });
}

/// Moves the logo rightward, clamped at the end of its run, emitting trail
/// particles at a fixed rate while in motion.
pub fn drive_logo(
    time: Res<Time>,
    cfg: Res<NavbarConfig>,
    assets: Res<NavbarAssets>,
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&mut Transform, &mut NavLogo)>,
) {
    let Ok((mut transform, mut logo)) = query.single_mut() else {
        return;
    };
    if transform.translation.x >= cfg.end_x {
        return;
    }
    transform.translation.x =
        (transform.translation.x + cfg.speed * time.delta_secs()).min(cfg.end_x);

    logo.emission.tick(time.delta());
    let mut rng = rand::thread_rng();
    for _ in 0..logo.emission.times_finished_this_tick() {
        let offset = Vec3::new(
            rng.gen_range(-0.3..0.1f32),
            rng.gen_range(-0.25..0.25f32),
            rng.gen_range(-0.1..0.1f32),
        );
        let velocity = Vec3::new(
            rng.gen_range(-2.2..-0.6f32),
            rng.gen_range(-0.8..0.8f32),
            0.0,
        );
        let color = cfg.palette[rng.gen_range(0..cfg.palette.len())];
        let material = materials.add(StandardMaterial {
            base_color: color,
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        });
        commands.spawn((
            NavParticle {
                velocity,
                timer: Timer::from_seconds(cfg.particle_lifetime, TimerMode::Once),
            },
            Name::new("NavParticle"),
            Mesh3d(assets.particle.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(transform.translation + offset),
            RenderLayers::layer(NAV_LAYER),
        ));
    }
}

/// Integrates particles and fades them out; expired or out-of-bounds
/// particles are despawned.
pub fn animate_particles(
    time: Res<Time>,
    cfg: Res<NavbarConfig>,
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(
        Entity,
        &mut Transform,
        &mut NavParticle,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    for (entity, mut transform, mut particle, material) in &mut query {
        particle.timer.tick(time.delta());
        transform.translation += particle.velocity * time.delta_secs();

        if let Some(mat) = materials.get_mut(&material.0) {
            mat.base_color.set_alpha(math::fade_alpha(
                particle.timer.elapsed_secs(),
                cfg.particle_lifetime,
            ));
        }

        if particle.timer.is_finished() || transform.translation.x < cfg.start_x {
            commands.entity(entity).despawn();
        }
    }
}

/// Latches each label once the logo passes its threshold, then eases its
/// text in. Reveal is monotonic: the flag never clears.
pub fn reveal_labels(
    time: Res<Time>,
    cfg: Res<NavbarConfig>,
    logo: Query<&Transform, With<NavLogo>>,
    mut labels: Query<(&mut NavLabel, &mut TextColor)>,
) {
    let Ok(logo_tf) = logo.single() else {
        return;
    };
    for (mut label, mut color) in &mut labels {
        if !label.revealed && logo_tf.translation.x >= label.threshold {
            label.revealed = true;
        }
        if label.revealed && label.progress < 1.0 {
            label.progress = (label.progress + time.delta_secs() / cfg.reveal_duration).min(1.0);
            color.0 = cfg
                .label_color
                .with_alpha(math::ease_out_cubic(label.progress));
        }
    }
}

/// Switches pages when a revealed label with a page behind it is clicked.
pub fn handle_label_clicks(
    page: Res<State<Page>>,
    mut next: ResMut<NextState<Page>>,
    query: Query<(&Interaction, &NavLabel), Changed<Interaction>>,
) {
    for (interaction, label) in &query {
        if *interaction != Interaction::Pressed || !label.revealed {
            continue;
        }
        if let Some(target) = label.target
            && target != *page.get()
        {
            info!("navigating to {target:?}");
            next.set(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navbar_carries_three_labels_with_one_dead_end() {
        assert_eq!(LABELS.len(), 3);
        let dead_ends = LABELS.iter().filter(|(_, t)| t.is_none()).count();
        assert_eq!(dead_ends, 1, "only the contact label has no page yet");
        assert_eq!(LABELS[2].0, "Contact");
    }

    #[test]
    fn every_label_has_a_reveal_threshold() {
        let cfg = NavbarConfig::default();
        assert_eq!(cfg.label_thresholds.len(), LABELS.len());
        for pair in cfg.label_thresholds.windows(2) {
            assert!(pair[0] < pair[1], "labels reveal left to right");
        }
        assert!(cfg.label_thresholds.iter().all(|&t| t <= cfg.end_x));
    }
}
