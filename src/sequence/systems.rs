//! Systems driving the banner stage transitions.

use bevy::prelude::*;
use rand::Rng;

use super::{BannerStage, ExplosionAccounting, ExplosionFinished, ExplosionKind, SequenceConfig};
use crate::banner::{BannerCamera, BannerConfig, BannerRoot, BoardCell, FillCube, MovableCube};
use crate::banner::LetterProgress;
use crate::logo::LogoMeshes;
use crate::math;

/// A board cell or fill cube flying outward during the disappear stage.
///
/// The lifetime timer lives on the entity, so tearing the banner down
/// despawns the timer with it and no completion fires afterwards.
#[derive(Component, Reflect)]
pub struct Exploding {
    /// Current linear velocity.
    pub velocity: Vec3,
    /// Spin in radians per second around each local axis.
    pub angular: Vec3,
    /// Remaining lifetime.
    pub timer: Timer,
    /// Which completion set this entity reports to.
    pub kind: ExplosionKind,
}

/// Marker on the logo group revealed in the final stage.
#[derive(Component)]
pub struct LogoReveal;

/// Advances one stage through [`BannerStage::next`], never skipping.
fn advance(stage: &State<BannerStage>, next: &mut NextState<BannerStage>) {
    if let Some(n) = stage.get().next() {
        next.set(n);
    }
}

/// Filling → CameraMove once every letter reports filled.
///
/// Progress is absent when banner construction failed; the stage then
/// simply never advances.
pub fn advance_when_filled(
    progress: Option<Res<LetterProgress>>,
    stage: Res<State<BannerStage>>,
    mut next: ResMut<NextState<BannerStage>>,
) {
    let Some(progress) = progress else { return };
    if progress.all_filled() {
        info!("all letters filled; moving camera");
        advance(&stage, &mut next);
    }
}

/// Glides the banner camera toward its showcase pose; CameraMove → Disappear
/// once position and angular errors drop under tolerance.
pub fn drive_camera_move(
    time: Res<Time>,
    cfg: Res<SequenceConfig>,
    stage: Res<State<BannerStage>>,
    mut next: ResMut<NextState<BannerStage>>,
    mut query: Query<&mut Transform, With<BannerCamera>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    let target_rot = Transform::from_translation(cfg.camera_target)
        .looking_at(Vec3::ZERO, Vec3::Y)
        .rotation;

    let dt = time.delta_secs();
    transform.translation =
        math::exp_decay_vec3(transform.translation, cfg.camera_target, cfg.camera_rate, dt);
    transform.rotation = math::exp_decay_quat(transform.rotation, target_rot, cfg.camera_rate, dt);

    let pos_error = transform.translation.distance(cfg.camera_target);
    let angle_error = transform.rotation.angle_between(target_rot);
    if math::has_arrived(pos_error, angle_error, cfg.pos_tolerance, cfg.rot_tolerance) {
        advance(&stage, &mut next);
    }
}

/// One-shot entry into the disappear stage (`OnEnter` runs exactly once per
/// transition): snapshots the expected totals, then converts every fill cube
/// and active cell into an [`Exploding`] entity with its own fading material.
pub fn detonate(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut accounting: ResMut<ExplosionAccounting>,
    cfg: Res<SequenceConfig>,
    banner_cfg: Res<BannerConfig>,
    cubes: Query<Entity, With<FillCube>>,
    cells: Query<(Entity, &BoardCell)>,
    movers: Query<Entity, With<MovableCube>>,
) {
    let cube_total = cubes.iter().count();
    let cell_total = cells.iter().filter(|(_, c)| c.active).count();
    accounting.arm(cube_total, cell_total);
    info!("disappear: {cube_total} cubes, {cell_total} cells to settle");

    let mut rng = rand::thread_rng();
    let mut launch = |commands: &mut Commands, entity: Entity, kind: ExplosionKind, color: Color| {
        let dir = Vec3::new(
            rng.gen_range(-1.0..1.0f32),
            rng.gen_range(-1.0..1.0f32),
            rng.gen_range(0.2..1.0f32),
        )
        .normalize_or_zero();
        let speed = rng.gen_range(cfg.explosion_speed_min..cfg.explosion_speed_max);
        let angular = Vec3::new(
            rng.gen_range(-cfg.explosion_spin..cfg.explosion_spin),
            rng.gen_range(-cfg.explosion_spin..cfg.explosion_spin),
            rng.gen_range(-cfg.explosion_spin..cfg.explosion_spin),
        );
        let material = materials.add(StandardMaterial {
            base_color: color,
            alpha_mode: AlphaMode::Blend,
            ..default()
        });
        commands.entity(entity).insert((
            Exploding {
                velocity: dir * speed,
                angular,
                timer: Timer::from_seconds(cfg.explosion_duration, TimerMode::Once),
                kind,
            },
            MeshMaterial3d(material),
        ));
    };

    for entity in &cubes {
        launch(&mut commands, entity, ExplosionKind::Cube, banner_cfg.cube_color);
    }
    for (entity, cell) in &cells {
        if cell.active {
            launch(
                &mut commands,
                entity,
                ExplosionKind::Cell,
                banner_cfg.active_cell_color,
            );
            // The board's hover observers key off `BoardCell`; stripping it
            // drops any late pointer callbacks, which would otherwise swap
            // the fading material back to the shared opaque handle.
            commands.entity(entity).remove::<BoardCell>();
        } else {
            // Inactive cells are not part of the accounting; clear them now.
            commands.entity(entity).despawn();
        }
    }
    // The movable cubes served their purpose during filling.
    for entity in &movers {
        commands.entity(entity).despawn();
    }
}

/// Integrates exploding entities and reports each completion exactly once.
pub fn animate_explosions(
    time: Res<Time>,
    cfg: Res<SequenceConfig>,
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut writer: MessageWriter<ExplosionFinished>,
    mut query: Query<(
        Entity,
        &mut Transform,
        &mut Exploding,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut exploding, material) in &mut query {
        exploding.timer.tick(time.delta());

        let velocity = exploding.velocity;
        transform.translation += velocity * dt;
        exploding.velocity = math::damp_velocity(velocity, cfg.explosion_damping, dt);
        let angular = exploding.angular * dt;
        transform.rotate_local_x(angular.x);
        transform.rotate_local_y(angular.y);
        transform.rotate_local_z(angular.z);

        if let Some(mat) = materials.get_mut(&material.0) {
            let age = exploding.timer.elapsed_secs();
            mat.base_color
                .set_alpha(math::fade_alpha(age, cfg.explosion_duration));
        }

        if exploding.timer.just_finished() {
            writer.write(ExplosionFinished {
                entity,
                kind: exploding.kind,
            });
            commands.entity(entity).despawn();
        }
    }
}

/// Feeds completion messages into the accounting sets.
pub fn collect_explosions(
    mut reader: MessageReader<ExplosionFinished>,
    mut accounting: ResMut<ExplosionAccounting>,
) {
    for finished in reader.read() {
        accounting.record(finished.kind, finished.entity);
    }
}

/// Disappear → Logo once both completion sets match their totals.
pub fn advance_when_settled(
    accounting: Res<ExplosionAccounting>,
    stage: Res<State<BannerStage>>,
    mut next: ResMut<NextState<BannerStage>>,
) {
    if accounting.is_satisfied() {
        advance(&stage, &mut next);
    }
}

/// Spawns the logo group at epsilon scale under the banner root.
pub fn reveal_logo(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<SequenceConfig>,
    logo: Res<LogoMeshes>,
    root: Query<Entity, With<BannerRoot>>,
) {
    let Ok(root) = root.single() else {
        return;
    };
    if logo.parts.is_empty() {
        warn!("logo geometry unavailable; reveal stage shows nothing");
    }

    let group = commands
        .spawn((
            LogoReveal,
            Name::new("LogoReveal"),
            Transform::from_translation(cfg.logo_position)
                .with_scale(Vec3::splat(cfg.logo_epsilon)),
            Visibility::default(),
        ))
        .id();
    for (mesh, color) in &logo.parts {
        let material = materials.add(StandardMaterial {
            base_color: *color,
            metallic: 0.3,
            perceptual_roughness: 0.4,
            cull_mode: None,
            ..default()
        });
        let part = commands
            .spawn((Mesh3d(mesh.clone()), MeshMaterial3d(material)))
            .id();
        commands.entity(group).add_child(part);
    }
    commands.entity(root).add_child(group);
}

/// Scales the logo group toward its target. Terminal: no further transition.
pub fn scale_in_logo(
    time: Res<Time>,
    cfg: Res<SequenceConfig>,
    mut query: Query<&mut Transform, With<LogoReveal>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    transform.scale = math::exp_decay_vec3(
        transform.scale,
        Vec3::splat(cfg.logo_scale),
        cfg.logo_rate,
        time.delta_secs(),
    );
}

/// Drops accounting state when the banner unmounts so late completion
/// messages are ignored.
pub fn reset_accounting(mut accounting: ResMut<ExplosionAccounting>) {
    accounting.reset();
}
