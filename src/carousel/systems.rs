//! Carousel systems: ring rotation, card selection, and the info panel.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::MouseWheel;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::view::Hdr;

use super::CarouselConfig;
use super::entities::{
    CarouselCamera, CarouselCard, CarouselRing, CarouselRoot, PanelBody, PanelTitle,
    SelectedProject, project_cards,
};
use crate::math;

/// Spawns the carousel scene: camera, light, the ring of cards, info panel.
pub fn spawn_carousel(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    cfg: Res<CarouselConfig>,
) {
    let root = commands
        .spawn((
            CarouselRoot,
            Name::new("Carousel"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let camera = commands
        .spawn((
            CarouselCamera,
            Name::new("CarouselCamera"),
            Camera3d::default(),
            Hdr,
            Tonemapping::TonyMcMapface,
            Bloom {
                intensity: 0.15,
                composite_mode: BloomCompositeMode::Additive,
                ..Bloom::NATURAL
            },
            Transform::from_translation(cfg.camera_position)
                .looking_at(Vec3::new(0.0, 0.2, 0.0), Vec3::Y),
        ))
        .id();

    let light = commands
        .spawn((
            Name::new("CarouselLight"),
            DirectionalLight {
                shadows_enabled: true,
                ..default()
            },
            Transform::from_xyz(6.0, 10.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        ))
        .id();

    let ring = commands
        .spawn((
            CarouselRing {
                yaw: 0.0,
                target_yaw: 0.0,
            },
            Name::new("CarouselRing"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();
    commands.entity(root).add_children(&[camera, light, ring]);

    let card_mesh = meshes.add(Cuboid::new(cfg.card_width, cfg.card_height, 0.06));
    let cards = project_cards();
    let step = std::f32::consts::TAU / cards.len() as f32;
    for (index, card) in cards.iter().enumerate() {
        let angle = index as f32 * step;
        // Missing image: the asset system logs the failure and the card
        // keeps its accent color.
        let material = materials.add(StandardMaterial {
            base_color: card.accent,
            base_color_texture: Some(asset_server.load(card.image)),
            perceptual_roughness: 0.6,
            ..default()
        });
        let id = commands
            .spawn((
                CarouselCard {
                    index,
                    base_angle: angle,
                    hovered: false,
                },
                Name::new(format!("Card({})", card.title)),
                Mesh3d(card_mesh.clone()),
                MeshMaterial3d(material),
                Transform::from_xyz(angle.sin() * cfg.radius, 0.0, angle.cos() * cfg.radius)
                    .with_rotation(Quat::from_rotation_y(angle)),
            ))
            .observe(on_card_over)
            .observe(on_card_out)
            .observe(on_card_click)
            .id();
        commands.entity(ring).add_child(id);
    }

    let panel = commands
        .spawn((
            Name::new("ProjectPanel"),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(32.0),
                bottom: Val::Px(48.0),
                width: Val::Px(320.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
        ))
        .id();
    let title = commands
        .spawn((
            PanelTitle,
            Text::new(""),
            TextFont {
                font_size: 26.0,
                ..default()
            },
            TextColor(cfg.panel_text_color),
        ))
        .id();
    let body = commands
        .spawn((
            PanelBody,
            Text::new("Select a project"),
            TextFont {
                font_size: 15.0,
                ..default()
            },
            TextColor(cfg.panel_text_color.with_alpha(0.7)),
        ))
        .id();
    commands.entity(panel).add_children(&[title, body]);
    commands.entity(root).add_child(panel);

    commands.insert_resource(SelectedProject::default());
    commands.insert_resource(ClearColor(cfg.clear_color));
}

/// Tears the carousel down and clears the selection.
pub fn despawn_carousel(mut commands: Commands, root: Query<Entity, With<CarouselRoot>>) {
    for entity in &root {
        commands.entity(entity).despawn();
    }
    commands.insert_resource(SelectedProject::default());
}

// ── Picking observers ───────────────────────────────────────────────

fn on_card_over(over: On<Pointer<Over>>, mut cards: Query<&mut CarouselCard>) {
    if let Ok(mut card) = cards.get_mut(over.entity) {
        card.hovered = true;
    }
}

fn on_card_out(out: On<Pointer<Out>>, mut cards: Query<&mut CarouselCard>) {
    if let Ok(mut card) = cards.get_mut(out.entity) {
        card.hovered = false;
    }
}

/// Selects a card and swings the ring the short way round to bring it to
/// the front.
fn on_card_click(
    click: On<Pointer<Click>>,
    cards: Query<&CarouselCard>,
    mut ring: Query<&mut CarouselRing>,
    mut selected: ResMut<SelectedProject>,
) {
    let Ok(card) = cards.get(click.entity) else {
        return;
    };
    let Ok(mut ring) = ring.single_mut() else {
        return;
    };
    selected.0 = Some(card.index);
    // Front slot is world yaw 0; take the minimal signed correction.
    let correction = math::wrap_angle(-(card.base_angle + ring.target_yaw));
    ring.target_yaw += correction;
}

// ── Per-frame drivers ───────────────────────────────────────────────

/// Scroll wheel nudges the ring's target yaw.
pub fn scroll_ring(
    cfg: Res<CarouselConfig>,
    mut wheel: MessageReader<MouseWheel>,
    mut ring: Query<&mut CarouselRing>,
) {
    let Ok(mut ring) = ring.single_mut() else {
        return;
    };
    for event in wheel.read() {
        ring.target_yaw += event.y * cfg.scroll_step;
    }
}

/// The ring's yaw chases its target by exponential decay.
pub fn rotate_ring(
    time: Res<Time>,
    cfg: Res<CarouselConfig>,
    mut query: Query<(&mut Transform, &mut CarouselRing)>,
) {
    let Ok((mut transform, mut ring)) = query.single_mut() else {
        return;
    };
    let target = ring.target_yaw;
    ring.yaw = math::exp_decay(ring.yaw, target, cfg.rotation_rate, time.delta_secs());
    transform.rotation = Quat::from_rotation_y(ring.yaw);
}

/// Eases card scale and lift toward their hover/selection targets.
pub fn animate_cards(
    time: Res<Time>,
    cfg: Res<CarouselConfig>,
    selected: Res<SelectedProject>,
    mut cards: Query<(&CarouselCard, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (card, mut transform) in &mut cards {
        let is_selected = selected.0 == Some(card.index);
        let target_scale = if is_selected {
            cfg.selected_scale
        } else if card.hovered {
            cfg.hover_scale
        } else {
            1.0
        };
        let target_y = if is_selected { cfg.selected_lift } else { 0.0 };

        let scale = math::exp_decay(transform.scale.x, target_scale, cfg.card_rate, dt);
        transform.scale = Vec3::splat(scale);
        transform.translation.y =
            math::exp_decay(transform.translation.y, target_y, cfg.card_rate, dt);
    }
}

/// Mirrors the current selection into the info panel.
pub fn update_panel(
    selected: Res<SelectedProject>,
    mut titles: Query<(&mut Text, &mut TextColor), (With<PanelTitle>, Without<PanelBody>)>,
    mut bodies: Query<&mut Text, (With<PanelBody>, Without<PanelTitle>)>,
) {
    if !selected.is_changed() {
        return;
    }
    let cards = project_cards();
    let Ok((mut title, mut title_color)) = titles.single_mut() else {
        return;
    };
    let Ok(mut body) = bodies.single_mut() else {
        return;
    };
    match selected.0 {
        Some(index) => {
            let card = &cards[index];
            title.0 = card.title.to_string();
            title_color.0 = card.accent;
            body.0 = card.description.to_string();
        }
        None => {
            title.0.clear();
            body.0 = "Select a project".to_string();
        }
    }
}
