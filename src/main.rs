#![warn(missing_docs)]
//! 3D marketing site: a cube-letter banner puzzle that resolves into a logo
//! reveal, a rotating project carousel, and a persistent navbar overlay
//! with a travelling logo and particle trail.

mod banner;
mod carousel;
pub mod letters;
pub mod logo;
pub mod math;
mod navbar;
mod sequence;

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
#[cfg(feature = "native")]
use clap::Parser;

/// Top-level page, used for system scheduling and scene lifecycle.
///
/// Each page's plugin mounts its scene `OnEnter` and tears it down `OnExit`;
/// the banner's stage machine is a sub-state of [`Page::Home`].
#[derive(States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Page {
    /// The banner puzzle and logo reveal.
    #[default]
    Home,
    /// The project carousel.
    Projects,
}

/// Whether the world inspector overlay is open (Tab to toggle).
#[derive(Resource, Default, Reflect)]
pub struct InspectorOpen(pub bool);

#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(version, about = "3D marketing site")]
struct Cli {
    /// Start on the projects page instead of the banner.
    #[arg(long)]
    projects: bool,
    /// Path to the logo SVG.
    #[arg(long, default_value = "assets/logo.svg")]
    logo: String,
}

fn main() {
    let mut logo_cfg = logo::LogoConfig::default();
    let mut start_page = Page::Home;

    #[cfg(feature = "native")]
    {
        let cli = Cli::parse();
        logo_cfg.svg_path = cli.logo;
        if cli.projects {
            start_page = Page::Projects;
        }
    }

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "PGA".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<Page>()
    .register_type::<InspectorOpen>()
    .insert_state(start_page)
    .init_resource::<InspectorOpen>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(logo::LogoPlugin(logo_cfg))
    .add_plugins(banner::BannerPlugin(banner::BannerConfig::default()))
    .add_plugins(sequence::SequencePlugin(sequence::SequenceConfig::default()))
    .add_plugins(navbar::NavbarPlugin(navbar::NavbarConfig::default()))
    .add_plugins(carousel::CarouselPlugin(carousel::CarouselConfig::default()))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(|open: Res<InspectorOpen>| open.0));

    app.run();
}

fn toggle_inspector(keys: Res<ButtonInput<KeyCode>>, mut open: ResMut<InspectorOpen>) {
    if keys.just_pressed(KeyCode::Tab) {
        open.0 = !open.0;
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
