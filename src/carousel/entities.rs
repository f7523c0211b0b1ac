//! Components, resources, and static card data for the project carousel.

use bevy::prelude::*;

/// Root of the carousel scene; the ring of cards hangs off [`CarouselRing`].
#[derive(Component)]
pub struct CarouselRoot;

/// The rotating ring. Its yaw chases `target_yaw` by exponential decay.
#[derive(Component, Reflect)]
pub struct CarouselRing {
    /// Current yaw (radians, unbounded).
    pub yaw: f32,
    /// Yaw the ring is converging to (radians, unbounded).
    pub target_yaw: f32,
}

/// Marker on the carousel's camera.
#[derive(Component)]
pub struct CarouselCamera;

/// One project card on the ring.
#[derive(Component, Reflect)]
pub struct CarouselCard {
    /// Index into the static project list.
    pub index: usize,
    /// Angle of the card's slot on the ring (radians).
    pub base_angle: f32,
    /// Whether the pointer is currently over the card.
    pub hovered: bool,
}

/// Marker on the info panel's title text.
#[derive(Component)]
pub struct PanelTitle;

/// Marker on the info panel's description text.
#[derive(Component)]
pub struct PanelBody;

/// Currently selected card index, if any.
#[derive(Resource, Default, Reflect)]
pub struct SelectedProject(pub Option<usize>);

/// Static data behind one card.
pub struct ProjectCard {
    /// Display title.
    pub title: &'static str,
    /// Short description shown in the info panel.
    pub description: &'static str,
    /// Accent color, also the fallback when the image is missing.
    pub accent: Color,
    /// Card face texture path, relative to the asset root.
    pub image: &'static str,
}

/// The nine showcased projects, in ring order.
pub fn project_cards() -> [ProjectCard; 9] {
    const ACCENTS: [(u8, u8, u8); 9] = [
        (0xff, 0xbe, 0xbe),
        (0xbe, 0xdf, 0xff),
        (0xd6, 0xff, 0xbe),
        (0xff, 0xd6, 0xbe),
        (0xff, 0xbe, 0xd2),
        (0xff, 0xf7, 0xbe),
        (0xc7, 0xbe, 0xff),
        (0xbe, 0xff, 0xe8),
        (0xfe, 0xbe, 0xff),
    ];
    const TITLES: [(&str, &str); 9] = [
        ("Atelier", "Brand site for a design studio, built around a scroll-driven gallery."),
        ("Waypoint", "Trip planner with collaborative itineraries and offline maps."),
        ("Verdant", "Plant-care companion that schedules watering from species data."),
        ("Emberline", "Interactive annual report with animated data storytelling."),
        ("Calliope", "Music discovery feed tuned by listening-room sessions."),
        ("Luminary", "Portfolio template family with configurable 3D hero scenes."),
        ("Drift", "Ambient focus timer pairing soundscapes with breathing cues."),
        ("Mosaic", "Community photo wall that tiles uploads into live collages."),
        ("Northstar", "Product analytics dashboard with goal tracking and alerts."),
    ];

    std::array::from_fn(|i| {
        let (r, g, b) = ACCENTS[i];
        let (title, description) = TITLES[i];
        ProjectCard {
            title,
            description,
            accent: Color::srgb_u8(r, g, b),
            image: match i {
                0 => "projects/img1.png",
                1 => "projects/img2.png",
                2 => "projects/img3.png",
                3 => "projects/img4.png",
                4 => "projects/img5.png",
                5 => "projects/img6.png",
                6 => "projects/img7.png",
                7 => "projects/img8.png",
                _ => "projects/img9.png",
            },
        }
    })
}
