//! Extruded logo geometry built from an SVG file.
//!
//! The vector file is parsed with `usvg`, each path is tessellated with
//! `lyon`, and the flat result is extruded into a prism (front cap, back
//! cap, side walls). The geometry core ([`FlatShape`], [`ExtrudedGeometry`])
//! is ECS-free so it can be tested without a renderer; only [`to_mesh`]
//! touches Bevy types.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{FillRule, PathEvent};
use lyon::tessellation::geometry_builder::simple_builder;
use lyon::tessellation::{FillOptions, FillTessellator, VertexBuffers};
use thiserror::Error;

/// Errors from loading or triangulating the logo.
#[derive(Debug, Error)]
pub enum LogoError {
    /// The SVG file could not be read.
    #[error("failed to read logo file: {0}")]
    Io(#[from] std::io::Error),
    /// The SVG file could not be parsed.
    #[error("failed to parse logo svg: {0}")]
    Svg(#[from] usvg::Error),
    /// Tessellation of a path failed.
    #[error("failed to tessellate logo path: {0}")]
    Tessellation(String),
    /// The SVG contained no fillable paths.
    #[error("logo svg contains no paths")]
    Empty,
}

/// One tessellated SVG path: filled triangles plus its flattened outlines.
///
/// Coordinates are in SVG user space with Y flipped to point up.
#[derive(Debug, Clone)]
pub struct FlatShape {
    /// Fill triangles covering the path interior.
    pub triangles: Vec<[Vec2; 3]>,
    /// Closed outline polylines, one per subpath, used for the side walls.
    pub contours: Vec<Vec<Vec2>>,
}

/// Flat triangle-list mesh data produced by [`extrude`].
#[derive(Debug, Default)]
pub struct ExtrudedGeometry {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

const FLATTEN_TOLERANCE: f32 = 0.05;

/// Reads and tessellates an SVG file from disk.
pub fn load_shapes(path: &str) -> Result<Vec<FlatShape>, LogoError> {
    let text = std::fs::read_to_string(path)?;
    parse_shapes(&text)
}

/// Tessellates every path in an SVG document into a [`FlatShape`].
///
/// Paths come back in document order so callers can cycle a color palette
/// over them the way the site's logo does.
pub fn parse_shapes(svg: &str) -> Result<Vec<FlatShape>, LogoError> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())?;
    let mut shapes = Vec::new();
    collect_group(tree.root(), &mut shapes)?;
    if shapes.is_empty() {
        return Err(LogoError::Empty);
    }
    Ok(shapes)
}

fn collect_group(group: &usvg::Group, out: &mut Vec<FlatShape>) -> Result<(), LogoError> {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_group(g, out)?,
            usvg::Node::Path(p) => {
                if let Some(shape) = tessellate_path(p)? {
                    out.push(shape);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Converts one usvg path into a lyon path, applying the node's absolute
/// transform and flipping Y so the logo is upright in world space.
fn tessellate_path(path: &usvg::Path) -> Result<Option<FlatShape>, LogoError> {
    let ts = path.abs_transform();
    let map = |x: f32, y: f32| {
        let wx = ts.sx * x + ts.kx * y + ts.tx;
        let wy = ts.ky * x + ts.sy * y + ts.ty;
        point(wx, -wy)
    };

    let mut builder = lyon::path::Path::builder();
    let mut open = false;
    for seg in path.data().segments() {
        match seg {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                if open {
                    builder.end(false);
                }
                builder.begin(map(p.x, p.y));
                open = true;
            }
            usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                builder.line_to(map(p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::QuadTo(c, p) => {
                builder.quadratic_bezier_to(map(c.x, c.y), map(p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::CubicTo(c1, c2, p) => {
                builder.cubic_bezier_to(map(c1.x, c1.y), map(c2.x, c2.y), map(p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::Close => {
                builder.end(true);
                open = false;
            }
        }
    }
    if open {
        builder.end(true);
    }
    let lyon_path = builder.build();

    // Fill triangles
    let mut buffers: VertexBuffers<lyon::math::Point, u16> = VertexBuffers::new();
    let mut tess = FillTessellator::new();
    tess.tessellate_path(
        &lyon_path,
        &FillOptions::tolerance(FLATTEN_TOLERANCE).with_fill_rule(FillRule::NonZero),
        &mut simple_builder(&mut buffers),
    )
    .map_err(|e| LogoError::Tessellation(e.to_string()))?;

    if buffers.indices.is_empty() {
        return Ok(None);
    }

    let triangles = buffers
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let v = |i: u16| {
                let p = buffers.vertices[i as usize];
                Vec2::new(p.x, p.y)
            };
            [v(tri[0]), v(tri[1]), v(tri[2])]
        })
        .collect();

    // Flattened outlines for the side walls
    let mut contours = Vec::new();
    let mut current = Vec::new();
    for event in lyon_path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            PathEvent::Begin { at } => {
                current = vec![Vec2::new(at.x, at.y)];
            }
            PathEvent::Line { to, .. } => {
                current.push(Vec2::new(to.x, to.y));
            }
            PathEvent::End { .. } => {
                if current.len() >= 3 {
                    contours.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            _ => {}
        }
    }

    Ok(Some(FlatShape {
        triangles,
        contours,
    }))
}

/// Centers all shapes on the origin and rescales them so the largest
/// dimension equals `desired_size`. Returns the resulting width.
pub fn normalize_shapes(shapes: &mut [FlatShape], desired_size: f32) -> f32 {
    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    let mut visit = |p: Vec2| {
        min = min.min(p);
        max = max.max(p);
    };
    for shape in shapes.iter() {
        for tri in &shape.triangles {
            for &p in tri {
                visit(p);
            }
        }
        for contour in &shape.contours {
            for &p in contour {
                visit(p);
            }
        }
    }
    if min.x > max.x {
        return 0.0;
    }

    let size = max - min;
    let center = (min + max) / 2.0;
    let max_dim = size.x.max(size.y).max(f32::EPSILON);
    let scale = desired_size / max_dim;

    for shape in shapes.iter_mut() {
        for tri in &mut shape.triangles {
            for p in tri {
                *p = (*p - center) * scale;
            }
        }
        for contour in &mut shape.contours {
            for p in contour {
                *p = (*p - center) * scale;
            }
        }
    }
    size.x * scale
}

/// Extrudes a flat shape into a prism of the given depth, centered on z = 0.
pub fn extrude(shape: &FlatShape, depth: f32) -> ExtrudedGeometry {
    let half = depth / 2.0;
    let mut geo = ExtrudedGeometry::default();

    // Front and back caps
    for tri in &shape.triangles {
        let base = geo.positions.len() as u32;
        for &p in tri {
            geo.positions.push([p.x, p.y, half]);
            geo.normals.push([0.0, 0.0, 1.0]);
        }
        geo.indices.extend([base, base + 1, base + 2]);

        let base = geo.positions.len() as u32;
        for &p in tri {
            geo.positions.push([p.x, p.y, -half]);
            geo.normals.push([0.0, 0.0, -1.0]);
        }
        geo.indices.extend([base, base + 2, base + 1]);
    }

    // Side walls: one quad per outline segment
    for contour in &shape.contours {
        for i in 0..contour.len() {
            let a = contour[i];
            let b = contour[(i + 1) % contour.len()];
            let edge = b - a;
            if edge.length_squared() < f32::EPSILON {
                continue;
            }
            let n = Vec2::new(edge.y, -edge.x).normalize();
            let normal = [n.x, n.y, 0.0];

            let base = geo.positions.len() as u32;
            geo.positions.push([a.x, a.y, half]);
            geo.positions.push([b.x, b.y, half]);
            geo.positions.push([b.x, b.y, -half]);
            geo.positions.push([a.x, a.y, -half]);
            for _ in 0..4 {
                geo.normals.push(normal);
            }
            geo.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    geo
}

/// Converts extruded geometry into a renderable mesh.
pub fn to_mesh(geo: &ExtrudedGeometry) -> Mesh {
    let uvs = vec![[0.0, 0.0]; geo.positions.len()];
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, geo.positions.clone())
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, geo.normals.clone())
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(geo.indices.clone()))
}

/// Per-plugin configuration for the logo pipeline.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct LogoConfig {
    /// Path to the logo SVG on disk.
    pub svg_path: String,
    /// Largest dimension of the normalized logo in world units.
    pub desired_size: f32,
    /// Extrusion depth.
    pub depth: f32,
    /// Colors cycled over the SVG paths in document order.
    pub palette: Vec<Color>,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            svg_path: "assets/logo.svg".into(),
            desired_size: 1.2,
            depth: 0.3,
            palette: vec![
                Color::srgb_u8(0x04, 0x00, 0xff),
                Color::srgb_u8(0x1d, 0x1d, 0x1b),
            ],
        }
    }
}

/// Extruded logo meshes, one per SVG path, paired with their palette color.
///
/// Built once at startup; empty when the SVG failed to load, in which case
/// the reveal stage has nothing to show but the app keeps running.
#[derive(Resource, Default)]
pub struct LogoMeshes {
    /// Mesh and color per SVG path, in document order.
    pub parts: Vec<(Handle<Mesh>, Color)>,
    /// Width of the normalized logo in world units.
    pub width: f32,
}

/// Builds [`LogoMeshes`] from the configured SVG file.
pub fn build_logo_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    cfg: Res<LogoConfig>,
) {
    let mut shapes = match load_shapes(&cfg.svg_path) {
        Ok(shapes) => shapes,
        Err(e) => {
            error!("logo unavailable: {e}");
            commands.insert_resource(LogoMeshes::default());
            return;
        }
    };
    let width = normalize_shapes(&mut shapes, cfg.desired_size);

    let parts = shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let color = cfg.palette[i % cfg.palette.len()];
            (meshes.add(to_mesh(&extrude(shape, cfg.depth))), color)
        })
        .collect::<Vec<_>>();
    info!("logo built: {} parts, width {width:.2}", parts.len());
    commands.insert_resource(LogoMeshes { parts, width });
}

/// Logo plugin: loads and extrudes the SVG once at startup.
pub struct LogoPlugin(pub LogoConfig);

impl Plugin for LogoPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<LogoConfig>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, build_logo_meshes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
        <path d="M 0 0 L 10 0 L 5 10 Z"/>
    </svg>"#;

    const TWO_PATH_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 10">
        <path d="M 0 0 L 8 0 L 8 8 L 0 8 Z"/>
        <path d="M 12 0 L 20 0 L 16 8 Z"/>
    </svg>"#;

    fn unit_square() -> FlatShape {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(1.0, 1.0);
        let d = Vec2::new(0.0, 1.0);
        FlatShape {
            triangles: vec![[a, b, c], [a, c, d]],
            contours: vec![vec![a, b, c, d]],
        }
    }

    // ── Parsing ────────────────────────────────────────────────────

    #[test]
    fn triangle_svg_produces_one_shape() {
        let shapes = parse_shapes(TRIANGLE_SVG).unwrap();
        assert_eq!(shapes.len(), 1);
        assert!(!shapes[0].triangles.is_empty());
        assert_eq!(shapes[0].contours.len(), 1);
        assert!(shapes[0].contours[0].len() >= 3);
    }

    #[test]
    fn paths_come_back_in_document_order() {
        let shapes = parse_shapes(TWO_PATH_SVG).unwrap();
        assert_eq!(shapes.len(), 2);
        // The square (more area, further left) is first.
        let square_x: f32 = shapes[0].contours[0].iter().map(|p| p.x).sum::<f32>()
            / shapes[0].contours[0].len() as f32;
        let tri_x: f32 = shapes[1].contours[0].iter().map(|p| p.x).sum::<f32>()
            / shapes[1].contours[0].len() as f32;
        assert!(square_x < tri_x);
    }

    #[test]
    fn y_axis_points_up() {
        // SVG y grows downward; after parsing, the triangle apex (svg y=10)
        // must be below the base (svg y=0).
        let shapes = parse_shapes(TRIANGLE_SVG).unwrap();
        let min_y = shapes[0]
            .contours[0]
            .iter()
            .map(|p| p.y)
            .fold(f32::MAX, f32::min);
        assert!(min_y < 0.0);
    }

    #[test]
    fn svg_without_paths_is_an_error() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1"></svg>"#;
        assert!(matches!(parse_shapes(svg), Err(LogoError::Empty)));
    }

    #[test]
    fn malformed_svg_is_an_error() {
        assert!(matches!(
            parse_shapes("this is not svg"),
            Err(LogoError::Svg(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_shapes("/nonexistent/logo.svg"),
            Err(LogoError::Io(_))
        ));
    }

    // ── Normalization ──────────────────────────────────────────────

    #[test]
    fn normalize_centers_and_scales() {
        let mut shapes = vec![unit_square()];
        let width = normalize_shapes(&mut shapes, 2.0);
        assert!((width - 2.0).abs() < 1e-5);

        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for p in &shapes[0].contours[0] {
            min = min.min(*p);
            max = max.max(*p);
        }
        assert!((min + max).length() < 1e-5, "bbox centered on origin");
        assert!(((max - min).x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn normalize_empty_is_zero_width() {
        let mut shapes: Vec<FlatShape> = vec![];
        assert_eq!(normalize_shapes(&mut shapes, 2.0), 0.0);
    }

    // ── Extrusion ──────────────────────────────────────────────────

    #[test]
    fn extrusion_has_caps_and_walls() {
        let geo = extrude(&unit_square(), 0.5);
        // 2 triangles × 2 caps × 3 verts + 4 wall quads × 4 verts
        assert_eq!(geo.positions.len(), 2 * 2 * 3 + 4 * 4);
        // 2 triangles × 2 caps + 4 wall quads × 2 triangles
        assert_eq!(geo.indices.len(), (2 * 2 + 4 * 2) * 3);
        assert_eq!(geo.positions.len(), geo.normals.len());
    }

    #[test]
    fn extrusion_is_centered_on_depth_axis() {
        let geo = extrude(&unit_square(), 0.5);
        let (mut min_z, mut max_z) = (f32::MAX, f32::MIN);
        for p in &geo.positions {
            min_z = min_z.min(p[2]);
            max_z = max_z.max(p[2]);
        }
        assert!((min_z + 0.25).abs() < 1e-6);
        assert!((max_z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn wall_normals_are_planar() {
        let geo = extrude(&unit_square(), 1.0);
        for n in &geo.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "normal must be unit length");
        }
    }

    #[test]
    fn parsed_triangle_extrudes_cleanly() {
        let shapes = parse_shapes(TRIANGLE_SVG).unwrap();
        let geo = extrude(&shapes[0], 3.0);
        assert!(!geo.positions.is_empty());
        assert_eq!(geo.indices.len() % 3, 0);
    }
}
