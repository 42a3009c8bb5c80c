//! Mesh2d-based filled shapes for every gameplay entity.
//!
//! Spawning code tags entities with a [`VisualShape`]; shortly after the
//! spawn an `Added<VisualShape>` system builds the filled mesh and material.
//! `Mesh2d` uses retained GPU assets: geometry is uploaded once at spawn time
//! and lives on the GPU until the entity despawns, so the per-frame CPU cost
//! is zero regardless of how many bullets are in flight.
//!
//! All perimeter shapes are triangulated as a fan around an explicit centre
//! vertex, which is valid for every shape used here (convex polygons, stars,
//! and crosses are all star-shaped about their centroid).

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

/// Geometry tag consumed by [`attach_visual_system`].
#[derive(Component, Debug, Clone)]
pub struct VisualShape {
    pub kind: ShapeKind,
    pub color: Color,
}

impl VisualShape {
    #[inline]
    pub fn new(kind: ShapeKind, color: Color) -> Self {
        Self { kind, color }
    }
}

/// The shape vocabulary of the game's entities and boss bullets.
#[derive(Debug, Clone)]
pub enum ShapeKind {
    /// Arbitrary perimeter in local space (must be star-shaped about origin).
    Polygon(Vec<Vec2>),
    /// Regular n-gon.
    Regular { sides: u32, radius: f32 },
    /// N-point star alternating outer/inner radii.
    Star { points: u32, outer: f32, inner: f32 },
    /// Axis-aligned rectangle.
    Rect { width: f32, height: f32 },
    /// Filled circle.
    Circle { radius: f32 },
    /// Hollow ring.
    Ring { radius: f32, thickness: f32 },
    /// Plus-sign cross.
    Cross { size: f32, thickness: f32 },
}

pub struct SpritesPlugin;

impl Plugin for SpritesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, attach_visual_system);
    }
}

/// Attach mesh + material to every newly tagged entity.
pub fn attach_visual_system(
    mut commands: Commands,
    query: Query<(Entity, &VisualShape), Added<VisualShape>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, shape) in query.iter() {
        let mesh = match &shape.kind {
            ShapeKind::Polygon(perimeter) => center_fan_mesh(perimeter),
            ShapeKind::Regular { sides, radius } => {
                center_fan_mesh(&regular_polygon(*sides, *radius))
            }
            ShapeKind::Star {
                points,
                outer,
                inner,
            } => center_fan_mesh(&star_polygon(*points, *outer, *inner)),
            ShapeKind::Rect { width, height } => center_fan_mesh(&rect_polygon(*width, *height)),
            ShapeKind::Circle { radius } => center_fan_mesh(&regular_polygon(16, *radius)),
            ShapeKind::Ring { radius, thickness } => ring_mesh(*radius, *thickness, 32),
            ShapeKind::Cross { size, thickness } => {
                center_fan_mesh(&cross_polygon(*size, *thickness))
            }
        };

        let mesh_handle = meshes.add(mesh);
        let material_handle = materials.add(ColorMaterial::from_color(shape.color));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh_handle), MeshMaterial2d(material_handle)));
    }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Triangulate a perimeter as a fan around an added centre vertex.
pub fn center_fan_mesh(perimeter: &[Vec2]) -> Mesh {
    debug_assert!(perimeter.len() >= 3, "perimeter must have >= 3 vertices");

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(perimeter.len() + 1);
    positions.push([0.0, 0.0, 0.0]);
    positions.extend(perimeter.iter().map(|v| [v.x, v.y, 0.0]));

    let n = positions.len() as u32;
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n as usize];
    let extent = perimeter
        .iter()
        .map(|v| v.length())
        .fold(1.0_f32, f32::max);
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| [p[0] / (2.0 * extent) + 0.5, p[1] / (2.0 * extent) + 0.5])
        .collect();

    let mut indices: Vec<u32> = Vec::with_capacity((n as usize - 1) * 3);
    for i in 1..n {
        let next = if i + 1 < n { i + 1 } else { 1 };
        indices.extend_from_slice(&[0, i, next]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Hollow ring as a triangulated band.
pub fn ring_mesh(radius: f32, thickness: f32, segments: u32) -> Mesh {
    let inner = (radius - thickness / 2.0).max(0.1);
    let outer = radius + thickness / 2.0;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity((segments as usize + 1) * 2);
    for i in 0..=segments {
        let angle = std::f32::consts::TAU * i as f32 / segments as f32;
        let (sin, cos) = angle.sin_cos();
        positions.push([cos * inner, sin * inner, 0.0]);
        positions.push([cos * outer, sin * outer, 0.0]);
    }

    let n = positions.len();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n];
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| [p[0] / (2.0 * outer) + 0.5, p[1] / (2.0 * outer) + 0.5])
        .collect();

    let mut indices: Vec<u32> = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
        indices.extend_from_slice(&[base + 1, base + 3, base + 2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Regular n-gon perimeter, first vertex pointing up.
pub fn regular_polygon(sides: u32, radius: f32) -> Vec<Vec2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let angle =
                std::f32::consts::TAU * i as f32 / sides as f32 + std::f32::consts::FRAC_PI_2;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// N-point star perimeter alternating outer and inner radii.
pub fn star_polygon(points: u32, outer: f32, inner: f32) -> Vec<Vec2> {
    let points = points.max(3);
    (0..points * 2)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / (points * 2) as f32
                + std::f32::consts::FRAC_PI_2;
            let r = if i % 2 == 0 { outer } else { inner };
            Vec2::new(angle.cos(), angle.sin()) * r
        })
        .collect()
}

/// Rectangle perimeter.
pub fn rect_polygon(width: f32, height: f32) -> Vec<Vec2> {
    let hw = width / 2.0;
    let hh = height / 2.0;
    vec![
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ]
}

/// Plus-sign perimeter (12 vertices, star-shaped about the origin).
pub fn cross_polygon(size: f32, thickness: f32) -> Vec<Vec2> {
    let s = size / 2.0;
    let t = thickness / 2.0;
    vec![
        Vec2::new(-t, -s),
        Vec2::new(t, -s),
        Vec2::new(t, -t),
        Vec2::new(s, -t),
        Vec2::new(s, t),
        Vec2::new(t, t),
        Vec2::new(t, s),
        Vec2::new(-t, s),
        Vec2::new(-t, t),
        Vec2::new(-s, t),
        Vec2::new(-s, -t),
        Vec2::new(-t, -t),
    ]
}

/// Stylised aircraft silhouette used by the player, escort, and enemy planes.
pub fn aircraft_polygon(size: f32, nose_up: bool) -> Vec<Vec2> {
    let s = size / 2.0;
    let flip = if nose_up { 1.0 } else { -1.0 };
    vec![
        Vec2::new(0.0, s * flip),
        Vec2::new(-s * 0.25, s * 0.25 * flip),
        Vec2::new(-s, -s * 0.1 * flip),
        Vec2::new(-s * 0.3, -s * 0.35 * flip),
        Vec2::new(-s * 0.35, -s * flip),
        Vec2::new(0.0, -s * 0.7 * flip),
        Vec2::new(s * 0.35, -s * flip),
        Vec2::new(s * 0.3, -s * 0.35 * flip),
        Vec2::new(s, -s * 0.1 * flip),
        Vec2::new(s * 0.25, s * 0.25 * flip),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_polygon_has_requested_vertex_count() {
        assert_eq!(regular_polygon(6, 10.0).len(), 6);
        assert_eq!(regular_polygon(2, 10.0).len(), 3, "clamped to a triangle");
    }

    #[test]
    fn star_polygon_alternates_radii() {
        let star = star_polygon(5, 10.0, 4.0);
        assert_eq!(star.len(), 10);
        assert!((star[0].length() - 10.0).abs() < 1e-4);
        assert!((star[1].length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn cross_polygon_is_star_shaped_about_origin() {
        // Every vertex must be visible from the origin for fan triangulation;
        // for the plus sign it suffices that no vertex sits at the origin and
        // consecutive vertices never straddle it.
        let cross = cross_polygon(12.0, 4.0);
        assert_eq!(cross.len(), 12);
        assert!(cross.iter().all(|v| v.length() > 0.0));
    }
}
