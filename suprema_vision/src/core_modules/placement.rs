// THEORY:
// The placement converter is the hand-off point between the image pipeline and
// the 3D scene. It turns each stylized shape, described in normalized image
// coordinates, into a `SceneElement` with a position, a uniform scale and a path.
//
// Mapping rules:
// 1.  **Plane**: the normalized center (cx, cy) spans a 6-unit square around the
//     origin. x = (cx - 0.5) * 6 and y = -(cy - 0.5) * 6, since image rows grow
//     downward and scene y grows upward.
// 2.  **Depth**: a single image carries no depth signal, so z is drawn uniformly
//     from [-2, 2) using the caller's `Rng`.
// 3.  **Scale**: min(width, height) * 20 clamped to [0.003, 0.02]. The scale is
//     applied to the path, which is expressed in source pixels, so a shape of a
//     few hundred pixels ends up a few scene units wide.
// 4.  **Fallback Path**: a shape without a path gets a canonical one for its
//     archetype, 50 units in size and centered at the origin.
//
// Inputs must already be normalized. Nothing here looks at pixel dimensions.

use crate::core_modules::boundary_path::BoundaryPath;
use crate::core_modules::shape::ShapeArchetype;
use crate::core_modules::style_mapper::{HexColor, StylizedShape};
use glam::{DVec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Side length of the square the normalized plane is stretched over.
pub const SCENE_EXTENT: f64 = 6.0;
/// Total range of the random depth offset.
pub const DEPTH_SPREAD: f64 = 4.0;
pub const SCALE_FACTOR: f64 = 20.0;
pub const MIN_SCALE: f64 = 0.003;
pub const MAX_SCALE: f64 = 0.02;
/// Half-size of the canonical fallback paths.
pub const DEFAULT_PATH_SIZE: f64 = 50.0;

/// One drawable item of the floating composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    pub name: String,
    pub path: BoundaryPath,
    pub color: HexColor,
    pub position: Vec3,
    /// Uniform scale applied to `path` before positioning.
    pub scale: f32,
    /// Set for pipeline output, cleared for the authored composition.
    pub is_generated: bool,
}

/// The clamped uniform scale for a shape with the given normalized size.
pub fn placement_scale(width: f64, height: f64) -> f64 {
    (width.min(height) * SCALE_FACTOR).clamp(MIN_SCALE, MAX_SCALE)
}

/// Canonical outline for an archetype at the reference size, centered at the origin.
pub fn default_path(archetype: ShapeArchetype) -> BoundaryPath {
    let size = DEFAULT_PATH_SIZE;
    match archetype {
        ShapeArchetype::Circle => BoundaryPath::circle(DVec2::ZERO, size),
        ShapeArchetype::Triangle => BoundaryPath::triangle(
            DVec2::new(0.0, -size),
            DVec2::new(size * 0.866, size * 0.5),
            DVec2::new(-size * 0.866, size * 0.5),
        ),
        ShapeArchetype::Rectangle | ShapeArchetype::Polygon => {
            BoundaryPath::rectangle(DVec2::splat(-size), DVec2::splat(size))
        }
    }
}

/// Places one shape. `index` is its position in the converted sequence and only
/// feeds the display name.
pub fn place_shape<R: Rng + ?Sized>(shape: &StylizedShape, index: usize, rng: &mut R) -> SceneElement {
    let x = (shape.center.x - 0.5) * SCENE_EXTENT;
    let y = -(shape.center.y - 0.5) * SCENE_EXTENT;
    let z = (rng.random::<f64>() - 0.5) * DEPTH_SPREAD;

    SceneElement {
        name: format!("Generated {} {}", shape.archetype, index + 1),
        path: shape
            .path
            .clone()
            .unwrap_or_else(|| default_path(shape.archetype)),
        color: shape.color.hex(),
        position: Vec3::new(x as f32, y as f32, z as f32),
        scale: placement_scale(shape.bounds.width, shape.bounds.height) as f32,
        is_generated: true,
    }
}

/// Converts shapes to scene elements, one for one and in order.
pub fn convert_generated_shapes<R: Rng + ?Sized>(shapes: &[StylizedShape], rng: &mut R) -> Vec<SceneElement> {
    shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| place_shape(shape, index, rng))
        .collect()
}
