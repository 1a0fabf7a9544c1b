// THEORY:
// The `GeneratedShape` is the classified output of one region. It is the first
// record in the pipeline that speaks in normalized coordinates: bounds and center
// are fractions of the source image's full width and height, so everything
// downstream is independent of the image resolution.
//
// The record is generic over its color so the classifier (which only knows the raw
// palette swatch) and the style mapper (which knows the stylized palette entry) can
// share one type without the early stage depending on the later one. The stylized
// alias lives with the style mapper for the same reason. The boundary
// path stays in source pixel space; placement scales it down to scene units.

use crate::core_modules::boundary_path::BoundaryPath;
use crate::core_modules::color_quantizer::ColorSwatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed geometric categories a region can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeArchetype {
    Rectangle,
    Circle,
    Triangle,
    /// Never produced by the classifier. Accepted on externally built shapes.
    Polygon,
}

impl ShapeArchetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeArchetype::Rectangle => "rectangle",
            ShapeArchetype::Circle => "circle",
            ShapeArchetype::Triangle => "triangle",
            ShapeArchetype::Polygon => "polygon",
        }
    }
}

impl fmt::Display for ShapeArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A box in normalized [0,1] image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBounds {
    /// True when the box lies inside the unit square, allowing `epsilon` of slack.
    pub fn is_within_unit_square(&self, epsilon: f64) -> bool {
        self.x >= -epsilon
            && self.y >= -epsilon
            && self.width >= 0.0
            && self.height >= 0.0
            && self.x + self.width <= 1.0 + epsilon
            && self.y + self.height <= 1.0 + epsilon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedShape<C> {
    #[serde(rename = "type")]
    pub archetype: ShapeArchetype,
    pub color: C,
    pub bounds: NormalizedBounds,
    /// Outline in source pixel coordinates. Shapes built outside the classifier may
    /// omit it; placement then falls back to a canonical path for the archetype.
    pub path: Option<BoundaryPath>,
    pub center: NormalizedPoint,
    /// Matched sample count of the source region. Only used for draw ordering.
    pub area: usize,
}

/// Classifier output: the color is still the raw palette swatch.
pub type ClassifiedShape = GeneratedShape<ColorSwatch>;

impl<C> GeneratedShape<C> {
    pub fn map_color<D>(self, recolor: impl FnOnce(C) -> D) -> GeneratedShape<D> {
        GeneratedShape {
            archetype: self.archetype,
            color: recolor(self.color),
            bounds: self.bounds,
            path: self.path,
            center: self.center,
            area: self.area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archetypes_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&ShapeArchetype::Circle).unwrap(), "\"circle\"");
        assert_eq!(ShapeArchetype::Polygon.to_string(), "polygon");
    }

    #[test]
    fn unit_square_check_tolerates_rounding() {
        let inside = NormalizedBounds {
            x: 0.5,
            y: 0.0,
            width: 0.5 + 1e-12,
            height: 1.0,
        };
        assert!(inside.is_within_unit_square(1e-9));
        let outside = NormalizedBounds {
            x: 0.6,
            ..inside
        };
        assert!(!outside.is_within_unit_square(1e-9));
    }

    #[test]
    fn recoloring_keeps_geometry() {
        let shape = GeneratedShape {
            archetype: ShapeArchetype::Triangle,
            color: 7u8,
            bounds: NormalizedBounds::default(),
            path: None,
            center: NormalizedPoint { x: 0.25, y: 0.75 },
            area: 321,
        };
        let recolored = shape.clone().map_color(|c| c as u32 * 2);
        assert_eq!(recolored.color, 14);
        assert_eq!(recolored.center, shape.center);
        assert_eq!(recolored.area, 321);
    }
}
