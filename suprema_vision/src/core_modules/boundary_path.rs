// THEORY:
// A `BoundaryPath` is the outline description every scene element carries. It wraps
// a `kurbo::BezPath`: the pipeline synthesizes paths for its archetypes (rectangle,
// triangle, two-arc circle), the authored composition ships hand-drawn paths as SVG
// strings, and the renderer wants a flat outline polygon it can extrude.
//
// Key principles:
// 1.  **SVG Text**: `Display` writes SVG path data and `FromStr` reads it back
//     through kurbo's parser. Serde uses the same text form, so JSON output stays
//     readable.
// 2.  **Absolute Coordinates Only**: command letters are upper-cased before parsing,
//     so every coordinate is treated as absolute. Relative path data is not
//     supported.
// 3.  **Curves Become Cubics**: kurbo stores lines, quadratics and cubics. Elliptical
//     arcs are converted to cubic segments when the path is built or parsed.

use glam::DVec2;
use kurbo::{Arc, BezPath, PathEl, Point, Shape, SvgArc, Vec2};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Maximum distance between a synthesized arc and its cubic approximation.
const ARC_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathParseError {
    #[error("path data must start with a command letter, found `{0}`")]
    MissingCommand(char),
    #[error("malformed path data: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryPath {
    path: BezPath,
}

fn point(p: DVec2) -> Point {
    Point::new(p.x, p.y)
}

fn dvec(p: Point) -> DVec2 {
    DVec2::new(p.x, p.y)
}

impl BoundaryPath {
    pub fn new(path: BezPath) -> Self {
        Self { path }
    }

    pub fn bez_path(&self) -> &BezPath {
        &self.path
    }

    pub fn elements(&self) -> &[PathEl] {
        self.path.elements()
    }

    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// Axis-aligned rectangle: (min,min) -> (max,min) -> (max,max) -> (min,max), closed.
    pub fn rectangle(min: DVec2, max: DVec2) -> Self {
        Self::polygon(&[min, DVec2::new(max.x, min.y), max, DVec2::new(min.x, max.y)])
    }

    pub fn triangle(apex: DVec2, base_left: DVec2, base_right: DVec2) -> Self {
        Self::polygon(&[apex, base_left, base_right])
    }

    fn polygon(corners: &[DVec2]) -> Self {
        let mut path = BezPath::new();
        for (i, corner) in corners.iter().enumerate() {
            if i == 0 {
                path.move_to(point(*corner));
            } else {
                path.line_to(point(*corner));
            }
        }
        path.close_path();
        Self::new(path)
    }

    /// A full circle drawn as two opposing semicircular arcs, starting at the
    /// rightmost point.
    pub fn circle(center: DVec2, radius: f64) -> Self {
        let right = point(DVec2::new(center.x + radius, center.y));
        let left = point(DVec2::new(center.x - radius, center.y));

        let mut path = BezPath::new();
        path.move_to(right);
        for (from, to) in [(right, left), (left, right)] {
            let half_turn = SvgArc {
                from,
                to,
                radii: Vec2::new(radius, radius),
                x_rotation: 0.0,
                large_arc: true,
                sweep: false,
            };
            match Arc::from_svg_arc(&half_turn) {
                Some(arc) => arc.to_cubic_beziers(ARC_TOLERANCE, |p1, p2, p3| path.curve_to(p1, p2, p3)),
                None => path.line_to(to),
            }
        }
        path.close_path();
        Self::new(path)
    }

    /// Flattens the path into a single outline polygon. Curves are replaced by line
    /// segments no further than `tolerance` from the curve; a close returns to the
    /// start of its subpath.
    pub fn to_outline(&self, tolerance: f64) -> Vec<DVec2> {
        let mut outline = Vec::new();
        let mut subpath_start = DVec2::ZERO;
        kurbo::flatten(self.path.iter(), tolerance, |element| match element {
            PathEl::MoveTo(p) => {
                subpath_start = dvec(p);
                outline.push(subpath_start);
            }
            PathEl::LineTo(p) => outline.push(dvec(p)),
            PathEl::ClosePath => {
                if outline.last() != Some(&subpath_start) {
                    outline.push(subpath_start);
                }
            }
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        });
        outline
    }

    /// Minimum and maximum corners of the tight bounding box.
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        if self.is_empty() {
            return None;
        }
        let rect = self.path.bounding_box();
        Some((DVec2::new(rect.x0, rect.y0), DVec2::new(rect.x1, rect.y1)))
    }
}

impl fmt::Display for BoundaryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.to_svg())
    }
}

impl FromStr for BoundaryPath {
    type Err = PathParseError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let data = data.trim();
        if let Some(first) = data.chars().next() {
            if !first.is_ascii_alphabetic() {
                return Err(PathParseError::MissingCommand(first));
            }
        }

        // Exponent markers are the only lowercase letters that are not commands.
        let absolute: String = data
            .chars()
            .map(|c| if c == 'e' { c } else { c.to_ascii_uppercase() })
            .collect();
        let path = BezPath::from_svg(&absolute).map_err(|err| PathParseError::Malformed(err.to_string()))?;
        Ok(Self::new(path))
    }
}

impl Serialize for BoundaryPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BoundaryPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = String::deserialize(deserializer)?;
        data.parse().map_err(serde::de::Error::custom)
    }
}
