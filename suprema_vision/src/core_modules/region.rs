// THEORY:
// The `Region` module holds the data produced by the spatial grouping stage. A
// `Region` is every sampled pixel of the raster that sits close enough to one
// palette swatch, together with the axis-aligned box that spans them.
//
// Key architectural principles:
// 1.  **Color Cohesion, Not Connectivity**: pixels are grouped by palette proximity
//     alone. Two far-apart patches of the same color land in one region, and regions
//     of different swatches may overlap. There is no deduplication across swatches.
// 2.  **Stateless Data Container**: a `Region` is a snapshot for one image. It does
//     not know how it was found and it does not classify itself.
// 3.  **Input for the Next Stage**: the bounding box, pixel count and the pixel
//     coordinates are exactly what the shape classifier needs to pick an archetype.

use crate::core_modules::color_quantizer::ColorSwatch;
use serde::{Deserialize, Serialize};

/// A 2D coordinate in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Inclusive axis-aligned box spanning a region's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// The degenerate box containing a single point.
    pub fn around(point: Point) -> Self {
        Self {
            min_x: point.x,
            max_x: point.x,
            min_y: point.y,
            max_y: point.y,
        }
    }

    pub fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    /// Extent along x, measured between the extreme sample coordinates.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x as f64 + self.max_x as f64) / 2.0,
            (self.min_y as f64 + self.max_y as f64) / 2.0,
        )
    }

    /// width / height. A zero height gives an infinite ratio, and a zero-sized box
    /// gives NaN, which fails every aspect comparison.
    pub fn aspect_ratio(&self) -> f64 {
        self.width() as f64 / self.height() as f64
    }
}

/// A cluster of sampled pixels matched to one palette swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// The palette swatch this region was grown from.
    pub swatch: ColorSwatch,
    /// Every sampled coordinate that matched the swatch.
    pub pixels: Vec<Point>,
    /// The box enclosing all of `pixels`.
    pub bounds: BoundingBox,
}

impl Region {
    /// Number of matched samples. This is the unnormalized "area" used for ordering.
    pub fn area(&self) -> usize {
        self.pixels.len()
    }
}
