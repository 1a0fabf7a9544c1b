// THEORY:
// The shape classifier is the last purely geometric stage. It looks at one region's
// bounding box, pixel count and pixel distribution, assigns exactly one archetype
// and synthesizes a boundary path for it.
//
// Decision order (first matching rule wins, and the order is part of the contract):
// 1.  **Circle**: aspect ratio in [0.8, 1.2] and the circularity test passes. The
//     path is two opposing semicircular arcs of radius min(w, h) / 2 around the box
//     center.
// 2.  **Elongated Rectangle**: aspect ratio above 2 or below 0.5. The path is the
//     four box corners, closed.
// 3.  **Small Triangle**: fewer than 500 matched samples and a uniform draw above
//     0.5. Apex at (center x, min y), base on the bottom edge. The draw only happens
//     when the area test passes, and it comes from a caller-supplied `Rng` so a
//     seeded or fixed source makes the outcome reproducible.
// 4.  **Fallback Rectangle**: everything else.
//
// The circularity test counts the fraction of region pixels within the bounding
// circle. It is a density heuristic, not a true roundness metric: a dense annulus
// passes just as well as a disk.
//
// Paths stay in source pixel coordinates. Bounds and center are normalized by the
// full image width and height, and the finished list is sorted by ascending area so
// larger shapes come later in draw order.

use crate::core_modules::boundary_path::BoundaryPath;
use crate::core_modules::region::Region;
use crate::core_modules::shape::{
    ClassifiedShape, GeneratedShape, NormalizedBounds, NormalizedPoint, ShapeArchetype,
};
use glam::DVec2;
use log::debug;
use rand::Rng;

/// Tunable thresholds of the decision rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierRules {
    /// Inclusive lower bound of the near-square aspect band.
    pub circle_aspect_min: f64,
    /// Inclusive upper bound of the near-square aspect band.
    pub circle_aspect_max: f64,
    /// Fraction of pixels that must fall inside the bounding circle (exclusive).
    pub circularity_threshold: f64,
    /// Aspect ratio above which a region counts as elongated.
    pub elongated_above: f64,
    /// Aspect ratio below which a region counts as elongated.
    pub elongated_below: f64,
    /// Regions with fewer matched samples than this may become triangles.
    pub triangle_area_cutoff: usize,
    /// A draw strictly above this value turns a small region into a triangle.
    pub triangle_draw_threshold: f64,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            circle_aspect_min: 0.8,
            circle_aspect_max: 1.2,
            circularity_threshold: 0.7,
            elongated_above: 2.0,
            elongated_below: 0.5,
            triangle_area_cutoff: 500,
            triangle_draw_threshold: 0.5,
        }
    }
}

/// Fraction of the region's pixels at or inside the bounding circle.
pub fn circle_fill_ratio(region: &Region) -> f64 {
    let (center_x, center_y) = region.bounds.center();
    let radius = region.bounds.width().min(region.bounds.height()) as f64 / 2.0;
    let center = DVec2::new(center_x, center_y);

    let inside = region
        .pixels
        .iter()
        .filter(|p| DVec2::new(p.x as f64, p.y as f64).distance(center) <= radius)
        .count();
    inside as f64 / region.pixels.len() as f64
}

pub fn is_circular_region(region: &Region, threshold: f64) -> bool {
    circle_fill_ratio(region) > threshold
}

/// Classifies one region. `image_width` and `image_height` are the dimensions of the
/// raster the region was found in and are used for normalization.
pub fn classify_region<R: Rng + ?Sized>(
    region: &Region,
    image_width: u32,
    image_height: u32,
    rules: &ClassifierRules,
    rng: &mut R,
) -> ClassifiedShape {
    let bounds = &region.bounds;
    let width = bounds.width() as f64;
    let height = bounds.height() as f64;
    let aspect = bounds.aspect_ratio();
    let (center_x, center_y) = bounds.center();
    let min = DVec2::new(bounds.min_x as f64, bounds.min_y as f64);
    let max = DVec2::new(bounds.max_x as f64, bounds.max_y as f64);

    let (archetype, path) = if (rules.circle_aspect_min..=rules.circle_aspect_max).contains(&aspect)
        && is_circular_region(region, rules.circularity_threshold)
    {
        let radius = width.min(height) / 2.0;
        (
            ShapeArchetype::Circle,
            BoundaryPath::circle(DVec2::new(center_x, center_y), radius),
        )
    } else if aspect > rules.elongated_above || aspect < rules.elongated_below {
        (ShapeArchetype::Rectangle, BoundaryPath::rectangle(min, max))
    } else if region.area() < rules.triangle_area_cutoff
        && rng.random::<f64>() > rules.triangle_draw_threshold
    {
        (
            ShapeArchetype::Triangle,
            BoundaryPath::triangle(
                DVec2::new(center_x, min.y),
                DVec2::new(min.x, max.y),
                DVec2::new(max.x, max.y),
            ),
        )
    } else {
        (ShapeArchetype::Rectangle, BoundaryPath::rectangle(min, max))
    };

    let image_width = image_width.max(1) as f64;
    let image_height = image_height.max(1) as f64;

    GeneratedShape {
        archetype,
        color: region.swatch,
        bounds: NormalizedBounds {
            x: min.x / image_width,
            y: min.y / image_height,
            width: width / image_width,
            height: height / image_height,
        },
        path: Some(path),
        center: NormalizedPoint {
            x: center_x / image_width,
            y: center_y / image_height,
        },
        area: region.area(),
    }
}

/// Classifies every region and orders the result by ascending area. The sort is
/// stable, so regions of equal area keep their palette order.
pub fn regions_to_shapes<R: Rng + ?Sized>(
    regions: &[Region],
    image_width: u32,
    image_height: u32,
    rules: &ClassifierRules,
    rng: &mut R,
) -> Vec<ClassifiedShape> {
    let mut shapes: Vec<ClassifiedShape> = regions
        .iter()
        .map(|region| classify_region(region, image_width, image_height, rules, rng))
        .collect();
    shapes.sort_by_key(|shape| shape.area);

    debug!(
        "classifier: {} regions -> {} circles, {} triangles, {} rectangles",
        regions.len(),
        count_of(&shapes, ShapeArchetype::Circle),
        count_of(&shapes, ShapeArchetype::Triangle),
        count_of(&shapes, ShapeArchetype::Rectangle)
    );
    shapes
}

fn count_of(shapes: &[ClassifiedShape], archetype: ShapeArchetype) -> usize {
    shapes.iter().filter(|s| s.archetype == archetype).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color_quantizer::ColorSwatch;
    use crate::core_modules::region::{BoundingBox, Point};
    use crate::core_modules::test_rng::ConstRng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn region_from(points: Vec<Point>, swatch: ColorSwatch) -> Region {
        let mut bounds = BoundingBox::around(points[0]);
        for point in &points {
            bounds.include(*point);
        }
        Region {
            swatch,
            pixels: points,
            bounds,
        }
    }

    /// Stride-2 samples of a filled axis-aligned block.
    fn block(min_x: u32, max_x: u32, min_y: u32, max_y: u32) -> Region {
        let points = (min_y..=max_y)
            .step_by(2)
            .flat_map(|y| (min_x..=max_x).step_by(2).map(move |x| Point { x, y }))
            .collect();
        region_from(points, ColorSwatch::new(200, 30, 30))
    }

    /// Stride-2 samples of a disk inscribed in a square.
    fn disk(center: u32, radius: u32) -> Region {
        let c = center as f64;
        let r = radius as f64;
        let points = (center - radius..=center + radius)
            .step_by(2)
            .flat_map(|y| {
                (center - radius..=center + radius)
                    .step_by(2)
                    .map(move |x| Point { x, y })
            })
            .filter(|p| ((p.x as f64 - c).powi(2) + (p.y as f64 - c).powi(2)).sqrt() <= r)
            .collect();
        region_from(points, ColorSwatch::new(0, 0, 0))
    }

    #[test]
    fn tall_halves_become_rectangles() {
        let region = block(0, 48, 0, 98);
        let shape = classify_region(&region, 100, 100, &ClassifierRules::default(), &mut ConstRng(u64::MAX));
        assert_eq!(shape.archetype, ShapeArchetype::Rectangle);
        assert_eq!(shape.path, Some("M 0 0 L 48 0 L 48 98 L 0 98 Z".parse::<BoundaryPath>().unwrap()));
        assert_eq!(shape.bounds.width, 0.48);
        assert_eq!(shape.center.y, 0.49);
    }

    #[test]
    fn dense_disk_becomes_circle() {
        let region = disk(50, 40);
        assert_eq!((region.bounds.width(), region.bounds.height()), (80, 80));
        assert!(circle_fill_ratio(&region) > 0.99);

        let shape = classify_region(&region, 100, 100, &ClassifierRules::default(), &mut ConstRng(0));
        assert_eq!(shape.archetype, ShapeArchetype::Circle);
        let (min, max) = shape.path.unwrap().bounds().unwrap();
        assert!((min - DVec2::new(10.0, 10.0)).length() < 0.01);
        assert!((max - DVec2::new(90.0, 90.0)).length() < 0.01);
        assert_eq!(shape.center, NormalizedPoint { x: 0.5, y: 0.5 });
    }

    #[test]
    fn square_outline_is_not_a_circle() {
        // Only the perimeter of a square. The sides touch the bounding circle at their
        // midpoints and every other sample falls outside it.
        let mut points = Vec::new();
        for i in (0..=80).step_by(2) {
            points.push(Point { x: 10 + i, y: 10 });
            points.push(Point { x: 10 + i, y: 90 });
            points.push(Point { x: 10, y: 10 + i });
            points.push(Point { x: 90, y: 10 + i });
        }
        let region = region_from(points, ColorSwatch::new(0, 0, 0));
        assert!(!is_circular_region(&region, 0.7));
        let shape = classify_region(&region, 100, 100, &ClassifierRules::default(), &mut ConstRng(0));
        assert_eq!(shape.archetype, ShapeArchetype::Rectangle);
    }

    #[test]
    fn small_squat_region_follows_the_draw() {
        // 30x20 box, aspect 1.5, 16x11 = 176 samples.
        let region = block(10, 40, 10, 30);
        assert!(region.area() < 500);
        let rules = ClassifierRules::default();

        let high = classify_region(&region, 100, 100, &rules, &mut ConstRng(u64::MAX));
        assert_eq!(high.archetype, ShapeArchetype::Triangle);
        assert_eq!(high.path, Some("M 25 10 L 10 30 L 40 30 Z".parse::<BoundaryPath>().unwrap()));

        let low = classify_region(&region, 100, 100, &rules, &mut ConstRng(0));
        assert_eq!(low.archetype, ShapeArchetype::Rectangle);
    }

    #[test]
    fn large_squat_region_never_draws() {
        // 60x40 box, aspect 1.5, 31x21 = 651 samples.
        let region = block(0, 60, 0, 40);
        assert!(region.area() >= 500);
        let shape = classify_region(&region, 100, 100, &ClassifierRules::default(), &mut ConstRng(u64::MAX));
        assert_eq!(shape.archetype, ShapeArchetype::Rectangle);
    }

    #[test]
    fn shapes_are_sorted_by_ascending_area() {
        let regions = vec![block(0, 98, 0, 20), block(0, 20, 0, 98), block(0, 10, 0, 40)];
        let areas: Vec<usize> = regions.iter().map(Region::area).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let shapes = regions_to_shapes(&regions, 100, 100, &ClassifierRules::default(), &mut rng);
        let sorted: Vec<usize> = shapes.iter().map(|s| s.area).collect();
        let mut expected = areas.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn normalized_bounds_stay_in_the_unit_square() {
        let mut rng = StdRng::seed_from_u64(42);
        let regions = vec![block(0, 98, 0, 98), block(50, 98, 10, 30), disk(30, 12)];
        for shape in regions_to_shapes(&regions, 100, 100, &ClassifierRules::default(), &mut rng) {
            assert!(shape.bounds.is_within_unit_square(1e-9), "{:?}", shape.bounds);
            assert!((0.0..=1.0).contains(&shape.center.x));
            assert!((0.0..=1.0).contains(&shape.center.y));
        }
    }
}
