// THEORY:
// The region finder is the engine of the spatial grouping stage. For each palette
// swatch it re-scans the raster and collects every sampled pixel that sits within
// the per-channel tolerance of that swatch.
//
// Algorithm steps:
// 1.  **Strided Scan**: the raster is visited at stride 2 on both axes. Images are
//     scaled to 400px on the long edge before they get here, so a full scan per
//     swatch (at most 8 of them) is cheap enough to stay O(swatches x pixels).
// 2.  **Proximity Test**: a sample matches when its bucketed R, G and B each differ
//     from the swatch by less than 32. The rule is per channel, never Euclidean;
//     palette and thresholds were tuned against exactly this metric.
// 3.  **Data Aggregation**: matching coordinates and a running bounding box are
//     accumulated as the scan proceeds.
// 4.  **Noise Floor**: a swatch with fewer than 100 matched samples produces no
//     region. This is silent; it is not an error.
// 5.  **Stateless Utility**: nothing is remembered between calls. The same raster
//     and swatches always give the same regions.

use crate::core_modules::color_quantizer::ColorSwatch;
use crate::core_modules::raster::RasterImage;
use crate::core_modules::region::{BoundingBox, Point, Region};

pub mod region_finder {
    use super::*;
    use log::debug;

    pub const DEFAULT_STRIDE: u32 = 2;
    pub const DEFAULT_CHANNEL_TOLERANCE: u8 = 32;
    pub const DEFAULT_MIN_REGION_PIXELS: usize = 100;

    /// Tunable knobs for the scan.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegionSearch {
        /// Sampling stride on both axes, in pixels.
        pub stride: u32,
        /// Exclusive per-channel distance for a sample to match a swatch.
        pub channel_tolerance: u8,
        /// Regions with fewer matched samples than this are dropped.
        pub min_region_pixels: usize,
    }

    impl Default for RegionSearch {
        fn default() -> Self {
            Self {
                stride: DEFAULT_STRIDE,
                channel_tolerance: DEFAULT_CHANNEL_TOLERANCE,
                min_region_pixels: DEFAULT_MIN_REGION_PIXELS,
            }
        }
    }

    /// Finds one region per swatch using the default search parameters.
    pub fn find_color_regions(image: &RasterImage, swatches: &[ColorSwatch]) -> Vec<Region> {
        find_color_regions_with(image, swatches, &RegionSearch::default())
    }

    /// Finds one region per swatch, in swatch order, skipping swatches whose region
    /// falls under the noise floor.
    pub fn find_color_regions_with(
        image: &RasterImage,
        swatches: &[ColorSwatch],
        search: &RegionSearch,
    ) -> Vec<Region> {
        swatches
            .iter()
            .filter_map(|swatch| grow_region_for_swatch(image, *swatch, search))
            .collect()
    }

    fn grow_region_for_swatch(
        image: &RasterImage,
        swatch: ColorSwatch,
        search: &RegionSearch,
    ) -> Option<Region> {
        let mut pixels: Vec<Point> = Vec::new();
        let mut bounds: Option<BoundingBox> = None;

        for (x, y, pixel) in image.sample_grid(search.stride) {
            if !swatch.matches(&pixel, search.channel_tolerance) {
                continue;
            }
            let point = Point { x, y };
            match bounds.as_mut() {
                Some(existing) => existing.include(point),
                None => bounds = Some(BoundingBox::around(point)),
            }
            pixels.push(point);
        }

        if pixels.len() < search.min_region_pixels {
            debug!(
                "region finder: {} matched {} samples, below floor of {}",
                swatch,
                pixels.len(),
                search.min_region_pixels
            );
            return None;
        }

        Some(Region {
            swatch,
            pixels,
            bounds: bounds?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::region_finder::*;
    use super::*;
    use crate::core_modules::color_quantizer::quantize_colors;
    use crate::core_modules::pixel::pixel::Pixel;

    fn half_black_half_white() -> RasterImage {
        RasterImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                Pixel::opaque(0, 0, 0)
            } else {
                Pixel::opaque(255, 255, 255)
            }
        })
    }

    #[test]
    fn tiny_image_falls_under_the_noise_floor() {
        let raster = RasterImage::from_fn(2, 2, |_, _| Pixel::opaque(255, 0, 0));
        let palette = quantize_colors(&raster, 6);
        assert_eq!(palette.len(), 1);
        assert!(find_color_regions(&raster, &palette).is_empty());
    }

    #[test]
    fn split_image_yields_two_tall_regions() {
        let raster = half_black_half_white();
        let palette = quantize_colors(&raster, 2);
        let regions = find_color_regions(&raster, &palette);
        assert_eq!(regions.len(), 2);

        for region in &regions {
            assert_eq!(region.area(), 1250);
            assert_eq!(region.bounds.width(), 48);
            assert_eq!(region.bounds.height(), 98);
            assert!(region.bounds.aspect_ratio() < 0.5);
        }

        let black = regions
            .iter()
            .find(|r| r.swatch == ColorSwatch::new(0, 0, 0))
            .expect("black region");
        assert_eq!((black.bounds.min_x, black.bounds.max_x), (0, 48));
        let white = regions
            .iter()
            .find(|r| r.swatch == ColorSwatch::new(255, 255, 255))
            .expect("white region");
        assert_eq!((white.bounds.min_x, white.bounds.max_x), (50, 98));
    }

    #[test]
    fn bounding_boxes_stay_inside_the_raster() {
        let raster = RasterImage::from_fn(37, 23, |x, y| Pixel::opaque((x * 7) as u8, (y * 11) as u8, 90));
        let palette = quantize_colors(&raster, 8);
        let search = RegionSearch {
            min_region_pixels: 1,
            ..RegionSearch::default()
        };
        for region in find_color_regions_with(&raster, &palette, &search) {
            assert!(region.bounds.max_x < raster.width());
            assert!(region.bounds.max_y < raster.height());
            assert!(region.bounds.min_x <= region.bounds.max_x);
        }
    }

    #[test]
    fn regions_of_different_swatches_may_overlap() {
        // Three gray bands in buckets 64, 96 and 128. With a tolerance of 40 the middle
        // band sits within reach of both outer swatches and joins both regions.
        let raster = RasterImage::from_fn(60, 40, |x, _| match x {
            0..20 => Pixel::opaque(70, 70, 70),
            20..40 => Pixel::opaque(100, 100, 100),
            _ => Pixel::opaque(135, 135, 135),
        });
        let search = RegionSearch {
            channel_tolerance: 40,
            ..RegionSearch::default()
        };
        let swatches = [ColorSwatch::new(64, 64, 64), ColorSwatch::new(128, 128, 128)];
        let regions = find_color_regions_with(&raster, &swatches, &search);
        assert_eq!(regions.len(), 2);

        let (dark, light) = (&regions[0], &regions[1]);
        assert_eq!(dark.swatch, ColorSwatch::new(64, 64, 64));
        assert_eq!((dark.bounds.min_x, dark.bounds.max_x), (0, 38));
        assert_eq!((light.bounds.min_x, light.bounds.max_x), (20, 58));
        assert_eq!((dark.area(), light.area()), (400, 400));

        let shared = dark.pixels.iter().filter(|p| light.pixels.contains(p)).count();
        assert_eq!(shared, 200);
    }

    #[test]
    fn repeated_searches_are_identical() {
        let raster = half_black_half_white();
        let palette = quantize_colors(&raster, 6);
        assert_eq!(find_color_regions(&raster, &palette), find_color_regions(&raster, &palette));
    }

    #[test]
    fn exactly_one_hundred_matches_is_kept() {
        // 20x20 raster at stride 2 samples exactly 10x10 = 100 pixels.
        let raster = RasterImage::from_fn(20, 20, |_, _| Pixel::opaque(0, 0, 255));
        let regions = find_color_regions(&raster, &[ColorSwatch::new(0, 0, 255)]);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area(), 100);
    }
}
