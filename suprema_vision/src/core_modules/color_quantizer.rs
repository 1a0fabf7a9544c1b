// THEORY:
// The color quantizer is the first stage of the image-to-geometry pipeline. It
// reduces an image's full color space to a handful of representative swatches by
// coarse box bucketing, not by perceptual clustering.
//
// Algorithm:
// 1.  **Strided Sampling**: only every 10th sample (40 raw byte slots) is read. The
//     approximation is intentional; the palette only has to be roughly right.
// 2.  **Visibility Filter**: samples with alpha <= 128 are skipped entirely.
// 3.  **Bucketing**: each of R, G, B is floored to a multiple of 32 and the triple
//     becomes the swatch key.
// 4.  **Ranking**: swatches are ordered by descending occurrence count and the first
//     K are kept. Equal counts keep the order in which the swatches were first seen
//     during the scan, so repeated runs on the same raster rank identically.
//
// A raster with no visible sampled pixel produces an empty palette, which every
// downstream stage treats as "no regions, no shapes".

use crate::core_modules::pixel::pixel::{Channel, Pixel, bucket};
use crate::core_modules::raster::RasterImage;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Default number of swatches kept in the palette.
pub const DEFAULT_PALETTE_SIZE: usize = 6;
/// Default sampling step of the quantizer, in pixels.
pub const DEFAULT_SAMPLE_STEP: usize = 10;

/// A single quantized RGB triple. Channels are always multiples of 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorSwatch {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

impl ColorSwatch {
    /// Builds a swatch, bucketing each channel.
    pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
        Self {
            red: bucket(red),
            green: bucket(green),
            blue: bucket(blue),
        }
    }

    pub fn from_pixel(pixel: &Pixel) -> Self {
        let [red, green, blue] = pixel.bucketed();
        Self { red, green, blue }
    }

    /// Per-channel proximity test used by the region finder. The pixel is bucketed
    /// first, then every channel must differ from the swatch by strictly less than
    /// `tolerance`. This is a Chebyshev-style box test, not a Euclidean distance.
    pub fn matches(&self, pixel: &Pixel, tolerance: Channel) -> bool {
        let [red, green, blue] = pixel.bucketed();
        red.abs_diff(self.red) < tolerance
            && green.abs_diff(self.green) < tolerance
            && blue.abs_diff(self.blue) < tolerance
    }

    pub fn as_pixel(&self) -> Pixel {
        Pixel::opaque(self.red, self.green, self.blue)
    }
}

impl fmt::Display for ColorSwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.red, self.green, self.blue)
    }
}

/// A swatch together with how many sampled pixels fell into its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchCount {
    pub swatch: ColorSwatch,
    pub count: usize,
}

/// Counts every visible sampled pixel by swatch and ranks the result, most frequent
/// first.
pub fn count_swatches(image: &RasterImage, sample_step: usize) -> Vec<SwatchCount> {
    // (count, order of first appearance)
    let mut tallies: HashMap<ColorSwatch, (usize, usize)> = HashMap::new();
    for (order, pixel) in image.sample_every(sample_step).enumerate() {
        if !pixel.is_visible() {
            continue;
        }
        let tally = tallies.entry(ColorSwatch::from_pixel(&pixel)).or_insert((0, order));
        tally.0 += 1;
    }

    let mut ranked: Vec<(ColorSwatch, usize, usize)> = tallies
        .into_iter()
        .map(|(swatch, (count, first_seen))| (swatch, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .map(|(swatch, count, _)| SwatchCount { swatch, count })
        .collect()
}

/// The `palette_size` most frequent swatches using the default sampling step.
pub fn quantize_colors(image: &RasterImage, palette_size: usize) -> Vec<ColorSwatch> {
    quantize_colors_with_step(image, palette_size, DEFAULT_SAMPLE_STEP)
}

pub fn quantize_colors_with_step(
    image: &RasterImage,
    palette_size: usize,
    sample_step: usize,
) -> Vec<ColorSwatch> {
    let ranked = count_swatches(image, sample_step);
    debug!(
        "quantizer: {} distinct swatches in {}x{} raster, keeping {}",
        ranked.len(),
        image.width(),
        image.height(),
        palette_size.min(ranked.len())
    );
    ranked
        .into_iter()
        .take(palette_size)
        .map(|entry| entry.swatch)
        .collect()
}
