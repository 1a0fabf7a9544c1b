// THEORY:
// The `pipeline` module is the top-level API of the image-to-geometry engine. It
// wires the five stages into one call: raster -> palette -> regions -> classified
// shapes -> stylized shapes -> placed scene elements. Data only ever flows forward.
//
// The pipeline is stateless between runs. Each call reads its own raster and
// returns its own `Report`; nothing is cached, so concurrent or overlapping runs
// cannot interfere. The only nondeterminism (the triangle draw and the random
// depth) comes from the `Rng` the caller passes in.

use crate::core_modules::color_quantizer::{ColorSwatch, quantize_colors_with_step};
use crate::core_modules::placement::convert_generated_shapes;
use crate::core_modules::raster::RasterImage;
use crate::core_modules::region_finder::region_finder::{self, RegionSearch};
use crate::core_modules::shape_classifier::{ClassifierRules, regions_to_shapes};
use crate::core_modules::style_mapper::stylize_shape;
use crate::error::PipelineError;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

// Re-export key data structures for the public API.
pub use crate::core_modules::animation::{AnimationParams, ElementMotion};
pub use crate::core_modules::placement::SceneElement;
pub use crate::core_modules::shape::{NormalizedBounds, NormalizedPoint, ShapeArchetype};
pub use crate::core_modules::style_mapper::{StylizedShape, SuprematistColor};

/// Tunable behavior of one pipeline run. Missing fields deserialize to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of palette swatches kept by the quantizer.
    pub palette_size: usize,
    /// The quantizer reads every n-th sample.
    pub quantize_sample_step: usize,
    /// Region search stride on both axes.
    pub region_stride: u32,
    /// Exclusive per-channel distance for a sample to join a swatch's region.
    pub channel_tolerance: u8,
    /// Regions with fewer matched samples are dropped.
    pub min_region_pixels: usize,
    pub circularity_threshold: f64,
    pub triangle_area_cutoff: usize,
    /// A uniform draw above this value makes a small region a triangle.
    pub triangle_draw_threshold: f64,
    /// Uploads are downscaled so their long edge does not exceed this.
    pub max_edge: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            palette_size: 6,
            quantize_sample_step: 10,
            region_stride: 2,
            channel_tolerance: 32,
            min_region_pixels: 100,
            circularity_threshold: 0.7,
            triangle_area_cutoff: 500,
            triangle_draw_threshold: 0.5,
            max_edge: 400,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |message: &str| -> Result<(), PipelineError> {
            Err(PipelineError::InvalidConfig(message.to_string()))
        };
        if self.palette_size == 0 {
            return invalid("palette_size must be at least 1");
        }
        if self.quantize_sample_step == 0 || self.region_stride == 0 {
            return invalid("sampling steps must be at least 1");
        }
        if self.channel_tolerance == 0 {
            return invalid("channel_tolerance must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.circularity_threshold) {
            return invalid("circularity_threshold must lie in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.triangle_draw_threshold) {
            return invalid("triangle_draw_threshold must lie in [0, 1]");
        }
        if self.max_edge == 0 {
            return invalid("max_edge must be at least 1");
        }
        Ok(())
    }

    pub fn region_search(&self) -> RegionSearch {
        RegionSearch {
            stride: self.region_stride,
            channel_tolerance: self.channel_tolerance,
            min_region_pixels: self.min_region_pixels,
        }
    }

    pub fn classifier_rules(&self) -> ClassifierRules {
        ClassifierRules {
            circularity_threshold: self.circularity_threshold,
            triangle_area_cutoff: self.triangle_area_cutoff,
            triangle_draw_threshold: self.triangle_draw_threshold,
            ..ClassifierRules::default()
        }
    }
}

/// Everything one successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationData {
    pub image_width: u32,
    pub image_height: u32,
    pub palette: Vec<ColorSwatch>,
    /// Stylized shapes in draw order (ascending area).
    pub shapes: Vec<StylizedShape>,
    /// One scene element per shape, same order.
    pub elements: Vec<SceneElement>,
}

/// The primary output of the pipeline for a single image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Report {
    /// No visible pixels or no region above the noise floor. Not an error.
    EmptyResult,
    Generated(GenerationData),
}

impl Report {
    pub fn elements(&self) -> &[SceneElement] {
        match self {
            Report::EmptyResult => &[],
            Report::Generated(data) => &data.elements,
        }
    }

    pub fn into_elements(self) -> Vec<SceneElement> {
        match self {
            Report::EmptyResult => Vec::new(),
            Report::Generated(data) => data.elements,
        }
    }
}

/// The main, top-level struct for the image-to-geometry engine.
#[derive(Debug, Clone)]
pub struct ShapePipeline {
    config: PipelineConfig,
}

impl ShapePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn shapes_detected<R: Rng + ?Sized>(&self, image: &RasterImage, rng: &mut R) -> bool {
        matches!(self.generate_report(image, rng), Report::Generated(_))
    }

    /// Runs the stages up to the style mapper and returns the palette and the
    /// stylized shapes in draw order.
    pub fn generate_shapes<R: Rng + ?Sized>(
        &self,
        image: &RasterImage,
        rng: &mut R,
    ) -> (Vec<ColorSwatch>, Vec<StylizedShape>) {
        // Stage 1: Color Quantization
        let palette = quantize_colors_with_step(image, self.config.palette_size, self.config.quantize_sample_step);
        if palette.is_empty() {
            return (palette, Vec::new());
        }

        // Stage 2: Spatial Grouping
        let regions = region_finder::find_color_regions_with(image, &palette, &self.config.region_search());
        debug!("pipeline: {} of {} swatches produced a region", regions.len(), palette.len());

        // Stage 3: Shape Classification
        let classified = regions_to_shapes(
            &regions,
            image.width(),
            image.height(),
            &self.config.classifier_rules(),
            rng,
        );

        // Stage 4: Stylization
        let shapes = classified.into_iter().map(stylize_shape).collect();
        (palette, shapes)
    }

    pub fn generate_report<R: Rng + ?Sized>(&self, image: &RasterImage, rng: &mut R) -> Report {
        let (palette, shapes) = self.generate_shapes(image, rng);
        if shapes.is_empty() {
            info!(
                "pipeline: {}x{} image produced no shapes",
                image.width(),
                image.height()
            );
            return Report::EmptyResult;
        }

        // Stage 5: Placement
        let elements = convert_generated_shapes(&shapes, rng);
        info!(
            "pipeline: {}x{} image -> {} swatches -> {} scene elements",
            image.width(),
            image.height(),
            palette.len(),
            elements.len()
        );

        Report::Generated(GenerationData {
            image_width: image.width(),
            image_height: image.height(),
            palette,
            shapes,
            elements,
        })
    }
}
