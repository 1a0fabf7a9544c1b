// THEORY:
// The `RasterImage` is the pipeline's sole external input: an immutable grid of RGBA
// samples with explicit dimensions. Like the `Pixel`, it is a "dumb" data container.
// It knows how to hand out its samples in the two access patterns the pipeline uses
// (a flat, strided walk for the quantizer and a 2D strided grid for the region
// finder) but it knows nothing about colors, regions or shapes.
//
// Construction is the only place that can fail: a buffer whose length disagrees with
// the stated dimensions means the sampling surface could not be built.

use crate::core_modules::pixel::pixel::{CHANNELS, Pixel};
use crate::error::PipelineError;

/// An immutable RGBA raster, row-major, four bytes per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wraps a raw RGBA buffer. The buffer must hold exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PipelineError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(PipelineError::RenderContextUnavailable(format!(
                "{}x{} raster needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Builds a raster by evaluating `sample` at every coordinate.
    pub fn from_fn(width: u32, height: u32, sample: impl Fn(u32, u32) -> Pixel) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let pixel = sample(x, y);
                data.extend_from_slice(&[pixel.red, pixel.green, pixel.blue, pixel.alpha]);
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The sample at `(x, y)`, or `None` outside the raster.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data.get(start..start + CHANNELS).map(Pixel::from)
    }

    /// Every `step`-th sample in row-major order, starting with the first one.
    pub fn sample_every(&self, step: usize) -> impl Iterator<Item = Pixel> + '_ {
        self.data.chunks_exact(CHANNELS).step_by(step.max(1)).map(Pixel::from)
    }

    /// Samples on a regular grid: every `stride`-th column of every `stride`-th row.
    pub fn sample_grid(&self, stride: u32) -> impl Iterator<Item = (u32, u32, Pixel)> + '_ {
        let stride = stride.max(1) as usize;
        (0..self.height).step_by(stride).flat_map(move |y| {
            (0..self.width)
                .step_by(stride)
                .filter_map(move |x| self.pixel_at(x, y).map(|pixel| (x, y, pixel)))
        })
    }
}

impl From<image::RgbaImage> for RasterImage {
    fn from(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}
