// THEORY:
// The upload front-end is the only asynchronous part of the system. A user hands
// over a single image resource; it is MIME-checked immediately, then decoded,
// rescaled so its long edge is exactly 400px and run through the pipeline on
// tokio's blocking pool. The pipeline itself stays synchronous.
//
// Small images are enlarged as well as large ones shrunk. The noise floor and the
// triangle cutoff count samples, so every upload is judged at the same scale.
//
// Failure modes, in the order they can occur:
// 1.  `InputRejected`: the MIME type is not `image/*`. Raised before any byte is
//     decoded.
// 2.  `DecodeFailed`: the bytes could not be read or decoded as an image.
// 3.  `RenderContextUnavailable`: the decoded image yields no usable sampling
//     surface (zero-sized), or the blocking task died.
//
// Each call is independent. Nothing here cancels an earlier call; deciding which
// result is current is the scene's job (see `SceneState::begin_upload`).

use crate::core_modules::raster::RasterImage;
use crate::error::PipelineError;
use crate::pipeline::{Report, ShapePipeline};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat};
use log::debug;
use rand::Rng;
use std::path::Path;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// One image resource as handed over by the user.
#[derive(Debug, Clone)]
pub struct Upload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file and infers its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let mime_type = ImageFormat::from_path(path)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| FALLBACK_MIME_TYPE.to_string());
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.trim().to_ascii_lowercase().starts_with("image/")
    }

    pub fn check_mime(&self) -> Result<(), PipelineError> {
        if self.is_image() {
            Ok(())
        } else {
            Err(PipelineError::InputRejected {
                mime_type: self.mime_type.clone(),
            })
        }
    }
}

/// The dimensions of `(width, height)` scaled to fit a `max_edge` square. The long
/// edge becomes exactly `max_edge`; the short edge is floored, with a minimum of 1.
pub fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let long_edge = u64::from(width.max(height).max(1));
    let fit = |edge: u32| ((u64::from(edge) * u64::from(max_edge) / long_edge) as u32).max(1);
    (fit(width), fit(height))
}

/// Decodes an upload into the pipeline's raster, rescaled to fit `max_edge`.
pub fn decode_upload(upload: &Upload, max_edge: u32) -> Result<RasterImage, PipelineError> {
    upload.check_mime()?;

    let decoded: DynamicImage = match ImageFormat::from_mime_type(&upload.mime_type) {
        Some(format) => image::load_from_memory_with_format(&upload.bytes, format)?,
        None => image::load_from_memory(&upload.bytes)?,
    };

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(PipelineError::RenderContextUnavailable(format!(
            "decoded image is {}x{}",
            width, height
        )));
    }

    let rgba = decoded.to_rgba8();
    let (target_width, target_height) = fit_dimensions(width, height, max_edge);
    let rgba = if (target_width, target_height) == (width, height) {
        rgba
    } else {
        debug!(
            "upload: rescaling {}x{} to {}x{}",
            width, height, target_width, target_height
        );
        imageops::resize(&rgba, target_width, target_height, FilterType::Triangle)
    };

    Ok(RasterImage::from(rgba))
}

/// Decodes and processes one upload. Resolves once, with either the report or the
/// first failure.
pub async fn process_upload<R>(
    pipeline: &ShapePipeline,
    upload: Upload,
    mut rng: R,
) -> Result<Report, PipelineError>
where
    R: Rng + Send + 'static,
{
    upload.check_mime()?;

    let pipeline = pipeline.clone();
    tokio::task::spawn_blocking(move || -> Result<Report, PipelineError> {
        let raster = decode_upload(&upload, pipeline.config().max_edge)?;
        Ok(pipeline.generate_report(&raster, &mut rng))
    })
    .await
    .map_err(|err| PipelineError::RenderContextUnavailable(err.to_string()))?
}
