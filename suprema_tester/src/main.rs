use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use suprema_vision::pipeline::{GenerationData, PipelineConfig, Report, ShapePipeline};
use suprema_vision::{SceneState, Upload, UploadOutcome, process_upload};

/// Flattening tolerance for preview outlines, in pixels.
const PREVIEW_TOLERANCE: f64 = 0.25;

/// Turns an image into Suprematist scene elements and reports what was generated.
#[derive(Parser, Debug)]
#[command(name = "suprema_tester")]
struct Args {
    /// Image to process.
    input_path: String,
    /// Where to write the scene elements as JSON.
    output_path: Option<String>,
    /// Number of palette swatches to keep.
    #[arg(long = "colors", value_name = "K")]
    palette_size: Option<usize>,
    /// Seed for the triangle draw and depth placement.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Pipeline configuration as JSON.
    #[arg(long = "config", value_name = "FILE")]
    config_path: Option<String>,
    /// Where to write a PNG preview of the stylized shapes.
    #[arg(long = "preview", value_name = "FILE")]
    preview_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // --- 1. Argument Parsing & Setup ---
    let args = Args::parse();

    // --- 2. Pipeline Configuration ---
    let mut config = match &args.config_path {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading config {}", path))?;
            serde_json::from_str::<PipelineConfig>(&text).with_context(|| format!("parsing config {}", path))?
        }
        None => PipelineConfig::default(),
    };
    if let Some(palette_size) = args.palette_size {
        config.palette_size = palette_size;
    }
    let pipeline = ShapePipeline::new(config)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // --- 3. Upload & Processing ---
    let mut scene = SceneState::with_authored_composition()?;
    let ticket = scene.begin_upload();
    let upload = Upload::from_path(&args.input_path).await?;
    info!("loaded {} ({}, {} bytes)", args.input_path, upload.mime_type, upload.bytes.len());

    let report = process_upload(&pipeline, upload, rng).await;
    let data = match &report {
        Ok(Report::Generated(data)) => Some(data.clone()),
        _ => None,
    };
    let outcome = scene.apply_upload(ticket, report.map(Report::into_elements))?;

    // --- 4. Summary ---
    match (&outcome, &data) {
        (UploadOutcome::Applied { generated }, Some(data)) => {
            println!(
                "{}x{} image, {} palette swatches, + {} shapes from image",
                data.image_width,
                data.image_height,
                data.palette.len(),
                generated
            );
            for (shape, element) in data.shapes.iter().zip(&data.elements) {
                println!(
                    "  {:<24} {:<9} {} area={:<5} position=({:.2}, {:.2}, {:.2}) scale={:.4}",
                    element.name,
                    shape.archetype,
                    element.color,
                    shape.area,
                    element.position.x,
                    element.position.y,
                    element.position.z,
                    element.scale
                );
            }
        }
        _ => println!("no shapes found in {}", args.input_path),
    }
    println!(
        "scene: {} authored + {} generated elements",
        scene.authored().len(),
        scene.generated_count()
    );

    // --- 5. Output ---
    if let Some(output_path) = &args.output_path {
        let elements: Vec<_> = scene.elements().collect();
        let json = serde_json::to_string_pretty(&elements)?;
        tokio::fs::write(output_path, json)
            .await
            .with_context(|| format!("writing {}", output_path))?;
        println!("wrote {} elements to {}", elements.len(), output_path);
    }

    if let Some(preview_path) = &args.preview_path {
        match &data {
            Some(data) => {
                render_preview(data)
                    .save(preview_path)
                    .with_context(|| format!("writing {}", preview_path))?;
                println!("wrote preview to {}", preview_path);
            }
            None => println!("no preview written: nothing was generated"),
        }
    }

    Ok(())
}

/// Paints every stylized shape onto a white canvas of the processed image's size,
/// smallest first, so larger shapes land on top as they do in the scene.
fn render_preview(data: &GenerationData) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(data.image_width, data.image_height, Rgba([255, 255, 255, 255]));

    for shape in &data.shapes {
        let Some(path) = &shape.path else { continue };
        let polygon = preview_polygon(&path.to_outline(PREVIEW_TOLERANCE));
        if polygon.len() < 3 {
            continue;
        }
        let color: Rgba<u8> = shape.color.hex().as_pixel().into();
        draw_polygon_mut(&mut canvas, &polygon, color);
    }
    canvas
}

/// Rounds an outline to pixel corners. `draw_polygon_mut` wants an open polygon, so
/// repeated corners and the closing point are dropped.
fn preview_polygon(outline: &[glam::DVec2]) -> Vec<Point<i32>> {
    let mut polygon: Vec<Point<i32>> = outline
        .iter()
        .map(|p| Point::new(p.x.round() as i32, p.y.round() as i32))
        .collect();
    polygon.dedup();
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    polygon
}
