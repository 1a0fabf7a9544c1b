// THEORY:
// This file is the main entry point for the `suprema_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (like the `suprema_tester` harness
// or a rendering front-end).
//
// The primary goal is to export the `ShapePipeline`, the asynchronous upload entry
// points and the `SceneState` that owns the floating composition. The stage-by-stage
// machinery (`core_modules`) stays public for callers that want to drive a single
// stage, but the intended path is image -> `Report` -> `SceneState`.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod scene;
pub mod upload;

pub use error::PipelineError;
pub use pipeline::{PipelineConfig, Report, ShapePipeline};
pub use scene::{SceneState, UploadOutcome, UploadTicket};
pub use upload::{Upload, process_upload};
