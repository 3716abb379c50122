mod onnx;
mod preprocess;
pub mod types;

pub use onnx::OnnxHandLandmarker;
pub use types::{ids, Hand, Keypoint, LandmarkSource};

use anyhow::Result;

/// Create the default landmark detector (ONNX hand landmark model)
pub fn create_default_detector(
    model_path: &str,
    min_confidence: f32,
) -> Result<Box<dyn LandmarkSource>> {
    let model = OnnxHandLandmarker::new(model_path, min_confidence)?;
    Ok(Box::new(model))
}
