use super::preprocess::{Letterbox, Preprocessor};
use super::types::{Hand, LandmarkSource, HAND_KEYPOINTS};
use anyhow::{bail, Context, Result};
use image::RgbImage;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

/// Side length of the square landmark model input
const INPUT_SIZE: u32 = 224;

/// Single-hand landmark model (MediaPipe hand_landmark exported to ONNX)
///
/// Runs on the whole letterboxed frame, so it expects the hand to occupy a
/// reasonable part of the picture. Outputs:
/// - `[1, 63]` landmarks as (x, y, z) triples in model input pixels
/// - `[1, 1]` hand presence logit
pub struct OnnxHandLandmarker {
    session: Session,
    preprocessor: Preprocessor,
    min_confidence: f32,
}

impl OnnxHandLandmarker {
    /// Load the landmark model from an ONNX file
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `min_confidence` - Hand presence probability below which no hand is reported
    pub fn new<P: AsRef<Path>>(model_path: P, min_confidence: f32) -> Result<Self> {
        let path = model_path.as_ref();

        tracing::info!("Loading hand landmark model from {}", path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        tracing::info!("Hand landmark model loaded successfully");

        Ok(Self {
            session,
            preprocessor: Preprocessor::new(INPUT_SIZE, INPUT_SIZE),
            min_confidence: min_confidence.clamp(0.0, 1.0),
        })
    }
}

impl LandmarkSource for OnnxHandLandmarker {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Hand>> {
        let _span = tracing::debug_span!("hand_landmarks").entered();

        let (input, letterbox) = self.preprocessor.preprocess(frame)?;
        let shape = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3];
        let data: Vec<f32> = input.iter().copied().collect();
        let input = Tensor::from_array((shape, data)).context("Failed to build input tensor")?;

        let _infer_span = tracing::debug_span!("inference").entered();
        let outputs = self
            .session
            .run(ort::inputs![input])
            .context("Failed to run inference")?;
        drop(_infer_span);

        if outputs.len() < 2 {
            bail!("Landmark model produced {} outputs, expected at least 2", outputs.len());
        }

        let (_, presence) = outputs[1]
            .try_extract_tensor::<f32>()
            .context("Failed to read hand presence output")?;
        let score = presence.first().copied().map(sigmoid).unwrap_or(0.0);
        tracing::debug!("Hand presence {:.2}", score);

        if score < self.min_confidence {
            return Ok(Vec::new());
        }

        let (_, coords) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to read landmark output")?;

        Ok(decode_landmarks(coords, &letterbox).into_iter().collect())
    }
}

fn sigmoid(logit: f32) -> f32 {
    1.0 / (1.0 + (-logit).exp())
}

/// Decode flat (x, y, z) model output into a hand in frame pixels
fn decode_landmarks(coords: &[f32], letterbox: &Letterbox) -> Option<Hand> {
    if coords.len() < HAND_KEYPOINTS * 3 {
        tracing::warn!(
            "Expected {} landmark values, got {}",
            HAND_KEYPOINTS * 3,
            coords.len()
        );
        return None;
    }

    let positions: Vec<(f32, f32)> = coords
        .chunks_exact(3)
        .take(HAND_KEYPOINTS)
        .map(|xyz| letterbox.to_frame(xyz[0], xyz[1]))
        .collect();

    Some(Hand::from_positions(&positions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(8.0) > 0.99);
        assert!(sigmoid(-8.0) < 0.01);
    }

    #[test]
    fn decode_rescales_to_frame_pixels() {
        let letterbox = Letterbox::fit((448, 224), (224, 224));
        let mut coords = vec![0.0; HAND_KEYPOINTS * 3];
        // index tip at the model center
        coords[8 * 3] = 112.0;
        coords[8 * 3 + 1] = 112.0;
        let hand = decode_landmarks(&coords, &letterbox).unwrap();
        assert_eq!(hand.len(), HAND_KEYPOINTS);
        let tip = hand.get(8).unwrap();
        assert_eq!((tip.x, tip.y), (224.0, 112.0));
    }

    #[test]
    fn short_output_yields_no_hand() {
        let letterbox = Letterbox::fit((224, 224), (224, 224));
        assert!(decode_landmarks(&[0.0; 12], &letterbox).is_none());
    }
}
