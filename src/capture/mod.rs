mod webcam;

pub use webcam::WebcamCapture;

use anyhow::Result;
use image::RgbImage;

/// Trait for camera capture sources
pub trait CaptureSource {
    /// Capture a single frame
    fn capture_frame(&mut self) -> Result<RgbImage>;

    /// Get the resolution of captured frames
    fn resolution(&self) -> (u32, u32);

    /// Whether the device can still deliver frames
    fn is_open(&self) -> bool;

    /// Stop capturing and release the device. Safe to call more than once.
    fn release(&mut self) -> Result<()>;
}
