pub mod overlay;
mod window;

pub use window::PreviewWindow;

use anyhow::Result;
use image::RgbImage;

/// Trait for surfaces that show the annotated camera feed
pub trait PreviewSurface {
    /// Whether frames should be annotated and shown at all
    fn wants_frames(&self) -> bool {
        true
    }

    /// Show a frame
    fn show(&mut self, frame: &RgbImage) -> Result<()>;

    /// Whether the user asked to stop (abort key or window closed)
    fn abort_requested(&self) -> bool;

    /// Tear down the surface. Safe to call more than once.
    fn close(&mut self);
}

/// No-op surface for running without a window
#[derive(Debug, Default)]
pub struct Headless;

impl PreviewSurface for Headless {
    fn wants_frames(&self) -> bool {
        false
    }

    fn show(&mut self, _frame: &RgbImage) -> Result<()> {
        Ok(())
    }

    fn abort_requested(&self) -> bool {
        false
    }

    fn close(&mut self) {}
}
