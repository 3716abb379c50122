use super::PreviewSurface;
use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use minifb::{Key, Window, WindowOptions};

const TITLE: &str = "Hand Gesture Control";

/// Key that stops the session
const ABORT_KEY: Key = Key::Escape;

/// Preview window backed by `minifb`
pub struct PreviewWindow {
    window: Option<Window>,
    buf: Vec<u32>,
}

impl PreviewWindow {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut window = Window::new(
            TITLE,
            width as usize,
            height as usize,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("{}", e))
        .context("Failed to open preview window")?;

        window.set_target_fps(60);

        tracing::info!("Preview window opened ({}x{})", width, height);

        Ok(Self {
            window: Some(window),
            buf: Vec::new(),
        })
    }
}

/// Pack an RGB frame into minifb's 0RGB pixel layout
fn pack_pixels(frame: &RgbImage, buf: &mut Vec<u32>) {
    buf.clear();
    buf.extend(
        frame
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32),
    );
}

impl PreviewSurface for PreviewWindow {
    fn show(&mut self, frame: &RgbImage) -> Result<()> {
        let Some(window) = self.window.as_mut() else {
            return Ok(());
        };

        pack_pixels(frame, &mut self.buf);
        let (width, height) = frame.dimensions();
        window
            .update_with_buffer(&self.buf, width as usize, height as usize)
            .map_err(|e| anyhow!("{}", e))
            .context("Failed to update preview window")
    }

    fn abort_requested(&self) -> bool {
        match &self.window {
            Some(window) => !window.is_open() || window.is_key_down(ABORT_KEY),
            None => false,
        }
    }

    fn close(&mut self) {
        if self.window.take().is_some() {
            tracing::info!("Preview window closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_pack_as_0rgb() {
        let mut frame = RgbImage::new(2, 1);
        frame.put_pixel(0, 0, image::Rgb([0x12, 0x34, 0x56]));
        frame.put_pixel(1, 0, image::Rgb([0xFF, 0x00, 0x01]));
        let mut buf = vec![7; 10];
        pack_pixels(&frame, &mut buf);
        assert_eq!(buf, vec![0x0012_3456, 0x00FF_0001]);
    }
}
