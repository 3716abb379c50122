use anyhow::Result;
use image::{imageops, RgbImage};
use ndarray::Array4;

/// Mapping between model input space and the original frame
///
/// The frame is scaled uniformly to fit the model input and centered,
/// leaving `pad_x`/`pad_y` pixels of padding on each side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

impl Letterbox {
    /// Compute the letterbox that fits `frame` into `target` while keeping aspect ratio
    pub fn fit(frame: (u32, u32), target: (u32, u32)) -> Self {
        let (fw, fh) = (frame.0.max(1) as f32, frame.1.max(1) as f32);
        let (tw, th) = (target.0 as f32, target.1 as f32);
        let scale = (tw / fw).min(th / fh);
        Self {
            scale,
            pad_x: (tw - fw * scale) / 2.0,
            pad_y: (th - fh * scale) / 2.0,
        }
    }

    /// Convert a point in model input pixels back to frame pixels
    pub fn to_frame(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

/// Preprocessor for converting RGB frames to landmark model input tensors
pub struct Preprocessor {
    target_width: u32,
    target_height: u32,
}

impl Preprocessor {
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
        }
    }

    /// Preprocess an RGB frame into a normalized NHWC tensor
    ///
    /// Steps:
    /// 1. Letterbox-resize to target dimensions (black padding)
    /// 2. Convert to float and normalize to [0, 1]
    ///
    /// Returns: Array4<f32> with shape [1, height, width, 3] and the letterbox used
    pub fn preprocess(&self, image: &RgbImage) -> Result<(Array4<f32>, Letterbox)> {
        let _span = tracing::debug_span!("preprocess").entered();

        let letterbox = Letterbox::fit(image.dimensions(), (self.target_width, self.target_height));
        let scaled_width = ((image.width() as f32 * letterbox.scale).round() as u32).max(1);
        let scaled_height = ((image.height() as f32 * letterbox.scale).round() as u32).max(1);

        let resized = if (scaled_width, scaled_height) != image.dimensions() {
            imageops::resize(
                image,
                scaled_width,
                scaled_height,
                imageops::FilterType::Triangle,
            )
        } else {
            image.clone()
        };

        let offset_x = letterbox.pad_x.floor() as u32;
        let offset_y = letterbox.pad_y.floor() as u32;
        let mut tensor = Array4::<f32>::zeros((
            1,
            self.target_height as usize,
            self.target_width as usize,
            3,
        ));

        for (x, y, pixel) in resized.enumerate_pixels() {
            let (tx, ty) = (x + offset_x, y + offset_y);
            if tx >= self.target_width || ty >= self.target_height {
                continue;
            }
            for c in 0..3 {
                tensor[[0, ty as usize, tx as usize, c]] = pixel[c] as f32 / 255.0;
            }
        }

        Ok((tensor, letterbox))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_frame_is_padded_vertically() {
        let lb = Letterbox::fit((640, 480), (224, 224));
        assert!((lb.scale - 0.35).abs() < 1e-6);
        assert!(lb.pad_x.abs() < 1e-3);
        assert!((lb.pad_y - 28.0).abs() < 1e-4);
    }

    #[test]
    fn model_point_maps_back_to_frame() {
        let lb = Letterbox::fit((640, 480), (224, 224));
        let (x, y) = lb.to_frame(112.0, 112.0);
        assert!((x - 320.0).abs() < 1e-3);
        assert!((y - 240.0).abs() < 1e-3);
    }

    #[test]
    fn tensor_is_nhwc_and_normalized() {
        let frame = RgbImage::from_pixel(448, 224, image::Rgb([255, 0, 51]));
        let (tensor, lb) = Preprocessor::new(224, 224).preprocess(&frame).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert_eq!(lb.pad_y, 56.0);
        // padding stays black
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
        // content row
        assert!((tensor[[0, 112, 112, 0]] - 1.0).abs() < 1e-2);
        assert!((tensor[[0, 112, 112, 2]] - 0.2).abs() < 1e-2);
    }
}
