//! leafsense-preprocess – letterbox resize + normalize leaf photos.
//!
//! Turns an arbitrary-resolution RGB image into the fixed square tensor the
//! detection model was trained on: uniform scale, symmetric gray padding,
//! pixel values in 0-1, CHW layout with a leading batch dimension.  The
//! scale and padding that were applied come back as [`LetterboxMeta`] so a
//! caller can map tensor coordinates to original pixels.

use image::{imageops, RgbImage};
use ndarray::{Array3, Array4, Axis};
use std::path::Path;
use thiserror::Error;

/// Default model input side, in pixels.
pub const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default padding fill, the mid-gray used at training time.
pub const DEFAULT_FILL: [u8; 3] = [114, 114, 114];

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("could not read image: {0}")]
    ImageLoad(#[from] image::ImageError),
    #[error("image has zero width or height")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, PreprocessError>;

/// Scale and padding applied by [`Letterbox::run`].
///
/// `dw`/`dh` are the per-side (half) paddings in pixels; the actual borders
/// differ by at most one pixel from them because of the rounding split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxMeta {
    pub ratio: f32,
    pub dw: f32,
    pub dh: f32,
}

/// Letterbox preprocessor: resize preserving aspect ratio, pad to a square.
#[derive(Debug, Clone)]
pub struct Letterbox {
    size: u32,
    fill: [u8; 3],
}

impl Default for Letterbox {
    fn default() -> Self {
        Self {
            size: DEFAULT_INPUT_SIZE,
            fill: DEFAULT_FILL,
        }
    }
}

impl Letterbox {
    pub fn new(size: u32, fill: [u8; 3]) -> Self {
        Self { size, fill }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Resize + pad + normalize one image.
    ///
    /// Returns a `[1, 3, S, S]` float tensor in 0-1 plus the letterbox
    /// metadata.  The input image is never mutated.
    pub fn run(&self, img: &RgbImage) -> Result<(Array4<f32>, LetterboxMeta)> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(PreprocessError::EmptyImage);
        }

        let size = self.size as f32;
        let ratio = (size / h as f32).min(size / w as f32);
        let new_w = ((w as f32 * ratio).round() as u32).clamp(1, self.size);
        let new_h = ((h as f32 * ratio).round() as u32).clamp(1, self.size);

        let resized = if (new_w, new_h) != (w, h) {
            imageops::resize(img, new_w, new_h, imageops::FilterType::Triangle)
        } else {
            img.clone()
        };

        // Half padding per side.  The ±0.1 shift before rounding reproduces
        // the training-time preprocessing exactly: for odd totals the extra
        // pixel always lands on the bottom/right border.
        let dw = (self.size - new_w) as f32 / 2.0;
        let dh = (self.size - new_h) as f32 / 2.0;
        let left = (dw - 0.1).round() as usize;
        let top = (dh - 0.1).round() as usize;

        let s = self.size as usize;
        let mut canvas = Array3::<f32>::zeros((3, s, s));
        for c in 0..3 {
            canvas
                .index_axis_mut(Axis(0), c)
                .fill(self.fill[c] as f32 / 255.0);
        }

        let raw = resized.as_raw();
        let (cw, ch) = (new_w as usize, new_h as usize);
        for y in 0..ch {
            for x in 0..cw {
                let idx = (y * cw + x) * 3;
                canvas[[0, top + y, left + x]] = raw[idx] as f32 / 255.0;
                canvas[[1, top + y, left + x]] = raw[idx + 1] as f32 / 255.0;
                canvas[[2, top + y, left + x]] = raw[idx + 2] as f32 / 255.0;
            }
        }

        Ok((canvas.insert_axis(Axis(0)), LetterboxMeta { ratio, dw, dh }))
    }
}

/// Load an image file as RGB, rejecting unreadable or empty inputs.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let img = image::open(path)?.to_rgb8();
    if img.width() == 0 || img.height() == 0 {
        return Err(PreprocessError::EmptyImage);
    }
    Ok(img)
}
