//! Captured frames.
//!
//! - `Frame`: one RGB image handed from a `FrameSource` to the detection loop.
//!
//! A frame lives for exactly one tick. Sources produce it, the detector reads it,
//! the annotator consumes it into an `RgbImage` for drawing and display.

use anyhow::{anyhow, Result};
use image::RgbImage;

/// Single captured RGB frame (`width * height * 3` bytes, row-major).
pub struct Frame {
    data: Vec<u8>,

    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Wrap packed RGB24 pixels. Dimensions must be positive and match the buffer.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow!("frame dimensions must be positive"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if data.len() != expected {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                data.len()
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn from_rgb_image(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }

    /// Packed RGB24 pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Borrow the frame as an image for resampling.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| anyhow!("frame buffer does not match its dimensions"))
    }

    /// Consume the frame into a drawable image.
    pub fn into_rgb_image(self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| anyhow!("frame buffer does not match its dimensions"))
    }
}
