//! Still image frame source.
//!
//! Loads one PNG or JPEG from local disk on `connect` and hands out a copy of it
//! on every tick. Useful for running the detector without a webcam.

use anyhow::{Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

use super::{FrameSource, SourceStats};
use crate::frame::Frame;

const STILL_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub(crate) fn is_still_image_path(device: &str) -> bool {
    Path::new(device)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            STILL_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

pub struct StillImageSource {
    path: PathBuf,
    image: Option<RgbImage>,
    frame_count: u64,
}

impl StillImageSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            image: None,
            frame_count: 0,
        }
    }
}

impl FrameSource for StillImageSource {
    fn connect(&mut self) -> Result<()> {
        let image = image::open(&self.path)
            .with_context(|| format!("open still image {}", self.path.display()))?
            .to_rgb8();
        log::info!(
            "StillImageSource: loaded {} ({}x{})",
            self.path.display(),
            image.width(),
            image.height()
        );
        self.image = Some(image);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        let image = self
            .image
            .as_ref()
            .with_context(|| format!("{} not connected", self.path.display()))?;
        self.frame_count += 1;
        Frame::from_rgb_image(image.clone())
    }

    fn release(&mut self) {
        self.image = None;
    }

    fn is_healthy(&self) -> bool {
        self.image.is_some()
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            device: self.path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_still_image_extensions() {
        assert!(is_still_image_path("frames/desk.png"));
        assert!(is_still_image_path("DESK.JPG"));
        assert!(is_still_image_path("a.jpeg"));
        assert!(!is_still_image_path("/dev/video0"));
        assert!(!is_still_image_path("clip.mp4"));
    }

    #[test]
    fn still_source_repeats_the_loaded_image() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("still.png");
        let mut image = RgbImage::new(4, 3);
        image.put_pixel(1, 2, image::Rgb([10, 20, 30]));
        image.save(&path)?;

        let mut source = StillImageSource::new(&path);
        source.connect()?;
        let first = source.next_frame()?;
        let second = source.next_frame()?;
        assert_eq!((first.width, first.height), (4, 3));
        assert_eq!(first.pixels(), second.pixels());
        assert_eq!(first.into_rgb_image()?.get_pixel(1, 2).0, [10, 20, 30]);
        assert_eq!(source.stats().frames_captured, 2);
        Ok(())
    }

    #[test]
    fn missing_file_fails_on_connect() {
        let mut source = StillImageSource::new("/nonexistent/still.png");
        let err = source.connect().err().expect("missing file must fail");
        assert!(err.to_string().contains("open still image"));
    }
}
