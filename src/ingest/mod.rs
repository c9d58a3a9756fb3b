//! Frame ingestion sources.
//!
//! This module provides different sources for captured frames:
//! - USB/V4L2 webcams (feature: ingest-v4l2)
//! - Still images on disk (PNG/JPEG), repeated every tick
//! - Synthetic `stub://` source (testing)
//!
//! Every source produces RGB24 `Frame` instances. Encodings negotiated by the
//! device (YUYV, NV12, MJPG) are normalized at capture time.

mod normalize;
pub mod still;
pub mod synthetic;
#[cfg(feature = "ingest-v4l2")]
pub mod v4l2;

use anyhow::Result;
#[cfg(not(feature = "ingest-v4l2"))]
use anyhow::anyhow;

use crate::config::CameraSettings;
use crate::frame::Frame;

pub use normalize::{normalize_to_rgb, PixelFormat};
pub use still::StillImageSource;
pub use synthetic::SyntheticSource;
#[cfg(feature = "ingest-v4l2")]
pub use v4l2::V4l2Source;

/// A camera-like producer of frames.
pub trait FrameSource {
    /// Open the underlying device.
    fn connect(&mut self) -> Result<()>;

    /// Capture the next frame.
    fn next_frame(&mut self) -> Result<Frame>;

    /// Release the device. Safe to call more than once.
    fn release(&mut self);

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> SourceStats;
}

/// Statistics for a frame source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub device: String,
}

/// Device path for a camera index (`0` -> `/dev/video0`).
pub fn device_for_index(index: u32) -> String {
    format!("/dev/video{}", index)
}

/// Build the source named by the camera settings.
///
/// - `stub://...` selects the synthetic source
/// - paths ending in `.png`, `.jpg` or `.jpeg` select a still image
/// - anything else is treated as a V4L2 device node
pub fn open_source(settings: &CameraSettings) -> Result<Box<dyn FrameSource>> {
    let device = settings.device.as_str();
    if device.starts_with("stub://") {
        return Ok(Box::new(SyntheticSource::new(settings.clone())));
    }
    if still::is_still_image_path(device) {
        return Ok(Box::new(StillImageSource::new(device)));
    }

    #[cfg(feature = "ingest-v4l2")]
    {
        Ok(Box::new(V4l2Source::new(settings.clone())?))
    }
    #[cfg(not(feature = "ingest-v4l2"))]
    {
        Err(anyhow!(
            "camera device {} requires the ingest-v4l2 feature",
            device
        ))
    }
}
