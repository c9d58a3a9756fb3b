use anyhow::Result;

use crate::detect::result::Detection;
use crate::frame::Frame;

/// Object detector backend.
///
/// A backend owns the loaded model and turns one frame into a list of raw
/// detections. Confidence filtering happens in the detection loop, not here.
pub trait DetectorBackend {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    ///
    /// Box coordinates are in the frame's pixel space.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;

    /// Optional warm-up hook, run once before the first tick.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
