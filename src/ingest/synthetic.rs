//! Synthetic frame source for `stub://` devices.

use anyhow::{anyhow, Result};

use super::{FrameSource, SourceStats};
use crate::config::CameraSettings;
use crate::frame::Frame;

/// Generates deterministic gradient frames at the requested resolution.
pub struct SyntheticSource {
    settings: CameraSettings,
    connected: bool,
    frame_count: u64,
}

impl SyntheticSource {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            connected: false,
            frame_count: 0,
        }
    }

    fn generate_pixels(&self) -> Vec<u8> {
        let width = self.settings.width as usize;
        let height = self.settings.height as usize;
        let shift = self.frame_count as usize;
        let mut pixels = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x + shift) % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        log::info!(
            "SyntheticSource: connected to {} ({}x{})",
            self.settings.device,
            self.settings.width,
            self.settings.height
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        if !self.connected {
            return Err(anyhow!("{} not connected", self.settings.device));
        }
        self.frame_count += 1;
        Frame::new(
            self.generate_pixels(),
            self.settings.width,
            self.settings.height,
        )
    }

    fn release(&mut self) {
        if self.connected {
            log::info!("SyntheticSource: released {}", self.settings.device);
        }
        self.connected = false;
    }

    fn is_healthy(&self) -> bool {
        self.connected
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            device: self.settings.device.clone(),
        }
    }
}
