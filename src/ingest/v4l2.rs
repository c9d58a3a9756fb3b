//! V4L2 webcam source.
//!
//! This module provides `V4l2Source` for capturing frames from a local V4L2
//! device node (e.g. /dev/video0).
//!
//! The V4L2 source is responsible for:
//! - Opening the device and requesting the configured resolution
//! - Accepting whatever resolution and encoding the device negotiates
//! - Normalizing captured buffers to RGB24
//! - Releasing the device when the application closes

use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;
use std::time::{Duration, Instant};

use super::normalize::{normalize_to_rgb, PixelFormat};
use super::{FrameSource, SourceStats};
use crate::config::CameraSettings;
use crate::frame::Frame;

const STREAM_BUFFERS: u32 = 4;
const HEALTH_GRACE: Duration = Duration::from_secs(2);

/// V4L2 frame source backed by an mmap capture stream.
pub struct V4l2Source {
    settings: CameraSettings,
    state: Option<DeviceState>,
    format: PixelFormat,
    frame_count: u64,
    last_frame_at: Option<Instant>,
    last_error: Option<String>,
    active_width: u32,
    active_height: u32,
}

#[self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

impl V4l2Source {
    pub fn new(settings: CameraSettings) -> Result<Self> {
        Ok(Self {
            active_width: settings.width,
            active_height: settings.height,
            settings,
            state: None,
            format: PixelFormat::Rgb24,
            frame_count: 0,
            last_frame_at: None,
            last_error: None,
        })
    }
}

impl FrameSource for V4l2Source {
    fn connect(&mut self) -> Result<()> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let device = v4l::Device::with_path(&self.settings.device)
            .with_context(|| format!("open v4l2 device {}", self.settings.device))?;
        let mut format = device.format().context("read v4l2 format")?;
        format.width = self.settings.width;
        format.height = self.settings.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!(
                    "V4l2Source: failed to set format on {}: {}",
                    self.settings.device,
                    err
                );
                device
                    .format()
                    .context("read v4l2 format after set failure")?
            }
        };

        self.format = PixelFormat::from_fourcc(&format.fourcc.repr).ok_or_else(|| {
            anyhow!(
                "v4l2 device {} negotiated unsupported encoding {}",
                self.settings.device,
                format.fourcc
            )
        })?;
        self.active_width = format.width;
        self.active_height = format.height;
        self.last_error = None;

        let state = DeviceStateBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, STREAM_BUFFERS)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()
        .map_err(|err| {
            self.last_error = Some(err.to_string());
            err
        })?;
        self.state = Some(state);

        log::info!(
            "V4l2Source: connected to {} ({}x{} {:?})",
            self.settings.device,
            self.active_width,
            self.active_height,
            self.format
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        use v4l::io::traits::CaptureStream;

        let state = self.state.as_mut().context("v4l2 device not connected")?;
        let (width, height, format) = (self.active_width, self.active_height, self.format);
        let captured = state.with_mut(|fields| {
            fields.stream.next().map(|(buf, meta)| {
                let used = meta.bytesused as usize;
                let bytes = if used > 0 && used <= buf.len() {
                    &buf[..used]
                } else {
                    buf
                };
                normalize_to_rgb(bytes, width, height, format)
            })
        });
        let rgb = match captured {
            Ok(rgb) => rgb?,
            Err(err) => {
                self.last_error = Some(err.to_string());
                return Err(anyhow::Error::new(err).context("capture v4l2 frame"));
            }
        };

        self.frame_count += 1;
        self.last_frame_at = Some(Instant::now());
        Frame::new(rgb, width, height)
    }

    fn release(&mut self) {
        if self.state.take().is_some() {
            log::info!("V4l2Source: released {}", self.settings.device);
        }
    }

    fn is_healthy(&self) -> bool {
        if self.state.is_none() || self.last_error.is_some() {
            return false;
        }
        self.last_frame_at
            .map(|at| at.elapsed() <= HEALTH_GRACE)
            .unwrap_or(true)
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            device: self.settings.device.clone(),
        }
    }
}

impl Drop for V4l2Source {
    fn drop(&mut self) {
        self.release();
    }
}
