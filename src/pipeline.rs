//! Capture-detect-render loop.
//!
//! One `tick` runs, in order: capture, inference, confidence filter,
//! annotation, frame-rate update, render, narration. Nothing is retained
//! between ticks except the previous tick instant.

use anyhow::{Context, Result};
use std::time::Instant;

use crate::annotate::Annotator;
use crate::detect::{class_name, retain_confident, DetectorBackend};
use crate::ingest::FrameSource;
use crate::narrate::{narration_text, Narrator};
use crate::render::{format_log, RenderSurface};

/// Instantaneous frame rate from consecutive tick instants.
#[derive(Debug)]
pub struct FrameClock {
    previous: Instant,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self { previous: start }
    }

    /// `1 / (now - previous)`, infinite when no time has passed. Moves `previous` to `now`.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.previous).as_secs_f64();
        self.previous = now;
        if elapsed == 0.0 {
            f64::INFINITY
        } else {
            1.0 / elapsed
        }
    }
}

/// What one tick produced.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Class names with a trailing space, one per retained detection.
    pub labels: Vec<String>,
    pub fps: f64,
    pub log_text: String,
    pub narration: Option<String>,
}

pub struct DetectionLoop {
    source: Box<dyn FrameSource>,
    backend: Box<dyn DetectorBackend>,
    narrator: Box<dyn Narrator>,
    annotator: Annotator,
    clock: FrameClock,
    ticks: u64,
}

impl DetectionLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        backend: Box<dyn DetectorBackend>,
        narrator: Box<dyn Narrator>,
        annotator: Annotator,
        started_at: Instant,
    ) -> Self {
        Self {
            source,
            backend,
            narrator,
            annotator,
            clock: FrameClock::new(started_at),
            ticks: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn source(&self) -> &dyn FrameSource {
        self.source.as_ref()
    }

    /// Run one capture-detect-render-narrate iteration.
    pub fn tick(&mut self, now: Instant, surface: &mut dyn RenderSurface) -> Result<TickReport> {
        let frame = self.source.next_frame().context("camera read failed")?;
        let detections = self
            .backend
            .detect(&frame)
            .with_context(|| format!("{} inference failed", self.backend.name()))?;
        let retained = retain_confident(detections);

        let mut image = frame.into_rgb_image()?;
        let mut labels = Vec::with_capacity(retained.len());
        for det in &retained {
            let Some(name) = class_name(det.detection.class_index) else {
                log::warn!(
                    "dropping detection with unknown class index {}",
                    det.detection.class_index
                );
                continue;
            };
            let corners = det.detection.bbox.pixel_corners();
            self.annotator.annotate(&mut image, corners, name, det.confidence);
            labels.push(format!("{} ", name));
        }

        let fps = self.clock.tick(now);
        let log_text = format_log(&labels, fps);
        surface
            .present(&image, &log_text)
            .context("render failed")?;

        let narration = narration_text(&labels);
        if let Some(text) = &narration {
            self.narrator.speak(text).context("speech failed")?;
        }

        self.ticks += 1;
        log::debug!("tick {}: {} labels, {:.2} fps", self.ticks, labels.len(), fps);

        Ok(TickReport {
            labels,
            fps,
            log_text,
            narration,
        })
    }

    /// Release the camera.
    pub fn release(&mut self) {
        self.source.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fps_is_reciprocal_of_elapsed_time() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        assert!((clock.tick(t0 + Duration::from_millis(250)) - 4.0).abs() < 1e-9);
        assert!((clock.tick(t0 + Duration::from_millis(350)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn fps_is_infinite_when_no_time_passed() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        assert_eq!(clock.tick(t0), f64::INFINITY);
        let t1 = t0 + Duration::from_millis(500);
        assert!((clock.tick(t1) - 2.0).abs() < 1e-9);
        assert_eq!(clock.tick(t1), f64::INFINITY);
    }
}
