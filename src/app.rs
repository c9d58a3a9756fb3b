//! Application controller: ties the detection loop to start/stop and the tick timer.

use std::time::{Duration, Instant};

use crate::pipeline::{DetectionLoop, TickReport};
use crate::render::RenderSurface;
use crate::schedule::{CooperativeTimer, PendingTick, RunController, RunState, RunToken};

/// Delay between the end of one tick and the start of the next.
pub const TICK_DELAY: Duration = Duration::from_millis(10);

/// Result of asking the app to do work.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Nothing was due, or the due tick belonged to a stopped session.
    Idle,
    Ran(TickReport),
    /// The tick failed; the app is stopped and shows the message.
    Halted(String),
}

pub struct NarratorApp {
    pipeline: DetectionLoop,
    controller: RunController,
    timer: CooperativeTimer,
    last_error: Option<String>,
}

impl NarratorApp {
    pub fn new(pipeline: DetectionLoop) -> Self {
        Self {
            pipeline,
            controller: RunController::new(),
            timer: CooperativeTimer::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.controller.state()
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    pub fn pending(&self) -> Option<PendingTick> {
        self.timer.pending()
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.timer.time_until_due(now)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn pipeline(&self) -> &DetectionLoop {
        &self.pipeline
    }

    /// Start detecting and run the first tick right away.
    ///
    /// Starting while already running does nothing.
    pub fn start(&mut self, now: Instant, surface: &mut dyn RenderSurface) -> TickOutcome {
        let Some(token) = self.controller.start() else {
            log::debug!("start ignored: already running");
            return TickOutcome::Idle;
        };
        log::info!("detection started");
        self.last_error = None;
        self.run_tick(token, now, surface)
    }

    /// Stop rescheduling. A tick already in progress is not interrupted.
    pub fn stop(&mut self) -> bool {
        self.timer.cancel();
        let stopped = self.controller.stop();
        if stopped {
            log::info!("detection stopped");
        }
        stopped
    }

    /// Run the pending tick if it is due.
    pub fn pump(&mut self, now: Instant, surface: &mut dyn RenderSurface) -> TickOutcome {
        match self.timer.take_due(now) {
            Some(token) if self.controller.is_current(token) => {
                self.run_tick(token, now, surface)
            }
            Some(_) => {
                log::debug!("discarding tick from a stopped session");
                TickOutcome::Idle
            }
            None => TickOutcome::Idle,
        }
    }

    /// Stop and release the camera.
    pub fn shutdown(&mut self) {
        self.stop();
        self.pipeline.release();
    }

    fn run_tick(
        &mut self,
        token: RunToken,
        now: Instant,
        surface: &mut dyn RenderSurface,
    ) -> TickOutcome {
        match self.pipeline.tick(now, surface) {
            Ok(report) => {
                if self.controller.is_current(token) {
                    let finished = Instant::now().max(now);
                    self.timer.schedule(finished, TICK_DELAY, token);
                }
                TickOutcome::Ran(report)
            }
            Err(err) => {
                let message = format!("{:#}", err);
                log::error!("tick failed, stopping detection: {}", message);
                let source = self.pipeline.source();
                if !source.is_healthy() {
                    let stats = source.stats();
                    log::warn!(
                        "camera {} unhealthy after {} frames",
                        stats.device,
                        stats.frames_captured
                    );
                }
                self.timer.cancel();
                self.controller.stop();
                if let Err(show_err) = surface.show_message(&format!("Error: {}\n", message)) {
                    log::warn!("failed to show error message: {:#}", show_err);
                }
                self.last_error = Some(message.clone());
                TickOutcome::Halted(message)
            }
        }
    }
}
