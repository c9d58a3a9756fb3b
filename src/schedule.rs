//! Run state and cooperative tick scheduling.
//!
//! `RunController` is a two-state machine (`Stopped`, `Running`). Every start
//! issues a new `RunToken`; a tick is only allowed to run when it carries the
//! current token. `CooperativeTimer` holds at most one pending tick, so ticks
//! cannot pile up after rapid stop/start sequences.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Ticket for one start/stop session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunToken(u64);

#[derive(Debug)]
pub struct RunController {
    state: RunState,
    generation: u64,
}

impl Default for RunController {
    fn default() -> Self {
        Self::new()
    }
}

impl RunController {
    pub fn new() -> Self {
        Self {
            state: RunState::Stopped,
            generation: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// `Stopped -> Running`. Returns `None` when already running.
    pub fn start(&mut self) -> Option<RunToken> {
        if self.is_running() {
            return None;
        }
        self.generation += 1;
        self.state = RunState::Running;
        Some(RunToken(self.generation))
    }

    /// `Running -> Stopped`. Returns false when already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = RunState::Stopped;
        true
    }

    /// A tick may run only while running and only with the latest token.
    pub fn is_current(&self, token: RunToken) -> bool {
        self.is_running() && token.0 == self.generation
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTick {
    pub due: Instant,
    pub token: RunToken,
}

/// Single-slot timer polled by the event loop.
#[derive(Debug, Default)]
pub struct CooperativeTimer {
    pending: Option<PendingTick>,
}

impl CooperativeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tick `delay` after `now`, replacing any pending one.
    pub fn schedule(&mut self, now: Instant, delay: Duration, token: RunToken) {
        self.pending = Some(PendingTick {
            due: now + delay,
            token,
        });
    }

    pub fn pending(&self) -> Option<PendingTick> {
        self.pending
    }

    /// Take the pending tick if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<RunToken> {
        match self.pending {
            Some(tick) if tick.due <= now => {
                self.pending = None;
                Some(tick.token)
            }
            _ => None,
        }
    }

    /// Time left until the pending tick, zero when overdue.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|tick| tick.due.saturating_duration_since(now))
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_twice_issues_one_token() {
        let mut controller = RunController::new();
        let token = controller.start().expect("first start");
        assert!(controller.start().is_none());
        assert!(controller.is_current(token));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut controller = RunController::new();
        assert!(!controller.stop());
        controller.start();
        assert!(controller.stop());
        assert!(!controller.stop());
        assert_eq!(controller.state(), RunState::Stopped);
    }

    #[test]
    fn restart_invalidates_old_token() {
        let mut controller = RunController::new();
        let old = controller.start().expect("start");
        controller.stop();
        assert!(!controller.is_current(old));
        let new = controller.start().expect("restart");
        assert!(!controller.is_current(old));
        assert!(controller.is_current(new));
    }

    #[test]
    fn timer_fires_only_after_deadline() {
        let mut controller = RunController::new();
        let token = controller.start().expect("start");
        let mut timer = CooperativeTimer::new();
        let t0 = Instant::now();

        timer.schedule(t0, Duration::from_millis(10), token);
        assert_eq!(timer.take_due(t0 + Duration::from_millis(9)), None);
        assert_eq!(
            timer.time_until_due(t0 + Duration::from_millis(4)),
            Some(Duration::from_millis(6))
        );
        assert_eq!(timer.take_due(t0 + Duration::from_millis(10)), Some(token));
        assert_eq!(timer.take_due(t0 + Duration::from_millis(20)), None);
    }

    #[test]
    fn schedule_replaces_pending_tick() {
        let mut controller = RunController::new();
        let token = controller.start().expect("start");
        let mut timer = CooperativeTimer::new();
        let t0 = Instant::now();

        timer.schedule(t0, Duration::from_millis(10), token);
        timer.schedule(t0, Duration::from_millis(50), token);
        assert_eq!(timer.take_due(t0 + Duration::from_millis(10)), None);
        assert!(timer.take_due(t0 + Duration::from_millis(50)).is_some());
    }
}
