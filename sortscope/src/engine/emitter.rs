//! Fixed-rate snapshot schedule.
//!
//! The emitter owns no thread: the controller asks it whether a tick is due
//! each time it polls the run. Ticks follow a fixed grid (`start + k *
//! interval`) so delivery rate does not depend on how often the controller
//! polls, how fast the algorithm is, or how long the throttle delay is. A
//! controller that falls behind skips the missed ticks instead of replaying
//! them in a burst.

use std::time::{Duration, Instant};

/// Default snapshot rate.
pub const DEFAULT_FPS: u32 = 25;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct Emitter {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Emitter {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval: interval.max(MIN_INTERVAL), next_due: None }
    }

    #[must_use]
    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the schedule; the first tick is one interval from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Returns `true` (and advances the schedule) if a tick is due at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let next = due + self.interval;
        self.next_due = Some(if next > now { next } else { now + self.interval });
        true
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::from_fps(DEFAULT_FPS)
    }
}
