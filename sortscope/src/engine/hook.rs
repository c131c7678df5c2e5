//! Shared coordination state and the hook bound to the worker thread.
//!
//! ## Courtesy Step
//!
//! Every callback of [`EngineHook`], whatever the event kind, runs the same
//! sequence under the shared mutex before recording its event:
//!
//! ```text
//! lock ──▶ while paused && !stopped: wait ≤10ms (lock released)
//!      ──▶ stopped?  → Err(Cancelled)
//!      ──▶ wait throttle delay (lock released, woken by stop/set_delay)
//!      ──▶ stopped?  → Err(Cancelled)
//!      ──▶ record event + counters ──▶ unlock ──▶ Ok(())
//! ```
//!
//! These waits are the only places the algorithm ever blocks. Checking at each
//! operation bounds pause/cancel latency by one compare, read or write,
//! whatever algorithm is plugged in.

use sortscope_common::{Cancelled, Element, Handle, Hook, Step};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::aggregator::{ChangeSet, Snapshot};
use crate::domain::Counters;

/// Sleep quantum of the pause wait. A resume or stop notification cuts it short.
pub(crate) const PAUSE_QUANTUM: Duration = Duration::from_millis(10);

/// Fields guarded by [`Shared`]'s mutex.
#[derive(Debug)]
pub(crate) struct Coordination {
    pub stop_requested: bool,
    pub pause_requested: bool,
    pub delay: Duration,
    pub changes: ChangeSet,
    pub counters: Counters,
}

/// State shared between the controller and the worker of one run.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<Coordination>,
    wake: Condvar,
}

impl Shared {
    pub fn new(element_count: usize, delay: Duration) -> Self {
        Self {
            state: Mutex::new(Coordination {
                stop_requested: false,
                pause_requested: false,
                delay,
                changes: ChangeSet::new(element_count),
                counters: Counters::default(),
            }),
            wake: Condvar::new(),
        }
    }

    /// A panicking algorithm never holds this lock (hooks release it before
    /// returning), so poisoning carries no broken invariant.
    pub fn lock(&self) -> MutexGuard<'_, Coordination> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(
        &self,
        guard: MutexGuard<'a, Coordination>,
        timeout: Duration,
    ) -> MutexGuard<'a, Coordination> {
        self.wake.wait_timeout(guard, timeout).unwrap_or_else(PoisonError::into_inner).0
    }

    pub fn request_stop(&self) {
        self.lock().stop_requested = true;
        self.wake.notify_all();
    }

    pub fn set_paused(&self, paused: bool) {
        self.lock().pause_requested = paused;
        self.wake.notify_all();
    }

    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = delay;
        self.wake.notify_all();
    }

    pub fn counters(&self) -> Counters {
        self.lock().counters
    }

    /// Copy the counters and, if there is anything to report (or `force`),
    /// drain the pending changes. One lock acquisition for both.
    pub fn drain(&self, force: bool) -> (Counters, Option<Snapshot>) {
        let mut state = self.lock();
        let counters = state.counters;
        let snapshot = (force || !state.changes.is_empty()).then(|| state.changes.drain());
        (counters, snapshot)
    }

    /// Pause wait, cancel check and throttle sleep. Returns the re-acquired
    /// guard so the caller can record its event.
    fn courtesy(&self) -> Result<MutexGuard<'_, Coordination>, Cancelled> {
        let mut state = self.lock();

        while state.pause_requested && !state.stop_requested {
            state = self.wait(state, PAUSE_QUANTUM);
        }
        if state.stop_requested {
            return Err(Cancelled);
        }

        // Re-read the delay on every wake-up so set_delay() shortens a long sleep
        let started = Instant::now();
        loop {
            let remaining = state.delay.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break;
            }
            state = self.wait(state, remaining);
            if state.stop_requested {
                return Err(Cancelled);
            }
        }

        Ok(state)
    }
}

/// Hook bound to the worker thread for the duration of one run.
pub(crate) struct EngineHook {
    shared: Arc<Shared>,
}

impl EngineHook {
    pub fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }
}

fn touch(changes: &mut ChangeSet, handle: Option<Handle>) {
    if let Some(handle) = handle {
        changes.touch(handle);
    }
}

impl Hook for EngineHook {
    fn on_compare(&self, lhs: &Element, rhs: &Element) -> Step<()> {
        let mut state = self.shared.courtesy()?;
        touch(&mut state.changes, lhs.handle());
        touch(&mut state.changes, rhs.handle());
        state.counters.comparisons += 1;
        state.counters.accesses += 2;
        Ok(())
    }

    fn on_read(&self, item: &Element) -> Step<()> {
        let mut state = self.shared.courtesy()?;
        touch(&mut state.changes, item.handle());
        state.counters.accesses += 1;
        Ok(())
    }

    fn on_write(&self, item: &Element, _old: i32, new: i32) -> Step<()> {
        let mut state = self.shared.courtesy()?;
        if let Some(handle) = item.handle() {
            state.changes.assign(handle, new);
        }
        state.counters.accesses += 1;
        Ok(())
    }
}
