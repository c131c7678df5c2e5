//! # Execution Engine
//!
//! A [`Run`] executes one sorting algorithm on a dedicated worker thread and
//! lets the controlling thread watch, pause, resume and cancel it.
//!
//! ## Threads
//!
//! ```text
//!  controller thread                         worker thread
//!  ─────────────────                         ─────────────
//!  start() ── spawn ───────────────────────▶ algorithm(&mut Tracked)
//!  poll()  ── tick due? drain ─┐                 │ every compare/read/write
//!                              ▼                 ▼
//!                       ┌──────────── Shared (Mutex + Condvar) ───────────┐
//!                       │ stop/pause flags · delay · ChangeSet · Counters │
//!                       └─────────────────────────────────────────────────┘
//!  stop()  ── request_stop, join, drain ×2 ◀─── Err(Cancelled) unwinds via ?
//! ```
//!
//! The sequence moves into the worker on `start()` and comes back on join, so
//! the controller cannot touch it while the run is `Running` or `Paused`.
//!
//! ## Consumers
//!
//! [`Run::subscribe`] hands out a channel receiving [`RunEvent`]s:
//! state changes, snapshots (at the emitter rate) and counters.

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info};
use sortscope_common::{Algorithm, Cancelled, Element, Step, Tracked};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::aggregator::Snapshot;
use super::emitter::{Emitter, DEFAULT_FPS};
use super::hook::{EngineHook, Shared};
use crate::domain::{Counters, Outcome, RunError, RunState};

/// How long `wait_finished` sleeps between polls when no tick is due sooner.
const POLL_QUANTUM: Duration = Duration::from_millis(5);

/// Engine settings chosen by the controller before a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Throttle delay inserted at every instrumented operation.
    pub delay: Duration,
    /// Snapshot rate.
    pub fps: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { delay: Duration::ZERO, fps: DEFAULT_FPS }
    }
}

/// Events published to subscribers.
#[derive(Debug, Clone)]
pub enum RunEvent {
    StateChanged(RunState),
    Snapshot(Arc<Snapshot>),
    Counters(Counters),
}

/// What the worker hands back when it exits.
struct WorkerExit {
    items: Vec<Element>,
    outcome: Outcome,
}

/// One algorithm execution over one sequence.
pub struct Run {
    shared: Arc<Shared>,
    /// `None` while the worker owns it, or after a worker panic.
    sequence: Option<Vec<Element>>,
    element_count: usize,
    state: RunState,
    worker: Option<JoinHandle<WorkerExit>>,
    emitter: Emitter,
    subscribers: Vec<Sender<RunEvent>>,
    algorithm: Option<&'static str>,
    outcome: Option<Outcome>,
    started_at: Option<Instant>,
    elapsed: Option<Duration>,
}

impl Run {
    #[must_use]
    pub fn new(sequence: Vec<Element>, config: RunConfig) -> Self {
        let element_count = sequence.len();
        Self {
            shared: Arc::new(Shared::new(element_count, config.delay)),
            sequence: Some(sequence),
            element_count,
            state: RunState::NotStarted,
            worker: None,
            emitter: Emitter::from_fps(config.fps),
            subscribers: Vec::new(),
            algorithm: None,
            outcome: None,
            started_at: None,
            elapsed: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Register a consumer. Events published before this call are not replayed.
    pub fn subscribe(&mut self) -> Receiver<RunEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Launch a catalogued algorithm.
    ///
    /// # Errors
    /// [`RunError::AlreadyStarted`] unless the run is `NotStarted`;
    /// [`RunError::Spawn`] if the worker thread cannot be created.
    pub fn start(&mut self, algorithm: &Algorithm) -> Result<(), RunError> {
        self.start_with(algorithm.name, algorithm.run)
    }

    /// Launch any sorting routine honoring the plug-in contract.
    ///
    /// # Errors
    /// Same as [`Run::start`].
    pub fn start_with<F>(&mut self, name: &'static str, sort: F) -> Result<(), RunError>
    where
        F: FnOnce(&mut Tracked<'_>) -> Step<()> + Send + 'static,
    {
        if self.state != RunState::NotStarted {
            return Err(RunError::AlreadyStarted(self.state));
        }
        let items = self.sequence.take().unwrap_or_default();

        // Hand the sequence over through a slot we can take back if spawning fails
        let (handoff_tx, handoff_rx) = crossbeam_channel::bounded::<Vec<Element>>(1);
        let _ = handoff_tx.send(items);
        let worker_rx = handoff_rx.clone();
        let shared = Arc::clone(&self.shared);

        let spawned = thread::Builder::new().name("sortscope-worker".into()).spawn(move || {
            let mut items = worker_rx.recv().unwrap_or_default();
            let hook = EngineHook::new(shared);
            let outcome = match sort(&mut Tracked::new(&mut items, &hook)) {
                Ok(()) => Outcome::Completed,
                Err(Cancelled) => Outcome::Cancelled,
            };
            WorkerExit { items, outcome }
        });

        match spawned {
            Ok(handle) => self.worker = Some(handle),
            Err(e) => {
                self.sequence = handoff_rx.try_recv().ok();
                return Err(RunError::Spawn(e));
            }
        }

        info!("Started {name} on {} elements", self.element_count);
        self.algorithm = Some(name);
        self.started_at = Some(Instant::now());
        self.set_state(RunState::Running);
        self.emitter.start(Instant::now());
        Ok(())
    }

    /// Ask the worker to block at its next instrumented operation.
    ///
    /// # Errors
    /// [`RunError::InvalidTransition`] unless the run is `Running`.
    pub fn pause(&mut self) -> Result<(), RunError> {
        if self.state != RunState::Running {
            return Err(RunError::InvalidTransition { op: "pause", state: self.state });
        }
        self.shared.set_paused(true);
        self.set_state(RunState::Paused);
        self.emitter.stop();
        Ok(())
    }

    /// # Errors
    /// [`RunError::InvalidTransition`] unless the run is `Paused`.
    pub fn resume(&mut self) -> Result<(), RunError> {
        if self.state != RunState::Paused {
            return Err(RunError::InvalidTransition { op: "resume", state: self.state });
        }
        self.shared.set_paused(false);
        self.set_state(RunState::Running);
        self.emitter.start(Instant::now());
        Ok(())
    }

    /// Cancel the run and block until the worker has exited.
    ///
    /// # Errors
    /// [`RunError::InvalidTransition`] unless the run is `Running` or `Paused`.
    pub fn stop(&mut self) -> Result<(), RunError> {
        if !self.state.is_active() {
            return Err(RunError::InvalidTransition { op: "stop", state: self.state });
        }
        self.finish();
        Ok(())
    }

    /// Change the throttle delay; effective at the next instrumented operation.
    pub fn set_delay(&self, delay: Duration) {
        self.shared.set_delay(delay);
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.shared.lock().delay
    }

    #[must_use]
    pub fn counters(&self) -> Counters {
        self.shared.counters()
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    #[must_use]
    pub fn algorithm(&self) -> Option<&'static str> {
        self.algorithm
    }

    /// How the worker ended; `None` until `Finished`.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Wall time from start to finish (or until now while active).
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed.or_else(|| self.started_at.map(|t| t.elapsed()))
    }

    /// The sequence, when no worker owns it.
    #[must_use]
    pub fn sequence(&self) -> Option<&[Element]> {
        self.sequence.as_deref()
    }

    pub fn take_sequence(&mut self) -> Option<Vec<Element>> {
        if self.state.is_active() {
            return None;
        }
        self.sequence.take()
    }

    /// Next instant at which `poll()` has a snapshot to deliver.
    #[must_use]
    pub fn next_tick(&self) -> Option<Instant> {
        self.emitter.next_due()
    }

    /// Drive the run from the controller thread: detect natural completion and
    /// deliver a snapshot when the emitter is due. Call it often.
    pub fn poll(&mut self) {
        if self.state.is_active() && self.worker.as_ref().is_some_and(JoinHandle::is_finished) {
            self.finish();
            return;
        }
        if self.emitter.fire(Instant::now()) {
            self.emit(false);
        }
    }

    /// Poll until `Finished` or until `timeout` elapses. Returns `true` once
    /// finished. A run that was never started (or stays paused) only returns on
    /// timeout.
    pub fn wait_finished(&mut self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            self.poll();
            if self.state == RunState::Finished {
                return true;
            }

            let now = Instant::now();
            if deadline.is_some_and(|d| now >= d) {
                return false;
            }
            let mut wake = now + POLL_QUANTUM;
            if let Some(tick) = self.emitter.next_due() {
                wake = wake.min(tick);
            }
            if let Some(d) = deadline {
                wake = wake.min(d);
            }
            thread::sleep(wake.saturating_duration_since(now));
        }
    }

    /// Stop (no-op if the worker already exited), join, drain twice, `Finished`.
    fn finish(&mut self) {
        self.shared.request_stop();

        if let Some(worker) = self.worker.take() {
            match worker.join() {
                Ok(exit) => {
                    self.sequence = Some(exit.items);
                    self.outcome = Some(exit.outcome);
                }
                Err(_) => {
                    error!(
                        "{} panicked; its sequence is lost",
                        self.algorithm.unwrap_or("worker")
                    );
                    self.outcome = Some(Outcome::Panicked);
                }
            }
        }
        self.elapsed = self.started_at.map(|t| t.elapsed());

        // Drain twice: the first carries real changes, if any; the second is
        // empty and tells renderers to unmark every item.
        self.emit(false);
        self.emit(true);

        self.emitter.stop();
        self.set_state(RunState::Finished);

        let counters = self.shared.counters();
        info!(
            "{} {} after {:?}: {} comparisons, {} accesses",
            self.algorithm.unwrap_or("run"),
            self.outcome.unwrap_or(Outcome::Cancelled),
            self.elapsed.unwrap_or_default(),
            counters.comparisons,
            counters.accesses
        );
    }

    fn emit(&mut self, force: bool) {
        let (counters, snapshot) = self.shared.drain(force);
        if let Some(snapshot) = snapshot {
            self.publish(&RunEvent::Snapshot(Arc::new(snapshot)));
        }
        self.publish(&RunEvent::Counters(counters));
    }

    fn set_state(&mut self, state: RunState) {
        debug!("Run state {} -> {state}", self.state);
        self.state = state;
        self.publish(&RunEvent::StateChanged(state));
    }

    fn publish(&mut self, event: &RunEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if self.subscribers.len() < before {
            debug!("Dropped {} disconnected subscriber(s)", before - self.subscribers.len());
        }
    }
}

impl Drop for Run {
    fn drop(&mut self) {
        if self.state.is_active() {
            self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortscope_common::Handle;

    fn sequence(values: &[i32]) -> Vec<Element> {
        values.iter().zip(0u32..).map(|(&v, i)| Element::with_handle(v, Handle(i))).collect()
    }

    fn insertion(seq: &mut Tracked<'_>) -> Step<()> {
        for i in 1..seq.len() {
            let mut j = i;
            while j >= 1 && seq.less(j, j - 1)? {
                seq.swap(j, j - 1)?;
                j -= 1;
            }
        }
        Ok(())
    }

    fn drain_events(rx: &Receiver<RunEvent>) -> Vec<RunEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_insertion_sort_three_elements() {
        let mut run = Run::new(sequence(&[3, 1, 2]), RunConfig::default());
        let rx = run.subscribe();
        run.start_with("insertion", insertion).unwrap();
        assert!(run.wait_finished(Some(Duration::from_secs(10))));

        let values: Vec<i32> = run.sequence().unwrap().iter().map(Element::value).collect();
        assert_eq!(values, vec![1, 2, 3]);
        let counters = run.counters();
        assert_eq!(counters.comparisons, 3);
        assert!(counters.accesses >= counters.comparisons * 2);
        assert_eq!(run.outcome(), Some(Outcome::Completed));

        // Union of all non-empty snapshots covers positions 0..=2 only
        let mut assigned = std::collections::HashMap::new();
        for event in drain_events(&rx) {
            if let RunEvent::Snapshot(s) = event {
                assigned.extend(s.assigned().iter().map(|(h, v)| (*h, *v)));
            }
        }
        assert_eq!(assigned.get(&Handle(0)), Some(&1));
        assert_eq!(assigned.get(&Handle(1)), Some(&2));
        assert_eq!(assigned.get(&Handle(2)), Some(&3));
    }

    #[test]
    fn test_invalid_transitions_leave_state() {
        let mut run = Run::new(sequence(&[1]), RunConfig::default());
        assert!(matches!(run.pause(), Err(RunError::InvalidTransition { op: "pause", .. })));
        assert!(matches!(run.resume(), Err(RunError::InvalidTransition { .. })));
        assert!(matches!(run.stop(), Err(RunError::InvalidTransition { .. })));
        assert_eq!(run.state(), RunState::NotStarted);
        assert_eq!(run.sequence().map(<[Element]>::len), Some(1));
    }

    #[test]
    fn test_finished_run_rejects_everything() {
        let mut run = Run::new(sequence(&[2, 1]), RunConfig::default());
        run.start_with("insertion", insertion).unwrap();
        assert!(run.wait_finished(Some(Duration::from_secs(10))));

        assert!(matches!(run.start_with("again", insertion), Err(RunError::AlreadyStarted(_))));
        assert!(run.stop().is_err());
        assert!(run.pause().is_err());
        assert_eq!(run.state(), RunState::Finished);
    }

    #[test]
    fn test_panicking_algorithm_still_finishes() {
        fn broken(seq: &mut Tracked<'_>) -> Step<()> {
            seq.read(seq.len())?;
            Ok(())
        }

        let mut run = Run::new(sequence(&[1, 2]), RunConfig::default());
        run.start_with("broken", broken).unwrap();
        assert!(run.wait_finished(Some(Duration::from_secs(10))));
        assert_eq!(run.outcome(), Some(Outcome::Panicked));
        assert!(run.sequence().is_none());
    }

    #[test]
    fn test_take_sequence_only_when_idle() {
        let mut run = Run::new(sequence(&[1, 2]), RunConfig::default());
        assert_eq!(run.take_sequence().map(|s| s.len()), Some(2));
        assert!(run.take_sequence().is_none());
    }

    #[test]
    fn test_drop_stops_active_run() {
        fn forever(seq: &mut Tracked<'_>) -> Step<()> {
            loop {
                seq.compare(0, 1)?;
            }
        }

        let mut run = Run::new(sequence(&[1, 2]), RunConfig::default());
        run.start_with("forever", forever).unwrap();
        thread::sleep(Duration::from_millis(20));
        drop(run);
    }
}
