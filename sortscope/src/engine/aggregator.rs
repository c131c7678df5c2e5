//! Event aggregation between the worker and the snapshot emitter.
//!
//! The worker may perform millions of instrumented operations per second; the
//! renderer only needs to know which bars to highlight and what height each
//! changed bar has *now*. [`ChangeSet`] coalesces events accordingly:
//!
//! - compares and reads land in a set (`touched`), so repeated touches of the
//!   same bar cost nothing extra
//! - writes land in a map (`assigned`), last value wins
//!
//! Its size is therefore bounded by the number of bars, regardless of how many
//! operations happened since the previous drain.

use sortscope_common::Handle;
use std::collections::{HashMap, HashSet};

/// Mailbox of pending visual changes. Lives inside the engine's shared state
/// and is only touched under its mutex.
#[derive(Debug)]
pub struct ChangeSet {
    element_count: usize,
    touched: HashSet<Handle>,
    assigned: HashMap<Handle, i32>,
}

impl ChangeSet {
    #[must_use]
    pub fn new(element_count: usize) -> Self {
        Self { element_count, touched: HashSet::new(), assigned: HashMap::new() }
    }

    pub fn touch(&mut self, handle: Handle) {
        self.touched.insert(handle);
    }

    pub fn assign(&mut self, handle: Handle, value: i32) {
        self.assigned.insert(handle, value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty() && self.assigned.is_empty()
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Take everything recorded so far, leaving an empty set that keeps
    /// accepting events.
    pub fn drain(&mut self) -> Snapshot {
        let drained = std::mem::replace(self, ChangeSet::new(self.element_count));
        Snapshot {
            touched: drained.touched,
            assigned: drained.assigned,
            element_count: drained.element_count,
        }
    }
}

/// Immutable picture of the changes between two drains.
///
/// An empty snapshot is meaningful: it tells the renderer that nothing is being
/// touched anymore and every highlight should be cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    touched: HashSet<Handle>,
    assigned: HashMap<Handle, i32>,
    element_count: usize,
}

impl Snapshot {
    #[must_use]
    pub fn touched(&self) -> &HashSet<Handle> {
        &self.touched
    }

    #[must_use]
    pub fn assigned(&self) -> &HashMap<Handle, i32> {
        &self.assigned
    }

    /// Length of the sequence being sorted (renderers normalize heights by it).
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty() && self.assigned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_is_idempotent() {
        let mut changes = ChangeSet::new(4);
        changes.touch(Handle(1));
        changes.touch(Handle(1));

        let snapshot = changes.drain();
        assert_eq!(snapshot.touched().len(), 1);
        assert!(snapshot.touched().contains(&Handle(1)));
    }

    #[test]
    fn test_last_assignment_wins() {
        let mut changes = ChangeSet::new(4);
        changes.assign(Handle(2), 10);
        changes.assign(Handle(2), 3);

        let snapshot = changes.drain();
        assert_eq!(snapshot.assigned().len(), 1);
        assert_eq!(snapshot.assigned()[&Handle(2)], 3);
    }

    #[test]
    fn test_drain_empties_and_keeps_recording() {
        let mut changes = ChangeSet::new(8);
        changes.touch(Handle(0));
        changes.assign(Handle(5), 1);
        assert!(!changes.is_empty());

        let first = changes.drain();
        assert!(!first.is_empty());
        assert_eq!(first.element_count(), 8);
        assert!(changes.is_empty());
        assert_eq!(changes.element_count(), 8);

        changes.touch(Handle(3));
        let second = changes.drain();
        assert_eq!(second.touched().len(), 1);
        assert!(second.assigned().is_empty());
    }

    #[test]
    fn test_forced_drain_of_empty_set() {
        let mut changes = ChangeSet::new(2);
        let snapshot = changes.drain();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.element_count(), 2);
    }
}
