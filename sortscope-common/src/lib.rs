//! # Shared Sorting Contract (Algorithm ↔ Engine)
//!
//! Defines the types shared between plugged-in sorting algorithms and the
//! instrumented execution engine. An algorithm only ever sees a [`Tracked`]
//! view; whether that view reports to a live engine or to nothing at all is
//! decided by whoever builds it.
//!
//! ## Key Types
//!
//! - [`Element`] - A sortable value plus an optional rendering [`Handle`]
//! - [`Hook`] - Observer notified before every compare, read and write
//! - [`NoopHook`] - The uninstrumented hook (all callbacks succeed immediately)
//! - [`Tracked`] - The view an algorithm sorts through
//! - [`Cancelled`] - Returned by a hook when the run has been stopped
//! - [`Algorithm`] - A sorting routine paired with its display name
//!
//! ## Writing an Algorithm
//!
//! ```
//! use sortscope_common::{Element, NoopHook, Step, Tracked};
//!
//! fn insertion_sort(seq: &mut Tracked<'_>) -> Step<()> {
//!     for i in 1..seq.len() {
//!         let mut j = i;
//!         while j > 0 && seq.less(j, j - 1)? {
//!             seq.swap(j, j - 1)?;
//!             j -= 1;
//!         }
//!     }
//!     Ok(())
//! }
//!
//! let mut items: Vec<Element> = [3, 1, 2].into_iter().map(Element::new).collect();
//! insertion_sort(&mut Tracked::new(&mut items, &NoopHook)).unwrap();
//! assert!(sortscope_common::is_sorted(&items));
//! ```
//!
//! Every fallible operation returns [`Step`]; propagating it with `?` is the
//! only thing an algorithm has to do to be stoppable.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

// ============================================================================
// Handles and Elements
// ============================================================================

/// Opaque rendering reference carried by an [`Element`].
///
/// Renderers assign one handle per displayed bar. The engine only uses it as a
/// key when recording which bars were touched or assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u32);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sortable unit whose operations are observable through a [`Tracked`] view.
///
/// Equality and ordering look at `value` only. Cloning produces a fresh element
/// without a handle: visual identity belongs to a position in the displayed
/// sequence, never to where a value came from.
#[derive(Debug, Default)]
pub struct Element {
    value: i32,
    handle: Option<Handle>,
}

impl Element {
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self { value, handle: None }
    }

    #[must_use]
    pub const fn with_handle(value: i32, handle: Handle) -> Self {
        Self { value, handle: Some(handle) }
    }

    /// Raw value, bypassing any hook. Algorithms go through [`Tracked::read`].
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    #[must_use]
    pub const fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn set_handle(&mut self, handle: Option<Handle>) {
        self.handle = handle;
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self::new(self.value)
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Element {}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

/// Uninstrumented sortedness check (used by tests and reports, never by the engine).
#[must_use]
pub fn is_sorted(items: &[Element]) -> bool {
    items.windows(2).all(|w| w[0].value <= w[1].value)
}

// ============================================================================
// Hook capability
// ============================================================================

/// Signal that the run owning this execution context has been stopped.
///
/// Algorithms never construct or inspect it; they only forward it with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sort run cancelled")]
pub struct Cancelled;

/// Result of every instrumented operation.
pub type Step<T> = Result<T, Cancelled>;

/// Observer called before each instrumented operation completes.
///
/// All three callbacks default to "do nothing, keep going". A hook may block
/// (pausing, throttling) and may return [`Cancelled`] to abandon the
/// algorithm at this operation boundary.
pub trait Hook {
    /// Two elements are about to be compared.
    fn on_compare(&self, _lhs: &Element, _rhs: &Element) -> Step<()> {
        Ok(())
    }

    /// An element is about to be read.
    fn on_read(&self, _item: &Element) -> Step<()> {
        Ok(())
    }

    /// `item` is about to change from `old` to `new`.
    fn on_write(&self, _item: &Element, _old: i32, _new: i32) -> Step<()> {
        Ok(())
    }
}

/// The uninstrumented hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl Hook for NoopHook {}

/// Plug-in contract: sort the view in place, forwarding [`Cancelled`].
pub type SortFn = fn(&mut Tracked<'_>) -> Step<()>;

/// A named sorting routine.
#[derive(Clone, Copy)]
pub struct Algorithm {
    pub name: &'static str,
    pub run: SortFn,
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm").field("name", &self.name).finish_non_exhaustive()
    }
}

// ============================================================================
// Tracked view
// ============================================================================

/// Mutable, indexable view of a sequence with one hook bound to it.
///
/// The hook is fixed for the lifetime of the view, so the binding is scoped to
/// the execution context that built it and cannot leak into another thread.
pub struct Tracked<'a> {
    items: &'a mut [Element],
    hook: &'a dyn Hook,
}

impl<'a> Tracked<'a> {
    pub fn new(items: &'a mut [Element], hook: &'a dyn Hook) -> Self {
        Self { items, hook }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Compare the elements at positions `i` and `j`.
    ///
    /// # Errors
    /// Returns [`Cancelled`] if the run was stopped.
    pub fn compare(&self, i: usize, j: usize) -> Step<Ordering> {
        let (lhs, rhs) = (&self.items[i], &self.items[j]);
        self.hook.on_compare(lhs, rhs)?;
        Ok(lhs.cmp(rhs))
    }

    /// `true` if the element at `i` sorts strictly before the one at `j`.
    ///
    /// # Errors
    /// Returns [`Cancelled`] if the run was stopped.
    pub fn less(&self, i: usize, j: usize) -> Step<bool> {
        Ok(self.compare(i, j)? == Ordering::Less)
    }

    /// Compare the element at position `i` with a detached element.
    ///
    /// # Errors
    /// Returns [`Cancelled`] if the run was stopped.
    pub fn compare_to(&self, i: usize, other: &Element) -> Step<Ordering> {
        let item = &self.items[i];
        self.hook.on_compare(item, other)?;
        Ok(item.cmp(other))
    }

    /// Compare two detached elements (merge buffers, saved pivots).
    ///
    /// # Errors
    /// Returns [`Cancelled`] if the run was stopped.
    pub fn compare_elements(&self, lhs: &Element, rhs: &Element) -> Step<Ordering> {
        self.hook.on_compare(lhs, rhs)?;
        Ok(lhs.cmp(rhs))
    }

    /// Read the element at `i` as a detached copy (no handle).
    ///
    /// # Errors
    /// Returns [`Cancelled`] if the run was stopped.
    pub fn read(&self, i: usize) -> Step<Element> {
        let item = &self.items[i];
        self.hook.on_read(item)?;
        Ok(item.clone())
    }

    /// Assign the value of `src` to position `i`. The handle at `i` stays put.
    ///
    /// # Errors
    /// Returns [`Cancelled`] if the run was stopped; position `i` is unchanged.
    pub fn write(&mut self, i: usize, src: &Element) -> Step<()> {
        let target = &self.items[i];
        self.hook.on_write(target, target.value, src.value)?;
        self.items[i].value = src.value;
        Ok(())
    }

    /// Exchange the values at `i` and `j`, reported as two writes.
    ///
    /// # Errors
    /// Returns [`Cancelled`] if the run was stopped; no value is moved.
    pub fn swap(&mut self, i: usize, j: usize) -> Step<()> {
        if i == j {
            return Ok(());
        }
        let (a, b) = (self.items[i].value, self.items[j].value);
        self.hook.on_write(&self.items[i], a, b)?;
        self.hook.on_write(&self.items[j], b, a)?;
        self.items[i].value = b;
        self.items[j].value = a;
        Ok(())
    }
}
