//! Shared recorders for observing stores from the outside.
//!
//! Listener callbacks take no arguments and middleware layers are opaque, so
//! tests watch them through a shared append-only [`Recorder`]. The
//! [`TapMiddleware`] wires a recorder into a middleware chain.

use std::cell::RefCell;
use std::rc::Rc;

use uniflow_runtime::{DispatchFn, Middleware, MiddlewareApi};

/// A shared append-only log.
///
/// Clones share the same storage, so a test can hand one clone to a
/// listener or middleware and keep another for its assertions.
pub struct Recorder<T> {
    entries: Rc<RefCell<Vec<T>>>,
}

impl<T> Recorder<T> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Append one entry.
    pub fn record(&self, entry: T) {
        self.entries.borrow_mut().push(entry);
    }

    /// All entries recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.entries.borrow().clone()
    }

    /// Drain and return all entries.
    #[must_use]
    pub fn take(&self) -> Vec<T> {
        self.entries.borrow_mut().drain(..).collect()
    }

    /// Number of entries recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware that records a projection of every action and forwards it
/// unchanged.
///
/// The classic logging-middleware scenario: tap a store with a projection of
/// the action's discriminant and assert on the recorded sequence afterwards.
pub struct TapMiddleware<A, T> {
    recorder: Recorder<T>,
    project: Rc<dyn Fn(&A) -> T>,
}

impl<A, T> TapMiddleware<A, T> {
    /// Tap actions into `recorder` through `project`.
    pub fn new(recorder: Recorder<T>, project: impl Fn(&A) -> T + 'static) -> Self {
        Self {
            recorder,
            project: Rc::new(project),
        }
    }
}

impl<S, A, T> Middleware<S, A> for TapMiddleware<A, T>
where
    A: 'static,
    T: 'static,
{
    fn wrap(&self, _api: MiddlewareApi<S, A>, next: DispatchFn<A>) -> DispatchFn<A> {
        let recorder = self.recorder.clone();
        let project = Rc::clone(&self.project);
        Rc::new(move |action: A| {
            recorder.record(project(&action));
            next(action)
        })
    }
}
