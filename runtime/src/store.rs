//! The store: single owner of state, listeners, and the dispatch protocol.
//!
//! A [`Store`] is a cheaply-cloneable handle onto shared inner storage.
//! Handles produced by cloning (or by the middleware composer) share one
//! state value, one listener list, and one reentrancy flag; multiple
//! independent stores never interfere with each other.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use uniflow_core::action::StoreAction;
use uniflow_core::reducer::{BoxReducer, Reducer};

use crate::error::StoreError;

/// A dispatch function as threaded through the middleware chain.
///
/// Returns the dispatched action on success so that interceptors can see
/// what went through.
pub type DispatchFn<A> = Rc<dyn Fn(A) -> Result<A, StoreError>>;

struct ListenerEntry {
    /// Registration identity. Removal is by id, never by callback equality,
    /// so duplicate registrations of one callback stay independent.
    id: u64,
    callback: Rc<dyn Fn()>,
}

struct StoreInner<S, A> {
    state: RefCell<S>,
    reducer: RefCell<BoxReducer<S, A>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    next_listener_id: Cell<u64>,
    dispatching: Cell<bool>,
}

/// Scoped ownership of the reentrancy flag. The flag is set on acquisition
/// and cleared on drop, so it is released exactly once on every exit path,
/// including a reducer panic unwinding through `dispatch`.
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl<S, A> StoreInner<S, A> {
    /// The guarded state transition. Fails before the reducer runs if a
    /// dispatch is already in progress; otherwise runs the reducer against
    /// the current state, swaps the state atomically, releases the guard,
    /// and notifies listeners.
    fn dispatch_envelope(&self, envelope: &StoreAction<A>) -> Result<(), StoreError> {
        if self.dispatching.get() {
            return Err(StoreError::ReentrantDispatch);
        }
        {
            let _guard = DispatchGuard::engage(&self.dispatching);
            let next = {
                let reducer = self.reducer.borrow();
                let state = self.state.borrow();
                reducer.reduce(Some(&*state), envelope)
            };
            *self.state.borrow_mut() = next;
        }
        // The guard is released before notification: listeners may dispatch.
        self.notify();
        Ok(())
    }

    /// Re-run initialization against absent state, so the active reducer's
    /// default-state branch seeds the store. Same guard discipline as a
    /// regular dispatch.
    fn reinitialize(&self) -> Result<(), StoreError> {
        if self.dispatching.get() {
            return Err(StoreError::ReentrantDispatch);
        }
        {
            let _guard = DispatchGuard::engage(&self.dispatching);
            let seeded = self.reducer.borrow().reduce(None, &StoreAction::Init);
            *self.state.borrow_mut() = seeded;
        }
        self.notify();
        Ok(())
    }

    /// Notify the listener list as it existed when notification began, in
    /// registration order. Subscribes and unsubscribes made by a listener
    /// take effect from the next dispatch onward.
    fn notify(&self) {
        let snapshot: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .map(|entry| Rc::clone(&entry.callback))
            .collect();
        tracing::trace!(listeners = snapshot.len(), "notifying listeners");
        for listener in snapshot {
            listener();
        }
    }
}

/// The store: owns the authoritative state value and the dispatch/subscribe
/// protocol.
///
/// # Single-writer discipline
///
/// State and the listener list are mutated exclusively by the store's own
/// methods. Reducers receive state by reference and return the next value;
/// listeners read back through [`Store::state`]. A reducer that tries to
/// dispatch on its own store gets [`StoreError::ReentrantDispatch`] before
/// any state is touched.
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
    /// The dispatch entry point for this handle: the base dispatch, or the
    /// composed middleware chain on handles built by `apply_middleware`.
    dispatch: DispatchFn<A>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            dispatch: Rc::clone(&self.dispatch),
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + 'static,
    A: Clone + 'static,
{
    /// Create a store from a root reducer and an optional explicit initial
    /// state.
    ///
    /// Construction immediately runs the reserved initialization action, so
    /// the reducer's default-state branch executes even when no initial
    /// state is supplied: `store.state()` equals
    /// `reducer.reduce(initial_state.as_ref(), &StoreAction::Init)` from the
    /// first instant. No listener can exist yet, so the construction-time
    /// init needs no notification phase.
    #[must_use]
    pub fn new(reducer: impl Reducer<S, A> + 'static, initial_state: Option<S>) -> Self {
        Self::from_boxed(Box::new(reducer), initial_state)
    }

    fn from_boxed(reducer: BoxReducer<S, A>, initial_state: Option<S>) -> Self {
        let seeded = reducer.reduce(initial_state.as_ref(), &StoreAction::Init);
        let inner = Rc::new(StoreInner {
            state: RefCell::new(seeded),
            reducer: RefCell::new(reducer),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
            dispatching: Cell::new(false),
        });
        let dispatch = Self::base_dispatch_for(&inner);
        Self { inner, dispatch }
    }

    fn base_dispatch_for(inner: &Rc<StoreInner<S, A>>) -> DispatchFn<A> {
        let inner = Rc::clone(inner);
        Rc::new(move |action: A| {
            tracing::trace!("dispatching action");
            inner.dispatch_envelope(&StoreAction::App(action.clone()))?;
            Ok(action)
        })
    }

    /// The raw store dispatch, bypassing any installed middleware.
    ///
    /// The innermost `next` of the middleware chain. Kept crate-private so a
    /// middleware-bypassing dispatch never escapes the enhancer.
    #[must_use]
    pub(crate) fn base_dispatch(&self) -> DispatchFn<A> {
        Self::base_dispatch_for(&self.inner)
    }

    /// Dispatch an action, returning it unchanged on success.
    ///
    /// Synchronously runs the reducer, swaps the state, and notifies the
    /// listeners subscribed at the moment notification begins, in
    /// registration order. On a handle built by the middleware composer this
    /// enters the chain at the outermost middleware.
    ///
    /// # Errors
    ///
    /// [`StoreError::ReentrantDispatch`] if a dispatch is already in
    /// progress on this store; the attempt aborts before the reducer runs
    /// and the in-flight dispatch is unaffected.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        (self.dispatch)(action)
    }

    /// This handle's dispatch entry point as a shareable function, suitable
    /// for [`uniflow_core::binding::bind_action_creators`].
    #[must_use]
    pub fn dispatcher(&self) -> DispatchFn<A> {
        Rc::clone(&self.dispatch)
    }

    /// A clone of the current state value.
    ///
    /// Callable at any time, including from inside a reducer, where it
    /// returns the pre-dispatch value: the state is swapped only after the
    /// reducer returns.
    #[must_use]
    pub fn state(&self) -> S {
        self.inner.state.borrow().clone()
    }

    /// Register a listener invoked after every successful dispatch.
    ///
    /// Listeners take no arguments; they read the new state through
    /// [`Store::state`]. The same callback may be registered multiple
    /// times; each registration is notified and unsubscribed independently.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription<S, A> {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner.listeners.borrow_mut().push(ListenerEntry {
            id,
            callback: Rc::new(listener),
        });
        tracing::trace!(listener_id = id, "listener subscribed");
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Swap the active reducer and immediately re-initialize state through
    /// the reserved initialization action, so the new reducer's defaults
    /// take effect at once. Listeners are notified of the re-initialized
    /// state. The store identity is unchanged: existing handles and
    /// subscriptions keep working.
    ///
    /// # Errors
    ///
    /// [`StoreError::ReentrantDispatch`] if called while a dispatch is in
    /// progress on this store; the active reducer is left untouched.
    pub fn replace_reducer(
        &self,
        next_reducer: impl Reducer<S, A> + 'static,
    ) -> Result<(), StoreError> {
        if self.inner.dispatching.get() {
            return Err(StoreError::ReentrantDispatch);
        }
        *self.inner.reducer.borrow_mut() = Box::new(next_reducer);
        tracing::debug!("reducer replaced, re-initializing state");
        self.inner.reinitialize()
    }

    /// A handle to the same store with a different dispatch entry point
    /// installed. Used by the middleware composer; state, listeners, and
    /// the reentrancy flag stay shared.
    #[must_use]
    pub fn with_dispatch(&self, dispatch: DispatchFn<A>) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            dispatch,
        }
    }
}

/// Create a store from a boxed root reducer.
///
/// Behaves exactly like [`Store::new`]; the boxed signature is the
/// store-constructing shape consumed and produced by store enhancers.
#[must_use]
pub fn create_store<S, A>(reducer: BoxReducer<S, A>, initial_state: Option<S>) -> Store<S, A>
where
    S: Clone + 'static,
    A: Clone + 'static,
{
    Store::from_boxed(reducer, initial_state)
}

/// Handle for removing one listener registration.
///
/// Removal is by registration identity: unsubscribing one registration of a
/// duplicated callback leaves the others in place. `unsubscribe` is
/// idempotent and becomes a no-op once the store itself is gone.
pub struct Subscription<S, A> {
    inner: Weak<StoreInner<S, A>>,
    id: u64,
}

impl<S, A> Subscription<S, A> {
    /// Remove exactly this registration.
    ///
    /// A listener removed while a notification phase is running is still
    /// called during that phase; it is excluded from all subsequent
    /// dispatches.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.listeners.borrow_mut().retain(|entry| entry.id != self.id);
        }
    }
}
