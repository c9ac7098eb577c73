//! Middleware composition over the store's dispatch.
//!
//! A middleware observes or transforms actions on their way to the state
//! transition. The composer is expressed as a *store enhancer*: a function
//! that takes a store-constructing function and returns another one with the
//! same signature, so enhancers stack without the store knowing about them.
//!
//! # Re-entry semantics
//!
//! The [`MiddlewareApi`] handed to each middleware carries a dispatch that is
//! late-bound to the *finished* chain, not to the raw store dispatch. A
//! middleware that dispatches from within itself (for example after
//! scheduling a follow-up action) sends that action through every middleware
//! again from the top, transparently to the rest of the chain.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use uniflow_core::action::StoreAction;
//! use uniflow_core::reducer::from_fn;
//! use uniflow_runtime::{apply_middleware, create_store, DispatchFn, Middleware, MiddlewareApi};
//!
//! struct Doubler;
//!
//! impl Middleware<i64, i64> for Doubler {
//!     fn wrap(&self, _api: MiddlewareApi<i64, i64>, next: DispatchFn<i64>) -> DispatchFn<i64> {
//!         Rc::new(move |action| next(action * 2))
//!     }
//! }
//!
//! let enhancer = apply_middleware(vec![Rc::new(Doubler) as Rc<dyn Middleware<i64, i64>>]);
//! let creator = enhancer(Box::new(create_store::<i64, i64>));
//! let store = creator(
//!     Box::new(from_fn(|state: Option<&i64>, action: &StoreAction<i64>| {
//!         state.copied().unwrap_or(0) + action.app().copied().unwrap_or(0)
//!     })),
//!     None,
//! );
//!
//! assert_eq!(store.dispatch(21), Ok(42));
//! assert_eq!(store.state(), 42);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use uniflow_core::functional::{compose, Unary};
use uniflow_core::reducer::BoxReducer;

use crate::error::StoreError;
use crate::store::{DispatchFn, Store};

/// A store-constructing function: the `next` of the enhancer protocol.
pub type StoreCreator<S, A> = Box<dyn Fn(BoxReducer<S, A>, Option<S>) -> Store<S, A>>;

/// A store enhancer: wraps a store creator without changing its signature.
pub type StoreEnhancer<S, A> = Box<dyn FnOnce(StoreCreator<S, A>) -> StoreCreator<S, A>>;

/// The restricted store capability handed to each middleware.
///
/// Exposes only state reads and dispatch; subscription and reducer
/// replacement stay with the store's owner.
pub struct MiddlewareApi<S, A> {
    get_state: Rc<dyn Fn() -> S>,
    dispatch: DispatchFn<A>,
}

impl<S, A> MiddlewareApi<S, A> {
    /// A clone of the store's current state.
    #[must_use]
    pub fn state(&self) -> S {
        (self.get_state)()
    }

    /// Dispatch through the full middleware chain, outermost first.
    ///
    /// # Errors
    ///
    /// [`StoreError::ReentrantDispatch`] if the action reaches the store
    /// while a dispatch is already running its reducer.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        (self.dispatch)(action)
    }
}

impl<S, A> Clone for MiddlewareApi<S, A> {
    fn clone(&self) -> Self {
        Self {
            get_state: Rc::clone(&self.get_state),
            dispatch: Rc::clone(&self.dispatch),
        }
    }
}

/// A dispatch-chain interceptor.
///
/// Given the restricted store capability and the next dispatch in the chain,
/// a middleware returns its own dispatch. It may forward the action to
/// `next` unchanged, transform it first, drop it, or dispatch further
/// actions through `api` (which re-enters the whole chain).
pub trait Middleware<S, A> {
    /// Build this middleware's dispatch layer around `next`.
    fn wrap(&self, api: MiddlewareApi<S, A>, next: DispatchFn<A>) -> DispatchFn<A>;
}

/// Build a store enhancer from an ordered list of middleware.
///
/// The produced creator builds the base store, wires a [`MiddlewareApi`]
/// whose dispatch is late-bound to the finished chain, composes the
/// middleware layers right to left (the first-listed middleware is
/// outermost and sees every action first), and returns the same store with
/// the composed dispatch installed.
#[must_use]
pub fn apply_middleware<S, A>(middlewares: Vec<Rc<dyn Middleware<S, A>>>) -> StoreEnhancer<S, A>
where
    S: Clone + 'static,
    A: Clone + 'static,
{
    Box::new(move |create: StoreCreator<S, A>| {
        Box::new(move |reducer: BoxReducer<S, A>, initial_state: Option<S>| {
            let store = create(reducer, initial_state);

            // Late-bound dispatch slot. Until the chain is finished the slot
            // holds the raw dispatch; it is backfilled below so middleware
            // that captured the api before that point still re-enters the
            // full chain at call time.
            let slot: Rc<RefCell<DispatchFn<A>>> = Rc::new(RefCell::new(store.base_dispatch()));

            let api = MiddlewareApi {
                get_state: {
                    let store = store.clone();
                    Rc::new(move || store.state())
                },
                dispatch: {
                    let slot = Rc::clone(&slot);
                    Rc::new(move |action: A| {
                        let current = Rc::clone(&*slot.borrow());
                        current(action)
                    })
                },
            };

            let chain: Vec<Unary<DispatchFn<A>>> = middlewares
                .iter()
                .map(|middleware| {
                    let middleware = Rc::clone(middleware);
                    let api = api.clone();
                    Box::new(move |next: DispatchFn<A>| middleware.wrap(api.clone(), next))
                        as Unary<DispatchFn<A>>
                })
                .collect();

            let enhanced = compose(chain)(store.base_dispatch());
            *slot.borrow_mut() = Rc::clone(&enhanced);

            store.with_dispatch(enhanced)
        }) as StoreCreator<S, A>
    })
}
