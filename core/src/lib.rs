//! # Uniflow Core
//!
//! Core traits and combinators for the Uniflow unidirectional state container.
//!
//! This crate provides the pure, storage-free layer of the architecture. The
//! store runtime lives in `uniflow-runtime`; everything here is a plain value
//! or a pure function over values.
//!
//! ## Core Concepts
//!
//! - **State**: an opaque owned value, fully owned by one store
//! - **Action**: an opaque payload describing an intended transition
//! - **Reducer**: pure function `(Option<&State>, &StoreAction<Action>) → State`
//! - **Store action**: the envelope separating the reserved initialization
//!   action from application actions
//!
//! ## Architecture Principles
//!
//! - Unidirectional data flow
//! - Reducers never mutate: they receive the previous state by reference and
//!   return the next state by value
//! - Reserved store internals are unrepresentable as application actions
//!   (the [`action::StoreAction`] envelope, not a naming convention)
//!
//! ## Example
//!
//! ```
//! use uniflow_core::action::StoreAction;
//! use uniflow_core::reducer::{FnReducer, Reducer};
//!
//! #[derive(Clone, Copy)]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! let counter = FnReducer::new(|state: Option<&i64>, action: &StoreAction<CounterAction>| {
//!     let Some(&current) = state else { return 0 };
//!     match action.app() {
//!         Some(CounterAction::Increment) => current + 1,
//!         Some(CounterAction::Decrement) => current - 1,
//!         _ => current,
//!     }
//! });
//!
//! assert_eq!(counter.reduce(None, &StoreAction::Init), 0);
//! assert_eq!(counter.reduce(Some(&1), &StoreAction::App(CounterAction::Increment)), 2);
//! ```

pub mod binding;
pub mod composition;
pub mod functional;

/// Action module - the envelope delivered to root reducers.
///
/// Application code dispatches plain values of its own action type. The store
/// wraps them before they reach the reducer so that the reserved
/// initialization action can never collide with an application action.
pub mod action {
    /// An action as seen by a root reducer.
    ///
    /// The `Init` variant is reserved for the store: it is dispatched once at
    /// construction and again whenever the active reducer is replaced, so
    /// that every reducer's default-state branch executes. Reducers must
    /// treat it like any unrecognized action and fall through to their
    /// identity/default branch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum StoreAction<A> {
        /// Reserved initialization action. Never observable by middleware and
        /// not constructible from a dispatched application action.
        Init,
        /// An application action, passed through `dispatch` unmodified.
        App(A),
    }

    impl<A> StoreAction<A> {
        /// Whether this is the reserved initialization action.
        #[must_use]
        pub const fn is_init(&self) -> bool {
            matches!(self, Self::Init)
        }

        /// The application action, if any.
        ///
        /// Reducers that only care about their own action type match on this
        /// and let everything else fall through unchanged.
        #[must_use]
        pub const fn app(&self) -> Option<&A> {
            match self {
                Self::App(action) => Some(action),
                Self::Init => None,
            }
        }
    }
}

/// Reducer module - the core trait for state transitions.
pub mod reducer {
    use crate::action::StoreAction;

    /// A pure state-transition function.
    ///
    /// # Contract
    ///
    /// - `state` is `None` exactly when the store has no state yet (the
    ///   construction-time initialization, or re-initialization after a
    ///   reducer swap). The reducer must return its default state in that
    ///   case.
    /// - Reducers are total over the action space: unrecognized actions
    ///   (including [`StoreAction::Init`] once state exists) return the
    ///   input state unchanged.
    /// - Reducers never mutate in place and never perform I/O; the store
    ///   relies on this for its determinism guarantee.
    pub trait Reducer<S, A> {
        /// Produce the next state from the previous state and an action.
        fn reduce(&self, state: Option<&S>, action: &StoreAction<A>) -> S;
    }

    /// A boxed, dynamically-dispatched reducer as stored by the runtime.
    pub type BoxReducer<S, A> = Box<dyn Reducer<S, A>>;

    impl<S, A, R> Reducer<S, A> for Box<R>
    where
        R: Reducer<S, A> + ?Sized,
    {
        fn reduce(&self, state: Option<&S>, action: &StoreAction<A>) -> S {
            (**self).reduce(state, action)
        }
    }

    /// Adapter implementing [`Reducer`] for a plain function or closure.
    ///
    /// Coherence rules forbid a blanket impl for all `Fn` types next to the
    /// concrete reducer types in this crate, so closures are wrapped
    /// explicitly:
    ///
    /// ```
    /// use uniflow_core::action::StoreAction;
    /// use uniflow_core::reducer::{FnReducer, Reducer};
    ///
    /// let last_seen = FnReducer::new(|state: Option<&u32>, action: &StoreAction<u32>| {
    ///     match action.app() {
    ///         Some(&value) => value,
    ///         None => state.copied().unwrap_or(0),
    ///     }
    /// });
    /// assert_eq!(last_seen.reduce(None, &StoreAction::App(7)), 7);
    /// ```
    pub struct FnReducer<F>(F);

    impl<F> FnReducer<F> {
        /// Wrap a function as a reducer.
        pub const fn new(f: F) -> Self {
            Self(f)
        }
    }

    impl<S, A, F> Reducer<S, A> for FnReducer<F>
    where
        F: Fn(Option<&S>, &StoreAction<A>) -> S,
    {
        fn reduce(&self, state: Option<&S>, action: &StoreAction<A>) -> S {
            (self.0)(state, action)
        }
    }

    /// Shorthand for [`FnReducer::new`].
    pub const fn from_fn<F>(f: F) -> FnReducer<F> {
        FnReducer::new(f)
    }
}
