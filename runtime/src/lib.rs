//! # Uniflow Runtime
//!
//! The store runtime for the Uniflow unidirectional state container.
//!
//! This crate owns the mutable half of the architecture: the [`Store`] that
//! holds the authoritative state value and the listener list, and the
//! middleware composer that layers interceptors around its dispatch.
//!
//! ## Core Components
//!
//! - **Store**: owns one state value, one replaceable reducer, one ordered
//!   listener list, and the reentrancy guard
//! - **Middleware composer**: builds a store whose dispatch is the
//!   right-to-left composition of middleware around the base dispatch
//!
//! ## Concurrency model
//!
//! Single-threaded, synchronous, cooperative. `dispatch` runs the reducer
//! and notifies listeners before returning; there are no suspension points
//! and nothing here is `Send` or `Sync`. A dispatch attempted while another
//! dispatch is running its reducer fails immediately with
//! [`StoreError::ReentrantDispatch`] instead of queueing.
//!
//! ## Example
//!
//! ```
//! use uniflow_core::action::StoreAction;
//! use uniflow_core::reducer::from_fn;
//! use uniflow_runtime::Store;
//!
//! #[derive(Clone, Copy)]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! let store = Store::new(
//!     from_fn(|state: Option<&i64>, action: &StoreAction<CounterAction>| {
//!         let Some(&n) = state else { return 0 };
//!         match action.app() {
//!             Some(CounterAction::Increment) => n + 1,
//!             Some(CounterAction::Decrement) => n - 1,
//!             _ => n,
//!         }
//!     }),
//!     None,
//! );
//!
//! store.dispatch(CounterAction::Increment)?;
//! store.dispatch(CounterAction::Increment)?;
//! store.dispatch(CounterAction::Decrement)?;
//! assert_eq!(store.state(), 1);
//! # Ok::<(), uniflow_runtime::StoreError>(())
//! ```

pub mod middleware;
pub mod store;

/// Error types for the store runtime.
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during store operations.
    ///
    /// Reducer and listener panics are not represented here: they unwind
    /// through `dispatch` to its caller, with the store guaranteeing only
    /// that its reentrancy flag has been released on the way out.
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreError {
        /// A dispatch was attempted while another dispatch on the same store
        /// was still running its reducer.
        ///
        /// Surfaced synchronously to the immediate caller (the reducer or
        /// middleware that made the reentrant call); never retried or
        /// swallowed, and the in-flight dispatch is unaffected.
        #[error("dispatch already in progress: reducers may not dispatch actions")]
        ReentrantDispatch,
    }
}

pub use error::StoreError;
pub use middleware::{apply_middleware, Middleware, MiddlewareApi, StoreCreator, StoreEnhancer};
pub use store::{create_store, DispatchFn, Store, Subscription};
