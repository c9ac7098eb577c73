//! Reducer composition utilities.
//!
//! [`combine_reducers`] merges independent sub-reducers, each owning one key
//! of a composite state map, into a single reducer over the whole map.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use uniflow_core::action::StoreAction;
//! use uniflow_core::composition::{combine_reducers, ReducerSlot};
//! use uniflow_core::reducer::{from_fn, Reducer};
//!
//! #[derive(Clone, Copy)]
//! enum AppAction {
//!     Increment,
//!     Rename,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Slice {
//!     Count(i64),
//!     Name(&'static str),
//! }
//!
//! let root = combine_reducers(BTreeMap::from([
//!     (
//!         "counter".to_owned(),
//!         ReducerSlot::of(from_fn(|state: Option<&Slice>, action: &StoreAction<AppAction>| {
//!             let count = match state {
//!                 Some(&Slice::Count(n)) => n,
//!                 _ => 0,
//!             };
//!             match action.app() {
//!                 Some(AppAction::Increment) => Slice::Count(count + 1),
//!                 _ => Slice::Count(count),
//!             }
//!         })),
//!     ),
//!     (
//!         "name".to_owned(),
//!         ReducerSlot::of(from_fn(|state: Option<&Slice>, action: &StoreAction<AppAction>| {
//!             match action.app() {
//!                 Some(AppAction::Rename) => Slice::Name("renamed"),
//!                 _ => state.cloned().unwrap_or(Slice::Name("anonymous")),
//!             }
//!         })),
//!     ),
//! ]));
//!
//! let initial = root.reduce(None, &StoreAction::Init);
//! assert_eq!(initial["counter"], Slice::Count(0));
//! assert_eq!(initial["name"], Slice::Name("anonymous"));
//! ```

use std::collections::BTreeMap;

use crate::action::StoreAction;
use crate::functional::map_values;
use crate::reducer::{BoxReducer, Reducer};

/// Composite state produced by [`combine_reducers`]: one slice per retained
/// key.
pub type CompositeState<V> = BTreeMap<String, V>;

/// A candidate entry for one key of a composite reducer.
///
/// This replaces the loose "is it callable?" test of dynamically-typed
/// containers with an explicit variant: only `Reducer` slots participate,
/// and `Vacant` slots are silently excluded from the composite state.
///
/// The silent exclusion is deliberately permissive rather than an error;
/// note that a key that vanishes from the composite state because its slot
/// was left `Vacant` is a likely source of latent bugs in the caller.
pub enum ReducerSlot<V, A> {
    /// A sub-reducer owning this key's slice of the composite state.
    Reducer(BoxReducer<V, A>),
    /// A placeholder with nothing behind it; the key is dropped.
    Vacant,
}

impl<V, A> ReducerSlot<V, A> {
    /// Wrap a reducer as a slot entry.
    pub fn of(reducer: impl Reducer<V, A> + 'static) -> Self {
        Self::Reducer(Box::new(reducer))
    }

    /// Whether this slot carries a reducer.
    #[must_use]
    pub const fn is_reducer(&self) -> bool {
        matches!(self, Self::Reducer(_))
    }
}

/// Merge sub-reducers, each owning one key, into a single reducer over a
/// [`CompositeState`].
///
/// On every action, every retained key is recomputed: each sub-reducer is
/// invoked with its own slice (`None` if the slice does not exist yet) and
/// the unmodified action. There is no skip for unaffected keys; correctness
/// relies on sub-reducers being cheap identity pass-throughs for actions
/// they do not recognize.
#[must_use]
pub fn combine_reducers<V, A>(
    slots: BTreeMap<String, ReducerSlot<V, A>>,
) -> CombinedReducer<V, A> {
    let reducers = slots
        .into_iter()
        .filter_map(|(key, slot)| match slot {
            ReducerSlot::Reducer(reducer) => Some((key, reducer)),
            ReducerSlot::Vacant => None,
        })
        .collect();
    CombinedReducer { reducers }
}

/// The composite reducer produced by [`combine_reducers`].
pub struct CombinedReducer<V, A> {
    reducers: BTreeMap<String, BoxReducer<V, A>>,
}

impl<V, A> CombinedReducer<V, A> {
    /// The keys retained in the composite state, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reducers.keys().map(String::as_str)
    }
}

impl<V, A> Reducer<CompositeState<V>, A> for CombinedReducer<V, A> {
    fn reduce(
        &self,
        state: Option<&CompositeState<V>>,
        action: &StoreAction<A>,
    ) -> CompositeState<V> {
        let empty = CompositeState::new();
        let state = state.unwrap_or(&empty);
        map_values(&self.reducers, |reducer, key| {
            reducer.reduce(state.get(key), action)
        })
    }
}
