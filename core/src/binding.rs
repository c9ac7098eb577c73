//! Action-creator binding.
//!
//! An action creator is a plain function producing an action from some
//! payload. Binding one to a dispatch function yields a function with the
//! same shape whose every call dispatches the produced action, returning
//! whatever dispatch returns.
//!
//! Creators taking several arguments use a tuple payload; nesting of maps is
//! not supported (one level only).

use std::collections::BTreeMap;
use std::rc::Rc;

/// A boxed action creator: payload in, action out.
pub type BoxActionCreator<P, A> = Box<dyn Fn(P) -> A>;

/// Input to [`bind_action_creators`]: either one creator or a named map of
/// creators sharing a payload type.
///
/// The explicit variant replaces the "is the argument itself a function?"
/// runtime test of dynamically-typed containers.
pub enum ActionCreators<P, A> {
    /// A single creator, bound to a single function.
    Single(BoxActionCreator<P, A>),
    /// A flat map of named creators, bound entry-wise.
    Named(BTreeMap<String, BoxActionCreator<P, A>>),
}

/// Output of [`bind_action_creators`], shaped like its input.
pub enum BoundActionCreators<P, T> {
    /// The bound form of [`ActionCreators::Single`].
    Single(Box<dyn Fn(P) -> T>),
    /// The bound form of [`ActionCreators::Named`], same keys.
    Named(BTreeMap<String, Box<dyn Fn(P) -> T>>),
}

impl<P, T> BoundActionCreators<P, T> {
    /// The single bound creator, if this was built from one function.
    #[must_use]
    pub fn single(&self) -> Option<&dyn Fn(P) -> T> {
        match self {
            Self::Single(bound) => Some(bound.as_ref()),
            Self::Named(_) => None,
        }
    }

    /// Look up a bound creator by name.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&dyn Fn(P) -> T> {
        match self {
            Self::Named(map) => map.get(name).map(Box::as_ref),
            Self::Single(_) => None,
        }
    }
}

/// Bind one action creator to a dispatch function.
///
/// The dispatch parameter is generic over its return type so this layer does
/// not depend on the runtime's error type; with the store's dispatch the
/// bound function returns `Result<A, StoreError>`.
///
/// ```
/// use uniflow_core::binding::bind_action_creator;
///
/// let dispatched = std::cell::RefCell::new(Vec::new());
/// let add = bind_action_creator(
///     |amount: i64| ("ADD", amount),
///     |action| {
///         dispatched.borrow_mut().push(action);
///         action
///     },
/// );
/// assert_eq!(add(3), ("ADD", 3));
/// assert_eq!(*dispatched.borrow(), vec![("ADD", 3)]);
/// ```
pub fn bind_action_creator<P, A, T>(
    creator: impl Fn(P) -> A,
    dispatch: impl Fn(A) -> T,
) -> impl Fn(P) -> T {
    move |payload| dispatch(creator(payload))
}

/// Bind one creator or a named map of creators to a shared dispatch function.
#[must_use]
pub fn bind_action_creators<P, A, T>(
    creators: ActionCreators<P, A>,
    dispatch: Rc<dyn Fn(A) -> T>,
) -> BoundActionCreators<P, T>
where
    P: 'static,
    A: 'static,
    T: 'static,
{
    match creators {
        ActionCreators::Single(creator) => BoundActionCreators::Single(Box::new(
            bind_action_creator(creator, move |action| dispatch(action)),
        )),
        ActionCreators::Named(map) => BoundActionCreators::Named(
            map.into_iter()
                .map(|(name, creator)| {
                    let dispatch = Rc::clone(&dispatch);
                    let bound: Box<dyn Fn(P) -> T> = Box::new(bind_action_creator(
                        creator,
                        move |action| dispatch(action),
                    ));
                    (name, bound)
                })
                .collect(),
        ),
    }
}
