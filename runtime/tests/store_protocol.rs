//! Integration tests for the store's dispatch/subscribe protocol.
//!
//! Covers the listener-snapshot semantics, the reentrancy guard, and
//! reducer replacement.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use uniflow_core::action::StoreAction;
use uniflow_core::reducer::from_fn;
use uniflow_runtime::{Store, StoreError, Subscription};
use uniflow_testing::Recorder;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CounterAction {
    Increment,
    Decrement,
}

fn counter(state: Option<&i64>, action: &StoreAction<CounterAction>) -> i64 {
    let Some(&current) = state else { return 0 };
    match action.app() {
        Some(CounterAction::Increment) => current + 1,
        Some(CounterAction::Decrement) => current - 1,
        _ => current,
    }
}

fn counter_store() -> Store<i64, CounterAction> {
    Store::new(from_fn(counter), None)
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn initial_state_equals_reducer_default() {
    let store = counter_store();
    assert_eq!(store.state(), counter(None, &StoreAction::Init));
    assert_eq!(store.state(), 0);
}

#[test]
fn explicit_initial_state_wins_over_default() {
    let store = Store::new(from_fn(counter), Some(7));
    assert_eq!(store.state(), 7);
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn dispatch_returns_the_exact_action() {
    let store = counter_store();
    assert_eq!(
        store.dispatch(CounterAction::Increment),
        Ok(CounterAction::Increment)
    );
}

#[test]
fn counter_end_to_end() {
    let store = counter_store();
    store.dispatch(CounterAction::Increment).unwrap();
    store.dispatch(CounterAction::Increment).unwrap();
    store.dispatch(CounterAction::Decrement).unwrap();
    assert_eq!(store.state(), 1);
}

// ============================================================================
// Listener semantics
// ============================================================================

#[test]
fn listeners_run_in_subscription_order() {
    let store = counter_store();
    let order = Recorder::new();

    // Dropping a Subscription does not unsubscribe; only the handle is lost.
    for label in ["first", "second", "third"] {
        let order = order.clone();
        let _ = store.subscribe(move || order.record(label));
    }

    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(order.snapshot(), vec!["first", "second", "third"]);
}

#[test]
fn listener_reads_post_dispatch_state() {
    let store = counter_store();
    let seen = Recorder::new();
    let _subscription = {
        let reader = store.clone();
        let seen = seen.clone();
        store.subscribe(move || seen.record(reader.state()))
    };

    store.dispatch(CounterAction::Increment).unwrap();
    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(seen.snapshot(), vec![1, 2]);
}

#[test]
fn unsubscribing_mid_notification_still_notifies_current_snapshot() {
    let store = counter_store();
    let second_calls = Recorder::new();

    // The first listener unsubscribes the second during notification. The
    // second listener must still run for the current dispatch and be
    // excluded from all subsequent ones.
    let victim: Rc<RefCell<Option<Subscription<i64, CounterAction>>>> =
        Rc::new(RefCell::new(None));

    let _first = {
        let victim = Rc::clone(&victim);
        store.subscribe(move || {
            if let Some(subscription) = victim.borrow().as_ref() {
                subscription.unsubscribe();
            }
        })
    };
    let second = {
        let second_calls = second_calls.clone();
        store.subscribe(move || second_calls.record(()))
    };
    *victim.borrow_mut() = Some(second);

    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(second_calls.len(), 1);

    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(second_calls.len(), 1);
}

#[test]
fn subscribing_mid_notification_takes_effect_next_dispatch() {
    let store = counter_store();
    let late_calls = Recorder::new();
    let registered: Rc<Cell<bool>> = Rc::new(Cell::new(false));

    let _first = {
        let subscriber = store.clone();
        let late_calls = late_calls.clone();
        let registered = Rc::clone(&registered);
        store.subscribe(move || {
            if !registered.get() {
                registered.set(true);
                let late_calls = late_calls.clone();
                let _ = subscriber.subscribe(move || late_calls.record(()));
            }
        })
    };

    store.dispatch(CounterAction::Increment).unwrap();
    // Registered during notification: not part of the current snapshot.
    assert_eq!(late_calls.len(), 0);

    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(late_calls.len(), 1);
}

#[test]
fn duplicate_registrations_unsubscribe_independently() {
    let store = counter_store();
    let calls = Recorder::new();

    let first = {
        let calls = calls.clone();
        store.subscribe(move || calls.record(()))
    };
    let _second = {
        let calls = calls.clone();
        store.subscribe(move || calls.record(()))
    };

    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(calls.len(), 2);

    first.unsubscribe();
    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(calls.len(), 3);
}

#[test]
fn listeners_may_dispatch_once_notification_begins() {
    // The reentrancy guard covers the reducer, not the notification phase:
    // a listener reacting to one transition may trigger the next.
    let store = counter_store();
    let _subscription = {
        let chained = store.clone();
        store.subscribe(move || {
            if chained.state() < 3 {
                chained.dispatch(CounterAction::Increment).unwrap();
            }
        })
    };

    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(store.state(), 3);
}

// ============================================================================
// Reentrancy guard
// ============================================================================

#[test]
fn dispatch_from_reducer_fails_with_reentrancy_error() {
    let handle: Rc<RefCell<Option<Store<i64, CounterAction>>>> = Rc::new(RefCell::new(None));
    let failures = Recorder::new();

    let reducer = {
        let handle = Rc::clone(&handle);
        let failures = failures.clone();
        from_fn(move |state: Option<&i64>, action: &StoreAction<CounterAction>| {
            let current = state.copied().unwrap_or(0);
            match action.app() {
                Some(CounterAction::Increment) => {
                    if let Some(store) = handle.borrow().as_ref() {
                        if let Err(error) = store.dispatch(CounterAction::Decrement) {
                            failures.record(error);
                        }
                    }
                    current + 1
                }
                Some(CounterAction::Decrement) => current - 1,
                _ => current,
            }
        })
    };

    let store = Store::new(reducer, None);
    *handle.borrow_mut() = Some(store.clone());

    // The outer dispatch succeeds; only the nested one is rejected.
    assert_eq!(
        store.dispatch(CounterAction::Increment),
        Ok(CounterAction::Increment)
    );
    assert_eq!(failures.snapshot(), vec![StoreError::ReentrantDispatch]);
    assert_eq!(store.state(), 1);

    // The guard was released: the store keeps working.
    store.dispatch(CounterAction::Decrement).unwrap();
    assert_eq!(store.state(), 0);
}

#[test]
fn state_read_from_reducer_sees_pre_dispatch_value() {
    let handle: Rc<RefCell<Option<Store<i64, CounterAction>>>> = Rc::new(RefCell::new(None));
    let observed = Recorder::new();

    let reducer = {
        let handle = Rc::clone(&handle);
        let observed = observed.clone();
        from_fn(move |state: Option<&i64>, action: &StoreAction<CounterAction>| {
            if action.app().is_some() {
                if let Some(store) = handle.borrow().as_ref() {
                    observed.record(store.state());
                }
            }
            let Some(&current) = state else { return 0 };
            match action.app() {
                Some(CounterAction::Increment) => current + 1,
                Some(CounterAction::Decrement) => current - 1,
                _ => current,
            }
        })
    };

    let store = Store::new(reducer, None);
    *handle.borrow_mut() = Some(store.clone());

    store.dispatch(CounterAction::Increment).unwrap();
    store.dispatch(CounterAction::Increment).unwrap();
    // The state swap happens only after the reducer returns.
    assert_eq!(observed.snapshot(), vec![0, 1]);
}

#[test]
fn replace_reducer_from_reducer_fails_and_keeps_old_reducer() {
    let handle: Rc<RefCell<Option<Store<i64, CounterAction>>>> = Rc::new(RefCell::new(None));
    let failures = Recorder::new();

    let reducer = {
        let handle = Rc::clone(&handle);
        let failures = failures.clone();
        from_fn(move |state: Option<&i64>, action: &StoreAction<CounterAction>| {
            let current = state.copied().unwrap_or(0);
            if let Some(CounterAction::Increment) = action.app() {
                if let Some(store) = handle.borrow().as_ref() {
                    if let Err(error) = store.replace_reducer(from_fn(counter)) {
                        failures.record(error);
                    }
                }
                return current + 1;
            }
            current
        })
    };

    let store = Store::new(reducer, None);
    *handle.borrow_mut() = Some(store.clone());

    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(failures.snapshot(), vec![StoreError::ReentrantDispatch]);

    // Still the original reducer: another increment keeps counting.
    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(store.state(), 2);
}

#[test]
fn reducer_panic_releases_the_guard_and_skips_notification() {
    let store = Store::new(
        from_fn(|state: Option<&i64>, action: &StoreAction<CounterAction>| {
            let current = state.copied().unwrap_or(0);
            match action.app() {
                Some(CounterAction::Increment) => current + 1,
                Some(CounterAction::Decrement) => panic!("decrement rejected"),
                _ => current,
            }
        }),
        None,
    );
    let calls = Recorder::new();
    let _subscription = {
        let calls = calls.clone();
        store.subscribe(move || calls.record(()))
    };

    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        store.dispatch(CounterAction::Decrement)
    }));
    assert!(unwound.is_err());

    // The failed dispatch left no trace: state untouched, no notification.
    assert_eq!(store.state(), 0);
    assert_eq!(calls.len(), 0);

    // The flag was released on the unwind path: the store keeps working.
    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(store.state(), 1);
    assert_eq!(calls.len(), 1);
}

// ============================================================================
// Action-creator binding
// ============================================================================

#[test]
fn bound_action_creators_dispatch_through_the_store() {
    use std::collections::BTreeMap;
    use uniflow_core::binding::{bind_action_creators, ActionCreators, BoxActionCreator};

    let store = counter_store();
    let bound = bind_action_creators(
        ActionCreators::Named(BTreeMap::from([
            (
                "increment".to_owned(),
                Box::new(|()| CounterAction::Increment) as BoxActionCreator<(), CounterAction>,
            ),
            (
                "decrement".to_owned(),
                Box::new(|()| CounterAction::Decrement) as BoxActionCreator<(), CounterAction>,
            ),
        ])),
        store.dispatcher(),
    );

    let increment = bound.named("increment").unwrap();
    let decrement = bound.named("decrement").unwrap();

    assert_eq!(increment(()), Ok(CounterAction::Increment));
    assert_eq!(increment(()), Ok(CounterAction::Increment));
    assert_eq!(decrement(()), Ok(CounterAction::Decrement));
    assert_eq!(store.state(), 1);
}

// ============================================================================
// Reducer replacement
// ============================================================================

#[test]
fn replace_reducer_reinitializes_to_new_default() {
    let defaults_to_one = from_fn(|state: Option<&i64>, _: &StoreAction<CounterAction>| {
        state.copied().unwrap_or(1)
    });
    let defaults_to_nine = from_fn(|state: Option<&i64>, _: &StoreAction<CounterAction>| {
        state.copied().unwrap_or(9)
    });

    let store = Store::new(defaults_to_one, None);
    assert_eq!(store.state(), 1);

    store.replace_reducer(defaults_to_nine).unwrap();
    assert_eq!(store.state(), 9);
}

#[test]
fn replace_reducer_notifies_listeners_and_keeps_subscriptions() {
    let store = counter_store();
    let calls = Recorder::new();
    let _subscription = {
        let calls = calls.clone();
        store.subscribe(move || calls.record(()))
    };

    store.replace_reducer(from_fn(counter)).unwrap();
    assert_eq!(calls.len(), 1);

    // The subscription survives the swap.
    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(calls.len(), 2);
}

#[test]
fn replace_reducer_switches_transition_logic() {
    let store = counter_store();
    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(store.state(), 1);

    // The replacement counts in tens.
    store
        .replace_reducer(from_fn(
            |state: Option<&i64>, action: &StoreAction<CounterAction>| {
                let Some(&current) = state else { return 0 };
                match action.app() {
                    Some(CounterAction::Increment) => current + 10,
                    Some(CounterAction::Decrement) => current - 10,
                    _ => current,
                }
            },
        ))
        .unwrap();

    assert_eq!(store.state(), 0);
    store.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(store.state(), 10);
}
