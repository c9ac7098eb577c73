//! Counter domain for the demo binary: one action type, one reducer.

use uniflow_core::action::StoreAction;

/// Everything that can happen to the counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterAction {
    /// Add one.
    Increment,
    /// Subtract one.
    Decrement,
}

/// The counter's state transition. Absent state defaults to zero.
#[must_use]
pub fn counter(state: Option<&i64>, action: &StoreAction<CounterAction>) -> i64 {
    let Some(&current) = state else { return 0 };
    match action.app() {
        Some(CounterAction::Increment) => current + 1,
        Some(CounterAction::Decrement) => current - 1,
        _ => current,
    }
}
