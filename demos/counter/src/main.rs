//! Counter demo: a store wired to a logging listener, exercising plain
//! dispatch, conditional dispatch, and a delayed dispatch.
//!
//! Run with `RUST_LOG=debug cargo run -p counter-demo` to also see the
//! store's own dispatch traces.

use std::thread;
use std::time::Duration;

use counter_demo::{counter, CounterAction};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uniflow_core::reducer::from_fn;
use uniflow_runtime::{Store, StoreError};

fn main() -> Result<(), StoreError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let store = Store::new(from_fn(counter), None);

    let render = store.clone();
    let _subscription = store.subscribe(move || {
        info!(count = render.state(), "counter changed");
    });

    store.dispatch(CounterAction::Increment)?;
    store.dispatch(CounterAction::Increment)?;
    store.dispatch(CounterAction::Decrement)?;

    // Conditional dispatch: only bump the counter when it is odd.
    if store.state() % 2 != 0 {
        store.dispatch(CounterAction::Increment)?;
    }

    // Delayed dispatch.
    thread::sleep(Duration::from_millis(100));
    store.dispatch(CounterAction::Increment)?;

    info!(count = store.state(), "final");
    Ok(())
}
