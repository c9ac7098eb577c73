//! Dispatch throughput benchmarks.

#![allow(missing_docs, clippy::unwrap_used)]

use std::rc::Rc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use uniflow_core::action::StoreAction;
use uniflow_core::reducer::from_fn;
use uniflow_runtime::{apply_middleware, create_store, DispatchFn, Middleware, MiddlewareApi, Store, StoreCreator};

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

struct Passthrough;

impl Middleware<i64, CounterAction> for Passthrough {
    fn wrap(
        &self,
        _api: MiddlewareApi<i64, CounterAction>,
        next: DispatchFn<CounterAction>,
    ) -> DispatchFn<CounterAction> {
        next
    }
}

fn bench_plain_dispatch(c: &mut Criterion) {
    let store = Store::new(from_fn(counter), None);
    c.bench_function("dispatch/plain", |b| {
        b.iter(|| {
            store.dispatch(CounterAction::Increment).unwrap();
            store.dispatch(CounterAction::Decrement).unwrap();
        });
    });
}

fn bench_dispatch_with_listeners(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch/listeners");
    for count in [1usize, 8, 64] {
        group.bench_function(count.to_string(), |b| {
            b.iter_batched(
                || {
                    let store = Store::new(from_fn(counter), None);
                    let subscriptions: Vec<_> =
                        (0..count).map(|_| store.subscribe(|| {})).collect();
                    (store, subscriptions)
                },
                |(store, _subscriptions)| {
                    store.dispatch(CounterAction::Increment).unwrap();
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_dispatch_through_middleware(c: &mut Criterion) {
    let creator: StoreCreator<i64, CounterAction> = apply_middleware(vec![
        Rc::new(Passthrough) as Rc<dyn Middleware<i64, CounterAction>>,
        Rc::new(Passthrough),
        Rc::new(Passthrough),
    ])(Box::new(create_store::<i64, CounterAction>));
    let store = creator(Box::new(from_fn(counter)), None);

    c.bench_function("dispatch/middleware_x3", |b| {
        b.iter(|| store.dispatch(CounterAction::Increment).unwrap());
    });
}

criterion_group!(
    benches,
    bench_plain_dispatch,
    bench_dispatch_with_listeners,
    bench_dispatch_through_middleware
);
criterion_main!(benches);
