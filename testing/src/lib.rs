//! # Uniflow Testing
//!
//! Testing utilities and helpers for the Uniflow state container.
//!
//! - [`ReducerTest`]: fluent Given-When-Then harness for pure reducers
//! - [`Recorder`]: shared append-only log for observing listener calls and
//!   middleware traffic from the outside
//! - [`TapMiddleware`]: middleware that records a projection of every
//!   dispatched action and forwards it unchanged

pub mod recording;

pub use recording::{Recorder, TapMiddleware};
pub use reducer_test::ReducerTest;
