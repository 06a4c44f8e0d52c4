//! Tracing/logging setup shared by binaries, tests and benches.

pub mod subscriber;

pub use subscriber::{LogFormat, init, init_with};
