//! Process-wide tracing setup shared by the binaries.

mod subscriber;

pub use subscriber::{init_tracing, init_tracing_with_level};
