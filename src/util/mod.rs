//! Shared utilities: clock helpers and telemetry bootstrap.

pub mod clock;
pub mod telemetry;

pub use clock::now_ms;
pub use telemetry::init_tracing;
