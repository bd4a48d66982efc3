//! Re-exports the `#[derive(Metrics)]` macro alongside the `metrics` facade crate so
//! downstream crates only need a single dependency to declare and emit metrics.

pub use engine_metrics_derive::Metrics;
pub use metrics;
