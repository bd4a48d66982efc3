//! Derive macro for declaring `metrics`-backed structs without hand-writing the
//! registration/describe boilerplate.
//!
//! ```ignore
//! #[derive(Metrics)]
//! #[metrics(scope = "engine.payload_builder")]
//! struct PayloadBuilderServiceMetrics {
//!     /// Number of active payload build jobs.
//!     active_jobs: Gauge,
//!     /// Number of payload build jobs that failed.
//!     #[metric(rename = "failed_jobs_total")]
//!     failed_jobs: Counter,
//! }
//! ```

mod expand;
mod metric;
mod with_attrs;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(Metrics, attributes(metrics, metric))]
pub fn derive_metrics(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::derive(&input).unwrap_or_else(|err| err.to_compile_error()).into()
}
