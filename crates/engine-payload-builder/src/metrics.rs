use engine_metrics::Metrics;

/// Metrics emitted by a running [`crate::PayloadBuilderService`].
#[derive(Metrics)]
#[metrics(scope = "engine.payload_builder")]
pub struct PayloadBuilderServiceMetrics {
    /// Number of payload build jobs currently in flight.
    pub(crate) active_jobs: engine_metrics::metrics::Gauge,
    /// Number of payload build jobs that completed with an error.
    pub(crate) failed_jobs: engine_metrics::metrics::Counter,
}
