use engine_metrics::Metrics;

/// Metrics emitted by [`crate::EngineApiDispatcher`].
#[derive(Metrics)]
#[metrics(scope = "engine.api")]
pub struct DispatcherMetrics {
    /// Number of requests dispatched, regardless of outcome.
    pub(crate) requests_total: engine_metrics::metrics::Counter,
    /// Number of requests that resolved to an RPC error.
    pub(crate) errors_total: engine_metrics::metrics::Counter,
    /// Number of `getPayload*` calls served directly from the response cache.
    pub(crate) payload_cache_hits: engine_metrics::metrics::Counter,
}
