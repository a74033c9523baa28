//! Telemetry metric name constants.
//!
//! Centralised metric names for muninn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! These ambient counters complement the in-process
//! [`ProviderMetrics`](crate::metrics::ProviderMetrics) collector: the
//! collector is queryable state owned by the agent, the `metrics` facade
//! feeds whatever exporter the host process wires up.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `muninn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "openai", "claude")
//! - `status` — outcome: "ok" or "error"

/// Total completion attempts dispatched to providers.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const ATTEMPTS_TOTAL: &str = "muninn_attempts_total";

/// Per-attempt duration in seconds.
///
/// Labels: `provider`.
pub const ATTEMPT_DURATION_SECONDS: &str = "muninn_attempt_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`.
pub const RETRIES_TOTAL: &str = "muninn_retries_total";

/// Total fallback engagements after primary exhaustion.
///
/// Labels: `provider` (the fallback candidate being tried).
pub const FALLBACKS_TOTAL: &str = "muninn_fallbacks_total";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "muninn_cache_hits_total";

/// Total response cache misses.
pub const CACHE_MISSES_TOTAL: &str = "muninn_cache_misses_total";

/// Total expired entries removed by cache sweeps.
pub const CACHE_EVICTIONS_TOTAL: &str = "muninn_cache_evictions_total";
