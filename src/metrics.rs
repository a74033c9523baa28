//! Per-provider attempt statistics.
//!
//! The [`MetricsRegistry`] is the queryable half of muninn's telemetry:
//! plain counters owned by the agent, updated under a mutex on every
//! provider attempt and snapshot on read. Cache hits bypass providers
//! entirely and therefore never appear here. The fire-and-forget half
//! (the `metrics` facade) is described in [`telemetry`](crate::telemetry).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Statistics for one provider, accumulated over the agent's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMetrics {
    /// Attempts whose completion call returned a stream.
    pub success_count: u64,
    /// Attempts whose completion call returned an error.
    pub failure_count: u64,
    /// Wall-clock time spent across all attempts, regardless of outcome.
    pub total_latency: Duration,
}

impl ProviderMetrics {
    /// Total attempts recorded (successes plus failures).
    pub fn attempts(&self) -> u64 {
        self.success_count + self.failure_count
    }
}

/// Collector mapping provider names to their [`ProviderMetrics`].
///
/// Entries are created lazily on a provider's first attempt. Updates hold
/// the lock only for the arithmetic; reads hand back clones so callers
/// never observe a half-applied update.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    inner: Mutex<HashMap<String, ProviderMetrics>>,
}

impl MetricsRegistry {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt outcome for `provider`.
    ///
    /// Latency is added regardless of outcome, then exactly one of the
    /// success/failure counters is incremented.
    pub(crate) fn record_attempt(&self, provider: &str, latency: Duration, ok: bool) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let entry = inner.entry(provider.to_owned()).or_default();
        entry.total_latency += latency;
        if ok {
            entry.success_count += 1;
        } else {
            entry.failure_count += 1;
        }
    }

    /// Snapshot of one provider's statistics, if it has been attempted.
    pub fn get(&self, provider: &str) -> Option<ProviderMetrics> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(provider)
            .cloned()
    }

    /// Snapshot of every provider's statistics.
    pub fn snapshot(&self) -> HashMap<String, ProviderMetrics> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
