//! The request orchestrator.
//!
//! [`Agent`] owns the provider registries, the response cache, and the
//! metrics collector, and composes them into the end-to-end
//! [`complete()`](Agent::complete) operation:
//!
//! ```text
//! caller ──► cache lookup (non-streaming only)
//!               │ miss
//!               ▼
//!         provider resolution ──► parameter defaulting
//!               │
//!               ▼
//!         retry loop against primary
//!               │ exhausted
//!               ▼
//!         fallback chain (retry loop per viable candidate)
//!               │ any success
//!               ▼
//!         non-streaming: drain first element, cache, re-wrap
//!         streaming:     hand the live stream through
//! ```

mod builder;

pub use builder::{AgentBuilder, Muninn};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::cache::key::request_key;
use crate::metrics::{MetricsRegistry, ProviderMetrics};
use crate::providers::{ProviderConfig, ProviderRegistry, retry};
use crate::telemetry;
use crate::types::{CompletionRequest, CompletionResponse, CompletionStream};
use crate::{MuninnError, Result};

/// Token limit applied when neither the request nor the provider
/// configuration specifies one.
const FALLBACK_MAX_TOKENS: u32 = 200;

/// Routes completion requests across registered providers.
///
/// Cheap to share behind an `Arc`; every method takes `&self` and all
/// interior state is synchronized, so concurrent callers can drive
/// [`complete()`](Agent::complete) simultaneously.
pub struct Agent {
    registry: ProviderRegistry,
    default_provider: Option<String>,
    fallback_providers: Vec<String>,
    cache: Arc<ResponseCache>,
    cache_ttl: Duration,
    metrics: MetricsRegistry,
    sweeper: Option<JoinHandle<()>>,
}

impl Agent {
    pub(crate) fn new(
        registry: ProviderRegistry,
        default_provider: Option<String>,
        fallback_providers: Vec<String>,
        cache: Arc<ResponseCache>,
        cache_ttl: Duration,
        sweeper: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            registry,
            default_provider,
            fallback_providers,
            cache,
            cache_ttl,
            metrics: MetricsRegistry::new(),
            sweeper,
        }
    }

    /// Run one completion exchange.
    ///
    /// `provider` overrides the configured default for this call. The
    /// cancellation token is forwarded unchanged into the provider and
    /// also aborts retries and fallbacks once fired.
    ///
    /// Non-streaming calls observe exactly one element even if a
    /// misbehaving provider emits several; the surplus is dropped by
    /// contract, not by accident. Streaming calls get the provider's
    /// live stream untouched.
    pub async fn complete(
        &self,
        provider: Option<&str>,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<CompletionStream> {
        let streaming = request.effective_stream();

        // Key the cache on the caller's request, before any defaulting,
        // so identical requests hash identically no matter which provider
        // ends up serving them. A request that cannot be canonicalized
        // simply goes uncached.
        let key = if streaming {
            None
        } else {
            match request_key(&request) {
                Ok(key) => Some(key),
                Err(e) => {
                    debug!(error = %e, "request not canonicalizable, skipping cache");
                    None
                }
            }
        };

        if let Some(key) = &key
            && let Some(content) = self.cache.lookup(key)
        {
            // Served without touching any provider: metrics stay as-is.
            return Ok(single(CompletionResponse::content(content)));
        }

        let name = match provider.or(self.default_provider.as_deref()) {
            Some(name) => name,
            None => {
                return Err(MuninnError::Configuration(
                    "no provider named and no default provider configured".into(),
                ));
            }
        };
        let primary = self
            .registry
            .resolve(name)
            .ok_or_else(|| MuninnError::ProviderNotRegistered(name.to_owned()))?;

        let defaulted = apply_defaults(&request, primary.config())?;
        let stream = match retry::run_attempts(primary.as_ref(), &defaulted, &cancel, &self.metrics)
            .await
        {
            Ok(stream) => stream,
            Err(MuninnError::Cancelled) => return Err(MuninnError::Cancelled),
            Err(e) if !self.fallback_providers.is_empty() => {
                warn!(provider = name, error = %e, "primary provider exhausted, engaging fallbacks");
                self.run_fallbacks(name, &request, &cancel, e).await?
            }
            Err(e) => return Err(e),
        };

        if streaming {
            return Ok(stream);
        }

        // Drain exactly the first element; the provider's stream is never
        // polled again. An empty stream degrades to an empty response.
        let mut stream = stream;
        let first = stream.next().await.unwrap_or_default();
        if !first.is_error()
            && let Some(key) = key
        {
            self.cache.store(key, first.content.clone(), self.cache_ttl);
        }
        Ok(single(first))
    }

    /// Walk the fallback list after primary exhaustion.
    ///
    /// Skips the primary's own name, names neither registry resolves, and
    /// candidates for which no model resolves. First success wins.
    async fn run_fallbacks(
        &self,
        primary: &str,
        request: &CompletionRequest,
        cancel: &CancellationToken,
        mut last_err: MuninnError,
    ) -> Result<CompletionStream> {
        for name in &self.fallback_providers {
            if name == primary {
                continue;
            }
            let Some(candidate) = self.registry.resolve(name) else {
                continue;
            };
            let Ok(defaulted) = apply_defaults(request, candidate.config()) else {
                continue;
            };

            metrics::counter!(telemetry::FALLBACKS_TOTAL, "provider" => name.clone()).increment(1);
            match retry::run_attempts(candidate.as_ref(), &defaulted, cancel, &self.metrics).await {
                Ok(stream) => return Ok(stream),
                Err(MuninnError::Cancelled) => return Err(MuninnError::Cancelled),
                Err(e) => {
                    warn!(provider = name.as_str(), error = %e, "fallback provider exhausted");
                    last_err = e;
                }
            }
        }
        Err(MuninnError::AllProvidersFailed {
            source: Box::new(last_err),
        })
    }

    /// All registered provider names, user registrations shadowing
    /// system ones.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Statistics for one provider, if it has been attempted.
    pub fn provider_metrics(&self, provider: &str) -> Option<ProviderMetrics> {
        self.metrics.get(provider)
    }

    /// Statistics for every attempted provider.
    pub fn metrics_snapshot(&self) -> HashMap<String, ProviderMetrics> {
        self.metrics.snapshot()
    }

    /// Number of cache entries currently held, expired or not.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Remove expired cache entries now, returning how many were dropped.
    ///
    /// The background sweeper does this on its own interval; tests use
    /// this to trigger a sweep deterministically.
    pub fn sweep_cache(&self) -> usize {
        self.cache.sweep()
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

/// Wrap a single response in a fresh one-element stream.
fn single(response: CompletionResponse) -> CompletionStream {
    Box::pin(tokio_stream::once(response))
}

/// Fill unset request fields from the provider's configuration.
///
/// Fails with a configuration error when neither side names a model.
/// Operates on a clone: the caller's request stays untouched so its
/// cache identity is stable.
fn apply_defaults(
    request: &CompletionRequest,
    config: &ProviderConfig,
) -> Result<CompletionRequest> {
    let mut req = request.clone();
    if req.model.is_none() {
        req.model = config.default_model.clone();
    }
    if req.model.is_none() {
        return Err(MuninnError::Configuration("no model specified".into()));
    }
    if req.stream.is_none() {
        req.stream = config.default_stream;
    }
    if req.temperature.is_none() {
        req.temperature = config.default_temperature;
    }
    if req.top_p.is_none() {
        req.top_p = config.default_top_p;
    }
    if req.max_tokens.is_none() {
        req.max_tokens = config.default_max_tokens.or(Some(FALLBACK_MAX_TOKENS));
    }
    Ok(req)
}
