//! Per-provider static configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Receives one diagnostic line per failed attempt (provider name,
/// attempt number, error). Wire up a closure to capture retry noise
/// somewhere other than the global tracing subscriber.
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Static configuration owned by a provider.
///
/// Every field is independently optional; absent values keep built-in
/// defaults. The agent reads this through [`Provider::config()`] for
/// parameter defaulting and the retry budget; it never mutates it.
///
/// ```rust
/// # use muninn::ProviderConfig;
/// # use std::time::Duration;
/// let config = ProviderConfig::new()
///     .default_model("sonnet-4")
///     .default_temperature(0.7)
///     .timeout(Duration::from_secs(30))
///     .retry_count(2);
/// ```
///
/// [`Provider::config()`]: super::Provider::config
#[derive(Clone, Default)]
pub struct ProviderConfig {
    /// Service endpoint the adapter talks to.
    pub base_url: Option<String>,
    /// Per-call timeout applied by the adapter.
    pub timeout: Option<Duration>,
    /// Model used when the request names none.
    pub default_model: Option<String>,
    /// Streaming decision used when the request leaves it unset.
    pub default_stream: Option<bool>,
    /// Sampling temperature used when the request leaves it unset.
    pub default_temperature: Option<f32>,
    /// Token limit used when the request leaves it unset.
    pub default_max_tokens: Option<u32>,
    /// Nucleus sampling value used when the request leaves it unset.
    pub default_top_p: Option<f32>,
    /// Models the adapter accepts, for introspection by callers.
    pub supported_models: Vec<String>,
    /// Extra attempts after the first failure. 0 = exactly one try.
    pub retry_count: u32,
    /// Optional sink for per-attempt failure diagnostics.
    pub sink: Option<DiagnosticSink>,
}

impl ProviderConfig {
    /// Create an empty config; every default stays built-in.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn default_stream(mut self, stream: bool) -> Self {
        self.default_stream = Some(stream);
        self
    }

    pub fn default_temperature(mut self, temp: f32) -> Self {
        self.default_temperature = Some(temp);
        self
    }

    pub fn default_max_tokens(mut self, max: u32) -> Self {
        self.default_max_tokens = Some(max);
        self
    }

    pub fn default_top_p(mut self, p: f32) -> Self {
        self.default_top_p = Some(p);
        self
    }

    pub fn supported_models(mut self, models: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.supported_models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    pub fn sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("default_model", &self.default_model)
            .field("default_stream", &self.default_stream)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("default_top_p", &self.default_top_p)
            .field("supported_models", &self.supported_models)
            .field("retry_count", &self.retry_count)
            .field("sink", &self.sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}
