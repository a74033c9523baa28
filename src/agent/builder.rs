//! Builder for configuring agent instances

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::Agent;
use crate::cache::{CacheConfig, ResponseCache};
use crate::providers::{Provider, ProviderRegistry};
use crate::{MuninnError, Result};

/// Main entry point for creating agent instances.
pub struct Muninn;

impl Muninn {
    /// Create a new builder for configuring an agent.
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }
}

/// Builder for configuring agent instances.
///
/// Registration order within a tier does not matter; on a name collision
/// the later registration wins within its tier, and the user tier always
/// shadows the system tier.
pub struct AgentBuilder {
    user_providers: Vec<Arc<dyn Provider>>,
    system_providers: Vec<Arc<dyn Provider>>,
    default_provider: Option<String>,
    fallback_providers: Vec<String>,
    cache_config: CacheConfig,
    sweeper: bool,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            user_providers: Vec::new(),
            system_providers: Vec::new(),
            default_provider: None,
            fallback_providers: Vec::new(),
            cache_config: CacheConfig::default(),
            sweeper: true,
        }
    }

    /// Register a provider constructed by the user.
    pub fn register_user(mut self, provider: Arc<dyn Provider>) -> Self {
        self.user_providers.push(provider);
        self
    }

    /// Register a system default provider.
    pub fn register_system(mut self, provider: Arc<dyn Provider>) -> Self {
        self.system_providers.push(provider);
        self
    }

    /// Select the provider used when a call names none.
    ///
    /// [`build()`](Self::build) fails if the name resolves to no
    /// registered provider.
    pub fn default_provider(mut self, name: impl Into<String>) -> Self {
        self.default_provider = Some(name.into());
        self
    }

    /// Set the ordered fallback provider names tried after the primary
    /// exhausts its retries.
    pub fn fallback_providers(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.fallback_providers = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the whole cache configuration at once.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Set the lifetime of cached non-streaming answers.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_config.ttl = ttl;
        self
    }

    /// Set the background sweep period for expired cache entries.
    pub fn cache_sweep_interval(mut self, interval: Duration) -> Self {
        self.cache_config.sweep_interval = interval;
        self
    }

    /// Do not spawn the background sweeper.
    ///
    /// Lookups still check expiration themselves; tests combine this with
    /// [`Agent::sweep_cache()`] to control sweeping explicitly.
    pub fn disable_cache_sweeper(mut self) -> Self {
        self.sweeper = false;
        self
    }

    /// Build the agent.
    ///
    /// Spawns the cache sweeper unless disabled, so this must run inside
    /// a tokio runtime context.
    pub fn build(self) -> Result<Agent> {
        let mut registry = ProviderRegistry::new();
        for provider in self.user_providers {
            registry.register_user(provider);
        }
        for provider in self.system_providers {
            registry.register_system(provider);
        }

        if let Some(name) = &self.default_provider
            && !registry.contains(name)
        {
            return Err(MuninnError::Configuration(format!(
                "default provider {name:?} not registered"
            )));
        }

        let cache = Arc::new(ResponseCache::new());
        let sweeper = self
            .sweeper
            .then(|| spawn_sweeper(Arc::clone(&cache), self.cache_config.sweep_interval));

        Ok(Agent::new(
            registry,
            self.default_provider,
            self.fallback_providers,
            cache,
            self.cache_config.ttl,
            sweeper,
        ))
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the periodic sweep task. Runs until the owning agent drops.
fn spawn_sweeper(cache: Arc<ResponseCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so sweeps
        // start one full interval after construction.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.sweep();
            if removed > 0 {
                debug!(removed, "swept expired cache entries");
            }
        }
    })
}
