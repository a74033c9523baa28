//! Two-tier provider registry with user-over-system shadowing.
//!
//! Providers register into one of two tiers: user-supplied or
//! system-supplied. Lookup is a single ordered probe: the user tier is
//! checked first, so a user registration shadows a system provider of the
//! same name. Names are unique within each tier (a later registration
//! overwrites an earlier one with the same name).
//!
//! The registry is populated at build time and frozen afterwards, which
//! is why it carries no interior locking: concurrent `Complete` calls
//! only ever read it.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::Provider;

/// Name → provider mappings for both tiers.
#[derive(Default)]
pub struct ProviderRegistry {
    user: HashMap<String, Arc<dyn Provider>>,
    system: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user-constructed provider, keyed on its `name()`.
    pub fn register_user(&mut self, provider: Arc<dyn Provider>) {
        self.user.insert(provider.name().to_owned(), provider);
    }

    /// Register a system default provider, keyed on its `name()`.
    pub fn register_system(&mut self, provider: Arc<dyn Provider>) {
        self.system.insert(provider.name().to_owned(), provider);
    }

    /// Resolve a name to its effective provider, user tier first.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.user
            .get(name)
            .or_else(|| self.system.get(name))
            .cloned()
    }

    /// Whether either tier knows this name.
    pub fn contains(&self, name: &str) -> bool {
        self.user.contains_key(name) || self.system.contains_key(name)
    }

    /// All effective provider names, sorted, with user registrations
    /// shadowing system ones.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .user
            .keys()
            .chain(self.system.keys().filter(|k| !self.user.contains_key(*k)))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Whether no providers are registered at all.
    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.system.is_empty()
    }
}
