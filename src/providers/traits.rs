//! Core Provider trait

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::config::ProviderConfig;
use crate::Result;
use crate::types::{CompletionRequest, CompletionStream};

/// A registered completion service.
///
/// Implementations translate the canonical [`CompletionRequest`] into
/// their own wire format and parse the reply back into
/// [`CompletionResponse`](crate::CompletionResponse) elements. The agent
/// interacts with providers only through this trait.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable unique identifier used for registry lookup and
    /// fallback-name matching.
    fn name(&self) -> &str;

    /// Run one completion exchange.
    ///
    /// Returns `Err` only for request-construction failures before any
    /// network activity. Failures after output has started are delivered
    /// in-band as a stream element with its `error` field set, after
    /// which the stream ends.
    ///
    /// The cancellation token is the caller's; implementations should
    /// stop producing once it fires.
    async fn complete(
        &self,
        cancel: CancellationToken,
        request: CompletionRequest,
    ) -> Result<CompletionStream>;

    /// Read-only configuration snapshot, used by the agent for parameter
    /// defaulting, the retry budget, and diagnostics.
    fn config(&self) -> &ProviderConfig;
}
