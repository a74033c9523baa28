//! Muninn - resilient completion routing across LLM providers
//!
//! This crate orchestrates text-completion requests over a set of
//! registered [`Provider`] implementations: it resolves which provider to
//! use, fills unset request parameters from that provider's defaults,
//! serves repeated identical non-streaming requests from an expiring
//! cache, retries failing providers, falls over to alternates once the
//! primary is exhausted, and keeps per-provider success/failure/latency
//! statistics.
//!
//! # Example
//!
//! ```rust,no_run
//! use muninn::{CompletionRequest, Message, Muninn};
//! use futures_util::StreamExt;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo(claude: std::sync::Arc<dyn muninn::Provider>) -> muninn::Result<()> {
//! let agent = Muninn::builder()
//!     .register_user(claude)
//!     .default_provider("claude")
//!     .fallback_providers(["openai", "deepseek"])
//!     .build()?;
//!
//! let request = CompletionRequest::new(vec![
//!     Message::system("You are a helpful assistant."),
//!     Message::user("What is the capital of France?"),
//! ]);
//!
//! let mut stream = agent
//!     .complete(None, request, CancellationToken::new())
//!     .await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cache;
pub mod error;
pub mod metrics;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use agent::{Agent, AgentBuilder, Muninn};
pub use cache::{CacheConfig, ResponseCache};
pub use error::{MuninnError, Result};
pub use metrics::{MetricsRegistry, ProviderMetrics};
pub use providers::{DiagnosticSink, Provider, ProviderConfig, ProviderRegistry};

// Re-export all types
pub use types::{CompletionRequest, CompletionResponse, CompletionStream, Message, Role};
