//! Tests for the retry loop: attempt budgets, metrics recording,
//! diagnostic sinks, and cancellation.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use muninn::{
    CompletionRequest, CompletionResponse, CompletionStream, Message, Muninn, MuninnError,
    Provider, ProviderConfig, Result,
};

/// Mock provider that fails N times then succeeds.
struct FailThenSucceed {
    name: &'static str,
    config: ProviderConfig,
    fail_count: AtomicU32,
    total_calls: AtomicU32,
}

impl FailThenSucceed {
    fn new(name: &'static str, failures: u32, config: ProviderConfig) -> Self {
        Self {
            name,
            config,
            fail_count: AtomicU32::new(failures),
            total_calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.total_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Provider for FailThenSucceed {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(
        &self,
        _cancel: CancellationToken,
        _request: CompletionRequest,
    ) -> Result<CompletionStream> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        let remaining = self.fail_count.load(Ordering::Relaxed);
        if remaining > 0 {
            self.fail_count.fetch_sub(1, Ordering::Relaxed);
            return Err(MuninnError::Http("connection reset".into()));
        }
        Ok(Box::pin(tokio_stream::once(CompletionResponse::content(
            "ok",
        ))))
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

fn request() -> CompletionRequest {
    CompletionRequest::new(vec![Message::user("hi")]).stream(false)
}

#[tokio::test(start_paused = true)]
async fn fails_twice_then_succeeds_within_budget() {
    let provider = Arc::new(FailThenSucceed::new(
        "alpha",
        2,
        ProviderConfig::new().default_model("m").retry_count(2),
    ));
    let agent = Muninn::builder()
        .register_user(provider.clone())
        .default_provider("alpha")
        .disable_cache_sweeper()
        .build()
        .unwrap();

    let mut stream = agent
        .complete(None, request(), CancellationToken::new())
        .await
        .unwrap();
    let first = tokio_stream::StreamExt::next(&mut stream).await.unwrap();

    assert_eq!(first.content, "ok");
    assert_eq!(provider.call_count(), 3);

    let stats = agent.provider_metrics("alpha").unwrap();
    assert_eq!(stats.failure_count, 2);
    assert_eq!(stats.success_count, 1);
}

#[tokio::test(start_paused = true)]
async fn budget_is_retry_count_plus_one() {
    let provider = Arc::new(FailThenSucceed::new(
        "alpha",
        u32::MAX,
        ProviderConfig::new().default_model("m").retry_count(3),
    ));
    let agent = Muninn::builder()
        .register_user(provider.clone())
        .default_provider("alpha")
        .disable_cache_sweeper()
        .build()
        .unwrap();

    let result = agent.complete(None, request(), CancellationToken::new()).await;

    assert!(matches!(result, Err(MuninnError::Http(_))));
    assert_eq!(provider.call_count(), 4);
}

#[tokio::test]
async fn zero_retry_count_means_exactly_one_try() {
    let provider = Arc::new(FailThenSucceed::new(
        "alpha",
        u32::MAX,
        ProviderConfig::new().default_model("m"),
    ));
    let agent = Muninn::builder()
        .register_user(provider.clone())
        .default_provider("alpha")
        .disable_cache_sweeper()
        .build()
        .unwrap();

    let result = agent.complete(None, request(), CancellationToken::new()).await;

    assert!(result.is_err());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn sink_receives_one_line_per_failed_attempt() {
    let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&lines);

    let provider = Arc::new(FailThenSucceed::new(
        "alpha",
        2,
        ProviderConfig::new()
            .default_model("m")
            .retry_count(2)
            .sink(move |line| captured.lock().unwrap().push(line.to_owned())),
    ));
    let agent = Muninn::builder()
        .register_user(provider)
        .default_provider("alpha")
        .disable_cache_sweeper()
        .build()
        .unwrap();

    agent
        .complete(None, request(), CancellationToken::new())
        .await
        .unwrap();

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("alpha"));
    assert!(lines[0].contains("attempt 1"));
    assert!(lines[1].contains("attempt 2"));
}

#[tokio::test]
async fn pre_cancelled_token_makes_no_attempts() {
    let provider = Arc::new(FailThenSucceed::new(
        "alpha",
        0,
        ProviderConfig::new().default_model("m").retry_count(5),
    ));
    let agent = Muninn::builder()
        .register_user(provider.clone())
        .default_provider("alpha")
        .disable_cache_sweeper()
        .build()
        .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = agent.complete(None, request(), cancel).await;

    assert!(matches!(result, Err(MuninnError::Cancelled)));
    assert_eq!(provider.call_count(), 0);
    assert!(agent.provider_metrics("alpha").is_none());
}

/// Mock provider that cancels the shared token from inside its first
/// failing attempt, as a timeout wired to the same token would.
struct CancelsDuringAttempt {
    config: ProviderConfig,
    total_calls: AtomicU32,
}

#[async_trait]
impl Provider for CancelsDuringAttempt {
    fn name(&self) -> &str {
        "self-cancel"
    }

    async fn complete(
        &self,
        cancel: CancellationToken,
        _request: CompletionRequest,
    ) -> Result<CompletionStream> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        cancel.cancel();
        Err(MuninnError::Http("deadline exceeded".into()))
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_aborts_remaining_attempts() {
    let provider = Arc::new(CancelsDuringAttempt {
        config: ProviderConfig::new().default_model("m").retry_count(5),
        total_calls: AtomicU32::new(0),
    });
    let agent = Muninn::builder()
        .register_user(provider.clone())
        .default_provider("self-cancel")
        .disable_cache_sweeper()
        .build()
        .unwrap();

    let result = agent
        .complete(None, request(), CancellationToken::new())
        .await;

    assert!(matches!(result, Err(MuninnError::Cancelled)));
    assert_eq!(provider.total_calls.load(Ordering::Relaxed), 1);
}
