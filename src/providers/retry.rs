//! Attempt loop against a single provider.
//!
//! Drives up to `retry_count + 1` attempts, recording each attempt's
//! latency and outcome into the agent's
//! [`MetricsRegistry`](crate::metrics::MetricsRegistry) before the retry
//! decision is made. Attempt failures stay local here; only the last
//! error escapes once the budget is spent.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::traits::Provider;
use crate::metrics::MetricsRegistry;
use crate::telemetry;
use crate::types::{CompletionRequest, CompletionStream};
use crate::{MuninnError, Result};

/// Fixed delay between attempts against the same provider.
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Execute the attempt loop for one provider.
///
/// The request must already have defaults applied. Cancellation aborts
/// between attempts and during the inter-attempt delay; an in-flight
/// attempt is the provider's to cut short via the token it receives.
pub(crate) async fn run_attempts(
    provider: &dyn Provider,
    request: &CompletionRequest,
    cancel: &CancellationToken,
    collector: &MetricsRegistry,
) -> Result<CompletionStream> {
    let name = provider.name();
    let config = provider.config();
    let attempts = config.retry_count.saturating_add(1);

    let mut last_err = None;
    for attempt in 1..=attempts {
        if cancel.is_cancelled() {
            return Err(MuninnError::Cancelled);
        }

        let start = Instant::now();
        let outcome = provider
            .complete(cancel.clone(), request.clone())
            .await;
        let latency = start.elapsed();

        collector.record_attempt(name, latency, outcome.is_ok());
        let status = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::ATTEMPTS_TOTAL,
            "provider" => name.to_owned(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::ATTEMPT_DURATION_SECONDS,
            "provider" => name.to_owned(),
        )
        .record(latency.as_secs_f64());

        match outcome {
            Ok(stream) => {
                if attempt > 1 {
                    debug!(provider = name, attempt, "provider recovered after retry");
                }
                return Ok(stream);
            }
            Err(e) => {
                if let Some(sink) = &config.sink {
                    sink(&format!("provider {name:?} attempt {attempt} failed: {e}"));
                }
                warn!(
                    provider = name,
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "completion attempt failed"
                );
                last_err = Some(e);

                if attempt < attempts {
                    metrics::counter!(telemetry::RETRIES_TOTAL,
                        "provider" => name.to_owned(),
                    )
                    .increment(1);
                    tokio::select! {
                        () = tokio::time::sleep(RETRY_DELAY) => {}
                        () = cancel.cancelled() => return Err(MuninnError::Cancelled),
                    }
                }
            }
        }
    }

    // attempts >= 1, so the loop always set last_err before falling out
    Err(last_err.unwrap_or(MuninnError::Cancelled))
}
