//! Completion response and stream types

use std::pin::Pin;

use futures_util::Stream;
use serde::{Deserialize, Serialize};

/// One unit of completion output.
///
/// Streaming requests produce many of these per call; non-streaming
/// requests produce exactly one. A failure that occurs after output has
/// started is delivered in-band via `error` rather than as a propagated
/// `Err`, and the stream ends after such an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompletionResponse {
    /// A successful content fragment.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
        }
    }

    /// An in-band failure element.
    pub fn from_error(error: impl std::fmt::Display) -> Self {
        Self {
            content: String::new(),
            error: Some(error.to_string()),
        }
    }

    /// Whether this element carries an in-band error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Lazy, forward-only sequence of completion output.
///
/// Terminates when the provider closes it or the caller's cancellation
/// token fires; it is not restartable.
pub type CompletionStream = Pin<Box<dyn Stream<Item = CompletionResponse> + Send>>;
