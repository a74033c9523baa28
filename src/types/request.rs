//! Completion request type and its streaming semantics

use serde::{Deserialize, Serialize};

use super::Message;

/// A provider-agnostic completion request.
///
/// Every sampling field is an `Option`: `None` means "not specified, use
/// the provider's default", which keeps explicit zero values (e.g.
/// `temperature: Some(0.0)`) distinguishable from "caller said nothing".
/// Defaults are filled in per-provider by the agent just before dispatch,
/// never on the request the caller handed over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl CompletionRequest {
    /// Create a request for the given conversation.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn top_p(mut self, p: f32) -> Self {
        self.top_p = Some(p);
        self
    }

    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Resolve the effective streaming decision for this request.
    ///
    /// An explicit `stream` value wins. Otherwise a request that set
    /// `max_tokens` is treated as streaming; everything else is a
    /// single-shot (cacheable) exchange.
    pub fn effective_stream(&self) -> bool {
        match self.stream {
            Some(stream) => stream,
            None => self.max_tokens.is_some(),
        }
    }
}
