//! Canonical cache-key derivation.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::Result;
use crate::types::{CompletionRequest, Message};

/// The subset of a request that determines its cache identity.
///
/// Field order is fixed by declaration order under serde, and floats go
/// through serde_json's shortest round-trip formatting, so the byte
/// encoding is deterministic. The stream flag is deliberately absent:
/// only non-streaming traffic is cached, and two requests differing only
/// in streaming intent refer to the same content.
#[derive(Serialize)]
struct KeyMaterial<'a> {
    messages: &'a [Message],
    model: Option<&'a str>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    top_p: Option<f32>,
    stop: Option<&'a [String]>,
}

/// Compute the cache key for a request: SHA-256 over the canonical
/// encoding, rendered as lowercase hex.
///
/// This identifier never crosses a process boundary; it only needs to be
/// deterministic within one agent.
pub(crate) fn request_key(request: &CompletionRequest) -> Result<String> {
    let material = KeyMaterial {
        messages: &request.messages,
        model: request.model.as_deref(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        top_p: request.top_p,
        stop: request.stop.as_deref(),
    };
    let bytes = serde_json::to_vec(&material)?;
    Ok(hex::encode(Sha256::digest(bytes)))
}
