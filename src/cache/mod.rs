//! Response caching for non-streaming completions.
//!
//! Two pieces:
//!
//! - `key` — canonical request hashing. A request's cache identity is
//!   the SHA-256 of its deterministic byte encoding, covering messages
//!   and sampling parameters but never the stream flag.
//!
//! - [`ResponseCache`] — the expiring store. Lookups check expiration
//!   themselves; a background sweep owned by the
//!   [`Agent`](crate::Agent) removes dead entries on a fixed interval as
//!   best-effort housekeeping.
//!
//! Keys are computed from the caller's request *before* provider defaults
//! are applied, so a cached answer can be served for an identical request
//! routed to a different provider. That is deliberate: the cache
//! identifies request content, not routing.

pub(crate) mod key;
mod store;

pub use store::{CacheConfig, ResponseCache};
