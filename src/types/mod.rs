//! Public types for the Muninn API.

mod message;
mod request;
mod response;

pub use message::{Message, Role};
pub use request::CompletionRequest;
pub use response::{CompletionResponse, CompletionStream};
