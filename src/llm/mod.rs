//! Remote text generation through a chat-completions API.

pub mod client;

pub use client::{
    ChatMessage, CompletionBackend, GenerationRequest, HttpCompletionClient, Role,
    parse_completion,
};
