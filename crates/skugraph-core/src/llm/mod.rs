//! LLM integration (OpenAI-compatible chat completions)
//!
//! The extractor issues exactly one chat request per categorization
//! attempt, with the response pinned to JSON-object format. The client is
//! deliberately small: no streaming, no tool calls, just a single
//! completion in and a single completion out.

mod client;
mod types;

pub use client::{LlmClient, LlmClientBuilder};
pub use types::{
    ChatRequest, ChatResponse, Choice, FinishReason, LlmResponse, Message, MessageRole,
    ResponseFormat, Usage,
};
