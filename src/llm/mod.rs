//! LLM integration layer.
//!
//! Provides the chat-completion wire types, the [`LlmProvider`] trait that
//! the pipeline runs stages against, and a reqwest-based client for
//! OpenAI-compatible endpoints.

mod client;

pub use client::{
    ChatClient, Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, Usage,
};
