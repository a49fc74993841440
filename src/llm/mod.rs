mod client;
pub mod dto;
#[cfg(test)]
pub mod mock_llm;

pub use client::{HttpLlmClient, LlmClient, LlmError};
pub use dto::{CompletionRequest, ResponseFormat};
