use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use super::dto::{ChatMessage, ChatRequest, ChatResponse, CompletionRequest};
use crate::config::LlmConfig;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport or provider-side failure, passed through as-is.
    #[error("{0}")]
    Provider(String),
    #[error("no content returned from model")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Provider(e.to_string())
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the first choice's message content.
    async fn complete(&self, req: &CompletionRequest) -> Result<String, LlmError>;
}

/// OpenAI-compatible chat-completions client. One request per call.
#[derive(Clone)]
pub struct HttpLlmClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpLlmClient {
    pub fn new(cfg: &LlmConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: format!("{}/v1/chat/completions", cfg.api_url.trim_end_matches('/')),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, req: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &req.system,
                },
                ChatMessage {
                    role: "user",
                    content: &req.user,
                },
            ],
            response_format: req.response_format.as_ref(),
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            error!(%status, body = %text, "llm provider returned an error");
            return Err(LlmError::Provider(format!("{}: {}", status, text)));
        }

        let parsed: ChatResponse = res.json().await?;
        debug!(choices = parsed.choices.len(), model = %self.model, "llm completion received");
        parsed.first_content().ok_or(LlmError::EmptyResponse)
    }
}
