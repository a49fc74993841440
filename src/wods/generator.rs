use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument};

use crate::llm::{CompletionRequest, LlmClient, LlmError, ResponseFormat};
use crate::wods::dto::{GeneratedWorkout, WorkoutRequest};
use crate::wods::prompt::{build_user_prompt, response_schema, SCHEMA_NAME, SYSTEM_PROMPT};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("{0}")]
    MalformedResponse(String),
}

/// Prompt in, typed workout out. Every call hits the model.
#[derive(Clone)]
pub struct WodGenerator {
    llm: Arc<dyn LlmClient>,
}

impl WodGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    #[instrument(
        skip(self, req),
        fields(strategy = %req.strategy, duration = req.duration, difficulty = %req.difficulty)
    )]
    pub async fn generate(
        &self,
        req: &WorkoutRequest,
    ) -> Result<GeneratedWorkout, GenerationError> {
        req.validate().map_err(GenerationError::Validation)?;

        let completion = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_user_prompt(req),
            response_format: Some(ResponseFormat::json_schema(SCHEMA_NAME, response_schema())),
        };

        let content = self.llm.complete(&completion).await.map_err(|e| {
            error!(error = %e, "wod generation failed");
            GenerationError::from(e)
        })?;

        let wod = parse_workout(&content)?;
        info!(title = %wod.title, movements = wod.movements.len(), "wod generated");
        Ok(wod)
    }
}

/// Parses and shape-checks a model reply.
pub fn parse_workout(content: &str) -> Result<GeneratedWorkout, GenerationError> {
    serde_json::from_str::<GeneratedWorkout>(content).map_err(|e| {
        error!(error = %e, "model reply did not match the workout schema");
        GenerationError::MalformedResponse(e.to_string())
    })
}
