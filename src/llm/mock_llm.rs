use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionRequest, LlmClient, LlmError};

/// Canned-reply client that records every request it sees.
pub struct MockLlm {
    reply: Box<dyn Fn() -> Result<String, LlmError> + Send + Sync>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlm {
    pub fn replying(body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            reply: Box::new(move || Ok(body.clone())),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn failing(make: impl Fn() -> LlmError + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(move || Err(make())),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, req: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(req.clone());
        (self.reply)()
    }
}

pub fn sample_reply() -> serde_json::Value {
    serde_json::json!({
        "title": "Engine Builder",
        "description": "A steady full-body AMRAP.",
        "warmup": "3 rounds: 200m row, 10 air squats, 5 inchworms",
        "mainWorkout": "20 min AMRAP: 10 wall balls (20/14), 10 pull-ups, 200m run",
        "cooldown": "Easy 5 min bike, couch stretch 1 min/side",
        "movements": ["Wall Ball", "Pull-up", "Run"],
        "equipment": ["Medicine Ball", "Pull-up Bar"],
        "notes": "Scale pull-ups to ring rows."
    })
}
