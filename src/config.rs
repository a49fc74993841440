use serde::Deserialize;

/// Upper bound on session lifetime: ten years.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    /// Marks the session cookie `Secure`. Off only for plain-http local setups.
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Unset means storage is unavailable; reads degrade to empty results.
    pub database_url: Option<String>,
    pub session: SessionConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "wodsmith".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "wodsmith-coaches".into()),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 365)
                .clamp(1, MAX_SESSION_TTL_MINUTES),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        };
        let llm = LlmConfig {
            api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com".into()),
            api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".into()),
            timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok()),
        };
        Ok(Self {
            database_url,
            session,
            llm,
        })
    }
}
