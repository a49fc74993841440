use crate::auth::repo::{PgUserRepository, UserRepository};
use crate::config::AppConfig;
use crate::db;
use crate::llm::{HttpLlmClient, LlmClient};
use crate::wods::generator::WodGenerator;
use crate::wods::repo::{PgWodRepository, WodRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub wods: Arc<dyn WodRepository>,
    pub generator: WodGenerator,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(config.database_url.as_deref())?;
        db::migrate(pool.as_ref()).await;

        let llm = Arc::new(HttpLlmClient::new(&config.llm)?) as Arc<dyn LlmClient>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgWodRepository::new(pool)),
            llm,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
        wods: Arc<dyn WodRepository>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            config,
            users,
            wods,
            generator: WodGenerator::new(llm),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Everything in memory; storage healthy and empty, model returns the sample workout.
    pub fn fake() -> Self {
        use crate::auth::mock_users::MockUsers;
        use crate::config::{LlmConfig, SessionConfig};
        use crate::llm::mock_llm::{sample_reply, MockLlm};
        use crate::wods::mock_repo::MockWodRepo;

        let config = Arc::new(AppConfig {
            database_url: None,
            session: SessionConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                cookie_secure: true,
            },
            llm: LlmConfig {
                api_url: "http://llm.invalid".into(),
                api_key: "fake".into(),
                model: "fake".into(),
                timeout_secs: None,
            },
        });

        Self::from_parts(
            config,
            Arc::new(MockUsers::default()),
            Arc::new(MockWodRepo::default()),
            Arc::new(MockLlm::replying(sample_reply().to_string())),
        )
    }

    pub fn with_users(mut self, users: Arc<dyn UserRepository>) -> Self {
        self.users = users;
        self
    }

    pub fn with_wods(mut self, wods: Arc<dyn WodRepository>) -> Self {
        self.wods = wods;
        self
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.generator = WodGenerator::new(llm);
        self
    }
}
