use std::env;

use anyhow::{Context, Result};

use wodsmith::auth::{
    dto::SessionKeys, repo::PgUserRepository, repo_types::UpsertUser, services::sign_in,
};
use wodsmith::config::AppConfig;
use wodsmith::db;

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Records a sign-in for an identity verified elsewhere and prints a session token for it.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let open_id = env::var("SESSION_OPEN_ID")
        .context("SESSION_OPEN_ID must name the identity to sign in")?;

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required to record a sign-in")?;
    let pool = db::connect(Some(database_url))?;
    db::migrate(pool.as_ref()).await;

    let users = PgUserRepository::new(pool);
    let keys = SessionKeys::from_config(&config.session);
    let identity = UpsertUser {
        open_id,
        name: optional("SESSION_NAME"),
        email: optional("SESSION_EMAIL"),
        login_method: optional("SESSION_LOGIN_METHOD"),
    };

    let (user, token) = sign_in(&users, &keys, &identity)
        .await
        .context("failed to sign in")?;

    eprintln!("Signed in user {} ({})", user.id, user.open_id);
    println!("{token}");
    Ok(())
}
