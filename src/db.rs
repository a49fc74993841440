use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend not configured or not reachable. Callers treat this as soft.
    #[error("storage unavailable")]
    Unavailable,
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StorageError::Unavailable
            }
            other => StorageError::Database(other),
        }
    }
}

/// Lazily-connecting pool, or `None` when no database is configured.
pub fn connect(database_url: Option<&str>) -> anyhow::Result<Option<PgPool>> {
    let Some(url) = database_url else {
        tracing::warn!("DATABASE_URL not set; storage unavailable");
        return Ok(None);
    };
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(url)
        .context("parse DATABASE_URL")?;
    Ok(Some(pool))
}

/// Applies `migrations/`; failure is logged and start-up continues.
pub async fn migrate(pool: Option<&PgPool>) {
    let Some(pool) = pool else { return };
    if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }
}
