use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{UpsertUser, User};
use crate::db::StorageError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError>;
    /// Creates the user on first sign-in, refreshes profile fields and `last_signed_in` after.
    async fn upsert_by_open_id(&self, user: &UpsertUser) -> Result<User, StorageError>;
}

pub struct PgUserRepository {
    pool: Option<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Option<PgPool>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> Result<&PgPool, StorageError> {
        self.pool.as_ref().ok_or(StorageError::Unavailable)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, open_id, name, email, login_method, role,
                   created_at, updated_at, last_signed_in
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool()?)
        .await?;
        Ok(user)
    }

    async fn upsert_by_open_id(&self, user: &UpsertUser) -> Result<User, StorageError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (open_id, name, email, login_method, last_signed_in)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (open_id) DO UPDATE
               SET name           = COALESCE(EXCLUDED.name, users.name),
                   email          = COALESCE(EXCLUDED.email, users.email),
                   login_method   = COALESCE(EXCLUDED.login_method, users.login_method),
                   last_signed_in = NOW(),
                   updated_at     = NOW()
            RETURNING id, open_id, name, email, login_method, role,
                      created_at, updated_at, last_signed_in
            "#,
        )
        .bind(&user.open_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.login_method)
        .fetch_one(self.pool()?)
        .await?;
        Ok(user)
    }
}
