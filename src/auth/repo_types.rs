use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database. Identity comes from the external OAuth provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: i64,
    pub open_id: String,              // provider subject, unique
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: String,                 // "user" | "admin"
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub last_signed_in: OffsetDateTime,
}

/// Fields written on every sign-in.
#[derive(Debug, Clone, Default)]
pub struct UpsertUser {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
}
