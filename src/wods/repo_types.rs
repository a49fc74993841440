use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::wods::dto::decode_list;

/// Row in `wods`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredWorkout {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub strategy: String,
    pub duration: i32,
    pub difficulty: String,
    pub warmup: Option<String>,
    pub main_workout: String,
    pub cooldown: Option<String>,
    pub movements: Option<String>, // JSON array text
    pub equipment: Option<String>, // JSON array text
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl StoredWorkout {
    pub fn movement_list(&self) -> Vec<String> {
        self.movements.as_deref().and_then(|t| decode_list(t).ok()).unwrap_or_default()
    }

    pub fn equipment_list(&self) -> Vec<String> {
        self.equipment.as_deref().and_then(|t| decode_list(t).ok()).unwrap_or_default()
    }
}

/// Insert payload; the owner is passed separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWod {
    pub title: String,
    pub description: String,
    pub strategy: String,
    pub duration: i32,
    pub difficulty: String,
    pub warmup: String,
    pub main_workout: String,
    pub cooldown: String,
    pub movements: String,
    pub equipment: String,
    pub notes: String,
}
