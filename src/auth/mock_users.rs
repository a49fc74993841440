use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::repo::UserRepository;
use super::repo_types::{UpsertUser, User};
use crate::db::StorageError;

#[derive(Default)]
pub struct MockUsers {
    pub users: Mutex<Vec<User>>,
    pub unavailable: bool,
    pub failing: bool,
}

impl MockUsers {
    pub fn with_user(id: i64, open_id: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            users: Mutex::new(vec![User {
                id,
                open_id: open_id.into(),
                name: Some("Coach".into()),
                email: Some(format!("{}@example.com", open_id)),
                login_method: Some("oauth".into()),
                role: "user".into(),
                created_at: now,
                updated_at: now,
                last_signed_in: now,
            }]),
            unavailable: false,
            failing: false,
        }
    }
}

#[async_trait]
impl UserRepository for MockUsers {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        if self.failing {
            return Err(StorageError::Database(sqlx::Error::Protocol(
                "Mock DB failure".into(),
            )));
        }
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn upsert_by_open_id(&self, user: &UpsertUser) -> Result<User, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        let now = OffsetDateTime::now_utc();
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter_mut().find(|u| u.open_id == user.open_id) {
            existing.name = user.name.clone().or(existing.name.take());
            existing.email = user.email.clone().or(existing.email.take());
            existing.login_method = user.login_method.clone().or(existing.login_method.take());
            existing.last_signed_in = now;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let created = User {
            id: users.len() as i64 + 1,
            open_id: user.open_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            login_method: user.login_method.clone(),
            role: "user".into(),
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        };
        users.push(created.clone());
        Ok(created)
    }
}
