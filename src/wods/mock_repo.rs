use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::repo::{StorageError, WodRepository};
use super::repo_types::{NewWod, StoredWorkout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockMode {
    #[default]
    Healthy,
    Unavailable,
    Failing,
    /// Insert succeeds but reports no id.
    LosesInsertId,
}

#[derive(Default)]
pub struct MockWodRepo {
    pub mode: MockMode,
    pub rows: Mutex<Vec<StoredWorkout>>,
    pub calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockWodRepo {
    pub fn with_mode(mode: MockMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            MockMode::Unavailable => Err(StorageError::Unavailable),
            MockMode::Failing => Err(StorageError::Database(sqlx::Error::Protocol(
                "Mock DB failure".into(),
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl WodRepository for MockWodRepo {
    async fn insert(&self, owner_id: i64, wod: &NewWod) -> Result<Option<i64>, StorageError> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let now = OffsetDateTime::now_utc();
        self.rows.lock().unwrap().push(StoredWorkout {
            id,
            user_id: owner_id,
            title: wod.title.clone(),
            description: Some(wod.description.clone()),
            strategy: wod.strategy.clone(),
            duration: wod.duration,
            difficulty: wod.difficulty.clone(),
            warmup: Some(wod.warmup.clone()),
            main_workout: wod.main_workout.clone(),
            cooldown: Some(wod.cooldown.clone()),
            movements: Some(wod.movements.clone()),
            equipment: Some(wod.equipment.clone()),
            notes: Some(wod.notes.clone()),
            created_at: now,
            updated_at: now,
        });
        if self.mode == MockMode::LosesInsertId {
            return Ok(None);
        }
        Ok(Some(id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredWorkout>, StorageError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().iter().find(|w| w.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<StoredWorkout>, StorageError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<u64, StorageError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|w| !(w.id == id && w.user_id == owner_id));
        Ok((before - rows.len()) as u64)
    }
}
