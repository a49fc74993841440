use async_trait::async_trait;
use sqlx::PgPool;

pub use crate::db::StorageError;
use crate::wods::repo_types::{NewWod, StoredWorkout};

#[async_trait]
pub trait WodRepository: Send + Sync {
    /// Returns the generated id, if the backend reported one.
    ///
    /// `PgWodRepository` always gets the id back from `RETURNING id`, so `None`
    /// only comes from stores that cannot report generated keys.
    async fn insert(&self, owner_id: i64, wod: &NewWod) -> Result<Option<i64>, StorageError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<StoredWorkout>, StorageError>;
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<StoredWorkout>, StorageError>;
    /// Number of rows removed; only rows owned by `owner_id` are touched.
    async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<u64, StorageError>;
}

pub struct PgWodRepository {
    pool: Option<PgPool>,
}

impl PgWodRepository {
    pub fn new(pool: Option<PgPool>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> Result<&PgPool, StorageError> {
        self.pool.as_ref().ok_or(StorageError::Unavailable)
    }
}

const WOD_COLUMNS: &str = "id, user_id, title, description, strategy, duration, difficulty, \
     warmup, main_workout, cooldown, movements, equipment, notes, created_at, updated_at";

#[async_trait]
impl WodRepository for PgWodRepository {
    async fn insert(&self, owner_id: i64, wod: &NewWod) -> Result<Option<i64>, StorageError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO wods (user_id, title, description, strategy, duration, difficulty,
                              warmup, main_workout, cooldown, movements, equipment, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(owner_id)
        .bind(&wod.title)
        .bind(&wod.description)
        .bind(&wod.strategy)
        .bind(wod.duration)
        .bind(&wod.difficulty)
        .bind(&wod.warmup)
        .bind(&wod.main_workout)
        .bind(&wod.cooldown)
        .bind(&wod.movements)
        .bind(&wod.equipment)
        .bind(&wod.notes)
        .fetch_optional(self.pool()?)
        .await?;
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredWorkout>, StorageError> {
        let sql = format!("SELECT {} FROM wods WHERE id = $1 LIMIT 1", WOD_COLUMNS);
        let row = sqlx::query_as::<_, StoredWorkout>(&sql)
            .bind(id)
            .fetch_optional(self.pool()?)
            .await?;
        Ok(row)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<StoredWorkout>, StorageError> {
        let sql = format!(
            "SELECT {} FROM wods WHERE user_id = $1 ORDER BY id ASC",
            WOD_COLUMNS
        );
        let rows = sqlx::query_as::<_, StoredWorkout>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool()?)
            .await?;
        Ok(rows)
    }

    async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<u64, StorageError> {
        let res = sqlx::query(r#"DELETE FROM wods WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(owner_id)
            .execute(self.pool()?)
            .await?;
        Ok(res.rows_affected())
    }
}
