use tracing::{error, info, warn};

use super::repo::{StorageError, WodRepository};
use super::repo_types::{NewWod, StoredWorkout};

// Unavailable storage is soft everywhere below: None / empty / false.
// Any other storage error is logged and propagated.

/// Inserts and reads the row back.
pub async fn create(
    repo: &dyn WodRepository,
    owner_id: i64,
    wod: NewWod,
) -> Result<Option<StoredWorkout>, StorageError> {
    let id = match repo.insert(owner_id, &wod).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            error!(owner_id, "failed to read back inserted wod id");
            return Ok(None);
        }
        Err(StorageError::Unavailable) => {
            warn!(owner_id, "cannot create wod: storage unavailable");
            return Ok(None);
        }
        Err(e) => {
            error!(error = %e, owner_id, "failed to create wod");
            return Err(e);
        }
    };

    let created = get_by_id(repo, id).await?;
    if created.is_some() {
        info!(owner_id, wod_id = id, "wod saved");
    }
    Ok(created)
}

pub async fn list_by_owner(
    repo: &dyn WodRepository,
    owner_id: i64,
) -> Result<Vec<StoredWorkout>, StorageError> {
    match repo.list_by_owner(owner_id).await {
        Ok(rows) => Ok(rows),
        Err(StorageError::Unavailable) => {
            warn!(owner_id, "cannot list wods: storage unavailable");
            Ok(vec![])
        }
        Err(e) => {
            error!(error = %e, owner_id, "failed to list wods");
            Err(e)
        }
    }
}

pub async fn get_by_id(
    repo: &dyn WodRepository,
    id: i64,
) -> Result<Option<StoredWorkout>, StorageError> {
    match repo.find_by_id(id).await {
        Ok(row) => Ok(row),
        Err(StorageError::Unavailable) => {
            warn!(wod_id = id, "cannot get wod: storage unavailable");
            Ok(None)
        }
        Err(e) => {
            error!(error = %e, wod_id = id, "failed to get wod");
            Err(e)
        }
    }
}

/// True only when a row owned by `owner_id` was removed.
pub async fn delete_by_id(
    repo: &dyn WodRepository,
    owner_id: i64,
    id: i64,
) -> Result<bool, StorageError> {
    match repo.delete_owned(owner_id, id).await {
        Ok(n) => {
            if n == 0 {
                warn!(owner_id, wod_id = id, "delete matched no owned wod");
            }
            Ok(n > 0)
        }
        Err(StorageError::Unavailable) => {
            warn!(owner_id, wod_id = id, "cannot delete wod: storage unavailable");
            Ok(false)
        }
        Err(e) => {
            error!(error = %e, owner_id, wod_id = id, "failed to delete wod");
            Err(e)
        }
    }
}
