// pma-service/src/utils/object_store.rs
//
// Narrow object-storage collaborator: put bytes under a key, get them back.
// This implementation is disk-backed under the storage root; the rest of
// the service only ever sees the key it stored. Failures surface as
// retryable external-store errors and must prevent any metadata commit.

use crate::models::ServiceError;
use log::error;
use std::fs;
use std::path::{Component, Path, PathBuf};

const OBJECTS_DIR: &str = "./storage/objects";

fn object_path(key: &str) -> Result<PathBuf, ServiceError> {
    if key.is_empty() {
        return Err(ServiceError::ExternalStore("empty object key".to_string()));
    }

    // Keys are service-generated, but reject anything that would escape
    // the objects root
    let relative = Path::new(key);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(ServiceError::ExternalStore(format!(
            "invalid object key: {}",
            key
        )));
    }

    Ok(Path::new(OBJECTS_DIR).join(relative))
}

pub fn put(key: &str, bytes: &[u8], content_type: &str) -> Result<(), ServiceError> {
    let path = object_path(key)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            error!("Object store put failed for key {}: {:?}", key, e);
            ServiceError::ExternalStore(format!("failed to store object: {}", e))
        })?;
    }

    fs::write(&path, bytes).map_err(|e| {
        error!(
            "Object store put failed for key {} ({}): {:?}",
            key, content_type, e
        );
        ServiceError::ExternalStore(format!("failed to store object: {}", e))
    })
}

// Remove a single stored object. Missing keys are fine; deletion is
// idempotent.
pub fn delete(key: &str) -> Result<(), ServiceError> {
    let path = object_path(key)?;

    if !path.exists() {
        return Ok(());
    }

    fs::remove_file(&path).map_err(|e| {
        error!("Object store delete failed for key {}: {:?}", key, e);
        ServiceError::ExternalStore(format!("failed to delete object: {}", e))
    })
}

// Remove every object stored under a team's key prefix. Keys are always
// "{team_id}/{file_id}", so this is a single directory removal.
pub fn delete_team_objects(team_id: &str) -> Result<(), ServiceError> {
    let path = object_path(team_id)?;

    if !path.exists() {
        return Ok(());
    }

    fs::remove_dir_all(&path).map_err(|e| {
        error!("Object store purge failed for team {}: {:?}", team_id, e);
        ServiceError::ExternalStore(format!("failed to purge objects: {}", e))
    })
}

pub fn get(key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
    let path = object_path(key)?;

    if !path.exists() {
        return Ok(None);
    }

    fs::read(&path).map(Some).map_err(|e| {
        error!("Object store get failed for key {}: {:?}", key, e);
        ServiceError::ExternalStore(format!("failed to fetch object: {}", e))
    })
}
