// pma-service/src/utils/file_storage.rs
use crate::models::{ServiceError, TeamFile};
use log::{error, info, warn};
use std::fs;
use std::path::Path;

const FILES_DIR: &str = "./storage/files";

fn ensure_files_dir() -> Result<(), ServiceError> {
    let dir = Path::new(FILES_DIR);
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create files directory: {:?}", e);
            ServiceError::InternalServerError
        })?;
    }
    Ok(())
}

pub fn save_file(file: &TeamFile) -> Result<(), ServiceError> {
    ensure_files_dir()?;

    let file_path = format!("{}/{}.json", FILES_DIR, file.id);
    let file_json = serde_json::to_string_pretty(file).map_err(|e| {
        error!("Failed to serialize file metadata: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&file_path, file_json).map_err(|e| {
        error!("Failed to save file metadata: {:?}", e);
        ServiceError::InternalServerError
    })?;

    info!("✅ Saved file metadata: {}", file.id);
    Ok(())
}

pub fn find_file_by_id(file_id: &str) -> Result<Option<TeamFile>, ServiceError> {
    let file_path = format!("{}/{}.json", FILES_DIR, file_id);
    let path = Path::new(&file_path);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read file metadata: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let file: TeamFile = serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse file metadata JSON: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(file))
}

// List a team's files, optionally narrowed by a case-insensitive keyword
// substring query. Newest uploads first.
pub fn files_for_team(team_id: &str, query: Option<&str>) -> Result<Vec<TeamFile>, ServiceError> {
    ensure_files_dir()?;
    let mut files = Vec::new();

    for entry_result in fs::read_dir(FILES_DIR).map_err(|e| {
        error!("Failed to read files directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|_| ServiceError::InternalServerError)?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|_| ServiceError::InternalServerError)?;
            let file: TeamFile = match serde_json::from_str(&content) {
                Ok(f) => f,
                Err(e) => {
                    warn!("Failed to parse file metadata JSON: {:?}", e);
                    continue;
                }
            };

            if file.team_id != team_id {
                continue;
            }

            if let Some(q) = query {
                let q = q.trim();
                if !q.is_empty() && !file.matches_keyword(q) {
                    continue;
                }
            }

            files.push(file);
        }
    }

    files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    Ok(files)
}

// Recent uploads across a set of teams, for the dashboard
pub fn recent_files_for_teams(team_ids: &[String], limit: usize) -> Result<Vec<TeamFile>, ServiceError> {
    let mut files = Vec::new();
    for team_id in team_ids {
        files.extend(files_for_team(team_id, None)?);
    }

    files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    files.truncate(limit);
    Ok(files)
}

pub fn delete_file(file_id: &str) -> Result<bool, ServiceError> {
    let file_path = format!("{}/{}.json", FILES_DIR, file_id);
    let path = Path::new(&file_path);

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path).map_err(|e| {
        error!("Failed to delete file metadata: {:?}", e);
        ServiceError::InternalServerError
    })?;

    info!("✅ Deleted file metadata: {}", file_id);
    Ok(true)
}

pub fn delete_team_files(team_id: &str) -> Result<usize, ServiceError> {
    let files = files_for_team(team_id, None)?;
    let mut deleted = 0;

    for file in files {
        if delete_file(&file.id)? {
            deleted += 1;
        }
    }

    info!("✅ Deleted {} files for team: {}", deleted, team_id);
    Ok(deleted)
}
