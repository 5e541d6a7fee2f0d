// pma-service/src/utils/milestone_storage.rs
use crate::models::{Milestone, ServiceError};
use log::{error, info, warn};
use std::fs;
use std::path::Path;

const MILESTONES_DIR: &str = "./storage/milestones";

fn ensure_milestones_dir() -> Result<(), ServiceError> {
    let dir = Path::new(MILESTONES_DIR);
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create milestones directory: {:?}", e);
            ServiceError::InternalServerError
        })?;
    }
    Ok(())
}

pub fn save_milestone(milestone: &Milestone) -> Result<(), ServiceError> {
    ensure_milestones_dir()?;

    let milestone_path = format!("{}/{}.json", MILESTONES_DIR, milestone.id);
    let milestone_json = serde_json::to_string_pretty(milestone).map_err(|e| {
        error!("Failed to serialize milestone: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&milestone_path, milestone_json).map_err(|e| {
        error!("Failed to save milestone: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

pub fn find_milestone_by_id(milestone_id: &str) -> Result<Option<Milestone>, ServiceError> {
    let milestone_path = format!("{}/{}.json", MILESTONES_DIR, milestone_id);
    let path = Path::new(&milestone_path);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read milestone file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let milestone: Milestone = serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse milestone JSON: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(milestone))
}

fn scan_milestones<F>(mut keep: F) -> Result<Vec<Milestone>, ServiceError>
where
    F: FnMut(&Milestone) -> bool,
{
    ensure_milestones_dir()?;
    let mut milestones = Vec::new();

    for entry_result in fs::read_dir(MILESTONES_DIR).map_err(|e| {
        error!("Failed to read milestones directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|_| ServiceError::InternalServerError)?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|_| ServiceError::InternalServerError)?;
            match serde_json::from_str::<Milestone>(&content) {
                Ok(milestone) => {
                    if keep(&milestone) {
                        milestones.push(milestone);
                    }
                }
                Err(e) => {
                    warn!("Failed to parse milestone JSON: {:?}", e);
                    continue;
                }
            }
        }
    }

    Ok(milestones)
}

// Roadmap order: soonest deadline first
pub fn milestones_for_team(team_id: &str) -> Result<Vec<Milestone>, ServiceError> {
    let mut milestones = scan_milestones(|m| m.team_id.as_deref() == Some(team_id))?;
    milestones.sort_by(|a, b| a.end_date.cmp(&b.end_date));
    Ok(milestones)
}

// Upcoming milestones across a set of teams, for the dashboard
pub fn upcoming_for_teams(team_ids: &[String], limit: usize) -> Result<Vec<Milestone>, ServiceError> {
    let mut milestones = scan_milestones(|m| {
        m.team_id
            .as_ref()
            .map_or(false, |t| team_ids.iter().any(|id| id == t))
    })?;
    milestones.sort_by(|a, b| a.end_date.cmp(&b.end_date));
    milestones.truncate(limit);
    Ok(milestones)
}

pub fn delete_milestone(milestone_id: &str) -> Result<bool, ServiceError> {
    let milestone_path = format!("{}/{}.json", MILESTONES_DIR, milestone_id);
    let path = Path::new(&milestone_path);

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path).map_err(|e| {
        error!("Failed to delete milestone file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(true)
}

pub fn delete_team_milestones(team_id: &str) -> Result<usize, ServiceError> {
    let milestones = milestones_for_team(team_id)?;
    let mut deleted = 0;

    for milestone in milestones {
        if delete_milestone(&milestone.id)? {
            deleted += 1;
        }
    }

    info!("✅ Deleted {} milestones for team: {}", deleted, team_id);
    Ok(deleted)
}
