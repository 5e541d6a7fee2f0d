// pma-service/src/utils/availability_storage.rs
use crate::models::{Availability, AvailabilityData, ServiceError};
use lazy_static::lazy_static;
use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

const AVAILABILITY_DIR: &str = "./storage/availability";

lazy_static! {
    // Serializes inserts so the duplicate-slot check cannot race
    static ref AVAILABILITY_LOCK: Mutex<()> = Mutex::new(());
}

fn ensure_availability_dir() -> Result<(), ServiceError> {
    let dir = Path::new(AVAILABILITY_DIR);
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create availability directory: {:?}", e);
            ServiceError::InternalServerError
        })?;
    }
    Ok(())
}

fn write_availability(availability: &Availability) -> Result<(), ServiceError> {
    ensure_availability_dir()?;

    let availability_path = format!("{}/{}.json", AVAILABILITY_DIR, availability.id);
    let availability_json = serde_json::to_string_pretty(availability).map_err(|e| {
        error!("Failed to serialize availability: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&availability_path, availability_json).map_err(|e| {
        error!("Failed to save availability: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

pub fn find_availability_by_id(availability_id: &str) -> Result<Option<Availability>, ServiceError> {
    let availability_path = format!("{}/{}.json", AVAILABILITY_DIR, availability_id);
    let path = Path::new(&availability_path);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read availability file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let availability: Availability = serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse availability JSON: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(availability))
}

pub fn availability_for_team(team_id: &str) -> Result<Vec<Availability>, ServiceError> {
    ensure_availability_dir()?;
    let mut slots = Vec::new();

    for entry_result in fs::read_dir(AVAILABILITY_DIR).map_err(|e| {
        error!("Failed to read availability directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|_| ServiceError::InternalServerError)?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|_| ServiceError::InternalServerError)?;
            match serde_json::from_str::<Availability>(&content) {
                Ok(availability) => {
                    if availability.team_id == team_id {
                        slots.push(availability);
                    }
                }
                Err(e) => {
                    warn!("Failed to parse availability JSON: {:?}", e);
                    continue;
                }
            }
        }
    }

    slots.sort_by_key(|a| a.starts_at());
    Ok(slots)
}

// Insert a slot unless an identical (user, team, date, start, end) tuple
// already exists; the duplicate case is an informational no-op
pub fn add_availability(
    user_id: &str,
    team_id: &str,
    data: &AvailabilityData,
) -> Result<Option<Availability>, ServiceError> {
    let _guard = AVAILABILITY_LOCK
        .lock()
        .map_err(|_| ServiceError::InternalServerError)?;

    let existing = availability_for_team(team_id)?;
    if existing.iter().any(|a| a.same_slot(data, user_id, team_id)) {
        return Ok(None);
    }

    let availability = Availability::new(user_id.to_string(), team_id.to_string(), data);
    write_availability(&availability)?;

    info!(
        "✅ Added availability for user {} in team {} on {}",
        user_id, team_id, data.date
    );
    Ok(Some(availability))
}

pub fn delete_availability(availability_id: &str) -> Result<bool, ServiceError> {
    let availability_path = format!("{}/{}.json", AVAILABILITY_DIR, availability_id);
    let path = Path::new(&availability_path);

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path).map_err(|e| {
        error!("Failed to delete availability file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(true)
}

pub fn delete_team_availability(team_id: &str) -> Result<usize, ServiceError> {
    let slots = availability_for_team(team_id)?;
    let mut deleted = 0;

    for slot in slots {
        if delete_availability(&slot.id)? {
            deleted += 1;
        }
    }

    info!("✅ Deleted {} availability slots for team: {}", deleted, team_id);
    Ok(deleted)
}
