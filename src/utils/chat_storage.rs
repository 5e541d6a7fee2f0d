// pma-service/src/utils/chat_storage.rs
use crate::models::{ServiceError, TeamChatMessage};
use log::{error, info, warn};
use std::fs;
use std::path::Path;

const CHAT_DIR: &str = "./storage/chat";

fn ensure_chat_dir() -> Result<(), ServiceError> {
    let dir = Path::new(CHAT_DIR);
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create chat directory: {:?}", e);
            ServiceError::InternalServerError
        })?;
    }
    Ok(())
}

// Messages are append-only; there is no update path
pub fn save_message(message: &TeamChatMessage) -> Result<(), ServiceError> {
    ensure_chat_dir()?;

    let message_path = format!("{}/{}.json", CHAT_DIR, message.id);
    let message_json = serde_json::to_string_pretty(message).map_err(|e| {
        error!("Failed to serialize chat message: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&message_path, message_json).map_err(|e| {
        error!("Failed to save chat message: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

fn scan_messages<F>(mut keep: F) -> Result<Vec<TeamChatMessage>, ServiceError>
where
    F: FnMut(&TeamChatMessage) -> bool,
{
    ensure_chat_dir()?;
    let mut messages = Vec::new();

    for entry_result in fs::read_dir(CHAT_DIR).map_err(|e| {
        error!("Failed to read chat directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|_| ServiceError::InternalServerError)?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|_| ServiceError::InternalServerError)?;
            match serde_json::from_str::<TeamChatMessage>(&content) {
                Ok(message) => {
                    if keep(&message) {
                        messages.push(message);
                    }
                }
                Err(e) => {
                    warn!("Failed to parse chat message JSON: {:?}", e);
                    continue;
                }
            }
        }
    }

    Ok(messages)
}

// The team thread, totally ordered by creation time ascending
pub fn messages_for_team(team_id: &str) -> Result<Vec<TeamChatMessage>, ServiceError> {
    let mut messages = scan_messages(|m| m.team_id == team_id)?;
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(messages)
}

// Latest messages across a set of teams, newest first, for the dashboard
pub fn recent_messages_for_teams(
    team_ids: &[String],
    limit: usize,
) -> Result<Vec<TeamChatMessage>, ServiceError> {
    let mut messages = scan_messages(|m| team_ids.iter().any(|t| t == &m.team_id))?;
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    messages.truncate(limit);
    Ok(messages)
}

pub fn delete_team_messages(team_id: &str) -> Result<usize, ServiceError> {
    let messages = messages_for_team(team_id)?;
    let mut deleted = 0;

    for message in messages {
        let message_path = format!("{}/{}.json", CHAT_DIR, message.id);
        if Path::new(&message_path).exists() {
            fs::remove_file(&message_path).map_err(|e| {
                error!("Failed to delete chat message: {:?}", e);
                ServiceError::InternalServerError
            })?;
            deleted += 1;
        }
    }

    info!("✅ Deleted {} chat messages for team: {}", deleted, team_id);
    Ok(deleted)
}
