// pma-service/src/models/chat.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// A chat message in a team's thread. Immutable once created; the thread is
// totally ordered by creation time, ascending.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamChatMessage {
    pub id: String,
    pub team_id: String,
    pub user_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl TeamChatMessage {
    pub fn new(team_id: String, user_id: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            team_id,
            user_id,
            message,
            created_at: Utc::now(),
        }
    }
}

// Request body for posting a message
#[derive(Serialize, Deserialize, Debug)]
pub struct ChatMessageData {
    pub message: String,
}
