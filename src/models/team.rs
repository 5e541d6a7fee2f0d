// pma-service/src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// A team owns its memberships, files, chat, milestones and availability;
// deleting the team cascades to all of them. The creator stays owner for
// the life of the team and never holds a membership row.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: String, description: Option<String>, owner_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            owner_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

// Request body for team creation
#[derive(Serialize, Deserialize, Debug)]
pub struct TeamData {
    pub name: String,
    pub description: Option<String>,
}
