// pma-service/src/models/membership.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Status of a join request. Rejected is terminal: the row is kept and a
// repeat join request reports it instead of creating a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "accepted")]
    Accepted,
    #[serde(rename = "rejected")]
    Rejected,
}

// One row per (user, team) pair. The team owner never has one; ownership is
// checked against the team record directly.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Membership {
    pub id: String,
    pub user_id: String,
    pub team_id: String,
    // Informational label only; authorization never reads it
    pub role: String,
    pub status: MembershipStatus,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    // New join requests always start out pending
    pub fn new(user_id: String, team_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            team_id,
            role: "Member".to_string(),
            status: MembershipStatus::Pending,
            joined_at: Utc::now(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == MembershipStatus::Accepted
    }
}

// Result of a join request. Only `Requested` changes state; every other
// variant is an informational no-op reporting where the caller already
// stands with the team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    // A fresh pending request was created
    Requested,
    // Caller owns the team; owners never hold membership rows
    Owner,
    // An accepted row already exists
    AlreadyMember,
    // A pending row already exists
    AlreadyPending,
    // A rejected row exists; rejection is terminal
    Rejected,
}

impl JoinOutcome {
    // User-facing message for the informational outcomes
    pub fn message(&self, team_name: &str) -> String {
        match self {
            JoinOutcome::Requested => {
                format!("You have requested to join the team '{}'.", team_name)
            }
            JoinOutcome::Owner => "You are the owner of this team.".to_string(),
            JoinOutcome::AlreadyMember => {
                format!("You are already a member of '{}'.", team_name)
            }
            JoinOutcome::AlreadyPending => {
                format!("Your join request for '{}' is already pending.", team_name)
            }
            JoinOutcome::Rejected => {
                format!("Your join request for '{}' was rejected.", team_name)
            }
        }
    }

    pub fn changed_state(&self) -> bool {
        matches!(self, JoinOutcome::Requested)
    }
}
