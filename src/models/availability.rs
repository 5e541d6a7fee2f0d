// pma-service/src/models/availability.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::FieldError;

// A time slot a member is available for, shown on the team calendar.
// Duplicate (user, team, date, start, end) tuples are not stored.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Availability {
    pub id: String,
    pub user_id: String,
    pub team_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Availability {
    pub fn new(user_id: String, team_id: String, data: &AvailabilityData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            team_id,
            date: data.date,
            start_time: data.start_time,
            end_time: data.end_time,
        }
    }

    // Two slots collide when every tuple component matches
    pub fn same_slot(&self, other: &AvailabilityData, user_id: &str, team_id: &str) -> bool {
        self.user_id == user_id
            && self.team_id == team_id
            && self.date == other.date
            && self.start_time == other.start_time
            && self.end_time == other.end_time
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }
}

// Request body for adding a slot
#[derive(Serialize, Deserialize, Debug)]
pub struct AvailabilityData {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilityData {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        if self.end_time <= self.start_time {
            return Err(vec![FieldError::new(
                "end_time",
                "End time must be after start time.",
            )]);
        }
        Ok(())
    }
}
