// pma-service/src/models/milestone.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::FieldError;

// A progress-tracked roadmap item. `completed` is derived from `progress`
// on every construction and update; callers can never set it directly.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Milestone {
    pub id: String,
    // Milestones may be personal, unscoped to any team
    pub team_id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub progress: u8,
    pub completed: bool,
}

// Request body for creating or editing a milestone
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MilestoneData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub progress: u8,
}

impl MilestoneData {
    // Field-level validation, reported per field rather than as one
    // opaque failure
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title cannot be empty."));
        }
        if self.end_date < self.start_date {
            errors.push(FieldError::new(
                "end_date",
                "End date cannot be before start date.",
            ));
        }
        if self.progress > 100 {
            errors.push(FieldError::new(
                "progress",
                "Progress must be between 0 and 100.",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Milestone {
    pub fn new(
        team_id: Option<String>,
        user_id: String,
        data: &MilestoneData,
    ) -> Result<Self, Vec<FieldError>> {
        data.validate()?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            team_id,
            user_id,
            title: data.title.clone(),
            description: data.description.clone(),
            start_date: data.start_date,
            end_date: data.end_date,
            progress: data.progress,
            completed: data.progress == 100,
        })
    }

    // Apply an edit, recomputing the derived completion flag
    pub fn update(&mut self, data: &MilestoneData) -> Result<(), Vec<FieldError>> {
        data.validate()?;

        self.title = data.title.clone();
        self.description = data.description.clone();
        self.start_date = data.start_date;
        self.end_date = data.end_date;
        self.progress = data.progress;
        self.completed = self.progress == 100;
        Ok(())
    }

    // Sugar for "set progress to 100"
    pub fn mark_complete(&mut self) {
        self.progress = 100;
        self.completed = true;
    }
}
