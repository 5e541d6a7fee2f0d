// pma-service/src/models/team_file.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Metadata for a file shared with a team. The bytes themselves live in the
// object store under `storage_key`; this record only holds the reference.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamFile {
    pub id: String,
    pub title: String,
    pub description: String,
    // Free-text keyword tags, searched by case-insensitive substring
    pub keywords: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
    pub team_id: String,
    pub storage_key: String,
    pub content_type: String,
}

impl TeamFile {
    pub fn new(data: &FileUploadRequest, uploaded_by: String, team_id: String) -> Self {
        let id = Uuid::new_v4().to_string();
        // Scope the object key by team so cascading deletes stay cheap
        let storage_key = format!("{}/{}", team_id, id);

        Self {
            id,
            title: data.title.clone(),
            description: data.description.clone(),
            keywords: data.keywords.clone(),
            uploaded_at: Utc::now(),
            uploaded_by,
            team_id,
            storage_key,
            content_type: data
                .content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        }
    }

    // Case-insensitive substring match against the stored tag string
    pub fn matches_keyword(&self, query: &str) -> bool {
        self.keywords.to_lowercase().contains(&query.to_lowercase())
    }
}

// Request body for a file upload
#[derive(Serialize, Deserialize, Debug)]
pub struct FileUploadRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    pub file_content: String,
    pub content_type: Option<String>,
}
