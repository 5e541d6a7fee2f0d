// pma-service/src/models/mod.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use actix_web::{HttpResponse, ResponseError};

pub mod team;
pub use team::*;

pub mod membership;
pub use membership::*;

pub mod milestone;
pub use milestone::*;

pub mod team_file;
pub use team_file::*;

pub mod chat;
pub use chat::*;

pub mod availability;
pub use availability::*;

// Platform-wide role attached to every authenticated user's profile.
// Admins moderate content but are locked out of authoring actions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "common")]
    Common,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "anonymous")]
    Anonymous,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_common(&self) -> bool {
        matches!(self, Role::Common)
    }
}

// One profile per user, created lazily with the default role on first sight
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    pub user_id: String,
    pub role: Role,
}

impl Profile {
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            role: Role::Common,
        }
    }
}

// User models for authentication
#[derive(Serialize, Deserialize, Debug)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl User {
    // Display name shown next to chat messages and calendar slots
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

// JWT claims structure for authentication
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub email: String,
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued at
}

// A single field-level constraint violation, reported alongside its siblings
// rather than as one opaque failure
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

// Custom error types
#[derive(Debug)]
pub enum ServiceError {
    InternalServerError,
    BadRequest(String),
    Unauthorized,
    NotFound,
    // Policy refusal with a human-readable reason; normal control flow,
    // never fatal
    Denied(String),
    // One or more per-field constraint violations
    Validation(Vec<FieldError>),
    // Object-storage call failed; the metadata commit was withheld and the
    // caller may retry
    ExternalStore(String),
}

// Implement Display for ServiceError
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InternalServerError => write!(f, "Internal Server Error"),
            ServiceError::BadRequest(msg) => write!(f, "BadRequest: {}", msg),
            ServiceError::Unauthorized => write!(f, "Unauthorized"),
            ServiceError::NotFound => write!(f, "Not Found"),
            ServiceError::Denied(reason) => write!(f, "Denied: {}", reason),
            ServiceError::Validation(errors) => {
                write!(f, "Validation failed:")?;
                for e in errors {
                    write!(f, " {}: {};", e.field, e.reason)?;
                }
                Ok(())
            }
            ServiceError::ExternalStore(msg) => write!(f, "External store failure: {}", msg),
        }
    }
}

// Implement std::error::Error for ServiceError
impl std::error::Error for ServiceError {}

// Implement ResponseError for ServiceError
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError =>
                HttpResponse::InternalServerError().json("Internal Server Error"),
            ServiceError::BadRequest(ref message) =>
                HttpResponse::BadRequest().json(message),
            ServiceError::Unauthorized =>
                HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::NotFound =>
                HttpResponse::NotFound().json("Not Found"),
            ServiceError::Denied(ref reason) =>
                HttpResponse::Forbidden().json(serde_json::json!({ "error": reason })),
            ServiceError::Validation(ref errors) =>
                HttpResponse::BadRequest().json(serde_json::json!({ "errors": errors })),
            ServiceError::ExternalStore(ref message) =>
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": message,
                    "retryable": true
                })),
        }
    }
}
