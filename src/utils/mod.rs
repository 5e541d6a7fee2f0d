// pma-service/src/utils/mod.rs
use crate::models::{Claims, Profile, Role, ServiceError, User};
use crate::policy::Actor;
use actix_web::http::header;
use actix_web::HttpRequest;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

pub mod team_storage;
pub mod file_storage;
pub mod chat_storage;
pub mod milestone_storage;
pub mod availability_storage;
pub mod object_store;

// JWT utility functions
pub mod jwt {
    use super::*;

    // Get JWT secret from environment or use default
    fn get_jwt_secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| "pma_super_secret_key".to_string())
    }

    // Generate a new JWT token for a user
    pub fn generate_token(user: &User) -> Result<String, ServiceError> {
        let secret = get_jwt_secret();
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(7))
            .ok_or(ServiceError::InternalServerError)?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            exp: expiration,
            iat: Utc::now().timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .map_err(|_| ServiceError::InternalServerError)
    }

    // Validate and decode a JWT token
    pub fn decode_token(token: &str) -> Result<Claims, ServiceError> {
        let secret = get_jwt_secret();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthorized)
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(ServiceError::Unauthorized);
        }

        Ok(auth_header.trim_start_matches("Bearer ").to_string())
    }
}

// Resolve the authenticated user id from the Authorization header
pub fn get_user_id_from_request(req: &HttpRequest) -> Result<String, ServiceError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(ServiceError::Unauthorized)?
        .to_str()
        .map_err(|_| ServiceError::Unauthorized)?;

    let token = jwt::extract_token_from_header(auth_header)?;
    let claims = jwt::decode_token(&token)?;

    Ok(claims.sub)
}

// Build the policy actor for a user against a team: platform role from the
// profile, team relationship from ownership and the membership row
pub fn resolve_actor(user_id: &str, team: &crate::models::Team) -> Result<Actor, ServiceError> {
    let profile = profile_storage::get_or_create(user_id)?;
    let membership = team_storage::find_membership(user_id, &team.id)?;

    Ok(Actor::new(
        profile.role,
        team.is_owned_by(user_id),
        membership.map(|m| m.status),
    ))
}

// Password utility functions
pub mod password {
    use super::*;

    // Hash a password using bcrypt
    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        hash(password, DEFAULT_COST).map_err(|_| ServiceError::InternalServerError)
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash).map_err(|_| ServiceError::InternalServerError)
    }
}

// User storage utilities
pub mod user_storage {
    use super::*;

    const USERS_DIR: &str = "./storage/users";

    // Save a user to storage
    pub fn save_user(user: &User) -> Result<(), ServiceError> {
        let users_dir = Path::new(USERS_DIR);
        if !users_dir.exists() {
            fs::create_dir_all(users_dir).map_err(|_| ServiceError::InternalServerError)?;
        }

        let user_path = format!("{}/{}.json", USERS_DIR, user.id);

        fs::write(
            &user_path,
            serde_json::to_string(&user).map_err(|_| ServiceError::InternalServerError)?,
        )
        .map_err(|_| ServiceError::InternalServerError)
    }

    // Find a user by email
    pub fn find_user_by_email(email: &str) -> Result<Option<User>, ServiceError> {
        let users_dir = Path::new(USERS_DIR);

        if !users_dir.exists() {
            fs::create_dir_all(users_dir).map_err(|_| ServiceError::InternalServerError)?;
            return Ok(None);
        }

        for entry in fs::read_dir(users_dir).map_err(|_| ServiceError::InternalServerError)? {
            let entry = entry.map_err(|_| ServiceError::InternalServerError)?;
            let path = entry.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                let content =
                    fs::read_to_string(&path).map_err(|_| ServiceError::InternalServerError)?;
                let user: User = serde_json::from_str(&content)
                    .map_err(|_| ServiceError::InternalServerError)?;

                if user.email == email {
                    return Ok(Some(user));
                }
            }
        }

        Ok(None)
    }

    // Find a user by ID
    pub fn find_user_by_id(id: &str) -> Result<Option<User>, ServiceError> {
        let user_path = format!("{}/{}.json", USERS_DIR, id);
        let path = Path::new(&user_path);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|_| ServiceError::InternalServerError)?;
        let user: User =
            serde_json::from_str(&content).map_err(|_| ServiceError::InternalServerError)?;

        Ok(Some(user))
    }
}

// Profile storage: one role record per user, created lazily at the auth
// boundary. The get-or-create runs under a process-wide lock so concurrent
// first-time logins cannot write duplicate rows.
pub mod profile_storage {
    use super::*;

    const PROFILES_DIR: &str = "./storage/profiles";

    lazy_static! {
        static ref PROFILE_LOCK: Mutex<()> = Mutex::new(());
    }

    fn profile_path(user_id: &str) -> String {
        format!("{}/{}.json", PROFILES_DIR, user_id)
    }

    fn read_profile(user_id: &str) -> Result<Option<Profile>, ServiceError> {
        let path_str = profile_path(user_id);
        let path = Path::new(&path_str);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|_| ServiceError::InternalServerError)?;
        let profile: Profile =
            serde_json::from_str(&content).map_err(|_| ServiceError::InternalServerError)?;

        Ok(Some(profile))
    }

    fn write_profile(profile: &Profile) -> Result<(), ServiceError> {
        let dir = Path::new(PROFILES_DIR);
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|_| ServiceError::InternalServerError)?;
        }

        fs::write(
            profile_path(&profile.user_id),
            serde_json::to_string(profile).map_err(|_| ServiceError::InternalServerError)?,
        )
        .map_err(|_| ServiceError::InternalServerError)
    }

    // Atomic get-or-create: every authenticated user has exactly one
    // profile, defaulting to the common role
    pub fn get_or_create(user_id: &str) -> Result<Profile, ServiceError> {
        let _guard = PROFILE_LOCK
            .lock()
            .map_err(|_| ServiceError::InternalServerError)?;

        if let Some(profile) = read_profile(user_id)? {
            return Ok(profile);
        }

        let profile = Profile::new(user_id.to_string());
        write_profile(&profile)?;
        Ok(profile)
    }

    // Operator-level role change; there is no public route for this
    pub fn set_role(user_id: &str, role: Role) -> Result<Profile, ServiceError> {
        let _guard = PROFILE_LOCK
            .lock()
            .map_err(|_| ServiceError::InternalServerError)?;

        let mut profile = match read_profile(user_id)? {
            Some(p) => p,
            None => Profile::new(user_id.to_string()),
        };
        profile.role = role;
        write_profile(&profile)?;
        Ok(profile)
    }
}
