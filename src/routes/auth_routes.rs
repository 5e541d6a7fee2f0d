// pma-service/src/routes/auth_routes.rs
use crate::models::{LoginResponse, ServiceError, User, UserCredentials};
use crate::utils::{get_user_id_from_request, jwt, password, profile_storage, user_storage};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;
use uuid::Uuid;

// Register a new user
#[post("/auth/register")]
async fn register(credentials: web::Json<UserCredentials>) -> Result<HttpResponse, ServiceError> {
    info!("📝 Register request for email: {}", credentials.email);

    // Check if the email already exists
    if user_storage::find_user_by_email(&credentials.email)?.is_some() {
        error!("❌ Email already registered: {}", credentials.email);
        return Err(ServiceError::BadRequest("Email already registered".to_string()));
    }

    // Create a new user
    let user_id = Uuid::new_v4().to_string();
    let user = User {
        id: user_id.clone(),
        email: credentials.email.clone(),
        password_hash: password::hash_password(&credentials.password)?,
        created_at: Utc::now(),
    };

    // Save the user
    user_storage::save_user(&user)?;

    // Every authenticated user gets exactly one profile, default common role
    let profile = profile_storage::get_or_create(&user.id)?;

    info!("✅ User registered successfully: {}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "User registered successfully",
        "user_id": user.id,
        "role": profile.role
    })))
}

// Login and get JWT token
#[post("/auth/login")]
async fn login(credentials: web::Json<UserCredentials>) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Login request for email: {}", credentials.email);

    // Find the user by email
    let user = match user_storage::find_user_by_email(&credentials.email)? {
        Some(user) => user,
        None => {
            error!("❌ User not found: {}", credentials.email);
            return Err(ServiceError::Unauthorized);
        }
    };

    // Verify password
    if !password::verify_password(&credentials.password, &user.password_hash)? {
        error!("❌ Invalid password for user: {}", credentials.email);
        return Err(ServiceError::Unauthorized);
    }

    // Profile lazy-init happens here, at the auth boundary, not on every
    // request
    let profile = profile_storage::get_or_create(&user.id)?;

    // Generate JWT token
    let token = jwt::generate_token(&user)?;

    info!("✅ User logged in successfully: {}", user.id);

    // Return token in headers as well as response body
    let response = LoginResponse {
        token: token.clone(),
        user_id: user.id,
        email: user.email,
        role: profile.role,
    };

    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", token)))
        .json(response))
}

// Get current user info (requires authentication)
#[get("/auth/me")]
async fn me(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let user = match user_storage::find_user_by_id(&user_id)? {
        Some(user) => user,
        None => {
            error!("❌ User not found: {}", user_id);
            return Err(ServiceError::NotFound);
        }
    };

    let profile = profile_storage::get_or_create(&user.id)?;

    Ok(HttpResponse::Ok().json(json!({
        "user_id": user.id,
        "email": user.email,
        "display_name": user.display_name(),
        "role": profile.role,
        "created_at": user.created_at
    })))
}

// Register all auth routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(me);
}
