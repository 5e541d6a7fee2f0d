use crate::models::{Role, User};
use crate::routes::{
    auth_routes, availability_routes, chat_routes, file_routes, membership_routes,
    milestone_routes, team_routes,
};
use crate::utils::{jwt, password, profile_storage, user_storage};
use actix_web::http::StatusCode;
use actix_web::{test, App};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

// Seed a user directly in storage and mint a token for them, sidestepping
// the register/login round trip
fn seed_user(role: Role) -> (User, String) {
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: format!("{}@example.com", Uuid::new_v4()),
        password_hash: password::hash_password("hunter2").unwrap(),
        created_at: Utc::now(),
    };
    user_storage::save_user(&user).unwrap();
    profile_storage::get_or_create(&user.id).unwrap();
    if role != Role::Common {
        profile_storage::set_role(&user.id, role).unwrap();
    }

    let token = jwt::generate_token(&user).unwrap();
    (user, token)
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .configure(auth_routes::init_routes)
                .configure(team_routes::init_routes)
                .configure(membership_routes::init_routes)
                .configure(file_routes::init_routes)
                .configure(chat_routes::init_routes)
                .configure(milestone_routes::init_routes)
                .configure(availability_routes::init_routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn register_then_login_issues_a_token() {
    let app = test_app!();
    let email = format!("{}@example.com", Uuid::new_v4());

    let register = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(&json!({ "email": email, "password": "hunter2" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, register).await;
    assert!(body.get("user_id").is_some());
    assert_eq!(body["role"], "common");

    let login = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(&json!({ "email": email, "password": "hunter2" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, login).await;
    assert!(body["token"].as_str().unwrap().len() > 0);
    assert_eq!(body["role"], "common");
}

#[actix_rt::test]
async fn only_common_users_can_create_teams() {
    let app = test_app!();
    let (_, common_token) = seed_user(Role::Common);
    let (_, admin_token) = seed_user(Role::Admin);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&common_token))
        .set_json(&json!({ "name": format!("team-{}", Uuid::new_v4()) }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&admin_token))
        .set_json(&json!({ "name": "admin team" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// The end-to-end scenario: A creates Alpha, B joins, A accepts, B uploads a
// keyword-tagged file visible to both and to search
#[actix_rt::test]
async fn join_accept_upload_and_search_flow() {
    let app = test_app!();
    let (_user_a, token_a) = seed_user(Role::Common);
    let (user_b, token_b) = seed_user(Role::Common);

    // A creates the team
    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&token_a))
        .set_json(&json!({ "name": format!("Alpha-{}", Uuid::new_v4()) }))
        .to_request();
    let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let team_id = team["id"].as_str().unwrap().to_string();

    // B requests to join: a pending row appears
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/join", team_id))
        .insert_header(bearer(&token_b))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["changed"], true);
    let membership_id = body["membership_id"].as_str().unwrap().to_string();

    // A second join request is an informational no-op
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/join", team_id))
        .insert_header(bearer(&token_b))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["changed"], false);

    // B cannot see the team detail while pending
    let request = test::TestRequest::get()
        .uri(&format!("/teams/{}", team_id))
        .insert_header(bearer(&token_b))
        .to_request();
    let detail: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert!(detail["members"].is_null());

    // B cannot accept their own request
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/requests/{}/accept", team_id, membership_id))
        .insert_header(bearer(&token_b))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A accepts
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/requests/{}/accept", team_id, membership_id))
        .insert_header(bearer(&token_a))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["membership"]["status"], "accepted");

    // B uploads a file tagged "design"
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/files", team_id))
        .insert_header(bearer(&token_b))
        .set_json(&json!({
            "title": "spec.pdf",
            "keywords": "design",
            "file_content": "the spec body",
            "content_type": "text/plain"
        }))
        .to_request();
    let file: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let file_id = file["id"].as_str().unwrap().to_string();
    assert_eq!(file["uploaded_by"], user_b.id.as_str());

    // Visible to the owner, and keyword search finds it
    let request = test::TestRequest::get()
        .uri(&format!("/teams/{}/files?q=design", team_id))
        .insert_header(bearer(&token_a))
        .to_request();
    let files: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(files.as_array().unwrap().len(), 1);

    let request = test::TestRequest::get()
        .uri(&format!("/teams/{}/files?q=budget", team_id))
        .insert_header(bearer(&token_a))
        .to_request();
    let files: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert!(files.as_array().unwrap().is_empty());

    // The stored bytes come back on serve
    let request = test::TestRequest::get()
        .uri(&format!("/files/{}", file_id))
        .insert_header(bearer(&token_b))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = test::read_body(response).await;
    assert_eq!(&bytes[..], b"the spec body");
}

#[actix_rt::test]
async fn deleting_a_file_removes_its_bytes_too() {
    let app = test_app!();
    let (_, token_a) = seed_user(Role::Common);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&token_a))
        .set_json(&json!({ "name": format!("team-{}", Uuid::new_v4()) }))
        .to_request();
    let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let team_id = team["id"].as_str().unwrap().to_string();

    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/files", team_id))
        .insert_header(bearer(&token_a))
        .set_json(&json!({
            "title": "scratch.txt",
            "file_content": "scratch",
            "content_type": "text/plain"
        }))
        .to_request();
    let file: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let file_id = file["id"].as_str().unwrap().to_string();
    let storage_key = file["storage_key"].as_str().unwrap().to_string();

    assert!(crate::utils::object_store::get(&storage_key)
        .unwrap()
        .is_some());

    let request = test::TestRequest::delete()
        .uri(&format!("/files/{}", file_id))
        .insert_header(bearer(&token_a))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // No orphaned object after the metadata row goes
    assert!(crate::utils::object_store::get(&storage_key)
        .unwrap()
        .is_none());
}

#[actix_rt::test]
async fn admins_cannot_author_content() {
    let app = test_app!();
    let (_, owner_token) = seed_user(Role::Common);
    let (_, admin_token) = seed_user(Role::Admin);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&owner_token))
        .set_json(&json!({ "name": format!("team-{}", Uuid::new_v4()) }))
        .to_request();
    let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let team_id = team["id"].as_str().unwrap().to_string();

    // Chat
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/chat", team_id))
        .insert_header(bearer(&admin_token))
        .set_json(&json!({ "message": "hello" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Milestones
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/milestones", team_id))
        .insert_header(bearer(&admin_token))
        .set_json(&json!({
            "title": "sneaky milestone",
            "start_date": "2025-01-06",
            "end_date": "2025-02-28"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Availability
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/availability", team_id))
        .insert_header(bearer(&admin_token))
        .set_json(&json!({
            "date": "2025-01-06",
            "start_time": "09:00:00",
            "end_time": "10:00:00"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // But moderation is allowed: the admin can see the team detail
    let request = test::TestRequest::get()
        .uri(&format!("/teams/{}", team_id))
        .insert_header(bearer(&admin_token))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn owner_cannot_leave_but_members_can_and_rejoin() {
    let app = test_app!();
    let (_, token_a) = seed_user(Role::Common);
    let (_, token_b) = seed_user(Role::Common);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&token_a))
        .set_json(&json!({ "name": format!("team-{}", Uuid::new_v4()) }))
        .to_request();
    let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let team_id = team["id"].as_str().unwrap().to_string();

    // Owner leave is denied
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/leave", team_id))
        .insert_header(bearer(&token_a))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // B joins and is accepted
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/join", team_id))
        .insert_header(bearer(&token_b))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let membership_id = body["membership_id"].as_str().unwrap().to_string();

    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/requests/{}/accept", team_id, membership_id))
        .insert_header(bearer(&token_a))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // B leaves, then can rejoin as a fresh pending request
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/leave", team_id))
        .insert_header(bearer(&token_b))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/join", team_id))
        .insert_header(bearer(&token_b))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["changed"], true);
}

#[actix_rt::test]
async fn milestone_lifecycle_over_http() {
    let app = test_app!();
    let (_, token_a) = seed_user(Role::Common);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&token_a))
        .set_json(&json!({ "name": format!("team-{}", Uuid::new_v4()) }))
        .to_request();
    let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let team_id = team["id"].as_str().unwrap().to_string();

    // Invalid dates are rejected per field
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/milestones", team_id))
        .insert_header(bearer(&token_a))
        .set_json(&json!({
            "title": "backwards",
            "start_date": "2025-02-28",
            "end_date": "2025-01-06"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "end_date");

    // Create at 50%, edit to 100%, edit back to 80%
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/milestones", team_id))
        .insert_header(bearer(&token_a))
        .set_json(&json!({
            "title": "Ship it",
            "start_date": "2025-01-06",
            "end_date": "2025-02-28",
            "progress": 50
        }))
        .to_request();
    let milestone: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(milestone["completed"], false);
    let milestone_id = milestone["id"].as_str().unwrap().to_string();

    let request = test::TestRequest::put()
        .uri(&format!("/teams/{}/milestones/{}", team_id, milestone_id))
        .insert_header(bearer(&token_a))
        .set_json(&json!({
            "title": "Ship it",
            "start_date": "2025-01-06",
            "end_date": "2025-02-28",
            "progress": 100
        }))
        .to_request();
    let milestone: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(milestone["completed"], true);

    let request = test::TestRequest::put()
        .uri(&format!("/teams/{}/milestones/{}", team_id, milestone_id))
        .insert_header(bearer(&token_a))
        .set_json(&json!({
            "title": "Ship it",
            "start_date": "2025-01-06",
            "end_date": "2025-02-28",
            "progress": 80
        }))
        .to_request();
    let milestone: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(milestone["completed"], false);

    // Mark complete forces 100
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/milestones/{}/complete", team_id, milestone_id))
        .insert_header(bearer(&token_a))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["milestone"]["progress"], 100);
    assert_eq!(body["milestone"]["completed"], true);
}

#[actix_rt::test]
async fn availability_duplicates_are_informational_no_ops() {
    let app = test_app!();
    let (_, token_a) = seed_user(Role::Common);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&token_a))
        .set_json(&json!({ "name": format!("team-{}", Uuid::new_v4()) }))
        .to_request();
    let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let team_id = team["id"].as_str().unwrap().to_string();

    let slot = json!({
        "date": "2025-01-06",
        "start_time": "09:00:00",
        "end_time": "10:30:00"
    });

    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/availability", team_id))
        .insert_header(bearer(&token_a))
        .set_json(&slot)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert!(body.get("availability").is_some());

    // The identical slot is not stored twice
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/availability", team_id))
        .insert_header(bearer(&token_a))
        .set_json(&slot)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["changed"], false);

    let request = test::TestRequest::get()
        .uri(&format!("/teams/{}/calendar", team_id))
        .insert_header(bearer(&token_a))
        .to_request();
    let events: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["start"], "2025-01-06T09:00:00");

    // End before start is a field error
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/availability", team_id))
        .insert_header(bearer(&token_a))
        .set_json(&json!({
            "date": "2025-01-06",
            "start_time": "11:00:00",
            "end_time": "10:00:00"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
