// pma-service/src/routes/chat_routes.rs
use crate::models::{ChatMessageData, FieldError, ServiceError, TeamChatMessage};
use crate::policy::{decide, Action, Decision};
use crate::utils::{chat_storage, get_user_id_from_request, resolve_actor, team_storage, user_storage};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// The team's chat thread, ordered by creation time ascending
#[get("/teams/{team_id}/chat")]
async fn get_chat_messages(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("💬 Fetching chat for team: {}", team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::ViewTeamDetail) {
        error!("❌ User: {} denied chat of team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    let messages = chat_storage::messages_for_team(&team_id)?;

    Ok(HttpResponse::Ok().json(messages))
}

// Post a message. Owner or accepted member; administrators are explicitly
// barred from authoring.
#[post("/teams/{team_id}/chat")]
async fn post_chat_message(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<ChatMessageData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("💬 Posting message to team: {}", team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::PostChatMessage) {
        error!("❌ User: {} denied posting to team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    let content = data.message.trim();
    if content.is_empty() {
        return Err(ServiceError::Validation(vec![FieldError::new(
            "message",
            "Message cannot be empty",
        )]));
    }

    let message = TeamChatMessage::new(team_id.clone(), user_id.clone(), content.to_string());
    chat_storage::save_message(&message)?;

    let author = user_storage::find_user_by_id(&user_id)?
        .map(|u| u.display_name().to_string())
        .unwrap_or(user_id);

    info!("✅ Message posted to team: {}", team_id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": {
            "id": message.id,
            "user": author,
            "content": message.message,
            "created_at": message.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    })))
}

// Register all chat routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_chat_messages)
        .service(post_chat_message);
}
