// pma-service/src/routes/home_routes.rs
use crate::models::ServiceError;
use crate::utils::{
    chat_storage, file_storage, get_user_id_from_request, milestone_storage, profile_storage,
    team_storage,
};
use actix_web::{get, web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;

// Number of recent items shown per dashboard section
const SUMMARY_LIMIT: usize = 10;

// Dashboard summary: the caller's teams, recent chat, upcoming milestones
// and latest uploads across them
#[get("/home")]
async fn home(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("🏠 Fetching home summary for user: {}", user_id);

    let profile = profile_storage::get_or_create(&user_id)?;

    // Teams the user belongs to: accepted memberships plus owned teams
    let memberships = team_storage::memberships_for_user(&user_id)?;
    let mut team_ids: Vec<String> = memberships
        .iter()
        .filter(|m| m.is_accepted())
        .map(|m| m.team_id.clone())
        .collect();

    let all_teams = team_storage::list_teams()?;
    for team in &all_teams {
        if team.is_owned_by(&user_id) && !team_ids.contains(&team.id) {
            team_ids.push(team.id.clone());
        }
    }

    let user_teams: Vec<_> = all_teams
        .iter()
        .filter(|t| team_ids.contains(&t.id))
        .collect();

    let recent_messages = chat_storage::recent_messages_for_teams(&team_ids, SUMMARY_LIMIT)?;
    let upcoming_milestones = milestone_storage::upcoming_for_teams(&team_ids, SUMMARY_LIMIT)?;
    let recent_files = file_storage::recent_files_for_teams(&team_ids, SUMMARY_LIMIT)?;

    Ok(HttpResponse::Ok().json(json!({
        "role": profile.role,
        "teams": user_teams,
        "messages": recent_messages,
        "milestones": upcoming_milestones,
        "files": recent_files,
    })))
}

// Register home routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
}
