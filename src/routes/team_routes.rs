// pma-service/src/routes/team_routes.rs
use crate::models::{MembershipStatus, ServiceError, Team, TeamData};
use crate::policy::{decide, Action, Decision};
use crate::utils::{
    availability_storage, chat_storage, file_storage, get_user_id_from_request, milestone_storage,
    object_store, resolve_actor, team_storage,
};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Create a new team. Common users only; the creator becomes the immutable
// owner and needs no membership row.
#[post("/teams")]
async fn create_team(req: HttpRequest, team_data: web::Json<TeamData>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("📝 Creating new team: {} for user: {}", team_data.name, user_id);

    let profile = crate::utils::profile_storage::get_or_create(&user_id)?;
    let actor = crate::policy::Actor::new(profile.role, false, None);
    if let Decision::Deny(reason) = decide(&actor, Action::CreateTeam) {
        error!("❌ User: {} denied team creation", user_id);
        return Err(ServiceError::Denied(reason));
    }

    if team_data.name.trim().is_empty() {
        return Err(ServiceError::Validation(vec![crate::models::FieldError::new(
            "name",
            "Team name cannot be empty.",
        )]));
    }

    let team = Team::new(
        team_data.name.clone(),
        team_data.description.clone(),
        user_id.clone(),
    );

    team_storage::save_team(&team)?;

    info!("✅ Team created successfully: {}", team.id);

    Ok(HttpResponse::Ok().json(team))
}

// List all teams, annotated with the caller's membership status and
// ownership flag
#[get("/teams")]
async fn list_teams(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("📋 Fetching teams for user: {}", user_id);

    let teams = team_storage::list_teams()?;
    let memberships = team_storage::memberships_for_user(&user_id)?;

    let annotated: Vec<serde_json::Value> = teams
        .iter()
        .map(|team| {
            let status = memberships
                .iter()
                .find(|m| m.team_id == team.id)
                .map(|m| m.status);
            json!({
                "id": team.id,
                "name": team.name,
                "description": team.description,
                "owner_id": team.owner_id,
                "membership_status": status,
                "is_owner": team.is_owned_by(&user_id),
            })
        })
        .collect();

    info!("✅ Found {} teams", annotated.len());

    Ok(HttpResponse::Ok().json(annotated))
}

// Public listing for anonymous visitors: names and descriptions only
#[get("/public/teams")]
async fn public_teams() -> Result<HttpResponse, ServiceError> {
    let teams = team_storage::list_teams()?;

    let listing: Vec<serde_json::Value> = teams
        .iter()
        .map(|team| {
            json!({
                "id": team.id,
                "name": team.name,
                "description": team.description,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(listing))
}

// Team detail: the team record, plus the accepted member list for owners,
// admins and accepted members, plus the pending request list for owners and
// admins only
#[get("/teams/{team_id}")]
async fn get_team(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("🔍 Fetching team: {} for user: {}", team_id, user_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    let memberships = team_storage::memberships_for_team(&team_id)?;

    let members = if decide(&actor, Action::ViewTeamDetail).is_allowed() {
        Some(
            memberships
                .iter()
                .filter(|m| m.status == MembershipStatus::Accepted)
                .cloned()
                .collect::<Vec<_>>(),
        )
    } else {
        None
    };

    let pending_requests = if decide(&actor, Action::ViewPendingRequests).is_allowed() {
        Some(
            memberships
                .iter()
                .filter(|m| m.status == MembershipStatus::Pending)
                .cloned()
                .collect::<Vec<_>>(),
        )
    } else {
        None
    };

    // The caller's own standing, surfaced whatever their access level
    let own_membership = memberships.iter().find(|m| m.user_id == user_id).cloned();

    Ok(HttpResponse::Ok().json(json!({
        "team": team,
        "is_owner": team.is_owned_by(&user_id),
        "is_member": actor.is_accepted_member(),
        "membership": own_membership,
        "members": members,
        "pending_requests": pending_requests,
    })))
}

// Delete a team: owner or admin. Cascades to memberships, file metadata,
// chat, milestones and availability.
#[delete("/teams/{team_id}")]
async fn delete_team(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("🗑️ Deleting team: {}", team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::DeleteTeam) {
        error!("❌ User: {} denied deletion of team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    // Team exclusively owns its child collections
    team_storage::delete_team_memberships(&team_id)?;
    file_storage::delete_team_files(&team_id)?;
    object_store::delete_team_objects(&team_id)?;
    chat_storage::delete_team_messages(&team_id)?;
    milestone_storage::delete_team_milestones(&team_id)?;
    availability_storage::delete_team_availability(&team_id)?;
    team_storage::delete_team(&team_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Team '{}' has been deleted.", team.name),
        "team_id": team_id
    })))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team)
        .service(list_teams)
        .service(public_teams)
        .service(get_team)
        .service(delete_team);
}
