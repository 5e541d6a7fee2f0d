// pma-service/src/routes/milestone_routes.rs
use crate::models::{Milestone, MilestoneData, ServiceError};
use crate::policy::{decide, Action, Decision};
use crate::utils::{get_user_id_from_request, milestone_storage, resolve_actor, team_storage};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// The team roadmap: milestones ordered by end date
#[get("/teams/{team_id}/roadmap")]
async fn team_roadmap(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("🗺️ Fetching roadmap for team: {}", team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::ViewTeamDetail) {
        error!("❌ User: {} denied roadmap of team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    let milestones = milestone_storage::milestones_for_team(&team_id)?;

    Ok(HttpResponse::Ok().json(milestones))
}

// Add a milestone: team members and the owner; admins denied
#[post("/teams/{team_id}/milestones")]
async fn add_milestone(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<MilestoneData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📌 Adding milestone '{}' to team: {}", data.title, team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::AddMilestone) {
        error!("❌ User: {} denied adding milestone to team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    let milestone = Milestone::new(Some(team_id.clone()), user_id, &data)
        .map_err(ServiceError::Validation)?;
    milestone_storage::save_milestone(&milestone)?;

    info!("✅ Milestone added: {}", milestone.id);

    Ok(HttpResponse::Ok().json(milestone))
}

// Edit a milestone: its creator or the team owner; admins denied
#[put("/teams/{team_id}/milestones/{milestone_id}")]
async fn edit_milestone(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    data: web::Json<MilestoneData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (team_id, milestone_id) = path.into_inner();

    info!("✏️ Editing milestone: {} in team: {}", milestone_id, team_id);

    let (team, mut milestone) = load_team_milestone(&team_id, &milestone_id)?;

    let actor = resolve_actor(&user_id, &team)?;
    let is_creator = milestone.user_id == user_id;
    if let Decision::Deny(reason) = decide(&actor, Action::EditMilestone { is_creator }) {
        error!("❌ User: {} denied editing milestone: {}", user_id, milestone_id);
        return Err(ServiceError::Denied(reason));
    }

    milestone.update(&data).map_err(ServiceError::Validation)?;
    milestone_storage::save_milestone(&milestone)?;

    Ok(HttpResponse::Ok().json(milestone))
}

// Delete a milestone: its creator or the team owner; admins denied
#[delete("/teams/{team_id}/milestones/{milestone_id}")]
async fn delete_milestone(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (team_id, milestone_id) = path.into_inner();

    info!("🗑️ Deleting milestone: {} in team: {}", milestone_id, team_id);

    let (team, milestone) = load_team_milestone(&team_id, &milestone_id)?;

    let actor = resolve_actor(&user_id, &team)?;
    let is_creator = milestone.user_id == user_id;
    if let Decision::Deny(reason) = decide(&actor, Action::DeleteMilestone { is_creator }) {
        error!("❌ User: {} denied deleting milestone: {}", user_id, milestone_id);
        return Err(ServiceError::Denied(reason));
    }

    milestone_storage::delete_milestone(&milestone_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Milestone deleted successfully."
    })))
}

// Mark complete: sugar for progress=100, allowed to the creator or the team
// owner only
#[post("/teams/{team_id}/milestones/{milestone_id}/complete")]
async fn mark_milestone_complete(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (team_id, milestone_id) = path.into_inner();

    info!("✔️ Marking milestone complete: {} in team: {}", milestone_id, team_id);

    let (team, mut milestone) = load_team_milestone(&team_id, &milestone_id)?;

    let actor = resolve_actor(&user_id, &team)?;
    let is_creator = milestone.user_id == user_id;
    if let Decision::Deny(reason) = decide(&actor, Action::MarkMilestoneComplete { is_creator }) {
        error!("❌ User: {} denied completing milestone: {}", user_id, milestone_id);
        return Err(ServiceError::Denied(reason));
    }

    milestone.mark_complete();
    milestone_storage::save_milestone(&milestone)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Milestone marked as complete.",
        "milestone": milestone
    })))
}

// A milestone is only visible through its own team's routes
fn load_team_milestone(
    team_id: &str,
    milestone_id: &str,
) -> Result<(crate::models::Team, Milestone), ServiceError> {
    let team = match team_storage::find_team_by_id(team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let milestone = match milestone_storage::find_milestone_by_id(milestone_id)? {
        Some(m) if m.team_id.as_deref() == Some(team_id) => m,
        _ => {
            error!("❌ Milestone not found in team: {}", milestone_id);
            return Err(ServiceError::NotFound);
        }
    };

    Ok((team, milestone))
}

// Register all milestone routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(team_roadmap)
        .service(add_milestone)
        .service(edit_milestone)
        .service(delete_milestone)
        .service(mark_milestone_complete);
}
