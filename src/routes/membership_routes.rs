// pma-service/src/routes/membership_routes.rs
use crate::models::{JoinOutcome, MembershipStatus, ServiceError};
use crate::policy::{decide, Action, Decision};
use crate::utils::{get_user_id_from_request, resolve_actor, team_storage, user_storage};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Request to join a team. One atomic get-or-create: a missing row becomes a
// fresh pending request; any existing row is reused and reported back as an
// informational no-op.
#[post("/teams/{team_id}/join")]
async fn join_team(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("👥 Join request for team: {} from user: {}", team_id, user_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(_) = decide(&actor, Action::JoinTeam) {
        // The owner "joining" their own team is informational, not an error
        let outcome = JoinOutcome::Owner;
        return Ok(HttpResponse::Ok().json(json!({
            "message": outcome.message(&team.name),
            "status": "owner",
            "changed": outcome.changed_state()
        })));
    }

    let (outcome, membership) = team_storage::request_join(&user_id, &team)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": outcome.message(&team.name),
        "status": membership.status,
        "changed": outcome.changed_state(),
        "membership_id": membership.id
    })))
}

// Owner accepts a pending request
#[post("/teams/{team_id}/requests/{membership_id}/accept")]
async fn accept_request(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    respond_to_request(req, path, true).await
}

// Owner rejects a pending request; rejection is terminal
#[post("/teams/{team_id}/requests/{membership_id}/reject")]
async fn reject_request(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    respond_to_request(req, path, false).await
}

async fn respond_to_request(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    accept: bool,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (team_id, membership_id) = path.into_inner();

    info!(
        "🔄 {} membership request: {} in team: {}",
        if accept { "Accepting" } else { "Rejecting" },
        membership_id,
        team_id
    );

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    // Owner only: not admins, not other members
    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::DecideMembership) {
        error!("❌ User: {} denied membership decision in team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    let membership = team_storage::decide_membership(&membership_id, &team_id, accept)?;

    let member_name = user_storage::find_user_by_id(&membership.user_id)?
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| membership.user_id.clone());

    let message = if accept {
        format!("{} has been added to the team.", member_name)
    } else {
        format!("{}'s request has been rejected.", member_name)
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": message,
        "membership": membership
    })))
}

// Leave a team: self-service only, forbidden to the owner. Deletes the row
// so a later join starts over as pending.
#[post("/teams/{team_id}/leave")]
async fn leave_team(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("🚪 User: {} leaving team: {}", user_id, team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::LeaveTeam) {
        error!("❌ User: {} denied leaving team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    team_storage::leave_team(&user_id, &team_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("You have left the team '{}'.", team.name)
    })))
}

// Accepted member list; same visibility tier as team detail
#[get("/teams/{team_id}/members")]
async fn get_team_members(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📋 Fetching members for team: {}", team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::ViewTeamDetail) {
        error!("❌ User: {} denied member list of team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    let members: Vec<_> = team_storage::memberships_for_team(&team_id)?
        .into_iter()
        .filter(|m| m.status == MembershipStatus::Accepted)
        .collect();

    info!("✅ Found {} team members", members.len());

    Ok(HttpResponse::Ok().json(members))
}

// Register all membership routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(join_team)
        .service(accept_request)
        .service(reject_request)
        .service(leave_team)
        .service(get_team_members);
}
