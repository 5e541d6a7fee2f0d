// pma-service/src/routes/availability_routes.rs
use crate::models::{AvailabilityData, ServiceError};
use crate::policy::{decide, Action, Decision};
use crate::utils::{
    availability_storage, get_user_id_from_request, resolve_actor, team_storage, user_storage,
};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Calendar feed for a team: availability slots as event objects with
// combined ISO date-times
#[get("/teams/{team_id}/calendar")]
async fn get_calendar(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📅 Fetching calendar for team: {}", team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::ViewTeamDetail) {
        error!("❌ User: {} denied calendar of team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    let slots = availability_storage::availability_for_team(&team_id)?;

    let mut events = Vec::with_capacity(slots.len());
    for slot in &slots {
        let owner = user_storage::find_user_by_id(&slot.user_id)?
            .map(|u| u.display_name().to_string())
            .unwrap_or_else(|| slot.user_id.clone());

        events.push(json!({
            "id": slot.id,
            "title": format!("{}'s Availability", owner),
            "start": slot.starts_at().format("%Y-%m-%dT%H:%M:%S").to_string(),
            "end": slot.ends_at().format("%Y-%m-%dT%H:%M:%S").to_string(),
            "owner": owner,
        }));
    }

    Ok(HttpResponse::Ok().json(events))
}

// Add an availability slot: members and the owner; admins denied. A
// duplicate tuple is an informational no-op.
#[post("/teams/{team_id}/availability")]
async fn add_availability(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<AvailabilityData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📅 Adding availability for user: {} in team: {}", user_id, team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::AddAvailability) {
        error!("❌ User: {} denied adding availability to team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    data.validate().map_err(ServiceError::Validation)?;

    match availability_storage::add_availability(&user_id, &team_id, &data)? {
        Some(availability) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "availability": availability
        }))),
        None => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "This availability slot already exists.",
            "changed": false
        }))),
    }
}

// Delete a slot: its owner or the team owner
#[delete("/teams/{team_id}/availability/{availability_id}")]
async fn delete_availability(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (team_id, availability_id) = path.into_inner();

    info!("🗑️ Deleting availability: {} in team: {}", availability_id, team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let availability = match availability_storage::find_availability_by_id(&availability_id)? {
        Some(a) if a.team_id == team_id => a,
        _ => {
            error!("❌ Availability not found in team: {}", availability_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    let is_entry_owner = availability.user_id == user_id;
    if let Decision::Deny(reason) = decide(&actor, Action::DeleteAvailability { is_entry_owner }) {
        error!("❌ User: {} denied deleting availability: {}", user_id, availability_id);
        return Err(ServiceError::Denied(reason));
    }

    availability_storage::delete_availability(&availability_id)?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// Register all availability routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_calendar)
        .service(add_availability)
        .service(delete_availability);
}
