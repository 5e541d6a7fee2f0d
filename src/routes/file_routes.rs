// pma-service/src/routes/file_routes.rs
use crate::models::{FileUploadRequest, ServiceError, TeamFile};
use crate::policy::{decide, Action, Decision};
use crate::utils::{
    file_storage, get_user_id_from_request, object_store, resolve_actor, team_storage,
};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct FileQuery {
    q: Option<String>,
}

// Upload a file to a team. Bytes go to the object store first; the metadata
// row is committed only once that succeeds, so a failed upload leaves no
// record behind.
#[post("/teams/{team_id}/files")]
async fn upload_team_file(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<FileUploadRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📤 Uploading file '{}' to team: {}", data.title, team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::UploadFile) {
        error!("❌ User: {} denied upload to team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    if data.title.trim().is_empty() {
        return Err(ServiceError::Validation(vec![crate::models::FieldError::new(
            "title",
            "Title cannot be empty.",
        )]));
    }

    let team_file = TeamFile::new(&data, user_id.clone(), team_id.clone());

    // External store first; metadata only on success
    object_store::put(
        &team_file.storage_key,
        data.file_content.as_bytes(),
        &team_file.content_type,
    )?;

    file_storage::save_file(&team_file)?;

    info!("✅ File uploaded: {} to team: {}", team_file.id, team_id);

    Ok(HttpResponse::Ok().json(team_file))
}

// List a team's files, optionally filtered by keyword substring (?q=)
#[get("/teams/{team_id}/files")]
async fn list_team_files(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<FileQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📋 Fetching files for team: {}", team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::ViewFiles) {
        error!("❌ User: {} denied file listing of team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    let files = file_storage::files_for_team(&team_id, query.q.as_deref())?;

    info!("✅ Found {} files", files.len());

    Ok(HttpResponse::Ok().json(files))
}

// Serve stored bytes for a file. Team members and the owner may fetch it;
// platform admins can fetch any file.
#[get("/files/{file_id}")]
async fn serve_file(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let file_id = path.into_inner();

    info!("📥 Serving file: {}", file_id);

    let team_file = match file_storage::find_file_by_id(&file_id)? {
        Some(f) => f,
        None => {
            error!("❌ File not found: {}", file_id);
            return Err(ServiceError::NotFound);
        }
    };

    let team = match team_storage::find_team_by_id(&team_file.team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found for file: {}", file_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::ViewFiles) {
        error!("❌ User: {} denied access to file: {}", user_id, file_id);
        return Err(ServiceError::Denied(reason));
    }

    let bytes = match object_store::get(&team_file.storage_key)? {
        Some(bytes) => bytes,
        None => {
            error!("❌ Stored object missing for file: {}", file_id);
            return Err(ServiceError::NotFound);
        }
    };

    Ok(HttpResponse::Ok()
        .content_type(team_file.content_type.clone())
        .append_header((
            "Content-Disposition",
            format!("inline; filename=\"{}\"", team_file.title),
        ))
        .body(bytes))
}

// Delete a file: the uploader or a platform admin
#[delete("/files/{file_id}")]
async fn delete_file(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let file_id = path.into_inner();

    info!("🗑️ Deleting file: {}", file_id);

    let team_file = match file_storage::find_file_by_id(&file_id)? {
        Some(f) => f,
        None => {
            error!("❌ File not found: {}", file_id);
            return Err(ServiceError::NotFound);
        }
    };

    let team = match team_storage::find_team_by_id(&team_file.team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found for file: {}", file_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    let is_uploader = team_file.uploaded_by == user_id;
    if let Decision::Deny(reason) = decide(&actor, Action::DeleteFile { is_uploader }) {
        error!("❌ User: {} denied deletion of file: {}", user_id, file_id);
        return Err(ServiceError::Denied(reason));
    }

    // Bytes first; the metadata row only goes once the store delete succeeds
    object_store::delete(&team_file.storage_key)?;
    file_storage::delete_file(&file_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("File '{}' has been deleted successfully.", team_file.title)
    })))
}

// Moderation: admin-only forced deletion of a team's file, distinct from
// uploader-initiated deletion
#[delete("/teams/{team_id}/moderate/files/{file_id}")]
async fn moderate_delete_file(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (team_id, file_id) = path.into_inner();

    info!("🛡️ Moderation delete of file: {} in team: {}", file_id, team_id);

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => {
            error!("❌ Team not found: {}", team_id);
            return Err(ServiceError::NotFound);
        }
    };

    let actor = resolve_actor(&user_id, &team)?;
    if let Decision::Deny(reason) = decide(&actor, Action::ModerateTeam) {
        error!("❌ User: {} denied moderation of team: {}", user_id, team_id);
        return Err(ServiceError::Denied(reason));
    }

    // The file must belong to the team being moderated
    let team_file = match file_storage::find_file_by_id(&file_id)? {
        Some(f) if f.team_id == team_id => f,
        _ => {
            error!("❌ File not found in team: {}", file_id);
            return Err(ServiceError::NotFound);
        }
    };

    object_store::delete(&team_file.storage_key)?;
    file_storage::delete_file(&file_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("File '{}' has been deleted by an administrator.", team_file.title)
    })))
}

// Register all file routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_team_file)
        .service(list_team_files)
        .service(serve_file)
        .service(delete_file)
        .service(moderate_delete_file);
}
