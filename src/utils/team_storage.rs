// pma-service/src/utils/team_storage.rs
use crate::models::{JoinOutcome, Membership, MembershipStatus, ServiceError, Team};
use lazy_static::lazy_static;
use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

const TEAMS_DIR: &str = "./storage/teams";
const MEMBERSHIPS_DIR: &str = "./storage/memberships";

lazy_static! {
    // Guards the join get-or-create so concurrent first-time requests from
    // the same user cannot create duplicate membership rows
    static ref MEMBERSHIP_LOCK: Mutex<()> = Mutex::new(());
}

fn ensure_dir(dir: &str) -> Result<(), ServiceError> {
    let path = Path::new(dir);
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            error!("Failed to create directory {}: {:?}", dir, e);
            ServiceError::InternalServerError
        })?;
    }
    Ok(())
}

// ---- Teams ----

pub fn save_team(team: &Team) -> Result<(), ServiceError> {
    ensure_dir(TEAMS_DIR)?;

    let team_path = format!("{}/{}.json", TEAMS_DIR, team.id);
    let team_json = serde_json::to_string_pretty(team).map_err(|e| {
        error!("Failed to serialize team: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&team_path, team_json).map_err(|e| {
        error!("Failed to save team: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

pub fn find_team_by_id(team_id: &str) -> Result<Option<Team>, ServiceError> {
    let team_path = format!("{}/{}.json", TEAMS_DIR, team_id);
    let path = Path::new(&team_path);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read team file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let team: Team = serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse team JSON: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(team))
}

pub fn list_teams() -> Result<Vec<Team>, ServiceError> {
    ensure_dir(TEAMS_DIR)?;
    let mut teams = Vec::new();

    for entry_result in fs::read_dir(TEAMS_DIR).map_err(|e| {
        error!("Failed to read teams directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|_| ServiceError::InternalServerError)?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|_| ServiceError::InternalServerError)?;
            match serde_json::from_str::<Team>(&content) {
                Ok(team) => teams.push(team),
                Err(e) => {
                    warn!("Failed to parse team JSON: {:?}", e);
                    continue;
                }
            }
        }
    }

    // Stable listing order, newest last
    teams.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(teams)
}

pub fn delete_team(team_id: &str) -> Result<bool, ServiceError> {
    let team_path = format!("{}/{}.json", TEAMS_DIR, team_id);
    let path = Path::new(&team_path);

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path).map_err(|e| {
        error!("Failed to delete team file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    info!("✅ Deleted team: {}", team_id);
    Ok(true)
}

// ---- Memberships ----

fn read_membership_file(path: &Path) -> Option<Membership> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read membership file: {:?}", e);
            return None;
        }
    };

    match serde_json::from_str::<Membership>(&content) {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("Failed to parse membership JSON: {:?}", e);
            None
        }
    }
}

fn scan_memberships<F>(mut keep: F) -> Result<Vec<Membership>, ServiceError>
where
    F: FnMut(&Membership) -> bool,
{
    ensure_dir(MEMBERSHIPS_DIR)?;
    let mut memberships = Vec::new();

    for entry_result in fs::read_dir(MEMBERSHIPS_DIR).map_err(|e| {
        error!("Failed to read memberships directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|_| ServiceError::InternalServerError)?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            if let Some(membership) = read_membership_file(&path) {
                if keep(&membership) {
                    memberships.push(membership);
                }
            }
        }
    }

    memberships.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
    Ok(memberships)
}

pub fn save_membership(membership: &Membership) -> Result<(), ServiceError> {
    ensure_dir(MEMBERSHIPS_DIR)?;

    let membership_path = format!("{}/{}.json", MEMBERSHIPS_DIR, membership.id);
    let membership_json = serde_json::to_string_pretty(membership).map_err(|e| {
        error!("Failed to serialize membership: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&membership_path, membership_json).map_err(|e| {
        error!("Failed to save membership: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

pub fn find_membership_by_id(membership_id: &str) -> Result<Option<Membership>, ServiceError> {
    let membership_path = format!("{}/{}.json", MEMBERSHIPS_DIR, membership_id);
    let path = Path::new(&membership_path);

    if !path.exists() {
        return Ok(None);
    }

    Ok(read_membership_file(path))
}

// At most one row exists per (user, team) pair
pub fn find_membership(user_id: &str, team_id: &str) -> Result<Option<Membership>, ServiceError> {
    let matches = scan_memberships(|m| m.user_id == user_id && m.team_id == team_id)?;
    Ok(matches.into_iter().next())
}

pub fn memberships_for_team(team_id: &str) -> Result<Vec<Membership>, ServiceError> {
    scan_memberships(|m| m.team_id == team_id)
}

pub fn memberships_for_user(user_id: &str) -> Result<Vec<Membership>, ServiceError> {
    scan_memberships(|m| m.user_id == user_id)
}

pub fn delete_membership(membership_id: &str) -> Result<bool, ServiceError> {
    let membership_path = format!("{}/{}.json", MEMBERSHIPS_DIR, membership_id);
    let path = Path::new(&membership_path);

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path).map_err(|e| {
        error!("Failed to delete membership file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(true)
}

pub fn delete_team_memberships(team_id: &str) -> Result<usize, ServiceError> {
    let memberships = memberships_for_team(team_id)?;
    let mut deleted = 0;

    for membership in memberships {
        if delete_membership(&membership.id)? {
            deleted += 1;
        }
    }

    info!("✅ Deleted {} memberships for team: {}", deleted, team_id);
    Ok(deleted)
}

// The join state machine: a single atomic get-or-create. A missing row
// becomes a fresh pending request; an existing row is reused untouched and
// reported back, whatever its status. Owners are handled by the policy
// before this is ever called.
pub fn request_join(user_id: &str, team: &Team) -> Result<(JoinOutcome, Membership), ServiceError> {
    let _guard = MEMBERSHIP_LOCK
        .lock()
        .map_err(|_| ServiceError::InternalServerError)?;

    if let Some(existing) = find_membership(user_id, &team.id)? {
        let outcome = match existing.status {
            MembershipStatus::Accepted => JoinOutcome::AlreadyMember,
            MembershipStatus::Pending => JoinOutcome::AlreadyPending,
            MembershipStatus::Rejected => JoinOutcome::Rejected,
        };
        return Ok((outcome, existing));
    }

    let membership = Membership::new(user_id.to_string(), team.id.clone());
    save_membership(&membership)?;

    info!(
        "✅ User {} requested to join team {}",
        user_id, team.id
    );
    Ok((JoinOutcome::Requested, membership))
}

// Owner decision on a pending request. Only pending rows transition; a row
// in any other status is treated as absent, like the original lookup.
pub fn decide_membership(
    membership_id: &str,
    team_id: &str,
    accept: bool,
) -> Result<Membership, ServiceError> {
    let _guard = MEMBERSHIP_LOCK
        .lock()
        .map_err(|_| ServiceError::InternalServerError)?;

    let mut membership = match find_membership_by_id(membership_id)? {
        Some(m) if m.team_id == team_id && m.status == MembershipStatus::Pending => m,
        _ => return Err(ServiceError::NotFound),
    };

    membership.status = if accept {
        MembershipStatus::Accepted
    } else {
        MembershipStatus::Rejected
    };
    save_membership(&membership)?;

    Ok(membership)
}

// Self-service leave: deletes the accepted row so a later join produces a
// fresh pending request
pub fn leave_team(user_id: &str, team_id: &str) -> Result<(), ServiceError> {
    let _guard = MEMBERSHIP_LOCK
        .lock()
        .map_err(|_| ServiceError::InternalServerError)?;

    let membership = match find_membership(user_id, team_id)? {
        Some(m) if m.status == MembershipStatus::Accepted => m,
        _ => return Err(ServiceError::NotFound),
    };

    delete_membership(&membership.id)?;
    info!("✅ User {} left team {}", user_id, team_id);
    Ok(())
}
