// pma-service/src/policy/mod.rs
//
// The single authorization decision point. Every handler resolves the
// actor's platform role and relationship to the team, then asks `decide`
// before reading anything privacy-sensitive or mutating anything. A Deny
// is normal control flow carrying the message shown to the user.

use crate::models::{MembershipStatus, Role};

// The acting user as the policy sees them: platform role plus their
// relationship to the team in question.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub role: Role,
    pub is_owner: bool,
    pub membership: Option<MembershipStatus>,
}

impl Actor {
    pub fn new(role: Role, is_owner: bool, membership: Option<MembershipStatus>) -> Self {
        Self {
            role,
            is_owner,
            membership,
        }
    }

    // The owner is a full member without ever holding a membership row
    pub fn is_accepted_member(&self) -> bool {
        self.is_owner || self.membership == Some(MembershipStatus::Accepted)
    }

    fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

// Everything the policy can be asked about. Relationship facts that are
// per-entity rather than per-team (creator of a milestone, uploader of a
// file) ride along on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateTeam,
    ViewTeamDetail,
    ViewPendingRequests,
    JoinTeam,
    LeaveTeam,
    // Accepting or rejecting a pending membership request
    DecideMembership,
    UploadFile,
    ViewFiles,
    DeleteFile { is_uploader: bool },
    DeleteTeam,
    // Admin-only forced deletion of team content
    ModerateTeam,
    PostChatMessage,
    AddMilestone,
    EditMilestone { is_creator: bool },
    DeleteMilestone { is_creator: bool },
    MarkMilestoneComplete { is_creator: bool },
    AddAvailability,
    DeleteAvailability { is_entry_owner: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    fn deny(reason: &str) -> Self {
        Decision::Deny(reason.to_string())
    }
}

// The policy table. Deny reasons are the user-facing messages.
pub fn decide(actor: &Actor, action: Action) -> Decision {
    match action {
        Action::CreateTeam => {
            // Common users only; administrators moderate, they do not own
            if actor.role.is_common() {
                Decision::Allow
            } else {
                Decision::deny("You do not have permission to create a team.")
            }
        }

        Action::ViewTeamDetail => {
            if actor.is_owner || actor.is_admin() || actor.is_accepted_member() {
                Decision::Allow
            } else {
                Decision::deny("You are not a member of this team.")
            }
        }

        Action::ViewPendingRequests => {
            if actor.is_owner || actor.is_admin() {
                Decision::Allow
            } else {
                Decision::deny("You do not have permission to view pending requests.")
            }
        }

        Action::JoinTeam => {
            if actor.is_owner {
                Decision::deny("You are the owner of this team.")
            } else {
                Decision::Allow
            }
        }

        Action::LeaveTeam => {
            if actor.is_owner {
                Decision::deny("Team owners cannot leave their own team.")
            } else if actor.membership == Some(MembershipStatus::Accepted) {
                Decision::Allow
            } else {
                Decision::deny("You are not an accepted member of this team.")
            }
        }

        Action::DecideMembership => {
            // Owner only; not admins, not other members
            if actor.is_owner {
                Decision::Allow
            } else {
                Decision::deny("You do not have permission to decide membership requests.")
            }
        }

        Action::UploadFile => {
            if actor.is_accepted_member() {
                Decision::Allow
            } else {
                Decision::deny("You are not an accepted member of this team.")
            }
        }

        Action::ViewFiles => {
            if actor.is_accepted_member() || actor.is_admin() {
                Decision::Allow
            } else {
                Decision::deny("You do not have permission to access this file.")
            }
        }

        Action::DeleteFile { is_uploader } => {
            if is_uploader || actor.is_admin() {
                Decision::Allow
            } else {
                Decision::deny("You do not have permission to delete this file.")
            }
        }

        Action::DeleteTeam => {
            if actor.is_owner || actor.is_admin() {
                Decision::Allow
            } else {
                Decision::deny("You do not have permission to delete this team.")
            }
        }

        Action::ModerateTeam => {
            if actor.is_admin() {
                Decision::Allow
            } else {
                Decision::deny("You do not have permission to moderate this team.")
            }
        }

        Action::PostChatMessage => {
            // Administrators are explicitly barred from authoring messages
            if actor.is_admin() {
                Decision::deny("PMA Administrators are not allowed to post messages")
            } else if actor.is_accepted_member() {
                Decision::Allow
            } else {
                Decision::deny("You are not an accepted member of this team.")
            }
        }

        Action::AddMilestone => {
            if actor.is_admin() {
                Decision::deny("PMA Admins are not allowed to add milestones.")
            } else if actor.is_accepted_member() {
                Decision::Allow
            } else {
                Decision::deny("You must be a team member to add milestones.")
            }
        }

        Action::EditMilestone { is_creator } => {
            if actor.is_admin() {
                Decision::deny("PMA Administrators cannot edit milestones.")
            } else if actor.is_owner || is_creator {
                Decision::Allow
            } else {
                Decision::deny(
                    "You must be the team owner or milestone creator to edit this milestone.",
                )
            }
        }

        Action::DeleteMilestone { is_creator } => {
            if actor.is_admin() {
                Decision::deny("PMA Administrators cannot delete milestones.")
            } else if actor.is_owner || is_creator {
                Decision::Allow
            } else {
                Decision::deny(
                    "You must be the team owner or milestone creator to delete this milestone.",
                )
            }
        }

        Action::MarkMilestoneComplete { is_creator } => {
            if actor.is_owner || is_creator {
                Decision::Allow
            } else {
                Decision::deny(
                    "You must be the team owner or milestone creator to mark this milestone as complete.",
                )
            }
        }

        Action::AddAvailability => {
            if actor.is_admin() {
                Decision::deny("You do not have permission to add availability.")
            } else if actor.is_accepted_member() {
                Decision::Allow
            } else {
                Decision::deny("You must be a team member to add availability.")
            }
        }

        Action::DeleteAvailability { is_entry_owner } => {
            if is_entry_owner || actor.is_owner {
                Decision::Allow
            } else {
                Decision::deny("You do not have permission to delete this availability.")
            }
        }
    }
}
