use crate::models::{MembershipStatus, Role};
use crate::policy::{decide, Action, Actor, Decision};

fn common_owner() -> Actor {
    Actor::new(Role::Common, true, None)
}

fn accepted_member() -> Actor {
    Actor::new(Role::Common, false, Some(MembershipStatus::Accepted))
}

fn pending_member() -> Actor {
    Actor::new(Role::Common, false, Some(MembershipStatus::Pending))
}

fn outsider() -> Actor {
    Actor::new(Role::Common, false, None)
}

fn admin() -> Actor {
    Actor::new(Role::Admin, false, None)
}

#[test]
fn only_common_users_create_teams() {
    assert!(decide(&outsider(), Action::CreateTeam).is_allowed());
    assert!(!decide(&admin(), Action::CreateTeam).is_allowed());
    assert!(!decide(&Actor::new(Role::Anonymous, false, None), Action::CreateTeam).is_allowed());
}

#[test]
fn owner_is_full_member_without_a_row() {
    let owner = common_owner();
    assert!(owner.is_accepted_member());
    assert!(decide(&owner, Action::ViewTeamDetail).is_allowed());
    assert!(decide(&owner, Action::UploadFile).is_allowed());
    assert!(decide(&owner, Action::PostChatMessage).is_allowed());
    assert!(decide(&owner, Action::ViewPendingRequests).is_allowed());
}

#[test]
fn pending_member_has_no_member_access() {
    let actor = pending_member();
    assert!(!decide(&actor, Action::ViewTeamDetail).is_allowed());
    assert!(!decide(&actor, Action::UploadFile).is_allowed());
    assert!(!decide(&actor, Action::PostChatMessage).is_allowed());
}

#[test]
fn pending_list_is_owner_or_admin_only() {
    assert!(decide(&common_owner(), Action::ViewPendingRequests).is_allowed());
    assert!(decide(&admin(), Action::ViewPendingRequests).is_allowed());
    assert!(!decide(&accepted_member(), Action::ViewPendingRequests).is_allowed());
}

#[test]
fn owner_cannot_join_or_leave_own_team() {
    match decide(&common_owner(), Action::JoinTeam) {
        Decision::Deny(reason) => assert_eq!(reason, "You are the owner of this team."),
        Decision::Allow => panic!("owner join must be denied"),
    }

    match decide(&common_owner(), Action::LeaveTeam) {
        Decision::Deny(reason) => assert_eq!(reason, "Team owners cannot leave their own team."),
        Decision::Allow => panic!("owner leave must be denied"),
    }
}

#[test]
fn leaving_requires_an_accepted_row() {
    assert!(decide(&accepted_member(), Action::LeaveTeam).is_allowed());
    assert!(!decide(&pending_member(), Action::LeaveTeam).is_allowed());
    assert!(!decide(&outsider(), Action::LeaveTeam).is_allowed());
}

#[test]
fn membership_decisions_are_owner_only() {
    assert!(decide(&common_owner(), Action::DecideMembership).is_allowed());
    assert!(!decide(&admin(), Action::DecideMembership).is_allowed());
    assert!(!decide(&accepted_member(), Action::DecideMembership).is_allowed());
}

#[test]
fn admin_moderates_but_never_authors() {
    let admin = admin();

    // Moderation powers
    assert!(decide(&admin, Action::ViewTeamDetail).is_allowed());
    assert!(decide(&admin, Action::ViewFiles).is_allowed());
    assert!(decide(&admin, Action::DeleteTeam).is_allowed());
    assert!(decide(&admin, Action::ModerateTeam).is_allowed());
    assert!(decide(&admin, Action::DeleteFile { is_uploader: false }).is_allowed());

    // Authoring actions are explicitly barred, whatever the relationship
    assert!(!decide(&admin, Action::PostChatMessage).is_allowed());
    assert!(!decide(&admin, Action::AddMilestone).is_allowed());
    assert!(!decide(&admin, Action::EditMilestone { is_creator: true }).is_allowed());
    assert!(!decide(&admin, Action::DeleteMilestone { is_creator: true }).is_allowed());
    assert!(!decide(&admin, Action::AddAvailability).is_allowed());

    let admin_member = Actor::new(Role::Admin, false, Some(MembershipStatus::Accepted));
    assert!(!decide(&admin_member, Action::PostChatMessage).is_allowed());
    assert!(!decide(&admin_member, Action::AddMilestone).is_allowed());
    assert!(!decide(&admin_member, Action::AddAvailability).is_allowed());
}

#[test]
fn file_deletion_favors_uploader_and_admin() {
    assert!(decide(&outsider(), Action::DeleteFile { is_uploader: true }).is_allowed());
    assert!(decide(&admin(), Action::DeleteFile { is_uploader: false }).is_allowed());
    assert!(!decide(&accepted_member(), Action::DeleteFile { is_uploader: false }).is_allowed());
}

#[test]
fn team_deletion_is_owner_or_admin() {
    assert!(decide(&common_owner(), Action::DeleteTeam).is_allowed());
    assert!(decide(&admin(), Action::DeleteTeam).is_allowed());
    assert!(!decide(&accepted_member(), Action::DeleteTeam).is_allowed());
}

#[test]
fn moderation_is_admin_only() {
    assert!(decide(&admin(), Action::ModerateTeam).is_allowed());
    assert!(!decide(&common_owner(), Action::ModerateTeam).is_allowed());
    assert!(!decide(&accepted_member(), Action::ModerateTeam).is_allowed());
}

#[test]
fn milestone_edits_need_creator_or_owner() {
    assert!(decide(&common_owner(), Action::EditMilestone { is_creator: false }).is_allowed());
    assert!(decide(&accepted_member(), Action::EditMilestone { is_creator: true }).is_allowed());
    assert!(!decide(&accepted_member(), Action::EditMilestone { is_creator: false }).is_allowed());

    assert!(decide(&common_owner(), Action::MarkMilestoneComplete { is_creator: false }).is_allowed());
    assert!(decide(&accepted_member(), Action::MarkMilestoneComplete { is_creator: true }).is_allowed());
    assert!(
        !decide(&accepted_member(), Action::MarkMilestoneComplete { is_creator: false }).is_allowed()
    );
}

#[test]
fn availability_deletion_needs_entry_owner_or_team_owner() {
    assert!(decide(&accepted_member(), Action::DeleteAvailability { is_entry_owner: true }).is_allowed());
    assert!(decide(&common_owner(), Action::DeleteAvailability { is_entry_owner: false }).is_allowed());
    assert!(
        !decide(&accepted_member(), Action::DeleteAvailability { is_entry_owner: false }).is_allowed()
    );
}

#[test]
fn every_deny_carries_a_reason() {
    let denials = [
        decide(&admin(), Action::CreateTeam),
        decide(&outsider(), Action::ViewTeamDetail),
        decide(&common_owner(), Action::JoinTeam),
        decide(&admin(), Action::PostChatMessage),
        decide(&admin(), Action::AddMilestone),
        decide(&admin(), Action::AddAvailability),
    ];

    for decision in denials {
        match decision {
            Decision::Deny(reason) => assert!(!reason.is_empty()),
            Decision::Allow => panic!("expected a denial"),
        }
    }
}
