use axum::extract::{Path, State};
use sitedesk_core::extractors::{CurrentSession, ValidatedJson};
use sitedesk_core::state::AppState;
use sitedesk_core::store::{MemberOps, MemoryStore, UserOps};
use sitedesk_core::types::{CreateMember, Member, Role};

use crate::modules::test_helpers::{seed_session, test_state};

use super::handlers;
use super::types::ChangeRoleRequest;

async fn seed_member(
    state: &AppState<MemoryStore>,
    business_id: &str,
    email: &str,
    role: Role,
) -> (CurrentSession, Member) {
    let current = seed_session(state, email).await;
    let member = state
        .store
        .create_member(CreateMember::new(
            business_id,
            current.user.id.clone(),
            email,
            role,
        ))
        .await
        .unwrap();
    state
        .store
        .set_user_role(&current.user.id, role)
        .await
        .unwrap();
    (current, member)
}

#[tokio::test]
async fn test_list_members_scoped_to_tenant() {
    let state = test_state();
    let owner = seed_session(&state, "owner@x.com").await;
    let other_owner = seed_session(&state, "other@x.com").await;
    seed_member(&state, &owner.user.id, "bob@x.com", Role::User).await;
    seed_member(&state, &other_owner.user.id, "carol@x.com", Role::User).await;

    let listed = handlers::list_members(State(state.clone()), owner)
        .await
        .unwrap();
    assert_eq!(listed.members.len(), 1);
    assert_eq!(listed.members[0].email, "bob@x.com");

    // A member sees their own team, not a tenant of their own.
    let (bob, _) = {
        let bob = state
            .store
            .get_user_by_email("bob@x.com")
            .await
            .unwrap()
            .unwrap();
        let session = state.sessions.create_session(&bob.id).await.unwrap();
        (CurrentSession { session, user: bob }, ())
    };
    let listed = handlers::list_members(State(state), bob).await.unwrap();
    assert_eq!(listed.members.len(), 1);
}

#[tokio::test]
async fn test_owner_changes_role_and_resyncs_claim() {
    let state = test_state();
    let owner = seed_session(&state, "owner@x.com").await;
    let (bob, member) = seed_member(&state, &owner.user.id, "bob@x.com", Role::User).await;

    let updated = handlers::change_member_role(
        State(state.clone()),
        owner,
        Path(member.id.clone()),
        ValidatedJson(ChangeRoleRequest { role: Role::Manager }),
    )
    .await
    .unwrap();
    assert_eq!(updated.role, Role::Manager);

    let user = state
        .store
        .get_user_by_id(&bob.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, Some(Role::Manager));
}

#[tokio::test]
async fn test_plain_member_cannot_manage_team() {
    let state = test_state();
    let owner = seed_session(&state, "owner@x.com").await;
    let (bob, _) = seed_member(&state, &owner.user.id, "bob@x.com", Role::Manager).await;
    let (_, carol_member) = seed_member(&state, &owner.user.id, "carol@x.com", Role::User).await;

    // Manager is not enough; team management is admin/owner only.
    let err = handlers::change_member_role(
        State(state.clone()),
        bob.clone(),
        Path(carol_member.id.clone()),
        ValidatedJson(ChangeRoleRequest { role: Role::Admin }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), "forbidden");

    let err = handlers::remove_member(State(state), bob, Path(carol_member.id))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "forbidden");
}

#[tokio::test]
async fn test_admin_member_can_remove() {
    let state = test_state();
    let owner = seed_session(&state, "owner@x.com").await;
    let (admin, _) = seed_member(&state, &owner.user.id, "admin@x.com", Role::Admin).await;
    let (_, bob_member) = seed_member(&state, &owner.user.id, "bob@x.com", Role::User).await;

    handlers::remove_member(State(state.clone()), admin, Path(bob_member.id.clone()))
        .await
        .unwrap();
    assert!(state
        .store
        .get_member_by_id(&bob_member.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_cross_tenant_member_reads_as_unknown() {
    let state = test_state();
    let owner = seed_session(&state, "owner@x.com").await;
    let other_owner = seed_session(&state, "other@x.com").await;
    let (_, foreign_member) =
        seed_member(&state, &other_owner.user.id, "carol@x.com", Role::User).await;

    let err = handlers::remove_member(State(state), owner, Path(foreign_member.id))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "not_found");
}
