//! End-to-end invitation lifecycle over the full router.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use sitedesk_core::store::{InvitationOps, MemberOps, UserOps};
use sitedesk_core::types::{CreateInvitation, Role};

use common::{authed_user, get, post, setup};

fn token_from_link(link: &str) -> &str {
    link.split("/accept-invitation/")
        .nth(1)
        .unwrap()
        .split('?')
        .next()
        .unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = setup();
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "sitedesk");
}

#[tokio::test]
async fn test_issue_requires_session() {
    let (app, _state) = setup();
    let (status, body) = post(
        &app,
        "/invitations",
        None,
        Some(json!({"email": "bob@x.com", "role": "manager"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthenticated");
}

#[tokio::test]
async fn test_bob_manager_scenario() {
    let (app, state) = setup();
    let (owner_id, owner_token) = authed_user(&state, "owner@x.com").await;

    // Owner sets a company name so the invite shows it.
    let (status, _) = common::send(
        &app,
        Method::PUT,
        "/business-profile",
        Some(owner_token.as_str()),
        Some(json!({"companyName": "Acme Construction"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Owner invites bob@x.com as manager.
    let (status, body) = post(
        &app,
        "/invitations",
        Some(owner_token.as_str()),
        Some(json!({
            "email": "bob@x.com",
            "role": "manager",
            "message": "Come run the Richmond site"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["emailSent"], true);
    let link = body["invitationLink"].as_str().unwrap().to_string();
    let token = token_from_link(&link).to_string();
    assert!(link.contains("email=bob%40x.com"));
    assert!(link.contains("role=manager"));

    // Bob verifies the link without being signed in.
    let (status, body) = get(&app, &format!("/invitations/verify/{token}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "bob@x.com");
    assert_eq!(body["role"], "manager");
    assert_eq!(body["companyName"], "Acme Construction");
    assert_eq!(body["invitedBy"], "owner@x.com");
    assert_eq!(body["status"], "pending");

    // Bob signs in and accepts.
    let (bob_id, bob_token) = authed_user(&state, "bob@x.com").await;
    let (status, body) = post(
        &app,
        &format!("/invitations/accept/{token}"),
        Some(bob_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["businessId"], owner_id);
    assert_eq!(body["role"], "manager");

    // Membership and role claim are in place.
    let member = state.store.get_member(&owner_id, &bob_id).await.unwrap().unwrap();
    assert_eq!(member.role, Role::Manager);
    let bob = state.store.get_user_by_id(&bob_id).await.unwrap().unwrap();
    assert_eq!(bob.role, Some(Role::Manager));

    // The owner's member list shows bob.
    let (status, body) = get(&app, "/team/members", Some(owner_token.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"].as_array().unwrap().len(), 1);
    assert_eq!(body["members"][0]["email"], "bob@x.com");
}

#[tokio::test]
async fn test_duplicate_pending_invitation_conflicts() {
    let (app, state) = setup();
    let (_, owner_token) = authed_user(&state, "owner@x.com").await;

    let invite = json!({"email": "bob@x.com", "role": "user"});
    let (status, _) = post(&app, "/invitations", Some(owner_token.as_str()), Some(invite.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/invitations", Some(owner_token.as_str()), Some(invite)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "duplicate");

    // No second write happened.
    let (_, body) = get(&app, "/invitations", Some(owner_token.as_str())).await;
    assert_eq!(body["invitations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_seven_day_clock() {
    let (app, state) = setup();
    let (owner_id, _) = authed_user(&state, "owner@x.com").await;
    let (_, bob_token) = authed_user(&state, "bob@x.com").await;

    // An invitation whose 7 days have passed, still pending in the store.
    state
        .store
        .create_invitation(CreateInvitation {
            token: "stale-token".into(),
            business_id: owner_id.clone(),
            invited_email: "bob@x.com".into(),
            invited_role: Role::Manager,
            invited_message: None,
            sender_email: "owner@x.com".into(),
            invited_by: owner_id,
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .unwrap();

    let (status, body) = get(&app, "/invitations/verify/stale-token", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "expired");

    let (status, body) = post(&app, "/invitations/accept/stale-token", Some(bob_token.as_str()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "expired");
}

#[tokio::test]
async fn test_email_mismatch_leaves_invitation_pending() {
    let (app, state) = setup();
    let (_, owner_token) = authed_user(&state, "owner@x.com").await;
    let (_, eve_token) = authed_user(&state, "eve@x.com").await;

    let (_, body) = post(
        &app,
        "/invitations",
        Some(owner_token.as_str()),
        Some(json!({"email": "bob@x.com", "role": "user"})),
    )
    .await;
    let link = body["invitationLink"].as_str().unwrap().to_string();
    let token = token_from_link(&link).to_string();

    let (status, body) = post(
        &app,
        &format!("/invitations/accept/{token}"),
        Some(eve_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "email_mismatch");

    // Still redeemable by the right person.
    let (status, body) = get(&app, &format!("/invitations/verify/{token}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn test_second_accept_by_invitee_is_idempotent() {
    let (app, state) = setup();
    let (owner_id, owner_token) = authed_user(&state, "owner@x.com").await;
    let (_, bob_token) = authed_user(&state, "bob@x.com").await;

    let (_, body) = post(
        &app,
        "/invitations",
        Some(owner_token.as_str()),
        Some(json!({"email": "bob@x.com", "role": "manager"})),
    )
    .await;
    let link = body["invitationLink"].as_str().unwrap().to_string();
    let token = token_from_link(&link).to_string();

    let accept_uri = format!("/invitations/accept/{token}");
    let (status, first) = post(&app, &accept_uri, Some(bob_token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = post(&app, &accept_uri, Some(bob_token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["memberId"], second["memberId"]);

    let members = state.store.list_members(&owner_id).await.unwrap();
    assert_eq!(members.len(), 1);

    // A third party presenting the used token is refused.
    let (_, eve_token) = authed_user(&state, "eve@x.com").await;
    let (status, body) = post(&app, &accept_uri, Some(eve_token.as_str()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "already_accepted");
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let (app, _state) = setup();
    let (status, body) = get(&app, "/invitations/verify/no-such-token", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_invalid_role_fails_validation() {
    let (app, state) = setup();
    let (_, owner_token) = authed_user(&state, "owner@x.com").await;
    let (status, body) = post(
        &app,
        "/invitations",
        Some(owner_token.as_str()),
        Some(json!({"email": "bob@x.com", "role": "owner"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn test_reject_then_token_is_gone() {
    let (app, state) = setup();
    let (_, owner_token) = authed_user(&state, "owner@x.com").await;
    let (_, bob_token) = authed_user(&state, "bob@x.com").await;

    let (_, body) = post(
        &app,
        "/invitations",
        Some(owner_token.as_str()),
        Some(json!({"email": "bob@x.com", "role": "user"})),
    )
    .await;
    let link = body["invitationLink"].as_str().unwrap().to_string();
    let token = token_from_link(&link).to_string();

    let (status, body) = post(
        &app,
        &format!("/invitations/reject/{token}"),
        Some(bob_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    let (status, _) = get(&app, &format!("/invitations/verify/{token}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
