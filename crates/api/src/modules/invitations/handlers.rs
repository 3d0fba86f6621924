use std::sync::Arc;

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use sitedesk_core::error::{ApiError, ApiResult};
use sitedesk_core::extractors::{CurrentSession, ValidatedJson};
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;
use sitedesk_core::types::{
    CreateInvitation, CreateMember, Invitation, InvitationStatus, Member, Role, User,
};

use crate::modules::helpers::{is_owner, resolve_tenant};
use crate::rbac;

use super::cache::PendingInvitationCache;
use super::types::{
    AcceptInvitationResponse, CreateInvitationRequest, CreateInvitationResponse,
    ListInvitationsResponse, RejectInvitationResponse, VerifyInvitationResponse,
};

/// Generate an invitation token: 32 bytes of OS randomness, base64url.
fn generate_invitation_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Accept-page link. The query parameters are display hints for the landing
/// page; the token is the only thing the server trusts.
fn build_invitation_link(base_url: &str, token: &str, email: &str, role: Role) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("email", email)
        .append_pair("role", role.as_str())
        .finish();
    format!("{base_url}/accept-invitation/{token}?{query}")
}

async fn check_invite_permission<S: StoreAdapter>(
    state: &AppState<S>,
    user: &User,
    business_id: &str,
) -> ApiResult<()> {
    if is_owner(user, business_id) {
        return Ok(());
    }
    let member = state
        .store
        .get_member(business_id, &user.id)
        .await?
        .ok_or_else(|| ApiError::forbidden("You are not a member of this team"))?;
    if !rbac::can_invite(member.role) {
        return Err(ApiError::forbidden(
            "Your role does not allow sending invitations",
        ));
    }
    Ok(())
}

async fn company_name_for<S: StoreAdapter>(
    state: &AppState<S>,
    business_id: &str,
) -> ApiResult<String> {
    Ok(state
        .store
        .get_profile(business_id)
        .await?
        .map(|p| p.company_name)
        .unwrap_or_default())
}

/// POST /invitations
pub async fn issue_invitation<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    Extension(cache): Extension<Arc<PendingInvitationCache>>,
    current: CurrentSession,
    ValidatedJson(body): ValidatedJson<CreateInvitationRequest>,
) -> ApiResult<(StatusCode, Json<CreateInvitationResponse>)> {
    let user = &current.user;
    let business_id = resolve_tenant(state.store.as_ref(), user).await?;
    check_invite_permission(&state, user, &business_id).await?;

    let invited_email = body.email.to_lowercase();
    if invited_email == user.email.to_lowercase() {
        return Err(ApiError::validation("You cannot invite yourself"));
    }

    // Pre-check; the invitation is only written when no live pending one
    // exists for this (invitee, sender) pair.
    if state
        .store
        .get_pending_invitation(&invited_email, &user.email)
        .await?
        .is_some()
    {
        return Err(ApiError::duplicate(
            "A pending invitation for this email already exists",
        ));
    }

    let token = generate_invitation_token();
    let invitation = state
        .store
        .create_invitation(CreateInvitation {
            token: token.clone(),
            business_id: business_id.clone(),
            invited_email: invited_email.clone(),
            invited_role: body.role,
            invited_message: body.message.clone(),
            sender_email: user.email.clone(),
            invited_by: user.id.clone(),
            expires_at: Utc::now() + state.config.invitation.expires_in,
        })
        .await?;
    cache.record(invitation.clone());

    let link = build_invitation_link(&state.config.base_url, &token, &invited_email, body.role);
    state.config.logger.info(&format!(
        "Invitation issued for {} by {}",
        invited_email, user.email
    ));

    let (email_sent, email_warning) =
        send_invitation_email(&state, &invitation, &link, &user.email).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateInvitationResponse {
            invitation_id: invitation.id,
            invitation_link: link,
            email_sent,
            email_warning,
        }),
    ))
}

/// Dispatch the invitation email. A failure never voids the invitation; it
/// is logged and reported back to the sender as a warning.
async fn send_invitation_email<S: StoreAdapter>(
    state: &AppState<S>,
    invitation: &Invitation,
    link: &str,
    sender_email: &str,
) -> (bool, Option<String>) {
    let provider = match state.config.email_provider.as_deref() {
        Some(provider) => provider,
        None => {
            return (
                false,
                Some("No email provider configured; share the link manually".to_string()),
            )
        }
    };

    let company = company_name_for(state, &invitation.business_id)
        .await
        .unwrap_or_default();
    let company = if company.is_empty() {
        state.config.app_name.clone()
    } else {
        company
    };

    let subject = format!("You've been invited to join {company}");
    let mut text = format!(
        "{sender_email} has invited you to join {company} as {}.\n\nAccept here: {link}\n",
        invitation.invited_role
    );
    if let Some(message) = &invitation.invited_message {
        text.push_str(&format!("\nMessage from {sender_email}:\n{message}\n"));
    }
    let html = format!(
        "<p>{sender_email} has invited you to join <strong>{company}</strong> as {}.</p>\
         <p><a href=\"{link}\">Accept invitation</a></p>",
        invitation.invited_role
    );

    match provider
        .send(&invitation.invited_email, &subject, &text, &html)
        .await
    {
        Ok(()) => (true, None),
        Err(err) => {
            state.config.logger.warn(&format!(
                "Invitation email to {} failed: {}",
                invitation.invited_email, err
            ));
            (false, Some(format!("Email could not be sent: {err}")))
        }
    }
}

/// GET /invitations/verify/{token}. The one unauthenticated endpoint.
pub async fn verify_invitation<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    Path(token): Path<String>,
) -> ApiResult<Json<VerifyInvitationResponse>> {
    let invitation = state
        .store
        .get_invitation_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::not_found("Invitation not found"))?;

    match invitation.status {
        // A rejected token is no longer redeemable and reads as unknown.
        InvitationStatus::Rejected => Err(ApiError::not_found("Invitation not found")),
        InvitationStatus::Accepted => Err(ApiError::already_accepted(
            "This invitation has already been accepted",
        )),
        InvitationStatus::Pending if invitation.is_expired() => {
            Err(ApiError::expired("This invitation has expired"))
        }
        InvitationStatus::Pending => {
            let company_name = company_name_for(&state, &invitation.business_id).await?;
            Ok(Json(VerifyInvitationResponse::from_invitation(
                invitation,
                company_name,
            )))
        }
    }
}

fn emails_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Ensure the membership and role claim exist for an accepted invitation.
///
/// Safe to re-run: an existing membership is kept as-is and the role claim
/// is synced from it, so a partially applied earlier attempt converges.
async fn apply_acceptance_effects<S: StoreAdapter>(
    state: &AppState<S>,
    invitation: &Invitation,
    user: &User,
) -> ApiResult<Member> {
    let member = match state
        .store
        .get_member(&invitation.business_id, &user.id)
        .await?
    {
        Some(existing) => existing,
        None => {
            state
                .store
                .create_member(CreateMember::new(
                    invitation.business_id.clone(),
                    user.id.clone(),
                    user.email.clone(),
                    invitation.invited_role,
                ))
                .await?
        }
    };
    state.store.set_user_role(&user.id, member.role).await?;
    Ok(member)
}

/// POST /invitations/accept/{token}
pub async fn accept_invitation<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(token): Path<String>,
) -> ApiResult<Json<AcceptInvitationResponse>> {
    let user = &current.user;
    let invitation = state
        .store
        .get_invitation_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::not_found("Invitation not found"))?;

    match invitation.status {
        InvitationStatus::Rejected => Err(ApiError::not_found("Invitation not found")),
        InvitationStatus::Accepted => {
            // The invited account may retry to finish a partial acceptance.
            if !emails_match(&user.email, &invitation.invited_email) {
                return Err(ApiError::already_accepted(
                    "This invitation has already been accepted",
                ));
            }
            let member = apply_acceptance_effects(&state, &invitation, user).await?;
            Ok(Json(AcceptInvitationResponse {
                business_id: invitation.business_id,
                role: member.role,
                member_id: member.id,
            }))
        }
        InvitationStatus::Pending => {
            if invitation.is_expired() {
                return Err(ApiError::expired("This invitation has expired"));
            }
            if !emails_match(&user.email, &invitation.invited_email) {
                return Err(ApiError::email_mismatch(
                    "This invitation was issued to a different email address",
                ));
            }
            let invitation = state
                .store
                .mark_invitation_accepted(&invitation.id, &user.id)
                .await?;
            let member = apply_acceptance_effects(&state, &invitation, user).await?;
            state.config.logger.info(&format!(
                "{} joined business {} as {}",
                user.email, invitation.business_id, member.role
            ));
            Ok(Json(AcceptInvitationResponse {
                business_id: invitation.business_id,
                role: member.role,
                member_id: member.id,
            }))
        }
    }
}

/// POST /invitations/reject/{token}
pub async fn reject_invitation<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(token): Path<String>,
) -> ApiResult<Json<RejectInvitationResponse>> {
    let user = &current.user;
    let invitation = state
        .store
        .get_invitation_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::not_found("Invitation not found"))?;

    if !emails_match(&user.email, &invitation.invited_email) {
        return Err(ApiError::email_mismatch(
            "This invitation was issued to a different email address",
        ));
    }

    match invitation.status {
        InvitationStatus::Accepted => Err(ApiError::already_accepted(
            "This invitation has already been accepted",
        )),
        // Rejecting twice is a no-op.
        InvitationStatus::Rejected => Ok(Json(RejectInvitationResponse {
            status: InvitationStatus::Rejected,
        })),
        InvitationStatus::Pending => {
            let invitation = state.store.mark_invitation_rejected(&invitation.id).await?;
            Ok(Json(RejectInvitationResponse {
                status: invitation.status,
            }))
        }
    }
}

/// GET /invitations: the caller's sent invitations, cache-reconciled.
pub async fn list_invitations<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    Extension(cache): Extension<Arc<PendingInvitationCache>>,
    current: CurrentSession,
) -> ApiResult<Json<ListInvitationsResponse>> {
    let authoritative = state
        .store
        .list_invitations_by_sender(&current.user.id)
        .await?;
    let invitations = cache.reconcile(authoritative);
    Ok(Json(ListInvitationsResponse { invitations }))
}
