use axum::extract::{Path, State};
use axum::Json;
use sitedesk_core::error::{ApiError, ApiResult};
use sitedesk_core::extractors::{CurrentSession, ValidatedJson};
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;
use sitedesk_core::types::{Member, User};

use crate::modules::helpers::{is_owner, resolve_tenant};
use crate::rbac;

use super::types::{ChangeRoleRequest, ListMembersResponse};

async fn check_manage_permission<S: StoreAdapter>(
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
    if !rbac::can_manage_team(member.role) {
        return Err(ApiError::forbidden(
            "Your role does not allow managing the team",
        ));
    }
    Ok(())
}

/// Fetch a member and check it belongs to the caller's tenant.
async fn member_in_tenant<S: StoreAdapter>(
    state: &AppState<S>,
    business_id: &str,
    member_id: &str,
) -> ApiResult<Member> {
    state
        .store
        .get_member_by_id(member_id)
        .await?
        .filter(|m| m.business_id == business_id)
        .ok_or_else(|| ApiError::not_found("Member not found"))
}

/// GET /team/members
pub async fn list_members<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
) -> ApiResult<Json<ListMembersResponse>> {
    let business_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let members = state.store.list_members(&business_id).await?;
    Ok(Json(ListMembersResponse { members }))
}

/// POST /team/members/{id}/role
pub async fn change_member_role<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(member_id): Path<String>,
    ValidatedJson(body): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<Member>> {
    let business_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    check_manage_permission(&state, &current.user, &business_id).await?;
    let member = member_in_tenant(&state, &business_id, &member_id).await?;

    let updated = state.store.update_member_role(&member.id, body.role).await?;
    // Keep the user's role claim in step with the membership.
    state.store.set_user_role(&updated.user_id, body.role).await?;
    state.config.logger.info(&format!(
        "Member {} role changed to {} by {}",
        updated.email, body.role, current.user.email
    ));
    Ok(Json(updated))
}

/// DELETE /team/members/{id}
pub async fn remove_member<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(member_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let business_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    check_manage_permission(&state, &current.user, &business_id).await?;
    let member = member_in_tenant(&state, &business_id, &member_id).await?;

    state.store.delete_member(&member.id).await?;
    state.config.logger.info(&format!(
        "Member {} removed by {}",
        member.email, current.user.email
    ));
    Ok(Json(serde_json::json!({ "removed": true })))
}
