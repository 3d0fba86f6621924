//! Business profile: one document per tenant, upserted as a whole.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use sitedesk_core::error::{ApiError, ApiResult};
use sitedesk_core::extractors::{CurrentSession, ValidatedJson};
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;
use sitedesk_core::types::{BusinessProfile, UpsertBusinessProfile};
use validator::Validate;

use super::helpers::resolve_tenant;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[serde(rename = "companyName")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub company_name: String,
    #[serde(rename = "registrationNumber")]
    pub registration_number: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub about: Option<String>,
}

pub async fn get_profile<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
) -> ApiResult<Json<BusinessProfile>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    state
        .store
        .get_profile(&owner_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Business profile not set"))
}

pub async fn upsert_profile<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    ValidatedJson(body): ValidatedJson<UpsertProfileRequest>,
) -> ApiResult<Json<BusinessProfile>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let profile = state
        .store
        .upsert_profile(UpsertBusinessProfile {
            owner_id,
            company_name: body.company_name,
            registration_number: body.registration_number,
            email: body.email,
            phone: body.phone,
            address: body.address,
            about: body.about,
        })
        .await?;
    Ok(Json(profile))
}

pub fn router<S: StoreAdapter>() -> Router<AppState<S>> {
    Router::new().route(
        "/business-profile",
        get(get_profile::<S>).put(upsert_profile::<S>),
    )
}
