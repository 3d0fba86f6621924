//! Vendor and subcontractor directory.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sitedesk_core::error::{ApiError, ApiResult};
use sitedesk_core::extractors::{CurrentSession, ValidatedJson};
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;
use sitedesk_core::types::{CreateVendor, UpdateVendor, Vendor};
use validator::Validate;

use super::helpers::{apply_window, resolve_tenant, ListQuery};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub trade: String,
    #[serde(rename = "contactName")]
    pub contact_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVendorRequest {
    pub name: Option<String>,
    pub trade: Option<String>,
    #[serde(rename = "contactName")]
    pub contact_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListVendorsResponse {
    pub vendors: Vec<Vendor>,
}

fn sort_key(vendor: &Vendor, field: &str) -> Option<String> {
    match field {
        "name" => Some(vendor.name.to_lowercase()),
        "trade" => Some(vendor.trade.to_lowercase()),
        "createdAt" => Some(vendor.created_at.to_rfc3339()),
        _ => None,
    }
}

pub async fn list_vendors<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListVendorsResponse>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let vendors = state.store.list_vendors(&owner_id).await?;
    let vendors = apply_window(vendors, &query, sort_key);
    Ok(Json(ListVendorsResponse { vendors }))
}

pub async fn create_vendor<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    ValidatedJson(body): ValidatedJson<CreateVendorRequest>,
) -> ApiResult<(StatusCode, Json<Vendor>)> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let vendor = state
        .store
        .create_vendor(CreateVendor {
            owner_id,
            name: body.name,
            trade: body.trade,
            contact_name: body.contact_name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            notes: body.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(vendor)))
}

pub async fn get_vendor<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Vendor>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    state
        .store
        .get_vendor(&owner_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Vendor not found"))
}

pub async fn update_vendor<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateVendorRequest>,
) -> ApiResult<Json<Vendor>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let vendor = state
        .store
        .update_vendor(
            &owner_id,
            &id,
            UpdateVendor {
                name: body.name,
                trade: body.trade,
                contact_name: body.contact_name,
                email: body.email,
                phone: body.phone,
                address: body.address,
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(vendor))
}

pub async fn delete_vendor<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    state.store.delete_vendor(&owner_id, &id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub fn router<S: StoreAdapter>() -> Router<AppState<S>> {
    Router::new()
        .route("/vendors", get(list_vendors::<S>).post(create_vendor::<S>))
        .route(
            "/vendors/{id}",
            get(get_vendor::<S>)
                .put(update_vendor::<S>)
                .delete(delete_vendor::<S>),
        )
}
