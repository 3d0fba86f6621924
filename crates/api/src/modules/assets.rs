//! Asset register: plant, tools, and vehicles owned by the business.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sitedesk_core::error::{ApiError, ApiResult};
use sitedesk_core::extractors::{CurrentSession, ValidatedJson};
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;
use sitedesk_core::types::{Asset, CreateAsset, UpdateAsset};
use validator::Validate;

use super::helpers::{apply_window, resolve_tenant, ListQuery};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub status: String,
    #[serde(rename = "serialNumber")]
    pub serial_number: Option<String>,
    #[serde(rename = "purchaseDate")]
    pub purchase_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "serialNumber")]
    pub serial_number: Option<String>,
    #[serde(rename = "purchaseDate")]
    pub purchase_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListAssetsResponse {
    pub assets: Vec<Asset>,
}

fn sort_key(asset: &Asset, field: &str) -> Option<String> {
    match field {
        "name" => Some(asset.name.to_lowercase()),
        "category" => Some(asset.category.to_lowercase()),
        "status" => Some(asset.status.to_lowercase()),
        "createdAt" => Some(asset.created_at.to_rfc3339()),
        _ => None,
    }
}

pub async fn list_assets<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListAssetsResponse>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let assets = state.store.list_assets(&owner_id).await?;
    let assets = apply_window(assets, &query, sort_key);
    Ok(Json(ListAssetsResponse { assets }))
}

pub async fn create_asset<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    ValidatedJson(body): ValidatedJson<CreateAssetRequest>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let asset = state
        .store
        .create_asset(CreateAsset {
            owner_id,
            name: body.name,
            category: body.category,
            status: body.status,
            serial_number: body.serial_number,
            purchase_date: body.purchase_date,
            value: body.value,
            location: body.location,
            notes: body.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn get_asset<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Asset>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    state
        .store
        .get_asset(&owner_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Asset not found"))
}

pub async fn update_asset<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateAssetRequest>,
) -> ApiResult<Json<Asset>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let asset = state
        .store
        .update_asset(
            &owner_id,
            &id,
            UpdateAsset {
                name: body.name,
                category: body.category,
                status: body.status,
                serial_number: body.serial_number,
                purchase_date: body.purchase_date,
                value: body.value,
                location: body.location,
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(asset))
}

pub async fn delete_asset<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    state.store.delete_asset(&owner_id, &id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub fn router<S: StoreAdapter>() -> Router<AppState<S>> {
    Router::new()
        .route("/assets", get(list_assets::<S>).post(create_asset::<S>))
        .route(
            "/assets/{id}",
            get(get_asset::<S>)
                .put(update_asset::<S>)
                .delete(delete_asset::<S>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_helpers::{seed_session, test_state};

    fn create_request(name: &str, category: &str) -> CreateAssetRequest {
        CreateAssetRequest {
            name: name.to_string(),
            category: category.to_string(),
            status: "active".to_string(),
            serial_number: None,
            purchase_date: None,
            value: None,
            location: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let state = test_state();
        let owner = seed_session(&state, "owner@x.com").await;

        let (status, created) = create_asset(
            State(state.clone()),
            owner.clone(),
            ValidatedJson(create_request("Excavator", "plant")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let fetched = get_asset(State(state), owner, Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(fetched.name, "Excavator");
    }

    #[tokio::test]
    async fn test_cross_tenant_reads_as_unknown() {
        let state = test_state();
        let owner = seed_session(&state, "owner@x.com").await;
        let stranger = seed_session(&state, "stranger@x.com").await;

        let (_, created) = create_asset(
            State(state.clone()),
            owner,
            ValidatedJson(create_request("Excavator", "plant")),
        )
        .await
        .unwrap();

        let err = get_asset(State(state.clone()), stranger.clone(), Path(created.id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_found");

        let err = delete_asset(State(state), stranger, Path(created.id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let state = test_state();
        let owner = seed_session(&state, "owner@x.com").await;
        let (_, created) = create_asset(
            State(state.clone()),
            owner.clone(),
            ValidatedJson(create_request("Excavator", "plant")),
        )
        .await
        .unwrap();

        let updated = update_asset(
            State(state),
            owner,
            Path(created.id.clone()),
            ValidatedJson(UpdateAssetRequest {
                status: Some("in repair".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.status, "in repair");
        assert_eq!(updated.name, "Excavator");
    }

    #[tokio::test]
    async fn test_list_sorts_and_pages() {
        let state = test_state();
        let owner = seed_session(&state, "owner@x.com").await;
        for name in ["Crane", "Angle grinder", "Bobcat"] {
            create_asset(
                State(state.clone()),
                owner.clone(),
                ValidatedJson(create_request(name, "plant")),
            )
            .await
            .unwrap();
        }

        let query = ListQuery {
            limit: Some(2),
            offset: Some(0),
            sort_by: Some("name".to_string()),
            sort_dir: Some("asc".to_string()),
        };
        let listed = list_assets(State(state), owner, Query(query)).await.unwrap();
        let names: Vec<&str> = listed.assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Angle grinder", "Bobcat"]);
    }
}
