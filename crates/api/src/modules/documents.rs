//! Document metadata: certificates, contracts, insurance papers.
//!
//! Only metadata lives here. The file blob itself is uploaded to the hosted
//! store by the client; `url` points at it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sitedesk_core::error::{ApiError, ApiResult};
use sitedesk_core::extractors::{CurrentSession, ValidatedJson};
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;
use sitedesk_core::types::{CreateDocument, DocumentRecord, UpdateDocument};
use validator::Validate;

use super::helpers::{apply_window, resolve_tenant, ListQuery};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub category: String,
    #[validate(url(message = "must be a valid URL"))]
    pub url: String,
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
    #[serde(rename = "sizeBytes")]
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub url: Option<String>,
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
    #[serde(rename = "sizeBytes")]
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ListDocumentsResponse {
    pub documents: Vec<DocumentRecord>,
}

fn sort_key(document: &DocumentRecord, field: &str) -> Option<String> {
    match field {
        "title" => Some(document.title.to_lowercase()),
        "category" => Some(document.category.to_lowercase()),
        "createdAt" => Some(document.created_at.to_rfc3339()),
        _ => None,
    }
}

pub async fn list_documents<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListDocumentsResponse>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let documents = state.store.list_documents(&owner_id).await?;
    let documents = apply_window(documents, &query, sort_key);
    Ok(Json(ListDocumentsResponse { documents }))
}

pub async fn create_document<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    ValidatedJson(body): ValidatedJson<CreateDocumentRequest>,
) -> ApiResult<(StatusCode, Json<DocumentRecord>)> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let document = state
        .store
        .create_document(CreateDocument {
            owner_id,
            title: body.title,
            category: body.category,
            url: body.url,
            content_type: body.content_type,
            size_bytes: body.size_bytes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn get_document<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Json<DocumentRecord>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    state
        .store
        .get_document(&owner_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Document not found"))
}

pub async fn update_document<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateDocumentRequest>,
) -> ApiResult<Json<DocumentRecord>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    let document = state
        .store
        .update_document(
            &owner_id,
            &id,
            UpdateDocument {
                title: body.title,
                category: body.category,
                url: body.url,
                content_type: body.content_type,
                size_bytes: body.size_bytes,
            },
        )
        .await?;
    Ok(Json(document))
}

pub async fn delete_document<S: StoreAdapter>(
    State(state): State<AppState<S>>,
    current: CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let owner_id = resolve_tenant(state.store.as_ref(), &current.user).await?;
    state.store.delete_document(&owner_id, &id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub fn router<S: StoreAdapter>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/documents",
            get(list_documents::<S>).post(create_document::<S>),
        )
        .route(
            "/documents/{id}",
            get(get_document::<S>)
                .put(update_document::<S>)
                .delete(delete_document::<S>),
        )
}
