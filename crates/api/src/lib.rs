//! HTTP surface of the SiteDesk backend.
//!
//! One route table, assembled once from the per-feature module routers and
//! shared across every deployment shape.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;
use sitedesk_core::types::HealthCheckResponse;

pub mod modules;
pub mod rbac;

pub use modules::invitations::PendingInvitationCache;

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok",
        service: "sitedesk",
    })
}

/// Assemble the full application router.
pub fn app<S: StoreAdapter>(state: AppState<S>) -> Router {
    let cache = Arc::new(PendingInvitationCache::new());
    app_with_cache(state, cache)
}

/// Variant taking an externally held invitation cache, for callers that want
/// to inspect it (tests, embedding servers).
pub fn app_with_cache<S: StoreAdapter>(
    state: AppState<S>,
    cache: Arc<PendingInvitationCache>,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(modules::invitations::router::<S>(cache))
        .merge(modules::team::router::<S>())
        .merge(modules::assets::router::<S>())
        .merge(modules::vendors::router::<S>())
        .merge(modules::documents::router::<S>())
        .merge(modules::profile::router::<S>())
        .with_state(state)
}
