//! Team invitation lifecycle: issue, verify, accept, reject, list.

use std::sync::Arc;

use axum::extract::Extension;
use axum::routing::{get, post};
use axum::Router;
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;

pub mod cache;
pub mod handlers;
pub mod types;


pub use cache::PendingInvitationCache;

pub fn router<S: StoreAdapter>(cache: Arc<PendingInvitationCache>) -> Router<AppState<S>> {
    Router::new()
        .route(
            "/invitations",
            post(handlers::issue_invitation::<S>).get(handlers::list_invitations::<S>),
        )
        .route(
            "/invitations/verify/{token}",
            get(handlers::verify_invitation::<S>),
        )
        .route(
            "/invitations/accept/{token}",
            post(handlers::accept_invitation::<S>),
        )
        .route(
            "/invitations/reject/{token}",
            post(handlers::reject_invitation::<S>),
        )
        .layer(Extension(cache))
}
