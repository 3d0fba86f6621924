//! Team membership: listing, role changes, removal.

use axum::routing::{delete, get, post};
use axum::Router;
use sitedesk_core::state::AppState;
use sitedesk_core::store::StoreAdapter;

pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;

pub fn router<S: StoreAdapter>() -> Router<AppState<S>> {
    Router::new()
        .route("/team/members", get(handlers::list_members::<S>))
        .route(
            "/team/members/{id}/role",
            post(handlers::change_member_role::<S>),
        )
        .route("/team/members/{id}", delete(handlers::remove_member::<S>))
}
