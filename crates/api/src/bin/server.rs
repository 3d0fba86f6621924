use std::sync::Arc;

use sitedesk_core::config::AppConfig;
use sitedesk_core::email::ConsoleEmailProvider;
use sitedesk_core::store::MemoryStore;
use sitedesk_core::state::AppState;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let secret = std::env::var("SITEDESK_SECRET")
        .unwrap_or_else(|_| "development-secret-change-me-in-production".to_string());
    let base_url = std::env::var("SITEDESK_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let bind_addr =
        std::env::var("SITEDESK_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let config = AppConfig::new(secret)
        .base_url(base_url)
        .email_provider(Arc::new(ConsoleEmailProvider));
    config.validate()?;

    let state = AppState::new(config, MemoryStore::new());
    let app = sitedesk_api::app(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("sitedesk listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
