//! Shared fixtures for module unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sitedesk_core::config::AppConfig;
use sitedesk_core::email::EmailProvider;
use sitedesk_core::error::{ApiError, ApiResult};
use sitedesk_core::extractors::CurrentSession;
use sitedesk_core::state::AppState;
use sitedesk_core::store::{MemoryStore, UserOps};
use sitedesk_core::types::CreateUser;

pub const TEST_SECRET: &str = "test-secret-at-least-32-characters-long!";

/// Email provider that records sends, optionally failing every send.
pub struct RecordingEmailProvider {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl RecordingEmailProvider {
    pub fn new() -> (Arc<Self>, Arc<Mutex<Vec<(String, String)>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Arc::new(Self {
                sent: sent.clone(),
                fail: false,
            }),
            sent,
        )
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        })
    }
}

#[async_trait]
impl EmailProvider for RecordingEmailProvider {
    async fn send(&self, to: &str, subject: &str, _text: &str, _html: &str) -> ApiResult<()> {
        if self.fail {
            return Err(ApiError::upstream("smtp connection refused"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}

pub fn test_state() -> AppState<MemoryStore> {
    let (provider, _) = RecordingEmailProvider::new();
    let config = AppConfig::new(TEST_SECRET)
        .base_url("http://localhost:3000")
        .email_provider(provider);
    AppState::new(config, MemoryStore::new())
}

pub fn test_state_with_email(
    provider: Arc<RecordingEmailProvider>,
) -> AppState<MemoryStore> {
    let config = AppConfig::new(TEST_SECRET)
        .base_url("http://localhost:3000")
        .email_provider(provider);
    AppState::new(config, MemoryStore::new())
}

/// Create a user plus a live session, returning the extractor value the
/// handlers receive.
pub async fn seed_session(state: &AppState<MemoryStore>, email: &str) -> CurrentSession {
    let user = state
        .store
        .create_user(CreateUser::new(email))
        .await
        .unwrap();
    let session = state.sessions.create_session(&user.id).await.unwrap();
    CurrentSession { session, user }
}
