use std::sync::Arc;

use chrono::Duration;

use crate::email::EmailProvider;
use crate::error::{ApiError, ApiResult};
use crate::logger::{default_logger, Logger};

/// Session cookie and lifetime settings.
#[derive(Clone)]
pub struct SessionConfig {
    /// How long a session lives from creation or last renewal.
    pub expires_in: Duration,
    /// Sliding-renewal window: a session older than this gets its expiry
    /// pushed out on use.
    pub update_age: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expires_in: Duration::days(7),
            update_age: Duration::days(1),
            cookie_name: "sitedesk.session_token".to_string(),
            cookie_secure: false,
            cookie_http_only: true,
        }
    }
}

/// Invitation lifecycle settings.
#[derive(Clone)]
pub struct InvitationConfig {
    /// Fixed invitation lifetime, stamped at issue time.
    pub expires_in: Duration,
    /// Maximum length of the optional personal message.
    pub message_max_len: usize,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expires_in: Duration::days(7),
            message_max_len: 500,
        }
    }
}

/// Application configuration, built fluently.
#[derive(Clone)]
pub struct AppConfig {
    /// Secret for HMAC-signing session cookies. Must be at least 32 chars.
    pub secret: String,
    pub app_name: String,
    /// Public origin used to build invitation links, no trailing slash.
    pub base_url: String,
    pub session: SessionConfig,
    pub invitation: InvitationConfig,
    pub logger: Arc<dyn Logger>,
    pub email_provider: Option<Arc<dyn EmailProvider>>,
}

impl AppConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            app_name: "SiteDesk".to_string(),
            base_url: "http://localhost:3000".to_string(),
            session: SessionConfig::default(),
            invitation: InvitationConfig::default(),
            logger: default_logger(),
            email_provider: None,
        }
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    pub fn invitation(mut self, invitation: InvitationConfig) -> Self {
        self.invitation = invitation;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn email_provider(mut self, provider: Arc<dyn EmailProvider>) -> Self {
        self.email_provider = Some(provider);
        self
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.len() < 32 {
            return Err(ApiError::config(
                "secret must be at least 32 characters long",
            ));
        }
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url must not be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_name", &self.app_name)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
