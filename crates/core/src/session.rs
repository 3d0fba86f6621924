use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::store::StoreAdapter;
use crate::types::{CreateSession, Session};

type HmacSha256 = Hmac<Sha256>;

/// Creates, validates, and renews sessions.
///
/// Raw tokens are 32 random bytes hex-encoded. On the wire (cookie value)
/// the token is carried as `<token>.<base64url(hmac_sha256(token))>` so a
/// forged cookie fails before any store lookup.
pub struct SessionManager<S: StoreAdapter> {
    store: Arc<S>,
    config: Arc<AppConfig>,
}

impl<S: StoreAdapter> SessionManager<S> {
    pub fn new(store: Arc<S>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Generate a raw session token: 32 bytes of OS randomness, hex.
    pub fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn hmac(&self, token: &str) -> ApiResult<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|_| ApiError::internal("Invalid HMAC key length"))?;
        mac.update(token.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Sign a raw token for transport in a cookie.
    pub fn sign_token(&self, token: &str) -> ApiResult<String> {
        let sig = self.hmac(token)?;
        Ok(format!("{}.{}", token, URL_SAFE_NO_PAD.encode(sig)))
    }

    /// Verify a signed cookie value and return the raw token.
    ///
    /// Comparison runs through the `Mac` verifier, which is constant time.
    pub fn verify_signed_token(&self, signed: &str) -> ApiResult<String> {
        let (token, sig_b64) = signed
            .split_once('.')
            .ok_or_else(|| ApiError::SessionNotFound)?;
        if !Self::is_valid_token_format(token) {
            return Err(ApiError::SessionNotFound);
        }
        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| ApiError::SessionNotFound)?;
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|_| ApiError::internal("Invalid HMAC key length"))?;
        mac.update(token.as_bytes());
        mac.verify_slice(&sig)
            .map_err(|_| ApiError::SessionNotFound)?;
        Ok(token.to_string())
    }

    pub fn is_valid_token_format(token: &str) -> bool {
        token.len() == 64 && token.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Create a session for a user and return it with the raw token.
    pub async fn create_session(&self, user_id: &str) -> ApiResult<Session> {
        let token = Self::generate_token();
        let session = CreateSession {
            user_id: user_id.to_string(),
            expires_at: Utc::now() + self.config.session.expires_in,
        };
        self.store.create_session(session, token).await
    }

    /// Look up a session by raw token, dropping it if expired and sliding
    /// its expiry forward when past the renewal window.
    pub async fn get_valid_session(&self, token: &str) -> ApiResult<Option<Session>> {
        let Some(mut session) = self.store.get_session(token).await? else {
            return Ok(None);
        };
        let now = Utc::now();
        if session.expires_at <= now {
            self.store.delete_session(token).await?;
            return Ok(None);
        }
        let renew_after = session.expires_at - self.config.session.expires_in
            + self.config.session.update_age;
        if now >= renew_after {
            let new_expiry = now + self.config.session.expires_in;
            self.store.update_session_expiry(token, new_expiry).await?;
            session.expires_at = new_expiry;
        }
        Ok(Some(session))
    }

    pub async fn delete_session(&self, token: &str) -> ApiResult<()> {
        self.store.delete_session(token).await
    }
}
