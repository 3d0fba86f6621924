use async_trait::async_trait;

use crate::error::ApiResult;

/// Trait for sending transactional email. Implement this to integrate with
/// your delivery service (SMTP, SendGrid, SES, etc.).
///
/// The contract mirrors the upstream sender: `{to, subject, text, html}`.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email.
    ///
    /// - `to`: recipient email address
    /// - `subject`: email subject line
    /// - `text`: plain-text body (may be empty)
    /// - `html`: HTML body (may be empty)
    async fn send(&self, to: &str, subject: &str, text: &str, html: &str) -> ApiResult<()>;
}

/// Development email provider that logs emails to stderr.
///
/// Useful for local development and testing.
pub struct ConsoleEmailProvider;

#[async_trait]
impl EmailProvider for ConsoleEmailProvider {
    async fn send(&self, to: &str, subject: &str, text: &str, _html: &str) -> ApiResult<()> {
        eprintln!("[EMAIL] To: {to} | Subject: {subject} | Body: {text}");
        Ok(())
    }
}
