use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::StoreAdapter;
use crate::types::{Session, User};

/// An authenticated caller. Rejects with 401 when no valid session is found.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session: Session,
    pub user: User,
}

/// Like [`CurrentSession`] but yields `None` instead of rejecting.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<CurrentSession>);

/// JSON body that is deserialized and then run through `validator`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(axum::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    let header = parts.headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let pair = pair.trim();
        if let Some(rest) = pair.strip_prefix(name) {
            if let Some(v) = rest.strip_prefix('=') {
                return Some(v.to_string());
            }
        }
    }
    None
}

async fn resolve_session<S: StoreAdapter>(
    parts: &Parts,
    state: &AppState<S>,
) -> Result<Option<CurrentSession>, ApiError> {
    // Bearer tokens carry the raw token; cookies carry the signed form.
    let token = if let Some(token) = bearer_token(parts) {
        token
    } else if let Some(signed) = cookie_value(parts, &state.config.session.cookie_name) {
        match state.sessions.verify_signed_token(&signed) {
            Ok(token) => token,
            Err(_) => return Ok(None),
        }
    } else {
        return Ok(None);
    };

    if !crate::session::SessionManager::<S>::is_valid_token_format(&token) {
        return Ok(None);
    }

    let Some(session) = state.sessions.get_valid_session(&token).await? else {
        return Ok(None);
    };
    let Some(user) = state.store.get_user_by_id(&session.user_id).await? else {
        return Ok(None);
    };
    Ok(Some(CurrentSession { session, user }))
}

impl<S: StoreAdapter> FromRequestParts<AppState<S>> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        resolve_session(parts, state)
            .await?
            .ok_or(ApiError::Unauthenticated)
    }
}

impl<S: StoreAdapter> FromRequestParts<AppState<S>> for OptionalSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(resolve_session(parts, state).await?))
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| ApiError::validation(err.body_text()))?;
        value
            .validate()
            .map_err(|err| ApiError::validation(format_validation_errors(&err)))?;
        Ok(ValidatedJson(value))
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{}: {}", field, detail)
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = HttpRequest::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_headers(&[("authorization", "Bearer abc123")]);
        assert_eq!(bearer_token(&parts), Some("abc123".to_string()));

        let parts = parts_with_headers(&[("authorization", "Basic abc123")]);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_cookie_value_extraction() {
        let parts = parts_with_headers(&[(
            "cookie",
            "other=1; sitedesk.session_token=tok.sig; last=2",
        )]);
        assert_eq!(
            cookie_value(&parts, "sitedesk.session_token"),
            Some("tok.sig".to_string())
        );
        assert_eq!(cookie_value(&parts, "missing"), None);
    }
}
