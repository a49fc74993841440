use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error, warn};

use super::repo_types::User;
use super::services::{SessionKeys, SESSION_COOKIE};
use crate::db::StorageError;
use crate::error::AppError;
use crate::state::AppState;

/// Per-request auth context. Anonymous when no valid session is presented.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<User>,
    /// Set when a valid session could not be resolved because the user store failed.
    lookup_error: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: User) -> Self {
        Self {
            user: Some(user),
            lookup_error: None,
        }
    }

    pub fn lookup_failed(message: String) -> Self {
        Self {
            user: None,
            lookup_error: Some(message),
        }
    }

    pub fn require_user(&self) -> Result<&User, AppError> {
        if let Some(user) = &self.user {
            return Ok(user);
        }
        match &self.lookup_error {
            Some(msg) => Err(AppError::Storage(msg.clone())),
            None => Err(AppError::Unauthorized),
        }
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(c) = jar.get(SESSION_COOKIE) {
        if !c.value().is_empty() {
            return Some(c.value().to_string());
        }
    }
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(Self::anonymous());
        };

        let keys = SessionKeys::from_config(&state.config.session);
        let claims = match keys.verify(&token) {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "invalid or expired session");
                return Ok(Self::anonymous());
            }
        };

        match state.users.find_by_id(claims.sub).await {
            Ok(Some(user)) => Ok(Self::for_user(user)),
            Ok(None) => {
                warn!(user_id = claims.sub, "session for unknown user");
                Ok(Self::anonymous())
            }
            Err(StorageError::Unavailable) => {
                warn!(user_id = claims.sub, "storage unavailable; treating session as anonymous");
                Ok(Self::anonymous())
            }
            Err(e) => {
                error!(error = %e, user_id = claims.sub, "could not resolve session user");
                Ok(Self::lookup_failed(e.to_string()))
            }
        }
    }
}
