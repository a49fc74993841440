pub(crate) use crate::auth::dto::{Claims, SessionKeys};
use crate::auth::repo::UserRepository;
use crate::auth::repo_types::{UpsertUser, User};
use crate::config::{SessionConfig, MAX_SESSION_TTL_MINUTES};
use crate::db::StorageError;
use crate::state::AppState;
use axum::extract::FromRef;
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, info};

pub const SESSION_COOKIE: &str = "app_session_id";

impl SessionKeys {
    pub fn from_config(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs(cfg.ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES) as u64 * 60),
        }
    }

    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(TimeDuration::seconds(self.ttl.as_secs() as i64))
            .ok_or_else(|| anyhow::anyhow!("session expiry out of range"))?;
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "session verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        SessionKeys::from_config(&state.config.session)
    }
}

/// Expired cookie that makes the browser drop the session.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::seconds(0))
        .build()
}

/// Records a sign-in for an externally authenticated identity and issues a session token.
pub async fn sign_in(
    users: &dyn UserRepository,
    keys: &SessionKeys,
    identity: &UpsertUser,
) -> anyhow::Result<(User, String)> {
    let user = users
        .upsert_by_open_id(identity)
        .await
        .map_err(|e: StorageError| anyhow::anyhow!("upsert user {}: {}", identity.open_id, e))?;
    let token = keys.sign(user.id)?;
    info!(user_id = user.id, open_id = %user.open_id, "user signed in");
    Ok((user, token))
}
