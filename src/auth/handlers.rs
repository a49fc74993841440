use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LogoutResponse, PublicUser},
        extractors::RequestContext,
        services::cleared_session_cookie,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/logout", post(logout))
}

/// Current user, or `null` for an anonymous caller.
#[instrument(skip(ctx))]
pub async fn get_me(ctx: RequestContext) -> Json<Option<PublicUser>> {
    Json(ctx.user.map(PublicUser::from))
}

#[instrument(skip(state, ctx, jar))]
pub async fn logout(
    State(state): State<AppState>,
    ctx: RequestContext,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    if let Some(user) = &ctx.user {
        info!(user_id = user.id, "user logged out");
    }
    let jar = jar.add(cleared_session_cookie(state.config.session.cookie_secure));
    (jar, Json(LogoutResponse { success: true }))
}
