// handlers/protected/session.rs - GET /api/users and DELETE /api/users handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::removal_cookie;
use crate::handlers::public::users::UserEnvelope;
use crate::middleware::{CurrentUser, SessionToken};
use crate::state::AppState;

/// GET /api/users - the logged-in user
pub async fn whoami(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserEnvelope> {
    Json(UserEnvelope { user })
}

/// DELETE /api/users - log out
///
/// The token is revoked server-side, so a client that kept a copy of the
/// cookie cannot reuse it.
pub async fn logout(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    state.sessions.revoke(&token).await;
    tracing::info!("User '{}' logged out", user.username);

    (jar.add(removal_cookie(&state.config.session)), StatusCode::OK)
}
