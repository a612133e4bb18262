use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

pub const NOT_LOGGED_IN: &str = "not logged in";

/// The user behind the session cookie, inserted for protected handlers
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Raw session token of the current request, kept so logout can revoke it
#[derive(Clone, Debug)]
pub struct SessionToken(pub String);

/// Resolves the session cookie to a stored user. Every failure, including a
/// store error, is answered with 403 before the handler runs.
pub async fn require_session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(&state.config.session.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::debug!("Request to {} without session cookie", request.uri().path());
            ApiError::forbidden(NOT_LOGGED_IN)
        })?;

    let user_id = state.sessions.resolve(&token).await.ok_or_else(|| {
        tracing::warn!("Rejected session token for {}", request.uri().path());
        ApiError::forbidden(NOT_LOGGED_IN)
    })?;

    let user = match state.db.find_user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("Session refers to missing user {}", user_id);
            return Err(ApiError::forbidden(NOT_LOGGED_IN));
        }
        Err(e) => {
            tracing::error!("Failed to load session user {}: {}", user_id, e);
            return Err(ApiError::forbidden(NOT_LOGGED_IN));
        }
    };

    tracing::debug!("Session resolved to user '{}'", user.username);

    request.extensions_mut().insert(CurrentUser(user));
    request.extensions_mut().insert(SessionToken(token));

    Ok(next.run(request).await)
}
