// handlers/public/users.rs - POST /api/users and POST /api/users/login handlers

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session_cookie;
use crate::database::models::{NewUser, User};
use crate::database::DatabaseError;
use crate::error::{ApiError, ApiResult};
use crate::handlers::JsonBody;
use crate::state::AppState;

/// Same message for unknown usernames and wrong passwords, so the response
/// does not reveal which accounts exist.
pub const BAD_LOGIN_MESSAGE: &str = "username or password is wrong";

pub const MISSING_REGISTRATION_FIELDS: &str = "first name, last name, username and password are required";

pub const USERNAME_TAKEN: &str = "username already exists";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `{ "user": ... }` wrapper shared by every endpoint that returns a user
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: User,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Issue a session for `user` and attach it to the response cookies
async fn start_session(state: &AppState, jar: CookieJar, user: &User) -> ApiResult<CookieJar> {
    let token = state.sessions.issue(user.id).await?;
    Ok(jar.add(session_cookie(&state.config.session, token)))
}

/// POST /api/users - register and log in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ApiResult<(CookieJar, Json<UserEnvelope>)> {
    let (Some(first_name), Some(last_name), Some(username), Some(password)) = (
        present(body.first_name),
        present(body.last_name),
        present(body.username),
        present(body.password),
    ) else {
        return Err(ApiError::bad_request(MISSING_REGISTRATION_FIELDS));
    };

    if state.db.find_user_by_username(&username).await?.is_some() {
        tracing::debug!("Registration refused, username '{}' exists", username);
        return Err(ApiError::forbidden(USERNAME_TAKEN));
    }

    let password = hash_password(state.passwords.clone(), password).await?;

    let new_user = NewUser {
        first_name,
        last_name,
        username,
        password,
    };

    // A concurrent registration can still win the unique index
    let user = match state.db.create_user(new_user).await {
        Ok(user) => user,
        Err(DatabaseError::UniqueViolation(_)) => return Err(ApiError::forbidden(USERNAME_TAKEN)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Registered user '{}' ({})", user.username, user.id);

    let jar = start_session(&state, jar, &user).await?;
    Ok((jar, Json(UserEnvelope { user })))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<(CookieJar, Json<UserEnvelope>)> {
    let (Some(username), Some(password)) = (present(body.username), present(body.password)) else {
        return Err(ApiError::bad_request("username and password are required"));
    };

    let user = state
        .db
        .find_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::forbidden(BAD_LOGIN_MESSAGE))?;

    let valid = verify_password(state.passwords.clone(), password, user.password_hash.clone()).await?;
    if !valid {
        tracing::warn!("Failed login for '{}'", username);
        return Err(ApiError::forbidden(BAD_LOGIN_MESSAGE));
    }

    tracing::info!("User '{}' logged in", user.username);

    let jar = start_session(&state, jar, &user).await?;
    Ok((jar, Json(UserEnvelope { user })))
}
