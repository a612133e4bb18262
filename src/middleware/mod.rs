pub mod auth;

pub use auth::{require_session_middleware, CurrentUser, SessionToken, NOT_LOGGED_IN};
