// handlers/protected/mod.rs - Protected handlers (session required)
//
// Every route here sits behind require_session_middleware, which inserts
// CurrentUser and SessionToken into the request extensions.
pub mod favorites;
pub mod session;
