// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session cookie resolved by
// middleware::require_session_middleware)
pub mod body;
pub mod protected;
pub mod public;

pub use body::JsonBody;

use uuid::Uuid;

/// Path ids that do not parse name no entity, so callers treat them like an
/// id that is not stored.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
