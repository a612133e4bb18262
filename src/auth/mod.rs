pub mod cookie;
pub mod password;
pub mod session;

pub use cookie::{removal_cookie, session_cookie};
pub use password::{Argon2Verifier, HashedPassword, PasswordError, PasswordVerifier};
pub use session::{Claims, JwtSessionStore, SessionError, SessionStore};
