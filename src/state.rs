use std::sync::Arc;

use thiserror::Error;

use crate::auth::{Argon2Verifier, JwtSessionStore, PasswordError, PasswordVerifier, SessionError, SessionStore};
use crate::config::AppConfig;
use crate::database::Database;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Shared by every handler; cloning only bumps reference counts
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<dyn Database>,
    pub sessions: Arc<dyn SessionStore>,
    pub passwords: Arc<dyn PasswordVerifier>,
}

impl AppState {
    /// Wire the default session store and password verifier from `config`
    pub fn new(config: AppConfig, db: Arc<dyn Database>) -> Result<Self, StateError> {
        let sessions = Arc::new(JwtSessionStore::new(&config.session)?);
        let passwords = Arc::new(Argon2Verifier::new(&config.password)?);

        Ok(Self {
            config: Arc::new(config),
            db,
            sessions,
            passwords,
        })
    }
}
