use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub session: SessionConfig,
    pub password: PasswordConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory uploaded photos are written to
    pub dir: PathBuf,
    /// URL prefix the directory is served under
    pub public_path: String,
    pub max_file_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    #[serde(skip_serializing)]
    pub secret: String,
    pub lifetime_hours: i64,
    pub secure_cookie: bool,
}

/// Argon2id cost parameters used when hashing new passwords
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be set outside development")]
    MissingSessionSecret,

    #[error("DATABASE_URL must be set for the postgres backend")]
    MissingDatabaseUrl,

    #[error("session lifetime must be positive")]
    InvalidSessionLifetime,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs = v.parse().unwrap_or(self.server.request_timeout_secs);
        }

        // Database overrides
        if let Ok(v) = env::var("STORAGE_BACKEND") {
            match v.as_str() {
                "memory" => self.database.backend = StorageBackend::Memory,
                "postgres" => self.database.backend = StorageBackend::Postgres,
                other => tracing::warn!("Ignoring unknown STORAGE_BACKEND '{}'", other),
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Upload overrides
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("UPLOAD_PUBLIC_PATH") {
            self.uploads.public_path = v;
        }
        if let Ok(v) = env::var("UPLOAD_MAX_FILE_SIZE_BYTES") {
            self.uploads.max_file_size_bytes = v.parse().unwrap_or(self.uploads.max_file_size_bytes);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Ok(v) = env::var("SESSION_LIFETIME_HOURS") {
            self.session.lifetime_hours = v.parse().unwrap_or(self.session.lifetime_hours);
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIE") {
            self.session.secure_cookie = v.parse().unwrap_or(self.session.secure_cookie);
        }

        // Password overrides
        if let Ok(v) = env::var("PASSWORD_MEMORY_COST_KIB") {
            self.password.memory_cost_kib = v.parse().unwrap_or(self.password.memory_cost_kib);
        }
        if let Ok(v) = env::var("PASSWORD_TIME_COST") {
            self.password.time_cost = v.parse().unwrap_or(self.password.time_cost);
        }
        if let Ok(v) = env::var("PASSWORD_PARALLELISM") {
            self.password.parallelism = v.parse().unwrap_or(self.password.parallelism);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    /// Reject configurations the server cannot safely start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.secret.is_empty() && self.environment != Environment::Development {
            return Err(ConfigError::MissingSessionSecret);
        }
        if self.database.backend == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if self.session.lifetime_hours <= 0 {
            return Err(ConfigError::InvalidSessionLifetime);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
                request_timeout_secs: 30,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            uploads: UploadConfig {
                dir: PathBuf::from("public/images"),
                public_path: "/images".to_string(),
                max_file_size_bytes: 10_000_000, // 10MB
            },
            session: SessionConfig {
                cookie_name: "session".to_string(),
                secret: "development-session-secret".to_string(),
                lifetime_hours: 24,
                secure_cookie: false,
            },
            password: PasswordConfig {
                memory_cost_kib: 19456,
                time_cost: 2,
                parallelism: 1,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:8080".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
                request_timeout_secs: 15,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            uploads: UploadConfig {
                dir: PathBuf::from("public/images"),
                public_path: "/images".to_string(),
                max_file_size_bytes: 10_000_000,
            },
            session: SessionConfig {
                cookie_name: "session".to_string(),
                secret: String::new(),
                lifetime_hours: 24,
                secure_cookie: true,
            },
            password: PasswordConfig {
                memory_cost_kib: 19456,
                time_cost: 2,
                parallelism: 1,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
                request_timeout_secs: 10,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            uploads: UploadConfig {
                dir: PathBuf::from("public/images"),
                public_path: "/images".to_string(),
                max_file_size_bytes: 10_000_000,
            },
            session: SessionConfig {
                cookie_name: "session".to_string(),
                secret: String::new(),
                lifetime_hours: 24,
                secure_cookie: true,
            },
            password: PasswordConfig {
                memory_cost_kib: 65536, // 64 MiB
                time_cost: 3,
                parallelism: 4,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}
