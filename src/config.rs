//! Application Configuration
//!
//! All configuration values are loaded from environment variables once at
//! startup and handed to the components that need them.

use crate::error::AppError;
use std::env;
use std::net::SocketAddr;

/// Which document store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(AppError::Config(format!(
                "STORE must be 'postgres' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

/// Service configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address (from HOST env var)
    pub host: String,

    /// Listen port (from PORT env var)
    pub port: u16,

    /// Store backend (from STORE env var)
    pub store: StoreKind,

    /// PostgreSQL connection string (from DATABASE_URL env var)
    pub database_url: Option<String>,

    /// Connection pool size (from DATABASE_MAX_CONNECTIONS env var)
    pub database_max_connections: u32,

    /// Secret key for signing session tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,

    /// Minimum password length (from MIN_PASSWORD_LENGTH env var)
    pub min_password_length: usize,
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            AppError::Config("JWT_SECRET environment variable must be set".to_string())
        })?;

        let store = match env::var("STORE") {
            Ok(value) => StoreKind::parse(&value)?,
            Err(_) => StoreKind::Postgres,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed_var("PORT", 3000)?,
            store,
            database_url: env::var("DATABASE_URL").ok(),
            database_max_connections: parsed_var("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            argon2_memory_cost: parsed_var("ARGON2_MEMORY_COST", 65536)?, // 64 MiB
            argon2_time_cost: parsed_var("ARGON2_TIME_COST", 3)?,
            argon2_parallelism: parsed_var("ARGON2_PARALLELISM", 4)?,
            min_password_length: parsed_var("MIN_PASSWORD_LENGTH", 6)?,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < 32 {
            return Err(AppError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.store == StoreKind::Postgres && self.database_url.is_none() {
            return Err(AppError::Config(
                "DATABASE_URL must be set when STORE=postgres".to_string(),
            ));
        }

        if self.database_max_connections == 0 {
            return Err(AppError::Config(
                "DATABASE_MAX_CONNECTIONS must be positive".to_string(),
            ));
        }

        if self.min_password_length < 6 {
            return Err(AppError::Config(
                "MIN_PASSWORD_LENGTH must be at least 6".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| AppError::Config(format!("invalid bind address {}:{}", self.host, self.port)))
    }

    /// Configuration suitable for tests: in-memory store and a cheap hasher.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            store: StoreKind::Memory,
            database_url: None,
            database_max_connections: 1,
            jwt_secret: "test-secret-that-is-at-least-32-characters".to_string(),
            argon2_memory_cost: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            min_password_length: 6,
        }
    }
}
