//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Default token lifetime: 7 days
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite connection URL (e.g. `sqlite:./data/catalog.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pooled connections
    pub database_max_connections: u32,

    /// JWT secret for signing and verifying tokens
    pub jwt_secret: String,

    /// How long an issued token stays valid, in seconds
    pub token_lifetime_secs: i64,

    /// Password accepted by the shared-password credential verifier
    pub shared_password: String,

    /// Insert sample authors and books when the store is empty
    pub seed_sample_data: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret.trim().to_string(),
            _ => {
                // Tokens signed with this secret do not survive a restart.
                tracing::warn!("JWT_SECRET not set; using a generated development secret");
                format!("dev-secret-{}", uuid::Uuid::new_v4().simple())
            }
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/catalog.db".to_string()),

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            jwt_secret,

            token_lifetime_secs: env::var("TOKEN_LIFETIME_SECS")
                .ok()
                .map(|s| s.parse().context("Invalid TOKEN_LIFETIME_SECS"))
                .transpose()?
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),

            shared_password: env::var("SHARED_PASSWORD").unwrap_or_else(|_| "secret".to_string()),

            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
