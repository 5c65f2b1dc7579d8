use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::kernel::DEFAULT_MEMBER_ID_ATTEMPTS;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub database_max_connections: u32,
    /// Member-id draws before a create gives up on collisions
    pub member_id_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            member_id_attempts: env::var("MEMBER_ID_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_MEMBER_ID_ATTEMPTS.to_string())
                .parse()
                .context("MEMBER_ID_ATTEMPTS must be a valid number")?,
        })
    }
}
