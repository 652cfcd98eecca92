//! Application configuration loaded from environment variables.

use std::env;

use quill_core::SiteConfig;
use quill_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub site: SiteConfig,
    pub jwt: JwtConfig,
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = SiteConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parsed("PORT").unwrap_or(8080),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/quill".to_string()),
                max_connections: env_parsed("DB_MAX_CONNECTIONS").unwrap_or(20),
                min_connections: env_parsed("DB_MIN_CONNECTIONS").unwrap_or(2),
            },
            site: SiteConfig {
                page_size: env_parsed("PAGE_SIZE").unwrap_or(defaults.page_size),
                charfield_max_length: env_parsed("CHARFIELD_MAX_LENGTH")
                    .unwrap_or(defaults.charfield_max_length),
                display_truncate_length: env_parsed("DISPLAY_TRUNCATE_LENGTH")
                    .unwrap_or(defaults.display_truncate_length),
                strict_comment_visibility: env_parsed("STRICT_COMMENT_VISIBILITY")
                    .unwrap_or(defaults.strict_comment_visibility),
            },
            jwt: JwtConfig::from_env(),
        }
    }
}
