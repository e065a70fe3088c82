use std::env;
use std::time::Duration;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::with_security_headers;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/campus_events";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CACHE_OP_TIMEOUT_MS: u64 = 250;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// HTTP surface settings, separate from [`Config`] so routers can be built
/// without any secrets.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub allowed_origins: String,
    pub include_hsts: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allowed_origins: cors::DEFAULT_ALLOWED_ORIGINS.to_string(),
            include_hsts: false,
        }
    }
}

pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub cache_op_timeout: Duration,
    pub http: HttpConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

        let include_hsts = env::var("RUST_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        if include_hsts {
            tracing::info!("Security: HSTS header enabled (production mode)");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            port: parse_or("PORT", DEFAULT_PORT)?,
            cache_op_timeout: Duration::from_millis(parse_or(
                "CACHE_OP_TIMEOUT_MS",
                DEFAULT_CACHE_OP_TIMEOUT_MS,
            )?),
            http: HttpConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| cors::DEFAULT_ALLOWED_ORIGINS.to_string()),
                include_hsts,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default_when_unset() {
        let port: u16 = parse_or("CAMPUS_EVENTS_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        std::env::set_var("CAMPUS_EVENTS_TEST_BAD_PORT", "eighty");
        let err = parse_or::<u16>("CAMPUS_EVENTS_TEST_BAD_PORT", 80).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "CAMPUS_EVENTS_TEST_BAD_PORT", .. }));
    }

    #[test]
    fn test_default_http_config_has_no_hsts() {
        let http = HttpConfig::default();
        assert!(!http.include_hsts);
        assert_eq!(http.allowed_origins, cors::DEFAULT_ALLOWED_ORIGINS);
    }
}
