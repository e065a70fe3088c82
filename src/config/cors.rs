use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// Builds the CORS layer for the comma-separated `allowed_origins` list.
///
/// Credentials are allowed, so a wildcard origin is never produced: if no
/// configured origin parses, the defaults are used instead.
pub fn create_cors_layer(allowed_origins: &str) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(parse_origins(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn origin_list(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

fn parse_origins(raw: &str) -> AllowOrigin {
    let mut origins = origin_list(raw);
    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, falling back to defaults");
        origins = origin_list(DEFAULT_ALLOWED_ORIGINS);
    }

    tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
    AllowOrigin::list(origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_list_skips_blank_and_invalid_entries() {
        let origins = origin_list(" http://a.test , ,http://b.test,bad\norigin");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://a.test");
    }

    #[test]
    fn test_default_origins_are_valid() {
        assert_eq!(origin_list(DEFAULT_ALLOWED_ORIGINS).len(), 1);
    }
}
