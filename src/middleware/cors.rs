//! CORS policy for the browser front-end.
//!
//! Exactly one origin (the configured front-end) may call the API cross-origin.
//! Credentials are not allowed: the front-end sends the Keycloak token in the
//! `Authorization` header, not a cookie.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

fn allow_origin(origin: &str) -> AllowOrigin {
    match HeaderValue::from_str(origin) {
        Ok(v) => AllowOrigin::exact(v),
        Err(err) => {
            // An unusable origin allows nothing rather than everything
            tracing::warn!(error = %err, origin, "invalid CORS_ALLOWED_ORIGIN, cross-origin access disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    }
}

pub fn layer(origin: &str) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(origin))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10))
}

/// Apply CORS policy to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(&config.cors_allowed_origin))
}
