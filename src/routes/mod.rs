//! Route definitions for Graso API

mod auth;
mod profile;
mod property;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::config::Config;
use crate::handlers::{health_check, root};
use crate::middleware;
use crate::state::AppState;
use crate::uploads::UPLOADS_ROUTE;

pub use auth::auth_routes;
pub use profile::profile_routes;
pub use property::property_routes;

/// Room for the text fields and multipart framing around the image
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Assemble the full application router
pub fn create_router(state: AppState, config: &Config) -> Router {
    let uploads = ServeDir::new(state.images.root());

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(property_routes())
        .nest_service(&format!("/{}", UPLOADS_ROUTE), uploads)
        .with_state(state)
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer(axum::middleware::from_fn(middleware::security_headers));

    let router = if config.environment.is_production() {
        router.layer(axum::middleware::from_fn(middleware::hsts_header))
    } else {
        router
    };

    router
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(configure_cors(config.cors_allowed_origins.as_deref()))
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_origins = allowed_origins.unwrap_or_default();

    if allowed_origins.trim().is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
