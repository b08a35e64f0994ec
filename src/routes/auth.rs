//! Authentication routes

use axum::{routing::post, Router};

use crate::handlers::auth;
use crate::state::AppState;

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/generate_nonce", post(auth::generate_nonce))
        .route("/verify_signature", post(auth::verify_signature))
}
