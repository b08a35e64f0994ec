//! Profile route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::profile::{create_profile, get_own_profile, get_profile};
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(create_profile))
        .route("/user-profile", get(get_own_profile))
        .route("/user-profile/:id", get(get_profile))
}
