//! Property route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::property::{create_property, get_property, list_properties};
use crate::state::AppState;

pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/property", post(create_property))
        .route("/property/:id", get(get_property))
        .route("/properties", get(list_properties))
}
