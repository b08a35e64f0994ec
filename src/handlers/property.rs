//! Property listing HTTP handlers

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::form::UploadForm;
use super::AuthenticatedWallet;
use crate::error::ApiError;
use crate::models::{NewProperty, Property};
use crate::state::AppState;

/// POST /property - Create a listing from a multipart form
pub async fn create_property(
    State(state): State<AppState>,
    wallet: AuthenticatedWallet,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<Json<Property>, ApiError> {
    let mut form = UploadForm::collect(multipart).await?;

    let property = NewProperty {
        title: form.take("title")?,
        description: form.take("description")?,
        price: form.take("price")?,
    };

    let created = state
        .property_service
        .create_property(property, &form.file.file_name, &form.file.bytes)
        .await?;

    tracing::debug!(wallet = %wallet.wallet_address, property_id = %created.id, "Listing submitted");

    Ok(Json(created))
}

/// GET /properties - Every listing
pub async fn list_properties(
    State(state): State<AppState>,
    _wallet: AuthenticatedWallet,
) -> Result<Json<Vec<Property>>, ApiError> {
    let properties = state.property_service.list_properties().await?;
    Ok(Json(properties))
}

/// GET /property/:id - One listing
pub async fn get_property(
    State(state): State<AppState>,
    _wallet: AuthenticatedWallet,
    WithRejection(Path(property_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Property>, ApiError> {
    let property = state.property_service.get_property(property_id).await?;
    Ok(Json(property))
}
