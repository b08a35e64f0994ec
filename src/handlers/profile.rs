//! Profile HTTP handlers

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::form::UploadForm;
use super::AuthenticatedWallet;
use crate::error::ApiError;
use crate::models::{NewProfile, Profile};
use crate::state::AppState;

/// POST /profile - Create the caller's profile from a multipart form
pub async fn create_profile(
    State(state): State<AppState>,
    wallet: AuthenticatedWallet,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<Json<Profile>, ApiError> {
    let mut form = UploadForm::collect(multipart).await?;

    let profile = NewProfile {
        first_name: form.take("firstName")?,
        last_name: form.take("lastName")?,
        email: form.take("email")?,
        description: form.take("description")?,
        occupation: form.take("occupation")?,
        phone_number: form.take("phoneNumber")?,
        website: form.take("website")?,
    };

    let created = state
        .profile_service
        .create_profile(
            profile,
            &form.file.file_name,
            &form.file.bytes,
            &wallet.wallet_address,
        )
        .await?;

    Ok(Json(created))
}

/// GET /user-profile - Profile bound to the caller's wallet
pub async fn get_own_profile(
    State(state): State<AppState>,
    wallet: AuthenticatedWallet,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .profile_service
        .get_own_profile(&wallet.wallet_address)
        .await?;

    Ok(Json(profile))
}

/// GET /user-profile/:id - Any profile by id
pub async fn get_profile(
    State(state): State<AppState>,
    _wallet: AuthenticatedWallet,
    WithRejection(Path(profile_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.profile_service.get_profile(profile_id).await?;
    Ok(Json(profile))
}
