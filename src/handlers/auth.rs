//! Authentication HTTP handlers
//!
//! Endpoints for the wallet nonce handshake.

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::error::ApiError;
use crate::models::{GenerateNonceQuery, NonceResponse, TokenResponse, VerifySignatureRequest};
use crate::state::AppState;

/// POST /generate_nonce?wallet_address= - Get the wallet's challenge
pub async fn generate_nonce(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<GenerateNonceQuery>, ApiError>,
) -> Result<Json<NonceResponse>, ApiError> {
    let record = state
        .auth_service
        .generate_nonce(&query.wallet_address)
        .await?;

    Ok(Json(record.into()))
}

/// POST /verify_signature - Verify signed nonce and issue an access token
pub async fn verify_signature(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<VerifySignatureRequest>, ApiError>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth_service
        .verify_signature(&req.wallet_address, &req.nonce, &req.signature)
        .await?;

    Ok(Json(token))
}
