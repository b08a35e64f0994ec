//! Authentication middleware
//!
//! Extractor for bearer token verification and wallet extraction.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use crate::auth::AuthService;
use crate::error::ApiError;

/// Wallet identity extracted from a valid bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedWallet {
    /// Lower-cased wallet address from the token subject
    pub wallet_address: String,
}

/// Extractor for authenticated wallets
///
/// Rejects with `MissingAuth` when the `Authorization: Bearer` header is
/// absent or malformed, before any token decoding happens.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(wallet: AuthenticatedWallet) -> impl IntoResponse {
///     format!("Hello, {}", wallet.wallet_address)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedWallet
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        if bearer.token().is_empty() {
            return Err(ApiError::MissingAuth);
        }

        let auth_service = Arc::<AuthService>::from_ref(state);

        let wallet_address = auth_service.validate_token(bearer.token())?;

        Ok(AuthenticatedWallet { wallet_address })
    }
}
