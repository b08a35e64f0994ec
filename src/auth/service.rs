//! Authentication service
//!
//! Core business logic for the wallet handshake: nonce issuance, signature
//! verification and bearer token issuance.

use std::sync::Arc;

use thiserror::Error;

use crate::models::{NewProfile, NonceRecord, Profile, TokenResponse};
use crate::store::{Store, StoreError};

use super::crypto::verify_stellar_signature;
use super::jwt::{JwtError, TokenIssuer};
use super::nonce::{normalize_wallet_address, NonceAuthority};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid wallet address: {0}")]
    InvalidWalletAddress(String),

    #[error("No nonce issued for this wallet")]
    NonceNotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid signature or nonce")]
    InvalidSignatureOrNonce,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Token error: {0}")]
    TokenError(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AuthError::NonceNotFound,
            StoreError::Conflict(msg) => AuthError::Conflict(msg),
            StoreError::Database(msg) => AuthError::Storage(msg),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::TokenExpired => AuthError::TokenExpired,
            JwtError::InvalidToken(msg) => AuthError::TokenInvalid(msg),
            JwtError::EncodingFailed(msg) => AuthError::TokenError(msg),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    nonces: NonceAuthority,
    tokens: TokenIssuer,
    rotate_nonce_on_verify: bool,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        store: Arc<dyn Store>,
        jwt_secret: &str,
        access_token_ttl_seconds: i64,
        rotate_nonce_on_verify: bool,
    ) -> Self {
        Self {
            nonces: NonceAuthority::new(store),
            tokens: TokenIssuer::new(jwt_secret, access_token_ttl_seconds),
            rotate_nonce_on_verify,
        }
    }

    /// Get or create the wallet's challenge
    pub async fn generate_nonce(&self, wallet_address: &str) -> Result<NonceRecord, AuthError> {
        self.nonces.issue(wallet_address).await
    }

    /// Check that `signature` signs the wallet's current nonce.
    ///
    /// Returns `Ok(false)` when no nonce was issued, the nonce does not match,
    /// or the signature does not verify. Unparseable addresses or signatures
    /// are reported as [`AuthError::InvalidSignature`].
    pub async fn verify(
        &self,
        wallet_address: &str,
        nonce: &str,
        signature: &str,
    ) -> Result<bool, AuthError> {
        let wallet_address = normalize_wallet_address(wallet_address)?;

        let Some(record) = self.nonces.find(&wallet_address).await? else {
            tracing::debug!(wallet = %wallet_address, "No nonce found for wallet");
            return Ok(false);
        };

        if record.nonce != nonce {
            tracing::debug!(wallet = %wallet_address, "Nonce mismatch");
            return Ok(false);
        }

        match verify_stellar_signature(&wallet_address, nonce, signature) {
            Ok(()) => Ok(true),
            Err(e) if e.is_malformed_input() => Err(AuthError::InvalidSignature(e.to_string())),
            Err(e) => {
                tracing::debug!(wallet = %wallet_address, error = %e, "Signature rejected");
                Ok(false)
            }
        }
    }

    /// Verify a signed nonce and issue an access token
    pub async fn verify_signature(
        &self,
        wallet_address: &str,
        nonce: &str,
        signature: &str,
    ) -> Result<TokenResponse, AuthError> {
        if !self.verify(wallet_address, nonce, signature).await? {
            tracing::warn!(wallet = %wallet_address.trim().to_lowercase(), "Signature verification failed");
            return Err(AuthError::InvalidSignatureOrNonce);
        }

        let wallet_address = normalize_wallet_address(wallet_address)?;

        if self.rotate_nonce_on_verify {
            self.nonces.rotate(&wallet_address).await?;
        }

        let access_token = self.tokens.issue(&wallet_address)?;
        tracing::info!(wallet = %wallet_address, "Wallet authenticated");

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl_seconds(),
        })
    }

    /// Decode a bearer token into the acting wallet address
    pub fn validate_token(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.tokens.validate(token)?;
        normalize_wallet_address(&claims.sub)
            .map_err(|_| AuthError::TokenInvalid("empty subject".to_string()))
    }

    /// Look up the wallet's record, if it ever requested a nonce
    pub async fn find_wallet(&self, wallet_address: &str) -> Result<Option<NonceRecord>, AuthError> {
        self.nonces.find(wallet_address).await
    }

    /// Create a profile owned by the wallet, bound in the same write
    pub async fn bind_new_profile(
        &self,
        wallet_address: &str,
        profile: &NewProfile,
        picture: &str,
    ) -> Result<Profile, AuthError> {
        self.nonces
            .bind_new_profile(wallet_address, profile, picture)
            .await
    }
}
