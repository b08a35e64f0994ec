//! Nonce authority
//!
//! One challenge per wallet. Re-requesting returns the pending value.

use std::sync::Arc;

use rand::Rng;

use super::AuthError;
use crate::models::{NewProfile, NonceRecord, Profile};
use crate::store::Store;

const NONCE_LENGTH: usize = 16;
const NONCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Canonical form of a wallet address: trimmed and lower-cased.
pub fn normalize_wallet_address(wallet_address: &str) -> Result<String, AuthError> {
    let normalized = wallet_address.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AuthError::InvalidWalletAddress(
            "wallet address is empty".to_string(),
        ));
    }
    if normalized.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidWalletAddress(
            "wallet address contains whitespace".to_string(),
        ));
    }
    Ok(normalized)
}

/// Random uppercase-alphanumeric challenge
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    (0..NONCE_LENGTH)
        .map(|_| NONCE_ALPHABET[rng.gen_range(0..NONCE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Clone)]
pub struct NonceAuthority {
    store: Arc<dyn Store>,
}

impl NonceAuthority {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Return the wallet's pending nonce, creating one on first request
    pub async fn issue(&self, wallet_address: &str) -> Result<NonceRecord, AuthError> {
        let wallet_address = normalize_wallet_address(wallet_address)?;

        if let Some(existing) = self.store.find_nonce(&wallet_address).await? {
            tracing::debug!(wallet = %wallet_address, "Returning pending nonce");
            return Ok(existing);
        }

        // A concurrent first request may win the insert; that surfaces as Conflict
        let record = self
            .store
            .insert_nonce(&wallet_address, &generate_nonce())
            .await?;

        tracing::info!(wallet = %wallet_address, "Issued new nonce");
        Ok(record)
    }

    pub async fn find(&self, wallet_address: &str) -> Result<Option<NonceRecord>, AuthError> {
        let wallet_address = normalize_wallet_address(wallet_address)?;
        Ok(self.store.find_nonce(&wallet_address).await?)
    }

    /// Replace the stored challenge with a fresh one
    pub async fn rotate(&self, wallet_address: &str) -> Result<(), AuthError> {
        let wallet_address = normalize_wallet_address(wallet_address)?;
        self.store
            .replace_nonce(&wallet_address, &generate_nonce())
            .await?;
        tracing::debug!(wallet = %wallet_address, "Rotated nonce");
        Ok(())
    }

    /// Persist a profile and bind it to the wallet's record atomically.
    /// The wallet must hold a record that has no profile yet.
    pub async fn bind_new_profile(
        &self,
        wallet_address: &str,
        profile: &NewProfile,
        picture: &str,
    ) -> Result<Profile, AuthError> {
        let wallet_address = normalize_wallet_address(wallet_address)?;
        let created = self
            .store
            .create_profile_for_wallet(&wallet_address, profile, picture)
            .await?;
        tracing::info!(wallet = %wallet_address, profile_id = %created.id, "Bound profile to wallet");
        Ok(created)
    }
}
