//! Authentication request/response DTOs

use serde::{Deserialize, Serialize};

use super::NonceRecord;

/// Query for POST /generate_nonce
#[derive(Debug, Deserialize)]
pub struct GenerateNonceQuery {
    pub wallet_address: String,
}

/// Challenge handed to the wallet for signing
#[derive(Debug, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
    pub wallet_address: String,
}

impl From<NonceRecord> for NonceResponse {
    fn from(record: NonceRecord) -> Self {
        Self {
            nonce: record.nonce,
            wallet_address: record.wallet_address,
        }
    }
}

/// Request to verify a signed nonce
#[derive(Debug, Deserialize)]
pub struct VerifySignatureRequest {
    pub wallet_address: String,
    pub nonce: String,
    pub signature: String, // Base64-encoded signature
}

/// Bearer token issued after a successful verification
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
