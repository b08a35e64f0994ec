//! Stellar signature verification
//!
//! Verifies ed25519 signatures from Stellar wallets over the raw nonce bytes.

use base32::Alphabet;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;

/// StrKey version byte for ed25519 account ids (renders as a leading 'G')
const ACCOUNT_ID_VERSION: u8 = 6 << 3;

/// Errors that can occur during signature verification
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid Stellar address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Invalid address checksum")]
    InvalidChecksum,

    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    #[error("Signature verification failed")]
    VerificationFailed,

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

impl CryptoError {
    /// True when the input could not even be parsed, as opposed to a
    /// well-formed signature that simply does not match.
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, CryptoError::VerificationFailed)
    }
}

/// Verify a Stellar wallet signature
///
/// # Arguments
/// * `address` - Stellar G-address, any letter case
/// * `message` - The message that was signed
/// * `signature` - Base64-encoded signature (standard or URL-safe, padding optional)
pub fn verify_stellar_signature(
    address: &str,
    message: &str,
    signature: &str,
) -> Result<(), CryptoError> {
    let public_key_bytes = decode_stellar_public_key(address)?;

    let signature_bytes = decode_signature(signature)?;

    // Parse the ed25519 signature (64 bytes)
    let signature = Signature::from_slice(&signature_bytes)
        .map_err(|e| CryptoError::InvalidSignatureFormat(e.to_string()))?;

    let verifying_key = VerifyingKey::from_bytes(&public_key_bytes)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    verifying_key
        .verify(message.as_bytes(), &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Encode an ed25519 public key as a Stellar G-address
pub fn encode_stellar_address(key: &VerifyingKey) -> String {
    let mut payload = Vec::with_capacity(35);
    payload.push(ACCOUNT_ID_VERSION);
    payload.extend_from_slice(key.as_bytes());
    let checksum = crc16_xmodem(&payload);
    payload.extend_from_slice(&checksum);

    base32::encode(Alphabet::Rfc4648 { padding: false }, &payload)
}

/// Decode a Stellar public key from G-address format
///
/// Stellar addresses are base32-encoded with a version byte prefix
/// and a 2-byte CRC16 checksum at the end.
fn decode_stellar_public_key(address: &str) -> Result<[u8; 32], CryptoError> {
    // Wallet addresses are stored lower-cased; StrKey itself is upper-case
    let address = address.trim().to_ascii_uppercase();

    if !address.starts_with('G') {
        return Err(CryptoError::InvalidAddressFormat(
            "Stellar public keys must start with 'G'".to_string(),
        ));
    }

    let decoded = base32::decode(Alphabet::Rfc4648 { padding: false }, &address)
        .ok_or_else(|| CryptoError::InvalidAddressFormat("Invalid base32 encoding".to_string()))?;

    // 1 version byte + 32 key bytes + 2 checksum bytes
    if decoded.len() != 35 {
        return Err(CryptoError::InvalidAddressFormat(format!(
            "Expected 35 bytes, got {}",
            decoded.len()
        )));
    }

    if decoded[0] != ACCOUNT_ID_VERSION {
        return Err(CryptoError::InvalidAddressFormat(
            "Not an account id".to_string(),
        ));
    }

    let payload = &decoded[..33];
    let checksum = &decoded[33..35];
    if checksum != crc16_xmodem(payload) {
        return Err(CryptoError::InvalidChecksum);
    }

    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(&decoded[1..33]);

    Ok(public_key)
}

fn decode_signature(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    let input = encoded.trim().trim_end_matches('=');
    if input.is_empty() {
        return Err(CryptoError::InvalidSignatureFormat(
            "Signature is empty".to_string(),
        ));
    }

    STANDARD_NO_PAD
        .decode(input)
        .or_else(|_| URL_SAFE_NO_PAD.decode(input))
        .map_err(|e| CryptoError::InvalidSignatureFormat(e.to_string()))
}

/// Calculate CRC16-XModem checksum (used by Stellar)
fn crc16_xmodem(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0;

    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }

    // Little-endian byte order
    [(crc & 0xff) as u8, (crc >> 8) as u8]
}
