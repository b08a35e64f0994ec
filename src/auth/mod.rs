//! Authentication module for Graso
//!
//! Provides wallet-based authentication using Stellar addresses.
//! - One pending nonce per wallet, re-issued idempotently
//! - ed25519 signature verification over the nonce
//! - Stateless JWT access tokens

mod crypto;
mod jwt;
mod nonce;
mod service;

pub use crypto::{encode_stellar_address, verify_stellar_signature, CryptoError};
pub use jwt::{Claims, JwtError, TokenIssuer};
pub use nonce::{generate_nonce, normalize_wallet_address, NonceAuthority};
pub use service::{AuthError, AuthService};
