//! Token-gated resource operations
//!
//! Callers have already resolved the bearer token into a wallet address.

pub mod profile;
pub mod property;

use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;
use crate::uploads::UploadError;

pub use profile::ProfileService;
pub use property::PropertyService;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ServiceError::NotFound("Record".to_string()),
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            StoreError::Database(msg) => ServiceError::Storage(msg),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NonceNotFound => {
                ServiceError::NotFound("Wallet authentication record".to_string())
            }
            AuthError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Storage(other.to_string()),
        }
    }
}
