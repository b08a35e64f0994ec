//! Persistence interface for nonces, profiles and properties
//!
//! Services only talk to the [`Store`] trait. [`PgStore`] backs production;
//! [`MemoryStore`] backs tests and local experiments.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewProfile, NewProperty, NonceRecord, Profile, Property};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Database(e.to_string()),
        }
    }
}

/// Typed record storage. Each call is a single atomic write or read.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_nonce(&self, wallet_address: &str) -> Result<Option<NonceRecord>, StoreError>;

    /// Fails with `Conflict` if the wallet already has a record.
    async fn insert_nonce(
        &self,
        wallet_address: &str,
        nonce: &str,
    ) -> Result<NonceRecord, StoreError>;

    async fn replace_nonce(&self, wallet_address: &str, nonce: &str) -> Result<(), StoreError>;

    /// Insert a profile and bind it to the wallet's record in one atomic
    /// step. `NotFound` without a record, `Conflict` if a profile is already
    /// bound; in both cases nothing is written.
    async fn create_profile_for_wallet(
        &self,
        wallet_address: &str,
        profile: &NewProfile,
        picture: &str,
    ) -> Result<Profile, StoreError>;

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    async fn insert_property(
        &self,
        property: &NewProperty,
        image: &str,
    ) -> Result<Property, StoreError>;

    async fn find_property(&self, id: Uuid) -> Result<Option<Property>, StoreError>;

    /// Oldest first.
    async fn list_properties(&self) -> Result<Vec<Property>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
