//! Data models for Graso

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

pub mod auth;
pub use auth::*;

/// Challenge bound to a wallet address
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct NonceRecord {
    pub wallet_address: String,
    pub nonce: String,
    /// Set once the wallet creates its profile
    pub profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// User profile model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub description: String,
    pub occupation: String,
    pub phone_number: String,
    pub website: String,
    /// Relative upload path as stored; absolute URL in read responses
    pub picture: String,
    pub created_at: DateTime<Utc>,
}

/// Property listing model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: String,
    /// Relative upload path as stored; absolute URL in read responses
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Fields submitted when creating a profile
#[derive(Debug, Clone, Default, Validate)]
pub struct NewProfile {
    #[validate(length(min = 1, max = 100, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub description: String,
    pub occupation: String,
    #[validate(length(max = 32))]
    pub phone_number: String,
    pub website: String,
}

/// Fields submitted when creating a property
#[derive(Debug, Clone, Default, Validate)]
pub struct NewProperty {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    pub description: String,
    #[validate(length(min = 1, max = 64, message = "price is required"))]
    pub price: String,
}

/// Rewrite a stored relative upload path into an absolute URL
pub fn absolute_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl Profile {
    pub fn with_public_picture(mut self, base_url: &str) -> Self {
        self.picture = absolute_url(base_url, &self.picture);
        self
    }
}

impl Property {
    pub fn with_public_image(mut self, base_url: &str) -> Self {
        self.image = absolute_url(base_url, &self.image);
        self
    }
}
