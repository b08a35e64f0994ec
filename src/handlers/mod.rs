//! API handlers for Graso backend

pub mod auth;
mod form;
pub mod health;
pub mod profile;
pub mod property;

pub use auth::*;
pub use health::{health_check, root};
pub use profile::*;
pub use property::*;

// Re-export AuthenticatedWallet from middleware for handler use
pub use crate::middleware::auth::AuthenticatedWallet;
