//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::config::Config;
use crate::services::{ProfileService, PropertyService};
use crate::store::Store;
use crate::uploads::ImageStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub property_service: Arc<PropertyService>,
    pub images: ImageStore,
}

impl AppState {
    /// Wire every service on top of `store` using the loaded configuration
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        let images = ImageStore::new(&config.upload_dir, config.max_upload_bytes);

        let auth_service = Arc::new(AuthService::new(
            store.clone(),
            &config.jwt_secret,
            config.access_token_ttl_seconds,
            config.rotate_nonce_on_verify,
        ));

        let profile_service = Arc::new(ProfileService::new(
            store.clone(),
            auth_service.clone(),
            images.clone(),
            config.public_base_url.clone(),
        ));

        let property_service = Arc::new(PropertyService::new(
            store.clone(),
            images.clone(),
            config.public_base_url.clone(),
        ));

        Self {
            store,
            auth_service,
            profile_service,
            property_service,
            images,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
