//! Profile operations

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use super::ServiceError;
use crate::auth::AuthService;
use crate::models::{NewProfile, Profile};
use crate::store::Store;
use crate::uploads::{ImageKind, ImageStore};

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn Store>,
    auth: Arc<AuthService>,
    images: ImageStore,
    public_base_url: String,
}

impl ProfileService {
    pub fn new(
        store: Arc<dyn Store>,
        auth: Arc<AuthService>,
        images: ImageStore,
        public_base_url: String,
    ) -> Self {
        Self {
            store,
            auth,
            images,
            public_base_url,
        }
    }

    /// Create the acting wallet's profile and bind it to the wallet.
    ///
    /// The wallet must have requested a nonce and must not already own a
    /// profile; both are checked before the picture is written.
    pub async fn create_profile(
        &self,
        profile: NewProfile,
        picture_name: &str,
        picture: &[u8],
        acting_wallet: &str,
    ) -> Result<Profile, ServiceError> {
        profile.validate()?;

        let record = self
            .auth
            .find_wallet(acting_wallet)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Wallet authentication record".to_string()))?;
        if record.profile_id.is_some() {
            return Err(ServiceError::Conflict(
                "wallet already has a profile".to_string(),
            ));
        }

        let picture_path = self
            .images
            .save(ImageKind::Profile, picture_name, picture)
            .await?;

        // A concurrent create may have bound the wallet since the check above
        let created = match self
            .auth
            .bind_new_profile(&record.wallet_address, &profile, &picture_path)
            .await
        {
            Ok(created) => created,
            Err(e) => {
                self.images.remove(&picture_path).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            wallet = %record.wallet_address,
            profile_id = %created.id,
            "Profile created"
        );

        Ok(created)
    }

    /// Profile bound to the acting wallet, picture as absolute URL
    pub async fn get_own_profile(&self, acting_wallet: &str) -> Result<Profile, ServiceError> {
        let record = self
            .auth
            .find_wallet(acting_wallet)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Profile".to_string()))?;

        let profile_id = record
            .profile_id
            .ok_or_else(|| ServiceError::NotFound("Profile".to_string()))?;

        self.get_profile(profile_id).await
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<Profile, ServiceError> {
        let profile = self
            .store
            .find_profile(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Profile".to_string()))?;

        Ok(profile.with_public_picture(&self.public_base_url))
    }
}
