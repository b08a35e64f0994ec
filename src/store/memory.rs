//! In-process store, used by tests

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{NewProfile, NewProperty, NonceRecord, Profile, Property};

#[derive(Default)]
struct Tables {
    nonces: HashMap<String, NonceRecord>,
    profiles: HashMap<Uuid, Profile>,
    properties: Vec<Property>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_nonce(&self, wallet_address: &str) -> Result<Option<NonceRecord>, StoreError> {
        Ok(self.tables.read().await.nonces.get(wallet_address).cloned())
    }

    async fn insert_nonce(
        &self,
        wallet_address: &str,
        nonce: &str,
    ) -> Result<NonceRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.nonces.contains_key(wallet_address) {
            return Err(StoreError::Conflict(format!(
                "nonce already exists for {}",
                wallet_address
            )));
        }

        let record = NonceRecord {
            wallet_address: wallet_address.to_string(),
            nonce: nonce.to_string(),
            profile_id: None,
            created_at: Utc::now(),
        };
        tables
            .nonces
            .insert(wallet_address.to_string(), record.clone());
        Ok(record)
    }

    async fn replace_nonce(&self, wallet_address: &str, nonce: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .nonces
            .get_mut(wallet_address)
            .ok_or(StoreError::NotFound)?;
        record.nonce = nonce.to_string();
        Ok(())
    }

    async fn create_profile_for_wallet(
        &self,
        wallet_address: &str,
        profile: &NewProfile,
        picture: &str,
    ) -> Result<Profile, StoreError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .nonces
            .get_mut(wallet_address)
            .ok_or(StoreError::NotFound)?;

        if record.profile_id.is_some() {
            return Err(StoreError::Conflict(
                "wallet already has a profile".to_string(),
            ));
        }

        let created = Profile {
            id: Uuid::new_v4(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            description: profile.description.clone(),
            occupation: profile.occupation.clone(),
            phone_number: profile.phone_number.clone(),
            website: profile.website.clone(),
            picture: picture.to_string(),
            created_at: Utc::now(),
        };
        record.profile_id = Some(created.id);
        tables.profiles.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn insert_property(
        &self,
        property: &NewProperty,
        image: &str,
    ) -> Result<Property, StoreError> {
        let created = Property {
            id: Uuid::new_v4(),
            title: property.title.clone(),
            description: property.description.clone(),
            price: property.price.clone(),
            image: image.to_string(),
            created_at: Utc::now(),
        };
        self.tables.write().await.properties.push(created.clone());
        Ok(created)
    }

    async fn find_property(&self, id: Uuid) -> Result<Option<Property>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_properties(&self) -> Result<Vec<Property>, StoreError> {
        Ok(self.tables.read().await.properties.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
