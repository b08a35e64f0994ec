//! Property listing operations
//!
//! Listings are public to every token holder and carry no owner.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use super::ServiceError;
use crate::models::{NewProperty, Property};
use crate::store::Store;
use crate::uploads::{ImageKind, ImageStore};

#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn Store>,
    images: ImageStore,
    public_base_url: String,
}

impl PropertyService {
    pub fn new(store: Arc<dyn Store>, images: ImageStore, public_base_url: String) -> Self {
        Self {
            store,
            images,
            public_base_url,
        }
    }

    pub async fn create_property(
        &self,
        property: NewProperty,
        image_name: &str,
        image: &[u8],
    ) -> Result<Property, ServiceError> {
        property.validate()?;

        let image_path = self
            .images
            .save(ImageKind::Property, image_name, image)
            .await?;

        match self.store.insert_property(&property, &image_path).await {
            Ok(created) => {
                tracing::info!(property_id = %created.id, "Property created");
                Ok(created)
            }
            Err(e) => {
                self.images.remove(&image_path).await;
                Err(e.into())
            }
        }
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>, ServiceError> {
        let properties = self.store.list_properties().await?;
        Ok(properties
            .into_iter()
            .map(|p| p.with_public_image(&self.public_base_url))
            .collect())
    }

    pub async fn get_property(&self, id: Uuid) -> Result<Property, ServiceError> {
        self.store
            .find_property(id)
            .await?
            .map(|p| p.with_public_image(&self.public_base_url))
            .ok_or_else(|| ServiceError::NotFound("Property".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service(dir: &tempfile::TempDir) -> PropertyService {
        PropertyService::new(
            Arc::new(MemoryStore::new()),
            ImageStore::new(dir.path(), 1024),
            "https://api.example.com".to_string(),
        )
    }

    fn listing(title: &str) -> NewProperty {
        NewProperty {
            title: title.to_string(),
            description: "Sea view".to_string(),
            price: "250000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_rewrites_image_urls() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let created = service
            .create_property(listing("Villa"), "villa.jpg", b"jpeg")
            .await
            .unwrap();
        service
            .create_property(listing("Cabin"), "cabin.webp", b"webp")
            .await
            .unwrap();

        let listed = service.list_properties().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "Villa");
        assert_eq!(
            listed[0].image,
            format!("https://api.example.com/{}", created.image)
        );
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(service(&dir).list_properties().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_property() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        let created = service
            .create_property(listing("Villa"), "villa.jpg", b"jpeg")
            .await
            .unwrap();

        let fetched = service.get_property(created.id).await.unwrap();
        assert_eq!(fetched.title, "Villa");

        let missing = service.get_property(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_image_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = service(&dir)
            .create_property(listing("Villa"), "villa.jpg", b"")
            .await;
        assert!(matches!(result, Err(ServiceError::Upload(_))));
    }
}
