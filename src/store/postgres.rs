//! PostgreSQL-backed store

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{NewProfile, NewProperty, NonceRecord, Profile, Property};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_nonce(&self, wallet_address: &str) -> Result<Option<NonceRecord>, StoreError> {
        let record = sqlx::query_as::<_, NonceRecord>(
            r#"
            SELECT wallet_address, nonce, profile_id, created_at
            FROM nonces
            WHERE wallet_address = $1
            "#,
        )
        .bind(wallet_address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_nonce(
        &self,
        wallet_address: &str,
        nonce: &str,
    ) -> Result<NonceRecord, StoreError> {
        let record = sqlx::query_as::<_, NonceRecord>(
            r#"
            INSERT INTO nonces (wallet_address, nonce, created_at)
            VALUES ($1, $2, $3)
            RETURNING wallet_address, nonce, profile_id, created_at
            "#,
        )
        .bind(wallet_address)
        .bind(nonce)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn replace_nonce(&self, wallet_address: &str, nonce: &str) -> Result<(), StoreError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE nonces SET nonce = $2 WHERE wallet_address = $1
            "#,
        )
        .bind(wallet_address)
        .bind(nonce)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn create_profile_for_wallet(
        &self,
        wallet_address: &str,
        profile: &NewProfile,
        picture: &str,
    ) -> Result<Profile, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Lock the wallet's row so concurrent creates serialize here
        let bound: Option<(Option<Uuid>,)> = sqlx::query_as(
            r#"
            SELECT profile_id FROM nonces WHERE wallet_address = $1 FOR UPDATE
            "#,
        )
        .bind(wallet_address)
        .fetch_optional(&mut *tx)
        .await?;

        match bound {
            None => return Err(StoreError::NotFound),
            Some((Some(_),)) => {
                return Err(StoreError::Conflict(
                    "wallet already has a profile".to_string(),
                ))
            }
            Some((None,)) => {}
        }

        let created = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, first_name, last_name, email, description, occupation, phone_number, website, picture, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, first_name, last_name, email, description, occupation, phone_number, website, picture, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.description)
        .bind(&profile.occupation)
        .bind(&profile.phone_number)
        .bind(&profile.website)
        .bind(picture)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE nonces SET profile_id = $2 WHERE wallet_address = $1
            "#,
        )
        .bind(wallet_address)
        .bind(created.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, first_name, last_name, email, description, occupation, phone_number, website, picture, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn insert_property(
        &self,
        property: &NewProperty,
        image: &str,
    ) -> Result<Property, StoreError> {
        let created = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (id, title, description, price, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, price, image, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.price)
        .bind(image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_property(&self, id: Uuid) -> Result<Option<Property>, StoreError> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, title, description, price, image, created_at
            FROM properties
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn list_properties(&self) -> Result<Vec<Property>, StoreError> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, title, description, price, image, created_at
            FROM properties
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
