//! # Local Storage Repository
//!
//! String keys to string values, with JSON helpers on top.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Storage keys used by the storefront.
pub mod keys {
    pub const CART: &str = "cart";
    pub const USER_ID: &str = "user_id";
    pub const IS_ADMIN: &str = "is_admin";
    pub const CHECKOUT_SHIPPING: &str = "checkoutShipping";
    pub const CHECKOUT_PAYMENT: &str = "checkoutPayment";
}

/// Repository over the `local_storage` table.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    pool: SqlitePool,
}

impl LocalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        LocalStorage { pool }
    }

    /// Reads a value. `None` when the key is absent.
    pub async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM local_storage WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Writes a value, replacing any previous one.
    pub async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing local storage key");

        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a key. Returns whether it existed.
    pub async fn remove_item(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes several keys in one transaction.
    pub async fn remove_items(&self, keys: &[&str]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;

        for key in keys {
            let result = sqlx::query("DELETE FROM local_storage WHERE key = ?")
                .bind(*key)
                .execute(&mut *tx)
                .await?;
            removed += result.rows_affected();
        }

        tx.commit().await?;
        debug!(count = removed, "Removed local storage keys");
        Ok(removed)
    }

    /// Reads and parses a JSON value.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get_item(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DbError::serialization(key, e)),
            None => Ok(None),
        }
    }

    /// Serializes a value to JSON and writes it.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| DbError::serialization(key, e))?;
        self.set_item(key, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn storage() -> LocalStorage {
        Database::new(DbConfig::in_memory()).await.unwrap().storage()
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = storage().await;
        assert_eq!(storage.get_item("user_id").await.unwrap(), None);

        storage.set_item("user_id", "42").await.unwrap();
        assert_eq!(storage.get_item("user_id").await.unwrap().as_deref(), Some("42"));

        storage.set_item("user_id", "43").await.unwrap();
        assert_eq!(storage.get_item("user_id").await.unwrap().as_deref(), Some("43"));

        assert!(storage.remove_item("user_id").await.unwrap());
        assert!(!storage.remove_item("user_id").await.unwrap());
        assert_eq!(storage.get_item("user_id").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_items() {
        let storage = storage().await;
        storage.set_item(keys::CHECKOUT_SHIPPING, "{}").await.unwrap();
        storage.set_item(keys::CHECKOUT_PAYMENT, "card").await.unwrap();
        storage.set_item(keys::CART, "[]").await.unwrap();

        let removed = storage
            .remove_items(&[keys::CHECKOUT_SHIPPING, keys::CHECKOUT_PAYMENT])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(storage.get_item(keys::CART).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let storage = storage().await;
        storage.set_json("numbers", &vec![1, 2, 3]).await.unwrap();
        let numbers: Option<Vec<i32>> = storage.get_json("numbers").await.unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        storage.set_item("numbers", "not json").await.unwrap();
        let err = storage.get_json::<Vec<i32>>("numbers").await.unwrap_err();
        assert!(matches!(err, DbError::Serialization { ref key, .. } if key == "numbers"));
    }
}
