//! # Cart Store
//!
//! The persisted cart: an in-memory [`Cart`] that writes itself back to the
//! `cart` storage key after every mutation.
//!
//! ## Persistence Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartStore::load(&db)                                                  │
//! │       │                                                                 │
//! │       ├── key missing ─────────────────────► empty cart                 │
//! │       ├── read fails / JSON malformed ─────► warn! + empty cart         │
//! │       └── JSON array ──► Cart::from_items ─► rehydrated cart            │
//! │                                                                         │
//! │  store.add_to_cart(&book, 1).await                                     │
//! │       │                                                                 │
//! │       ├── 1. mutate the in-memory cart                                 │
//! │       └── 2. write the whole cart to "cart" before returning           │
//! │                 │                                                       │
//! │                 └── write fails ──► DbError (mutation already applied) │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loading never fails; a corrupt payload is not the shopper's problem.

use tracing::{debug, warn};

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::storage::{keys, LocalStorage};
use folio_core::{Book, Cart, CartLineItem, CartTotals};

/// Owner of the live cart. One per storefront process.
#[derive(Debug, Clone)]
pub struct CartStore {
    storage: LocalStorage,
    cart: Cart,
}

impl CartStore {
    /// Rehydrates the cart from local storage, or starts empty.
    pub async fn load(db: &Database) -> Self {
        let storage = db.storage();

        let cart = match storage.get_item(keys::CART).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(items) => {
                    let cart = Cart::from_items(items);
                    debug!(items = cart.item_count(), "Cart rehydrated");
                    cart
                }
                Err(e) => {
                    warn!(error = %e, "Stored cart is malformed, starting with an empty cart");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Could not read stored cart, starting with an empty cart");
                Cart::new()
            }
        };

        CartStore { storage, cart }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    pub fn item(&self, id: i64) -> Option<&CartLineItem> {
        self.cart.item(id)
    }

    pub async fn add_to_cart(&mut self, book: &Book, quantity: i64) -> DbResult<()> {
        self.cart.add_to_cart(book, quantity);
        debug!(book_id = book.id, quantity, "Added to cart");
        self.persist().await
    }

    /// Returns whether the item was present.
    pub async fn remove_from_cart(&mut self, id: i64) -> DbResult<bool> {
        let removed = self.cart.remove_from_cart(id);
        debug!(book_id = id, removed, "Removed from cart");
        self.persist().await?;
        Ok(removed)
    }

    /// Sets a quantity verbatim; `<= 0` removes the item.
    pub async fn update_quantity(&mut self, id: i64, quantity: i64) -> DbResult<bool> {
        let changed = self.cart.update_quantity(id, quantity);
        debug!(book_id = id, quantity, changed, "Updated cart quantity");
        self.persist().await?;
        Ok(changed)
    }

    pub async fn clear_cart(&mut self) -> DbResult<()> {
        self.cart.clear();
        debug!("Cart cleared");
        self.persist().await
    }

    async fn persist(&self) -> DbResult<()> {
        self.storage.set_json(keys::CART, &self.cart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use folio_core::Money;

    fn book(id: i64, cents: i64, stock: i64) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Author".to_string(),
            image: format!("https://covers.example/{}.jpg", id),
            price: Money::from_cents(cents),
            stock,
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_starts_empty_without_stored_cart() {
        let db = db().await;
        let store = CartStore::load(&db).await;
        assert!(store.cart().is_empty());
        assert_eq!(store.totals().total.cents(), 500);
    }

    #[tokio::test]
    async fn test_every_mutation_is_persisted() {
        let db = db().await;
        let mut store = CartStore::load(&db).await;

        store.add_to_cart(&book(1, 1500, 5), 2).await.unwrap();
        store.add_to_cart(&book(2, 999, 1), 1).await.unwrap();
        let raw = db.storage().get_item("cart").await.unwrap().unwrap();
        let stored: Vec<CartLineItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].quantity, 2);

        store.update_quantity(1, 3).await.unwrap();
        store.remove_from_cart(2).await.unwrap();
        let reloaded = CartStore::load(&db).await;
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.item(1).unwrap().quantity, 3);

        store.clear_cart().await.unwrap();
        assert_eq!(db.storage().get_item("cart").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_persist_then_load_reproduces_items() {
        let db = db().await;
        let mut store = CartStore::load(&db).await;
        store.add_to_cart(&book(3, 2250, 15), 1).await.unwrap();
        store.add_to_cart(&book(4, 1299, 2), 2).await.unwrap();
        store.add_to_cart(&book(3, 2250, 15), 1).await.unwrap();

        let reloaded = CartStore::load(&db).await;
        assert_eq!(reloaded.cart().items(), store.cart().items());
        assert_eq!(reloaded.cart().total_items(), 4);
    }

    #[tokio::test]
    async fn test_malformed_cart_loads_empty() {
        let db = db().await;
        db.storage().set_item("cart", "{not an array").await.unwrap();

        let store = CartStore::load(&db).await;
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_tampered_cart_is_normalized() {
        let db = db().await;
        let item = CartLineItem::from_book(&book(1, 1000, 9), 2);
        let zero = CartLineItem {
            quantity: 0,
            ..CartLineItem::from_book(&book(2, 500, 9), 1)
        };
        let payload = serde_json::to_string(&vec![item.clone(), item, zero]).unwrap();
        db.storage().set_item("cart", &payload).await.unwrap();

        let store = CartStore::load(&db).await;
        assert_eq!(store.cart().item_count(), 1);
        assert_eq!(store.item(1).unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_change() {
        let db = db().await;
        let mut store = CartStore::load(&db).await;
        db.close().await;

        let result = store.add_to_cart(&book(1, 1000, 3), 1).await;
        assert!(result.is_err());
        assert_eq!(store.cart().total_items(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_loads_empty() {
        let db = db().await;
        db.close().await;
        let store = CartStore::load(&db).await;
        assert!(store.cart().is_empty());
    }
}
