//! # Cart Commands
//!
//! Cart manipulation from the catalog, book detail and cart pages.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│ Confirmed│       │
//! │  │  Cart    │     │          │     │          │     │ (cleared)│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                   │            │
//! │                   add_to_cart                        confirm_order      │
//! │                   increment / decrement              (order.rs)         │
//! │                   update_cart_item                                      │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────► (back to empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Clamping
//! The cart store accepts any quantity. These commands are the quantity
//! controls: they keep every line within `1..=stock` before calling in.
//!
//! ## Checkout Lock
//! Between `continue_to_confirmation` and the snapshot taken by
//! `confirm_order`, edits are rejected with `CART_ERROR`.

use serde::{Deserialize, Serialize};
use tokio::sync::MutexGuard;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartState, CheckoutState};
use folio_core::validation::{clamp_quantity, validate_quantity};
use folio_core::{Book, Cart, CartLineItem, CartTotals, CoreError};
use folio_db::CartStore;

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

fn line_item(store: &CartStore, id: i64) -> Result<CartLineItem, ApiError> {
    store
        .item(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Cart item", &id.to_string()))
}

/// Locks the cart for an edit, unless an order is awaiting confirmation.
async fn lock_for_edit<'a>(
    cart: &'a CartState,
    checkout: &CheckoutState,
) -> Result<MutexGuard<'a, CartStore>, ApiError> {
    let store = cart.lock().await;
    checkout.lock().await.ensure_cart_editable()?;
    Ok(store)
}

/// Gets the current cart contents.
pub async fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    let store = cart.lock().await;
    CartResponse::from(store.cart())
}

/// Adds a book to the cart.
///
/// ## Behavior
/// - Already in cart: quantity increases
/// - Not in cart: added as a new line with the book's current price
/// - The merged quantity is clamped to the book's stock; a line already at
///   stock is left as is
///
/// ## Errors
/// - `VALIDATION_ERROR` for a quantity below 1
/// - `CART_ERROR` for a book with no stock, or while checkout is locked
pub async fn add_to_cart(
    cart: &CartState,
    checkout: &CheckoutState,
    book: Book,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(book_id = book.id, quantity, "add_to_cart command");

    validate_quantity(quantity)?;
    if !book.is_available() {
        return Err(CoreError::OutOfStock {
            title: book.title.clone(),
        }
        .into());
    }

    let mut store = lock_for_edit(cart, checkout).await?;
    let in_cart = store.item(book.id).map_or(0, |item| item.quantity);
    let room = book.stock - in_cart;
    if room > 0 {
        store.add_to_cart(&book, clamp_quantity(quantity, room)).await?;
    } else {
        debug!(book_id = book.id, in_cart, "Line already at stock");
    }
    Ok(CartResponse::from(store.cart()))
}

/// Sets a line's quantity, clamped to `1..=stock`. Zero or less removes it.
pub async fn update_cart_item(
    cart: &CartState,
    checkout: &CheckoutState,
    id: i64,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(book_id = id, quantity, "update_cart_item command");

    let mut store = lock_for_edit(cart, checkout).await?;
    let item = line_item(&store, id)?;

    let quantity = if quantity <= 0 {
        0
    } else {
        clamp_quantity(quantity, item.stock)
    };
    store.update_quantity(id, quantity).await?;
    Ok(CartResponse::from(store.cart()))
}

/// The `+` button: one more copy, never past stock.
pub async fn increment_cart_item(
    cart: &CartState,
    checkout: &CheckoutState,
    id: i64,
) -> Result<CartResponse, ApiError> {
    debug!(book_id = id, "increment_cart_item command");

    let mut store = lock_for_edit(cart, checkout).await?;
    let item = line_item(&store, id)?;

    if item.can_increment() {
        store.update_quantity(id, item.quantity + 1).await?;
    }
    Ok(CartResponse::from(store.cart()))
}

/// The `-` button: one fewer copy, never below 1.
pub async fn decrement_cart_item(
    cart: &CartState,
    checkout: &CheckoutState,
    id: i64,
) -> Result<CartResponse, ApiError> {
    debug!(book_id = id, "decrement_cart_item command");

    let mut store = lock_for_edit(cart, checkout).await?;
    let item = line_item(&store, id)?;

    if item.can_decrement() {
        store.update_quantity(id, item.quantity - 1).await?;
    }
    Ok(CartResponse::from(store.cart()))
}

/// Removes a line. Unknown ids are a no-op.
pub async fn remove_from_cart(
    cart: &CartState,
    checkout: &CheckoutState,
    id: i64,
) -> Result<CartResponse, ApiError> {
    debug!(book_id = id, "remove_from_cart command");

    let mut store = lock_for_edit(cart, checkout).await?;
    store.remove_from_cart(id).await?;
    Ok(CartResponse::from(store.cart()))
}

pub async fn clear_cart(cart: &CartState, checkout: &CheckoutState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");

    let mut store = lock_for_edit(cart, checkout).await?;
    store.clear_cart().await?;
    Ok(CartResponse::from(store.cart()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_support::{book, state};

    #[tokio::test]
    async fn test_add_and_get() {
        let state = state().await;
        add_to_cart(&state.cart, &state.checkout, book(1, 1500, 5), Some(2)).await.unwrap();
        let cart = add_to_cart(&state.cart, &state.checkout, book(1, 1500, 5), None).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.totals.subtotal.cents(), 4500);
        assert_eq!(get_cart(&state.cart).await, cart);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let state = state().await;

        let err = add_to_cart(&state.cart, &state.checkout, book(1, 1500, 5), Some(0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_to_cart(&state.cart, &state.checkout, book(2, 1500, 0), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.message, "Book 2 is out of stock");

        assert!(get_cart(&state.cart).await.items.is_empty());
    }

    #[tokio::test]
    async fn test_add_clamps_request_to_stock() {
        let state = state().await;
        let cart = add_to_cart(&state.cart, &state.checkout, book(1, 1000, 3), Some(10)).await.unwrap();
        assert_eq!(cart.items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_repeated_add_stops_at_stock() {
        let state = state().await;
        add_to_cart(&state.cart, &state.checkout, book(1, 1000, 2), Some(2)).await.unwrap();
        let cart = add_to_cart(&state.cart, &state.checkout, book(1, 1000, 2), Some(2))
            .await
            .unwrap();
        assert_eq!(cart.items[0].quantity, 2);

        add_to_cart(&state.cart, &state.checkout, book(2, 500, 5), None).await.unwrap();
        let cart = add_to_cart(&state.cart, &state.checkout, book(2, 500, 5), Some(10))
            .await
            .unwrap();
        assert_eq!(cart.items[1].quantity, 5);
        assert_eq!(cart.totals.total_items, 7);
    }

    #[tokio::test]
    async fn test_increment_stops_at_stock() {
        let state = state().await;
        add_to_cart(&state.cart, &state.checkout, book(1, 1000, 2), Some(1)).await.unwrap();

        let cart = increment_cart_item(&state.cart, &state.checkout, 1).await.unwrap();
        assert_eq!(cart.items[0].quantity, 2);
        let cart = increment_cart_item(&state.cart, &state.checkout, 1).await.unwrap();
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_decrement_stops_at_one() {
        let state = state().await;
        add_to_cart(&state.cart, &state.checkout, book(1, 1000, 5), Some(2)).await.unwrap();

        let cart = decrement_cart_item(&state.cart, &state.checkout, 1).await.unwrap();
        assert_eq!(cart.items[0].quantity, 1);
        let cart = decrement_cart_item(&state.cart, &state.checkout, 1).await.unwrap();
        assert_eq!(cart.items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_update_clamps_and_removes() {
        let state = state().await;
        add_to_cart(&state.cart, &state.checkout, book(1, 1000, 4), Some(1)).await.unwrap();

        let cart = update_cart_item(&state.cart, &state.checkout, 1, 99).await.unwrap();
        assert_eq!(cart.items[0].quantity, 4);

        let cart = update_cart_item(&state.cart, &state.checkout, 1, 0).await.unwrap();
        assert!(cart.items.is_empty());

        let err = update_cart_item(&state.cart, &state.checkout, 1, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let state = state().await;
        add_to_cart(&state.cart, &state.checkout, book(1, 1000, 4), None).await.unwrap();
        add_to_cart(&state.cart, &state.checkout, book(2, 2000, 4), None).await.unwrap();

        let cart = remove_from_cart(&state.cart, &state.checkout, 1).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        let cart = remove_from_cart(&state.cart, &state.checkout, 42).await.unwrap();
        assert_eq!(cart.items.len(), 1);

        let cart = clear_cart(&state.cart, &state.checkout).await.unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.totals.total.cents(), 500);
    }

    #[tokio::test]
    async fn test_cart_survives_restart() {
        let state = state().await;
        add_to_cart(&state.cart, &state.checkout, book(7, 1250, 3), Some(2)).await.unwrap();

        let reloaded = CartStore::load(state.db.inner()).await;
        assert_eq!(reloaded.cart().total_items(), 2);
    }
}
