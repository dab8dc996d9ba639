//! # Cart
//!
//! The shopping cart and its line items.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Frontend Action          Operation                 Cart Change         │
//! │  ───────────────          ─────────                 ───────────         │
//! │                                                                         │
//! │  "Add to cart" ─────────► add_to_cart() ──────────► push or qty += n    │
//! │                                                                         │
//! │  +/- buttons ───────────► update_quantity() ──────► qty = n (≤0 drops)  │
//! │                                                                         │
//! │  Trash icon ────────────► remove_from_cart() ─────► retain(id != x)     │
//! │                                                                         │
//! │  Order confirmed ───────► clear() ────────────────► items.clear()       │
//! │                                                                         │
//! │  NOTE: The cart never clamps to stock. The quantity controls do that    │
//! │        before calling in (see validation::clamp_quantity).              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence lives in `folio-db` (`CartStore`); this type only holds the
//! items and the math.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Book;
use crate::{FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD};

/// One book in the cart.
///
/// Book fields are copied when the item is added so the cart keeps
/// displaying the same title and price after a catalog refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Book identifier, unique within the cart.
    pub id: i64,
    pub title: String,
    pub author: String,
    pub image: String,
    /// Unit price at time of adding.
    pub price: Money,
    /// Maximum orderable quantity.
    pub stock: i64,
    /// Copies in the cart, always ≥ 1.
    pub quantity: i64,
}

impl CartLineItem {
    /// Creates a line item from a book and quantity.
    pub fn from_book(book: &Book, quantity: i64) -> Self {
        CartLineItem {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            image: book.image.clone(),
            price: book.price,
            stock: book.stock,
            quantity,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// Whether the increment control is enabled.
    pub fn can_increment(&self) -> bool {
        self.quantity < self.stock
    }

    /// Whether the decrement control is enabled.
    pub fn can_decrement(&self) -> bool {
        self.quantity > 1
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same book increases quantity)
/// - Quantity is ≥ 1 (setting it to 0 or below removes the item)
/// - Insertion order is preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from previously persisted items.
    ///
    /// Duplicate ids are merged and items with quantity below 1 are dropped.
    /// A well-formed payload comes back unchanged.
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            if item.quantity < 1 {
                continue;
            }
            match cart.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Adds a book, or increases its quantity if already present.
    ///
    /// No upper clamp is enforced here. A non-positive `quantity` is ignored
    /// so the quantity ≥ 1 invariant holds.
    pub fn add_to_cart(&mut self, book: &Book, quantity: i64) {
        if quantity < 1 {
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == book.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartLineItem::from_book(book, quantity));
    }

    /// Removes the item with `id`. Returns whether anything was removed.
    pub fn remove_from_cart(&mut self, id: i64) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != initial_len
    }

    /// Sets an item's quantity verbatim; `new_quantity ≤ 0` removes it.
    ///
    /// Returns whether the cart changed. Unknown ids are a no-op.
    pub fn update_quantity(&mut self, id: i64, new_quantity: i64) -> bool {
        if new_quantity <= 0 {
            return self.remove_from_cart(id);
        }

        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) if item.quantity != new_quantity => {
                item.quantity = new_quantity;
                true
            }
            _ => false,
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Looks up a line item by book id.
    pub fn item(&self, id: i64) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Number of distinct books.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Free above $50.00 (strictly), otherwise a flat $5.00.
    ///
    /// An empty cart still reports the flat fee.
    pub fn shipping(&self) -> Money {
        if self.subtotal() > FREE_SHIPPING_THRESHOLD {
            Money::zero()
        } else {
            FLAT_SHIPPING_FEE
        }
    }

    /// Subtotal plus shipping.
    pub fn total(&self) -> Money {
        self.subtotal() + self.shipping()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart totals summary for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_items: i64,
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
    pub free_shipping: bool,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let shipping = cart.shipping();
        CartTotals {
            item_count: cart.item_count(),
            total_items: cart.total_items(),
            subtotal: cart.subtotal(),
            shipping,
            total: cart.total(),
            free_shipping: shipping.is_zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_book(id: i64, price_cents: i64, stock: i64) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Anonymous".to_string(),
            image: format!("https://covers.example/{}.jpg", id),
            price: Money::from_cents(price_cents),
            stock,
        }
    }

    #[test]
    fn test_add_same_book_accumulates_quantity() {
        let mut cart = Cart::new();
        let book = test_book(1, 2250, 15);

        cart.add_to_cart(&book, 1);
        cart.add_to_cart(&book, 3);
        cart.add_to_cart(&book, 2);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.item(1).unwrap().quantity, 6);
        assert_eq!(cart.total_items(), 6);
    }

    #[test]
    fn test_add_does_not_clamp_to_stock() {
        let mut cart = Cart::new();
        let book = test_book(1, 1000, 2);

        cart.add_to_cart(&book, 2);
        cart.add_to_cart(&book, 3);

        assert_eq!(cart.item(1).unwrap().quantity, 5);
        assert!(!cart.item(1).unwrap().can_increment());
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let mut cart = Cart::new();
        let book = test_book(1, 1000, i64::MAX);

        cart.add_to_cart(&book, i64::MAX - 1);
        cart.add_to_cart(&book, 5);
        assert_eq!(cart.item(1).unwrap().quantity, i64::MAX);
        assert_eq!(cart.subtotal().cents(), i64::MAX);
        assert_eq!(cart.total().cents(), i64::MAX);
    }

    #[test]
    fn test_add_ignores_non_positive_quantity() {
        let mut cart = Cart::new();
        cart.add_to_cart(&test_book(1, 1000, 5), 0);
        cart.add_to_cart(&test_book(2, 1000, 5), -2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_to_cart(&test_book(3, 100, 5), 1);
        cart.add_to_cart(&test_book(1, 100, 5), 1);
        cart.add_to_cart(&test_book(3, 100, 5), 1);

        let ids: Vec<i64> = cart.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let book_a = test_book(1, 1800, 10);
        let book_b = test_book(2, 2250, 10);

        let mut via_update = Cart::new();
        via_update.add_to_cart(&book_a, 2);
        via_update.add_to_cart(&book_b, 1);

        let mut via_remove = via_update.clone();

        assert!(via_update.update_quantity(1, 0));
        assert!(via_remove.remove_from_cart(1));
        assert_eq!(via_update, via_remove);
        assert!(via_update.item(1).is_none());

        // Negative quantities remove too
        assert!(via_update.update_quantity(2, -1));
        assert!(via_update.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_verbatim() {
        let mut cart = Cart::new();
        cart.add_to_cart(&test_book(1, 1000, 3), 1);

        assert!(cart.update_quantity(1, 7));
        assert_eq!(cart.item(1).unwrap().quantity, 7);
        assert!(!cart.update_quantity(1, 7));
        assert!(!cart.update_quantity(99, 2));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add_to_cart(&test_book(1, 1000, 3), 1);
        assert!(!cart.remove_from_cart(42));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let mut cart = Cart::new();
        cart.add_to_cart(&test_book(1, 2250, 10), 2); // 45.00
        cart.add_to_cart(&test_book(2, 1995, 10), 3); // 59.85

        assert_eq!(cart.subtotal().cents(), 4500 + 5985);
        assert_eq!(cart.item(2).unwrap().line_total().cents(), 5985);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(cart.subtotal().cents(), 0);
        assert_eq!(cart.shipping().cents(), 500);
        assert_eq!(cart.total().cents(), 500);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_shipping_threshold_is_strict() {
        let mut at_threshold = Cart::new();
        at_threshold.add_to_cart(&test_book(1, 5000, 5), 1);
        assert_eq!(at_threshold.shipping().cents(), 500);
        assert_eq!(at_threshold.total().cents(), 5500);

        let mut above = Cart::new();
        above.add_to_cart(&test_book(1, 5001, 5), 1);
        assert!(above.shipping().is_zero());
        assert_eq!(above.total().cents(), 5001);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_to_cart(&test_book(1, 999, 4), 2);
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut cart = Cart::new();
        cart.add_to_cart(&test_book(4, 1200, 8), 2);

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"quantity\":2"));

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_from_items_repairs_invariants() {
        let book = test_book(1, 1000, 10);
        let mut dup = CartLineItem::from_book(&book, 2);
        let zero = CartLineItem::from_book(&test_book(2, 500, 1), 0);

        let cart = Cart::from_items(vec![dup.clone(), zero, {
            dup.quantity = 3;
            dup
        }]);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.item(1).unwrap().quantity, 5);
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = Cart::new();
        cart.add_to_cart(&test_book(1, 3000, 5), 2);

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_items, 2);
        assert_eq!(totals.subtotal.cents(), 6000);
        assert!(totals.free_shipping);
        assert_eq!(totals.total.cents(), 6000);
    }
}
