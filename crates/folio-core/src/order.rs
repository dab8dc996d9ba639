//! # Order Confirmation
//!
//! Order numbers and the receipt snapshot taken at confirmation.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  live cart ──► Confirmation::observe ──► OrderSnapshot (owned copy)    │
//! │      │               │                          │                       │
//! │      │               │ later calls return        │ receipt renders      │
//! │      │               │ the same snapshot         │ from here only       │
//! │      ▼               ▼                          ▼                       │
//! │  cart cleared    no second capture        unaffected by the clear      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Receipt totals carry no discount: the discount code lives on the checkout
//! page and is gone by the time the receipt renders. Tax is 8% of the
//! subtotal and shipping is the cart's own shipping charge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartLineItem};
use crate::money::Money;
use crate::types::PaymentMethodKind;
use crate::validation::ShippingForm;
use crate::SALES_TAX_RATE;

// =============================================================================
// Order Number
// =============================================================================

/// Cosmetic order number, `ML-{unix_millis}-{suffix}` with suffix in `0..1000`.
///
/// Not persisted and not checked for collisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub fn new(unix_millis: i64, suffix: u16) -> Self {
        OrderNumber(format!("ML-{}-{}", unix_millis, suffix % 1000))
    }

    /// Builds an order number from the current time and random bits.
    pub fn generate() -> Self {
        let suffix = (Uuid::new_v4().as_u128() % 1000) as u16;
        OrderNumber::new(Utc::now().timestamp_millis(), suffix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Immutable copy of the cart taken when the order is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSnapshot {
    pub order_number: OrderNumber,
    pub items: Vec<CartLineItem>,
    pub total_items: i64,
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    #[ts(type = "string")]
    pub captured_at: DateTime<Utc>,
}

impl OrderSnapshot {
    /// Copies `cart` into a snapshot. Returns `None` for an empty cart.
    pub fn capture(cart: &Cart, order_number: OrderNumber, captured_at: DateTime<Utc>) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        let subtotal = cart.subtotal();
        let shipping = cart.shipping();
        let tax = subtotal.calculate_tax(SALES_TAX_RATE);

        Some(OrderSnapshot {
            order_number,
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
            captured_at,
        })
    }
}

/// Holds the snapshot for the confirmation step; captures at most once.
#[derive(Debug, Clone, Default)]
pub struct Confirmation {
    snapshot: Option<OrderSnapshot>,
}

impl Confirmation {
    pub fn new() -> Self {
        Confirmation::default()
    }

    /// Captures the cart on the first call that sees a non-empty cart.
    ///
    /// Every later call returns the first snapshot, whatever the cart holds.
    pub fn observe(&mut self, cart: &Cart) -> Option<&OrderSnapshot> {
        if self.snapshot.is_none() {
            self.snapshot = OrderSnapshot::capture(cart, OrderNumber::generate(), Utc::now());
        }
        self.snapshot.as_ref()
    }

    pub fn snapshot(&self) -> Option<&OrderSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_captured(&self) -> bool {
        self.snapshot.is_some()
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// What the confirmation page renders: the snapshot plus the checkout draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderReceipt {
    pub snapshot: OrderSnapshot,
    pub shipping: ShippingForm,
    pub payment_method: PaymentMethodKind,
    pub payment_label: String,
}

impl OrderReceipt {
    pub fn new(snapshot: OrderSnapshot, shipping: ShippingForm, payment_method: PaymentMethodKind) -> Self {
        OrderReceipt {
            snapshot,
            shipping,
            payment_method,
            payment_label: payment_method.label().to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Book;

    fn book(id: i64, cents: i64) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Anon".to_string(),
            image: String::new(),
            price: Money::from_cents(cents),
            stock: 10,
        }
    }

    #[test]
    fn test_order_number_format() {
        let number = OrderNumber::new(1_700_000_000_000, 42);
        assert_eq!(number.as_str(), "ML-1700000000000-42");

        let generated = OrderNumber::generate();
        let parts: Vec<&str> = generated.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ML");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u16>().unwrap() < 1000);
    }

    #[test]
    fn test_capture_empty_cart() {
        let snapshot = OrderSnapshot::capture(&Cart::new(), OrderNumber::new(1, 1), Utc::now());
        assert!(snapshot.is_none());
    }

    #[test]
    fn test_snapshot_totals_ignore_discounts() {
        let mut cart = Cart::new();
        cart.add_to_cart(&book(1, 2000), 1);

        let snapshot = OrderSnapshot::capture(&cart, OrderNumber::new(1, 1), Utc::now()).unwrap();
        assert_eq!(snapshot.subtotal.cents(), 2000);
        assert_eq!(snapshot.shipping.cents(), 500);
        assert_eq!(snapshot.tax.cents(), 160);
        assert_eq!(snapshot.total.cents(), 2660);
        assert_eq!(snapshot.total_items, 1);
    }

    #[test]
    fn test_observe_captures_once() {
        let mut cart = Cart::new();
        cart.add_to_cart(&book(1, 3000), 2);

        let mut confirmation = Confirmation::new();
        let first = confirmation.observe(&cart).cloned().unwrap();

        cart.clear();
        cart.add_to_cart(&book(2, 100), 1);
        let second = confirmation.observe(&cart).unwrap();

        assert_eq!(&first, second);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id, 1);
        assert_eq!(second.subtotal.cents(), 6000);
        assert!(second.shipping.is_zero());
    }

    #[test]
    fn test_observe_waits_for_items() {
        let mut confirmation = Confirmation::new();
        assert!(confirmation.observe(&Cart::new()).is_none());
        assert!(!confirmation.is_captured());

        let mut cart = Cart::new();
        cart.add_to_cart(&book(1, 1000), 1);
        assert!(confirmation.observe(&cart).is_some());
        assert!(confirmation.is_captured());
    }

    #[test]
    fn test_receipt_label() {
        let mut cart = Cart::new();
        cart.add_to_cart(&book(1, 1000), 1);
        let snapshot = OrderSnapshot::capture(&cart, OrderNumber::new(1, 1), Utc::now()).unwrap();

        let receipt = OrderReceipt::new(snapshot, ShippingForm::default(), PaymentMethodKind::Paypal);
        assert_eq!(receipt.payment_label, "PayPal");
    }
}
