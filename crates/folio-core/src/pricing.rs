//! # Order Summary Pricing
//!
//! Discount codes and the totals shown in the checkout order summary.
//!
//! ## Totals Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart.subtotal() ───────────┬──────────────────────────────► subtotal   │
//! │                             │                                           │
//! │                             ▼                                           │
//! │           percentage code? subtotal × pct ─────────────────► discount   │
//! │                             │                                           │
//! │                             ▼                                           │
//! │                  subtotal − discount ──────────────────────► taxable    │
//! │                             │                                           │
//! │                             ▼                                           │
//! │                        taxable × 8% ───────────────────────► tax        │
//! │                                                                         │
//! │  cart.shipping(), or 0 under a shipping waiver ────────────► shipping   │
//! │                                                                         │
//! │  total = subtotal − discount + shipping + tax                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The summary only reads the cart. Its applied code is page-scoped state
//! owned by the checkout session.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::SALES_TAX_RATE;

/// What a discount code does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export)]
pub enum DiscountKind {
    /// Reduces the taxable subtotal by `bps` basis points.
    Percentage { bps: u32 },
    /// Zeroes the shipping charge.
    FreeShipping,
}

struct DiscountRule {
    code: &'static str,
    kind: DiscountKind,
    description: &'static str,
}

const DISCOUNT_CODES: &[DiscountRule] = &[
    DiscountRule {
        code: "DESC10",
        kind: DiscountKind::Percentage { bps: 1000 },
        description: "10% off",
    },
    DiscountRule {
        code: "DESC20",
        kind: DiscountKind::Percentage { bps: 2000 },
        description: "20% off",
    },
    DiscountRule {
        code: "ENVIOGRATIS",
        kind: DiscountKind::FreeShipping,
        description: "Free shipping",
    },
];

/// A code that has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppliedDiscount {
    /// Normalized (upper-case) code.
    pub code: String,
    pub kind: DiscountKind,
    pub description: String,
}

impl AppliedDiscount {
    /// Looks a code up in the discount table, case-insensitively.
    pub fn lookup(code: &str) -> Option<Self> {
        let normalized = code.trim().to_uppercase();
        DISCOUNT_CODES
            .iter()
            .find(|rule| rule.code == normalized)
            .map(|rule| AppliedDiscount {
                code: rule.code.to_string(),
                kind: rule.kind,
                description: rule.description.to_string(),
            })
    }
}

/// Totals shown in the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub taxable_amount: Money,
    pub tax: Money,
    pub total: Money,
}

/// Order summary state: at most one applied discount code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    applied: Option<AppliedDiscount>,
}

impl OrderSummary {
    pub fn new() -> Self {
        OrderSummary::default()
    }

    /// Applies a discount code.
    ///
    /// ## Errors
    /// - `DiscountAlreadyApplied` when a code is active (remove it first)
    /// - `InvalidDiscountCode` when the code is unknown
    pub fn apply_discount(&mut self, code: &str) -> CoreResult<&AppliedDiscount> {
        if let Some(active) = &self.applied {
            return Err(CoreError::DiscountAlreadyApplied {
                active: active.code.clone(),
            });
        }

        let discount = AppliedDiscount::lookup(code)
            .ok_or_else(|| CoreError::InvalidDiscountCode(code.trim().to_string()))?;

        let applied = self.applied.insert(discount);
        Ok(&*applied)
    }

    /// Clears the applied code, returning it.
    pub fn remove_discount(&mut self) -> Option<AppliedDiscount> {
        self.applied.take()
    }

    pub fn applied(&self) -> Option<&AppliedDiscount> {
        self.applied.as_ref()
    }

    /// Computes the order totals for `cart` under the applied code.
    pub fn totals(&self, cart: &Cart) -> OrderTotals {
        let kind = self.applied.as_ref().map(|d| d.kind);
        compute_totals(cart.subtotal(), cart.shipping(), kind)
    }
}

/// Totals for a subtotal and base shipping charge under an optional discount.
pub fn compute_totals(subtotal: Money, shipping: Money, discount: Option<DiscountKind>) -> OrderTotals {
    let discount_amount = match discount {
        Some(DiscountKind::Percentage { bps }) => subtotal.portion_bps(bps),
        _ => Money::zero(),
    };
    let shipping = match discount {
        Some(DiscountKind::FreeShipping) => Money::zero(),
        _ => shipping,
    };

    let taxable_amount = subtotal - discount_amount;
    let tax = taxable_amount.calculate_tax(SALES_TAX_RATE);

    OrderTotals {
        subtotal,
        discount: discount_amount,
        shipping,
        taxable_amount,
        tax,
        total: taxable_amount + shipping + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Book;

    fn cart_with_subtotal(cents: i64) -> Cart {
        let mut cart = Cart::new();
        cart.add_to_cart(
            &Book {
                id: 1,
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                image: String::new(),
                price: Money::from_cents(cents),
                stock: 10,
            },
            1,
        );
        cart
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let discount = AppliedDiscount::lookup("  desc10 ").unwrap();
        assert_eq!(discount.code, "DESC10");
        assert_eq!(discount.kind, DiscountKind::Percentage { bps: 1000 });
        assert!(AppliedDiscount::lookup("BOGUS").is_none());
    }

    #[test]
    fn test_ten_percent_on_one_hundred() {
        let cart = cart_with_subtotal(10000);
        let mut summary = OrderSummary::new();
        summary.apply_discount("DESC10").unwrap();

        let totals = summary.totals(&cart);
        assert_eq!(totals.discount.cents(), 1000);
        assert_eq!(totals.taxable_amount.cents(), 9000);
        assert_eq!(totals.tax.cents(), 720);
        // $100 subtotal ships free
        assert!(totals.shipping.is_zero());
        assert_eq!(totals.total.cents(), 9720);
    }

    #[test]
    fn test_shipping_waiver_zeroes_shipping_below_threshold() {
        let cart = cart_with_subtotal(2000);
        let mut summary = OrderSummary::new();
        assert_eq!(summary.totals(&cart).shipping.cents(), 500);

        summary.apply_discount("enviogratis").unwrap();
        let totals = summary.totals(&cart);
        assert!(totals.shipping.is_zero());
        assert!(totals.discount.is_zero());
        assert_eq!(totals.tax.cents(), 160);
        assert_eq!(totals.total.cents(), 2160);
    }

    #[test]
    fn test_no_discount_taxes_full_subtotal() {
        let cart = cart_with_subtotal(4000);
        let totals = OrderSummary::new().totals(&cart);
        assert_eq!(totals.taxable_amount.cents(), 4000);
        assert_eq!(totals.tax.cents(), 320);
        assert_eq!(totals.total.cents(), 4000 + 500 + 320);
    }

    #[test]
    fn test_second_code_is_rejected_while_one_is_active() {
        let mut summary = OrderSummary::new();
        summary.apply_discount("DESC10").unwrap();

        let err = summary.apply_discount("DESC20").unwrap_err();
        assert!(matches!(
            err,
            CoreError::DiscountAlreadyApplied { ref active } if active == "DESC10"
        ));
        assert_eq!(summary.applied().unwrap().code, "DESC10");

        // After removal the second code goes through
        assert_eq!(summary.remove_discount().unwrap().code, "DESC10");
        assert_eq!(summary.apply_discount("DESC20").unwrap().code, "DESC20");
    }

    #[test]
    fn test_invalid_code_leaves_summary_untouched() {
        let mut summary = OrderSummary::new();
        let err = summary.apply_discount("FREEBOOKS").unwrap_err();
        assert!(matches!(err, CoreError::InvalidDiscountCode(ref c) if c == "FREEBOOKS"));
        assert!(summary.applied().is_none());
    }

    #[test]
    fn test_summary_does_not_mutate_cart() {
        let cart = cart_with_subtotal(10000);
        let before = cart.clone();
        let mut summary = OrderSummary::new();
        summary.apply_discount("DESC20").unwrap();
        let _ = summary.totals(&cart);
        assert_eq!(cart, before);
    }
}
