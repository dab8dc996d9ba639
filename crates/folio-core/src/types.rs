//! # Domain Types
//!
//! Core domain types shared by the cart, checkout and confirmation flows.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │ PaymentMethod   │   │    Session      │       │
//! │  │  ─────────────  │   │     Kind        │   │  ─────────────  │       │
//! │  │  id (catalog)   │   │  ─────────────  │   │  user_id        │       │
//! │  │  title, author  │   │  Card           │   │  is_admin       │       │
//! │  │  price (Money)  │   │  Paypal         │   └─────────────────┘       │
//! │  │  stock          │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    TaxRate      │                                                    │
//! │  │  bps (u32)      │                                                    │
//! │  │  800 = 8%       │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Books come from the remote catalog API; the storefront never creates them,
//! it only copies them into the cart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Book
// =============================================================================

/// A catalog book as handed to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Book {
    /// Catalog identifier.
    pub id: i64,

    pub title: String,

    pub author: String,

    /// Cover image URL.
    pub image: String,

    /// Unit price in cents.
    pub price: Money,

    /// Copies available; the maximum orderable quantity.
    pub stock: i64,
}

impl Book {
    /// A book with no stock cannot be added to the cart.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Payment Method Kind
// =============================================================================

/// The payment methods offered at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentMethodKind {
    /// Credit or debit card.
    #[default]
    Card,
    /// Redirect to PayPal after confirmation.
    Paypal,
}

impl PaymentMethodKind {
    /// Storage representation (`card` / `paypal`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethodKind::Card => "card",
            PaymentMethodKind::Paypal => "paypal",
        }
    }

    /// Label shown on the receipt.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethodKind::Card => "Credit/Debit Card",
            PaymentMethodKind::Paypal => "PayPal",
        }
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethodKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "card" => Ok(PaymentMethodKind::Card),
            "paypal" => Ok(PaymentMethodKind::Paypal),
            _ => Err(ValidationError::NotAllowed {
                field: "paymentMethod".to_string(),
                allowed: vec!["card".to_string(), "paypal".to_string()],
            }),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// The signed-in user as returned by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    pub user_id: String,
    pub is_admin: bool,
}

impl Session {
    /// Where the storefront navigates after login.
    pub fn landing_path(&self) -> &'static str {
        if self.is_admin {
            "/dashboard"
        } else {
            "/"
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
