//! # folio-core: Pure Business Logic for the Folio Storefront
//!
//! This crate holds every storefront rule as plain, deterministic code with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Storefront                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront Frontend                          │   │
//! │  │    Catalog ──► Cart ──► Checkout ──► Confirmation              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ invoke (JSON lines)                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Storefront Commands                          │   │
//! │  │    add_to_cart, apply_discount, confirm_order, etc.            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  money  │ │  cart   │ │ pricing │ │ checkout │ │ order  │  │   │
//! │  │   │  Money  │ │  Cart   │ │Discount │ │   Flow   │ │Snapshot│  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 folio-db (Local Storage Layer)                  │   │
//! │  │        SQLite key/value table, CartStore, session keys          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, TaxRate, payment kinds, session)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart and its line items
//! - [`pricing`] - Discount codes and the order summary totals
//! - [`validation`] - Checkout and account form validation
//! - [`checkout`] - The cart → checkout → confirmation state machine
//! - [`order`] - Order numbers and the confirmation snapshot
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::{Book, Cart, Money};
//!
//! let book = Book {
//!     id: 1,
//!     title: "The Name of the Wind".to_string(),
//!     author: "Patrick Rothfuss".to_string(),
//!     image: String::new(),
//!     price: Money::from_cents(2250),
//!     stock: 15,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_to_cart(&book, 2);
//!
//! assert_eq!(cart.subtotal().cents(), 4500);
//! // $45.00 is under the free shipping threshold
//! assert_eq!(cart.shipping().cents(), 500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLineItem, CartTotals};
pub use checkout::{CheckoutFlow, CheckoutSection, CheckoutStep};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{Confirmation, OrderNumber, OrderReceipt, OrderSnapshot};
pub use pricing::{AppliedDiscount, DiscountKind, OrderSummary, OrderTotals};
pub use types::*;
pub use validation::{FormValidation, LoginForm, PaymentForm, RegisterForm, ShippingForm};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Orders strictly above this subtotal ship for free ($50.00).
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(5000);

/// Flat shipping fee charged at or below the threshold ($5.00).
pub const FLAT_SHIPPING_FEE: Money = Money::from_cents(500);

/// Sales tax applied on the order summary and the receipt (8%).
pub const SALES_TAX_RATE: TaxRate = TaxRate::from_bps(800);
