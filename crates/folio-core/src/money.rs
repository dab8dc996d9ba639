//! # Money Module
//!
//! Provides the `Money` type for every price and total in the storefront.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing book prices as floats:                                         │
//! │    22.50 × 3 + 0.1 + 0.2 ≠ 67.80 exactly                               │
//! │                                                                         │
//! │  The free shipping rule compares against $50.00 with a strict `>`,     │
//! │  so a subtotal of 49.999999 vs 50.000001 changes the order total.      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    2250 × 3 = 6750 cents, compared against 5000 cents                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//!
//! let price = Money::from_cents(1800); // $18.00
//!
//! let line_total = price * 2i64;                    // $36.00
//! let total = line_total + Money::from_cents(500);  // $41.00
//! assert_eq!(total.cents(), 4100);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts are subtracted, intermediate values may dip
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serializes as a bare integer**: the persisted cart stores cents
///
/// ## Where Money Flows
/// ```text
/// Book.price ──► CartLineItem.price ──► line_total ──► Cart.subtotal
///                                                          │
///        ┌──────────────────────┬────────────────────────┤
///        ▼                      ▼                        ▼
///    shipping rule        discount (bps)           tax (8%)
///        └──────────────────────┴──────────► OrderTotals.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let price = Money::from_cents(2250); // $22.50
    /// assert_eq!(price.cents(), 2250);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(50, 1).cents(), 5001);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    ///
    /// For negative amounts only the major unit carries the sign.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the given share of this amount in basis points, rounded half up.
    ///
    /// Used for percentage discounts (1000 bps = 10%).
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(10000); // $100.00
    /// assert_eq!(subtotal.portion_bps(1000).cents(), 1000); // $10.00
    /// ```
    pub fn portion_bps(&self, bps: u32) -> Money {
        // i128 keeps large carts from overflowing the intermediate product
        let cents = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Calculates tax on this amount.
    ///
    /// ## Implementation
    /// Integer math: `(amount * rate + 5000) / 10000`.
    /// The +5000 rounds half up.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    /// use folio_core::types::TaxRate;
    ///
    /// let taxable = Money::from_cents(9000); // $90.00
    /// let tax = taxable.calculate_tax(TaxRate::from_bps(800)); // 8%
    /// assert_eq!(tax.cents(), 720); // $7.20
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.portion_bps(rate.bps())
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1995); // $19.95
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 5985);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34`. The storefront host formats with its configured
/// currency symbol instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
