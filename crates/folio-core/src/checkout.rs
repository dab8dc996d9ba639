//! # Checkout Flow
//!
//! The state machine that walks an order from the cart to the receipt.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌────────┐  begin_checkout   ┌──────────┐  continue_to_   ┌─────────┐  │
//! │   │  Cart  │ ────────────────► │ Checkout │ ──confirmation─►│ Confirm │  │
//! │   └────────┘  (cart non-empty) └──────────┘  (both gates)   └────┬────┘  │
//! │       ▲                          │  ▲                            │       │
//! │       │                          │  │ toggle_section             │       │
//! │       │                          └──┘ set_*_valid        finish()│       │
//! │       │                                                          ▼       │
//! │       │          begin_checkout (new order)               ┌───────────┐  │
//! │       └────────────────────────────────────────────────── │ Completed │  │
//! │                                                           └───────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Gates
//! Two booleans, kept in sync with the shipping and payment validation
//! results, decide whether the order can move to confirmation. A failed
//! attempt reopens the section that needs attention. A cart emptied during
//! checkout sends the flow back to `Cart`.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::types::PaymentMethodKind;

// =============================================================================
// Step
// =============================================================================

/// Where the order is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum CheckoutStep {
    #[default]
    Cart,
    Checkout,
    Confirmation,
    Completed,
}

impl CheckoutStep {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Checkout => "checkout",
            CheckoutStep::Confirmation => "confirmation",
            CheckoutStep::Completed => "completed",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Section
// =============================================================================

/// The collapsible sections of the checkout page, numbered as shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum CheckoutSection {
    Shipping,
    Payment,
    Review,
}

impl CheckoutSection {
    pub const fn number(&self) -> u8 {
        match self {
            CheckoutSection::Shipping => 1,
            CheckoutSection::Payment => 2,
            CheckoutSection::Review => 3,
        }
    }

    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(CheckoutSection::Shipping),
            2 => Some(CheckoutSection::Payment),
            3 => Some(CheckoutSection::Review),
            _ => None,
        }
    }
}

// =============================================================================
// Flow
// =============================================================================

/// Checkout session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    open_section: Option<CheckoutSection>,
    shipping_valid: bool,
    payment_valid: bool,
    payment_method: PaymentMethodKind,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        CheckoutFlow::default()
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn open_section(&self) -> Option<CheckoutSection> {
        self.open_section
    }

    pub fn is_shipping_valid(&self) -> bool {
        self.shipping_valid
    }

    pub fn is_payment_valid(&self) -> bool {
        self.payment_valid
    }

    pub fn payment_method(&self) -> PaymentMethodKind {
        self.payment_method
    }

    /// Enters checkout with the shipping section open.
    ///
    /// Starting over from `Completed` begins a fresh order. Calling it again
    /// while already in `Checkout` keeps the current gates.
    ///
    /// ## Errors
    /// - `EmptyCart` when the cart has no items
    /// - `InvalidTransition` from `Confirmation`
    pub fn begin_checkout(&mut self, cart: &Cart) -> CoreResult<()> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        match self.step {
            CheckoutStep::Cart | CheckoutStep::Completed => {
                *self = CheckoutFlow {
                    step: CheckoutStep::Checkout,
                    open_section: Some(CheckoutSection::Shipping),
                    ..CheckoutFlow::default()
                };
                Ok(())
            }
            CheckoutStep::Checkout => Ok(()),
            CheckoutStep::Confirmation => Err(self.transition_error(CheckoutStep::Checkout)),
        }
    }

    pub fn set_shipping_valid(&mut self, valid: bool) {
        self.shipping_valid = valid;
    }

    pub fn set_payment_valid(&mut self, valid: bool) {
        self.payment_valid = valid;
    }

    pub fn set_payment_method(&mut self, method: PaymentMethodKind) {
        self.payment_method = method;
    }

    /// Opens `section`, or collapses it when it is already open.
    pub fn toggle_section(&mut self, section: CheckoutSection) -> CoreResult<Option<CheckoutSection>> {
        self.require(CheckoutStep::Checkout, CheckoutStep::Checkout)?;

        self.open_section = if self.open_section == Some(section) {
            None
        } else {
            Some(section)
        };
        Ok(self.open_section)
    }

    /// Moves to confirmation once both gates pass.
    ///
    /// ## Errors
    /// - `EmptyCart` when the cart was emptied during checkout; the flow
    ///   drops back to `Cart`
    /// - `CheckoutIncomplete { section: 1 }` when shipping is invalid
    /// - `CheckoutIncomplete { section: 2 }` when payment is invalid
    /// - `InvalidTransition` outside of `Checkout`
    pub fn continue_to_confirmation(&mut self, cart: &Cart) -> CoreResult<()> {
        self.require(CheckoutStep::Checkout, CheckoutStep::Confirmation)?;

        if cart.is_empty() {
            self.abandon();
            return Err(CoreError::EmptyCart);
        }

        if !self.shipping_valid {
            self.open_section = Some(CheckoutSection::Shipping);
            return Err(CoreError::CheckoutIncomplete {
                missing: "shipping".to_string(),
                section: CheckoutSection::Shipping.number(),
            });
        }

        if !self.payment_valid {
            self.open_section = Some(CheckoutSection::Payment);
            return Err(CoreError::CheckoutIncomplete {
                missing: "payment".to_string(),
                section: CheckoutSection::Payment.number(),
            });
        }

        self.step = CheckoutStep::Confirmation;
        self.open_section = None;
        Ok(())
    }

    /// Hint shown under the continue button while a gate is closed.
    pub fn gate_message(&self) -> Option<&'static str> {
        match (self.shipping_valid, self.payment_valid) {
            (false, false) => Some("Please complete the shipping and payment information"),
            (false, true) => Some("Please complete the shipping information"),
            (true, false) => Some("Please complete the payment information"),
            (true, true) => None,
        }
    }

    pub fn can_continue(&self) -> bool {
        self.gate_message().is_none()
    }

    /// Leaves the confirmation step.
    pub fn finish(&mut self) -> CoreResult<()> {
        self.require(CheckoutStep::Confirmation, CheckoutStep::Completed)?;
        self.step = CheckoutStep::Completed;
        Ok(())
    }

    /// Drops back to `Cart`, discarding the gates.
    pub fn abandon(&mut self) {
        *self = CheckoutFlow::default();
    }

    fn require(&self, expected: CheckoutStep, to: CheckoutStep) -> CoreResult<()> {
        if self.step != expected {
            return Err(self.transition_error(to));
        }
        Ok(())
    }

    fn transition_error(&self, to: CheckoutStep) -> CoreError {
        CoreError::InvalidTransition {
            from: self.step.to_string(),
            to: to.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
