//! # Order Commands
//!
//! The confirmation page.
//!
//! ## Confirmation Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  confirm_order                                                         │
//! │       │                                                                 │
//! │       ├── 1. snapshot the cart (first call only)                       │
//! │       ├── 2. clear the live cart so the order cannot be resubmitted    │
//! │       ├── 3. read the checkout draft (shipping form, payment method)   │
//! │       └── 4. return the receipt                                        │
//! │                                                                         │
//! │  confirm_order again ──► same receipt, cart untouched                  │
//! │                                                                         │
//! │  finish_order ("Back to home")                                         │
//! │       ├── checkout draft keys removed                                  │
//! │       └── session reset, flow Completed                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No order is sent anywhere; the order number is for display.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CartState, CheckoutState, DbState};
use folio_core::{CheckoutStep, CoreError, OrderReceipt};

/// Response for `finish_order`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishResponse {
    pub step: CheckoutStep,
    /// Where the storefront navigates next.
    pub redirect: &'static str,
}

/// Captures the order and returns the receipt.
///
/// ## Errors
/// - `BUSINESS_LOGIC` before `continue_to_confirmation`
/// - `CART_ERROR` when there was nothing to capture; checkout drops back
///   to the cart
pub async fn confirm_order(
    db: &DbState,
    cart: &CartState,
    checkout: &CheckoutState,
) -> Result<OrderReceipt, ApiError> {
    debug!("confirm_order command");

    let mut store = cart.lock().await;
    let mut session = checkout.lock().await;
    session.require_confirmation()?;

    let first_capture = !session.confirmation.is_captured();
    let Some(snapshot) = session.confirmation.observe(store.cart()).cloned() else {
        // Nothing to capture: send the shopper back to the cart
        warn!("Confirmation reached with an empty cart, checkout abandoned");
        session.flow.abandon();
        db.inner().checkout_drafts().clear().await?;
        return Err(CoreError::EmptyCart.into());
    };

    if first_capture {
        info!(
            order_number = %snapshot.order_number,
            items = snapshot.total_items,
            total = %snapshot.total,
            "Order confirmed"
        );
        store.clear_cart().await?;
    }

    let draft = db.inner().checkout_drafts().load().await?;
    Ok(OrderReceipt::new(snapshot, draft.shipping, draft.payment_method))
}

/// Leaves the receipt and resets checkout for the next order.
pub async fn finish_order(db: &DbState, checkout: &CheckoutState) -> Result<FinishResponse, ApiError> {
    debug!("finish_order command");

    let mut session = checkout.lock().await;
    if !session.confirmation.is_captured() {
        return Err(CoreError::InvalidTransition {
            from: session.flow.step().to_string(),
            to: CheckoutStep::Completed.to_string(),
        }
        .into());
    }

    session.finish()?;
    db.inner().checkout_drafts().clear().await?;

    info!("Order finished, checkout reset");
    Ok(FinishResponse {
        step: session.flow.step(),
        redirect: "/",
    })
}
