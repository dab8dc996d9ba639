//! # Checkout Commands
//!
//! The checkout page: two forms, a discount box, and the continue button.
//!
//! ## Page Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  begin_checkout ──► section 1 open                                      │
//! │                                                                         │
//! │  ┌─ 1. Shipping ──────────────┐   update_shipping (every keystroke)    │
//! │  ├─ 2. Payment ───────────────┤   update_payment  (masks applied)      │
//! │  └─ 3. Review ────────────────┘   toggle_section                       │
//! │                                                                         │
//! │  ┌─ Order summary ────────────┐   apply_discount / remove_discount     │
//! │  │  subtotal, discount, tax   │   get_order_summary                    │
//! │  └────────────────────────────┘                                        │
//! │                                                                         │
//! │  [Continue] ──► continue_to_confirmation                               │
//! │                   ├── cart emptied ──► CART_ERROR, back to the cart    │
//! │                   ├── gate fails ──► CHECKOUT_ERROR + section to open  │
//! │                   └── ok ──► checkout draft saved ──► confirmation     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartState, CheckoutSession, CheckoutState, DbState};
use folio_core::{
    AppliedDiscount, Cart, CheckoutFlow, CheckoutSection, FormValidation, OrderTotals, PaymentForm,
    ShippingForm,
};
use folio_db::CheckoutDraft;

/// Checkout page state for the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub flow: CheckoutFlow,
    pub shipping: ShippingForm,
    pub payment: PaymentForm,
    pub shipping_validation: FormValidation,
    pub payment_validation: FormValidation,
    /// Enables the continue button.
    pub can_continue: bool,
    pub gate_message: Option<String>,
}

impl From<&CheckoutSession> for CheckoutView {
    fn from(session: &CheckoutSession) -> Self {
        CheckoutView {
            flow: session.flow.clone(),
            shipping: session.shipping.clone(),
            payment: session.payment.clone(),
            shipping_validation: session.shipping_validation.clone(),
            payment_validation: session.payment_validation.clone(),
            can_continue: session.flow.can_continue(),
            gate_message: session.flow.gate_message().map(str::to_string),
        }
    }
}

/// Order summary box.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub applied: Option<AppliedDiscount>,
    pub totals: OrderTotals,
}

fn summary_response(session: &CheckoutSession, cart: &Cart) -> SummaryResponse {
    SummaryResponse {
        applied: session.summary.applied().cloned(),
        totals: session.summary.totals(cart),
    }
}

/// Enters checkout.
///
/// ## Errors
/// - `CART_ERROR` when the cart is empty
/// - `BUSINESS_LOGIC` while an order is awaiting confirmation
pub async fn begin_checkout(cart: &CartState, checkout: &CheckoutState) -> Result<CheckoutView, ApiError> {
    debug!("begin_checkout command");

    let store = cart.lock().await;
    let mut session = checkout.lock().await;
    session.begin(store.cart())?;
    Ok(CheckoutView::from(&*session))
}

pub async fn update_shipping(checkout: &CheckoutState, form: ShippingForm) -> CheckoutView {
    debug!("update_shipping command");

    let mut session = checkout.lock().await;
    session.update_shipping(form);
    CheckoutView::from(&*session)
}

pub async fn update_payment(checkout: &CheckoutState, form: PaymentForm) -> CheckoutView {
    debug!(method = %form.kind(), "update_payment command");

    let mut session = checkout.lock().await;
    session.update_payment(form);
    CheckoutView::from(&*session)
}

/// Opens or collapses section 1, 2 or 3.
pub async fn toggle_section(checkout: &CheckoutState, section: u8) -> Result<CheckoutView, ApiError> {
    debug!(section, "toggle_section command");

    let section = CheckoutSection::from_number(section)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown checkout section: {}", section)))?;

    let mut session = checkout.lock().await;
    session.flow.toggle_section(section)?;
    Ok(CheckoutView::from(&*session))
}

/// Applies a discount code.
///
/// ## Errors
/// - `DISCOUNT_ERROR` for an unknown code, or while another code is active
pub async fn apply_discount(
    cart: &CartState,
    checkout: &CheckoutState,
    code: String,
) -> Result<SummaryResponse, ApiError> {
    debug!(code = %code, "apply_discount command");

    let store = cart.lock().await;
    let mut session = checkout.lock().await;
    let applied = session.summary.apply_discount(&code)?;
    info!(code = %applied.code, "Discount applied");

    Ok(summary_response(&session, store.cart()))
}

pub async fn remove_discount(cart: &CartState, checkout: &CheckoutState) -> SummaryResponse {
    debug!("remove_discount command");

    let store = cart.lock().await;
    let mut session = checkout.lock().await;
    session.summary.remove_discount();
    summary_response(&session, store.cart())
}

pub async fn get_order_summary(cart: &CartState, checkout: &CheckoutState) -> SummaryResponse {
    debug!("get_order_summary command");

    let store = cart.lock().await;
    let session = checkout.lock().await;
    summary_response(&session, store.cart())
}

/// Moves to confirmation and hands the forms to the receipt.
///
/// ## Errors
/// - `CART_ERROR` when the cart was emptied; checkout drops back to the cart
/// - `CHECKOUT_ERROR` with `section` 1 or 2 when a form is incomplete
/// - `BUSINESS_LOGIC` outside of checkout
pub async fn continue_to_confirmation(
    db: &DbState,
    cart: &CartState,
    checkout: &CheckoutState,
) -> Result<CheckoutView, ApiError> {
    debug!("continue_to_confirmation command");

    let store = cart.lock().await;
    let mut session = checkout.lock().await;
    session.flow.continue_to_confirmation(store.cart())?;

    let draft = CheckoutDraft {
        shipping: session.shipping.clone(),
        payment_method: session.flow.payment_method(),
    };
    db.inner().checkout_drafts().save(&draft).await?;

    info!(method = %draft.payment_method, "Checkout complete, awaiting confirmation");
    Ok(CheckoutView::from(&*session))
}
