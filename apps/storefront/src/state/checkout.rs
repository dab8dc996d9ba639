//! # Checkout State
//!
//! Page-scoped checkout data: the flow, the applied discount, the two forms
//! and the confirmation snapshot. Everything here resets when a new order
//! begins; nothing here is persisted except through the checkout draft.

use tokio::sync::{Mutex, MutexGuard};

use folio_core::validation::{validate_payment, validate_shipping};
use folio_core::{
    Cart, CheckoutFlow, CheckoutStep, Confirmation, CoreError, CoreResult, FormValidation,
    OrderSummary, PaymentForm, ShippingForm,
};

/// One shopper's checkout session.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    pub flow: CheckoutFlow,
    pub summary: OrderSummary,
    pub shipping: ShippingForm,
    pub payment: PaymentForm,
    pub shipping_validation: FormValidation,
    pub payment_validation: FormValidation,
    pub confirmation: Confirmation,
}

impl CheckoutSession {
    /// Enters checkout. A new order starts from a clean session.
    pub fn begin(&mut self, cart: &Cart) -> CoreResult<()> {
        if self.flow.step() == CheckoutStep::Completed && !cart.is_empty() {
            *self = CheckoutSession::default();
        }
        self.flow.begin_checkout(cart)?;

        // Validation state reflects whatever the forms already hold
        self.revalidate();
        Ok(())
    }

    pub fn update_shipping(&mut self, form: ShippingForm) {
        self.shipping = form;
        self.revalidate();
    }

    /// Stores the payment form with its input masks applied.
    pub fn update_payment(&mut self, form: PaymentForm) {
        self.payment = form.formatted();
        self.flow.set_payment_method(self.payment.kind());
        self.revalidate();
    }

    /// Enters confirmation; only then may the snapshot be captured.
    pub fn require_confirmation(&self) -> CoreResult<()> {
        match self.flow.step() {
            CheckoutStep::Confirmation => Ok(()),
            other => Err(CoreError::InvalidTransition {
                from: other.to_string(),
                to: CheckoutStep::Confirmation.to_string(),
            }),
        }
    }

    /// Rejects cart edits between the checkout gate and the snapshot, so
    /// the receipt shows the cart that passed the gate.
    pub fn ensure_cart_editable(&self) -> CoreResult<()> {
        if self.flow.step() == CheckoutStep::Confirmation && !self.confirmation.is_captured() {
            return Err(CoreError::CartLocked);
        }
        Ok(())
    }

    /// Leaves the receipt. Discount and forms are dropped; the flow stays
    /// `Completed` until the next `begin`.
    pub fn finish(&mut self) -> CoreResult<()> {
        self.flow.finish()?;
        let flow = self.flow.clone();
        *self = CheckoutSession {
            flow,
            ..CheckoutSession::default()
        };
        Ok(())
    }

    fn revalidate(&mut self) {
        self.shipping_validation = validate_shipping(&self.shipping);
        self.payment_validation = validate_payment(&self.payment);
        self.flow.set_shipping_valid(self.shipping_validation.is_valid);
        self.flow.set_payment_valid(self.payment_validation.is_valid);
    }
}

#[derive(Debug, Default)]
pub struct CheckoutState {
    session: Mutex<CheckoutSession>,
}

impl CheckoutState {
    pub fn new() -> Self {
        CheckoutState::default()
    }

    pub async fn lock(&self) -> MutexGuard<'_, CheckoutSession> {
        self.session.lock().await
    }
}
