//! # Checkout Draft Repository
//!
//! Hands the checkout form over to the confirmation page.
//!
//! ```text
//! continue_to_confirmation ──► save(shipping, method)
//!                                   │
//!                                   ▼
//!                 checkoutShipping = {"fullName": ...}
//!                 checkoutPayment  = "card" | "paypal"
//!                                   │
//! confirm_order ──► load() ◄────────┘
//! finish_order  ──► clear()
//! ```
//!
//! Missing or unreadable values load as an empty shipping form and `card`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::storage::{keys, LocalStorage};
use folio_core::{PaymentMethodKind, ShippingForm};

/// The checkout data the receipt shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDraft {
    pub shipping: ShippingForm,
    pub payment_method: PaymentMethodKind,
}

#[derive(Debug, Clone)]
pub struct CheckoutDraftRepository {
    storage: LocalStorage,
}

impl CheckoutDraftRepository {
    pub fn new(storage: LocalStorage) -> Self {
        CheckoutDraftRepository { storage }
    }

    pub async fn save(&self, draft: &CheckoutDraft) -> DbResult<()> {
        self.storage
            .set_json(keys::CHECKOUT_SHIPPING, &draft.shipping)
            .await?;
        self.storage
            .set_item(keys::CHECKOUT_PAYMENT, draft.payment_method.as_str())
            .await?;

        debug!(method = %draft.payment_method, "Checkout draft saved");
        Ok(())
    }

    pub async fn load(&self) -> DbResult<CheckoutDraft> {
        let shipping = match self.storage.get_json::<ShippingForm>(keys::CHECKOUT_SHIPPING).await {
            Ok(form) => form.unwrap_or_default(),
            Err(DbError::Serialization { message, .. }) => {
                warn!(error = %message, "Stored shipping form is unreadable, using an empty one");
                ShippingForm::default()
            }
            Err(e) => return Err(e),
        };

        let payment_method: PaymentMethodKind = self
            .storage
            .get_item(keys::CHECKOUT_PAYMENT)
            .await?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();

        Ok(CheckoutDraft {
            shipping,
            payment_method,
        })
    }

    /// Removes both checkout keys.
    pub async fn clear(&self) -> DbResult<()> {
        self.storage
            .remove_items(&[keys::CHECKOUT_SHIPPING, keys::CHECKOUT_PAYMENT])
            .await?;
        Ok(())
    }
}
